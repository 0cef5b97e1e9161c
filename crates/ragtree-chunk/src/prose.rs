//! Prose splitter.
//!
//! Extracted prose is first cut into segments at heading lines, each segment
//! carrying the stack of headings open at that point. Segments are then cut
//! into windows of at most `max_size` chars, preferring to close a window
//! right after a separator, with `overlap` chars repeated at the start of
//! the next window.

use std::iter;

use ragtree_core::{
    validate_header_markers, validate_prose_window, Chunk, ChunkingConfig, HeaderMarker, Heading,
    Result,
};

use crate::extract::ProseEntry;

/// Text under one run of headings, drawn from a single prose entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    pub key_path: String,
    pub header_path: Vec<Heading>,
    pub text: String,
}

/// A configured marker with its depth.
#[derive(Debug, Clone)]
struct Marker {
    marker: String,
    label: String,
    level: usize,
}

/// Splits prose entries into bounded, overlapping chunks.
#[derive(Debug, Clone)]
pub struct ProseSplitter {
    max_size: usize,
    overlap: usize,
    separators: Vec<String>,
    /// Longest marker first, so `####` is tried before `#`.
    markers: Vec<Marker>,
}

impl ProseSplitter {
    /// Create a splitter. A marker's level is its rank by length among the
    /// configured markers, so `#` sits above `##` whatever their order.
    pub fn new(
        max_size: usize,
        overlap: usize,
        separators: Vec<String>,
        header_markers: &[HeaderMarker],
    ) -> Result<Self> {
        validate_prose_window(max_size, overlap, &separators)?;
        validate_header_markers(header_markers)?;

        let mut depths: Vec<usize> = header_markers
            .iter()
            .map(|m| m.marker.chars().count())
            .collect();
        depths.sort_unstable();
        depths.dedup();

        let mut markers: Vec<Marker> = header_markers
            .iter()
            .map(|m| {
                let depth = m.marker.chars().count();
                Marker {
                    marker: m.marker.clone(),
                    label: m.label.clone(),
                    level: depths.partition_point(|&d| d < depth) + 1,
                }
            })
            .collect();
        markers.sort_by(|a, b| b.marker.len().cmp(&a.marker.len()));

        Ok(Self {
            max_size,
            overlap,
            separators,
            markers,
        })
    }

    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(
            config.max_prose_chunk_size,
            config.prose_overlap,
            config.prose_separators.clone(),
            &config.header_markers,
        )
    }

    /// Split entries into prose chunks, in encounter order.
    pub fn split(&self, entries: &[ProseEntry]) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for segment in self.segments(entries) {
            let key_path = (!segment.key_path.is_empty()).then(|| segment.key_path.clone());
            for window in self.windows(&segment.text) {
                chunks.push(Chunk::prose(
                    window.to_string(),
                    key_path.clone(),
                    segment.header_path.clone(),
                ));
            }
        }

        chunks
    }

    /// Cut entries into heading-delimited segments.
    ///
    /// The heading stack carries over from one entry to the next, as if the
    /// entries were one blank-line separated text, but a segment never spans
    /// two entries so its key path stays exact. Heading lines must start at
    /// column zero; an indented `# x` stays body text.
    pub(crate) fn segments(&self, entries: &[ProseEntry]) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut stack: Vec<Heading> = Vec::new();

        for entry in entries {
            let mut lines: Vec<&str> = Vec::new();
            let mut fence: Option<&str> = None;

            // Split on `\n` only so CRLF text keeps its `\r`.
            for line in entry.text.split('\n') {
                let trimmed = line.trim();

                if let Some(open) = fence {
                    if trimmed.starts_with(open) {
                        fence = None;
                    }
                    lines.push(line);
                    continue;
                }
                if let Some(open) = ["```", "~~~"].into_iter().find(|f| trimmed.starts_with(*f)) {
                    fence = Some(open);
                    lines.push(line);
                    continue;
                }

                match self.match_heading(line.trim_end()) {
                    Some(heading) => {
                        push_segment(&mut segments, entry, &stack, &lines);
                        lines.clear();
                        stack.retain(|h| h.level < heading.level);
                        stack.push(heading);
                    }
                    None => lines.push(line),
                }
            }

            push_segment(&mut segments, entry, &stack, &lines);
        }

        segments
    }

    fn match_heading(&self, line: &str) -> Option<Heading> {
        self.markers.iter().find_map(|m| {
            let rest = line.strip_prefix(m.marker.as_str())?;
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                return None;
            }
            Some(Heading {
                level: m.level,
                label: m.label.clone(),
                title: rest.trim().to_string(),
            })
        })
    }

    /// Cut text into windows of at most `max_size` chars.
    pub(crate) fn windows<'a>(&self, text: &'a str) -> Vec<&'a str> {
        // Byte offset of every char boundary, including the end.
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(iter::once(text.len()))
            .collect();
        let total = bounds.len() - 1;

        let mut windows = Vec::new();
        let mut start = 0;

        while total - start > self.max_size {
            let cut = self.find_cut(text, &bounds, start);
            windows.push(&text[bounds[start]..bounds[cut]]);
            start = cut - self.overlap;
        }
        if total > start {
            windows.push(&text[bounds[start]..]);
        }

        windows
    }

    /// Char index closing the window that starts at `start`.
    ///
    /// The cut lands just after the last occurrence of the first separator
    /// found, and must leave the next window starting past `start`.
    fn find_cut(&self, text: &str, bounds: &[usize], start: usize) -> usize {
        let end = start + self.max_size;
        let min_cut = start + self.overlap + 1;
        let window = &text[bounds[start]..bounds[end]];

        for separator in &self.separators {
            if let Some(pos) = window.rfind(separator.as_str()) {
                let cut_byte = bounds[start] + pos + separator.len();
                let cut = bounds.partition_point(|&b| b < cut_byte);
                if cut >= min_cut {
                    return cut;
                }
            }
        }

        end
    }
}

fn push_segment(segments: &mut Vec<Segment>, entry: &ProseEntry, stack: &[Heading], lines: &[&str]) {
    let text = lines.join("\n");
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    segments.push(Segment {
        key_path: entry.key_path.clone(),
        header_path: stack.to_vec(),
        text: text.to_string(),
    });
}
