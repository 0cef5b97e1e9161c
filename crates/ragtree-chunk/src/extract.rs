//! Separation of prose-bearing string leaves from plain tree data.

use ragtree_core::Node;

/// Chars whose presence marks a string leaf as markdown prose.
const PROSE_MARKERS: [char; 3] = ['#', '*', '`'];

/// Prose text lifted out of a document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProseEntry {
    /// Dotted path of the leaf. Empty for a root-level string.
    pub key_path: String,

    /// Text with escaped newlines normalized.
    pub text: String,
}

/// Cheap markdown heuristic. Data strings that happen to contain one of the
/// marker chars are classified as prose too.
pub fn is_prose_bearing(text: &str) -> bool {
    text.contains(&PROSE_MARKERS[..])
}

/// Append a mapping key or sequence index to a dotted path.
pub(crate) fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}

/// Walks a document tree, lifting prose leaves out and leaving `Null` in
/// their place.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownExtractor;

impl MarkdownExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Split `node` into prose entries (in encounter order) and a cleaned tree.
    pub fn extract(&self, node: &Node) -> (Vec<ProseEntry>, Node) {
        let mut entries = Vec::new();
        let cleaned = self.walk(node, "", &mut entries);
        (entries, cleaned)
    }

    fn walk(&self, node: &Node, path: &str, entries: &mut Vec<ProseEntry>) -> Node {
        if let Some(text) = node.as_str().filter(|text| is_prose_bearing(text)) {
            entries.push(ProseEntry {
                key_path: path.to_string(),
                text: text.replace("\\n", "\n"),
            });
            return Node::Null;
        }

        match node {
            Node::Mapping(children) => Node::Mapping(
                children
                    .iter()
                    .map(|(key, value)| {
                        let cleaned = self.walk(value, &join_path(path, key), entries);
                        (key.clone(), cleaned)
                    })
                    .collect(),
            ),
            Node::Sequence(items) => Node::Sequence(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.walk(item, &join_path(path, &i.to_string()), entries))
                    .collect(),
            ),
            Node::Null | Node::Bool(_) | Node::Number(_) | Node::String(_) => node.clone(),
        }
    }
}
