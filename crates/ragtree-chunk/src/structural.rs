//! Size-bounded partitioning of a cleaned document tree.
//!
//! A subtree that serializes within the bound becomes one chunk. Larger
//! mappings and sequences are cut into runs of consecutive children, each run
//! serialized as a smaller mapping or sequence. A child too large to share a
//! run is split on its own, one level deeper.

use tracing::warn;

use ragtree_core::{Chunk, ChunkWarning, ChunkedDocument, Node, Result};

use crate::extract::join_path;

/// One child of a container, pre-serialized.
struct Member<'a> {
    /// Key or index, appended to the key path when the child is split alone.
    segment: String,
    value: &'a Node,
    /// `"key":value` for mappings, `value` for sequences.
    fragment: String,
    size: usize,
}

#[derive(Clone, Copy)]
enum Container {
    Mapping,
    Sequence,
}

impl Container {
    fn delimiters(self) -> (char, char) {
        match self {
            Self::Mapping => ('{', '}'),
            Self::Sequence => ('[', ']'),
        }
    }
}

/// Splits a cleaned tree into serialized fragments no larger than `max_size`.
#[derive(Debug, Clone)]
pub struct StructuralSplitter {
    max_size: usize,
}

impl StructuralSplitter {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }

    /// Partition `cleaned` into structural chunks in tree order.
    ///
    /// An atomic leaf larger than the bound is still emitted, and reported
    /// in the returned warnings.
    pub fn split(&self, cleaned: &Node) -> Result<ChunkedDocument> {
        let mut out = ChunkedDocument::default();
        self.split_node(cleaned, "", &mut out)?;
        Ok(out)
    }

    fn split_node(&self, node: &Node, path: &str, out: &mut ChunkedDocument) -> Result<()> {
        let json = node.to_json()?;
        let size = json.chars().count();

        if size <= self.max_size {
            if !is_empty_container(node) {
                out.chunks.push(Chunk::structural(json, key_path(path)));
            }
            return Ok(());
        }

        match node {
            Node::Mapping(entries) => {
                let members = entries
                    .iter()
                    .map(|(key, value)| -> Result<Member<'_>> {
                        let fragment = format!("{}:{}", serde_json::to_string(key)?, value.to_json()?);
                        Ok(Member {
                            segment: key.clone(),
                            value,
                            size: fragment.chars().count(),
                            fragment,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                self.split_members(&members, Container::Mapping, path, out)
            }
            Node::Sequence(items) => {
                let members = items
                    .iter()
                    .enumerate()
                    .map(|(i, value)| -> Result<Member<'_>> {
                        let fragment = value.to_json()?;
                        Ok(Member {
                            segment: i.to_string(),
                            value,
                            size: fragment.chars().count(),
                            fragment,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                self.split_members(&members, Container::Sequence, path, out)
            }
            Node::Null | Node::Bool(_) | Node::Number(_) | Node::String(_) => {
                let key_path = key_path(path);
                warn!(
                    key_path = key_path.as_deref().unwrap_or("<root>"),
                    size,
                    max_size = self.max_size,
                    "Emitting oversized atomic leaf"
                );
                out.warnings.push(ChunkWarning::OversizedAtomicLeaf {
                    key_path: key_path.clone(),
                    size,
                    max_size: self.max_size,
                });
                out.chunks.push(Chunk::structural(json, key_path));
                Ok(())
            }
        }
    }

    /// Greedy grouping in encounter order.
    fn split_members(
        &self,
        members: &[Member<'_>],
        container: Container,
        path: &str,
        out: &mut ChunkedDocument,
    ) -> Result<()> {
        let mut group: Vec<&Member<'_>> = Vec::new();
        // Size of the group serialized with its delimiters.
        let mut group_size = 2;

        for member in members {
            let grown = if group.is_empty() {
                2 + member.size
            } else {
                group_size + 1 + member.size
            };

            if grown <= self.max_size {
                group.push(member);
                group_size = grown;
                continue;
            }

            self.flush(&mut group, container, path, out);
            group_size = 2;

            if 2 + member.size <= self.max_size {
                group.push(member);
                group_size = 2 + member.size;
            } else {
                self.split_node(member.value, &join_path(path, &member.segment), out)?;
            }
        }

        self.flush(&mut group, container, path, out);
        Ok(())
    }

    fn flush(
        &self,
        group: &mut Vec<&Member<'_>>,
        container: Container,
        path: &str,
        out: &mut ChunkedDocument,
    ) {
        if group.is_empty() {
            return;
        }

        let (open, close) = container.delimiters();
        let mut content = String::new();
        content.push(open);
        for (i, member) in group.iter().enumerate() {
            if i > 0 {
                content.push(',');
            }
            content.push_str(&member.fragment);
        }
        content.push(close);

        out.chunks.push(Chunk::structural(content, key_path(path)));
        group.clear();
    }
}

fn key_path(path: &str) -> Option<String> {
    (!path.is_empty()).then(|| path.to_string())
}

fn is_empty_container(node: &Node) -> bool {
    match node {
        Node::Mapping(entries) => entries.is_empty(),
        Node::Sequence(items) => items.is_empty(),
        _ => false,
    }
}
