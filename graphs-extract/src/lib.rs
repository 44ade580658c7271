//! Raw OSM PBF element scanning.
//!
//! This crate knows nothing about routing graphs or buildings — it just
//! turns a `.pbf` file into a stream of [`Element`]s. The three-pass OSM
//! importer (`graphs-geometry`) opens the same extract three times,
//! independently, and applies a different closure each time; see spec
//! §4.3 for why the passes can't share mutable state.

use std::path::Path;

use osmpbf::{Element as PbfElement, ElementReader};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to open OSM extract: {0}")]
    Open(#[source] osmpbf::Error),
    #[error("failed to read OSM extract: {0}")]
    Read(#[source] osmpbf::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct RawNode {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone)]
pub struct RawWay {
    pub id: u64,
    pub node_refs: Vec<u64>,
    pub tags: Vec<(String, String)>,
}

impl RawWay {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_tag_key(&self, key: &str) -> bool {
        self.tags.iter().any(|(k, _)| k == key)
    }
}

pub enum Element {
    Node(RawNode),
    Way(RawWay),
}

/// Scans `path` once, calling `visit` for every node and way element.
/// Relations are skipped — this system has no use for them (no
/// turn-restriction support, see spec Non-goals).
pub fn scan_elements<P, F>(path: P, mut visit: F) -> Result<(), ExtractError>
where
    P: AsRef<Path>,
    F: FnMut(Element),
{
    let reader = ElementReader::from_path(path).map_err(ExtractError::Open)?;

    reader
        .for_each(|element| match element {
            PbfElement::Node(node) => {
                visit(Element::Node(RawNode {
                    id: node.id() as u64,
                    lat: node.lat(),
                    lon: node.lon(),
                }));
            }
            PbfElement::DenseNode(node) => {
                visit(Element::Node(RawNode {
                    id: node.id() as u64,
                    lat: node.lat(),
                    lon: node.lon(),
                }));
            }
            PbfElement::Way(way) => {
                let tags = way
                    .tags()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                visit(Element::Way(RawWay {
                    id: way.id() as u64,
                    node_refs: way.refs().map(|r| r as u64).collect(),
                    tags,
                }));
            }
            _ => {}
        })
        .map_err(ExtractError::Read)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_way_tag_lookup() {
        let way = RawWay {
            id: 1,
            node_refs: vec![1, 2, 3],
            tags: vec![
                ("highway".to_string(), "residential".to_string()),
                ("oneway".to_string(), "yes".to_string()),
            ],
        };
        assert_eq!(way.tag("highway"), Some("residential"));
        assert_eq!(way.tag("oneway"), Some("yes"));
        assert_eq!(way.tag("missing"), None);
        assert!(way.has_tag_key("highway"));
        assert!(!way.has_tag_key("building"));
    }
}
