use crate::ir::Link;
use crate::paths::NodePath;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Finds the link joining two node ids regardless of direction.
///
/// When several links join the same pair, the first one in link order wins.
#[derive(Debug, Clone, Default)]
pub struct EdgeLookup {
    first_by_pair: HashMap<(String, String), usize>,
}

impl EdgeLookup {
    pub fn new(links: &[Link]) -> Self {
        let mut first_by_pair = HashMap::new();
        for (idx, link) in links.iter().enumerate() {
            first_by_pair
                .entry(unordered(&link.source, &link.target))
                .or_insert(idx);
        }
        Self { first_by_pair }
    }

    /// Index of the link between `a` and `b`.
    pub fn between(&self, a: &str, b: &str) -> Option<usize> {
        self.first_by_pair.get(&unordered(a, b)).copied()
    }
}

fn unordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Node ids and link indices that get highlight styling. Everything else
/// keeps its baseline style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub nodes: BTreeSet<String>,
    pub edges: BTreeSet<usize>,
}

impl Highlight {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn has_edge(&self, index: usize) -> bool {
        self.edges.contains(&index)
    }
}

/// Unions the nodes and connecting links of every path.
pub fn project(paths: &[NodePath], lookup: &EdgeLookup) -> Highlight {
    let mut highlight = Highlight::default();
    for path in paths {
        highlight.nodes.extend(path.iter().cloned());
        for pair in path.windows(2) {
            if let Some(idx) = lookup.between(&pair[0], &pair[1]) {
                highlight.edges.insert(idx);
            }
        }
    }
    highlight
}

/// Projection of "no paths": everything back to baseline.
pub fn clear_highlight() -> Highlight {
    Highlight::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(ids: &[&str]) -> NodePath {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_projection_is_stable() {
        let lookup = EdgeLookup::new(&[Link::new("START", "A")]);
        let first = project(&[], &lookup);
        let second = project(&[], &lookup);
        assert!(first.is_empty());
        assert_eq!(first, second);
        assert_eq!(first, clear_highlight());
    }

    #[test]
    fn unions_nodes_and_edges() {
        let links = vec![
            Link::new("START", "A"),
            Link::new("A", "SINK"),
            Link::new("START", "B"),
            Link::new("B", "SINK"),
        ];
        let lookup = EdgeLookup::new(&links);
        let highlight = project(
            &[path(&["START", "A", "SINK"]), path(&["START", "B", "SINK"])],
            &lookup,
        );
        assert_eq!(highlight.nodes.len(), 4);
        assert_eq!(highlight.edges, BTreeSet::from([0, 1, 2, 3]));
    }

    #[test]
    fn lookup_ignores_direction_and_prefers_first() {
        let links = vec![
            Link::new("B", "A"),
            Link::new("A", "B"),
            Link::new("A", "B"),
        ];
        let lookup = EdgeLookup::new(&links);
        assert_eq!(lookup.between("A", "B"), Some(0));
        assert_eq!(lookup.between("B", "A"), Some(0));
        assert_eq!(lookup.between("A", "C"), None);
    }

    #[test]
    fn unresolved_pairs_only_mark_nodes() {
        let lookup = EdgeLookup::new(&[]);
        let highlight = project(&[path(&["START", "SINK"])], &lookup);
        assert!(highlight.has_node("START"));
        assert!(highlight.edges.is_empty());
    }
}
