//! Enumeration of source-to-sink paths that pass through a set of required
//! nodes.
//!
//! Module graphs are small (tens of nodes), so the search is an exhaustive
//! depth-first walk. Only simple paths are produced: a node already on the
//! current path is never re-entered, which keeps cyclic inputs finite.

use crate::ir::Link;
use std::collections::{BTreeSet, HashMap, HashSet};

pub type NodePath = Vec<String>;

/// Outgoing targets per source id, in link order. Parallel links appear
/// once per link.
#[derive(Debug, Clone, Default)]
pub struct Adjacency<'a> {
    next: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Adjacency<'a> {
    pub fn from_links(links: &'a [Link]) -> Self {
        let mut next: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for link in links {
            next.entry(link.source.as_str())
                .or_default()
                .push(link.target.as_str());
        }
        Self { next }
    }

    pub fn successors(&self, id: &str) -> &[&'a str] {
        self.next.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Every simple path from `source` to `sink` that visits all `required` ids.
///
/// Returns an empty list when no such path exists, including when `source`
/// has no outgoing links or `sink` is never reached.
pub fn find_paths_through_required<S>(
    links: &[Link],
    required: &BTreeSet<S>,
    source: &str,
    sink: &str,
) -> Vec<NodePath>
where
    S: AsRef<str> + Ord,
{
    let adjacency = Adjacency::from_links(links);
    let still_needed: HashSet<&str> = required.iter().map(AsRef::as_ref).collect();
    let mut search = Search {
        adjacency: &adjacency,
        sink,
        path: vec![source],
        on_path: HashSet::from([source]),
        results: Vec::new(),
    };
    search.visit(source, &still_needed);
    search.results
}

struct Search<'g, 'a> {
    adjacency: &'g Adjacency<'a>,
    sink: &'g str,
    path: Vec<&'g str>,
    on_path: HashSet<&'g str>,
    results: Vec<NodePath>,
}

impl<'g, 'a: 'g> Search<'g, 'a> {
    fn visit(&mut self, node: &'g str, still_needed: &HashSet<&str>) {
        let mut needed = still_needed.clone();
        needed.remove(node);

        if node == self.sink {
            if needed.is_empty() {
                self.results
                    .push(self.path.iter().map(|id| id.to_string()).collect());
            }
            return;
        }

        let adjacency = self.adjacency;
        for &next in adjacency.successors(node) {
            if !self.on_path.insert(next) {
                continue;
            }
            self.path.push(next);
            self.visit(next, &needed);
            self.path.pop();
            self.on_path.remove(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(pairs: &[(&str, &str)]) -> Vec<Link> {
        pairs.iter().map(|(a, b)| Link::new(*a, *b)).collect()
    }

    fn required(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn two_branches() -> Vec<Link> {
        links(&[("START", "A"), ("A", "SINK"), ("START", "B"), ("B", "SINK")])
    }

    #[test]
    fn single_required_node() {
        let paths = find_paths_through_required(&two_branches(), &required(&["A"]), "START", "SINK");
        assert_eq!(paths, vec![vec!["START", "A", "SINK"]]);
    }

    #[test]
    fn incompatible_requirements_yield_nothing() {
        let paths =
            find_paths_through_required(&two_branches(), &required(&["A", "B"]), "START", "SINK");
        assert!(paths.is_empty());
    }

    #[test]
    fn no_requirements_lists_every_path() {
        let paths = find_paths_through_required(&two_branches(), &required(&[]), "START", "SINK");
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn parallel_links_multiply_paths() {
        let mut graph = two_branches();
        graph.push(Link::new("START", "A"));
        let paths = find_paths_through_required(&graph, &required(&["A"]), "START", "SINK");
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], paths[1]);
    }

    #[test]
    fn sentinels_count_as_required() {
        let paths =
            find_paths_through_required(&two_branches(), &required(&["START", "SINK"]), "START", "SINK");
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn missing_source_or_sink() {
        let graph = two_branches();
        assert!(find_paths_through_required(&graph, &required(&[]), "BEGIN", "SINK").is_empty());
        assert!(find_paths_through_required(&graph, &required(&[]), "START", "END").is_empty());
    }

    #[test]
    fn cycles_terminate() {
        let graph = links(&[
            ("START", "A"),
            ("A", "B"),
            ("B", "A"),
            ("B", "SINK"),
            ("A", "A"),
        ]);
        let paths = find_paths_through_required(&graph, &required(&["B"]), "START", "SINK");
        assert_eq!(paths, vec![vec!["START", "A", "B", "SINK"]]);
    }

    #[test]
    fn dangling_targets_are_dead_ends() {
        let graph = links(&[("START", "GHOST"), ("START", "A"), ("A", "SINK")]);
        let paths = find_paths_through_required(&graph, &required(&[]), "START", "SINK");
        assert_eq!(paths, vec![vec!["START", "A", "SINK"]]);
    }

    #[test]
    fn search_stops_at_sink() {
        let graph = links(&[("START", "SINK"), ("SINK", "X")]);
        let paths = find_paths_through_required(&graph, &required(&["X"]), "START", "SINK");
        assert!(paths.is_empty());
    }
}
