use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use rkyv::{Archive, Deserialize, Serialize};

/// Adjacency-list graph keyed by node name.
///
/// Edges are directed as stored; nothing here assumes a neighbor list is
/// reciprocated. A name may appear in a neighbor list without being a key
/// of its own; traversals treat such nodes as dead ends rather than
/// failing on them.
#[derive(Debug, Clone, Default, PartialEq, Archive, Serialize, Deserialize)]
#[archive(check_bytes)]
pub struct Graph {
    adjacency: HashMap<String, Vec<String>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the neighbor list for `node`, replacing any previous one.
    pub fn insert(&mut self, node: &str, neighbors: &[&str]) {
        self.adjacency.insert(
            node.to_owned(),
            neighbors.iter().map(|n| (*n).to_owned()).collect(),
        );
    }

    /// Neighbors of `node`, empty for unknown nodes.
    pub fn neighbors(&self, node: &str) -> &[String] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &String> {
        self.adjacency.keys()
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Carves the induced subgraph reachable from `seed` with every trace
    /// of `forbidden` removed: it is never a key of the result and never
    /// listed as a neighbor.
    ///
    /// Breadth-first; the visited set alone de-duplicates, so a node can
    /// sit in the queue more than once and later dequeues of it are no-ops.
    pub fn partition(&self, forbidden: &str, seed: &str) -> Graph {
        let mut subgraph = Graph::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(seed);

        while let Some(node) = queue.pop_front() {
            if !visited.insert(node) {
                continue;
            }
            let Some(neighbors) = self.adjacency.get(node) else {
                continue;
            };
            subgraph.adjacency.insert(
                node.to_owned(),
                neighbors.iter().filter(|n| *n != forbidden).cloned().collect(),
            );
            for next in neighbors {
                if next != forbidden && !visited.contains(next.as_str()) {
                    queue.push_back(next.as_str());
                }
            }
        }
        subgraph
    }

    /// Enumerates every simple path from `start` to `end`, not just the
    /// shortest ones.
    ///
    /// Level-order exploration where each queue entry carries the full
    /// path walked so far; a neighbor already on the path is skipped, which
    /// is the only thing keeping cycles out. The queue grows combinatorially
    /// with graph density; the search is exhaustive on purpose.
    pub fn simple_paths(&self, start: &str, end: &str) -> Vec<Vec<String>> {
        if start == end {
            return vec![vec![start.to_owned()]];
        }

        let mut found = Vec::new();
        let mut queue: VecDeque<(String, Vec<String>)> = VecDeque::new();
        queue.push_back((start.to_owned(), vec![start.to_owned()]));

        while let Some((node, path)) = queue.pop_front() {
            for neighbor in self.neighbors(&node) {
                if path.iter().any(|seen| seen == neighbor) {
                    continue;
                }
                let mut extended = path.clone();
                extended.push(neighbor.clone());
                if neighbor == end {
                    found.push(extended);
                } else {
                    queue.push_back((neighbor.clone(), extended));
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Graph {
        let mut g = Graph::new();
        g.insert("A", &["B", "C"]);
        g.insert("B", &["D"]);
        g.insert("C", &["D"]);
        g.insert("D", &[]);
        g
    }

    fn ring_of_five() -> Graph {
        let mut g = Graph::new();
        g.insert("A", &["B", "E"]);
        g.insert("B", &["A", "C"]);
        g.insert("C", &["B", "D"]);
        g.insert("D", &["C", "E"]);
        g.insert("E", &["D", "A"]);
        g
    }

    #[test]
    fn partition_never_mentions_the_forbidden_node() {
        let g = ring_of_five();
        for seed in ["B", "E"] {
            let sub = g.partition("A", seed);
            assert!(!sub.contains("A"));
            for node in sub.nodes() {
                assert!(sub.neighbors(node).iter().all(|n| n != "A"));
            }
        }
    }

    #[test]
    fn partition_is_limited_to_reachable_nodes() {
        let mut g = diamond();
        g.insert("X", &["Y"]);
        g.insert("Y", &["X"]);

        let sub = g.partition("A", "B");
        assert!(sub.contains("B"));
        assert!(sub.contains("D"));
        assert!(!sub.contains("X"));
        assert!(!sub.contains("Y"));
    }

    #[test]
    fn partition_tolerates_dangling_neighbors() {
        let mut g = Graph::new();
        g.insert("A", &["B"]);
        g.insert("B", &["ghost"]);

        let sub = g.partition("A", "B");
        assert_eq!(sub.neighbors("B"), ["ghost".to_owned()]);
        assert!(!sub.contains("ghost"));
    }

    #[test]
    fn start_equals_end_is_the_single_node_path() {
        let g = diamond();
        assert_eq!(g.simple_paths("A", "A"), vec![vec!["A".to_owned()]]);
    }

    #[test]
    fn diamond_has_exactly_two_paths() {
        let mut paths = diamond().simple_paths("A", "D");
        paths.sort();
        assert_eq!(
            paths,
            vec![
                vec!["A".to_owned(), "B".to_owned(), "D".to_owned()],
                vec!["A".to_owned(), "C".to_owned(), "D".to_owned()],
            ]
        );
    }

    #[test]
    fn longer_paths_are_found_too() {
        let mut g = Graph::new();
        g.insert("A", &["B", "D"]);
        g.insert("B", &["C"]);
        g.insert("C", &["D"]);
        g.insert("D", &[]);

        let mut paths = g.simple_paths("A", "D");
        paths.sort();
        assert_eq!(
            paths,
            vec![
                vec!["A".to_owned(), "B".to_owned(), "C".to_owned(), "D".to_owned()],
                vec!["A".to_owned(), "D".to_owned()],
            ]
        );
    }

    #[test]
    fn every_path_is_simple_and_edge_valid() {
        let g = ring_of_five();
        let paths = g.simple_paths("A", "D");
        assert!(!paths.is_empty());
        for path in &paths {
            assert_eq!(path.first().map(String::as_str), Some("A"));
            assert_eq!(path.last().map(String::as_str), Some("D"));
            let mut seen = HashSet::new();
            assert!(path.iter().all(|node| seen.insert(node.clone())));
            for pair in path.windows(2) {
                assert!(g.neighbors(&pair[0]).contains(&pair[1]));
            }
        }
    }

    #[test]
    fn unreachable_end_yields_nothing() {
        let mut g = diamond();
        g.insert("Z", &[]);
        assert!(g.simple_paths("A", "Z").is_empty());
    }
}
