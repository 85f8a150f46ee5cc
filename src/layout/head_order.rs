use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::{LinearGraph, NodeIndex};

/// Rank of one node under a head-priority layout. Nodes named by the
/// priority list sort by their position in it and come before everything
/// else; the rest fall back to plain commit id order, which keeps the
/// comparator total for arbitrarily incomplete lists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum LayoutKey {
    Priority(usize),
    Fallback(String),
}

/// Deterministic total order over the nodes of one graph, derived from a
/// branch-head priority list.
///
/// Used by the Bek sorter to decide which of several simultaneously ready
/// branch heads is explored first. The order is precomputed per node at
/// construction, so comparisons are cheap and never touch the graph again.
pub struct HeadOrder {
    keys: Vec<LayoutKey>,
}

impl HeadOrder {
    pub fn new(graph: &impl LinearGraph, heads: &[impl AsRef<str>]) -> Self {
        let positions: HashMap<&str, usize> = heads
            .iter()
            .enumerate()
            .map(|(position, id)| (id.as_ref(), position))
            .collect();

        let keys = (0..graph.node_count())
            .map(|index| {
                let node = graph.node_at(index);
                match positions.get(node.id.as_str()) {
                    Some(&position) => LayoutKey::Priority(position),
                    None => LayoutKey::Fallback(node.id),
                }
            })
            .collect();
        Self { keys }
    }

    /// Order without any head priority: plain commit id order.
    pub fn unprioritized(graph: &impl LinearGraph) -> Self {
        Self::new(graph, &[] as &[&str])
    }

    /// Compare two node indices of the graph this order was built for.
    /// Panics when asked about an index the layout cannot resolve, which is
    /// a programming error in the caller, not a data condition.
    pub fn cmp(&self, a: NodeIndex, b: NodeIndex) -> Ordering {
        self.key(a).cmp(self.key(b))
    }

    fn key(&self, index: NodeIndex) -> &LayoutKey {
        self.keys.get(index).unwrap_or_else(|| {
            panic!(
                "head order cannot resolve node {index}: graph has {} nodes",
                self.keys.len()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GraphBuilder;

    fn two_roots() -> crate::core::PermanentLinearGraph {
        let mut builder = GraphBuilder::new();
        builder.node("beta", []);
        builder.node("alpha", []);
        builder.build().unwrap()
    }

    #[test]
    fn priority_list_wins_over_id_order() {
        let graph = two_roots();
        let order = HeadOrder::new(&graph, &["beta", "alpha"]);
        // "beta" sits at index 0, "alpha" at index 1
        assert_eq!(order.cmp(0, 1), Ordering::Less);
        assert_eq!(order.cmp(1, 0), Ordering::Greater);
        assert_eq!(order.cmp(1, 1), Ordering::Equal);
    }

    #[test]
    fn absent_ids_fall_back_to_commit_id_order() {
        let graph = two_roots();
        let order = HeadOrder::unprioritized(&graph);
        // "alpha" < "beta" even though it is declared second
        assert_eq!(order.cmp(1, 0), Ordering::Less);
    }

    #[test]
    fn listed_node_sorts_before_unlisted() {
        let graph = two_roots();
        let order = HeadOrder::new(&graph, &["beta"]);
        assert_eq!(order.cmp(0, 1), Ordering::Less);
    }

    #[test]
    #[should_panic(expected = "cannot resolve")]
    fn unresolvable_index_is_a_contract_violation() {
        let graph = two_roots();
        HeadOrder::unprioritized(&graph).cmp(0, 9);
    }
}
