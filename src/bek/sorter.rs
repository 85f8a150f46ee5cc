use std::cmp::Reverse;
use std::collections::BinaryHeap;

use smallvec::SmallVec;
use tracing::debug;

use crate::core::{LinearGraph, NodeIndex};
use crate::error::{GraphError, Result};
use crate::layout::HeadOrder;
use crate::source::TimestampSource;

/// Bijection `original index -> bek index`, valid only for the exact graph
/// snapshot it was computed from. Recompute when the underlying commit set
/// changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BekPermutation {
    forward: Vec<NodeIndex>,
    inverse: Vec<NodeIndex>,
}

impl BekPermutation {
    /// Re-linearize `graph` so that runs of commits on one line of
    /// development stay consecutive, without ever placing a node above one
    /// of its display ancestors.
    ///
    /// List scheduling over the DAG: a node is ready once every upper
    /// endpoint of its Normal/Collapsed in-edges has been emitted. The most
    /// recently emitted node continues its chain through a just-unblocked
    /// descendant whenever one exists; otherwise the smallest ready node
    /// starts a new chain. Ties are broken by head-priority layout, then
    /// ascending commit id, then ascending timestamp.
    pub fn compute(
        graph: &impl LinearGraph,
        heads: &HeadOrder,
        timestamps: &impl TimestampSource,
    ) -> Result<Self> {
        let count = graph.node_count();
        if timestamps.len() != count {
            return Err(GraphError::Integrity(format!(
                "timestamp table covers {} nodes, graph has {count}",
                timestamps.len()
            )));
        }
        debug!(nodes = count, "computing bek permutation");

        // Blocker countdown and downward neighbors, over normal edges only.
        // Arrow and not-loaded edges have no second materialized endpoint
        // and never block scheduling.
        let mut pending = vec![0usize; count];
        let mut descendants: Vec<SmallVec<[NodeIndex; 2]>> = vec![SmallVec::new(); count];
        for index in 0..count {
            for edge in graph.adjacent_edges(index) {
                if let Some((up, down)) = edge.endpoints() {
                    // each edge is adjacent to both ends; count it once
                    if up == index {
                        pending[down] += 1;
                        descendants[index].push(down);
                    }
                }
            }
        }

        let ranks = tie_break_ranks(graph, heads, timestamps);

        let mut ready: BinaryHeap<Reverse<(usize, NodeIndex)>> = (0..count)
            .filter(|&index| pending[index] == 0)
            .map(|index| Reverse((ranks[index], index)))
            .collect();

        let mut forward = vec![usize::MAX; count];
        let mut inverse = Vec::with_capacity(count);
        let mut chained: Option<NodeIndex> = None;

        while inverse.len() < count {
            let current = match chained.take() {
                Some(node) => node,
                None => match ready.pop() {
                    Some(Reverse((_, node))) => node,
                    None => {
                        return Err(GraphError::Cyclic {
                            remaining: count - inverse.len(),
                        })
                    }
                },
            };
            forward[current] = inverse.len();
            inverse.push(current);

            // Descendants unblocked by this emission compete to continue the
            // chain; the best of them runs next, the rest become ready.
            for &down in &descendants[current] {
                pending[down] -= 1;
                if pending[down] > 0 {
                    continue;
                }
                match chained {
                    None => chained = Some(down),
                    Some(best) if ranks[down] < ranks[best] => {
                        ready.push(Reverse((ranks[best], best)));
                        chained = Some(down);
                    }
                    Some(_) => ready.push(Reverse((ranks[down], down))),
                }
            }
        }

        let permutation = Self { forward, inverse };
        debug!(identity = permutation.is_identity(), "bek permutation ready");
        Ok(permutation)
    }

    /// Wrap an externally produced mapping, verifying it is a bijection over
    /// `0..len`.
    pub fn from_forward(forward: Vec<NodeIndex>) -> Result<Self> {
        let mut inverse = vec![usize::MAX; forward.len()];
        for (original, &bek) in forward.iter().enumerate() {
            if bek >= forward.len() || inverse[bek] != usize::MAX {
                return Err(GraphError::Integrity(format!(
                    "mapping of {} entries is not a permutation at original index {original}",
                    forward.len()
                )));
            }
            inverse[bek] = original;
        }
        Ok(Self { forward, inverse })
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn to_bek(&self, original: NodeIndex) -> NodeIndex {
        self.forward[original]
    }

    pub fn to_original(&self, bek: NodeIndex) -> NodeIndex {
        self.inverse[bek]
    }

    pub fn is_identity(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &bek)| i == bek)
    }
}

/// Position of every node in the fixed tie-break order: head-priority layout
/// first, then ascending commit id, then ascending timestamp.
fn tie_break_ranks(
    graph: &impl LinearGraph,
    heads: &HeadOrder,
    timestamps: &impl TimestampSource,
) -> Vec<usize> {
    let ids: Vec<String> = (0..graph.node_count())
        .map(|index| graph.node_at(index).id)
        .collect();

    let mut by_key: Vec<NodeIndex> = (0..graph.node_count()).collect();
    by_key.sort_by(|&a, &b| {
        heads
            .cmp(a, b)
            .then_with(|| ids[a].cmp(&ids[b]))
            .then_with(|| timestamps.timestamp_at(a).cmp(&timestamps.timestamp_at(b)))
    });

    let mut ranks = vec![0usize; by_key.len()];
    for (rank, &index) in by_key.iter().enumerate() {
        ranks[index] = rank;
    }
    ranks
}
