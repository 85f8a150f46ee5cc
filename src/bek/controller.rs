use crate::core::{GraphEdge, GraphNode, LinearGraph, NodeIndex};
use crate::error::{GraphError, Result};
use crate::layout::HeadOrder;
use crate::source::TimestampSource;

use super::sorter::BekPermutation;

/// Read-only view exposing a wrapped graph in Bek order.
///
/// Nothing is copied: every read translates indices through the permutation
/// on the fly. The permutation does not guarantee that an edge's original
/// upper endpoint stays the smaller one, so normal edges get their up/down
/// sides re-derived per read instead of relabeled. Holds no mutable state
/// after construction and can be shared across readers.
pub struct BekGraphController<G> {
    graph: G,
    permutation: BekPermutation,
}

impl<G: LinearGraph> BekGraphController<G> {
    pub fn new(graph: G, permutation: BekPermutation) -> Result<Self> {
        if permutation.len() != graph.node_count() {
            return Err(GraphError::Integrity(format!(
                "permutation of {} entries applied to graph of {} nodes",
                permutation.len(),
                graph.node_count()
            )));
        }
        Ok(Self { graph, permutation })
    }

    /// Compute the Bek permutation for `graph` and wrap it in one step.
    pub fn bek_sorted(
        graph: G,
        heads: &HeadOrder,
        timestamps: &impl TimestampSource,
    ) -> Result<Self> {
        let permutation = BekPermutation::compute(&graph, heads, timestamps)?;
        Self::new(graph, permutation)
    }

    pub fn permutation(&self) -> &BekPermutation {
        &self.permutation
    }

    pub fn into_inner(self) -> G {
        self.graph
    }

    fn translate(&self, edge: GraphEdge) -> GraphEdge {
        match edge {
            GraphEdge::Normal { up, down } => {
                let (a, b) = (self.permutation.to_bek(up), self.permutation.to_bek(down));
                GraphEdge::Normal {
                    up: a.min(b),
                    down: a.max(b),
                }
            }
            GraphEdge::Collapsed { up, down } => {
                let (a, b) = (self.permutation.to_bek(up), self.permutation.to_bek(down));
                GraphEdge::Collapsed {
                    up: a.min(b),
                    down: a.max(b),
                }
            }
            GraphEdge::ArrowUp { down, token } => GraphEdge::ArrowUp {
                down: self.permutation.to_bek(down),
                token,
            },
            GraphEdge::ArrowDown { up, token } => GraphEdge::ArrowDown {
                up: self.permutation.to_bek(up),
                token,
            },
            GraphEdge::NotLoaded { up, commit } => GraphEdge::NotLoaded {
                up: self.permutation.to_bek(up),
                commit,
            },
        }
    }
}

impl<G: LinearGraph> LinearGraph for BekGraphController<G> {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn node_at(&self, index: NodeIndex) -> GraphNode {
        let node = self.graph.node_at(self.permutation.to_original(index));
        GraphNode { index, ..node }
    }

    fn index_of_commit(&self, id: &str) -> Option<NodeIndex> {
        self.graph
            .index_of_commit(id)
            .map(|index| self.permutation.to_bek(index))
    }

    fn adjacent_edges(&self, index: NodeIndex) -> Vec<GraphEdge> {
        self.graph
            .adjacent_edges(self.permutation.to_original(index))
            .into_iter()
            .map(|edge| self.translate(edge))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EdgeSpec, EdgeToken, GraphBuilder, NodeKind, PermanentLinearGraph};

    fn swapped_pair() -> BekGraphController<PermanentLinearGraph> {
        let mut builder = GraphBuilder::new();
        builder.node("x", []);
        builder.node_of_kind(
            "y",
            NodeKind::Normal,
            [
                EdgeSpec::ArrowUp(EdgeToken(-3)),
                EdgeSpec::not_loaded("gone"),
            ],
        );
        let graph = builder.build().unwrap();
        let permutation = BekPermutation::from_forward(vec![1, 0]).unwrap();
        BekGraphController::new(graph, permutation).unwrap()
    }

    #[test]
    fn nodes_are_relabeled_with_the_view_index() {
        let view = swapped_pair();
        let top = view.node_at(0);
        assert_eq!(top.id, "y");
        assert_eq!(top.index, 0);
        assert_eq!(view.node_at(1).id, "x");
        assert_eq!(view.index_of_commit("x"), Some(1));
        assert_eq!(view.index_of_commit("y"), Some(0));
    }

    #[test]
    fn single_endpoint_edges_translate_their_real_side_only() {
        let view = swapped_pair();
        let edges = view.adjacent_edges(0);
        assert!(edges.contains(&GraphEdge::ArrowUp {
            down: 0,
            token: EdgeToken(-3)
        }));
        assert!(edges.contains(&GraphEdge::NotLoaded {
            up: 0,
            commit: "gone".to_string()
        }));
    }

    #[test]
    fn normal_edges_rederive_up_and_down() {
        let mut builder = GraphBuilder::new();
        builder.node("a", [EdgeSpec::to("b")]);
        builder.node("b", []);
        let graph = builder.build().unwrap();
        // reversing the nodes swaps which endpoint is the upper one
        let view =
            BekGraphController::new(graph, BekPermutation::from_forward(vec![1, 0]).unwrap())
                .unwrap();

        assert_eq!(
            view.adjacent_edges(0),
            vec![GraphEdge::Normal { up: 0, down: 1 }]
        );
        assert_eq!(view.node_at(0).id, "b");
        assert_eq!(view.node_at(1).id, "a");
    }

    #[test]
    fn size_mismatch_is_an_integrity_error() {
        let mut builder = GraphBuilder::new();
        builder.node("only", []);
        let graph = builder.build().unwrap();
        let permutation = BekPermutation::from_forward(vec![1, 0]).unwrap();
        assert!(matches!(
            BekGraphController::new(graph, permutation),
            Err(GraphError::Integrity(_))
        ));
    }
}
