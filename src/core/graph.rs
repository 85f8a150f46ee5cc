use std::collections::HashMap;

use smallvec::SmallVec;
use tracing::debug;

use super::edge::{EdgeToken, GraphEdge};
use super::node::{GraphNode, NodeIndex, NodeKind};
use crate::error::{GraphError, Result};
use crate::source::CommitData;

/// Read contract over a linearized commit DAG indexed `0..node_count()`.
///
/// Every view over a commit set implements this: the permanent graph built
/// from loaded commits as well as derived views such as the Bek-reordered
/// one. Views are immutable once built and never mutate each other, so any
/// of them can be shared across threads freely.
pub trait LinearGraph {
    fn node_count(&self) -> usize;

    /// Node at `index` in this view. Panics if `index` is out of
    /// `[0, node_count())`; passing an invalid index is a caller bug.
    fn node_at(&self, index: NodeIndex) -> GraphNode;

    /// Index of the given commit in this view, or `None` when the commit has
    /// no materialized node (e.g. it is only referenced by an arrow or
    /// not-loaded edge).
    fn index_of_commit(&self, id: &str) -> Option<NodeIndex>;

    /// All edges touching `index`, unordered and without duplicates. Normal
    /// and Collapsed edges are retrievable from both endpoints.
    fn adjacent_edges(&self, index: NodeIndex) -> Vec<GraphEdge>;
}

/// Outgoing edge of a node under construction, target given by commit id
/// where one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeSpec {
    Normal(String),
    Collapsed(String),
    ArrowUp(EdgeToken),
    ArrowDown(EdgeToken),
    NotLoaded(String),
}

impl EdgeSpec {
    /// Normal edge down to the node carrying `id`.
    pub fn to(id: impl Into<String>) -> Self {
        EdgeSpec::Normal(id.into())
    }

    /// Collapsed edge down to the node carrying `id`.
    pub fn collapsed(id: impl Into<String>) -> Self {
        EdgeSpec::Collapsed(id.into())
    }

    /// Edge to a commit that has no node yet.
    pub fn not_loaded(commit: impl Into<String>) -> Self {
        EdgeSpec::NotLoaded(commit.into())
    }
}

struct NodeSpec {
    id: String,
    kind: NodeKind,
    edges: Vec<EdgeSpec>,
}

/// Declarative construction of a [`PermanentLinearGraph`].
///
/// Nodes are declared top to bottom; the declaration order becomes the
/// display index. Each node lists its downward edges, so a Normal or
/// Collapsed target must be declared *after* the node referencing it.
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<NodeSpec>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the next node with its downward edges.
    pub fn node(&mut self, id: impl Into<String>, edges: impl IntoIterator<Item = EdgeSpec>) {
        self.node_of_kind(id, NodeKind::Normal, edges)
    }

    pub fn node_of_kind(
        &mut self,
        id: impl Into<String>,
        kind: NodeKind,
        edges: impl IntoIterator<Item = EdgeSpec>,
    ) {
        self.nodes.push(NodeSpec {
            id: id.into(),
            kind,
            edges: edges.into_iter().collect(),
        });
    }

    /// Validate the declaration and freeze it into a graph.
    pub fn build(self) -> Result<PermanentLinearGraph> {
        let mut index_by_id = HashMap::with_capacity(self.nodes.len());
        for (index, spec) in self.nodes.iter().enumerate() {
            if index_by_id.insert(spec.id.clone(), index).is_some() {
                return Err(GraphError::Integrity(format!(
                    "duplicate commit id {:?}",
                    spec.id
                )));
            }
        }

        let mut adjacency: Vec<SmallVec<[GraphEdge; 3]>> =
            vec![SmallVec::new(); self.nodes.len()];
        let mut edge_count = 0usize;
        for (index, spec) in self.nodes.iter().enumerate() {
            for edge_spec in &spec.edges {
                let edge = match edge_spec {
                    EdgeSpec::Normal(target) | EdgeSpec::Collapsed(target) => {
                        let down = *index_by_id.get(target).ok_or_else(|| {
                            GraphError::Integrity(format!(
                                "edge from {:?} points at unknown commit {:?}",
                                spec.id, target
                            ))
                        })?;
                        if index >= down {
                            return Err(GraphError::Integrity(format!(
                                "edge from {:?} (index {index}) to {:?} (index {down}) does not point downward",
                                spec.id, target
                            )));
                        }
                        let edge = match edge_spec {
                            EdgeSpec::Normal(_) => GraphEdge::Normal { up: index, down },
                            _ => GraphEdge::Collapsed { up: index, down },
                        };
                        if adjacency[index].contains(&edge) {
                            return Err(GraphError::Integrity(format!(
                                "duplicate edge from {:?} to {:?}",
                                spec.id, target
                            )));
                        }
                        // registered under both endpoints
                        adjacency[down].push(edge.clone());
                        edge
                    }
                    // the declaring node is the single real endpoint
                    EdgeSpec::ArrowUp(token) => GraphEdge::ArrowUp {
                        down: index,
                        token: *token,
                    },
                    EdgeSpec::ArrowDown(token) => GraphEdge::ArrowDown {
                        up: index,
                        token: *token,
                    },
                    EdgeSpec::NotLoaded(commit) => GraphEdge::NotLoaded {
                        up: index,
                        commit: commit.clone(),
                    },
                };
                adjacency[index].push(edge);
                edge_count += 1;
            }
        }

        debug!(
            nodes = self.nodes.len(),
            edges = edge_count,
            "built permanent linear graph"
        );

        Ok(PermanentLinearGraph {
            nodes: self
                .nodes
                .into_iter()
                .map(|spec| (spec.id, spec.kind))
                .collect(),
            index_by_id,
            adjacency,
        })
    }
}

/// Canonical, immutable linear view of a loaded commit DAG.
#[derive(Debug)]
pub struct PermanentLinearGraph {
    nodes: Vec<(String, NodeKind)>,
    index_by_id: HashMap<String, NodeIndex>,
    adjacency: Vec<SmallVec<[GraphEdge; 3]>>,
}

impl PermanentLinearGraph {
    /// Build a graph straight from a commit source, slice order = display
    /// order (newest first). Parents that resolve to a node in the slice
    /// become Normal edges; parents outside it become NotLoaded edges. A
    /// parent listed above its child violates the topological numbering and
    /// fails with an integrity error.
    pub fn from_commits(commits: &[CommitData]) -> Result<Self> {
        let known: HashMap<&str, NodeIndex> = commits
            .iter()
            .enumerate()
            .map(|(index, commit)| (commit.id.as_str(), index))
            .collect();

        let mut builder = GraphBuilder::new();
        for commit in commits {
            let edges: Vec<EdgeSpec> = commit
                .parents
                .iter()
                .map(|parent| {
                    if known.contains_key(parent.as_str()) {
                        EdgeSpec::to(parent)
                    } else {
                        EdgeSpec::not_loaded(parent)
                    }
                })
                .collect();
            builder.node(&commit.id, edges);
        }
        builder.build()
    }
}

impl LinearGraph for PermanentLinearGraph {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_at(&self, index: NodeIndex) -> GraphNode {
        let (id, kind) = self
            .nodes
            .get(index)
            .unwrap_or_else(|| {
                panic!(
                    "node index {index} out of range for graph of {} nodes",
                    self.nodes.len()
                )
            })
            .clone();
        GraphNode { id, index, kind }
    }

    fn index_of_commit(&self, id: &str) -> Option<NodeIndex> {
        self.index_by_id.get(id).copied()
    }

    fn adjacent_edges(&self, index: NodeIndex) -> Vec<GraphEdge> {
        self.adjacency
            .get(index)
            .unwrap_or_else(|| {
                panic!(
                    "node index {index} out of range for graph of {} nodes",
                    self.nodes.len()
                )
            })
            .to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn diamond() -> PermanentLinearGraph {
        // m -> {a, b}, a -> base, b -> base
        let mut builder = GraphBuilder::new();
        builder.node("m", [EdgeSpec::to("a"), EdgeSpec::to("b")]);
        builder.node("a", [EdgeSpec::to("base")]);
        builder.node("b", [EdgeSpec::to("base")]);
        builder.node("base", []);
        builder.build().unwrap()
    }

    #[test]
    fn nodes_keep_declaration_order() {
        let graph = diamond();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.node_at(0).id, "m");
        assert_eq!(graph.node_at(3).id, "base");
        assert_eq!(graph.node_at(2).kind, NodeKind::Normal);
        assert_eq!(graph.index_of_commit("b"), Some(2));
        assert_eq!(graph.index_of_commit("nope"), None);
    }

    #[test]
    fn normal_edges_visible_from_both_endpoints() {
        let graph = diamond();
        let edge = GraphEdge::Normal { up: 0, down: 1 };
        assert!(graph.adjacent_edges(0).contains(&edge));
        assert!(graph.adjacent_edges(1).contains(&edge));
        // base is the sink of two edges
        assert_eq!(graph.adjacent_edges(3).len(), 2);
    }

    #[test]
    fn dangling_edge_target_is_rejected() {
        let mut builder = GraphBuilder::new();
        builder.node("a", [EdgeSpec::to("missing")]);
        let err = builder.build().unwrap_err();
        assert!(matches!(err, GraphError::Integrity(_)), "got {err:?}");
    }

    #[test]
    fn upward_edge_is_rejected() {
        let mut builder = GraphBuilder::new();
        builder.node("top", []);
        builder.node("bottom", [EdgeSpec::to("top")]);
        assert!(matches!(
            builder.build(),
            Err(GraphError::Integrity(_))
        ));
    }

    #[test]
    fn self_edge_is_rejected() {
        let mut builder = GraphBuilder::new();
        builder.node("a", [EdgeSpec::to("a")]);
        assert!(matches!(
            builder.build(),
            Err(GraphError::Integrity(_))
        ));
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let mut builder = GraphBuilder::new();
        builder.node("a", []);
        builder.node("a", []);
        assert!(matches!(
            builder.build(),
            Err(GraphError::Integrity(_))
        ));
    }

    #[test]
    fn arrow_and_not_loaded_edges_stay_on_their_real_endpoint() {
        let mut builder = GraphBuilder::new();
        builder.node_of_kind("head", NodeKind::Normal, [EdgeSpec::to("tail")]);
        builder.node_of_kind(
            "tail",
            NodeKind::Collapsed,
            [
                EdgeSpec::ArrowDown(EdgeToken(-1)),
                EdgeSpec::not_loaded("faraway"),
            ],
        );
        let graph = builder.build().unwrap();

        let edges = graph.adjacent_edges(1);
        assert_eq!(edges.len(), 3);
        assert!(edges.contains(&GraphEdge::ArrowDown {
            up: 1,
            token: EdgeToken(-1)
        }));
        assert!(edges.contains(&GraphEdge::NotLoaded {
            up: 1,
            commit: "faraway".to_string()
        }));
        // the referenced-but-absent commit has no index
        assert_eq!(graph.index_of_commit("faraway"), None);
        assert_eq!(graph.node_at(1).kind, NodeKind::Collapsed);
    }

    #[test]
    fn from_commits_builds_normal_and_not_loaded_edges() {
        let now = Utc::now();
        let commits = vec![
            CommitData::new("c", vec!["b".to_string()], now),
            CommitData::new("b", vec!["a".to_string(), "truncated".to_string()], now),
            CommitData::new("a", vec![], now),
        ];
        let graph = PermanentLinearGraph::from_commits(&commits).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert!(graph
            .adjacent_edges(1)
            .contains(&GraphEdge::Normal { up: 1, down: 2 }));
        assert!(graph.adjacent_edges(1).contains(&GraphEdge::NotLoaded {
            up: 1,
            commit: "truncated".to_string()
        }));
    }

    #[test]
    fn from_commits_rejects_parent_above_child() {
        let now = Utc::now();
        let commits = vec![
            CommitData::new("parent", vec![], now),
            CommitData::new("child", vec!["parent".to_string()], now),
        ];
        assert!(matches!(
            PermanentLinearGraph::from_commits(&commits),
            Err(GraphError::Integrity(_))
        ));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn node_at_out_of_range_panics() {
        diamond().node_at(42);
    }
}
