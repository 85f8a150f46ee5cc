/// Position of a node in some linear view of the graph. Smaller index renders
/// nearer the top.
pub type NodeIndex = usize;

/// Kind of a node in a linear graph view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A real, loaded commit.
    Normal,
    /// Placeholder standing in for a hidden run of intermediate commits.
    Collapsed,
    /// A commit referenced by the graph but not fetched yet.
    NotLoaded,
}

/// A node as seen through a particular [`LinearGraph`](crate::LinearGraph)
/// view.
///
/// The commit id is immutable and globally unique; `index` belongs to the
/// view that produced the node, so the same commit can surface with different
/// indices through different views over one commit set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphNode {
    pub id: String,
    pub index: NodeIndex,
    pub kind: NodeKind,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, index: NodeIndex, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            index,
            kind,
        }
    }
}
