use super::node::NodeIndex;

/// Opaque token identifying the virtual side of an arrow edge. The library
/// never interprets it, only carries it through view translations unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeToken(pub i64);

/// Discriminant of [`GraphEdge`], convenient for filtering and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Normal,
    Collapsed,
    ArrowUp,
    ArrowDown,
    NotLoaded,
}

/// An edge of a linear graph.
///
/// Normal and Collapsed edges connect two materialized nodes and keep the
/// invariant `up < down`: the upper endpoint is the ancestor in display
/// order. Arrow edges have exactly one materialized endpoint, the other side
/// lies outside the visible node range and is identified by an [`EdgeToken`].
/// NotLoaded edges point down at a commit that has no node yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphEdge {
    /// Parent/child edge between two loaded commits.
    Normal { up: NodeIndex, down: NodeIndex },
    /// Substitute for a hidden chain of real edges.
    Collapsed { up: NodeIndex, down: NodeIndex },
    /// The upper side is virtual, above the visible range.
    ArrowUp { down: NodeIndex, token: EdgeToken },
    /// The lower side is virtual, below the visible range.
    ArrowDown { up: NodeIndex, token: EdgeToken },
    /// The lower side names a commit with no materialized node.
    NotLoaded { up: NodeIndex, commit: String },
}

impl GraphEdge {
    pub fn kind(&self) -> EdgeKind {
        match self {
            GraphEdge::Normal { .. } => EdgeKind::Normal,
            GraphEdge::Collapsed { .. } => EdgeKind::Collapsed,
            GraphEdge::ArrowUp { .. } => EdgeKind::ArrowUp,
            GraphEdge::ArrowDown { .. } => EdgeKind::ArrowDown,
            GraphEdge::NotLoaded { .. } => EdgeKind::NotLoaded,
        }
    }

    /// Upper endpoint, if materialized.
    pub fn up(&self) -> Option<NodeIndex> {
        match *self {
            GraphEdge::Normal { up, .. }
            | GraphEdge::Collapsed { up, .. }
            | GraphEdge::ArrowDown { up, .. }
            | GraphEdge::NotLoaded { up, .. } => Some(up),
            GraphEdge::ArrowUp { .. } => None,
        }
    }

    /// Lower endpoint, if materialized.
    pub fn down(&self) -> Option<NodeIndex> {
        match *self {
            GraphEdge::Normal { down, .. }
            | GraphEdge::Collapsed { down, .. }
            | GraphEdge::ArrowUp { down, .. } => Some(down),
            GraphEdge::ArrowDown { .. } | GraphEdge::NotLoaded { .. } => None,
        }
    }

    /// True for edges with two materialized endpoints (Normal and Collapsed).
    pub fn is_normal_edge(&self) -> bool {
        matches!(self, GraphEdge::Normal { .. } | GraphEdge::Collapsed { .. })
    }

    /// Both endpoints as `(up, down)`, for normal edges only.
    pub fn endpoints(&self) -> Option<(NodeIndex, NodeIndex)> {
        match *self {
            GraphEdge::Normal { up, down } | GraphEdge::Collapsed { up, down } => Some((up, down)),
            _ => None,
        }
    }
}
