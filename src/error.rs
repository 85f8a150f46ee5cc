use thiserror::Error;

/// Failures that invalidate a graph snapshot.
///
/// Both variants are fatal to the snapshot they were raised for: reordering
/// is deterministic and pure, so retrying with the same input reproduces the
/// same failure. Out-of-range node access and unresolvable layout lookups are
/// caller bugs and panic instead of returning an error.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Malformed input graph: a dangling edge target, a duplicate commit id,
    /// or an edge that does not point from a smaller display index down to a
    /// larger one.
    #[error("malformed commit graph: {0}")]
    Integrity(String),

    /// The Bek scheduler stalled with nodes left unemitted, which means the
    /// history graph is not a DAG. Correctly loaded commit data can never
    /// trigger this.
    #[error("history graph is not a DAG: {remaining} node(s) never became ready")]
    Cyclic { remaining: usize },
}

pub type Result<T> = std::result::Result<T, GraphError>;
