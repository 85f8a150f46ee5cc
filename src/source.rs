use chrono::{DateTime, Utc};

use crate::core::NodeIndex;

/// What a commit loader hands over per commit: a stable id, the parent ids
/// used to build downward edges, and a monotonic-enough timestamp.
#[derive(Debug, Clone)]
pub struct CommitData {
    /// Unique commit id (SHA)
    pub id: String,
    /// Parent commit ids
    pub parents: Vec<String>,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

impl CommitData {
    pub fn new(id: impl Into<String>, parents: Vec<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            parents,
            timestamp,
        }
    }

    pub fn root(id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(id, Vec::new(), timestamp)
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Per-node timestamp accessor, indexed like the graph the timestamps were
/// loaded with.
pub trait TimestampSource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn timestamp_at(&self, index: NodeIndex) -> i64;
}

impl TimestampSource for [i64] {
    fn len(&self) -> usize {
        <[i64]>::len(self)
    }

    fn timestamp_at(&self, index: NodeIndex) -> i64 {
        self[index]
    }
}

impl TimestampSource for Vec<i64> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn timestamp_at(&self, index: NodeIndex) -> i64 {
        self[index]
    }
}

/// Timestamp table captured from a commit slice, in the same order the graph
/// was built from it.
#[derive(Debug, Clone)]
pub struct CommitTimestamps(Vec<i64>);

impl CommitTimestamps {
    pub fn from_commits(commits: &[CommitData]) -> Self {
        Self(
            commits
                .iter()
                .map(|commit| commit.timestamp.timestamp())
                .collect(),
        )
    }
}

impl TimestampSource for CommitTimestamps {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn timestamp_at(&self, index: NodeIndex) -> i64 {
        self.0[index]
    }
}
