//! Task state definitions for tracking page processing
//!
//! Every page task walks `Pending → Claimed → Fetching → Writing → Expanding → Done`,
//! or leaves early through `Skipped` or `Failed`.
use crate::MirrorError;
use std::fmt;

/// Represents the current state of a page task in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Active States =====
    /// Task created with a URL and remaining depth
    Pending,

    /// URL claimed in the visited registry by this task
    Claimed,

    /// Holding a worker slot while the page is fetched and parsed
    Fetching,

    /// Page body being persisted to the mirror
    Writing,

    /// Spawning resource downloads and child page tasks
    Expanding,

    // ===== Terminal States =====
    /// Page saved and every child task handed to the completion tracker
    Done,

    /// Depth exhausted, URL already claimed, or crawl cancelled before fetching
    Skipped,

    /// Fetch, parse or write failed; this branch ends here
    Failed,
}

impl TaskState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Skipped | Self::Failed)
    }

    /// Returns true if the task holds a worker slot in this state
    pub fn holds_worker_slot(&self) -> bool {
        matches!(self, Self::Fetching)
    }

    /// Returns true if moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        use TaskState::*;

        matches!(
            (self, next),
            (Pending, Claimed)
                | (Pending, Skipped)
                | (Claimed, Fetching)
                | (Claimed, Skipped)
                | (Fetching, Writing)
                | (Fetching, Failed)
                | (Fetching, Skipped)
                | (Writing, Expanding)
                | (Writing, Failed)
                | (Writing, Skipped)
                | (Expanding, Done)
        )
    }

    /// Moves to `next`, refusing transitions the lifecycle does not allow
    pub fn transition(self, next: TaskState) -> Result<TaskState, MirrorError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(MirrorError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Short lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Claimed => "claimed",
            Self::Fetching => "fetching",
            Self::Writing => "writing",
            Self::Expanding => "expanding",
            Self::Done => "done",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
