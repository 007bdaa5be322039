//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `TaskState`: the lifecycle of a single page task (pending, claimed, fetching, ...)

mod task_state;

// Re-export main types
pub use task_state::TaskState;
