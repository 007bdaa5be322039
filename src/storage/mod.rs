//! Storage layer for Ripple-Mirror
//!
//! The crawler only writes files into the mirror tree; it never reads them
//! back. Keeping the filesystem behind [`MirrorStore`] lets the crawl run
//! against any backend that can create directories and write bytes.

mod fs;
mod traits;

pub use fs::FsStore;
pub use traits::{MirrorStore, StorageError, StorageResult};
