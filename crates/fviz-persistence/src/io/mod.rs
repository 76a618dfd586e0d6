//! File I/O for cache snapshots.
//!
//! This module handles:
//! - Writing snapshots with atomic replace
//! - Reading snapshots with envelope and version checks

mod load;
mod save;

pub use load::read_snapshot;
pub use save::write_snapshot;
