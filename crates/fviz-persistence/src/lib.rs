//! State cache for fviz.
//!
//! Persists the [`ViewerMetadata`](fviz_model::ViewerMetadata) projection of
//! a viewer session so another process can pick it up.
//!
//! # Features
//!
//! - **JSON envelopes** carrying schema version, key, and save time
//! - **Atomic writes**: temp file, fsync, rename; the temp file is removed on
//!   every failure path
//! - **Keys**: validated file stems, a per-process session key, and
//!   content-derived keys (SHA-256 over input paths and sizes)
//!
//! # File Format
//!
//! ```text
//! {
//!   "schema_version": 1,
//!   "key": "session-20250101T120000-4242",
//!   "saved_at": "2025-01-01T12:00:00Z",
//!   "metadata": { ... }
//! }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use fviz_persistence::{Cache, session_key};
//!
//! let cache = Cache::default_location();
//! cache.save(session_key(), &metadata)?;
//! let restored = cache.load(session_key())?;
//! ```

mod cache;
mod error;
mod io;
mod key;
mod snapshot;

pub use cache::Cache;
pub use error::{CacheError, Result};
pub use io::{read_snapshot, write_snapshot};
pub use key::{derive_key, session_key, validate_key};
pub use snapshot::{CURRENT_SCHEMA_VERSION, CacheSnapshot};
