//! Incremental re-parse cache and virtual scheme substitution.
//!
//! Two independent structures driven by the same parser pass:
//!
//! * [`tree`]: a line-indexed tree of cached parse results. A lookup finds
//!   the deepest cached scheme invocation covering a line, so an edit only
//!   forces re-parsing from the affected region.
//! * [`stack`]: the stack of virtual entry vectors contributed by active
//!   scheme invocations, resolving which concrete scheme a virtual reference
//!   denotes. Its shape can be snapshotted and restored to resume inside a
//!   cached region without replaying the enclosing invocations.
//!
//! [`document`] pairs the two for a single document. Both structures are
//! single-threaded; documents parsed concurrently each own their own
//! instances.

pub mod config;
pub mod document;
pub mod error;
pub mod stack;
pub mod tree;

pub use config::ParseCacheCfg;
pub use document::{DocumentCache, ResumePoint};
pub use error::{CacheError, Result};
pub use stack::{FrameId, Resolution, StackSnapshot, VirtualSubstitutionStack};
pub use tree::{CacheEntry, CacheNode, Lookup, NodeId, ParseCacheTree, Siblings};
