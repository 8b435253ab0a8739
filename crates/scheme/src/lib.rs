//! Scheme identities and virtual entry declarations.
//!
//! The parse cache never looks inside a scheme. It only needs two things from
//! the scheme model:
//!
//! * an opaque, comparable identity ([`SchemeId`]) to tag cached results and
//!   to resolve virtual references against, and
//! * the ordered [`VirtualEntries`] a scheme invocation contributes to the
//!   substitution stack.
//!
//! [`SchemeRegistry`] is the smallest producer of both that a parser driver
//! (or a test) can use.

/// Virtual entry pairs and shared entry vectors.
pub mod entry;
/// Registry errors.
pub mod error;
/// Opaque scheme identity.
pub mod id;
/// Name-indexed scheme registry.
pub mod registry;

pub use entry::{VirtualEntries, VirtualEntry};
pub use error::{Result, SchemeError};
pub use id::SchemeId;
pub use registry::SchemeRegistry;
