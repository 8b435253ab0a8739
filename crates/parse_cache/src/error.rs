//! Error types for the parse cache and the substitution stack.
//!
//! Every variant is a contract violation by the parser driver: the pass that
//! hit it should be abandoned. Cache misses and unresolved virtual references
//! are not errors and are reported through `Option` instead.

use thiserror::Error;

use crate::tree::NodeId;

/// Errors raised by [`crate::ParseCacheTree`] and [`crate::VirtualSubstitutionStack`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
	/// `pop` with only the bottom sentinel visible.
	#[error("pop on empty substitution stack")]
	StackUnderflow,

	/// `unresolve` without a matching truncating `resolve`.
	#[error("unresolve without a pending resolve")]
	NoPendingResolve,

	/// `pop` would remove the frame a pending resolve restores through.
	#[error("pop below a pending resolve; unresolve first")]
	PendingResolve,

	/// `restore` into a stack that already holds frames.
	#[error("restore into a non-empty substitution stack")]
	RestoreIntoNonEmpty,

	/// The handle refers to a node that has been destroyed.
	#[error("{0} refers to a destroyed cache node")]
	StaleNode(NodeId),

	/// A range whose end precedes its start.
	#[error("invalid line range {start}..={end}")]
	InvalidRange {
		/// First line of the rejected range.
		start: u32,
		/// Last line of the rejected range.
		end: u32,
	},

	/// A child range that is not contained in its parent.
	#[error("range {start}..={end} escapes parent {parent} ({parent_start}..={parent_end})")]
	OutsideParent {
		start: u32,
		end: u32,
		parent: NodeId,
		parent_start: u32,
		parent_end: u32,
	},

	/// A range that overlaps an existing sibling.
	#[error("range {start}..={end} overlaps sibling {sibling} ({sibling_start}..={sibling_end})")]
	Overlap {
		start: u32,
		end: u32,
		sibling: NodeId,
		sibling_start: u32,
		sibling_end: u32,
	},

	/// Shrinking a node would leave one of its children outside it.
	#[error("child {child} ({child_start}..={child_end}) would escape its parent")]
	ChildOutside { child: NodeId, child_start: u32, child_end: u32 },

	/// Structural verification found a broken invariant.
	#[error("corrupt parse cache: {0}")]
	Corrupt(String),
}

/// Result type for parse cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
