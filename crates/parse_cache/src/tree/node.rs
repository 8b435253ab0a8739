use std::fmt;

use hue_scheme::SchemeId;

use crate::stack::StackSnapshot;

/// Generational handle to a node of a [`super::ParseCacheTree`].
///
/// Arena slots are reused after destruction; the generation keeps a handle
/// to a destroyed node from aliasing whatever later occupies its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
	pub(super) key: u32,
	pub(super) generation: u32,
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "node#{}.{}", self.key, self.generation)
	}
}

/// Payload of a node about to be inserted.
#[derive(Debug, Clone)]
pub struct CacheEntry<S> {
	pub scheme: SchemeId,
	pub start_line: u32,
	pub end_line: u32,
	pub line_state: Option<S>,
	pub value_cache: Option<StackSnapshot>,
}

impl<S> CacheEntry<S> {
	pub fn new(scheme: SchemeId, start_line: u32, end_line: u32) -> Self {
		Self {
			scheme,
			start_line,
			end_line,
			line_state: None,
			value_cache: None,
		}
	}

	pub fn with_line_state(mut self, state: S) -> Self {
		self.line_state = Some(state);
		self
	}

	pub fn with_value_cache(mut self, snapshot: StackSnapshot) -> Self {
		self.value_cache = Some(snapshot);
		self
	}
}

/// Cached parse result for one scheme invocation over an inclusive line range.
///
/// Links are only rewired by the owning tree; callers get read access to
/// them and write access to the cached payload.
#[derive(Debug)]
pub struct CacheNode<S> {
	pub(super) generation: u32,
	pub(super) scheme: SchemeId,
	pub(super) start_line: u32,
	pub(super) end_line: u32,
	pub(super) line_state: Option<S>,
	pub(super) value_cache: Option<StackSnapshot>,
	pub(super) parent: Option<NodeId>,
	/// Owning link to the first nested node.
	pub(super) first_child: Option<NodeId>,
	pub(super) next: Option<NodeId>,
	pub(super) prev: Option<NodeId>,
}

impl<S> CacheNode<S> {
	pub(super) fn new(generation: u32, entry: CacheEntry<S>, parent: Option<NodeId>) -> Self {
		Self {
			generation,
			scheme: entry.scheme,
			start_line: entry.start_line,
			end_line: entry.end_line,
			line_state: entry.line_state,
			value_cache: entry.value_cache,
			parent,
			first_child: None,
			next: None,
			prev: None,
		}
	}

	#[inline]
	pub fn scheme(&self) -> SchemeId {
		self.scheme
	}

	#[inline]
	pub fn start_line(&self) -> u32 {
		self.start_line
	}

	#[inline]
	pub fn end_line(&self) -> u32 {
		self.end_line
	}

	/// Returns true if `line` lies within the inclusive range.
	#[inline]
	pub fn contains_line(&self, line: u32) -> bool {
		self.start_line <= line && line <= self.end_line
	}

	pub fn line_state(&self) -> Option<&S> {
		self.line_state.as_ref()
	}

	/// Replaces the boundary line state, returning the previous one.
	pub fn set_line_state(&mut self, state: Option<S>) -> Option<S> {
		std::mem::replace(&mut self.line_state, state)
	}

	pub fn value_cache(&self) -> Option<&StackSnapshot> {
		self.value_cache.as_ref()
	}

	pub fn set_value_cache(&mut self, snapshot: Option<StackSnapshot>) -> Option<StackSnapshot> {
		std::mem::replace(&mut self.value_cache, snapshot)
	}

	#[inline]
	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	#[inline]
	pub fn first_child(&self) -> Option<NodeId> {
		self.first_child
	}

	#[inline]
	pub fn next(&self) -> Option<NodeId> {
		self.next
	}

	#[inline]
	pub fn prev(&self) -> Option<NodeId> {
		self.prev
	}
}
