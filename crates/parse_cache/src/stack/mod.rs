//! Virtual scheme substitution stack.
//!
//! Each active scheme invocation that declares virtual entries pushes one
//! frame. Resolving a scheme walks the frames from the top towards the
//! bottom sentinel, rewriting the candidate whenever a frame overrides it,
//! and then hides every frame above the outermost match until the paired
//! [`VirtualSubstitutionStack::unresolve`]. That frame keeps the hidden top
//! as its shadow mark.
//!
//! Frames live in a slab arena linked by index. Pushing while frames are
//! hidden links the new frame in front of them, so the hidden part stays
//! reachable for the restore.

mod snapshot;

use hue_scheme::{SchemeId, VirtualEntries};
use slab::Slab;
use smallvec::SmallVec;

pub use snapshot::StackSnapshot;

use crate::{CacheError, Result};

/// Arena index of a stack frame.
///
/// Only meaningful while the frame is alive; slots are reused after `pop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

/// Outcome of [`VirtualSubstitutionStack::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
	/// Concrete scheme in effect; the requested scheme when nothing matched.
	pub scheme: SchemeId,
	/// Outermost frame that overrode the reference. When present the stack is
	/// truncated below it and the caller owes one `unresolve`.
	pub frame: Option<FrameId>,
}

impl Resolution {
	#[inline]
	pub fn is_substituted(&self) -> bool {
		self.frame.is_some()
	}
}

#[derive(Debug)]
struct Frame {
	/// `None` only for the bottom sentinel.
	entries: Option<VirtualEntries>,
	/// Top to restore on `unresolve`; set while frames above are hidden.
	shadow_mark: Option<FrameId>,
	prev: Option<FrameId>,
	next: Option<FrameId>,
}

/// Stack of virtualization frames for one parse pass.
#[derive(Debug)]
pub struct VirtualSubstitutionStack {
	frames: Slab<Frame>,
	root: FrameId,
	/// Visible top; equals `root` when no frame is visible.
	top: FrameId,
	/// Visible tops left behind by pending resolves, innermost last.
	pending: SmallVec<[FrameId; 4]>,
}

impl Default for VirtualSubstitutionStack {
	fn default() -> Self {
		Self::new()
	}
}

impl VirtualSubstitutionStack {
	pub fn new() -> Self {
		Self::with_capacity(1)
	}

	/// Creates a stack whose arena holds `capacity` frames, sentinel included,
	/// before growing.
	pub fn with_capacity(capacity: usize) -> Self {
		let mut frames = Slab::with_capacity(capacity.max(1));
		let root = FrameId(frames.insert(Frame {
			entries: None,
			shadow_mark: None,
			prev: None,
			next: None,
		}));
		Self {
			frames,
			root,
			top: root,
			pending: SmallVec::new(),
		}
	}

	/// Builds a fresh stack with the shape recorded in `snapshot`.
	pub fn from_snapshot(snapshot: &StackSnapshot) -> Self {
		let mut stack = Self::with_capacity(snapshot.len() + 1);
		stack.rebuild(snapshot);
		stack
	}

	/// Live frames, hidden ones included, excluding the sentinel.
	pub fn len(&self) -> usize {
		self.frames.len() - 1
	}

	/// Returns true when no frame exists at all.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of visible frames.
	pub fn depth(&self) -> usize {
		self.iter().count()
	}

	/// Returns true while a truncating `resolve` awaits its `unresolve`.
	pub fn has_pending_resolve(&self) -> bool {
		!self.pending.is_empty()
	}

	/// Entry vector of the visible top frame.
	pub fn top_entries(&self) -> Option<&VirtualEntries> {
		self.at(self.top).entries.as_ref()
	}

	/// Iterates the entry vectors of the visible frames, bottom first.
	pub fn iter(&self) -> impl Iterator<Item = &VirtualEntries> + '_ {
		let first = if self.top == self.root { None } else { self.at(self.root).next };
		std::iter::successors(first, move |&id| if id == self.top { None } else { self.at(id).next })
			.filter_map(move |id| self.at(id).entries.as_ref())
	}

	/// Pushes a frame for one scheme invocation.
	///
	/// Absent or empty entry vectors push nothing. Returns whether a frame
	/// was pushed, which is whether the caller owes a `pop`.
	pub fn push(&mut self, entries: Option<&VirtualEntries>) -> bool {
		let Some(entries) = entries.filter(|entries| !entries.is_empty()) else {
			return false;
		};

		let below = self.top;
		let above = self.at(below).next;
		let id = FrameId(self.frames.insert(Frame {
			entries: Some(entries.clone()),
			shadow_mark: None,
			prev: Some(below),
			next: above,
		}));
		if let Some(above) = above {
			self.at_mut(above).prev = Some(id);
		}
		self.at_mut(below).next = Some(id);
		self.top = id;

		tracing::trace!(entries = entries.len(), frames = self.len(), "vstack.push");
		true
	}

	/// Removes the visible top frame.
	pub fn pop(&mut self) -> Result<()> {
		if self.top == self.root {
			return Err(CacheError::StackUnderflow);
		}
		if self.pending.last() == Some(&self.top) {
			return Err(CacheError::PendingResolve);
		}

		let frame = self.frames.remove(self.top.0);
		let below = frame.prev.unwrap_or(self.root);
		if let Some(above) = frame.next {
			self.at_mut(above).prev = Some(below);
		}
		self.at_mut(below).next = frame.next;
		self.top = below;

		tracing::trace!(frames = self.len(), "vstack.pop");
		Ok(())
	}

	/// Resolves `scheme` through every visible frame.
	///
	/// Frames are scanned from the top down and each frame's entries in
	/// order; every matching override with a substitute rewrites the
	/// candidate, so a substitute that is itself virtual in an outer frame is
	/// resolved further, and the outermost match decides the result. On a
	/// match the frames from the outermost matching one upwards are hidden
	/// until [`Self::unresolve`].
	pub fn resolve(&mut self, scheme: SchemeId) -> Resolution {
		let mut resolved = scheme;
		let mut matched = None;
		let mut cursor = self.top;
		while cursor != self.root {
			let frame = self.at(cursor);
			if let Some(entries) = &frame.entries {
				for entry in entries.iter() {
					if let Some(substitute) = entry.substitute_for(resolved) {
						resolved = substitute;
						matched = Some(cursor);
					}
				}
			}
			cursor = frame.prev.unwrap_or(self.root);
		}

		let Some(frame) = matched else {
			return Resolution { scheme, frame: None };
		};

		let (shadow, root) = (self.top, self.root);
		let node = self.at_mut(frame);
		node.shadow_mark = Some(shadow);
		let base = node.prev.unwrap_or(root);
		self.top = base;
		self.pending.push(base);

		tracing::trace!(
			requested = scheme.raw(),
			resolved = resolved.raw(),
			pending = self.pending.len(),
			"vstack.resolve"
		);
		Resolution {
			scheme: resolved,
			frame: Some(frame),
		}
	}

	/// Undoes the truncation of the most recent pending `resolve`.
	///
	/// Every frame pushed after that `resolve` must have been popped.
	pub fn unresolve(&mut self) -> Result<()> {
		if self.pending.last() != Some(&self.top) {
			return Err(CacheError::NoPendingResolve);
		}
		let marked = self.at(self.top).next.ok_or(CacheError::NoPendingResolve)?;
		let shadow = self.at_mut(marked).shadow_mark.take().ok_or(CacheError::NoPendingResolve)?;
		self.pending.pop();
		self.top = shadow;

		tracing::trace!(pending = self.pending.len(), "vstack.unresolve");
		Ok(())
	}

	/// Records the entry vectors of the visible frames, bottom first.
	pub fn snapshot(&self) -> StackSnapshot {
		StackSnapshot {
			frames: self.iter().cloned().collect(),
		}
	}

	/// Reattaches a recorded shape to an empty stack.
	pub fn restore(&mut self, snapshot: &StackSnapshot) -> Result<()> {
		if !self.is_empty() {
			return Err(CacheError::RestoreIntoNonEmpty);
		}
		self.rebuild(snapshot);
		Ok(())
	}

	/// Drops every frame except the sentinel, including pending resolves.
	pub fn clear(&mut self) {
		let root = self.root;
		self.frames.retain(|key, _| key == root.0);
		let sentinel = self.at_mut(root);
		sentinel.next = None;
		sentinel.shadow_mark = None;
		self.top = root;
		self.pending.clear();
	}

	fn rebuild(&mut self, snapshot: &StackSnapshot) {
		let mut below = self.root;
		for entries in snapshot.iter() {
			let id = FrameId(self.frames.insert(Frame {
				entries: Some(entries.clone()),
				shadow_mark: None,
				prev: Some(below),
				next: None,
			}));
			self.at_mut(below).next = Some(id);
			below = id;
		}
		self.top = below;
		tracing::trace!(frames = self.len(), "vstack.restore");
	}

	#[inline]
	fn at(&self, id: FrameId) -> &Frame {
		&self.frames[id.0]
	}

	#[inline]
	fn at_mut(&mut self, id: FrameId) -> &mut Frame {
		&mut self.frames[id.0]
	}
}
