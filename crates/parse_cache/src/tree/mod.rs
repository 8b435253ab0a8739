//! Line-indexed cache of parse results.
//!
//! Every node records which scheme produced the parse result for an
//! inclusive line range. Nodes nest: a scheme invoked inside another one is
//! cached as a child of the enclosing node. At each level siblings form a
//! doubly linked chain sorted by start line with no overlaps, so a lookup
//! costs the nesting depth plus the nodes scanned per level.
//!
//! Nodes live in a slab arena and are addressed through generational
//! [`NodeId`] handles; all links are handles, and teardown walks an explicit
//! work-list so arbitrarily long chains never grow the call stack.

mod node;
mod verify;

use hue_scheme::SchemeId;
use slab::Slab;

pub use node::{CacheEntry, CacheNode, NodeId};

use crate::{CacheError, Result};

/// Result of [`ParseCacheTree::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lookup {
	/// Deepest node whose range contains the line.
	pub node: Option<NodeId>,
	/// Last node starting at or before the line on the level where the
	/// search for a deeper containing node stopped.
	///
	/// This is where a driver resumes parsing or inserts the next result.
	pub prior: Option<NodeId>,
}

impl Lookup {
	#[inline]
	pub fn is_hit(&self) -> bool {
		self.node.is_some()
	}
}

/// Arena-backed tree of [`CacheNode`]s; `S` is the driver's saved line state.
#[derive(Debug)]
pub struct ParseCacheTree<S> {
	nodes: Slab<CacheNode<S>>,
	/// Head of the top-level chain.
	head: Option<NodeId>,
	generation: u32,
}

impl<S> Default for ParseCacheTree<S> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S> ParseCacheTree<S> {
	pub fn new() -> Self {
		Self::with_capacity(0)
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			nodes: Slab::with_capacity(capacity),
			head: None,
			generation: 0,
		}
	}

	/// Number of live nodes at every level.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn contains(&self, id: NodeId) -> bool {
		self.get(id).is_some()
	}

	pub fn get(&self, id: NodeId) -> Option<&CacheNode<S>> {
		self.nodes.get(id.key as usize).filter(|node| node.generation == id.generation)
	}

	pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CacheNode<S>> {
		self.nodes.get_mut(id.key as usize).filter(|node| node.generation == id.generation)
	}

	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.get(id).and_then(CacheNode::parent)
	}

	/// Iterates the top-level chain in line order.
	pub fn roots(&self) -> Siblings<'_, S> {
		Siblings { tree: self, cursor: self.head }
	}

	/// Iterates the direct children of `id` in line order.
	///
	/// Yields nothing for a stale handle.
	pub fn children(&self, id: NodeId) -> Siblings<'_, S> {
		Siblings {
			tree: self,
			cursor: self.get(id).and_then(CacheNode::first_child),
		}
	}

	/// Iterates the enclosing nodes of `id`, innermost first.
	pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		std::iter::successors(self.parent(id), move |&id| self.parent(id))
	}

	/// Finds the deepest node whose range contains `line`.
	///
	/// Each level is scanned until a node starting after `line`; a containing
	/// node moves the search one level down into its children. When the
	/// search stops, [`Lookup::prior`] holds the last node that started at or
	/// before `line` on the level it stopped at.
	pub fn find(&self, line: u32) -> Lookup {
		let mut found = None;
		let mut cursor = self.head;
		loop {
			let mut prior = None;
			let mut containing = None;
			while let Some(id) = cursor {
				let node = self.at(id);
				if node.start_line > line {
					break;
				}
				if node.end_line >= line {
					containing = Some(id);
					break;
				}
				prior = Some(id);
				cursor = node.next;
			}

			match containing {
				Some(id) => {
					found = Some(id);
					cursor = self.at(id).first_child;
				}
				None => {
					tracing::trace!(line, hit = found.is_some(), "parse_cache.find");
					return Lookup { node: found, prior };
				}
			}
		}
	}

	/// Returns the scheme cached for the deepest node containing `line`.
	pub fn scheme_at(&self, line: u32) -> Option<SchemeId> {
		self.find(line).node.map(|id| self.at(id).scheme)
	}

	/// Inserts a node under `parent`, or at the top level when `parent` is
	/// `None`, keeping the chain sorted.
	///
	/// The range must lie within the parent and must not overlap any sibling.
	pub fn insert(&mut self, parent: Option<NodeId>, entry: CacheEntry<S>) -> Result<NodeId> {
		let (start, end) = (entry.start_line, entry.end_line);
		if end < start {
			return Err(CacheError::InvalidRange { start, end });
		}
		if let Some(parent) = parent {
			let node = self.require(parent)?;
			if start < node.start_line || end > node.end_line {
				return Err(CacheError::OutsideParent {
					start,
					end,
					parent,
					parent_start: node.start_line,
					parent_end: node.end_line,
				});
			}
		}

		let mut prev = None;
		let mut next = self.chain_head(parent);
		while let Some(id) = next {
			let node = self.at(id);
			if node.start_line > start {
				break;
			}
			prev = Some(id);
			next = node.next;
		}
		for sibling in [prev, next].into_iter().flatten() {
			let node = self.at(sibling);
			if node.start_line <= end && start <= node.end_line {
				return Err(CacheError::Overlap {
					start,
					end,
					sibling,
					sibling_start: node.start_line,
					sibling_end: node.end_line,
				});
			}
		}

		self.generation = self.generation.wrapping_add(1);
		let generation = self.generation;
		let key = self.nodes.insert(CacheNode::new(generation, entry, parent));
		let id = NodeId { key: key as u32, generation };

		let node = self.at_mut(id);
		node.prev = prev;
		node.next = next;
		match prev {
			Some(prev) => self.at_mut(prev).next = Some(id),
			None => self.set_chain_head(parent, Some(id)),
		}
		if let Some(next) = next {
			self.at_mut(next).prev = Some(id);
		}

		tracing::trace!(%id, scheme = self.at(id).scheme.raw(), start, end, "parse_cache.insert");
		Ok(id)
	}

	/// Moves the end of a node's range, as a driver does while the scheme
	/// invocation it caches is still being parsed.
	pub fn set_end_line(&mut self, id: NodeId, end: u32) -> Result<()> {
		let node = self.require(id)?;
		let start = node.start_line;
		if end < start {
			return Err(CacheError::InvalidRange { start, end });
		}
		if let Some(parent) = node.parent {
			let parent_node = self.at(parent);
			if end > parent_node.end_line {
				return Err(CacheError::OutsideParent {
					start,
					end,
					parent,
					parent_start: parent_node.start_line,
					parent_end: parent_node.end_line,
				});
			}
		}
		if let Some(sibling) = node.next {
			let next = self.at(sibling);
			if next.start_line <= end {
				return Err(CacheError::Overlap {
					start,
					end,
					sibling,
					sibling_start: next.start_line,
					sibling_end: next.end_line,
				});
			}
		}
		if let Some(child) = self.children(id).last() {
			let child_node = self.at(child);
			if child_node.end_line > end {
				return Err(CacheError::ChildOutside {
					child,
					child_start: child_node.start_line,
					child_end: child_node.end_line,
				});
			}
		}

		self.at_mut(id).end_line = end;
		Ok(())
	}

	/// Destroys `id`, everything nested in it, and the whole sibling chain
	/// that follows it. Returns the number of nodes freed.
	///
	/// The node's predecessor (or the parent's head link) is cut first, so
	/// the surviving tree stays consistent.
	pub fn destroy(&mut self, id: NodeId) -> Result<usize> {
		let node = self.require(id)?;
		let (prev, parent) = (node.prev, node.parent);
		match prev {
			Some(prev) => self.at_mut(prev).next = None,
			None => self.set_chain_head(parent, None),
		}

		let freed = self.free_chain(id);
		tracing::debug!(%id, freed, remaining = self.nodes.len(), "parse_cache.destroy");
		Ok(freed)
	}

	/// Invalidates every cached result from `line` onwards after an edit.
	///
	/// Nodes starting at or after `line` are destroyed. Nodes that contain
	/// `line` but start before it are clipped to end on `line - 1` and drop
	/// their boundary line state. Returns the number of nodes freed.
	pub fn truncate_from(&mut self, line: u32) -> usize {
		let mut freed = 0;
		let mut cursor = self.head;
		loop {
			let mut containing = None;
			let mut doomed = None;
			while let Some(id) = cursor {
				let node = self.at(id);
				if node.start_line >= line {
					doomed = Some(id);
					break;
				}
				if node.end_line >= line {
					containing = Some(id);
					doomed = node.next;
					break;
				}
				cursor = node.next;
			}

			if let Some(id) = doomed {
				let prev = self.at(id).prev;
				let parent = self.at(id).parent;
				match prev {
					Some(prev) => self.at_mut(prev).next = None,
					None => self.set_chain_head(parent, None),
				}
				freed += self.free_chain(id);
			}

			let Some(id) = containing else { break };
			let node = self.at_mut(id);
			node.end_line = line - 1;
			node.line_state = None;
			cursor = node.first_child;
		}

		tracing::debug!(line, freed, remaining = self.nodes.len(), "parse_cache.truncate");
		freed
	}

	/// Drops every node. Handles issued before the call stay stale.
	pub fn clear(&mut self) {
		self.nodes.clear();
		self.head = None;
	}

	/// Frees `id`, its forward chain and all their descendants.
	///
	/// The caller must already have detached `id` from its predecessor.
	fn free_chain(&mut self, id: NodeId) -> usize {
		let mut pending = vec![id];
		let mut freed = 0;
		while let Some(id) = pending.pop() {
			let node = self.nodes.remove(id.key as usize);
			pending.extend(node.next);
			pending.extend(node.first_child);
			freed += 1;
		}
		freed
	}

	fn require(&self, id: NodeId) -> Result<&CacheNode<S>> {
		self.get(id).ok_or(CacheError::StaleNode(id))
	}

	/// Indexes a handle reached through a live link.
	#[inline]
	fn at(&self, id: NodeId) -> &CacheNode<S> {
		&self.nodes[id.key as usize]
	}

	#[inline]
	fn at_mut(&mut self, id: NodeId) -> &mut CacheNode<S> {
		&mut self.nodes[id.key as usize]
	}

	fn chain_head(&self, parent: Option<NodeId>) -> Option<NodeId> {
		match parent {
			Some(parent) => self.at(parent).first_child,
			None => self.head,
		}
	}

	fn set_chain_head(&mut self, parent: Option<NodeId>, head: Option<NodeId>) {
		match parent {
			Some(parent) => self.at_mut(parent).first_child = head,
			None => self.head = head,
		}
	}
}

/// Iterator over one sibling chain.
pub struct Siblings<'a, S> {
	tree: &'a ParseCacheTree<S>,
	cursor: Option<NodeId>,
}

impl<S> Iterator for Siblings<'_, S> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let id = self.cursor?;
		self.cursor = self.tree.at(id).next;
		Some(id)
	}
}
