//! Per-document pairing of the parse cache with stack snapshots.
//!
//! A driver records each finished scheme invocation together with the shape
//! of the substitution stack it ran under. Resuming at a line then rebuilds
//! that stack from the innermost cached node instead of replaying every
//! enclosing invocation.

use hue_scheme::SchemeId;

use crate::{CacheEntry, Lookup, NodeId, ParseCacheCfg, ParseCacheTree, Result, VirtualSubstitutionStack};

/// Where a parse pass picks up after a cache lookup.
#[derive(Debug)]
pub struct ResumePoint {
	/// Cache lookup for the requested line.
	pub lookup: Lookup,
	/// Stack rebuilt from the hit's snapshot; empty on a miss.
	pub stack: VirtualSubstitutionStack,
}

/// Parse cache for one document.
#[derive(Debug)]
pub struct DocumentCache<S> {
	tree: ParseCacheTree<S>,
	cfg: ParseCacheCfg,
}

impl<S> Default for DocumentCache<S> {
	fn default() -> Self {
		Self::new(ParseCacheCfg::default())
	}
}

impl<S> DocumentCache<S> {
	pub fn new(cfg: ParseCacheCfg) -> Self {
		let cfg = cfg.normalized();
		Self {
			tree: ParseCacheTree::with_capacity(cfg.node_capacity),
			cfg,
		}
	}

	pub fn cfg(&self) -> &ParseCacheCfg {
		&self.cfg
	}

	pub fn tree(&self) -> &ParseCacheTree<S> {
		&self.tree
	}

	pub fn tree_mut(&mut self) -> &mut ParseCacheTree<S> {
		&mut self.tree
	}

	/// A fresh stack sized by the configuration.
	pub fn new_stack(&self) -> VirtualSubstitutionStack {
		VirtualSubstitutionStack::with_capacity(self.cfg.frame_capacity)
	}

	/// Caches one scheme invocation along with the stack it ran under.
	pub fn record(
		&mut self,
		parent: Option<NodeId>,
		scheme: SchemeId,
		lines: (u32, u32),
		stack: &VirtualSubstitutionStack,
		line_state: Option<S>,
	) -> Result<NodeId> {
		let mut entry = CacheEntry::new(scheme, lines.0, lines.1).with_value_cache(stack.snapshot());
		entry.line_state = line_state;
		self.tree.insert(parent, entry)
	}

	/// Looks up `line` and rebuilds the substitution stack recorded at the
	/// deepest containing node.
	pub fn resume(&self, line: u32) -> ResumePoint {
		let lookup = self.tree.find(line);
		let snapshot = lookup.node.and_then(|id| self.tree.get(id)).and_then(|node| node.value_cache());
		let stack = match snapshot {
			Some(snapshot) => VirtualSubstitutionStack::from_snapshot(snapshot),
			None => self.new_stack(),
		};

		tracing::debug!(line, hit = lookup.is_hit(), depth = stack.depth(), "document.resume");
		ResumePoint { lookup, stack }
	}

	/// Invalidates cached results from `line` onwards after an edit.
	///
	/// Returns the number of nodes freed.
	pub fn edit(&mut self, line: u32) -> Result<usize> {
		let freed = self.tree.truncate_from(line);
		if self.cfg.verify_invariants {
			self.tree.verify()?;
		}
		Ok(freed)
	}

	pub fn clear(&mut self) {
		self.tree.clear();
	}
}
