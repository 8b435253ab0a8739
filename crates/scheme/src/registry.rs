use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{Result, SchemeError, SchemeId, VirtualEntries, VirtualEntry};

#[derive(Debug)]
struct SchemeSlot {
	name: Box<str>,
	/// Authoring buffer; frozen into `entries` after every declaration.
	declared: SmallVec<[VirtualEntry; 4]>,
	entries: VirtualEntries,
}

/// Name-indexed table of schemes and their virtual entry vectors.
///
/// Registration happens in two phases: every scheme is registered by name
/// first, then virtual entries are declared between registered names. The
/// registry owns the entry vectors; the substitution stack only holds shared
/// handles to them.
#[derive(Debug, Default)]
pub struct SchemeRegistry {
	slots: Vec<SchemeSlot>,
	by_name: FxHashMap<Box<str>, SchemeId>,
}

impl SchemeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a scheme and returns its identity.
	pub fn register(&mut self, name: &str) -> Result<SchemeId> {
		if self.by_name.contains_key(name) {
			return Err(SchemeError::Duplicate(name.to_owned()));
		}
		let id = SchemeId(self.slots.len() as u32);
		self.slots.push(SchemeSlot {
			name: name.into(),
			declared: SmallVec::new(),
			entries: VirtualEntries::default(),
		});
		self.by_name.insert(name.into(), id);
		tracing::trace!(scheme = name, id = id.raw(), "scheme.register");
		Ok(id)
	}

	/// Declares that `virtual_name` resolves to `substitute_name` while
	/// `scheme` is active.
	///
	/// Entries keep declaration order, which is the order resolution scans
	/// them in.
	pub fn declare_virtual(&mut self, scheme: SchemeId, virtual_name: &str, substitute_name: Option<&str>) -> Result<()> {
		let virtual_scheme = self.require(virtual_name)?;
		let substitute = substitute_name.map(|name| self.require(name)).transpose()?;
		let slot = self.slots.get_mut(scheme.index()).ok_or(SchemeError::StaleId(scheme))?;

		slot.declared.push(VirtualEntry::new(virtual_scheme, substitute));
		slot.entries = slot.declared.iter().copied().collect();
		tracing::trace!(
			scheme = %slot.name,
			virtual_scheme = virtual_name,
			substitute = substitute_name,
			"scheme.declare_virtual"
		);
		Ok(())
	}

	pub fn lookup(&self, name: &str) -> Option<SchemeId> {
		self.by_name.get(name).copied()
	}

	pub fn name(&self, id: SchemeId) -> Option<&str> {
		self.slots.get(id.index()).map(|slot| &*slot.name)
	}

	/// Returns the entry vector a scheme invocation contributes to the stack.
	///
	/// Schemes without declarations yield an empty vector, which the stack
	/// refuses to push.
	pub fn virtual_entries(&self, id: SchemeId) -> Option<&VirtualEntries> {
		self.slots.get(id.index()).map(|slot| &slot.entries)
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Iterates `(id, name)` in registration order.
	pub fn iter(&self) -> impl Iterator<Item = (SchemeId, &str)> + '_ {
		self.slots.iter().enumerate().map(|(idx, slot)| (SchemeId(idx as u32), &*slot.name))
	}

	fn require(&self, name: &str) -> Result<SchemeId> {
		self.lookup(name).ok_or_else(|| SchemeError::Unknown(name.to_owned()))
	}
}

#[cfg(test)]
mod tests;
