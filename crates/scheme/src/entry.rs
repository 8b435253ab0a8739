use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::SchemeId;

/// One override declared by a scheme invocation.
///
/// While the invocation is active, a reference to `virtual_scheme` resolves
/// to `substitute`. An absent substitute declares the slot without
/// overriding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualEntry {
	pub virtual_scheme: SchemeId,
	pub substitute: Option<SchemeId>,
}

impl VirtualEntry {
	pub const fn new(virtual_scheme: SchemeId, substitute: Option<SchemeId>) -> Self {
		Self {
			virtual_scheme,
			substitute,
		}
	}

	/// Returns the substitute when this entry overrides `candidate`.
	#[inline]
	pub fn substitute_for(&self, candidate: SchemeId) -> Option<SchemeId> {
		if self.virtual_scheme == candidate { self.substitute } else { None }
	}
}

/// Shared, immutable vector of [`VirtualEntry`] owned by a scheme definition.
///
/// Cloning is cheap and never copies the entries. Equality is identity:
/// two handles are equal only when they point at the same vector, which is
/// what stack snapshots compare.
#[derive(Clone, Default)]
pub struct VirtualEntries(Arc<[VirtualEntry]>);

impl VirtualEntries {
	pub fn new(entries: impl Into<Arc<[VirtualEntry]>>) -> Self {
		Self(entries.into())
	}

	/// Returns true when both handles share the same allocation.
	#[inline]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Deref for VirtualEntries {
	type Target = [VirtualEntry];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl FromIterator<VirtualEntry> for VirtualEntries {
	fn from_iter<I: IntoIterator<Item = VirtualEntry>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl From<Vec<VirtualEntry>> for VirtualEntries {
	fn from(entries: Vec<VirtualEntry>) -> Self {
		Self(entries.into())
	}
}

impl PartialEq for VirtualEntries {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl Eq for VirtualEntries {}

impl fmt::Debug for VirtualEntries {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.0.iter()).finish()
	}
}
