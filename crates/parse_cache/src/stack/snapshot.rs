use hue_scheme::VirtualEntries;
use smallvec::SmallVec;

/// Shape of a [`super::VirtualSubstitutionStack`]: the entry vectors of its
/// visible frames, bottom first.
///
/// A snapshot holds handles, not frames, so it can be stored in a cache node
/// and reattached to a fresh stack later. Equality compares the vectors by
/// identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackSnapshot {
	pub(super) frames: SmallVec<[VirtualEntries; 8]>,
}

impl StackSnapshot {
	/// Number of frames the snapshot reproduces.
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Iterates entry vectors from the bottom of the stack upwards.
	pub fn iter(&self) -> impl Iterator<Item = &VirtualEntries> + '_ {
		self.frames.iter()
	}
}
