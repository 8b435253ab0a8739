use std::fmt;

/// Identity of a registered scheme.
///
/// Ids are dense indices handed out by [`crate::SchemeRegistry`] in
/// registration order. They carry no lifetime: the registry outlives every
/// cache node and stack frame that mentions an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemeId(pub(crate) u32);

impl SchemeId {
	/// Builds an id from a raw index.
	///
	/// Intended for drivers that keep their own scheme tables; ids built this
	/// way are only meaningful to whoever assigned the index.
	pub const fn from_raw(raw: u32) -> Self {
		Self(raw)
	}

	/// Returns the raw index.
	#[inline]
	pub const fn raw(self) -> u32 {
		self.0
	}

	#[inline]
	pub(crate) fn index(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Display for SchemeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "scheme#{}", self.0)
	}
}
