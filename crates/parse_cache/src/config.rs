//! Sizing and verification knobs for a per-document cache.

const DEFAULT_NODE_CAPACITY: usize = 256;
const DEFAULT_FRAME_CAPACITY: usize = 16;

const ENV_NODE_CAPACITY: &str = "HUE_CACHE_NODE_CAPACITY";
const ENV_FRAME_CAPACITY: &str = "HUE_CACHE_FRAME_CAPACITY";
const ENV_VERIFY: &str = "HUE_CACHE_VERIFY";

/// Configuration shared by [`crate::ParseCacheTree`], [`crate::VirtualSubstitutionStack`]
/// and [`crate::DocumentCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseCacheCfg {
	/// Nodes preallocated in the tree arena.
	pub node_capacity: usize,
	/// Frames preallocated in each stack arena (sentinel included).
	pub frame_capacity: usize,
	/// Run [`crate::ParseCacheTree::verify`] after every edit invalidation.
	pub verify_invariants: bool,
}

impl Default for ParseCacheCfg {
	fn default() -> Self {
		Self {
			node_capacity: DEFAULT_NODE_CAPACITY,
			frame_capacity: DEFAULT_FRAME_CAPACITY,
			verify_invariants: cfg!(debug_assertions),
		}
	}
}

impl ParseCacheCfg {
	/// Reads overrides from `HUE_CACHE_*` environment variables.
	///
	/// Missing or malformed values fall back to the defaults.
	pub fn from_env() -> Self {
		Self::from_vars(
			std::env::var(ENV_NODE_CAPACITY).ok().as_deref(),
			std::env::var(ENV_FRAME_CAPACITY).ok().as_deref(),
			std::env::var(ENV_VERIFY).ok().as_deref(),
		)
	}

	fn from_vars(node_capacity: Option<&str>, frame_capacity: Option<&str>, verify: Option<&str>) -> Self {
		let defaults = Self::default();
		Self {
			node_capacity: parse_capacity(node_capacity, defaults.node_capacity),
			frame_capacity: parse_capacity(frame_capacity, defaults.frame_capacity),
			verify_invariants: parse_flag(verify, defaults.verify_invariants),
		}
		.normalized()
	}

	/// Clamps capacities to at least one slot.
	pub fn normalized(self) -> Self {
		Self {
			node_capacity: self.node_capacity.max(1),
			frame_capacity: self.frame_capacity.max(1),
			..self
		}
	}
}

fn parse_capacity(raw: Option<&str>, default: usize) -> usize {
	match raw.map(str::trim).map(str::parse::<usize>) {
		Some(Ok(value)) => value,
		Some(Err(error)) => {
			tracing::warn!(%error, default, "parse_cache.cfg: ignoring malformed capacity");
			default
		}
		None => default,
	}
}

fn parse_flag(raw: Option<&str>, default: bool) -> bool {
	match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
		Some("1" | "true" | "yes" | "on") => true,
		Some("0" | "false" | "no" | "off") => false,
		Some(other) => {
			tracing::warn!(value = other, default, "parse_cache.cfg: ignoring malformed flag");
			default
		}
		None => default,
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[test]
	fn missing_vars_use_defaults() {
		assert_eq!(ParseCacheCfg::from_vars(None, None, None), ParseCacheCfg::default());
	}

	#[test]
	fn zero_capacity_is_clamped() {
		let cfg = ParseCacheCfg::from_vars(Some("0"), Some(" 0 "), None);
		assert_eq!(cfg.node_capacity, 1);
		assert_eq!(cfg.frame_capacity, 1);
	}

	#[test]
	fn malformed_capacity_falls_back() {
		let cfg = ParseCacheCfg::from_vars(Some("lots"), Some("32"), None);
		assert_eq!(cfg.node_capacity, DEFAULT_NODE_CAPACITY);
		assert_eq!(cfg.frame_capacity, 32);
	}

	#[rstest]
	#[case(Some("1"), true)]
	#[case(Some("TRUE"), true)]
	#[case(Some("off"), false)]
	#[case(Some("no"), false)]
	#[case(Some("maybe"), cfg!(debug_assertions))]
	#[case(None, cfg!(debug_assertions))]
	fn verify_flag(#[case] raw: Option<&str>, #[case] expected: bool) {
		assert_eq!(ParseCacheCfg::from_vars(None, None, raw).verify_invariants, expected);
	}
}
