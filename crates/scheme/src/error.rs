//! Error types for scheme registration.

use thiserror::Error;

use crate::SchemeId;

/// Errors raised while building a [`crate::SchemeRegistry`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemeError {
	/// A scheme with this name is already registered.
	#[error("duplicate scheme name: {0}")]
	Duplicate(String),

	/// A virtual entry refers to a scheme name that was never registered.
	#[error("unknown scheme name: {0}")]
	Unknown(String),

	/// The id was not handed out by this registry.
	#[error("{0} does not belong to this registry")]
	StaleId(SchemeId),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, SchemeError>;
