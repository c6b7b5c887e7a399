//! Error types for payload collection and render configuration.

use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced while collecting a payload tree.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
	/// Blocking collection reached a node whose work has not settled.
	///
	/// The tree must be collected with [`crate::Payload::collect_async`] instead.
	#[error("payload has unsettled async work; collect it asynchronously")]
	Pending,

	/// A producer or compaction transform failed.
	///
	/// The error is shared so every awaiter of the failed work slot observes
	/// the same value.
	#[error("producer failed: {0}")]
	Producer(Arc<anyhow::Error>),
}

impl RenderError {
	/// Wraps an arbitrary producer failure.
	pub fn producer(error: impl Into<anyhow::Error>) -> Self {
		Self::Producer(Arc::new(error.into()))
	}

	/// Returns `true` if this is the blocking-collection pending signal.
	pub const fn is_pending(&self) -> bool {
		matches!(self, Self::Pending)
	}
}

/// Result type for payload operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur when parsing render options.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// The id prefix contains characters that cannot appear in an element id.
	#[error("invalid id prefix: {0:?}")]
	InvalidIdPrefix(String),
}
