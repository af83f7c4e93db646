//! Error types for chart resolution and session bootstrap.
//!
//! Most of these never reach callers of [`Root::open_session`]: the resolver
//! and bootstrap log them and degrade to "no entry" or an empty session.
//!
//! [`Root::open_session`]: crate::Root::open_session

use thiserror::Error;

use crate::entry::EntryKind;

/// Result type alias for `sky` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// The URI could not be parsed.
	#[error("Skylink URI parsing failed for '{uri}': {reason}")]
	InvalidUri { uri: String, reason: String },

	/// The URI scheme is not a skylink scheme.
	#[error("Unknown skylink URI scheme: {0}")]
	UnknownScheme(String),

	/// A `skylink://` host that is not `<chart>.chart.local`.
	#[error("Unknown skylink URI hostname: {0}")]
	UnknownHost(String),

	/// Resolution recursed deeper than the configured bound.
	#[error("Skylink resolution of '{uri}' exceeded depth {depth}")]
	RecursionLimit { uri: String, depth: usize },

	/// The skychart namespace does not offer a required function.
	#[error("Skychart didn't offer function at {0}")]
	MissingFunction(String),

	/// The skychart open function returned nothing for the chart.
	#[error("Skychart couldn't open {0} chart")]
	SkychartOpenFailed(String),

	/// The chart's browse function was missing or returned nothing.
	#[error("Skychart couldn't browse {0} chart")]
	SkychartBrowseFailed(String),

	/// An entry did not narrow to the expected kind.
	#[error("Expected {expected} entry, found {found}")]
	WrongKind { expected: EntryKind, found: EntryKind },

	/// No entry exists at the given path.
	#[error("No entry at {0}")]
	NotFound(String),

	/// The operation is not supported by this entry.
	#[error("Unsupported operation: {0}")]
	Unsupported(String),

	/// Configuration could not be loaded.
	#[error("Invalid configuration: {0}")]
	Config(String),

	/// Remote transport or protocol failure.
	#[error(transparent)]
	Runtime(#[from] sky_runtime::Error),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}
