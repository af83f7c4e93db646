//! Error types for the skylink runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a remote export.
#[derive(Debug, Error)]
pub enum Error {
	/// The export URL could not be parsed.
	#[error("Invalid export URL '{url}': {reason}")]
	InvalidUrl { url: String, reason: String },

	/// The export URL uses a scheme no transport handles.
	#[error("Unsupported transport scheme: {0}")]
	UnsupportedScheme(String),

	/// Failed to establish a connection with the export.
	#[error("Failed to connect to {endpoint}: {reason}")]
	ConnectionFailed { endpoint: String, reason: String },

	/// Transport-level error after the connection was established.
	#[error("Transport error: {0}")]
	TransportError(String),

	/// The export answered with something that is not a valid response.
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// The export rejected an operation.
	#[error("Remote {op} failed at '{path}': {message}")]
	Remote {
		op: &'static str,
		path: String,
		message: String,
	},

	/// Channel closed unexpectedly.
	#[error("Channel closed unexpectedly")]
	ChannelClosed,

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Returns true if the connection to the export is gone.
	pub fn is_disconnected(&self) -> bool {
		matches!(self, Error::ChannelClosed | Error::ConnectionFailed { .. })
	}
}
