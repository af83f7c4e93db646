use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("failed to load config {path}")]
	Config {
		path: PathBuf,
		#[source]
		source: sky::Error,
	},

	#[error("could not resolve {uri}")]
	Resolve {
		uri: String,
		#[source]
		source: sky::Error,
	},

	#[error("session for {chart_url} was rejected")]
	SessionRejected { chart_url: String },

	#[error("no folder at {path} in {uri}")]
	NotFound { uri: String, path: String },

	#[error("timeout after {ms}ms waiting for: {condition}")]
	Timeout { ms: u64, condition: String },

	#[error(transparent)]
	Sky(#[from] sky::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl CliError {
	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, message, details) = match self {
			CliError::Config { path, source } => (
				ErrorCode::ConfigError,
				format!("Failed to load config {}: {source}", path.display()),
				Some(serde_json::json!({ "path": path })),
			),
			CliError::Resolve { uri, source } => (
				ErrorCode::ResolveFailed,
				format!("Could not resolve {uri}: {source}"),
				Some(serde_json::json!({ "uri": uri })),
			),
			CliError::SessionRejected { chart_url } => (
				ErrorCode::SessionRejected,
				format!("Session for {chart_url} was rejected by the sessions folder"),
				Some(serde_json::json!({ "chartUrl": chart_url })),
			),
			CliError::NotFound { uri, path } => (
				ErrorCode::NotFound,
				format!("No folder at {path} in {uri}"),
				Some(serde_json::json!({ "uri": uri, "path": path })),
			),
			CliError::Timeout { ms, condition } => (
				ErrorCode::Timeout,
				format!("Timeout after {ms}ms waiting for: {condition}"),
				Some(serde_json::json!({ "timeoutMs": ms })),
			),
			CliError::Sky(err) => (classify(err), err.to_string(), None),
			CliError::Io(err) => (ErrorCode::IoError, err.to_string(), None),
			CliError::Anyhow(err) => (ErrorCode::InternalError, format!("{err:#}"), None),
		};

		CommandError { code, message, details }
	}
}

fn classify(err: &sky::Error) -> ErrorCode {
	match err {
		sky::Error::InvalidUri { .. } | sky::Error::UnknownScheme(_) | sky::Error::UnknownHost(_) => ErrorCode::InvalidInput,
		sky::Error::Config(_) => ErrorCode::ConfigError,
		sky::Error::Io(_) => ErrorCode::IoError,
		sky::Error::NotFound(_) => ErrorCode::NotFound,
		_ => ErrorCode::InternalError,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn resolve_error_carries_uri() {
		let err = CliError::Resolve {
			uri: "ftp://x".into(),
			source: sky::Error::UnknownScheme("ftp".into()),
		};
		let cmd = err.to_command_error();

		assert_eq!(cmd.code, ErrorCode::ResolveFailed);
		assert!(cmd.message.contains("Unknown skylink URI scheme: ftp"));
		assert_eq!(cmd.details.unwrap()["uri"], "ftp://x");
	}

	#[test]
	fn bare_sky_errors_are_classified() {
		let err = CliError::from(sky::Error::UnknownHost("foo.example.com".into()));
		assert_eq!(err.to_command_error().code, ErrorCode::InvalidInput);

		let err = CliError::from(sky::Error::MissingFunction("/pub/open/invoke".into()));
		assert_eq!(err.to_command_error().code, ErrorCode::InternalError);
	}

	#[test]
	fn rejected_session_code() {
		let err = CliError::SessionRejected {
			chart_url: "skylink+ws://host".into(),
		};
		assert_eq!(err.to_command_error().code, ErrorCode::SessionRejected);
	}
}
