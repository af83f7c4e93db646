//! Result envelope printed by `sky` commands.
//!
//! Each run writes one envelope to stdout:
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "ok": true,
//!   "command": "open",
//!   "data": { ... },
//!   "timings": { "durationMs": 12 },
//!   "diagnostics": [{ "level": "warning", "message": "..." }]
//! }
//! ```
//!
//! A failed run carries `error: { code, message, details? }` instead of `data`.
//! `diagnostics` is omitted when empty.

#[cfg(test)]
mod tests;

use std::io::{self, Write};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use sky::BootstrapState;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// Indented JSON (default)
	#[default]
	Json,
	/// One JSON object per line
	Ndjson,
	/// Data as indented JSON followed by diagnostics, errors as a single line
	Text,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub schema_version: Option<u32>,
	pub ok: bool,
	/// "open" or "resolve"
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub inputs: Option<serde_json::Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timings: Option<Timings>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Stable codes scripts can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// The URI did not resolve to a namespace
	ResolveFailed,
	/// The sessions folder refused the session
	SessionRejected,
	/// Nothing at the requested path
	NotFound,
	/// `--wait` ran out before bootstrap finished
	Timeout,
	ConfigError,
	IoError,
	InvalidInput,
	InternalError,
}

impl ErrorCode {
	pub fn as_str(self) -> &'static str {
		match self {
			ErrorCode::ResolveFailed => "RESOLVE_FAILED",
			ErrorCode::SessionRejected => "SESSION_REJECTED",
			ErrorCode::NotFound => "NOT_FOUND",
			ErrorCode::Timeout => "TIMEOUT",
			ErrorCode::ConfigError => "CONFIG_ERROR",
			ErrorCode::IoError => "IO_ERROR",
			ErrorCode::InvalidInput => "INVALID_INPUT",
			ErrorCode::InternalError => "INTERNAL_ERROR",
		}
	}
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	pub duration_ms: u64,
}

impl From<Duration> for Timings {
	fn from(elapsed: Duration) -> Self {
		Self {
			duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
		}
	}
}

/// A non-fatal observation about a successful run, such as a chart that
/// mounted nothing or an app missing part of its namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
	pub level: DiagnosticLevel,
	pub message: String,
}

impl Diagnostic {
	pub fn info(message: impl Into<String>) -> Self {
		Self {
			level: DiagnosticLevel::Info,
			message: message.into(),
		}
	}

	pub fn warning(message: impl Into<String>) -> Self {
		Self {
			level: DiagnosticLevel::Warning,
			message: message.into(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
	Info,
	Warning,
}

pub struct ResultBuilder<T: Serialize> {
	command: String,
	inputs: Option<serde_json::Value>,
	data: Option<T>,
	error: Option<CommandError>,
	diagnostics: Vec<Diagnostic>,
	started: Instant,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			inputs: None,
			data: None,
			error: None,
			diagnostics: Vec::new(),
			started: Instant::now(),
		}
	}

	pub fn inputs(mut self, inputs: serde_json::Value) -> Self {
		self.inputs = Some(inputs);
		self
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, error: CommandError) -> Self {
		self.error = Some(error);
		self
	}

	pub fn diagnostics(mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) -> Self {
		self.diagnostics.extend(diagnostics);
		self
	}

	pub fn build(self) -> CommandResult<T> {
		CommandResult {
			schema_version: Some(SCHEMA_VERSION),
			ok: self.error.is_none() && self.data.is_some(),
			command: self.command,
			inputs: self.inputs,
			data: self.data,
			error: self.error,
			timings: Some(self.started.elapsed().into()),
			diagnostics: self.diagnostics,
		}
	}
}

pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	let rendered = match format {
		OutputFormat::Json => serde_json::to_string_pretty(result),
		OutputFormat::Ndjson => serde_json::to_string(result),
		OutputFormat::Text => {
			print_text(result);
			return;
		}
	};
	if let Ok(line) = rendered {
		println!("{line}");
	}
}

fn print_text<T: Serialize>(result: &CommandResult<T>) {
	let mut out = io::stdout().lock();

	match (&result.data, &result.error) {
		(Some(data), _) => {
			if let Ok(body) = serde_json::to_string_pretty(data) {
				let _ = writeln!(out, "{body}");
			}
		}
		(None, Some(error)) => {
			let _ = writeln!(out, "Error [{}]: {}", error.code, error.message);
		}
		(None, None) => {}
	}

	for diagnostic in &result.diagnostics {
		let level = match diagnostic.level {
			DiagnosticLevel::Info => "info",
			DiagnosticLevel::Warning => "warning",
		};
		let _ = writeln!(out, "{level}: {}", diagnostic.message);
	}
}

pub fn print_error_stderr(error: &CommandError) {
	eprintln!("Error [{}]: {}", error.code, error.message);
}

/// `data` of `sky open`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenData {
	pub chart_url: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub uri: Option<String>,
	pub state: SessionState,
	pub apps: Vec<AppData>,
}

/// Serializable form of [`BootstrapState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
	Pending,
	Unresolved,
	Complete,
	Unscheduled,
}

impl From<&BootstrapState> for SessionState {
	fn from(state: &BootstrapState) -> Self {
		match state {
			BootstrapState::Pending => SessionState::Pending,
			BootstrapState::Unresolved => SessionState::Unresolved,
			BootstrapState::Complete { .. } => SessionState::Complete,
			BootstrapState::Unscheduled => SessionState::Unscheduled,
		}
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
	pub name: String,
	pub status: String,
	/// Children of the app namespace root
	pub namespace: Vec<String>,
	/// Ids of processes started for the app
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub processes: Vec<String>,
}

/// `data` of `sky resolve`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveData {
	pub uri: String,
	pub path: String,
	/// "folder", "function" or "string"
	pub kind: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<String>,
}
