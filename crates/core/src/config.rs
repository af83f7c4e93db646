//! Session runtime configuration.
//!
//! Loaded from a JSON file (every field optional) and then overridden by
//! `SKY_*` environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default scheme of the service self-address.
pub const DEFAULT_SELF_SCHEME: &str = "skylink+ws";

/// Default host of the service self-address.
pub const DEFAULT_SELF_HOST: &str = "localhost";

/// Port published sessions are addressed on.
pub const DEFAULT_SESSION_PORT: u16 = 9234;

/// Cluster-local skychart used to resolve `skylink://<chart>.chart.local`.
pub const DEFAULT_SKYCHART_URI: &str = "skylink+ws://skychart";

/// Resolution depth bound: the chart itself plus its skychart.
pub const DEFAULT_MAX_RESOLVE_DEPTH: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
	pub self_scheme: String,
	pub self_host: String,
	pub session_port: u16,
	pub skychart_uri: String,
	pub max_resolve_depth: usize,
	/// Upper bound on registered sessions. Registrations beyond it are rejected.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_sessions: Option<usize>,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			self_scheme: DEFAULT_SELF_SCHEME.to_string(),
			self_host: DEFAULT_SELF_HOST.to_string(),
			session_port: DEFAULT_SESSION_PORT,
			skychart_uri: DEFAULT_SKYCHART_URI.to_string(),
			max_resolve_depth: DEFAULT_MAX_RESOLVE_DEPTH,
			max_sessions: None,
		}
	}
}

impl SessionConfig {
	/// Reads a JSON config file. Missing fields take their defaults.
	pub fn load(path: &Path) -> Result<Self> {
		let raw = std::fs::read_to_string(path)?;
		let config: Self = serde_json::from_str(&raw).map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
		config.validate()
	}

	/// Applies `SKY_SELF_SCHEME`, `SKY_SELF_HOST`, `SKY_SESSION_PORT` and
	/// `SKY_SKYCHART_URI` when set.
	pub fn with_env(self) -> Result<Self> {
		self.with_vars(|key| std::env::var(key).ok())
	}

	fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
		if let Some(scheme) = var("SKY_SELF_SCHEME") {
			self.self_scheme = scheme;
		}
		if let Some(host) = var("SKY_SELF_HOST") {
			self.self_host = host;
		}
		if let Some(port) = var("SKY_SESSION_PORT") {
			self.session_port = port
				.parse()
				.map_err(|_| Error::Config(format!("SKY_SESSION_PORT is not a port: {port}")))?;
		}
		if let Some(uri) = var("SKY_SKYCHART_URI") {
			self.skychart_uri = uri;
		}
		self.validate()
	}

	/// Rejects settings under which no chart could ever resolve.
	fn validate(self) -> Result<Self> {
		if self.max_resolve_depth == 0 {
			return Err(Error::Config("maxResolveDepth must be at least 1".to_string()));
		}
		Ok(self)
	}

	/// Composes a service-local address from a suffix such as `:9234/pub/x`.
	pub fn self_uri(&self, suffix: &str) -> String {
		format!("{}://{}{}", self.self_scheme, self.self_host, suffix)
	}

	/// Address a session with identifier `id` is published at.
	pub fn session_uri(&self, id: &str) -> String {
		self.self_uri(&format!(":{}/pub/sessions/{}", self.session_port, id))
	}
}
