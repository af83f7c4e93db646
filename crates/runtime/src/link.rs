//! Link - typed operations against one remote export.
//!
//! A [`Link`] wraps a [`Transport`] and turns export responses into the
//! three outcomes callers care about: a value, an absent value (`Ok: false`),
//! or a transport failure.

use std::sync::Arc;

use sky_protocol::{Request, Response, WireEntry};

use crate::error::{Error, Result};
use crate::transport::{self, Transport};

/// Cheap-to-clone handle to a remote export.
#[derive(Clone)]
pub struct Link {
	transport: Arc<dyn Transport>,
}

impl Link {
	/// Wraps an already connected transport.
	pub fn new(transport: Arc<dyn Transport>) -> Self {
		Self { transport }
	}

	/// Opens a transport for `url` and verifies the export answers a ping.
	pub async fn connect(url: &str) -> Result<Self> {
		let link = Self::new(transport::connect(url).await?);
		link.ping().await?;
		Ok(link)
	}

	/// Returns the export URL behind this link.
	pub fn endpoint(&self) -> &str {
		self.transport.endpoint()
	}

	pub async fn ping(&self) -> Result<()> {
		let response = self.transport.exchange(Request::ping()).await?;
		if response.ok {
			Ok(())
		} else {
			Err(remote_error("ping", "/", response))
		}
	}

	/// Fetches the entry at `path`, or `None` when the export has nothing there.
	pub async fn get(&self, path: &str) -> Result<Option<WireEntry>> {
		let response = self.transport.exchange(Request::get(path)).await?;
		Ok(output_if_ok("get", path, response))
	}

	/// Lists the immediate children of the folder at `path`.
	pub async fn enumerate(&self, path: &str) -> Result<Option<Vec<WireEntry>>> {
		let response = self.transport.exchange(Request::enumerate(path)).await?;
		Ok(output_if_ok("enumerate", path, response).map(|listing| listing.children.unwrap_or_default()))
	}

	/// Stores `entry` at `dest`, or removes `dest` when `entry` is `None`.
	///
	/// Returns whether the export accepted the write.
	pub async fn store(&self, dest: &str, entry: Option<WireEntry>) -> Result<bool> {
		let response = self.transport.exchange(Request::store(dest, entry)).await?;
		if !response.ok {
			tracing::debug!(target: "sky.transport", %dest, error = ?response.error, "store rejected");
		}
		Ok(response.ok)
	}

	/// Invokes the function at `path`. `None` means the function produced nothing.
	pub async fn invoke(&self, path: &str, input: Option<WireEntry>) -> Result<Option<WireEntry>> {
		let response = self.transport.exchange(Request::invoke(path, input)).await?;
		Ok(output_if_ok("invoke", path, response))
	}
}

impl std::fmt::Debug for Link {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Link").field("endpoint", &self.endpoint()).finish()
	}
}

fn output_if_ok(op: &'static str, path: &str, response: Response) -> Option<WireEntry> {
	if response.ok {
		response.output
	} else {
		tracing::debug!(target: "sky.transport", op, %path, error = ?response.error, "remote returned no entry");
		None
	}
}

fn remote_error(op: &'static str, path: &str, response: Response) -> Error {
	Error::Remote {
		op,
		path: path.to_string(),
		message: response.error.unwrap_or_else(|| "request failed".to_string()),
	}
}
