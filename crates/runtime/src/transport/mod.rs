//! Transports carrying export requests to a remote namespace.
//!
//! A transport moves one [`Request`] to the export and hands back the matching
//! [`Response`]. Selection is by URL scheme:
//!
//! - `http`, `https`: [`HttpTransport`], one POST per request
//! - `ws`, `wss`: [`WebSocketTransport`], one socket, responses in request order

mod http;
mod websocket;

#[cfg(test)]
mod tests;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sky_protocol::{Request, Response};
use url::Url;

pub use self::http::HttpTransport;
pub use self::websocket::WebSocketTransport;
use crate::error::{Error, Result};

/// Boxed future returned by [`Transport::exchange`].
pub type ExchangeFuture<'a> = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'a>>;

/// A request/response channel to a single export endpoint.
pub trait Transport: Send + Sync {
	/// Sends `request` and resolves with the export's response.
	fn exchange(&self, request: Request) -> ExchangeFuture<'_>;

	/// Returns the export URL this transport talks to.
	fn endpoint(&self) -> &str;
}

/// Opens the transport matching `url`'s scheme.
pub async fn connect(url: &str) -> Result<Arc<dyn Transport>> {
	let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl {
		url: url.to_string(),
		reason: e.to_string(),
	})?;

	let transport: Arc<dyn Transport> = match parsed.scheme() {
		"http" | "https" => Arc::new(HttpTransport::new(url)?),
		"ws" | "wss" => Arc::new(WebSocketTransport::connect(url).await?),
		other => return Err(Error::UnsupportedScheme(other.to_string())),
	};
	Ok(transport)
}
