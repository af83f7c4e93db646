use sky_protocol::{Request, Response};

use super::{ExchangeFuture, Transport};
use crate::error::{Error, Result};

/// Stateless transport posting each request as JSON to the export URL.
pub struct HttpTransport {
	client: reqwest::Client,
	endpoint: String,
}

impl HttpTransport {
	pub fn new(endpoint: impl Into<String>) -> Result<Self> {
		let endpoint = endpoint.into();
		let client = reqwest::Client::builder().build().map_err(|e| Error::ConnectionFailed {
			endpoint: endpoint.clone(),
			reason: format!("failed to create HTTP client: {e}"),
		})?;
		Ok(Self { client, endpoint })
	}

	async fn post(&self, request: Request) -> Result<Response> {
		tracing::debug!(target: "sky.transport", endpoint = %self.endpoint, op = ?request.op, "posting request");

		let response = self
			.client
			.post(&self.endpoint)
			.json(&request)
			.send()
			.await
			.map_err(|e| Error::ConnectionFailed {
				endpoint: self.endpoint.clone(),
				reason: e.to_string(),
			})?;

		if !response.status().is_success() {
			return Err(Error::TransportError(format!("unexpected status {} from {}", response.status(), self.endpoint)));
		}

		response
			.json::<Response>()
			.await
			.map_err(|e| Error::ProtocolError(format!("failed to parse response from {}: {e}", self.endpoint)))
	}
}

impl Transport for HttpTransport {
	fn exchange(&self, request: Request) -> ExchangeFuture<'_> {
		Box::pin(self.post(request))
	}

	fn endpoint(&self) -> &str {
		&self.endpoint
	}
}
