//! WebSocket transport.
//!
//! The export answers requests strictly in order, so correlation is a FIFO of
//! waiters rather than an id map. Enqueueing the waiter and queueing the frame
//! happen under one lock so the two queues never disagree on order.

use std::collections::VecDeque;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use sky_protocol::{Request, Response};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;

use super::{ExchangeFuture, Transport};
use crate::error::{Error, Result};

type Waiter = oneshot::Sender<Result<Response>>;

#[derive(Default)]
struct Pending {
	waiters: VecDeque<Waiter>,
	closed: bool,
}

impl Pending {
	/// Marks the socket closed and fails every outstanding request.
	fn close(&mut self) {
		self.closed = true;
		for waiter in self.waiters.drain(..) {
			let _ = waiter.send(Err(Error::ChannelClosed));
		}
	}
}

/// Transport multiplexing requests over a single WebSocket.
pub struct WebSocketTransport {
	endpoint: String,
	outbound_tx: mpsc::UnboundedSender<Message>,
	pending: Arc<Mutex<Pending>>,
}

impl WebSocketTransport {
	/// Connects to `endpoint` and starts the reader and writer tasks.
	pub async fn connect(endpoint: &str) -> Result<Self> {
		tracing::debug!(target: "sky.transport", %endpoint, "connecting websocket");

		let (stream, _) = tokio_tungstenite::connect_async(endpoint)
			.await
			.map_err(|e| Error::ConnectionFailed {
				endpoint: endpoint.to_string(),
				reason: e.to_string(),
			})?;
		let (mut sink, mut source) = stream.split();

		let pending = Arc::new(Mutex::new(Pending::default()));
		let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

		let writer_pending = Arc::clone(&pending);
		tokio::spawn(async move {
			while let Some(message) = outbound_rx.recv().await {
				if let Err(e) = sink.send(message).await {
					tracing::error!(target: "sky.transport", "websocket write error: {}", e);
					writer_pending.lock().close();
					return;
				}
			}
			let _ = sink.close().await;
		});

		let reader_pending = Arc::clone(&pending);
		let reader_endpoint = endpoint.to_string();
		tokio::spawn(async move {
			while let Some(frame) = source.next().await {
				let payload = match frame {
					Ok(Message::Text(text)) => serde_json::from_str::<Response>(&text),
					Ok(Message::Binary(bytes)) => serde_json::from_slice::<Response>(&bytes),
					Ok(Message::Close(_)) => break,
					Ok(_) => continue,
					Err(e) => {
						tracing::debug!(target: "sky.transport", endpoint = %reader_endpoint, "websocket read error: {}", e);
						break;
					}
				};

				let waiter = reader_pending.lock().waiters.pop_front();
				let Some(waiter) = waiter else {
					tracing::warn!(target: "sky.transport", endpoint = %reader_endpoint, "response without a pending request");
					continue;
				};
				let _ = waiter.send(payload.map_err(|e| Error::ProtocolError(format!("failed to parse response: {e}"))));
			}

			tracing::debug!(target: "sky.transport", endpoint = %reader_endpoint, "websocket closed");
			reader_pending.lock().close();
		});

		Ok(Self {
			endpoint: endpoint.to_string(),
			outbound_tx,
			pending,
		})
	}

	async fn send(&self, request: Request) -> Result<Response> {
		let frame = Message::Text(serde_json::to_string(&request)?);
		let (tx, rx) = oneshot::channel();

		{
			let mut pending = self.pending.lock();
			if pending.closed {
				return Err(Error::ChannelClosed);
			}
			if self.outbound_tx.send(frame).is_err() {
				pending.close();
				return Err(Error::ChannelClosed);
			}
			pending.waiters.push_back(tx);
		}

		rx.await.map_err(|_| Error::ChannelClosed)?
	}
}

impl Transport for WebSocketTransport {
	fn exchange(&self, request: Request) -> ExchangeFuture<'_> {
		Box::pin(self.send(request))
	}

	fn endpoint(&self) -> &str {
		&self.endpoint
	}
}
