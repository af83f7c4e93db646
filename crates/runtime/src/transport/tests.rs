use futures_util::{SinkExt, StreamExt};
use sky_protocol::{Op, Request, Response, WireEntry};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use super::*;

/// Serves one websocket client, answering each request with `answer`.
/// Returning `None` closes the socket instead of answering.
async fn spawn_ws_export(answer: fn(Request) -> Option<Response>) -> String {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();

	tokio::spawn(async move {
		let (stream, _) = listener.accept().await.unwrap();
		let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
		while let Some(Ok(frame)) = ws.next().await {
			let Message::Text(text) = frame else { continue };
			let request: Request = serde_json::from_str(&text).unwrap();
			match answer(request) {
				Some(response) => {
					let json = serde_json::to_string(&response).unwrap();
					ws.send(Message::Text(json)).await.unwrap();
				}
				None => {
					let _ = ws.close(None).await;
					return;
				}
			}
		}
	});

	format!("ws://{addr}/~~export/ws")
}

fn echo_path(request: Request) -> Option<Response> {
	let path = request.path.unwrap_or_default();
	Some(Response::ok(Some(WireEntry::string("path", path))))
}

#[tokio::test]
async fn websocket_answers_in_request_order() {
	let url = spawn_ws_export(echo_path).await;
	let transport = WebSocketTransport::connect(&url).await.unwrap();

	let (a, b, c) = tokio::join!(
		transport.exchange(Request::get("/a")),
		transport.exchange(Request::get("/b")),
		transport.exchange(Request::get("/c")),
	);

	for (response, expected) in [(a, "/a"), (b, "/b"), (c, "/c")] {
		let output = response.unwrap().output.unwrap();
		assert_eq!(output.string_value.as_deref(), Some(expected));
	}
}

#[tokio::test]
async fn websocket_close_fails_pending_and_later_requests() {
	fn close_on_invoke(request: Request) -> Option<Response> {
		match request.op {
			Op::Invoke => None,
			_ => Some(Response::ok(None)),
		}
	}

	let url = spawn_ws_export(close_on_invoke).await;
	let transport = WebSocketTransport::connect(&url).await.unwrap();

	assert!(transport.exchange(Request::ping()).await.unwrap().ok);

	let err = transport.exchange(Request::invoke("/pub/open/invoke", None)).await.unwrap_err();
	assert!(err.is_disconnected(), "expected disconnect, got {err:?}");

	let err = transport.exchange(Request::ping()).await.unwrap_err();
	assert!(matches!(err, Error::ChannelClosed));
}

#[tokio::test]
async fn connect_rejects_unknown_scheme() {
	let err = connect("ftp://example.com/~~export").await.err().unwrap();
	assert!(matches!(err, Error::UnsupportedScheme(ref s) if s == "ftp"));
}

#[tokio::test]
async fn connect_reports_unreachable_websocket() {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	drop(listener);

	let err = connect(&format!("ws://{addr}/~~export/ws")).await.err().unwrap();
	assert!(matches!(err, Error::ConnectionFailed { .. }), "got {err:?}");
}

#[test]
fn http_transport_keeps_endpoint() {
	let transport = HttpTransport::new("http://127.0.0.1:1/~~export").unwrap();
	assert_eq!(transport.endpoint(), "http://127.0.0.1:1/~~export");
}
