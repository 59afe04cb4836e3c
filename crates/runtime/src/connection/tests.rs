use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request as ServerRequest, Response as ServerResponse};
use tokio_tungstenite::tungstenite::http::HeaderMap;

use super::*;

const WAIT: Duration = Duration::from_secs(5);

async fn next_event(rx: &mut mpsc::UnboundedReceiver<SocketEvent>) -> Option<SocketEvent> {
	tokio::time::timeout(WAIT, rx.recv()).await.expect("timed out waiting for socket event")
}

/// Binds a listener and returns it with its `ws://` URL.
async fn listen() -> (TcpListener, String) {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let url = format!("ws://{}/v4/websocket", listener.local_addr().unwrap());
	(listener, url)
}

#[test]
fn build_request_attaches_headers() {
	let request = build_request(
		"ws://localhost:2333/v4/websocket",
		&[("Authorization", "pw".to_string()), ("Session-Id", String::new())],
	)
	.unwrap();

	assert_eq!(request.headers()["authorization"], "pw");
	assert_eq!(request.headers()["session-id"], "");
	assert_eq!(request.uri().path(), "/v4/websocket");
}

#[test]
fn build_request_rejects_invalid_header_value() {
	let err = build_request("ws://localhost:2333/v4/websocket", &[("Authorization", "bad\nvalue".to_string())]).unwrap_err();
	assert!(err.is_configuration());
}

#[test]
fn open_requires_runtime() {
	let request = build_request("ws://localhost:2333/v4/websocket", &[]).unwrap();
	let (sink, _rx) = NodeSink::channel();
	let err = Connection::open(request, sink).unwrap_err();
	assert!(matches!(err, Error::Runtime(_)));
}

#[tokio::test]
async fn forwards_lifecycle_in_order() {
	let (listener, url) = listen().await;
	let (headers_tx, headers_rx) = oneshot::channel::<HeaderMap>();

	let server = tokio::spawn(async move {
		let (stream, _) = listener.accept().await.unwrap();
		let callback = move |request: &ServerRequest, response: ServerResponse| -> std::result::Result<ServerResponse, ErrorResponse> {
			let _ = headers_tx.send(request.headers().clone());
			Ok(response)
		};
		let mut ws = accept_hdr_async(stream, callback).await.unwrap();
		ws.send(Message::Text(r#"{"op":"ready","resumed":false,"sessionId":"abc"}"#.into())).await.unwrap();
		ws.send(Message::Text("not json".into())).await.unwrap();
		ws.send(Message::Text(r#"{"op":"stats","players":0}"#.into())).await.unwrap();
		ws.close(Some(CloseFrame {
			code: CloseCode::from(4000),
			reason: "bye".into(),
		}))
		.await
		.unwrap();
		while ws.next().await.is_some() {}
	});

	let request = build_request(&url, &[("Authorization", "pw".to_string()), ("User-Id", "42".to_string())]).unwrap();
	let (sink, mut rx) = NodeSink::channel();
	let handle = Connection::open(request, sink).unwrap();

	assert_eq!(next_event(&mut rx).await, Some(SocketEvent::Open));
	match next_event(&mut rx).await {
		Some(SocketEvent::Message(value)) => assert_eq!(value["sessionId"], "abc"),
		other => panic!("Expected ready message, got {other:?}"),
	}
	assert!(matches!(next_event(&mut rx).await, Some(SocketEvent::Error(msg)) if msg.contains("malformed")));
	match next_event(&mut rx).await {
		Some(SocketEvent::Message(value)) => assert_eq!(value["op"], "stats"),
		other => panic!("Expected stats message, got {other:?}"),
	}
	assert_eq!(
		next_event(&mut rx).await,
		Some(SocketEvent::Close {
			code: 4000,
			reason: "bye".to_string()
		})
	);
	assert_eq!(next_event(&mut rx).await, None);
	assert!(handle.is_closed());

	let headers = headers_rx.await.unwrap();
	assert_eq!(headers["authorization"], "pw");
	assert_eq!(headers["user-id"], "42");
	let _ = tokio::time::timeout(WAIT, server).await;
}

#[tokio::test]
async fn discarded_socket_closes_silently() {
	let (listener, url) = listen().await;
	let (frame_tx, frame_rx) = oneshot::channel::<Option<(u16, String)>>();

	let server = tokio::spawn(async move {
		let (stream, _) = listener.accept().await.unwrap();
		let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
		let mut received = None;
		while let Some(Ok(message)) = ws.next().await {
			if let Message::Close(frame) = message {
				received = frame.map(|f| (u16::from(f.code), f.reason.into_owned()));
				break;
			}
		}
		let _ = frame_tx.send(received);
	});

	let (sink, mut rx) = NodeSink::channel();
	let handle = Connection::open(build_request(&url, &[]).unwrap(), sink).unwrap();
	assert_eq!(next_event(&mut rx).await, Some(SocketEvent::Open));

	handle.discard(1000, "Self closed");
	assert!(handle.is_closed());
	assert_eq!(next_event(&mut rx).await, None, "a discarded socket must not report its close");

	let frame = tokio::time::timeout(WAIT, frame_rx).await.unwrap().unwrap();
	assert_eq!(frame, Some((1000, "Self closed".to_string())));
	let _ = tokio::time::timeout(WAIT, server).await;
}

#[tokio::test]
async fn self_close_sends_frame_and_reports_close() {
	let (listener, url) = listen().await;
	let (frame_tx, frame_rx) = oneshot::channel::<Option<(u16, String)>>();

	let server = tokio::spawn(async move {
		let (stream, _) = listener.accept().await.unwrap();
		let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
		let mut received = None;
		while let Some(Ok(message)) = ws.next().await {
			if let Message::Close(frame) = message {
				received = frame.map(|f| (u16::from(f.code), f.reason.into_owned()));
				break;
			}
		}
		let _ = frame_tx.send(received);
	});

	let (sink, mut rx) = NodeSink::channel();
	let handle = Connection::open(build_request(&url, &[]).unwrap(), sink).unwrap();
	assert_eq!(next_event(&mut rx).await, Some(SocketEvent::Open));

	handle.close(1000, "Self closed");
	handle.close(1000, "twice");
	assert!(handle.is_closed());

	assert_eq!(
		next_event(&mut rx).await,
		Some(SocketEvent::Close {
			code: 1000,
			reason: "Self closed".to_string()
		})
	);
	assert_eq!(next_event(&mut rx).await, None);

	let frame = tokio::time::timeout(WAIT, frame_rx).await.unwrap().unwrap();
	assert_eq!(frame, Some((1000, "Self closed".to_string())));
	let _ = tokio::time::timeout(WAIT, server).await;
}

#[tokio::test]
async fn failed_handshake_reports_error_then_close() {
	let (listener, url) = listen().await;
	drop(listener);

	let (sink, mut rx) = NodeSink::channel();
	let _handle = Connection::open(build_request(&url, &[]).unwrap(), sink).unwrap();

	assert!(matches!(next_event(&mut rx).await, Some(SocketEvent::Error(_))));
	assert!(matches!(
		next_event(&mut rx).await,
		Some(SocketEvent::Close { code: ABNORMAL_CLOSE, .. })
	));
	assert_eq!(next_event(&mut rx).await, None);
}

#[tokio::test]
async fn dropped_peer_reports_abnormal_close() {
	let (listener, url) = listen().await;

	let server = tokio::spawn(async move {
		let (stream, _) = listener.accept().await.unwrap();
		let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
		drop(ws);
	});

	let (sink, mut rx) = NodeSink::channel();
	let _handle = Connection::open(build_request(&url, &[]).unwrap(), sink).unwrap();
	assert_eq!(next_event(&mut rx).await, Some(SocketEvent::Open));

	let mut saw_close = false;
	while let Some(event) = next_event(&mut rx).await {
		match event {
			SocketEvent::Close { code, .. } => {
				assert_eq!(code, ABNORMAL_CLOSE);
				saw_close = true;
			}
			SocketEvent::Error(_) => assert!(!saw_close, "error delivered after close"),
			other => panic!("Unexpected event {other:?}"),
		}
	}
	assert!(saw_close);
	let _ = tokio::time::timeout(WAIT, server).await;
}
