//! Integration tests for the WebSocket client adapter.
//!
//! Each test spins up a real loopback tungstenite server, connects the
//! adapter to it, and verifies that frames and lifecycle events actually
//! flow over the network in order.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use cardlink_transport::{TransportError, TransportEvent, WsTransport};

type ServerWs =
    tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

/// Binds a loopback server on a random port. Returns its URL and a task
/// that resolves with the accepted server-side stream.
async fn spawn_server() -> (String, tokio::task::JoinHandle<ServerWs>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("should have local addr");

    let handle = tokio::spawn(async move {
        let (stream, _) =
            listener.accept().await.expect("should accept");
        tokio_tungstenite::accept_async(stream)
            .await
            .expect("should upgrade")
    });

    (format!("ws://{addr}"), handle)
}

#[tokio::test]
async fn test_connect_emits_connected_first() {
    let (url, server) = spawn_server().await;
    let (_handle, mut events) =
        WsTransport::connect(&url).await.expect("should connect");
    let _server_ws = server.await.unwrap();

    assert_eq!(events.recv().await, Some(TransportEvent::Connected));
}

#[tokio::test]
async fn test_inbound_frames_arrive_in_order() {
    let (url, server) = spawn_server().await;
    let (_handle, mut events) =
        WsTransport::connect(&url).await.expect("should connect");
    let mut server_ws = server.await.unwrap();

    server_ws
        .send(Message::Text("first".into()))
        .await
        .unwrap();
    server_ws
        .send(Message::Text("second".into()))
        .await
        .unwrap();

    assert_eq!(events.recv().await, Some(TransportEvent::Connected));
    assert_eq!(
        events.recv().await,
        Some(TransportEvent::Received("first".into()))
    );
    assert_eq!(
        events.recv().await,
        Some(TransportEvent::Received("second".into()))
    );
}

#[tokio::test]
async fn test_send_reaches_the_server() {
    let (url, server) = spawn_server().await;
    let (handle, _events) =
        WsTransport::connect(&url).await.expect("should connect");
    let mut server_ws = server.await.unwrap();

    handle
        .send(r#"{"type": 9, "data": {}}"#)
        .await
        .expect("send should succeed");

    let frame = server_ws.next().await.unwrap().unwrap();
    assert_eq!(
        frame.into_text().unwrap().as_str(),
        r#"{"type": 9, "data": {}}"#
    );
}

#[tokio::test]
async fn test_server_close_emits_disconnected_last() {
    let (url, server) = spawn_server().await;
    let (handle, mut events) =
        WsTransport::connect(&url).await.expect("should connect");
    let mut server_ws = server.await.unwrap();

    server_ws.send(Message::Close(None)).await.unwrap();

    assert_eq!(events.recv().await, Some(TransportEvent::Connected));
    assert_eq!(
        events.recv().await,
        Some(TransportEvent::Disconnected)
    );

    // Nothing follows the disconnect: once the handle is gone the
    // channel just ends.
    drop(handle);
    assert_eq!(events.recv().await, None);
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let (url, server) = spawn_server().await;
    let (handle, mut events) =
        WsTransport::connect(&url).await.expect("should connect");
    let server_ws = server.await.unwrap();

    handle.disconnect().await;
    handle.disconnect().await;
    assert!(!handle.is_open());

    assert_eq!(events.recv().await, Some(TransportEvent::Connected));
    assert_eq!(
        events.recv().await,
        Some(TransportEvent::Disconnected)
    );

    drop(server_ws);
    drop(handle);
    assert_eq!(events.recv().await, None);
}

#[tokio::test]
async fn test_send_after_disconnect_fails_with_closed() {
    let (url, server) = spawn_server().await;
    let (handle, _events) =
        WsTransport::connect(&url).await.expect("should connect");
    let _server_ws = server.await.unwrap();

    handle.disconnect().await;
    let err = handle.send("late").await.unwrap_err();
    assert!(matches!(err, TransportError::Closed));
}

#[tokio::test]
async fn test_connect_to_dead_port_fails() {
    // Bind and immediately drop a listener to get a port nobody serves.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = WsTransport::connect(&format!("ws://{addr}")).await;
    assert!(matches!(
        result,
        Err(TransportError::ConnectFailed(_))
    ));
}
