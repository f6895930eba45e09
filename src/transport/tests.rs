use super::connection::Connection;
use super::server::{Reply, route, serve};
use crate::broker::Broker;
use crate::protocol::{Method, Request};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn_broker() -> (u16, Arc<Mutex<Broker>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().unwrap().port();
    let broker = Arc::new(Mutex::new(Broker::new()));
    tokio::spawn(serve(listener, broker.clone()));
    (port, broker)
}

fn round_trip(port: u16, request: &Request) -> Option<Vec<u8>> {
    let mut conn = Connection::connect("127.0.0.1", port, Duration::from_secs(2)).expect("connect");
    conn.send(request).expect("send");
    conn.read_response().expect("response")
}

#[test]
fn test_route_subscribe_publish_poll() {
    let broker = Mutex::new(Broker::new());
    let reply = route(&broker, Method::Put, "/subscription/alice/news", None);
    assert_eq!(reply, Reply::Ok(None));

    let reply = route(&broker, Method::Put, "/topic/news", Some(b"hi".to_vec()));
    assert_eq!(reply, Reply::Ok(None));

    let reply = route(&broker, Method::Get, "/queue/alice", None);
    assert_eq!(reply, Reply::Ok(Some(b"hi".to_vec())));

    let reply = route(&broker, Method::Get, "/queue/alice", None);
    assert_eq!(reply, Reply::NotFound);
}

#[test]
fn test_route_unsubscribe() {
    let broker = Mutex::new(Broker::new());
    route(&broker, Method::Put, "/subscription/alice/news", None);
    let reply = route(&broker, Method::Delete, "/subscription/alice/news", None);
    assert_eq!(reply, Reply::Ok(None));
    assert!(!broker.lock().is_subscribed("news", "alice"));
}

#[test]
fn test_route_rejects_unknown_paths() {
    let broker = Mutex::new(Broker::new());
    assert_eq!(route(&broker, Method::Get, "/nowhere", None), Reply::BadRequest);
    assert_eq!(route(&broker, Method::Put, "/topic/", None), Reply::BadRequest);
    assert_eq!(route(&broker, Method::Delete, "/topic/news", None), Reply::BadRequest);
}

#[test]
fn test_reply_encoding() {
    assert_eq!(
        Reply::Ok(Some(b"abc".to_vec())).encode(),
        b"HTTP/1.0 200 OK\r\nContent-Length: 3\r\n\r\nabc".to_vec()
    );
    assert_eq!(Reply::NotFound.encode(), b"HTTP/1.0 404 Not Found\r\n\r\n".to_vec());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_round_trips_against_server() {
    let (port, broker) = spawn_broker().await;

    let body = tokio::task::spawn_blocking(move || {
        assert_eq!(round_trip(port, &Request::subscribe("alice", "news")), None);
        assert_eq!(round_trip(port, &Request::publish("news", "hello")), None);
        round_trip(port, &Request::poll("alice"))
    })
    .await
    .unwrap();

    assert_eq!(body, Some(b"hello".to_vec()));
    assert_eq!(broker.lock().pending("alice"), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_poll_is_no_message() {
    let (port, _broker) = spawn_broker().await;
    let body = tokio::task::spawn_blocking(move || round_trip(port, &Request::poll("nobody")))
        .await
        .unwrap();
    assert!(body.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_acknowledgment_line() {
    let (port, _broker) = spawn_broker().await;
    let line = tokio::task::spawn_blocking(move || {
        let mut conn = Connection::connect("localhost", port, Duration::from_secs(2))?;
        conn.send(&Request::subscribe("alice", "news"))?;
        conn.read_line().map_err(std::io::Error::other)
    })
    .await
    .unwrap()
    .expect("ack");
    assert!(line.starts_with("HTTP/1.0 200 OK"));
}

#[test]
fn test_connect_refused() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    assert!(Connection::connect("127.0.0.1", port, Duration::from_millis(500)).is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_rejects_oversized_content_length() {
    use std::io::{Read, Write};

    let (port, broker) = spawn_broker().await;
    let reply = tokio::task::spawn_blocking(move || {
        let mut stream = std::net::TcpStream::connect(("127.0.0.1", port)).expect("connect");
        stream
            .write_all(b"PUT /topic/news HTTP/1.0\r\nContent-Length: 18446744073709551615\r\n\r\n")
            .unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).unwrap();
        reply
    })
    .await
    .unwrap();

    assert!(reply.starts_with("HTTP/1.0 400 Bad Request"));
    assert_eq!(broker.lock().pending("news"), 0);
}
