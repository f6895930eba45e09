use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::broker::Broker;
use crate::protocol::framing::check_line;
use crate::protocol::{MAX_LINE_LEN, Method, check_body_len, parse_content_length, parse_request_line};
use crate::utils::error::ProtocolError;

/// Binds `addr` and serves the reference broker until the task is dropped.
pub async fn start_server(addr: &str, broker: Arc<Mutex<Broker>>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Broker listening on {}", listener.local_addr()?);
    serve(listener, broker).await
}

/// Accepts connections forever, one task per connection, one request per
/// connection.
pub async fn serve(listener: TcpListener, broker: Arc<Mutex<Broker>>) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let broker = broker.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, broker).await {
                debug!("Connection from {} failed: {}", peer, e);
            }
        });
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Reply {
    Ok(Option<Vec<u8>>),
    NotFound,
    BadRequest,
}

impl Reply {
    pub(crate) fn encode(self) -> Vec<u8> {
        match self {
            Reply::Ok(Some(body)) => {
                let mut out =
                    format!("HTTP/1.0 200 OK\r\nContent-Length: {}\r\n\r\n", body.len()).into_bytes();
                out.extend_from_slice(&body);
                out
            }
            Reply::Ok(None) => b"HTTP/1.0 200 OK\r\n\r\n".to_vec(),
            Reply::NotFound => b"HTTP/1.0 404 Not Found\r\n\r\n".to_vec(),
            Reply::BadRequest => b"HTTP/1.0 400 Bad Request\r\n\r\n".to_vec(),
        }
    }
}

async fn handle_connection(stream: TcpStream, broker: Arc<Mutex<Broker>>) -> Result<(), ProtocolError> {
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);

    let reply = match read_request(&mut reader).await {
        Ok((method, uri, body)) => route(&broker, method, &uri, body),
        Err(e @ (ProtocolError::Io(_) | ProtocolError::Closed)) => return Err(e),
        Err(e) => {
            warn!("Rejecting request: {}", e);
            Reply::BadRequest
        }
    };

    write.write_all(&reply.encode()).await?;
    write.shutdown().await?;
    Ok(())
}

async fn read_request<R>(reader: &mut R) -> Result<(Method, String, Option<Vec<u8>>), ProtocolError>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let line = read_line(reader).await?;
    let (method, uri) = parse_request_line(&line)?;

    let mut length = None;
    loop {
        let line = read_line(reader).await?;
        if line.trim().is_empty() {
            break;
        }
        if let Some(n) = parse_content_length(&line)? {
            length = Some(check_body_len(n)?);
        }
    }

    let body = match length {
        Some(n) => {
            let mut body = Vec::with_capacity(n);
            (&mut *reader).take(n as u64).read_to_end(&mut body).await?;
            if body.len() < n {
                return Err(ProtocolError::Truncated {
                    expected: n,
                    got: body.len(),
                });
            }
            Some(body)
        }
        None => None,
    };
    Ok((method, uri, body))
}

async fn read_line<R>(reader: &mut R) -> Result<String, ProtocolError>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if (&mut *reader).take(MAX_LINE_LEN as u64).read_line(&mut line).await? == 0 {
        return Err(ProtocolError::Closed);
    }
    check_line(&line)?;
    Ok(line)
}

/// Maps one parsed request onto the broker.
pub(crate) fn route(broker: &Mutex<Broker>, method: Method, uri: &str, body: Option<Vec<u8>>) -> Reply {
    let segments: Vec<&str> = uri.trim_start_matches('/').split('/').collect();
    match (method, segments.as_slice()) {
        (Method::Put, ["topic", topic]) if !topic.is_empty() => {
            let delivered = broker.lock().publish(topic, body.unwrap_or_default());
            debug!("Published to {} ({} subscribers)", topic, delivered);
            Reply::Ok(None)
        }
        (Method::Put, ["subscription", name, topic]) if !name.is_empty() && !topic.is_empty() => {
            broker.lock().subscribe(topic, name.to_string());
            debug!("{} subscribed to {}", name, topic);
            Reply::Ok(None)
        }
        (Method::Delete, ["subscription", name, topic]) => {
            broker.lock().unsubscribe(topic, &name.to_string());
            debug!("{} unsubscribed from {}", name, topic);
            Reply::Ok(None)
        }
        (Method::Get, ["queue", name]) => match broker.lock().poll(name) {
            Some(body) => Reply::Ok(Some(body)),
            None => Reply::NotFound,
        },
        _ => Reply::BadRequest,
    }
}
