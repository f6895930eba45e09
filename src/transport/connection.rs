use std::io::{self, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::protocol::framing;
use crate::protocol::Request;
use crate::utils::error::ProtocolError;

/// One request/response cycle with the broker. Dropping it closes the
/// socket.
#[derive(Debug)]
pub struct Connection {
    reader: BufReader<TcpStream>,
}

impl Connection {
    /// Connects to the first reachable address of `host:port`.
    ///
    /// A non-zero `timeout` bounds the connect call and every later read and
    /// write; zero leaves them unbounded.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> io::Result<Self> {
        let mut last_err = None;
        for addr in (host, port).to_socket_addrs()? {
            let attempt = if timeout.is_zero() {
                TcpStream::connect(addr)
            } else {
                TcpStream::connect_timeout(&addr, timeout)
            };
            match attempt {
                Ok(stream) => {
                    if !timeout.is_zero() {
                        stream.set_read_timeout(Some(timeout))?;
                        stream.set_write_timeout(Some(timeout))?;
                    }
                    return Ok(Self {
                        reader: BufReader::new(stream),
                    });
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no address found for {host}:{port}"),
            )
        }))
    }

    pub fn send(&mut self, request: &Request) -> io::Result<()> {
        let mut buf = Vec::with_capacity(64 + request.len());
        request.write_to(&mut buf)?;
        self.reader.get_mut().write_all(&buf)
    }

    /// Reads a single line, such as the acknowledgment the pusher waits for.
    pub fn read_line(&mut self) -> Result<String, ProtocolError> {
        framing::read_line(&mut self.reader)
    }

    pub fn read_response(&mut self) -> Result<Option<Vec<u8>>, ProtocolError> {
        framing::read_response(&mut self.reader)
    }
}
