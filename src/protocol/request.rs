use std::fmt;
use std::str::FromStr;

use crate::utils::error::ProtocolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(ProtocolError::Method(other.to_string())),
        }
    }
}

/// A single unit of work moved through the queues.
///
/// Requests are immutable once built. Whoever holds one owns it outright:
/// the queue, then the pump loop that pops it, which drops it once sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    uri: String,
    body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, uri: impl Into<String>, body: Option<Vec<u8>>) -> Self {
        Self {
            method,
            uri: uri.into(),
            body,
        }
    }

    /// `PUT /topic/<topic>` carrying `body`.
    pub fn publish(topic: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::new(Method::Put, format!("/topic/{topic}"), Some(body.into()))
    }

    /// `PUT /subscription/<name>/<topic>`.
    pub fn subscribe(name: &str, topic: &str) -> Self {
        Self::new(Method::Put, subscription_uri(name, topic), None)
    }

    /// `DELETE /subscription/<name>/<topic>`.
    pub fn unsubscribe(name: &str, topic: &str) -> Self {
        Self::new(Method::Delete, subscription_uri(name, topic), None)
    }

    /// `GET /queue/<name>`, the puller's poll of its own mailbox.
    pub fn poll(name: &str) -> Self {
        Self::new(Method::Get, format!("/queue/{name}"), None)
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Length of the body in bytes, zero when there is none.
    pub fn len(&self) -> usize {
        self.body.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn subscription_uri(name: &str, topic: &str) -> String {
    format!("/subscription/{name}/{topic}")
}
