use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::client::mq_client::{Outbound, Shared};
use crate::client::retry::Backoff;
use crate::protocol::{END_OF_STREAM_BODY, END_OF_STREAM_TOPIC, Message, Request};
use crate::transport::Connection;

/// Sends every outgoing request, oldest first, until it has sent the
/// end-of-stream publish queued by `stop`.
///
/// Delivery is at-most-once: a request whose connection cannot be opened
/// is dropped, not requeued.
pub(crate) fn run_pusher(shared: Arc<Shared>) {
    debug!("Pusher started");
    loop {
        match shared.outgoing.pop() {
            Outbound::Request(request) => deliver(&shared, &request),
            Outbound::EndOfStream => {
                deliver(&shared, &Request::publish(END_OF_STREAM_TOPIC, END_OF_STREAM_BODY));
                break;
            }
        }
    }
    debug!("Pusher stopped");
}

fn deliver(shared: &Shared, request: &Request) {
    let settings = &shared.settings;
    let mut conn = match Connection::connect(&settings.host, settings.port, settings.io_timeout()) {
        Ok(conn) => conn,
        Err(e) => {
            warn!(
                "Dropping {} {}: cannot connect to {}:{}: {}",
                request.method(),
                request.uri(),
                settings.host,
                settings.port,
                e
            );
            return;
        }
    };

    if let Err(e) = conn.send(request) {
        warn!("Dropping {} {}: {}", request.method(), request.uri(), e);
        return;
    }
    match conn.read_line() {
        Ok(ack) => trace!("{} {} -> {}", request.method(), request.uri(), ack.trim_end()),
        Err(e) => debug!("No acknowledgment for {} {}: {}", request.method(), request.uri(), e),
    }
}

/// Polls the client's own queue on the broker until shutdown, pushing each
/// delivered body onto `incoming`.
pub(crate) fn run_puller(shared: Arc<Shared>) {
    let settings = &shared.settings;
    let poll = Request::poll(&settings.name);
    let mut backoff = Backoff::new(settings.retry_policy());
    debug!("Puller started");

    while !shared.shutdown.is_set() {
        let mut conn = match Connection::connect(&settings.host, settings.port, settings.io_timeout()) {
            Ok(conn) => {
                backoff.reset();
                conn
            }
            Err(e) => {
                let delay = backoff.next_delay();
                if backoff.exhausted() {
                    warn!(
                        "Broker {}:{} unreachable after {} attempts: {}",
                        settings.host,
                        settings.port,
                        backoff.attempt(),
                        e
                    );
                    backoff.reset();
                } else {
                    debug!("Poll connect failed, retrying in {:?}: {}", delay, e);
                }
                shared.shutdown.wait_timeout(delay);
                continue;
            }
        };

        let received = match conn.send(&poll) {
            Ok(()) => conn.read_response(),
            Err(e) => Err(e.into()),
        };
        drop(conn);

        match received {
            // Another client's stop fans this out to every subscriber of the
            // reserved topic; it is never data.
            Ok(Some(body)) if body.as_slice() == END_OF_STREAM_BODY => {
                trace!("Discarding end-of-stream marker");
            }
            Ok(Some(body)) => {
                trace!("Received {} bytes", body.len());
                shared.incoming.push(Message::Data(body));
            }
            Ok(None) => {
                shared.shutdown.wait_timeout(settings.poll_interval());
            }
            Err(e) => {
                debug!("Poll failed: {}", e);
                shared.shutdown.wait_timeout(settings.poll_interval());
            }
        }
    }
    debug!("Puller stopped");
}
