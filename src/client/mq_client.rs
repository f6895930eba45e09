use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::client::pump::{run_puller, run_pusher};
use crate::client::shutdown::ShutdownSignal;
use crate::config::ClientSettings;
use crate::protocol::{END_OF_STREAM_TOPIC, Message, Request};
use crate::queue::BlockingQueue;
use crate::utils::error::ClientError;

/// Items carried by the outgoing queue.
#[derive(Debug)]
pub(crate) enum Outbound {
    Request(Request),
    /// Queued by `stop`. The pusher sends the reserved end-of-stream publish
    /// for it and exits.
    EndOfStream,
}

/// State shared between a `Client` and its pump threads.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) settings: ClientSettings,
    pub(crate) outgoing: BlockingQueue<Outbound>,
    pub(crate) incoming: BlockingQueue<Message>,
    pub(crate) shutdown: ShutdownSignal,
}

#[derive(Debug)]
enum Lifecycle {
    Idle,
    Running {
        pusher: JoinHandle<()>,
        puller: JoinHandle<()>,
    },
    Stopped,
}

/// A message queue client.
///
/// All operations take `&self`, so one client can be shared across
/// application threads behind an `Arc`: some publishing, one retrieving,
/// another eventually calling `stop`.
///
/// ```no_run
/// use mqclient::{Client, Message};
///
/// let client = Client::new("alice", "localhost", 9620);
/// client.subscribe("news");
/// client.start()?;
/// client.publish("news", "hello");
/// if let Message::Data(body) = client.retrieve() {
///     println!("{}", String::from_utf8_lossy(&body));
/// }
/// client.stop()?;
/// # Ok::<(), mqclient::ClientError>(())
/// ```
#[derive(Debug)]
pub struct Client {
    shared: Arc<Shared>,
    lifecycle: Mutex<Lifecycle>,
}

impl Client {
    /// Creates a client whose queue on the broker at `host:port` is `name`.
    /// Nothing touches the network until `start`.
    pub fn new(name: &str, host: &str, port: u16) -> Self {
        Self::with_settings(ClientSettings::new(name, host, port))
    }

    pub fn with_settings(settings: ClientSettings) -> Self {
        Self {
            shared: Arc::new(Shared {
                settings,
                outgoing: BlockingQueue::new(),
                incoming: BlockingQueue::new(),
                shutdown: ShutdownSignal::new(),
            }),
            lifecycle: Mutex::new(Lifecycle::Idle),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.settings.name
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.shared.settings
    }

    /// Queues a publish of `body` to `topic`.
    ///
    /// A body equal to `END_OF_STREAM_BODY` is reserved for shutdown and is
    /// discarded by every receiving client, whatever the topic.
    pub fn publish(&self, topic: &str, body: impl Into<Vec<u8>>) {
        self.send(Request::publish(topic, body));
    }

    pub fn subscribe(&self, topic: &str) {
        self.send(Request::subscribe(self.name(), topic));
    }

    pub fn unsubscribe(&self, topic: &str) {
        self.send(Request::unsubscribe(self.name(), topic));
    }

    fn send(&self, request: Request) {
        debug!("Queued {} {}", request.method(), request.uri());
        self.shared.outgoing.push(Outbound::Request(request));
    }

    /// Subscribes to the reserved end-of-stream topic, then spawns the
    /// puller and pusher threads. A client starts at most once.
    pub fn start(&self) -> Result<(), ClientError> {
        let mut lifecycle = self.lifecycle.lock();
        if !matches!(*lifecycle, Lifecycle::Idle) {
            return Err(ClientError::AlreadyStarted);
        }

        self.subscribe(END_OF_STREAM_TOPIC);

        let shared = self.shared.clone();
        let puller = thread::Builder::new()
            .name("mq-puller".into())
            .spawn(move || run_puller(shared))
            .map_err(|source| ClientError::Spawn {
                name: "puller",
                source,
            })?;

        let shared = self.shared.clone();
        let pusher = match thread::Builder::new()
            .name("mq-pusher".into())
            .spawn(move || run_pusher(shared))
        {
            Ok(pusher) => pusher,
            Err(source) => {
                self.shared.shutdown.trigger();
                if puller.join().is_err() {
                    warn!("Puller panicked while aborting start");
                }
                *lifecycle = Lifecycle::Stopped;
                return Err(ClientError::Spawn {
                    name: "pusher",
                    source,
                });
            }
        };

        *lifecycle = Lifecycle::Running { pusher, puller };
        info!(
            "Client {} started against {}:{}",
            self.name(),
            self.shared.settings.host,
            self.shared.settings.port
        );
        Ok(())
    }

    /// Shuts the client down and blocks until both pump threads exit.
    ///
    /// Requests queued before this call are still sent. Once the threads are
    /// joined, one `Message::EndOfStream` is queued for `retrieve`. Stopping
    /// an already stopped client is a no-op.
    pub fn stop(&self) -> Result<(), ClientError> {
        let mut lifecycle = self.lifecycle.lock();
        let (pusher, puller) = match std::mem::replace(&mut *lifecycle, Lifecycle::Stopped) {
            Lifecycle::Running { pusher, puller } => (pusher, puller),
            Lifecycle::Stopped => return Ok(()),
            Lifecycle::Idle => {
                *lifecycle = Lifecycle::Idle;
                return Err(ClientError::NotStarted);
            }
        };

        self.shared.shutdown.trigger();
        // The pusher may be parked in `pop`; only an item wakes it.
        self.shared.outgoing.push(Outbound::EndOfStream);

        let puller_result = puller.join();
        let pusher_result = pusher.join();
        self.shared.incoming.push(Message::EndOfStream);
        info!("Client {} stopped", self.name());

        puller_result.map_err(|_| ClientError::PumpPanicked("puller"))?;
        pusher_result.map_err(|_| ClientError::PumpPanicked("pusher"))?;
        Ok(())
    }

    /// True once `stop` has begun. Never goes back to false.
    pub fn is_shutdown(&self) -> bool {
        self.shared.shutdown.is_set()
    }

    /// Takes the next delivered message, blocking until there is one.
    ///
    /// After `stop`, this yields `Message::EndOfStream` once; further calls
    /// block.
    pub fn retrieve(&self) -> Message {
        self.shared.incoming.pop()
    }

    /// Like `retrieve`, but gives up after `timeout`.
    pub fn retrieve_timeout(&self, timeout: Duration) -> Option<Message> {
        self.shared.incoming.pop_timeout(timeout)
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if matches!(*self.lifecycle.get_mut(), Lifecycle::Running { .. }) {
            if let Err(e) = self.stop() {
                warn!("Client {} stopped uncleanly: {}", self.name(), e);
            }
        }

        let unsent = self.shared.outgoing.drain().len();
        if unsent > 0 {
            warn!("Client {} released {} unsent requests", self.name(), unsent);
        }
        let unread = self
            .shared
            .incoming
            .drain()
            .into_iter()
            .filter(|m| !m.is_end_of_stream())
            .count();
        if unread > 0 {
            debug!("Client {} released {} unread messages", self.name(), unread);
        }
    }
}
