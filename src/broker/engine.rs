use std::collections::{HashMap, VecDeque};

use crate::broker::topic::{SubscriberId, Topic};

/// Routes published bodies into per-client mailboxes.
///
/// A client's mailbox exists from its first subscription on and outlives
/// unsubscribing, so bodies already delivered can still be polled.
#[derive(Debug, Default)]
pub struct Broker {
    topics: HashMap<String, Topic>,
    mailboxes: HashMap<SubscriberId, VecDeque<Vec<u8>>>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a client to a topic. Automatically creates the topic if it doesn't exist.
    pub fn subscribe(&mut self, topic: &str, subscriber: SubscriberId) {
        self.mailboxes.entry(subscriber.clone()).or_default();
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic::new(topic))
            .subscribe(subscriber);
    }

    /// Unsubscribes a client from a topic
    /// If the topic does not exist, it will not perform any action
    pub fn unsubscribe(&mut self, topic: &str, subscriber: &SubscriberId) {
        if let Some(t) = self.topics.get_mut(topic) {
            t.unsubscribe(subscriber);
        }
    }

    /// Copies `body` into the mailbox of every subscriber of `topic` and
    /// returns how many received it. Publishing to an unknown topic is a
    /// no-op.
    pub fn publish(&mut self, topic: &str, body: Vec<u8>) -> usize {
        let Some(topic) = self.topics.get(topic) else {
            return 0;
        };
        for sub_id in &topic.subscribers {
            self.mailboxes
                .entry(sub_id.clone())
                .or_default()
                .push_back(body.clone());
        }
        topic.subscribers.len()
    }

    /// Pops the oldest body waiting for `subscriber`.
    pub fn poll(&mut self, subscriber: &str) -> Option<Vec<u8>> {
        self.mailboxes.get_mut(subscriber)?.pop_front()
    }

    /// Number of bodies waiting for `subscriber`.
    pub fn pending(&self, subscriber: &str) -> usize {
        self.mailboxes.get(subscriber).map_or(0, VecDeque::len)
    }

    pub fn is_subscribed(&self, topic: &str, subscriber: &str) -> bool {
        self.topics
            .get(topic)
            .is_some_and(|t| t.subscribers.contains(subscriber))
    }
}
