//! Publish/subscribe message transport over named topics.
//!
//! Systems talk to the transport through the [`TransportNode`] trait.
//! [`LocalTransport`] is the in-process implementation: `publish` invokes
//! every subscriber synchronously on the publisher's thread, which is
//! usually not the simulation step thread.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid topic name: '{0}'")]
    InvalidTopic(String),
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// An opaque message. Receivers that only care about arrival ignore the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub payload: Vec<u8>,
}

impl Message {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

/// Callback invoked for every message delivered on a subscribed topic.
pub type MessageCallback = Arc<dyn Fn(&Message) + Send + Sync>;

// ---------------------------------------------------------------------------
// Topic names
// ---------------------------------------------------------------------------

/// Whether `topic` is usable as-is.
pub fn is_valid_topic(topic: &str) -> bool {
    !topic.is_empty()
        && topic != "/"
        && !topic.chars().any(char::is_whitespace)
        && !topic.contains('@')
        && !topic.contains('~')
        && !topic.contains(":=")
        && !topic.contains("//")
}

/// Sanitize `topic`: spaces become underscores, reserved characters are
/// dropped and repeated slashes collapse. Returns `None` if nothing valid
/// remains.
pub fn as_valid_topic(topic: &str) -> Option<String> {
    let mut cleaned = topic.trim().replace(' ', "_").replace(":=", "");
    cleaned.retain(|c| c != '@' && c != '~');
    while cleaned.contains("//") {
        cleaned = cleaned.replace("//", "/");
    }
    is_valid_topic(&cleaned).then_some(cleaned)
}

/// The first candidate that sanitizes to a valid topic.
pub fn valid_topic<S: AsRef<str>>(candidates: &[S]) -> Option<String> {
    candidates.iter().find_map(|c| as_valid_topic(c.as_ref()))
}

// ---------------------------------------------------------------------------
// TransportNode
// ---------------------------------------------------------------------------

/// The subscription side of the transport, as seen by systems.
pub trait TransportNode: std::fmt::Debug + Send + Sync {
    /// Register `callback` for every message published on `topic`.
    fn subscribe(&self, topic: &str, callback: MessageCallback) -> Result<(), TransportError>;
}

// ---------------------------------------------------------------------------
// LocalTransport
// ---------------------------------------------------------------------------

/// In-process transport. Cheap to share behind an `Arc`.
#[derive(Default)]
pub struct LocalTransport {
    subscribers: RwLock<HashMap<String, Vec<MessageCallback>>>,
}

impl std::fmt::Debug for LocalTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscribers = self.subscribers.read();
        let mut topics: Vec<(&String, usize)> =
            subscribers.iter().map(|(t, cbs)| (t, cbs.len())).collect();
        topics.sort();
        f.debug_struct("LocalTransport")
            .field("topics", &topics)
            .finish()
    }
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `message` to every subscriber of `topic` on the calling
    /// thread. Returns the number of callbacks invoked.
    pub fn publish(&self, topic: &str, message: &Message) -> Result<usize, TransportError> {
        let topic = as_valid_topic(topic)
            .ok_or_else(|| TransportError::InvalidTopic(topic.to_string()))?;
        // Snapshot so callbacks may subscribe without deadlocking.
        let callbacks: Vec<MessageCallback> = self
            .subscribers
            .read()
            .get(&topic)
            .cloned()
            .unwrap_or_default();
        for callback in &callbacks {
            callback(message);
        }
        Ok(callbacks.len())
    }

    /// Number of callbacks subscribed to `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.subscribers.read().get(topic).map_or(0, Vec::len)
    }

    /// Topics with at least one subscriber, sorted.
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.subscribers.read().keys().cloned().collect();
        topics.sort();
        topics
    }
}

impl TransportNode for LocalTransport {
    fn subscribe(&self, topic: &str, callback: MessageCallback) -> Result<(), TransportError> {
        if !is_valid_topic(topic) {
            return Err(TransportError::InvalidTopic(topic.to_string()));
        }
        self.subscribers
            .write()
            .entry(topic.to_string())
            .or_default()
            .push(callback);
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // -----------------------------------------------------------------------
    // Test 1: topic validation
    // -----------------------------------------------------------------------
    #[test]
    fn topic_validation() {
        assert!(is_valid_topic("/model/robot/detachable_joint/detach"));
        assert!(!is_valid_topic(""));
        assert!(!is_valid_topic("/"));
        assert!(!is_valid_topic("/a b"));
        assert!(!is_valid_topic("/a@b"));
        assert!(!is_valid_topic("/a//b"));
        assert!(!is_valid_topic("/a:=b"));
    }

    // -----------------------------------------------------------------------
    // Test 2: sanitization
    // -----------------------------------------------------------------------
    #[test]
    fn sanitization_repairs_common_mistakes() {
        assert_eq!(
            as_valid_topic("/model/my robot/detach").as_deref(),
            Some("/model/my_robot/detach")
        );
        assert_eq!(as_valid_topic("/a//b@").as_deref(), Some("/a/b"));
        assert_eq!(as_valid_topic("@~"), None);
        assert_eq!(as_valid_topic("  "), None);
    }

    // -----------------------------------------------------------------------
    // Test 3: valid_topic picks the first usable candidate
    // -----------------------------------------------------------------------
    #[test]
    fn valid_topic_prefers_first_candidate() {
        let candidates = ["/custom/detach", "/model/m/detachable_joint/detach"];
        assert_eq!(valid_topic(&candidates).as_deref(), Some("/custom/detach"));

        let candidates = ["@@", "/model/m/detachable_joint/detach"];
        assert_eq!(
            valid_topic(&candidates).as_deref(),
            Some("/model/m/detachable_joint/detach")
        );

        let empty: [&str; 0] = [];
        assert_eq!(valid_topic(&empty), None);
    }

    // -----------------------------------------------------------------------
    // Test 4: publish reaches every subscriber of the topic only
    // -----------------------------------------------------------------------
    #[test]
    fn publish_reaches_topic_subscribers() {
        let transport = LocalTransport::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let hits = Arc::clone(&hits);
            transport
                .subscribe(
                    "/a",
                    Arc::new(move |_: &Message| {
                        hits.fetch_add(1, Ordering::SeqCst);
                    }),
                )
                .unwrap();
        }

        assert_eq!(transport.publish("/a", &Message::empty()), Ok(2));
        assert_eq!(transport.publish("/b", &Message::empty()), Ok(0));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(transport.subscriber_count("/a"), 2);
        assert_eq!(transport.topics(), vec!["/a".to_string()]);
    }

    // -----------------------------------------------------------------------
    // Test 5: invalid topics are rejected
    // -----------------------------------------------------------------------
    #[test]
    fn subscribe_rejects_invalid_topic() {
        let transport = LocalTransport::new();
        let err = transport.subscribe("/a b", Arc::new(|_: &Message| {})).unwrap_err();
        assert_eq!(err, TransportError::InvalidTopic("/a b".to_string()));
        assert!(transport.publish("", &Message::empty()).is_err());
    }

    // -----------------------------------------------------------------------
    // Test 6: publishing from another thread
    // -----------------------------------------------------------------------
    #[test]
    fn publish_from_another_thread() {
        let transport = Arc::new(LocalTransport::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        transport
            .subscribe(
                "/t",
                Arc::new(move |msg: &Message| {
                    assert_eq!(msg.payload, b"ping".to_vec());
                    h.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        let t = Arc::clone(&transport);
        std::thread::spawn(move || t.publish("/t", &Message::new("ping")).unwrap())
            .join()
            .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
