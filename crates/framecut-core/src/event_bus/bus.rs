//! Event bus owned by an editor session.
//!
//! There is no process-wide instance: the session creates a bus and hands an
//! `Arc` of it to the scene and to anyone observing the editor.

use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{EditorEvent, EventCategory};

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let simple = self.0.simple().to_string();
        write!(f, "sub-{}", &simple[..8])
    }
}

/// Which events a subscriber wants to see
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EventFilter {
    #[default]
    All,
    Only(EventCategory),
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &EditorEvent) -> bool {
        let category = event.category();
        match self {
            EventFilter::All => true,
            EventFilter::Only(only) => *only == category,
            EventFilter::Categories(categories) => categories.contains(&category),
        }
    }
}

/// Bus tuning
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Capacity of the broadcast channel used by async receivers
    pub channel_capacity: usize,
    /// Record published events for later inspection
    pub enable_history: bool,
    /// Oldest records are dropped past this many
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            enable_history: false,
            max_history_size: 500,
        }
    }
}

/// A published event with its position in the publish order
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub sequence: u64,
    pub event: EditorEvent,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EventBusError {
    /// Neither a handler nor an async receiver saw the event
    #[error("No active subscribers")]
    NoSubscribers,
}

struct Subscriber {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Box<dyn Fn(EditorEvent) + Send + Sync>,
}

/// Publish/subscribe channel for editor events
///
/// Synchronous handlers run on the publishing thread in subscription order.
/// Async tasks poll a [`broadcast::Receiver`] from [`EventBus::receiver`].
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
    subscribers: RwLock<Vec<Subscriber>>,
    history: Mutex<VecDeque<RecordedEvent>>,
    sequence: AtomicU64,
    config: EventBusConfig,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            subscribers: RwLock::new(Vec::new()),
            history: Mutex::new(VecDeque::new()),
            sequence: AtomicU64::new(0),
            config,
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns how many handlers and receivers were reached. The event is
    /// recorded in the history even when nobody is listening.
    pub fn publish(&self, event: EditorEvent) -> Result<usize, EventBusError> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!("event #{}: {}", sequence, event.description());

        if self.config.enable_history {
            self.record(sequence, &event);
        }

        let mut delivered = 0;
        for subscriber in self.subscribers.read().iter() {
            if subscriber.filter.matches(&event) {
                (subscriber.handler)(event.clone());
                delivered += 1;
            }
        }

        delivered += self.sender.send(event).unwrap_or(0);
        if delivered == 0 && self.subscriber_count() == 0 {
            return Err(EventBusError::NoSubscribers);
        }
        Ok(delivered)
    }

    /// Register a synchronous handler
    ///
    /// The handler must not publish on the same bus.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(EditorEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.subscribers.write().push(Subscriber {
            id,
            filter,
            handler: Box::new(handler),
        });
        tracing::debug!("{} subscribed", id);
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        let removed = subscribers.len() != before;
        if removed {
            tracing::debug!("{} unsubscribed", id);
        }
        removed
    }

    pub fn receiver(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Recorded events published after sequence `after`, or all of them
    pub fn history(&self, after: Option<u64>) -> Vec<EditorEvent> {
        self.records(after).into_iter().map(|r| r.event).collect()
    }

    pub fn records(&self, after: Option<u64>) -> Vec<RecordedEvent> {
        let after = after.unwrap_or(0);
        self.history
            .lock()
            .iter()
            .filter(|r| r.sequence > after)
            .cloned()
            .collect()
    }

    /// Sequence number of the most recently published event, 0 before any
    pub fn last_sequence(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    fn record(&self, sequence: u64, event: &EditorEvent) {
        let mut history = self.history.lock();
        history.push_back(RecordedEvent {
            sequence,
            event: event.clone(),
        });
        while history.len() > self.config.max_history_size {
            history.pop_front();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("last_sequence", &self.last_sequence())
            .field("config", &self.config)
            .finish()
    }
}
