//! Status Announcer
//!
//! Single-slot live region. A new announcement replaces the pending one
//! (last write wins) and the slot clears itself after an urgency-dependent
//! delay. There is no queue.
//!
//! Time is supplied by the host as milliseconds so the announcer stays
//! deterministic. A scheduled clear is identified by a [`ClearHandle`]; a
//! handle superseded by a later `announce` or `clear` expires as a no-op.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AnnouncerConfig;

/// Live region politeness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Politeness {
    #[default]
    Polite,
    Assertive,
}

impl Politeness {
    /// ARIA `aria-live` value
    pub fn as_aria(&self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// Message for the live region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub message: String,
    pub politeness: Politeness,
}

impl Announcement {
    pub fn polite(message: impl Into<String>) -> Self {
        Self { message: message.into(), politeness: Politeness::Polite }
    }

    pub fn assertive(message: impl Into<String>) -> Self {
        Self { message: message.into(), politeness: Politeness::Assertive }
    }
}

/// Kind of live region mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Set,
    Cleared,
}

/// Mutation the host applies to its live region element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRegionUpdate {
    pub kind: UpdateKind,
    /// New region text; empty when cleared
    pub text: String,
    pub politeness: Politeness,
    pub timestamp_ms: u64,
}

/// Token for a scheduled auto-clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearHandle {
    generation: u64,
    pub due_at_ms: u64,
}

type Subscriber = Box<dyn FnMut(&LiveRegionUpdate)>;

/// Single-slot live region announcer
pub struct Announcer {
    config: AnnouncerConfig,
    current: Option<Announcement>,
    generation: u64,
    pending: Option<ClearHandle>,
    subscribers: Vec<(u64, Subscriber)>,
    next_subscriber: u64,
    last_timestamp_ms: u64,
}

impl fmt::Debug for Announcer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Announcer")
            .field("current", &self.current)
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for Announcer {
    fn default() -> Self {
        Self::new(AnnouncerConfig::default())
    }
}

impl Announcer {
    pub fn new(config: AnnouncerConfig) -> Self {
        Self {
            config,
            current: None,
            generation: 0,
            pending: None,
            subscribers: Vec::new(),
            next_subscriber: 0,
            last_timestamp_ms: 0,
        }
    }

    /// Current region text, empty when idle
    pub fn message(&self) -> &str {
        self.current.as_ref().map_or("", |a| a.message.as_str())
    }

    pub fn current(&self) -> Option<&Announcement> {
        self.current.as_ref()
    }

    /// The auto-clear still outstanding, if any
    pub fn pending_clear(&self) -> Option<ClearHandle> {
        self.pending
    }

    /// Receive every live region mutation, in order
    pub fn subscribe(&mut self, subscriber: impl FnMut(&LiveRegionUpdate) + 'static) -> u64 {
        let id = self.next_subscriber;
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: u64) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    /// Replace the slot with `message` and schedule its auto-clear.
    ///
    /// Repeating the message currently shown clears the slot first so the
    /// live region registers a change and re-announces it.
    pub fn announce(&mut self, message: impl Into<String>, politeness: Politeness, now_ms: u64) -> ClearHandle {
        let message = message.into();
        self.last_timestamp_ms = now_ms;
        self.generation += 1;

        if message.trim().is_empty() {
            self.clear_slot(now_ms);
            self.pending = None;
            return ClearHandle { generation: self.generation, due_at_ms: now_ms };
        }

        if self.message() == message {
            self.clear_slot(now_ms);
        }

        let delay = match politeness {
            Politeness::Polite => self.config.polite_delay_ms,
            Politeness::Assertive => self.config.assertive_delay_ms,
        };
        let handle = ClearHandle { generation: self.generation, due_at_ms: now_ms.saturating_add(delay) };
        self.pending = Some(handle);

        tracing::debug!(politeness = politeness.as_aria(), due_at_ms = handle.due_at_ms, "announce: {message}");
        self.current = Some(Announcement { message: message.clone(), politeness });
        self.emit(LiveRegionUpdate { kind: UpdateKind::Set, text: message, politeness, timestamp_ms: now_ms });
        handle
    }

    pub fn announce_polite(&mut self, message: impl Into<String>, now_ms: u64) -> ClearHandle {
        self.announce(message, Politeness::Polite, now_ms)
    }

    pub fn announce_assertive(&mut self, message: impl Into<String>, now_ms: u64) -> ClearHandle {
        self.announce(message, Politeness::Assertive, now_ms)
    }

    /// Clear the slot now and invalidate any scheduled clear
    pub fn clear(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.clear_slot(self.last_timestamp_ms);
    }

    /// Run a scheduled clear. Superseded handles do nothing.
    pub fn expire(&mut self, handle: ClearHandle) -> bool {
        if self.pending != Some(handle) {
            tracing::trace!(generation = handle.generation, "stale auto-clear ignored");
            return false;
        }
        self.pending = None;
        self.last_timestamp_ms = self.last_timestamp_ms.max(handle.due_at_ms);
        self.clear_slot(handle.due_at_ms);
        true
    }

    /// Expire the pending clear if its deadline has passed
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.pending {
            Some(handle) if handle.due_at_ms <= now_ms => self.expire(handle),
            _ => false,
        }
    }

    fn clear_slot(&mut self, timestamp_ms: u64) {
        if let Some(previous) = self.current.take() {
            self.emit(LiveRegionUpdate {
                kind: UpdateKind::Cleared,
                text: String::new(),
                politeness: previous.politeness,
                timestamp_ms,
            });
        }
    }

    fn emit(&mut self, update: LiveRegionUpdate) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&update);
        }
    }
}
