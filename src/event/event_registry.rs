//! # Event Registry
//!
//! [`EventRegistry`] maps event identifiers to the ordered list of listeners
//! subscribed to them and invokes those listeners synchronously on publish.
//!
//! ## Dispatch Rules
//!
//! - Listeners run in the order they were subscribed, on the caller's thread.
//! - `publish` iterates a snapshot taken when it starts. Listeners may
//!   subscribe, unsubscribe or publish on the same registry; those changes
//!   only affect later publications.
//! - No lock is held while a listener runs.
//! - Listener errors are handled according to [`FailurePolicy`].
//!
//! ## Concurrency
//!
//! Storage is a [`DashMap`], so structural changes to one identifier are
//! mutually exclusive while publishes for different identifiers never block
//! each other. Concurrent publishes for the same identifier are not
//! serialized and their passes may interleave.

use std::{fmt, hash::Hash};

use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    config::{FailurePolicy, RegistryConfig},
    event::{
        event_type::{Event, EventType},
        listener::{Listener, ListenerError, ListenerId},
    },
};

/// Identifier listeners are grouped under.
pub trait EventKey: Eq + Hash + Clone + fmt::Display {
    /// Whether the identifier may be subscribed to.
    fn is_valid(&self) -> bool {
        true
    }
}

impl EventKey for EventType {
    // A custom name must not print like a built-in kind, or the two would be
    // indistinguishable in logs and errors while living under different keys.
    fn is_valid(&self) -> bool {
        match self {
            EventType::Custom(name) => {
                !name.is_empty() && matches!(name.parse::<EventType>(), Ok(EventType::Custom(_)))
            }
            _ => true,
        }
    }
}

impl EventKey for String {
    fn is_valid(&self) -> bool {
        !self.is_empty()
    }
}

impl EventKey for &'static str {
    fn is_valid(&self) -> bool {
        !self.is_empty()
    }
}

pub struct EventRegistry<K = EventType, P = Event>
where
    K: EventKey,
{
    listeners: DashMap<K, Vec<Listener<P>>>,
    config: RegistryConfig,
}

impl<K: EventKey, P: 'static> Default for EventRegistry<K, P> {
    fn default() -> Self {
        Self::with_config(RegistryConfig::default())
    }
}

impl<K: EventKey, P: 'static> EventRegistry<K, P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            listeners: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Appends `listener` to the listeners of `event_type`.
    ///
    /// The listener is not invoked. Inactive handles and invalid identifiers
    /// (empty, or a custom name shadowing a built-in kind) are rejected
    /// without touching the registry.
    pub fn subscribe(&self, event_type: K, listener: Listener<P>) -> EventResult<()> {
        if !event_type.is_valid() {
            return Err(EventError::InvalidEventType);
        }
        if let Some(reason) = listener.inactive_reason() {
            return Err(EventError::InvalidListener {
                event_type: event_type.to_string(),
                reason: reason.to_string(),
            });
        }

        let listener_id = listener.id();
        let count = {
            let mut entry = self.listeners.entry(event_type.clone()).or_default();
            entry.retain(Listener::is_active);
            entry.push(listener);
            entry.len()
        };
        debug!(%event_type, %listener_id, count, "listener subscribed");

        if self.config.max_listeners > 0 && count > self.config.max_listeners {
            warn!(
                %event_type,
                count,
                max_listeners = self.config.max_listeners,
                "listener count exceeds max_listeners, possible listener leak"
            );
        }
        Ok(())
    }

    /// Removes the first subscription of `listener` to `event_type`.
    ///
    /// Returns `false` when the identifier is unknown or the listener is not
    /// subscribed to it.
    pub fn unsubscribe(&self, event_type: &K, listener: &Listener<P>) -> bool {
        let removed = {
            let Some(mut entry) = self.listeners.get_mut(event_type) else {
                return false;
            };
            let position = entry.iter().position(|l| l.id() == listener.id());
            if let Some(position) = position {
                entry.remove(position);
            }
            entry.retain(Listener::is_active);
            position.is_some()
        };
        self.listeners
            .remove_if(event_type, |_, listeners| listeners.is_empty());

        if removed {
            debug!(%event_type, listener_id = %listener.id(), "listener unsubscribed");
        }
        removed
    }

    /// Invokes every active listener of `event_type` with `payload`.
    ///
    /// Returns how many listeners ran. An unknown identifier is not an error
    /// and yields `Ok(0)`; an identifier `subscribe` would reject fails with
    /// [`EventError::InvalidEventType`].
    pub fn publish(&self, event_type: &K, payload: &P) -> EventResult<usize> {
        if !event_type.is_valid() {
            return Err(EventError::InvalidEventType);
        }
        let Some(snapshot) = self.snapshot(event_type) else {
            trace!(%event_type, "no listeners");
            return Ok(0);
        };

        let mut invoked = 0;
        let mut failures = Vec::new();
        for (position, listener) in snapshot.iter().enumerate() {
            let Some(result) = listener.invoke(payload) else {
                continue;
            };
            invoked += 1;
            trace!(%event_type, listener_id = %listener.id(), position, "listener invoked");

            let Err(source) = result else {
                continue;
            };
            debug!(%event_type, listener_id = %listener.id(), position, error = %source, "listener failed");
            match self.config.failure_policy {
                FailurePolicy::Propagate => {
                    return Err(EventError::ListenerFailure {
                        event_type: event_type.to_string(),
                        position,
                        listener_id: listener.id(),
                        source,
                    });
                }
                FailurePolicy::CollectAndContinue => failures.push(ListenerFault {
                    position,
                    listener_id: listener.id(),
                    source,
                }),
            }
        }

        if failures.is_empty() {
            Ok(invoked)
        } else {
            Err(EventError::ListenerFailures {
                event_type: event_type.to_string(),
                invoked,
                failures,
            })
        }
    }

    /// Number of active listeners subscribed to `event_type`.
    pub fn listener_count(&self, event_type: &K) -> usize {
        self.listeners
            .get(event_type)
            .map(|entry| entry.iter().filter(|l| l.is_active()).count())
            .unwrap_or(0)
    }

    pub fn contains(&self, event_type: &K) -> bool {
        self.listener_count(event_type) > 0
    }

    /// Identifiers that currently hold at least one active listener.
    pub fn event_types(&self) -> Vec<K> {
        self.listeners
            .iter()
            .filter(|entry| entry.value().iter().any(Listener::is_active))
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Drops every listener of `event_type`, returning how many were removed.
    pub fn clear(&self, event_type: &K) -> usize {
        let removed = self
            .listeners
            .remove(event_type)
            .map(|(_, listeners)| listeners.len())
            .unwrap_or(0);
        debug!(%event_type, removed, "listeners cleared");
        removed
    }

    pub fn clear_all(&self) {
        self.listeners.clear();
        debug!("all listeners cleared");
    }

    /// Removes spent one-shot listeners and weak listeners whose target is
    /// gone. Returns how many handles were dropped.
    pub fn prune(&self) -> usize {
        let mut removed = 0;
        self.listeners.retain(|_, listeners| {
            let before = listeners.len();
            listeners.retain(Listener::is_active);
            removed += before - listeners.len();
            !listeners.is_empty()
        });
        if removed > 0 {
            debug!(removed, "inactive listeners pruned");
        }
        removed
    }

    // The map guard is released before the caller invokes anything.
    fn snapshot(&self, event_type: &K) -> Option<Vec<Listener<P>>> {
        self.listeners
            .get(event_type)
            .map(|entry| entry.value().clone())
    }
}

impl EventRegistry<EventType, Event> {
    /// Publishes `event` under its own [`EventType`].
    pub fn emit(&self, event: &Event) -> EventResult<usize> {
        self.publish(&event.event_type(), event)
    }
}

impl<K: EventKey, P> fmt::Debug for EventRegistry<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("event_types", &self.listeners.len())
            .field("config", &self.config)
            .finish()
    }
}

/// A single listener error collected under [`FailurePolicy::CollectAndContinue`].
#[derive(Debug)]
pub struct ListenerFault {
    pub position: usize,
    pub listener_id: ListenerId,
    pub source: ListenerError,
}

impl fmt::Display for ListenerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "listener {} at position {}: {}",
            self.listener_id, self.position, self.source
        )
    }
}

#[derive(Error, Debug)]
pub enum EventError {
    #[error("Invalid listener for event {event_type}: {reason}")]
    InvalidListener { event_type: String, reason: String },

    #[error("Event type is empty or shadows a built-in event type")]
    InvalidEventType,

    #[error("Listener {listener_id} failed at position {position} for event {event_type}: {source}")]
    ListenerFailure {
        event_type: String,
        position: usize,
        listener_id: ListenerId,
        #[source]
        source: ListenerError,
    },

    #[error("{} listener(s) failed for event {event_type} ({invoked} invoked)", .failures.len())]
    ListenerFailures {
        event_type: String,
        invoked: usize,
        failures: Vec<ListenerFault>,
    },
}

pub type EventResult<T> = Result<T, EventError>;
