//! # Event Vocabulary
//!
//! [`EventType`] identifies what happened and is the key listeners are
//! grouped under. [`Event`] carries the typed payload for each kind, so every
//! listener subscribed to one identifier receives the same payload shape.
//!
//! Custom events cover anything outside the built-in set. Their payload is
//! free-form JSON and their identifier is the event name.

use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

/// Identifier of an event kind.
///
/// Parsing accepts the snake_case names of the built-in kinds; any other
/// string becomes [`EventType::Custom`].
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    Greet,
    FileOpened,
    FileSaved,
    RequestCompleted,
    #[strum(default)]
    Custom(String),
}

impl EventType {
    pub fn custom<S: Into<String>>(name: S) -> Self {
        Self::Custom(name.into())
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greet => write!(f, "greet"),
            Self::FileOpened => write!(f, "file_opened"),
            Self::FileSaved => write!(f, "file_saved"),
            Self::RequestCompleted => write!(f, "request_completed"),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// An event together with its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Greet {
        name: String,
    },
    FileOpened {
        path: PathBuf,
    },
    FileSaved {
        path: PathBuf,
        bytes: usize,
    },
    /// Published by a request handler once a response has been written.
    RequestCompleted {
        method: String,
        route: String,
        status: u16,
    },
    Custom {
        name: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
}

impl Event {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Greet { .. } => EventType::Greet,
            Self::FileOpened { .. } => EventType::FileOpened,
            Self::FileSaved { .. } => EventType::FileSaved,
            Self::RequestCompleted { .. } => EventType::RequestCompleted,
            Self::Custom { name, .. } => EventType::Custom(name.clone()),
        }
    }

    pub fn custom<S: Into<String>>(name: S, payload: serde_json::Value) -> Self {
        Self::Custom {
            name: name.into(),
            payload,
        }
    }
}
