//! # Event Dispatching
//!
//! The event module lets loosely coupled components react to each other
//! without direct dependencies. Components subscribe listeners during setup
//! and publish events when something happens in their domain.
//!
//! ## Architecture Overview
//!
//! - **EventRegistry**: maps event identifiers to ordered listener lists and
//!   invokes them synchronously on publish
//! - **Listener**: handle around a callable, with persistent, one-shot and
//!   weak variants
//! - **EventType / Event**: typed event vocabulary, identifier plus payload
//!
//! ## Event Flow
//!
//! ```text
//! ┌──────────┐  publish   ┌───────────────┐  snapshot   ┌────────────┐
//! │Publisher │──────────▶│ EventRegistry │────────────▶│ Listener 1 │
//! └──────────┘            └───────────────┘      │      ├────────────┤
//!                                                 └─────▶│ Listener 2 │
//!                                                        └────────────┘
//! ```
//!
//! 1. Subscribers register listeners under an [`EventType`]
//! 2. A publisher emits an [`Event`]
//! 3. The registry invokes a snapshot of the listeners in subscription order
//!    and returns once all of them have run
//!
//! ## Usage Examples
//!
//! ### Subscribing and Publishing
//!
//! ```rust
//! # use herald::event::{Event, EventRegistry, EventType, Listener};
//! let registry = EventRegistry::new();
//! let listener = Listener::new(|event: &Event| {
//!     if let Event::FileSaved { path, bytes } = event {
//!         println!("saved {} bytes to {}", bytes, path.display());
//!     }
//!     Ok(())
//! });
//! registry.subscribe(EventType::FileSaved, listener.clone()).unwrap();
//!
//! let event = Event::FileSaved {
//!     path: "newfile.txt".into(),
//!     bytes: 19,
//! };
//! assert_eq!(registry.emit(&event).unwrap(), 1);
//!
//! assert!(registry.unsubscribe(&EventType::FileSaved, &listener));
//! assert_eq!(registry.emit(&event).unwrap(), 0);
//! ```
//!
//! ### String-Keyed Registries
//!
//! ```rust
//! # use herald::event::{EventRegistry, Listener};
//! let registry: EventRegistry<String, Vec<String>> = EventRegistry::new();
//! registry
//!     .subscribe(
//!         "args".to_string(),
//!         Listener::new(|args: &Vec<String>| {
//!             println!("{:?}", args);
//!             Ok(())
//!         }),
//!     )
//!     .unwrap();
//! let invoked = registry
//!     .publish(&"args".to_string(), &vec!["a".to_string()])
//!     .unwrap();
//! assert_eq!(invoked, 1);
//! ```

pub mod event_registry;
pub mod event_type;
pub mod listener;

pub use event_registry::{EventError, EventKey, EventRegistry, EventResult, ListenerFault};
pub use event_type::{Event, EventType};
pub use listener::{Listener, ListenerError, ListenerId, ListenerResult};
