//! # herald: in-process event dispatching
//!
//! herald provides a synchronous publish/subscribe registry that lets
//! independent parts of a program register interest in events and be
//! notified, in registration order, when that event is announced.
//!
//! ## Building Blocks
//!
//! - Event registry ([`event::event_registry`]): identifier to listener mapping
//! - Listener handles ([`event::listener`]): persistent, one-shot and weak listeners
//! - Event vocabulary ([`event::event_type`]): typed events and their identifiers
//! - Configuration ([`config`]): failure policy and listener limits
//! - Error handling ([`error`])
//!
//! ## Quick Start
//!
//! ```rust
//! use herald::{Event, EventRegistry, EventType, Listener};
//!
//! let registry = EventRegistry::new();
//! registry
//!     .subscribe(
//!         EventType::Greet,
//!         Listener::new(|event: &Event| {
//!             if let Event::Greet { name } = event {
//!                 println!("Hello, {name}");
//!             }
//!             Ok(())
//!         }),
//!     )
//!     .unwrap();
//!
//! let invoked = registry
//!     .emit(&Event::Greet { name: "world".to_string() })
//!     .unwrap();
//! assert_eq!(invoked, 1);
//! ```

pub mod config;
pub mod error;
pub mod event;

// Re-exports
pub use config::{FailurePolicy, RegistryConfig};
pub use error::*;
pub use event::*;

#[cfg(test)]
mod tests {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    #[ctor::ctor]
    fn init_tests() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    }
}
