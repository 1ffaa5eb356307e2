//! # Listener Handles
//!
//! A [`Listener`] wraps the callable the registry invokes on publish. Handles
//! are cheap to clone and every clone shares the same [`ListenerId`], which is
//! what `unsubscribe` matches on.
//!
//! Three activation modes exist:
//!
//! - [`Listener::new`]: strongly held, invoked on every publish
//! - [`Listener::once`]: invoked at most once, then spent
//! - [`Listener::weak`]: holds a `Weak` to the callable and dies with its owner
//!
//! A spent or dead handle is inactive. The registry refuses to subscribe it
//! and skips it during publish.

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Weak,
    },
};
use uuid::Uuid;

/// Error a listener may return from its invocation.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

pub type ListenerResult = Result<(), ListenerError>;

type Callback<P> = dyn Fn(&P) -> ListenerResult + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

enum Target<P> {
    Strong(Arc<Callback<P>>),
    Weak(Weak<Callback<P>>),
}

impl<P> Clone for Target<P> {
    fn clone(&self) -> Self {
        match self {
            Self::Strong(callback) => Self::Strong(Arc::clone(callback)),
            Self::Weak(callback) => Self::Weak(Weak::clone(callback)),
        }
    }
}

pub struct Listener<P> {
    id: ListenerId,
    target: Target<P>,
    // Shared between clones so a one-shot listener fires once in total.
    fired: Option<Arc<AtomicBool>>,
}

impl<P: 'static> Listener<P> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&P) -> ListenerResult + Send + Sync + 'static,
    {
        Self {
            id: ListenerId::new(),
            target: Target::Strong(Arc::new(callback)),
            fired: None,
        }
    }

    pub fn once<F>(callback: F) -> Self
    where
        F: Fn(&P) -> ListenerResult + Send + Sync + 'static,
    {
        Self {
            id: ListenerId::new(),
            target: Target::Strong(Arc::new(callback)),
            fired: Some(Arc::new(AtomicBool::new(false))),
        }
    }

    /// Creates a listener that does not keep `callback` alive.
    ///
    /// Once every strong reference to `callback` is dropped the listener
    /// becomes inactive and is no longer invoked.
    pub fn weak<F>(callback: &Arc<F>) -> Self
    where
        F: Fn(&P) -> ListenerResult + Send + Sync + 'static,
    {
        let strong: Arc<Callback<P>> = callback.clone();
        Self {
            id: ListenerId::new(),
            target: Target::Weak(Arc::downgrade(&strong)),
            fired: None,
        }
    }
}

impl<P> Listener<P> {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn is_once(&self) -> bool {
        self.fired.is_some()
    }

    pub fn is_weak(&self) -> bool {
        matches!(self.target, Target::Weak(_))
    }

    pub fn is_active(&self) -> bool {
        self.inactive_reason().is_none()
    }

    pub(crate) fn inactive_reason(&self) -> Option<&'static str> {
        if let Target::Weak(callback) = &self.target {
            if callback.strong_count() == 0 {
                return Some("weak listener target has been dropped");
            }
        }
        match &self.fired {
            Some(fired) if fired.load(Ordering::Acquire) => Some("one-shot listener already fired"),
            _ => None,
        }
    }

    /// Runs the callable, or returns `None` when the handle is inactive.
    pub(crate) fn invoke(&self, payload: &P) -> Option<ListenerResult> {
        let callback = match &self.target {
            Target::Strong(callback) => Arc::clone(callback),
            Target::Weak(callback) => callback.upgrade()?,
        };
        if let Some(fired) = &self.fired {
            if fired.swap(true, Ordering::AcqRel) {
                return None;
            }
        }
        Some(callback(payload))
    }
}

impl<P> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            target: self.target.clone(),
            fired: self.fired.clone(),
        }
    }
}

impl<P> fmt::Debug for Listener<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("once", &self.is_once())
            .field("weak", &self.is_weak())
            .field("active", &self.is_active())
            .finish()
    }
}
