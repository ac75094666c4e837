// src/events/bus/registry.rs
//
// Listener registry for one event kind.
//
// DESIGN PRINCIPLES:
// 1. Failure isolation - a listener that errors or panics never stops its siblings
// 2. Snapshot publish - registration/removal during a publish does not affect it
// 3. Identity removal - a Subscription removes exactly the listener it created
// 4. Idempotent disposal - disposing twice is a no-op

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::events::types::ListenerKind;

/// Registry-unique listener identity; ids are never reused
pub type ListenerId = u64;

/// Type-erased listener callback
pub type Listener<T> = Arc<dyn Fn(&T) -> anyhow::Result<()> + Send + Sync>;

/// What one publish did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub failed: Vec<ListenerId>,
}

impl PublishReport {
    pub fn listener_count(&self) -> usize {
        self.delivered + self.failed.len()
    }
}

// ============================================================================
// SUBSCRIPTION (DISPOSER)
// ============================================================================

struct SubscriptionInner {
    kind: ListenerKind,
    id: ListenerId,
    disposed: AtomicBool,
    remove: Box<dyn Fn(ListenerId) -> bool + Send + Sync>,
}

/// Disposer returned by registration.
///
/// Dropping a Subscription does NOT unregister; call `dispose`.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

impl Subscription {
    /// A subscription that was never live (registration on a closed bridge)
    pub(crate) fn inert(kind: ListenerKind) -> Self {
        Self {
            inner: Arc::new(SubscriptionInner {
                kind,
                id: 0,
                disposed: AtomicBool::new(true),
                remove: Box::new(|_| false),
            }),
        }
    }

    /// Remove the listener. Returns true only on the call that removed it.
    pub fn dispose(&self) -> bool {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return false;
        }
        (self.inner.remove)(self.inner.id)
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    pub fn id(&self) -> ListenerId {
        self.inner.id
    }

    pub fn kind(&self) -> ListenerKind {
        self.inner.kind
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.inner.kind)
            .field("id", &self.inner.id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

// ============================================================================
// LISTENER REGISTRY
// ============================================================================

pub struct ListenerRegistry<T> {
    kind: ListenerKind,
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, Listener<T>)>>,
}

impl<T: 'static> ListenerRegistry<T> {
    pub fn new(kind: ListenerKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            next_id: AtomicU64::new(1),
            listeners: RwLock::new(Vec::new()),
        })
    }

    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    pub fn register<F>(self: &Arc<Self>, callback: F) -> Subscription
    where
        F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));

        let registry: Weak<Self> = Arc::downgrade(self);
        Subscription {
            inner: Arc::new(SubscriptionInner {
                kind: self.kind,
                id,
                disposed: AtomicBool::new(false),
                remove: Box::new(move |id| {
                    registry
                        .upgrade()
                        .map(|registry| registry.unregister(id))
                        .unwrap_or(false)
                }),
            }),
        }
    }

    /// Remove by identity; false if already gone
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        before != listeners.len()
    }

    /// Stable copy of the current listeners
    pub fn snapshot(&self) -> Vec<(ListenerId, Listener<T>)> {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Invoke every listener in the snapshot taken now
    pub fn publish(&self, payload: &T) -> PublishReport {
        let mut report = PublishReport::default();

        for (id, listener) in self.snapshot() {
            let result = catch_unwind(AssertUnwindSafe(|| listener(payload)));

            match result {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    log::error!("[BRIDGE] {} listener {} failed: {:#}", self.kind, id, e);
                    report.failed.push(id);
                }
                Err(panic) => {
                    log::error!(
                        "[BRIDGE] {} listener {} panicked: {}",
                        self.kind,
                        id,
                        panic_message(panic.as_ref())
                    );
                    report.failed.push(id);
                }
            }
        }

        report
    }

    pub fn len(&self) -> usize {
        self.listeners.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.listeners.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
