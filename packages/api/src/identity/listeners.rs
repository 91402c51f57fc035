//! Registry of session-change listeners.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::AuthChange;

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    senders: HashMap<u64, UnboundedSender<AuthChange>>,
}

/// Fan-out of [`AuthChange`] notifications to every live [`Subscription`].
#[derive(Clone, Debug, Default)]
pub struct AuthListeners {
    inner: Arc<Mutex<Registry>>,
}

impl AuthListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = unbounded_channel();
        let mut registry = lock(&self.inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.senders.insert(id, tx);

        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `change` to every subscriber, pruning any whose receiver is gone.
    pub fn emit(&self, change: AuthChange) {
        lock(&self.inner)
            .senders
            .retain(|_, tx| tx.send(change.clone()).is_ok());
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        lock(&self.inner).senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A registered listener. Dropping it unregisters.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: UnboundedReceiver<AuthChange>,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Wait for the next notification. `None` once the client is gone.
    pub async fn recv(&mut self) -> Option<AuthChange> {
        self.rx.recv().await
    }

    /// Wait for a notification, then skip ahead to the newest one queued.
    pub async fn recv_latest(&mut self) -> Option<AuthChange> {
        let mut change = self.rx.recv().await?;
        while let Ok(newer) = self.rx.try_recv() {
            change = newer;
        }
        Some(change)
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).senders.remove(&self.id);
        }
    }
}
