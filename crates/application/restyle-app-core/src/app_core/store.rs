use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::domain::AppState;

use super::{events::DomainEvent, reducer::reduce};

/// Holds the current snapshot and publishes every new one to subscribers.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<Mutex<AppState>>,
    updates: watch::Sender<AppState>,
}

impl AppStore {
    pub fn new(state: AppState) -> Self {
        let (updates, _) = watch::channel(state.clone());
        Self {
            inner: Arc::new(Mutex::new(state)),
            updates,
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> AppState {
        self.lock().clone()
    }

    pub fn apply(&self, ev: DomainEvent) {
        let mut guard = self.lock();
        let next = reduce(guard.clone(), ev);
        *guard = next.clone();
        self.updates.send_replace(next);
    }

    /// Receiver that sees the latest snapshot after every applied event.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.updates.subscribe()
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}
