//! Shared handler state.

use crate::error::ApiError;
use dxassist_core::{PatientId, PatientStore};
use dxassist_suggest::SuggestionRequester;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Application state for the dashboard server
///
/// The store sits behind a synchronous `RwLock`; handlers take the lock, copy
/// out what they need and drop it before any `.await`.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<PatientStore>>,
    requester: Option<SuggestionRequester>,
    in_flight: InFlight,
}

impl AppState {
    /// `requester` is `None` when no provider credential was configured; the
    /// suggestion endpoint then answers 503 and everything else still works.
    pub fn new(store: PatientStore, requester: Option<SuggestionRequester>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            requester,
            in_flight: InFlight::default(),
        }
    }

    pub fn read_store(&self) -> Result<RwLockReadGuard<'_, PatientStore>, ApiError> {
        self.store.read().map_err(|_| {
            tracing::error!("patient store lock poisoned");
            ApiError::Internal("patient store unavailable")
        })
    }

    pub fn write_store(&self) -> Result<RwLockWriteGuard<'_, PatientStore>, ApiError> {
        self.store.write().map_err(|_| {
            tracing::error!("patient store lock poisoned");
            ApiError::Internal("patient store unavailable")
        })
    }

    pub fn requester(&self) -> Option<&SuggestionRequester> {
        self.requester.as_ref()
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }
}

/// Patients with a suggestion request currently outstanding.
#[derive(Clone, Default)]
pub struct InFlight {
    ids: Arc<Mutex<HashSet<PatientId>>>,
}

impl InFlight {
    /// Marks `id` busy, or returns `None` if it already is.
    ///
    /// The mark is cleared when the returned guard drops, including when the
    /// request future is cancelled.
    pub fn try_acquire(&self, id: PatientId) -> Option<InFlightGuard> {
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        if !ids.insert(id) {
            return None;
        }
        Some(InFlightGuard {
            ids: Arc::clone(&self.ids),
            id,
        })
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }
}

pub struct InFlightGuard {
    ids: Arc<Mutex<HashSet<PatientId>>>,
    id: PatientId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
