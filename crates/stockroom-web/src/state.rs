//! Web application state.

use std::sync::Arc;
use stockroom_core::{AppConfig, InventoryConfig, SessionConfig};
use stockroom_store::{SessionStore, Store, create_session_store};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Store,
    sessions: Arc<dyn SessionStore>,
    session: SessionConfig,
    inventory: InventoryConfig,
}

impl AppState {
    pub fn new(
        store: Store,
        sessions: Arc<dyn SessionStore>,
        session: SessionConfig,
        inventory: InventoryConfig,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                sessions,
                session,
                inventory,
            }),
        }
    }

    /// Build state from configuration, picking the configured session backend.
    pub fn from_config(cfg: &AppConfig, store: Store) -> Self {
        let sessions = create_session_store(cfg.session.backend, &store);
        Self::new(store, sessions, cfg.session.clone(), cfg.inventory.clone())
    }

    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    pub fn sessions(&self) -> &dyn SessionStore {
        self.inner.sessions.as_ref()
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.inner.session
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.inner.inventory.low_stock_threshold
    }
}
