use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::routes::refresh::RefreshState;
use crate::config::AnalysisConfig;
use crate::snapshot::MetaSnapshot;
use crate::storage::StorageConfig;

/// Current snapshot; a rebuild swaps the inner `Arc`.
pub type SharedSnapshot = Arc<RwLock<Arc<MetaSnapshot>>>;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub snapshot: SharedSnapshot,
    pub refresh_state: Arc<RwLock<RefreshState>>,
    pub analysis: AnalysisConfig,
}

impl AppState {
    pub fn new(storage: StorageConfig, snapshot: MetaSnapshot, analysis: AnalysisConfig) -> Self {
        Self {
            storage: Arc::new(storage),
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            refresh_state: Arc::new(RwLock::new(RefreshState::default())),
            analysis,
        }
    }

    /// The snapshot to answer a request from. Held for the whole request so
    /// a concurrent rebuild cannot mix tables.
    pub async fn snapshot(&self) -> Arc<MetaSnapshot> {
        self.snapshot.read().await.clone()
    }
}
