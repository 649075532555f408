use std::path::{Path, PathBuf};
use std::sync::Arc;

use fabricscope_core::health::{CategoryRegistry, EvaluationMap, HealthEvaluator};
use fabricscope_core::PayloadSnapshot;
use tokio::sync::RwLock;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

/// A loaded capture together with its evaluation pass.
#[derive(Debug, Default)]
pub struct SnapshotState {
    pub snapshot: PayloadSnapshot,
    pub evaluations: EvaluationMap,
}

pub struct AppState {
    pub registry: Arc<CategoryRegistry>,
    pub evaluator: HealthEvaluator,
    /// Swapped wholesale on reload
    pub snapshot: RwLock<Arc<SnapshotState>>,
    pub snapshot_path: Option<PathBuf>,
    pub page_size: usize,
}

impl AppState {
    pub fn new(registry: Arc<CategoryRegistry>, page_size: usize) -> Self {
        Self {
            evaluator: HealthEvaluator::new(registry.clone()),
            registry,
            snapshot: RwLock::new(Arc::new(SnapshotState::default())),
            snapshot_path: None,
            page_size,
        }
    }

    /// Evaluates `snapshot` and makes it the served capture.
    pub async fn install(&self, snapshot: PayloadSnapshot) -> Arc<SnapshotState> {
        let evaluations = self.evaluator.evaluate(&snapshot);
        let next = Arc::new(SnapshotState {
            snapshot,
            evaluations,
        });
        *self.snapshot.write().await = next.clone();
        next
    }

    pub async fn current(&self) -> Arc<SnapshotState> {
        self.snapshot.read().await.clone()
    }

    /// Re-reads the configured snapshot file and re-evaluates it.
    pub async fn reload(&self) -> anyhow::Result<Arc<SnapshotState>> {
        let path = self
            .snapshot_path
            .clone()
            .ok_or_else(|| anyhow::anyhow!("FS_SNAPSHOT_PATH is not set"))?;
        let evaluator = self.evaluator.clone();
        let next = tokio::task::spawn_blocking(move || -> fabricscope_core::Result<SnapshotState> {
            let snapshot = load_snapshot(&path)?;
            let evaluations = evaluator.evaluate(&snapshot);
            Ok(SnapshotState {
                snapshot,
                evaluations,
            })
        })
        .await??;
        let next = Arc::new(next);
        *self.snapshot.write().await = next.clone();
        tracing::info!(
            "Snapshot reloaded: {} categories, {} evaluated",
            next.snapshot.len(),
            next.evaluations.len()
        );
        Ok(next)
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("FS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `init` also installs the `log` bridge, so core records show up here.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Reads a capture file. A file that does not exist yet is an empty capture.
fn load_snapshot(path: &Path) -> fabricscope_core::Result<PayloadSnapshot> {
    if !path.exists() {
        tracing::warn!(
            "Snapshot file {} does not exist; serving an empty snapshot",
            path.display()
        );
        return Ok(PayloadSnapshot::new());
    }
    PayloadSnapshot::from_path(path)
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let registry = match &config.catalog_path {
        Some(path) => {
            tracing::info!("Category catalog in use: {}", path.display());
            CategoryRegistry::from_path(path)?
        }
        None => CategoryRegistry::builtin()?,
    };
    tracing::info!(
        "Registered {} categories in {} groups",
        registry.len(),
        registry.groups().len()
    );

    let mut state = AppState::new(Arc::new(registry), config.page_size);
    state.snapshot_path = config.snapshot_path.clone();

    match &config.snapshot_path {
        Some(path) => {
            tracing::info!("Snapshot path in use: {}", path.display());
            let snapshot = load_snapshot(path)?;
            state.install(snapshot).await;
        }
        None => tracing::warn!("FS_SNAPSHOT_PATH is not set; serving an empty snapshot"),
    }

    Ok(Arc::new(state))
}
