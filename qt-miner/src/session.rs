//! Per-client session state.
//!
//! A [`Session`] remembers the dataset a client selected and the result of
//! its last clustering run, so follow-up requests (save, render) can refer
//! to them without resending data. Sessions are owned by one client and are
//! never shared.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::data::{Dataset, DatasetView};
use crate::error::{QtError, Result};
use crate::formatters::{HumanFormatter, ReportFormatter};
use crate::mining::{ClusteringOutcome, MinerConfig, QtMiner, Radius};
use crate::repository::{ClusterStore, StorageBackend};

/// What a successful `learn` hands back to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnReport {
    /// Number of clusters the run produced
    pub cluster_count: usize,
    /// Numbered clusters with members and distances
    pub rendering: String,
}

/// The current dataset and last clustering of one client.
///
/// # Examples
///
/// ```rust
/// use qt_miner::data::{ColumnSpec, Dataset};
/// use qt_miner::repository::InMemoryStorage;
/// use qt_miner::session::Session;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> qt_miner::error::Result<()> {
/// let data = Dataset::builder(vec![ColumnSpec::categorical("c")])
///     .row(vec!["a".into()])
///     .row(vec!["b".into()])
///     .build()?;
///
/// let mut session = Session::new(InMemoryStorage::new());
/// session.store_table("letters", data);
/// let report = session.learn(0.5)?;
/// assert_eq!(report.cluster_count, 2);
///
/// session.save_last("letters_r05").await?;
/// let text = session.load("letters_r05").await?;
/// assert!(text.starts_with("1:Centroid=("));
/// # Ok(())
/// # }
/// ```
pub struct Session<B> {
    table: Option<(String, Arc<Dataset>)>,
    last: Option<(Arc<Dataset>, ClusteringOutcome)>,
    store: ClusterStore<B>,
    config: MinerConfig,
}

impl<B: StorageBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, MinerConfig::default())
    }

    pub fn with_config(backend: B, config: MinerConfig) -> Self {
        Self {
            table: None,
            last: None,
            store: ClusterStore::new(backend).with_log_config(config.log.clone()),
            config,
        }
    }

    /// Makes `dataset` the current table under `name`.
    ///
    /// The previous result stays available until the next `learn` and keeps
    /// reporting against the table it was computed from.
    pub fn store_table(&mut self, name: impl Into<String>, dataset: impl Into<Arc<Dataset>>) {
        let name = name.into();
        let dataset = dataset.into();
        info!(table = %name, records = dataset.record_count(), "Stored table");
        self.table = Some((name, dataset));
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.table.as_ref().map(|(_, data)| data)
    }

    /// The outcome of the last successful `learn`.
    pub fn last_outcome(&self) -> Option<&ClusteringOutcome> {
        self.last.as_ref().map(|(_, outcome)| outcome)
    }

    pub fn store(&self) -> &ClusterStore<B> {
        &self.store
    }

    /// Clusters the current table with `radius`.
    ///
    /// Any failure clears the previous result, so a later `save_last` cannot
    /// persist a clustering the client did not just see.
    #[instrument(skip(self))]
    pub fn learn(&mut self, radius: f64) -> Result<LearnReport> {
        self.last = None;
        let (_, data) = self.table.as_ref().ok_or(QtError::NoDataset)?;
        let data = Arc::clone(data);

        let result = Radius::new(radius).and_then(|radius| {
            let outcome = QtMiner::new(self.config.clone()).compute(&*data, radius)?;
            let rendering = outcome.clusters.render_with(&*data)?;
            Ok((outcome, rendering))
        });

        match result {
            Ok((outcome, rendering)) => {
                let report = LearnReport {
                    cluster_count: outcome.cluster_count,
                    rendering,
                };
                self.last = Some((data, outcome));
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "Clustering failed");
                Err(e)
            }
        }
    }

    /// Formats the last result with `formatter`, against the table it was
    /// learned from.
    pub fn report_with<F: ReportFormatter + ?Sized>(&self, formatter: &F) -> Result<String> {
        let (data, outcome) = self.last.as_ref().ok_or(QtError::NoResult)?;
        formatter.format(outcome, Some(&**data as &dyn DatasetView))
    }

    /// Human-readable report of the last result.
    pub fn report(&self) -> Result<String> {
        self.report_with(&HumanFormatter::new())
    }

    /// Persists the last result under `name`.
    pub async fn save_last(&self, name: &str) -> Result<()> {
        let (_, outcome) = self.last.as_ref().ok_or(QtError::NoResult)?;
        self.store.save(&outcome.clusters, name).await
    }

    /// Loads the collection stored under `name` and renders its centroids.
    ///
    /// The loaded collection does not replace the session's last result.
    pub async fn load(&self, name: &str) -> Result<String> {
        let clusters = self.store.load(name).await?;
        Ok(clusters.render())
    }
}
