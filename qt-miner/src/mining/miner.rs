//! The greedy Quality Threshold engine.

use std::fmt;

use tracing::{debug, info, instrument};

use super::cluster::Cluster;
use super::cluster_set::{ClusterSet, InsertOutcome};
use super::config::{MinerConfig, Radius};
use crate::data::{DatasetView, Tuple};
use crate::error::{QtError, Result};
use crate::logging::truncate_field;
use crate::{log_candidate, perf_debug};

/// Stages of a clustering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Ready,
    Iterating,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ready => "ready",
            Self::Iterating => "iterating",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringOutcome {
    /// Number of clusters accepted by the run
    pub cluster_count: usize,
    /// The accepted clusters in ascending order
    pub clusters: ClusterSet,
    /// Radius the run used
    pub radius: f64,
}

/// Partitions a dataset with the Quality Threshold strategy.
///
/// Each round builds one candidate cluster around every unclustered record,
/// keeps the largest (the lowest record index wins ties) and marks its
/// members as clustered. Rounds repeat until every record is clustered, so a
/// run costs O(n³) distance evaluations in the worst case.
///
/// # Examples
///
/// ```rust
/// use qt_miner::data::{ColumnSpec, Dataset};
/// use qt_miner::mining::{MinerConfig, QtMiner, Radius};
///
/// let data = Dataset::builder(vec![ColumnSpec::numeric("x")])
///     .row(vec![0.0.into()])
///     .row(vec![1.0.into()])
///     .row(vec![9.0.into()])
///     .row(vec![10.0.into()])
///     .build()?;
///
/// let miner = QtMiner::new(MinerConfig::default());
/// let outcome = miner.compute(&data, Radius::new(0.2)?)?;
/// assert_eq!(outcome.cluster_count, 2);
/// # Ok::<(), qt_miner::error::QtError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct QtMiner {
    config: MinerConfig,
}

impl QtMiner {
    pub fn new(config: MinerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Runs the clustering over `view`.
    #[instrument(skip(self, view), fields(records = view.record_count(), radius = %radius))]
    pub fn compute<V: DatasetView + ?Sized>(
        &self,
        view: &V,
        radius: Radius,
    ) -> Result<ClusteringOutcome> {
        let mut state = RunState::Ready;
        let total = view.record_count();
        if total == 0 {
            self.transition(&mut state, RunState::Failed);
            return Err(QtError::EmptyDataset);
        }

        let records = (0..total)
            .map(|i| {
                view.record(i).ok_or(QtError::RecordOutOfRange {
                    index: i,
                    count: total,
                })
            })
            .collect::<Result<Vec<&Tuple>>>()?;

        let mut clustered = vec![false; total];
        let mut clusters = ClusterSet::with_policy(self.config.collision_policy);
        let mut cluster_count = 0usize;
        let mut clustered_count = 0usize;

        self.transition(&mut state, RunState::Iterating);
        while clustered_count < total {
            let best = match self.best_candidate(&records, &clustered, radius.value()) {
                Ok(best) => best,
                Err(e) => {
                    self.transition(&mut state, RunState::Failed);
                    return Err(e);
                }
            };
            let size = best.size();
            for id in best.members() {
                clustered[id] = true;
            }
            cluster_count += 1;
            clustered_count += size;

            perf_debug!(
                self.config.log,
                cluster = cluster_count,
                size,
                clustered = clustered_count,
                centroid = %truncate_field(best.centroid_rendering(), self.config.log.max_field_length),
                "Accepted cluster"
            );

            if cluster_count == 1 && size == total {
                self.transition(&mut state, RunState::Failed);
                return Err(QtError::RadiusTooLarge {
                    radius: radius.value(),
                    records: total,
                });
            }

            if clusters.insert(best) != InsertOutcome::Inserted {
                debug!(cluster = cluster_count, "Accepted cluster collided in the result set");
            }
        }

        self.transition(&mut state, RunState::Done);
        info!(clusters = cluster_count, records = total, "Clustering complete");
        Ok(ClusteringOutcome {
            cluster_count,
            clusters,
            radius: radius.value(),
        })
    }

    /// Builds a candidate around every unclustered record and returns the
    /// first one of maximal size.
    fn best_candidate(&self, records: &[&Tuple], clustered: &[bool], radius: f64) -> Result<Cluster> {
        let mut best: Option<Cluster> = None;
        for (i, centroid) in records.iter().enumerate() {
            if clustered[i] {
                continue;
            }
            let mut candidate = Cluster::new((*centroid).clone());
            for (j, record) in records.iter().enumerate() {
                if !clustered[j] && centroid.distance(record)? <= radius {
                    candidate.add_member(j);
                }
            }
            log_candidate!(self.config.log, centroid = i, size = candidate.size(), "Built candidate");
            if best.as_ref().map_or(true, |b| candidate.size() > b.size()) {
                best = Some(candidate);
            }
        }
        best.ok_or(QtError::EmptySet)
    }

    fn transition(&self, state: &mut RunState, next: RunState) {
        debug!(from = %state, to = %next, "Run state change");
        *state = next;
    }
}

/// Runs a clustering with the default configuration.
///
/// Fails with `InvalidRadius` before anything runs if `radius` is NaN or
/// negative.
pub fn run_clustering<V: DatasetView + ?Sized>(view: &V, radius: f64) -> Result<ClusteringOutcome> {
    let radius = Radius::new(radius)?;
    QtMiner::default().compute(view, radius)
}
