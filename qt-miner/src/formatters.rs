//! Report formatting for clustering outcomes.
//!
//! Formatters turn a [`ClusteringOutcome`] into text for people or for other
//! programs. When the dataset the run used is supplied, reports can also list
//! each member record with its distance to the centroid.
//!
//! # Examples
//!
//! ```rust
//! use qt_miner::data::{ColumnSpec, Dataset, DatasetView};
//! use qt_miner::formatters::{HumanFormatter, ReportFormatter};
//! use qt_miner::mining::run_clustering;
//!
//! let data = Dataset::builder(vec![ColumnSpec::categorical("c")])
//!     .row(vec!["a".into()])
//!     .row(vec!["b".into()])
//!     .build()?;
//! let outcome = run_clustering(&data, 0.5)?;
//!
//! let text = HumanFormatter::new().format(&outcome, Some(&data as &dyn DatasetView))?;
//! assert!(text.starts_with("Clusters: 2"));
//! # Ok::<(), qt_miner::error::QtError>(())
//! ```

use serde::Serialize;
use std::fmt::Write;

use crate::data::DatasetView;
use crate::error::{QtError, Result};
use crate::mining::{Cluster, ClusteringOutcome};

/// Configuration options for formatting clustering reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// List the member records of each cluster
    pub include_members: bool,
    /// Include per-member and average distances (needs the dataset)
    pub include_distances: bool,
    /// Maximum number of clusters to show; `None` shows all
    pub max_clusters: Option<usize>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_members: true,
            include_distances: true,
            max_clusters: None,
        }
    }
}

impl FormatterConfig {
    /// Centroids only.
    pub fn minimal() -> Self {
        Self {
            include_members: false,
            include_distances: false,
            max_clusters: None,
        }
    }

    /// Everything, for every cluster.
    pub fn detailed() -> Self {
        Self::default()
    }

    pub fn with_members(mut self, include: bool) -> Self {
        self.include_members = include;
        self
    }

    pub fn with_distances(mut self, include: bool) -> Self {
        self.include_distances = include;
        self
    }

    pub fn with_max_clusters(mut self, max: usize) -> Self {
        self.max_clusters = Some(max);
        self
    }

    fn shown(&self, total: usize) -> usize {
        self.max_clusters.map_or(total, |max| max.min(total))
    }
}

/// Formats a clustering outcome into a string.
///
/// ```rust
/// use qt_miner::data::DatasetView;
/// use qt_miner::formatters::ReportFormatter;
/// use qt_miner::mining::ClusteringOutcome;
///
/// struct CountOnly;
///
/// impl ReportFormatter for CountOnly {
///     fn format(
///         &self,
///         outcome: &ClusteringOutcome,
///         _view: Option<&dyn DatasetView>,
///     ) -> qt_miner::error::Result<String> {
///         Ok(outcome.cluster_count.to_string())
///     }
/// }
/// ```
pub trait ReportFormatter {
    fn format(&self, outcome: &ClusteringOutcome, view: Option<&dyn DatasetView>) -> Result<String>;

    /// Formats with an explicit configuration; the default ignores it.
    fn format_with_config(
        &self,
        outcome: &ClusteringOutcome,
        view: Option<&dyn DatasetView>,
        _config: &FormatterConfig,
    ) -> Result<String> {
        self.format(outcome, view)
    }
}

/// Plain text in the numbered `i:Centroid=(...)` layout.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format(&self, outcome: &ClusteringOutcome, view: Option<&dyn DatasetView>) -> Result<String> {
        self.format_with_config(outcome, view, &self.config)
    }

    fn format_with_config(
        &self,
        outcome: &ClusteringOutcome,
        view: Option<&dyn DatasetView>,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "Clusters: {} (radius {})",
            outcome.cluster_count, outcome.radius
        );

        let total = outcome.clusters.len();
        let shown = config.shown(total);
        for (i, cluster) in outcome.clusters.iter().take(shown).enumerate() {
            let body = match view {
                Some(view) if config.include_members && config.include_distances => {
                    cluster.render_with(view)?
                }
                Some(view) if config.include_members => member_rows(cluster, view)?,
                _ => cluster.render(),
            };
            let _ = writeln!(output, "{}:{body}", i + 1);
        }
        if total > shown {
            let _ = writeln!(output, "... and {} more clusters", total - shown);
        }
        Ok(output)
    }
}

/// Centroid and raw member rows, without distances.
fn member_rows(cluster: &Cluster, view: &dyn DatasetView) -> Result<String> {
    let mut out = format!("Centroid=({})\nExamples:", cluster.centroid_rendering());
    for id in cluster.members() {
        if id >= view.record_count() {
            return Err(QtError::RecordOutOfRange {
                index: id,
                count: view.record_count(),
            });
        }
        let values: Vec<String> = (0..view.attribute_count())
            .map(|a| view.raw_value(id, a).map_or_else(|| "?".to_string(), ToString::to_string))
            .collect();
        let _ = write!(out, "\n[{}]", values.join(" "));
    }
    Ok(out)
}

#[derive(Debug, Serialize)]
struct ClusteringReport {
    cluster_count: usize,
    radius: f64,
    clusters: Vec<ClusterReport>,
    omitted_clusters: usize,
}

#[derive(Debug, Serialize)]
struct ClusterReport {
    index: usize,
    size: usize,
    centroid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    members: Option<Vec<MemberReport>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    average_distance: Option<f64>,
}

#[derive(Debug, Serialize)]
struct MemberReport {
    id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<f64>,
}

/// Structured JSON for programmatic consumers.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn cluster_report(
        index: usize,
        cluster: &Cluster,
        view: Option<&dyn DatasetView>,
        config: &FormatterConfig,
    ) -> Result<ClusterReport> {
        let distances = match view {
            Some(view) if config.include_distances => Some(view),
            _ => None,
        };

        let members = if config.include_members {
            let members = cluster
                .members()
                .map(|id| {
                    let distance = match distances {
                        Some(view) => {
                            let record = view.record(id).ok_or(QtError::RecordOutOfRange {
                                index: id,
                                count: view.record_count(),
                            })?;
                            Some(cluster.centroid().distance(record)?)
                        }
                        None => None,
                    };
                    Ok(MemberReport { id, distance })
                })
                .collect::<Result<Vec<_>>>()?;
            Some(members)
        } else {
            None
        };

        let average_distance = match distances {
            Some(view) => Some(cluster.centroid().avg_distance(view, cluster.members())?),
            None => None,
        };

        Ok(ClusterReport {
            index,
            size: cluster.size(),
            centroid: cluster.centroid_rendering().to_string(),
            members,
            average_distance,
        })
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, outcome: &ClusteringOutcome, view: Option<&dyn DatasetView>) -> Result<String> {
        self.format_with_config(outcome, view, &self.config)
    }

    fn format_with_config(
        &self,
        outcome: &ClusteringOutcome,
        view: Option<&dyn DatasetView>,
        config: &FormatterConfig,
    ) -> Result<String> {
        let total = outcome.clusters.len();
        let shown = config.shown(total);
        let clusters = outcome
            .clusters
            .iter()
            .take(shown)
            .enumerate()
            .map(|(i, cluster)| Self::cluster_report(i + 1, cluster, view, config))
            .collect::<Result<Vec<_>>>()?;

        let report = ClusteringReport {
            cluster_count: outcome.cluster_count,
            radius: outcome.radius,
            clusters,
            omitted_clusters: total - shown,
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        json.map_err(|e| QtError::Serialization(format!("Failed to serialize report to JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ColumnSpec, Dataset};
    use crate::mining::run_clustering;

    fn data() -> Dataset {
        Dataset::builder(vec![ColumnSpec::numeric("x")])
            .row(vec![0.0.into()])
            .row(vec![1.0.into()])
            .row(vec![9.0.into()])
            .row(vec![10.0.into()])
            .row(vec![5.0.into()])
            .build()
            .unwrap()
    }

    fn outcome(data: &Dataset) -> ClusteringOutcome {
        run_clustering(data, 0.15).unwrap()
    }

    #[test]
    fn test_human_without_dataset_lists_centroids() {
        let data = data();
        let outcome = outcome(&data);
        let text = HumanFormatter::new().format(&outcome, None).unwrap();
        assert_eq!(
            text,
            "Clusters: 3 (radius 0.15)\n1:Centroid=(5)\n2:Centroid=(0)\n3:Centroid=(9)\n"
        );
    }

    #[test]
    fn test_human_with_dataset_matches_detailed_render() {
        let data = data();
        let outcome = outcome(&data);
        let text = HumanFormatter::new().format(&outcome, Some(&data)).unwrap();
        let (header, body) = text.split_once('\n').unwrap();
        assert_eq!(header, "Clusters: 3 (radius 0.15)");
        assert_eq!(body, outcome.clusters.render_with(&data).unwrap());
    }

    #[test]
    fn test_human_members_without_distances() {
        let data = data();
        let outcome = outcome(&data);
        let config = FormatterConfig::default().with_distances(false);
        let text = HumanFormatter::with_config(config)
            .format(&outcome, Some(&data))
            .unwrap();
        assert!(text.contains("2:Centroid=(0)\nExamples:\n[0]\n[1]\n3:"));
        assert!(!text.contains("dist="));
        assert!(!text.contains("AvgDistance"));
    }

    #[test]
    fn test_human_truncates_clusters() {
        let data = data();
        let outcome = outcome(&data);
        let config = FormatterConfig::minimal().with_max_clusters(1);
        let text = HumanFormatter::with_config(config)
            .format(&outcome, Some(&data))
            .unwrap();
        assert!(text.contains("1:Centroid=(5)\n"));
        assert!(!text.contains("2:"));
        assert!(text.ends_with("... and 2 more clusters\n"));
    }

    #[test]
    fn test_json_with_distances() {
        let data = data();
        let outcome = outcome(&data);
        let json = JsonFormatter::new().format(&outcome, Some(&data)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(doc["cluster_count"], 3);
        assert_eq!(doc["omitted_clusters"], 0);
        let last = &doc["clusters"][2];
        assert_eq!(last["index"], 3);
        assert_eq!(last["size"], 2);
        assert_eq!(last["centroid"], "9");
        assert_eq!(last["members"][1]["id"], 3);
        assert_eq!(last["members"][0]["distance"], 0.0);
        assert!(last["average_distance"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_json_without_dataset_omits_distances() {
        let data = data();
        let outcome = outcome(&data);
        let json = JsonFormatter::new()
            .with_pretty(false)
            .format(&outcome, None)
            .unwrap();
        assert!(!json.contains('\n'));
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(doc["clusters"][0].get("average_distance").is_none());
        assert!(doc["clusters"][0]["members"][0].get("distance").is_none());

        let minimal = JsonFormatter::with_config(FormatterConfig::minimal())
            .format(&outcome, Some(&data))
            .unwrap();
        let doc: serde_json::Value = serde_json::from_str(&minimal).unwrap();
        assert!(doc["clusters"][0].get("members").is_none());
    }
}
