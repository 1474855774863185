//! Configuration for clustering runs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QtError, Result};
use crate::logging::LogConfig;

/// A validated clustering radius.
///
/// NaN and negative values are rejected before any run starts. Positive
/// infinity is accepted; it places every record in the first cluster and so
/// ends in `RadiusTooLarge`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Radius(f64);

impl Radius {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value < 0.0 {
            return Err(QtError::InvalidRadius(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Radius {
    type Error = QtError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a cluster collection does when an inserted cluster compares equal
/// (same size, same centroid rendering) to one it already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Union the newcomer's members into the held cluster, which keeps its
    /// centroid and is re-keyed under its new size.
    ///
    /// No record id is lost, but merged members were only checked against
    /// the newcomer's centroid and may lie outside the radius of the kept
    /// one. The run's `cluster_count` then exceeds the collection's length.
    /// Use `Reject` or `Replace` when membership must hold exactly.
    #[default]
    Merge,
    /// The newcomer takes the place of the held cluster.
    Replace,
    /// The newcomer is dropped.
    Reject,
}

/// Configuration for a [`QtMiner`](super::QtMiner).
#[derive(Debug, Clone, Default)]
pub struct MinerConfig {
    /// How the result collection resolves ordering collisions
    pub collision_policy: CollisionPolicy,
    /// Logging behavior during the run
    pub log: LogConfig,
}

impl MinerConfig {
    /// Configuration that logs every candidate cluster.
    pub fn verbose() -> Self {
        Self {
            log: LogConfig::verbose(),
            ..Default::default()
        }
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_validation() {
        assert_eq!(Radius::new(0.0).unwrap().value(), 0.0);
        assert_eq!(Radius::new(1.5).unwrap().value(), 1.5);
        assert!(Radius::new(f64::INFINITY).is_ok());
        assert!(matches!(Radius::new(-0.1), Err(QtError::InvalidRadius(_))));
        assert!(matches!(Radius::new(f64::NAN), Err(QtError::InvalidRadius(_))));
        assert!(Radius::try_from(-1.0).is_err());
    }

    #[test]
    fn test_default_config() {
        let config = MinerConfig::default();
        assert_eq!(config.collision_policy, CollisionPolicy::Merge);
        assert!(!config.log.log_candidate_details);

        let config = MinerConfig::verbose().with_collision_policy(CollisionPolicy::Reject);
        assert_eq!(config.collision_policy, CollisionPolicy::Reject);
        assert!(config.log.log_candidate_details);
    }
}
