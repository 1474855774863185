//! The ordered, duplicate-free collection of clusters produced by a run.

use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;
use std::fmt::Write;

use tracing::warn;

use super::cluster::{Cluster, ClusterKey};
use super::config::CollisionPolicy;
use crate::data::DatasetView;
use crate::error::Result;

/// What happened to a cluster handed to [`ClusterSet::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// No held cluster shared its key.
    Inserted,
    /// Its members were merged into the held cluster with the same key.
    Merged,
    /// It replaced the held cluster with the same key.
    Replaced,
    /// It was dropped in favour of the held cluster with the same key.
    Rejected,
}

/// Clusters kept in ascending [`ClusterKey`] order.
#[derive(Debug, Clone, Default)]
pub struct ClusterSet {
    clusters: BTreeMap<ClusterKey, Cluster>,
    policy: CollisionPolicy,
}

impl ClusterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CollisionPolicy) -> Self {
        Self {
            clusters: BTreeMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Inserts `cluster`, resolving a key collision with the configured policy.
    pub fn insert(&mut self, cluster: Cluster) -> InsertOutcome {
        match self.clusters.entry(cluster.key()) {
            Entry::Vacant(slot) => {
                slot.insert(cluster);
                InsertOutcome::Inserted
            }
            Entry::Occupied(mut held) => {
                warn!(
                    size = cluster.size(),
                    centroid = cluster.centroid_rendering(),
                    policy = ?self.policy,
                    "Cluster collides with a held cluster of equal order"
                );
                match self.policy {
                    CollisionPolicy::Reject => InsertOutcome::Rejected,
                    CollisionPolicy::Replace => {
                        held.insert(cluster);
                        InsertOutcome::Replaced
                    }
                    CollisionPolicy::Merge => {
                        let mut merged = held.remove();
                        merged.absorb(cluster);
                        self.reinsert(merged);
                        InsertOutcome::Merged
                    }
                }
            }
        }
    }

    /// Places a merged cluster under its new key, absorbing any cluster it
    /// collides with on the way. Each round removes one entry, so it ends.
    fn reinsert(&mut self, mut cluster: Cluster) {
        loop {
            let key = cluster.key();
            match self.clusters.remove(&key) {
                Some(other) => cluster.absorb(other),
                None => {
                    self.clusters.insert(key, cluster);
                    return;
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Clusters in ascending order.
    pub fn iter(&self) -> ClusterIter<'_> {
        ClusterIter {
            inner: self.clusters.values(),
        }
    }

    /// The cluster holding record `id`, if any.
    pub fn cluster_of(&self, id: usize) -> Option<&Cluster> {
        self.iter().find(|c| c.contains_member(id))
    }

    /// Total number of member ids over all clusters.
    pub fn total_members(&self) -> usize {
        self.iter().map(Cluster::size).sum()
    }

    /// Lists each centroid, numbered from 1.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, cluster) in self.iter().enumerate() {
            let _ = writeln!(out, "{}:{}", i + 1, cluster.render());
        }
        out
    }

    /// Lists each cluster with its members and distances, numbered from 1.
    pub fn render_with<V: DatasetView + ?Sized>(&self, view: &V) -> Result<String> {
        let mut out = String::new();
        for (i, cluster) in self.iter().enumerate() {
            let _ = writeln!(out, "{}:{}", i + 1, cluster.render_with(view)?);
        }
        Ok(out)
    }
}

impl PartialEq for ClusterSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

/// Iterator over the clusters of a [`ClusterSet`] in ascending order.
pub struct ClusterIter<'a> {
    inner: btree_map::Values<'a, ClusterKey, Cluster>,
}

impl<'a> Iterator for ClusterIter<'a> {
    type Item = &'a Cluster;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for ClusterIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for ClusterIter<'_> {}

impl<'a> IntoIterator for &'a ClusterSet {
    type Item = &'a Cluster;
    type IntoIter = ClusterIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
