//! A single cluster: a centroid record and the ids of its members.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::Write;

use crate::data::{DatasetView, Tuple};
use crate::error::{QtError, Result};

/// Ordering key of a cluster: member count, then the centroid's rendered values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterKey {
    pub size: usize,
    pub centroid: String,
}

/// A centroid record plus the set of record ids assigned to it.
///
/// Clusters order by [`ClusterKey`]. Two structurally different clusters can
/// share a key; a [`ClusterSet`](super::ClusterSet) resolves such ties
/// explicitly.
#[derive(Debug, Clone)]
pub struct Cluster {
    centroid: Tuple,
    rendered: String,
    members: BTreeSet<usize>,
}

impl Cluster {
    /// Creates an empty cluster around `centroid`.
    pub fn new(centroid: Tuple) -> Self {
        let rendered = centroid.rendered();
        Self {
            centroid,
            rendered,
            members: BTreeSet::new(),
        }
    }

    pub fn centroid(&self) -> &Tuple {
        &self.centroid
    }

    /// Adds a record id; returns false if it was already present.
    pub fn add_member(&mut self, id: usize) -> bool {
        self.members.insert(id)
    }

    pub fn contains_member(&self, id: usize) -> bool {
        self.members.contains(&id)
    }

    /// Removes a record id; returns false if it was not present.
    pub fn remove_member(&mut self, id: usize) -> bool {
        self.members.remove(&id)
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member ids in ascending order.
    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied()
    }

    /// The centroid's value string used to break size ties.
    pub fn centroid_rendering(&self) -> &str {
        &self.rendered
    }

    pub fn key(&self) -> ClusterKey {
        ClusterKey {
            size: self.size(),
            centroid: self.rendered.clone(),
        }
    }

    /// Compares by size ascending, then by centroid rendering.
    pub fn compare(&self, other: &Cluster) -> Ordering {
        self.size()
            .cmp(&other.size())
            .then_with(|| self.rendered.cmp(&other.rendered))
    }

    pub(crate) fn absorb(&mut self, other: Cluster) {
        self.members.extend(other.members);
    }

    /// Renders the centroid only.
    pub fn render(&self) -> String {
        format!("Centroid=({})", self.rendered)
    }

    /// Renders the centroid, every member with its distance to the centroid,
    /// and the average member distance.
    pub fn render_with<V: DatasetView + ?Sized>(&self, view: &V) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "Centroid=({})", self.rendered);
        out.push_str("Examples:\n");
        for id in self.members() {
            let record = view.record(id).ok_or(QtError::RecordOutOfRange {
                index: id,
                count: view.record_count(),
            })?;
            let values: Vec<String> = (0..view.attribute_count())
                .map(|a| {
                    view.raw_value(id, a)
                        .map_or_else(|| "?".to_string(), ToString::to_string)
                })
                .collect();
            let distance = self.centroid.distance(record)?;
            let _ = writeln!(out, "[{}] dist={distance}", values.join(" "));
        }
        let average = self.centroid.avg_distance(view, self.members())?;
        let _ = write!(out, "AvgDistance={average}");
        Ok(out)
    }
}

impl PartialEq for Cluster {
    fn eq(&self, other: &Self) -> bool {
        self.centroid == other.centroid && self.members == other.members
    }
}
