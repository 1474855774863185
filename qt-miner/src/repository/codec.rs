//! Encoding of cluster collections into storable documents.
//!
//! A stored clustering is a JSON envelope around a payload:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "created_at": "2024-01-15T10:30:00Z",
//!   "checksum": "<sha256 of the payload, hex>",
//!   "payload": {
//!     "policy": "merge",
//!     "attributes": [{"name": "outlook", "index": 0, "kind": "categorical", "domain": ["rain", "sunny"]}],
//!     "clusters": [{"centroid": [{"kind": "categorical", "value": "sunny"}], "members": [0, 3]}]
//!   }
//! }
//! ```
//!
//! The payload carries the attribute schema so centroids can be rebuilt
//! without the dataset they came from. The checksum covers the payload text
//! exactly as stored.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use super::StorageBackend;
use crate::data::{Attribute, AttributeKind, Item, Schema, Tuple, Value};
use crate::error::{QtError, Result};
use crate::log_storage_op;
use crate::logging::LogConfig;
use crate::mining::{Cluster, ClusterSet, CollisionPolicy, InsertOutcome};

/// Version written into every envelope. Loading any other version fails.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    format_version: u32,
    created_at: DateTime<Utc>,
    checksum: String,
    payload: Box<RawValue>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    policy: CollisionPolicy,
    attributes: Vec<Attribute>,
    clusters: Vec<StoredCluster>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCluster {
    centroid: Vec<Value>,
    members: Vec<usize>,
}

fn checksum(payload: &RawValue) -> String {
    hex::encode(Sha256::digest(payload.get().as_bytes()))
}

/// Serializes `clusters` into envelope bytes.
pub fn encode(clusters: &ClusterSet) -> Result<Vec<u8>> {
    let attributes: Vec<Attribute> = clusters
        .iter()
        .next()
        .map(|c| {
            c.centroid()
                .iter()
                .map(|item| item.attribute().as_ref().clone())
                .collect()
        })
        .unwrap_or_default();

    let payload = Payload {
        policy: clusters.policy(),
        attributes,
        clusters: clusters
            .iter()
            .map(|c| StoredCluster {
                centroid: c.centroid().values().cloned().collect(),
                members: c.members().collect(),
            })
            .collect(),
    };

    let payload = serde_json::to_string(&payload)
        .and_then(RawValue::from_string)
        .map_err(|e| QtError::Serialization(e.to_string()))?;
    let envelope = Envelope {
        format_version: FORMAT_VERSION,
        created_at: Utc::now(),
        checksum: checksum(&payload),
        payload,
    };
    serde_json::to_vec_pretty(&envelope).map_err(|e| QtError::Serialization(e.to_string()))
}

/// Rebuilds a cluster collection from envelope bytes.
///
/// Every structural problem with the bytes is reported as `CorruptData`.
pub fn decode(bytes: &[u8]) -> Result<ClusterSet> {
    let envelope: Envelope = serde_json::from_slice(bytes)
        .map_err(|e| QtError::corrupt(format!("not a clustering document: {e}")))?;

    if envelope.format_version != FORMAT_VERSION {
        return Err(QtError::corrupt(format!(
            "unsupported format version {} (expected {FORMAT_VERSION})",
            envelope.format_version
        )));
    }
    if checksum(&envelope.payload) != envelope.checksum {
        return Err(QtError::corrupt("checksum mismatch"));
    }

    let payload: Payload = serde_json::from_str(envelope.payload.get())
        .map_err(|e| QtError::corrupt(format!("malformed payload: {e}")))?;
    let schema = rebuild_schema(payload.attributes)?;

    let mut set = ClusterSet::with_policy(payload.policy);
    let mut seen = HashSet::new();
    for (position, stored) in payload.clusters.into_iter().enumerate() {
        let cluster = rebuild_cluster(&schema, stored, position, &mut seen)?;
        if set.insert(cluster) != InsertOutcome::Inserted {
            return Err(QtError::corrupt(format!(
                "cluster {position} duplicates the order of another cluster"
            )));
        }
    }
    Ok(set)
}

fn rebuild_schema(attributes: Vec<Attribute>) -> Result<Schema> {
    let checked = attributes
        .into_iter()
        .map(|a| match a.kind() {
            AttributeKind::Numeric { min, max } => Attribute::numeric(a.name(), a.index(), *min, *max),
            AttributeKind::Categorical { .. } => Ok(a),
        })
        .collect::<Result<Vec<_>>>()
        .map_err(|e| QtError::corrupt(format!("invalid attribute: {e}")))?;
    Schema::new(checked).map_err(|e| QtError::corrupt(format!("invalid schema: {e}")))
}

fn rebuild_cluster(
    schema: &Schema,
    stored: StoredCluster,
    position: usize,
    seen: &mut HashSet<usize>,
) -> Result<Cluster> {
    if stored.centroid.len() != schema.len() {
        return Err(QtError::corrupt(format!(
            "cluster {position} has {} centroid values for {} attributes",
            stored.centroid.len(),
            schema.len()
        )));
    }
    let items = schema
        .iter()
        .zip(stored.centroid)
        .map(|(attribute, value)| Item::new(Arc::clone(attribute), value))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| QtError::corrupt(format!("cluster {position}: {e}")))?;
    let centroid = Tuple::new(items).map_err(|e| QtError::corrupt(e.to_string()))?;

    if stored.members.is_empty() {
        return Err(QtError::corrupt(format!("cluster {position} has no members")));
    }
    let mut cluster = Cluster::new(centroid);
    for id in stored.members {
        if !seen.insert(id) || !cluster.add_member(id) {
            return Err(QtError::corrupt(format!(
                "record {id} appears more than once"
            )));
        }
    }
    Ok(cluster)
}

/// Saves and loads cluster collections through a [`StorageBackend`].
#[derive(Debug, Clone)]
pub struct ClusterStore<B> {
    backend: B,
    log: LogConfig,
}

impl<B: StorageBackend> ClusterStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            log: LogConfig::default(),
        }
    }

    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Writes `clusters` under `name`, replacing any earlier artifact.
    #[instrument(skip(self, clusters), fields(backend = self.backend.backend_type(), clusters = clusters.len()))]
    pub async fn save(&self, clusters: &ClusterSet, name: &str) -> Result<()> {
        let bytes = encode(clusters)?;
        let size = bytes.len();
        self.backend.write(name, bytes).await?;
        log_storage_op!(
            self.log,
            name,
            bytes = size,
            clusters = clusters.len(),
            "Saved clustering"
        );
        Ok(())
    }

    /// Reads the collection stored under `name`.
    #[instrument(skip(self), fields(backend = self.backend.backend_type()))]
    pub async fn load(&self, name: &str) -> Result<ClusterSet> {
        let bytes = self.backend.read(name).await?;
        debug!(bytes = bytes.len(), "Read clustering artifact");
        let clusters = decode(&bytes)?;
        log_storage_op!(self.log, name, clusters = clusters.len(), "Loaded clustering");
        Ok(clusters)
    }

    pub async fn exists(&self, name: &str) -> Result<bool> {
        self.backend.exists(name).await
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.backend.delete(name).await
    }

    /// Names of every stored clustering.
    pub async fn list(&self) -> Result<Vec<String>> {
        self.backend.list().await
    }
}
