//! In-memory object storage
//!
//! Holds objects in a sorted map and derives one-level listings from their
//! paths the way a real bucket does. Failures can be injected per URI and
//! every call is recorded, which makes it the test double for the sweep.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::RwLock;

use crate::domain::models::{BucketEntry, StorageUri};
use crate::domain::ports::{ObjectStorage, StorageError};
use crate::services::retention_policy::TIMESTAMP_FORMAT;

#[derive(Debug, Clone)]
struct StoredObject {
    timestamp: String,
    size_bytes: u64,
}

#[derive(Debug, Default)]
struct State {
    objects: BTreeMap<String, StoredObject>,
    list_failures: HashMap<String, String>,
    delete_failures: HashMap<String, (Option<i32>, String)>,
    list_calls: Vec<StorageUri>,
    delete_calls: Vec<StorageUri>,
}

/// `ObjectStorage` kept entirely in memory.
#[derive(Debug)]
pub struct InMemoryStorage {
    scheme: String,
    state: RwLock<State>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new("gs")
    }
}

impl InMemoryStorage {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            state: RwLock::new(State::default()),
        }
    }

    fn path(&self, bucket: &str, key: &str) -> String {
        format!("{}://{bucket}/{key}", self.scheme)
    }

    /// Add an object with a raw timestamp string (may be deliberately malformed).
    #[must_use]
    pub fn with_object(mut self, bucket: &str, key: &str, timestamp: impl Into<String>) -> Self {
        let path = self.path(bucket, key);
        self.state.get_mut().objects.insert(
            path,
            StoredObject {
                timestamp: timestamp.into(),
                size_bytes: 0,
            },
        );
        self
    }

    /// Add an object last modified at `at`.
    #[must_use]
    pub fn with_object_at(self, bucket: &str, key: &str, at: DateTime<Utc>) -> Self {
        self.with_object(bucket, key, at.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Make listing `uri` fail with the given stderr text.
    #[must_use]
    pub fn with_list_failure(mut self, uri: &str, stderr: impl Into<String>) -> Self {
        self.state
            .get_mut()
            .list_failures
            .insert(uri.to_string(), stderr.into());
        self
    }

    /// Make deleting `uri` fail with the given exit status and stderr text.
    #[must_use]
    pub fn with_delete_failure(mut self, uri: &str, exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        self.state
            .get_mut()
            .delete_failures
            .insert(uri.to_string(), (exit_code, stderr.into()));
        self
    }

    /// URIs passed to `list`, in call order.
    pub async fn list_calls(&self) -> Vec<StorageUri> {
        self.state.read().await.list_calls.clone()
    }

    /// URIs passed to `delete_prefix`, in call order.
    pub async fn delete_calls(&self) -> Vec<StorageUri> {
        self.state.read().await.delete_calls.clone()
    }

    /// Paths of all objects still stored.
    pub async fn object_paths(&self) -> Vec<String> {
        self.state.read().await.objects.keys().cloned().collect()
    }
}

fn listing(objects: &BTreeMap<String, StoredObject>, uri: &str) -> Vec<BucketEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for (path, object) in objects.range(uri.to_string()..) {
        let Some(rest) = path.strip_prefix(uri) else {
            break;
        };
        match rest.split_once('/') {
            Some((dir, _)) => {
                let prefix = format!("{uri}{dir}/");
                if seen.insert(prefix.clone()) {
                    entries.push(BucketEntry::prefix(prefix));
                }
            }
            None => entries.push(BucketEntry::object(
                path.clone(),
                object.timestamp.clone(),
                Some(object.size_bytes),
            )),
        }
    }

    entries
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    fn scheme(&self) -> &str {
        &self.scheme
    }

    async fn list(&self, uri: &StorageUri) -> Result<Vec<BucketEntry>, StorageError> {
        let mut state = self.state.write().await;
        state.list_calls.push(uri.clone());

        if let Some(stderr) = state.list_failures.get(uri.as_str()) {
            return Err(StorageError::CommandFailed {
                command: format!("ls {uri}"),
                exit_code: Some(1),
                stderr: stderr.clone(),
            });
        }

        Ok(listing(&state.objects, uri.as_str()))
    }

    async fn delete_prefix(&self, uri: &StorageUri) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        state.delete_calls.push(uri.clone());

        if let Some((exit_code, stderr)) = state.delete_failures.get(uri.as_str()) {
            return Err(StorageError::CommandFailed {
                command: format!("rm -r {uri}"),
                exit_code: *exit_code,
                stderr: stderr.clone(),
            });
        }

        state.objects.retain(|path, _| !path.starts_with(uri.as_str()));
        Ok(())
    }
}
