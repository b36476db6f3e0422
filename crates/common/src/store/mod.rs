//! In-memory object store
//!
//! The [`Store`] maps bucket names to their objects and is the only place
//! that mutates or reads that mapping. Every operation takes a single lock
//! over the whole map, so each call is atomic with respect to concurrent
//! callers and a failed call never leaves a partial change behind.
//!
//! Cloning a [`Store`] hands out another handle to the same data.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

mod object;

pub use object::{Object, ObjectMeta, DEFAULT_CONTENT_TYPE};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("bucket already exists: {0}")]
    AlreadyExists(String),
    /// The bucket, or the object within it, does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug, Default)]
struct StoreInner {
    /// bucket name -> object name -> object
    buckets: HashMap<String, BTreeMap<String, Object>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new, empty bucket.
    pub fn create_bucket(&self, name: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.buckets.contains_key(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        inner.buckets.insert(name.to_string(), BTreeMap::new());
        tracing::debug!(bucket = name, "bucket created");
        Ok(())
    }

    /// Insert or overwrite `bucket/name`.
    ///
    /// An empty `content_type` is stored as [`DEFAULT_CONTENT_TYPE`].
    pub fn put_object(
        &self,
        bucket: &str,
        name: &str,
        content: impl Into<Bytes>,
        content_type: &str,
    ) -> Result<ObjectMeta, StoreError> {
        let object = Object::new(content, content_type);
        let meta = object.meta(bucket, name);

        let mut inner = self.inner.write();
        let objects = inner
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::NotFound(bucket.to_string()))?;
        let replaced = objects.insert(name.to_string(), object).is_some();

        tracing::debug!(
            bucket,
            object = name,
            size = meta.size,
            content_type = %meta.content_type,
            replaced,
            "object stored"
        );
        Ok(meta)
    }

    /// Fetch `bucket/name`. A missing bucket and a missing object are
    /// reported the same way.
    pub fn get_object(&self, bucket: &str, name: &str) -> Result<Object, StoreError> {
        let inner = self.inner.read();
        inner
            .buckets
            .get(bucket)
            .and_then(|objects| objects.get(name))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", bucket, name)))
    }

    /// Metadata for every object in `bucket`, ordered by object name.
    pub fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectMeta>, StoreError> {
        let inner = self.inner.read();
        let objects = inner
            .buckets
            .get(bucket)
            .ok_or_else(|| StoreError::NotFound(bucket.to_string()))?;
        Ok(objects
            .iter()
            .map(|(name, object)| object.meta(bucket, name))
            .collect())
    }

    pub fn bucket_exists(&self, name: &str) -> bool {
        self.inner.read().buckets.contains_key(name)
    }

    /// Names of all buckets, sorted.
    pub fn bucket_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().buckets.keys().cloned().collect();
        names.sort();
        names
    }
}
