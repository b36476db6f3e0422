//! Startup manifest
//!
//! A manifest is a YAML document naming buckets and the local files to load
//! into them before the server starts accepting requests:
//!
//! ```yaml
//! buckets:
//!   test-bucket:
//!     files:
//!       - path: ./data.json
//!         content-type: application/json
//! ```
//!
//! Each file becomes an object named after the file's base name. Relative
//! paths resolve against the process working directory.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    /// Buckets in the order they appear in the document.
    #[serde(default)]
    pub buckets: IndexMap<String, BucketManifest>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct BucketManifest {
    #[serde(default)]
    pub files: Vec<FileManifest>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FileManifest {
    pub path: PathBuf,
    #[serde(default, rename = "content-type")]
    pub content_type: Option<String>,
}

impl FileManifest {
    /// Object name for this file: the final path segment.
    pub fn object_name(&self) -> Result<String, ManifestError> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ManifestError::InvalidPath(self.path.clone()))
    }

    /// Declared content type, empty when absent.
    ///
    /// The value is served back verbatim as a `Content-Type` header, so it
    /// may only hold visible ASCII, spaces and tabs.
    pub fn content_type(&self) -> Result<&str, ManifestError> {
        let content_type = self.content_type.as_deref().unwrap_or_default();
        let valid = content_type
            .bytes()
            .all(|b| b == b'\t' || (0x20..0x7f).contains(&b));
        if !valid {
            return Err(ManifestError::InvalidContentType {
                path: self.path.clone(),
                content_type: content_type.to_string(),
            });
        }
        Ok(content_type)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path:?}: {source}")]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed manifest: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to read file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest path has no file name: {0:?}")]
    InvalidPath(PathBuf),
    #[error("content type {content_type:?} for {path:?} is not a valid header value")]
    InvalidContentType { path: PathBuf, content_type: String },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl Manifest {
    pub fn from_yaml(source: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Read and parse the manifest at `path`.
    pub fn read(path: &Path) -> Result<Self, ManifestError> {
        let source = std::fs::read_to_string(path).map_err(|source| ManifestError::ReadManifest {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    pub fn file_count(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.files.len()).sum()
    }
}

/// What a [`preload`] put into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadSummary {
    pub buckets: usize,
    pub objects: usize,
}

/// Seed `store` from `manifest`.
///
/// Buckets that already exist are reused. The first file that cannot be read,
/// or that declares a content type unusable as a header, aborts the load and its error is returned; callers must not serve traffic
/// after a failed preload.
pub fn preload(store: &Store, manifest: &Manifest) -> Result<PreloadSummary, ManifestError> {
    let mut summary = PreloadSummary::default();

    for (bucket, entry) in &manifest.buckets {
        match store.create_bucket(bucket) {
            Ok(()) => tracing::info!(bucket = %bucket, "created bucket from manifest"),
            Err(StoreError::AlreadyExists(_)) => {
                tracing::debug!(bucket = %bucket, "bucket already exists, loading into it")
            }
            Err(e) => return Err(e.into()),
        }
        summary.buckets += 1;

        for file in &entry.files {
            let content_type = file.content_type()?;
            let content = std::fs::read(&file.path).map_err(|source| {
                tracing::error!(path = ?file.path, "failed to read manifest file: {}", source);
                ManifestError::Io {
                    path: file.path.clone(),
                    source,
                }
            })?;
            let name = file.object_name()?;

            let meta = store.put_object(bucket, &name, content, content_type)?;
            tracing::info!(
                bucket = %bucket,
                object = %meta.name,
                size = meta.size,
                content_type = %meta.content_type,
                "loaded object from manifest"
            );
            summary.objects += 1;
        }
    }

    Ok(summary)
}
