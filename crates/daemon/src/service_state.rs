use std::path::PathBuf;

use common::prelude::{preload, Manifest, ManifestError, Store};

use crate::service_config::Config;

/// State shared by every request handler.
#[derive(Clone, Debug, Default)]
pub struct State {
    store: Store,
}

impl State {
    /// Build the state, preloading the manifest if one is configured.
    ///
    /// Preload runs to completion here, before any listener exists, so no
    /// request can observe a partially seeded store.
    pub fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let store = Store::new();

        if let Some(path) = &config.manifest_path {
            tracing::info!(path = ?path, "loading manifest");
            let manifest = Manifest::read(path).map_err(|source| StateSetupError::Manifest {
                path: path.clone(),
                source,
            })?;
            let summary =
                preload(&store, &manifest).map_err(|source| StateSetupError::Manifest {
                    path: path.clone(),
                    source,
                })?;
            tracing::info!(
                buckets = summary.buckets,
                objects = summary.objects,
                "manifest preloaded"
            );
        }

        tracing::debug!(buckets = ?store.bucket_names(), "store ready");
        Ok(Self { store })
    }

    pub fn from_store(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl AsRef<Store> for State {
    fn as_ref(&self) -> &Store {
        &self.store
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("manifest {path:?}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },
}
