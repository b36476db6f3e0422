/**
 * Manifest schema and the one-shot preload that
 *  seeds a store from local files at startup.
 */
pub mod manifest;
/**
 * In-memory bucket/object store.
 *  All mutation and lookup goes through here and
 *  it is safe to share across request handlers.
 */
pub mod store;

pub mod prelude {
    pub use crate::manifest::{preload, Manifest, ManifestError, PreloadSummary};
    pub use crate::store::{Object, ObjectMeta, Store, StoreError, DEFAULT_CONTENT_TYPE};
}
