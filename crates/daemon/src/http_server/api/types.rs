//! Response bodies shaped like the real storage API.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use common::prelude::ObjectMeta;

pub const BUCKET_KIND: &str = "storage#bucket";
pub const OBJECT_KIND: &str = "storage#object";
pub const OBJECTS_KIND: &str = "storage#objects";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketResource {
    pub kind: String,
    pub name: String,
}

impl BucketResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: BUCKET_KIND.to_string(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectResource {
    pub kind: String,
    pub name: String,
    pub bucket: String,
    pub content_type: String,
    pub size: u64,
}

impl From<ObjectMeta> for ObjectResource {
    fn from(meta: ObjectMeta) -> Self {
        Self {
            kind: OBJECT_KIND.to_string(),
            name: meta.name,
            bucket: meta.bucket,
            content_type: meta.content_type,
            size: meta.size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectList {
    pub kind: String,
    pub items: Vec<ObjectResource>,
}

impl ObjectList {
    pub fn new(items: impl IntoIterator<Item = ObjectMeta>) -> Self {
        Self {
            kind: OBJECTS_KIND.to_string(),
            items: items.into_iter().map(ObjectResource::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: status.as_u16(),
                message: message.into(),
            },
        }
    }
}
