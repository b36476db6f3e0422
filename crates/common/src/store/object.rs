use bytes::Bytes;

/// Content type recorded for objects uploaded without one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A stored blob together with its content type.
///
/// Cloning is cheap: the content is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    content: Bytes,
    content_type: String,
}

impl Object {
    /// Build an object, falling back to [`DEFAULT_CONTENT_TYPE`] when
    /// `content_type` is empty. Any other value, whitespace included, is
    /// kept as given.
    pub fn new(content: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        let mut content_type = content_type.into();
        if content_type.is_empty() {
            content_type = DEFAULT_CONTENT_TYPE.to_string();
        }
        Self {
            content: content.into(),
            content_type,
        }
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub(crate) fn meta(&self, bucket: &str, name: &str) -> ObjectMeta {
        ObjectMeta {
            bucket: bucket.to_string(),
            name: name.to_string(),
            content_type: self.content_type.clone(),
            size: self.size(),
        }
    }

    pub fn into_parts(self) -> (Bytes, String) {
        (self.content, self.content_type)
    }
}

/// Everything about an object except its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub bucket: String,
    pub name: String,
    pub content_type: String,
    pub size: u64,
}
