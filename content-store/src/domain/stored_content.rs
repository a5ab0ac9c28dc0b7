use bytes::Bytes;

/// Logical name under which JSON metadata is always stored.
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// A named byte payload ready to be submitted to the primary backend.
///
/// Immutable once constructed; the bytes are reference counted so handing the
/// payload to an HTTP body does not copy it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContent {
    name: String,
    bytes: Bytes,
}

impl StoredContent {
    /// Payload read from a local file, named after the file's last path segment.
    pub fn file(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Canonically encoded JSON metadata, always named `metadata.json`.
    pub fn metadata(bytes: impl Into<Bytes>) -> Self {
        Self::file(METADATA_FILE_NAME, bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_content_uses_fixed_name() {
        let content = StoredContent::metadata(br#"{"a":1}"#.to_vec());
        assert_eq!(content.name(), "metadata.json");
        assert_eq!(content.len(), 7);
    }

    #[test]
    fn test_empty_file_content_is_allowed() {
        let content = StoredContent::file("empty.bin", Vec::new());
        assert!(content.is_empty());
        assert_eq!(content.name(), "empty.bin");
    }
}
