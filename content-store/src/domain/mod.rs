pub mod content_id;
pub mod metadata;
pub mod stored_content;

pub use content_id::ContentId;
pub use metadata::{canonical_json, MetadataError};
pub use stored_content::{StoredContent, METADATA_FILE_NAME};
