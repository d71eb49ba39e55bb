/// Document metadata read from the core-properties part.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Core document metadata.
///
/// Every field is optional: a package without a core-properties part, or
/// with one that cannot be decoded, simply yields the default value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document author/creator
    pub creator: Option<String>,
    /// Keywords associated with the document
    pub keywords: Option<String>,
    /// Document description/comments
    pub description: Option<String>,
    /// Last person to modify the document
    pub last_modified_by: Option<String>,
    /// Creation date
    pub created: Option<DateTime<Utc>>,
    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Check if the metadata contains any actual data.
    pub fn has_data(&self) -> bool {
        self.title.is_some()
            || self.subject.is_some()
            || self.creator.is_some()
            || self.keywords.is_some()
            || self.description.is_some()
            || self.last_modified_by.is_some()
            || self.created.is_some()
            || self.modified.is_some()
    }
}
