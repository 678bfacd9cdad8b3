// Job Post Domain Model

/// Job post ID (SERIAL primary key assigned by storage)
pub type JobPostId = i32;

/// One row of the `jobposts` table as seen by a single scan.
///
/// Built from a cursor row and dropped after classification. Text columns
/// that are NULL in storage arrive here as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPostRecord {
    pub id: JobPostId,
    pub title: String,
    pub description: String,
}

impl JobPostRecord {
    pub fn new(id: JobPostId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Build a record from nullable columns, coalescing NULL to ""
    pub fn from_nullable(id: JobPostId, title: Option<String>, description: Option<String>) -> Self {
        Self {
            id,
            title: title.unwrap_or_default(),
            description: description.unwrap_or_default(),
        }
    }
}
