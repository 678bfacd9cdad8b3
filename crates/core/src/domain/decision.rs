// Decision Domain Model - what the classifier concluded about one row

use super::job_post::JobPostId;

/// Outcome of trimming a text field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationResult {
    pub original: String,
    pub normalized: String,
    /// True iff `normalized != original`
    pub changed: bool,
}

/// Whether a row goes onto the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishDecision {
    Skip,
    /// Exact payload text to publish
    Forward(String),
}

impl PublishDecision {
    pub fn is_forward(&self) -> bool {
        matches!(self, PublishDecision::Forward(_))
    }
}

/// Observability event produced while classifying a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEvent {
    /// Title carried surrounding whitespace (audit only)
    Trimmed {
        id: JobPostId,
        original: String,
        normalized: String,
    },
    /// Title already clean
    NoAction { id: JobPostId, text: String },
    /// Description qualifies for forwarding
    Qualified { id: JobPostId },
    /// Description empty, nothing to forward
    NotNeeded { id: JobPostId },
}

impl RowEvent {
    pub fn id(&self) -> JobPostId {
        match self {
            RowEvent::Trimmed { id, .. }
            | RowEvent::NoAction { id, .. }
            | RowEvent::Qualified { id }
            | RowEvent::NotNeeded { id } => *id,
        }
    }

    /// Short event name for structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            RowEvent::Trimmed { .. } => "trimmed",
            RowEvent::NoAction { .. } => "no_action",
            RowEvent::Qualified { .. } => "qualified",
            RowEvent::NotNeeded { .. } => "not_needed",
        }
    }
}

impl std::fmt::Display for RowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowEvent::Trimmed {
                id,
                original,
                normalized,
            } => write!(f, "Trimming text for ID {}: '{}' -> '{}'", id, original, normalized),
            RowEvent::NoAction { id, text } => {
                write!(f, "No trimming needed for ID {}: '{}'", id, text)
            }
            RowEvent::Qualified { id } => write!(f, "Description qualifies for ID {}", id),
            RowEvent::NotNeeded { id } => {
                write!(f, "No forwarding needed for ID {}: empty description", id)
            }
        }
    }
}

/// Classifier output: the decision plus the event that explains it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub decision: PublishDecision,
    pub event: RowEvent,
}
