// Row Classifier - decides whether a job post row is forwarded

use crate::application::normalizer::normalize;
use crate::domain::{
    Classification, ClassificationRule, JobPostRecord, PublishDecision, RowEvent,
};

/// Applies the deployment's classification rule to each row.
///
/// Pure: the returned event describes what happened, the caller logs it.
#[derive(Debug, Clone, Copy)]
pub struct RowClassifier {
    rule: ClassificationRule,
}

impl RowClassifier {
    pub fn new(rule: ClassificationRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> ClassificationRule {
        self.rule
    }

    pub fn classify(&self, record: &JobPostRecord) -> Classification {
        match self.rule {
            ClassificationRule::TitleAudit => audit_title(record),
            ClassificationRule::DescriptionForward => forward_description(record),
        }
    }
}

/// Report titles that need trimming. Never forwards.
pub fn audit_title(record: &JobPostRecord) -> Classification {
    let result = normalize(&record.title);
    let event = if result.changed {
        RowEvent::Trimmed {
            id: record.id,
            original: result.original,
            normalized: result.normalized,
        }
    } else {
        RowEvent::NoAction {
            id: record.id,
            text: result.original,
        }
    };

    Classification {
        decision: PublishDecision::Skip,
        event,
    }
}

/// Forward the description verbatim when it is non-empty
pub fn forward_description(record: &JobPostRecord) -> Classification {
    if record.description.is_empty() {
        return Classification {
            decision: PublishDecision::Skip,
            event: RowEvent::NotNeeded { id: record.id },
        };
    }

    Classification {
        decision: PublishDecision::Forward(record.description.clone()),
        event: RowEvent::Qualified { id: record.id },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engineer() -> JobPostRecord {
        JobPostRecord::new(1, "Engineer  ", "Build backend systems")
    }

    #[test]
    fn test_title_audit_reports_trim_without_forwarding() {
        let classifier = RowClassifier::new(ClassificationRule::TitleAudit);
        let result = classifier.classify(&engineer());

        assert_eq!(result.decision, PublishDecision::Skip);
        assert_eq!(
            result.event.to_string(),
            "Trimming text for ID 1: 'Engineer  ' -> 'Engineer'"
        );
        assert_eq!(result.event.kind(), "trimmed");
    }

    #[test]
    fn test_title_audit_clean_title_needs_no_action() {
        let record = JobPostRecord::new(2, "Analyst", "");
        let result = audit_title(&record);

        assert_eq!(result.decision, PublishDecision::Skip);
        assert_eq!(
            result.event,
            RowEvent::NoAction {
                id: 2,
                text: "Analyst".to_string()
            }
        );
        assert_eq!(result.event.to_string(), "No trimming needed for ID 2: 'Analyst'");
    }

    #[test]
    fn test_title_audit_ignores_description() {
        let record = JobPostRecord::new(3, "Clean", "   padded description   ");
        let result = audit_title(&record);
        assert!(matches!(result.event, RowEvent::NoAction { .. }));
        assert!(!result.decision.is_forward());
    }

    #[test]
    fn test_description_forward_uses_description_verbatim() {
        let classifier = RowClassifier::new(ClassificationRule::DescriptionForward);
        let result = classifier.classify(&engineer());

        assert_eq!(
            result.decision,
            PublishDecision::Forward("Build backend systems".to_string())
        );
        assert_eq!(result.event, RowEvent::Qualified { id: 1 });
    }

    #[test]
    fn test_description_forward_does_not_normalize() {
        let record = JobPostRecord::new(4, "Designer", "  Sketch things \n");
        let result = forward_description(&record);
        assert_eq!(
            result.decision,
            PublishDecision::Forward("  Sketch things \n".to_string())
        );
    }

    #[test]
    fn test_description_forward_skips_empty() {
        let record = JobPostRecord::new(2, "Analyst", "");
        let result = forward_description(&record);

        assert_eq!(result.decision, PublishDecision::Skip);
        assert_eq!(result.event, RowEvent::NotNeeded { id: 2 });
    }

    #[test]
    fn test_description_forward_skips_null_description() {
        let record = JobPostRecord::from_nullable(5, Some("Analyst".to_string()), None);
        let result = forward_description(&record);
        assert_eq!(result.decision, PublishDecision::Skip);
    }
}
