// Classification Rule - which decision a deployment applies to each row

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Row processing mode, chosen once per deployment.
///
/// The two modes are alternatives, never a pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationRule {
    /// Audit titles for surrounding whitespace; never forwards
    #[default]
    TitleAudit,
    /// Forward every non-empty description verbatim
    DescriptionForward,
}

impl ClassificationRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationRule::TitleAudit => "title_audit",
            ClassificationRule::DescriptionForward => "description_forward",
        }
    }
}

impl std::fmt::Display for ClassificationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassificationRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "title_audit" => Ok(ClassificationRule::TitleAudit),
            "description_forward" => Ok(ClassificationRule::DescriptionForward),
            _ => Err(DomainError::UnknownRule(s.to_string())),
        }
    }
}
