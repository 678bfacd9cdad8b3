// Normalizer - pure text cleanup applied to job post fields

use crate::domain::NormalizationResult;

/// Trim leading and trailing whitespace.
///
/// Total and side-effect free; empty input yields an unchanged empty result.
pub fn normalize(text: &str) -> NormalizationResult {
    let normalized = text.trim();
    NormalizationResult {
        original: text.to_string(),
        normalized: normalized.to_string(),
        changed: normalized != text,
    }
}
