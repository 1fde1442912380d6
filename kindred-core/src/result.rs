//! Final assessment result record

use crate::archetype::Archetype;
use crate::traits::{TraitConfidence, TraitVector, DIMENSION_COUNT};
use serde::{Deserialize, Serialize};

/// Flat result record handed to the host once a session terminates.
/// Suitable for whatever serialization the host chooses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Best-matching archetype after bias correction
    pub primary: Archetype,
    /// Runner-up, when one was ranked
    pub secondary: Option<Archetype>,
    /// Bias-corrected trait scores
    pub trait_scores: TraitVector,
    /// Per-dimension evidence summaries, canonical order
    pub confidences: [TraitConfidence; DIMENSION_COUNT],
    /// Confidence of the primary match, [0,1]
    pub primary_confidence: f64,
    /// 0-100 validity score from attention-check performance
    pub validity_score: f64,
    /// Set when the primary's confidence fell short of that archetype's
    /// own acceptance threshold. The call is still reported; the host
    /// decides how to present it.
    pub low_confidence: bool,
}
