//! Engine configuration
//!
//! Every empirically tuned constant lives here under a name. The overshoot
//! and stopping thresholds were calibrated on pilot-cohort data and should
//! be recalibrated before any population-level rollout.

use crate::traits::{TraitDimension, DIMENSION_COUNT};
use serde::{Deserialize, Serialize};

/// Relative weights for the adaptive selector's question-utility score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilityWeights {
    /// Under-measured-dimension term
    pub information_gain: f64,
    /// Top-2 candidate separation term
    pub discrimination: f64,
    /// Intrinsic question quality term
    pub intrinsic: f64,
    /// Precision-level bias term
    pub level: f64,
}

/// Master configuration struct. Constructed once per engine; sessions never
/// mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    // Scoring
    /// Normalized-score center (the all-neutral baseline)
    pub score_center: f64,
    /// Raw-total amplification: score = center + raw * scale
    pub score_scale: f64,
    /// Consistency bonus added to count-based confidence
    pub consistency_bonus: f64,

    // Matching
    /// Fixed population standard deviation estimate
    pub population_sigma: f64,
    /// Overshoot threshold in sigma units before the penalty engages
    pub overshoot_threshold: f64,
    /// Overshoot penalty coefficient
    pub overshoot_penalty_coeff: f64,
    /// Similarity weight applied to an archetype's signal traits
    pub signal_trait_weight: f64,
    /// Flat bonus per matching secondary-differentiator field
    pub secondary_field_bonus: f64,
    /// Runner-up score gap (0-1 scale) required for high top confidence
    pub high_confidence_gap: f64,
    /// Signal-trait alignment required for high top confidence
    pub high_confidence_alignment: f64,

    // Stopping rule
    /// Default required confidence threshold
    pub confidence_threshold: f64,
    /// Elevated threshold when the top pair is known-confusable
    pub confusable_confidence_threshold: f64,
    /// Top-2 confidence gap at or below which confusable risk applies
    pub confusable_risk_gap: f64,
    /// Questions before any stop is allowed
    pub min_questions: u32,
    /// Soft cap: stop here on good average confidence
    pub soft_cap: u32,
    /// Stop on clear top-2 separation after this many questions
    pub gap_stop_cap: u32,
    /// Unconditional stop
    pub hard_cap: u32,

    // Selection
    /// Anchor questions asked before adaptive selection begins
    pub anchor_quota: u32,
    /// Skips allowed per session
    pub max_skips: u32,
    /// Utility term weights. The level term is 1.0 for precision
    /// questions and 0.5 for core, so the configured 0.1 weight yields
    /// the +0.1 / +0.05 level bonuses.
    pub utility_weights: UtilityWeights,

    // Bias correction
    /// Z-score cap on desirability-prone dimensions (~75th percentile)
    pub desirability_z_cap: f64,
    /// Desirability index above which shrinkage applies
    pub desirability_index_threshold: f64,
    /// Raw contribution above which an answer counts toward the index
    pub desirability_raw_cutoff: i32,
    /// Per-dimension shrinkage susceptibility, canonical order
    pub desirability_susceptibility: [f64; DIMENSION_COUNT],
}

impl EngineConfig {
    /// The tuned production configuration.
    pub fn standard() -> Self {
        Self {
            score_center: 50.0,
            score_scale: 5.0,
            consistency_bonus: 0.05,

            population_sigma: 15.0,
            overshoot_threshold: 1.5,
            overshoot_penalty_coeff: 0.15,
            signal_trait_weight: 1.5,
            secondary_field_bonus: 0.025,
            high_confidence_gap: 0.15,
            high_confidence_alignment: 0.7,

            confidence_threshold: 0.72,
            confusable_confidence_threshold: 0.78,
            confusable_risk_gap: 0.2,
            min_questions: 9,
            soft_cap: 14,
            gap_stop_cap: 16,
            hard_cap: 20,

            anchor_quota: 6,
            max_skips: 3,
            utility_weights: UtilityWeights {
                information_gain: 0.4,
                discrimination: 0.3,
                intrinsic: 0.2,
                level: 0.1,
            },

            desirability_z_cap: 0.67,
            desirability_index_threshold: 50.0,
            desirability_raw_cutoff: 10,
            // Agreeableness shrinks hardest, emotional stability least.
            desirability_susceptibility: [0.3, 0.5, 0.3, 0.7, 0.1, 0.2],
        }
    }

    /// Shrinkage susceptibility for one dimension.
    pub fn susceptibility(&self, dim: TraitDimension) -> f64 {
        self.desirability_susceptibility[dim.index()]
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}
