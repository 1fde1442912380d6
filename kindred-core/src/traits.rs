//! Trait model: the six scored personality dimensions

use serde::{Deserialize, Serialize};

/// Number of trait dimensions. Fixed; every vector in the engine is dense.
pub const DIMENSION_COUNT: usize = 6;

/// One of the six fixed personality axes.
///
/// Dimensions are independent: nothing in the engine derives one from
/// another, and confidence on a dimension comes only from answers that
/// touched that dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitDimension {
    /// Appetite for social stimulation and group settings
    SocialEnergy,
    /// Draw toward novelty, ideas, and unfamiliar experiences
    Openness,
    /// Planning, follow-through, and preference for structure
    Conscientiousness,
    /// Warmth, cooperation, and accommodation of others
    Agreeableness,
    /// Evenness under stress and recovery from setbacks
    EmotionalStability,
    /// Willingness to take charge and push a point
    Assertiveness,
}

impl TraitDimension {
    /// All dimensions in canonical order. Vector storage is indexed by this.
    pub const ALL: [TraitDimension; DIMENSION_COUNT] = [
        TraitDimension::SocialEnergy,
        TraitDimension::Openness,
        TraitDimension::Conscientiousness,
        TraitDimension::Agreeableness,
        TraitDimension::EmotionalStability,
        TraitDimension::Assertiveness,
    ];

    /// Canonical storage index for this dimension.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label for explanations.
    pub fn label(self) -> &'static str {
        match self {
            TraitDimension::SocialEnergy => "social energy",
            TraitDimension::Openness => "openness",
            TraitDimension::Conscientiousness => "conscientiousness",
            TraitDimension::Agreeableness => "agreeableness",
            TraitDimension::EmotionalStability => "emotional stability",
            TraitDimension::Assertiveness => "assertiveness",
        }
    }

    /// Whether this axis is empirically prone to social-desirability
    /// inflation. Drives the finalization-time bias corrections.
    pub const fn desirability_prone(self) -> bool {
        matches!(
            self,
            TraitDimension::Agreeableness | TraitDimension::Openness
        )
    }
}

/// Dense trait vector: one score per dimension, nominal range 0-100,
/// center 50. Stored in `TraitDimension::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitVector([f64; DIMENSION_COUNT]);

impl TraitVector {
    /// All dimensions at the neutral center (50).
    pub fn neutral() -> Self {
        Self([50.0; DIMENSION_COUNT])
    }

    /// All dimensions at zero. Used for degenerate-profile tests.
    pub fn zeroed() -> Self {
        Self([0.0; DIMENSION_COUNT])
    }

    /// Build from raw per-dimension scores in canonical order.
    pub fn from_scores(scores: [f64; DIMENSION_COUNT]) -> Self {
        Self(scores)
    }

    /// Score for a dimension.
    pub fn get(&self, dim: TraitDimension) -> f64 {
        self.0[dim.index()]
    }

    /// Set a dimension's score.
    pub fn set(&mut self, dim: TraitDimension, score: f64) {
        self.0[dim.index()] = score;
    }

    /// Copy with one dimension replaced.
    pub fn with(mut self, dim: TraitDimension, score: f64) -> Self {
        self.set(dim, score);
        self
    }

    /// Scores in canonical order.
    pub fn scores(&self) -> &[f64; DIMENSION_COUNT] {
        &self.0
    }

    /// Iterate (dimension, score) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (TraitDimension, f64)> + '_ {
        TraitDimension::ALL.iter().map(move |&d| (d, self.get(d)))
    }
}

impl Default for TraitVector {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Per-dimension evidence summary: normalized score, confidence in [0,1],
/// and how many answers touched the dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitConfidence {
    /// Normalized 0-100 score
    pub score: f64,
    /// Confidence in [0,1], saturating with sample count
    pub confidence: f64,
    /// Number of answers that carried a non-zero delta on this dimension
    pub samples: u32,
}

impl Default for TraitConfidence {
    fn default() -> Self {
        Self {
            score: 50.0,
            confidence: 0.0,
            samples: 0,
        }
    }
}
