//! Match records produced by the matching engine

use crate::archetype::Archetype;
use crate::traits::TraitDimension;
use serde::{Deserialize, Serialize};

/// A signal trait on which the user overshot the prototype by more than
/// the configured sigma threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitOvershoot {
    pub dimension: TraitDimension,
    /// Excess over the prototype score, in sigma units
    pub excess_sigma: f64,
    /// Human-readable interpretation for the host UI
    pub interpretation: String,
}

/// A confusable prototype listed alongside a match, annotated with the
/// dimensions both archetypes score high on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarPrototype {
    pub archetype: Archetype,
    pub shared_high_dimensions: Vec<TraitDimension>,
}

/// Why a match scored the way it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MatchExplanation {
    /// Signal traits where the user sits close to the prototype
    pub driving_traits: Vec<TraitDimension>,
    /// Signal traits exceeding the overshoot threshold
    pub overshoots: Vec<TraitOvershoot>,
    /// Up to 2 commonly confused prototypes
    pub similar: Vec<SimilarPrototype>,
}

/// One ranked archetype candidate. Recomputed in full on every pass from
/// the complete current trait vector; never mutated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeMatch {
    pub archetype: Archetype,
    /// Match score, 0-100
    pub score: f64,
    /// Calibrated confidence, [0,1]
    pub confidence: f64,
    pub explanation: MatchExplanation,
}
