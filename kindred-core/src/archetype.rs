//! Archetype catalog: the twelve reference personality classes

use crate::traits::{TraitDimension, TraitVector};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// ============================================================================
// ARCHETYPE ENUM
// ============================================================================

/// One of the twelve personality archetypes.
///
/// A closed set, not an open registry: code that branches on archetype
/// identity gets exhaustiveness checking from the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// High-energy spark who lifts a room
    Firestarter,
    /// Warm social hub who introduces everyone to everyone
    Connector,
    /// Novelty-chaser drawn to the unfamiliar
    Explorer,
    /// Steady, dependable presence others organize around
    Anchor,
    /// Deliberate planner who thinks three steps ahead
    Strategist,
    /// Enthusiast who collects and shares expertise
    Maven,
    /// Peacekeeper who keeps groups comfortable
    Harmonizer,
    /// Independent contrarian who rejects the default plan
    Maverick,
    /// Selective aesthete who prefers small, considered gatherings
    Curator,
    /// Natural organizer who takes charge of the outing
    Captain,
    /// Imaginative introvert with a rich inner world
    Dreamer,
    /// Cautious guardian who notices what could go wrong
    Sentinel,
}

impl Archetype {
    /// All archetypes in catalog order.
    pub const ALL: [Archetype; 12] = [
        Archetype::Firestarter,
        Archetype::Connector,
        Archetype::Explorer,
        Archetype::Anchor,
        Archetype::Strategist,
        Archetype::Maven,
        Archetype::Harmonizer,
        Archetype::Maverick,
        Archetype::Curator,
        Archetype::Captain,
        Archetype::Dreamer,
        Archetype::Sentinel,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Archetype::Firestarter => "Firestarter",
            Archetype::Connector => "Connector",
            Archetype::Explorer => "Explorer",
            Archetype::Anchor => "Anchor",
            Archetype::Strategist => "Strategist",
            Archetype::Maven => "Maven",
            Archetype::Harmonizer => "Harmonizer",
            Archetype::Maverick => "Maverick",
            Archetype::Curator => "Curator",
            Archetype::Captain => "Captain",
            Archetype::Dreamer => "Dreamer",
            Archetype::Sentinel => "Sentinel",
        }
    }
}

// ============================================================================
// SECONDARY DIFFERENTIATORS
// ============================================================================

/// Whether a person moves toward reward or away from risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotivationDirection {
    Approach,
    Avoidance,
}

/// How a person handles interpersonal friction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictPosture {
    Direct,
    Mediating,
    Accommodating,
    Avoiding,
}

/// Appetite for uncertain outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTolerance {
    High,
    Moderate,
    Low,
}

/// How much social standing matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusOrientation {
    Seeking,
    Neutral,
    Indifferent,
}

/// Categorical qualitative differentiators. Used only as tie-break signal
/// and for the small secondary-match bonus, never as primary scoring input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryProfile {
    pub motivation: MotivationDirection,
    pub conflict: ConflictPosture,
    pub risk: RiskTolerance,
    pub status: StatusOrientation,
}

impl SecondaryProfile {
    /// Count of fields matching another profile.
    pub fn matches(&self, other: &SecondaryProfile) -> u32 {
        let mut n = 0;
        if self.motivation == other.motivation {
            n += 1;
        }
        if self.conflict == other.conflict {
            n += 1;
        }
        if self.risk == other.risk {
            n += 1;
        }
        if self.status == other.status {
            n += 1;
        }
        n
    }
}

// ============================================================================
// PROTOTYPES
// ============================================================================

/// The "ideal member" definition of an archetype: a full reference trait
/// vector plus the qualitative metadata that separates lookalikes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypePrototype {
    pub archetype: Archetype,
    /// Reference trait vector for the ideal member of this class
    pub traits: TraitVector,
    /// Typical social-energy output, 0-100. Metadata for consumers;
    /// matching uses the trait vector only.
    pub energy_level: f64,
    /// Qualitative differentiators, tie-break signal only
    pub secondary: SecondaryProfile,
    /// Archetypes this one is most often mistaken for
    pub confusable_with: Vec<Archetype>,
    /// The 1-3 dimensions that most strongly distinguish this archetype.
    /// Weighted 1.5x in similarity and checked for overshoot.
    pub signal_traits: Vec<TraitDimension>,
    /// Minimum match confidence at which this archetype is accepted as a
    /// final call. Harder-to-isolate archetypes get a lower bar.
    pub acceptance_threshold: f64,
}

/// Unordered archetype pairs that are empirically hard to separate.
/// When the top-2 candidates form one of these pairs, the stopping rule
/// demands the elevated confidence threshold before committing.
pub const CONFUSABLE_PAIRS: [(Archetype, Archetype); 7] = [
    (Archetype::Firestarter, Archetype::Connector),
    (Archetype::Maven, Archetype::Curator),
    (Archetype::Anchor, Archetype::Sentinel),
    (Archetype::Explorer, Archetype::Maverick),
    (Archetype::Strategist, Archetype::Captain),
    (Archetype::Connector, Archetype::Harmonizer),
    (Archetype::Explorer, Archetype::Dreamer),
];

/// Whether two archetypes form a known-confusable pair, in either order.
pub fn is_confusable_pair(a: Archetype, b: Archetype) -> bool {
    CONFUSABLE_PAIRS
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

// ============================================================================
// CATALOG
// ============================================================================

/// Immutable catalog of archetype prototypes, injected at engine
/// construction. Tests may build reduced catalogs; production uses
/// [`ArchetypeCatalog::standard`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeCatalog {
    prototypes: Vec<ArchetypePrototype>,
}

impl ArchetypeCatalog {
    /// Build a catalog from explicit prototypes.
    pub fn new(prototypes: Vec<ArchetypePrototype>) -> Self {
        Self { prototypes }
    }

    /// The fixed production catalog of all twelve prototypes.
    pub fn standard() -> &'static ArchetypeCatalog {
        &STANDARD_CATALOG
    }

    /// All prototypes in catalog order.
    pub fn prototypes(&self) -> &[ArchetypePrototype] {
        &self.prototypes
    }

    /// Prototype for a specific archetype, if present in this catalog.
    pub fn prototype(&self, archetype: Archetype) -> Option<&ArchetypePrototype> {
        self.prototypes.iter().find(|p| p.archetype == archetype)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

static STANDARD_CATALOG: Lazy<ArchetypeCatalog> = Lazy::new(build_standard_catalog);

fn proto(
    archetype: Archetype,
    scores: [f64; 6],
    energy_level: f64,
    secondary: SecondaryProfile,
    confusable_with: Vec<Archetype>,
    signal_traits: Vec<TraitDimension>,
    acceptance_threshold: f64,
) -> ArchetypePrototype {
    ArchetypePrototype {
        archetype,
        traits: TraitVector::from_scores(scores),
        energy_level,
        secondary,
        confusable_with,
        signal_traits,
        acceptance_threshold,
    }
}

// Reference vectors are in canonical dimension order:
// [social energy, openness, conscientiousness, agreeableness,
//  emotional stability, assertiveness]
fn build_standard_catalog() -> ArchetypeCatalog {
    use Archetype::*;
    use ConflictPosture as C;
    use MotivationDirection as M;
    use RiskTolerance as R;
    use StatusOrientation as S;
    use TraitDimension as T;

    let sec = |motivation, conflict, risk, status| SecondaryProfile {
        motivation,
        conflict,
        risk,
        status,
    };

    ArchetypeCatalog::new(vec![
        proto(
            Firestarter,
            [92.0, 75.0, 40.0, 60.0, 65.0, 80.0],
            95.0,
            sec(M::Approach, C::Direct, R::High, S::Seeking),
            vec![Connector, Maverick],
            vec![T::SocialEnergy, T::Assertiveness],
            0.72,
        ),
        proto(
            Connector,
            [85.0, 65.0, 55.0, 85.0, 70.0, 60.0],
            80.0,
            sec(M::Approach, C::Mediating, R::Moderate, S::Neutral),
            vec![Firestarter, Harmonizer],
            vec![T::SocialEnergy, T::Agreeableness],
            0.70,
        ),
        proto(
            Explorer,
            [70.0, 92.0, 35.0, 60.0, 70.0, 65.0],
            78.0,
            sec(M::Approach, C::Avoiding, R::High, S::Indifferent),
            vec![Dreamer, Maverick],
            vec![T::Openness],
            0.72,
        ),
        proto(
            Anchor,
            [45.0, 40.0, 80.0, 75.0, 85.0, 40.0],
            35.0,
            sec(M::Avoidance, C::Accommodating, R::Low, S::Indifferent),
            vec![Sentinel, Harmonizer],
            vec![T::EmotionalStability, T::Conscientiousness],
            0.70,
        ),
        proto(
            Strategist,
            [40.0, 60.0, 92.0, 45.0, 70.0, 70.0],
            45.0,
            sec(M::Approach, C::Direct, R::Low, S::Neutral),
            vec![Captain, Curator],
            vec![T::Conscientiousness],
            0.72,
        ),
        proto(
            Maven,
            [55.0, 80.0, 70.0, 55.0, 65.0, 55.0],
            55.0,
            sec(M::Approach, C::Mediating, R::Moderate, S::Seeking),
            vec![Curator, Explorer],
            vec![T::Openness, T::Conscientiousness],
            0.68,
        ),
        proto(
            Harmonizer,
            [60.0, 55.0, 60.0, 92.0, 75.0, 30.0],
            55.0,
            sec(M::Avoidance, C::Accommodating, R::Low, S::Indifferent),
            vec![Connector, Anchor],
            vec![T::Agreeableness],
            0.70,
        ),
        proto(
            Maverick,
            [65.0, 78.0, 30.0, 35.0, 60.0, 85.0],
            80.0,
            sec(M::Approach, C::Direct, R::High, S::Seeking),
            vec![Firestarter, Explorer],
            vec![T::Assertiveness, T::Openness],
            0.72,
        ),
        proto(
            Curator,
            [35.0, 72.0, 75.0, 55.0, 70.0, 45.0],
            35.0,
            sec(M::Avoidance, C::Avoiding, R::Low, S::Indifferent),
            vec![Maven, Strategist],
            vec![T::Openness, T::Conscientiousness],
            0.68,
        ),
        proto(
            Captain,
            [75.0, 50.0, 85.0, 55.0, 75.0, 90.0],
            75.0,
            sec(M::Approach, C::Direct, R::Moderate, S::Seeking),
            vec![Strategist, Firestarter],
            vec![T::Assertiveness, T::Conscientiousness],
            0.72,
        ),
        proto(
            Dreamer,
            [30.0, 88.0, 40.0, 70.0, 55.0, 30.0],
            30.0,
            sec(M::Avoidance, C::Avoiding, R::Moderate, S::Indifferent),
            vec![Explorer, Curator],
            vec![T::Openness],
            0.68,
        ),
        proto(
            Sentinel,
            [35.0, 30.0, 78.0, 60.0, 88.0, 50.0],
            30.0,
            sec(M::Avoidance, C::Accommodating, R::Low, S::Neutral),
            vec![Anchor, Strategist],
            vec![T::EmotionalStability],
            0.70,
        ),
    ])
}
