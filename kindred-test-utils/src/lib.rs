//! KINDRED Test Utilities
//!
//! Centralized test infrastructure for the KINDRED workspace:
//! - A realistic fixture question bank covering every level and flag
//! - Scripted-session drivers and answer policies
//! - Proptest generators for the core types
//! - Workspace-level scenario tests exercising the whole engine

// Re-export the surface that fixture-driven tests touch most often
pub use kindred_core::{
    Archetype, ArchetypeCatalog, ArchetypeMatch, ArchetypePrototype, AssessmentResult,
    ConflictPosture, EngineConfig, EngineError, EngineResult, MotivationDirection, Question,
    QuestionCatalog, QuestionFlags, QuestionId, QuestionLevel, QuestionOption, RiskTolerance,
    SecondaryProfile, StatusOrientation, TraitConfidence, TraitDimension, TraitVector,
    DIMENSION_COUNT,
};
pub use kindred_matching::find_best_matches;
pub use kindred_scoring::TraitTracker;
pub use kindred_session::{AssessmentEngine, SessionPhase, SessionState};

// ============================================================================
// FIXTURE CATALOG
// ============================================================================

fn opt(value: i32, deltas: Vec<(TraitDimension, i32)>) -> QuestionOption {
    QuestionOption::new(value, deltas)
}

/// Four-option agree/disagree scale on one dimension.
fn scale(id: &str, level: QuestionLevel, dim: TraitDimension) -> Question {
    Question::new(
        id,
        level,
        vec![dim],
        vec![
            opt(1, vec![(dim, 3)]),
            opt(2, vec![(dim, 1)]),
            opt(3, vec![(dim, -1)]),
            opt(4, vec![(dim, -3)]),
        ],
    )
}

/// Three-option scenario item measuring a main dimension with a side
/// signal on a second one.
fn pair_core(id: &str, main: TraitDimension, side: TraitDimension) -> Question {
    Question::new(
        id,
        QuestionLevel::Core,
        vec![main, side],
        vec![
            opt(1, vec![(main, 2), (side, 1)]),
            opt(2, vec![(main, 1)]),
            opt(3, vec![(main, -2), (side, -1)]),
        ],
    )
}

/// A realistic bank: one anchor per dimension (one of them
/// reverse-keyed), twelve two-dimension core scenarios, a forced-choice
/// item, an attention check, four targeted precision items, and one
/// variant phrasing.
///
/// Ids are stable; scenario tests reference them directly.
pub fn fixture_catalog() -> QuestionCatalog {
    use TraitDimension as T;

    let mut questions = vec![
        scale("anchor_room_of_strangers", QuestionLevel::Anchor, T::SocialEnergy)
            .with_flags(QuestionFlags::ANCHOR)
            .with_discrimination(0.6),
        scale("anchor_untested_idea", QuestionLevel::Anchor, T::Openness)
            .with_flags(QuestionFlags::ANCHOR)
            .with_discrimination(0.6),
        scale("anchor_deadline_plan", QuestionLevel::Anchor, T::Conscientiousness)
            .with_flags(QuestionFlags::ANCHOR)
            .with_discrimination(0.6),
        scale("anchor_friend_dispute", QuestionLevel::Anchor, T::Agreeableness)
            .with_flags(QuestionFlags::ANCHOR)
            .with_discrimination(0.6),
        // Reverse-keyed: "I unravel when plans collapse". Deltas are
        // authored pre-inverted, so agreement scores downward.
        Question::new(
            "anchor_plans_collapse",
            QuestionLevel::Anchor,
            vec![T::EmotionalStability],
            vec![
                opt(1, vec![(T::EmotionalStability, -3)]),
                opt(2, vec![(T::EmotionalStability, -1)]),
                opt(3, vec![(T::EmotionalStability, 1)]),
                opt(4, vec![(T::EmotionalStability, 3)]),
            ],
        )
        .with_flags(QuestionFlags::ANCHOR | QuestionFlags::REVERSED)
        .with_discrimination(0.6),
        scale("anchor_group_decision", QuestionLevel::Anchor, T::Assertiveness)
            .with_flags(QuestionFlags::ANCHOR)
            .with_discrimination(0.6),
    ];

    questions.extend([
        pair_core("core_weekend_invite", T::SocialEnergy, T::Assertiveness),
        pair_core("core_new_restaurant", T::Openness, T::SocialEnergy),
        pair_core("core_project_kickoff", T::Conscientiousness, T::Assertiveness),
        pair_core("core_borrowed_money", T::Agreeableness, T::EmotionalStability),
        pair_core("core_last_minute_change", T::EmotionalStability, T::Openness),
        pair_core("core_meeting_pushback", T::Assertiveness, T::Agreeableness),
        pair_core("core_house_party", T::SocialEnergy, T::Agreeableness),
        pair_core("core_travel_planning", T::Conscientiousness, T::Openness),
        pair_core("core_criticism_response", T::EmotionalStability, T::Assertiveness),
        pair_core("core_volunteer_lead", T::Assertiveness, T::SocialEnergy),
        pair_core("core_messy_roommate", T::Conscientiousness, T::Agreeableness),
        pair_core("core_art_exhibit", T::Openness, T::Agreeableness),
    ]);

    // Forced choice: neither option dominates, separating two traits
    // that usually move together.
    questions.push(
        Question::new(
            "core_spotlight_or_support",
            QuestionLevel::Core,
            vec![T::SocialEnergy, T::Agreeableness],
            vec![
                opt(1, vec![(T::SocialEnergy, 2), (T::Assertiveness, 1)]),
                opt(2, vec![(T::Agreeableness, 2), (T::EmotionalStability, 1)]),
            ],
        )
        .with_flags(QuestionFlags::FORCED_CHOICE),
    );

    questions.push(
        Question::new(
            "check_reading",
            QuestionLevel::Core,
            vec![T::Conscientiousness],
            vec![opt(1, vec![]), opt(2, vec![]), opt(3, vec![])],
        )
        .with_flags(QuestionFlags::ATTENTION_CHECK)
        .with_correct_value(2),
    );

    questions.extend([
        Question::new(
            "precision_host_or_guest",
            QuestionLevel::Precision,
            vec![T::Assertiveness, T::Agreeableness],
            vec![
                opt(1, vec![(T::Assertiveness, 2), (T::Agreeableness, -1)]),
                opt(2, vec![(T::Agreeableness, 2), (T::Assertiveness, -1)]),
            ],
        )
        .with_discrimination(0.8)
        .with_target_pair(Archetype::Firestarter, Archetype::Connector),
        Question::new(
            "precision_share_or_shelve",
            QuestionLevel::Precision,
            vec![T::SocialEnergy],
            vec![
                opt(1, vec![(T::SocialEnergy, 2)]),
                opt(2, vec![(T::SocialEnergy, -2)]),
            ],
        )
        .with_discrimination(0.8)
        .with_target_pair(Archetype::Maven, Archetype::Curator),
        Question::new(
            "precision_rules_that_chafe",
            QuestionLevel::Precision,
            vec![T::Agreeableness, T::Conscientiousness],
            vec![
                opt(1, vec![(T::Agreeableness, 2), (T::Conscientiousness, 1)]),
                opt(2, vec![(T::Agreeableness, -2), (T::Conscientiousness, -1)]),
            ],
        )
        .with_discrimination(0.8)
        .with_target_pair(Archetype::Explorer, Archetype::Maverick),
        Question::new(
            "precision_lead_from_where",
            QuestionLevel::Precision,
            vec![T::SocialEnergy, T::Assertiveness],
            vec![
                opt(1, vec![(T::SocialEnergy, 2), (T::Assertiveness, 1)]),
                opt(2, vec![(T::SocialEnergy, -2)]),
            ],
        )
        .with_discrimination(0.8)
        .with_target_pair(Archetype::Strategist, Archetype::Captain),
    ]);

    questions.push(
        scale("core_weekend_invite_alt", QuestionLevel::Core, T::SocialEnergy)
            .with_variant_of("core_weekend_invite"),
    );

    QuestionCatalog::new(questions).expect("fixture catalog is valid")
}

/// Engine over the fixture bank and the standard archetype catalog.
pub fn fixture_engine() -> AssessmentEngine {
    AssessmentEngine::with_standard_catalogs(fixture_catalog()).expect("fixture engine builds")
}

// ============================================================================
// SCRIPTED SESSIONS
// ============================================================================

/// Drive a session to its adaptive stop, answering each selected question
/// through `choose`. Returns the final state and the ordered selections.
pub fn drive_session<F>(engine: &AssessmentEngine, mut choose: F) -> (SessionState, Vec<QuestionId>)
where
    F: FnMut(&Question) -> i32,
{
    let mut state = engine.start_session();
    let mut asked = Vec::new();
    while let Some(question) = engine.select_next_question(&state) {
        let value = choose(question);
        let id = question.id.clone();
        asked.push(id.clone());
        state = engine
            .process_answer(&state, &id, value)
            .expect("scripted answer is accepted");
    }
    (state, asked)
}

/// Policy that plays a persona leaning hard into the given dimensions:
/// picks the option contributing the most to them, first option on ties.
pub fn favor_dimensions(dims: &[TraitDimension]) -> impl FnMut(&Question) -> i32 + '_ {
    move |question| {
        let mut best = (question.options[0].value, i32::MIN);
        for option in &question.options {
            let gain: i32 = option
                .deltas
                .iter()
                .filter(|(dim, _)| dims.contains(dim))
                .map(|&(_, delta)| delta)
                .sum();
            if gain > best.1 {
                best = (option.value, gain);
            }
        }
        best.0
    }
}

/// Policy that disclaims everything: picks the option with the lowest
/// total delta, first option on ties.
pub fn disclaim_everything() -> impl FnMut(&Question) -> i32 {
    |question| {
        let mut best = (question.options[0].value, i32::MAX);
        for option in &question.options {
            let total: i32 = option.deltas.iter().map(|&(_, delta)| delta).sum();
            if total < best.1 {
                best = (option.value, total);
            }
        }
        best.0
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for the core value types.

    use super::*;
    use proptest::prelude::*;

    /// Generate a dimension.
    pub fn arb_trait_dimension() -> impl Strategy<Value = TraitDimension> {
        proptest::sample::select(TraitDimension::ALL.to_vec())
    }

    /// Generate a full in-range trait vector.
    pub fn arb_trait_vector() -> impl Strategy<Value = TraitVector> {
        proptest::array::uniform6(0.0f64..=100.0).prop_map(TraitVector::from_scores)
    }

    /// Generate an archetype.
    pub fn arb_archetype() -> impl Strategy<Value = Archetype> {
        proptest::sample::select(Archetype::ALL.to_vec())
    }

    /// Generate a secondary behavioral profile.
    pub fn arb_secondary_profile() -> impl Strategy<Value = SecondaryProfile> {
        (
            proptest::sample::select(vec![
                MotivationDirection::Approach,
                MotivationDirection::Avoidance,
            ]),
            proptest::sample::select(vec![
                ConflictPosture::Direct,
                ConflictPosture::Mediating,
                ConflictPosture::Accommodating,
                ConflictPosture::Avoiding,
            ]),
            proptest::sample::select(vec![
                RiskTolerance::High,
                RiskTolerance::Moderate,
                RiskTolerance::Low,
            ]),
            proptest::sample::select(vec![
                StatusOrientation::Seeking,
                StatusOrientation::Neutral,
                StatusOrientation::Indifferent,
            ]),
        )
            .prop_map(|(motivation, conflict, risk, status)| SecondaryProfile {
                motivation,
                conflict,
                risk,
                status,
            })
    }

    /// Generate a plausible question id.
    pub fn arb_question_id() -> impl Strategy<Value = QuestionId> {
        "[a-z][a-z_]{3,15}".prop_map(QuestionId::from)
    }
}

// ============================================================================
// SCENARIO TESTS
// ============================================================================
