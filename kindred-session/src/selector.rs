//! Adaptive question selection
//!
//! Anchor questions run first regardless of current confidence, to
//! establish a rough profile before refinement. After the quota, every
//! eligible question is scored by a weighted utility and the best one wins.

use crate::state::SessionState;
use crate::stopping;
use kindred_core::{
    ArchetypeCatalog, ArchetypeMatch, EngineConfig, Question, QuestionCatalog, QuestionId,
    QuestionLevel,
};
use kindred_scoring::TraitTracker;
use std::collections::BTreeSet;

/// Question ids barred through the variant relation: answering or skipping
/// a question also bars its alternate phrasings, in both directions.
fn variant_barred(catalog: &QuestionCatalog, state: &SessionState) -> BTreeSet<QuestionId> {
    let mut barred = BTreeSet::new();
    for q in catalog.questions() {
        if let Some(primary) = &q.variant_of {
            if state.has_seen(&q.id) {
                barred.insert(primary.clone());
            }
            if state.has_seen(primary) {
                barred.insert(q.id.clone());
            }
        }
    }
    barred
}

/// All questions still offerable in this session, in catalog order.
pub(crate) fn eligible<'a>(
    catalog: &'a QuestionCatalog,
    state: &SessionState,
) -> Vec<&'a Question> {
    let barred = variant_barred(catalog, state);
    catalog
        .questions()
        .iter()
        .filter(|q| !state.has_seen(&q.id) && !barred.contains(&q.id))
        .collect()
}

/// Anchor questions already answered or skipped.
pub(crate) fn anchors_seen(catalog: &QuestionCatalog, state: &SessionState) -> u32 {
    catalog.anchors().filter(|q| state.has_seen(&q.id)).count() as u32
}

/// Weighted utility of asking this question now.
pub(crate) fn utility(
    question: &Question,
    tracker: &TraitTracker,
    matches: &[ArchetypeMatch],
    archetypes: &ArchetypeCatalog,
    config: &EngineConfig,
) -> f64 {
    let weights = &config.utility_weights;

    // Information gain: questions targeting under-measured dimensions
    // score higher.
    let info: f64 = question
        .primary_dimensions
        .iter()
        .map(|&dim| 1.0 - tracker.confidence(dim))
        .sum::<f64>()
        / question.primary_dimensions.len() as f64;

    // Discrimination: how much this question would separate the two
    // leading candidates. An item purpose-built for exactly the current
    // top pair maxes the term outright.
    let discrimination = match matches {
        [first, second, ..] => {
            let pair = (first.archetype, second.archetype);
            let targeted = question
                .target_pair
                .map(|(a, b)| (a, b) == pair || (b, a) == pair)
                .unwrap_or(false);
            if targeted {
                1.0
            } else {
                match (
                    archetypes.prototype(first.archetype),
                    archetypes.prototype(second.archetype),
                ) {
                    (Some(a), Some(b)) => {
                        question
                            .primary_dimensions
                            .iter()
                            .map(|&dim| (a.traits.get(dim) - b.traits.get(dim)).abs() / 100.0)
                            .sum::<f64>()
                            / question.primary_dimensions.len() as f64
                    }
                    _ => 0.0,
                }
            }
        }
        _ => 0.0,
    };

    // Level term biases toward fine-grained questions later in a session.
    let level = match question.level {
        QuestionLevel::Precision => 1.0,
        QuestionLevel::Core => 0.5,
        QuestionLevel::Anchor => 0.0,
    };

    weights.information_gain * info
        + weights.discrimination * discrimination
        + weights.intrinsic * question.discrimination_or_default()
        + weights.level * level
}

/// Best eligible question from a candidate list, first-in-catalog-order on
/// exact utility ties.
fn best_by_utility<'a>(
    candidates: &[&'a Question],
    tracker: &TraitTracker,
    matches: &[ArchetypeMatch],
    archetypes: &ArchetypeCatalog,
    config: &EngineConfig,
) -> Option<&'a Question> {
    let mut best: Option<(&Question, f64)> = None;
    for &q in candidates {
        let score = utility(q, tracker, matches, archetypes, config);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((q, score)),
        }
    }
    best.map(|(q, _)| q)
}

/// Choose the next question to ask, or `None` to stop.
pub(crate) fn select_next<'a>(
    catalog: &'a QuestionCatalog,
    archetypes: &ArchetypeCatalog,
    state: &SessionState,
    config: &EngineConfig,
) -> Option<&'a Question> {
    if state.is_terminated() {
        return None;
    }

    let remaining = eligible(catalog, state);

    // Anchor phase: broad items in catalog order until the quota is met
    // or the anchor pool runs dry.
    if anchors_seen(catalog, state) < config.anchor_quota {
        if let Some(q) = remaining.iter().find(|q| q.is_anchor()) {
            return Some(q);
        }
    }

    if stopping::should_stop(
        state.answered_count(),
        state.tracker(),
        state.matches(),
        config,
    ) {
        return None;
    }

    best_by_utility(&remaining, state.tracker(), state.matches(), archetypes, config)
}

/// Replacement after a skip: prefer a same-level question, falling back to
/// the normal utility-ranked selection.
pub(crate) fn select_replacement<'a>(
    catalog: &'a QuestionCatalog,
    archetypes: &ArchetypeCatalog,
    state: &SessionState,
    level: QuestionLevel,
    config: &EngineConfig,
) -> Option<&'a Question> {
    let remaining = eligible(catalog, state);
    let same_level: Vec<&Question> = remaining
        .iter()
        .copied()
        .filter(|q| q.level == level)
        .collect();
    if !same_level.is_empty() {
        return best_by_utility(
            &same_level,
            state.tracker(),
            state.matches(),
            archetypes,
            config,
        );
    }
    select_next(catalog, archetypes, state, config)
}
