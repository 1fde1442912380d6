//! Stopping rule
//!
//! Decides when a session has gathered enough evidence for a forced
//! single-label call. Below the minimum question count the rule never
//! fires, whatever the confidences look like: lucky early answers must not
//! end a session.

use kindred_core::{is_confusable_pair, ArchetypeMatch, EngineConfig};
use kindred_scoring::TraitTracker;

/// True when the top-2 candidates are close in confidence and form a pair
/// known to be empirically hard to separate. Such pairs deserve the
/// elevated confidence threshold before committing.
pub(crate) fn confusable_pair_risk(matches: &[ArchetypeMatch], config: &EngineConfig) -> bool {
    let [first, second, ..] = matches else {
        return false;
    };
    first.confidence - second.confidence <= config.confusable_risk_gap
        && is_confusable_pair(first.archetype, second.archetype)
}

/// The confidence bar currently in force.
pub(crate) fn required_threshold(matches: &[ArchetypeMatch], config: &EngineConfig) -> f64 {
    if confusable_pair_risk(matches, config) {
        config.confusable_confidence_threshold
    } else {
        config.confidence_threshold
    }
}

/// Evaluate the stopping rule against the current evidence.
pub(crate) fn should_stop(
    answered: u32,
    tracker: &TraitTracker,
    matches: &[ArchetypeMatch],
    config: &EngineConfig,
) -> bool {
    if answered >= config.hard_cap {
        return true;
    }
    if answered < config.min_questions {
        return false;
    }

    let threshold = required_threshold(matches, config);
    let avg = tracker.average_confidence();
    let min = tracker.min_confidence();
    let top_confidence = matches.first().map(|m| m.confidence).unwrap_or(0.0);
    let top_gap = match matches {
        [first, second, ..] => first.confidence - second.confidence,
        _ => 0.0,
    };

    // Soft cap: good average evidence is enough.
    if answered >= config.soft_cap && avg >= threshold && min >= 0.8 * threshold {
        return true;
    }

    // Past the soft cap plus grace: clear relative separation matters more
    // than marginal absolute confidence for a forced single-label call.
    if answered >= config.gap_stop_cap && top_gap > config.high_confidence_gap {
        return true;
    }

    // Early stop: everything clears the bar and no lookalike ambiguity.
    answered >= config.min_questions
        && avg >= threshold
        && min >= threshold
        && top_confidence >= threshold
        && !confusable_pair_risk(matches, config)
}
