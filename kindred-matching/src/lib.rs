//! KINDRED Matching - Archetype Ranking
//!
//! Scores a trait vector against every archetype prototype with a weighted,
//! overshoot-penalized cosine similarity, then ranks candidates with
//! calibrated confidence and explanatory detail. Every pass recomputes from
//! the complete current vector; nothing is cached between calls.

use kindred_core::{
    Archetype, ArchetypeCatalog, ArchetypeMatch, ArchetypePrototype, EngineConfig,
    MatchExplanation, SecondaryProfile, SimilarPrototype, TraitDimension, TraitOvershoot,
    TraitVector,
};

/// Scores at or above this are "high" for shared-dimension annotations.
const HIGH_VALUE_SCORE: f64 = 70.0;

/// A signal trait within this distance of the prototype counts as driving
/// the match.
const DRIVING_TRAIT_DISTANCE: f64 = 10.0;

/// Final scores within this many points are re-ranked by the secondary
/// tie-break pass.
const TIE_EPSILON: f64 = 0.5;

// ============================================================================
// PUBLIC ENTRY
// ============================================================================

/// Rank all archetypes against the current trait vector, best first.
///
/// `secondary` categorical data is optional; when present it adds a small
/// flat bonus per matching field and powers the tie-break pass. Returns at
/// most `top_n` matches.
pub fn find_best_matches(
    traits: &TraitVector,
    secondary: Option<&SecondaryProfile>,
    top_n: usize,
    catalog: &ArchetypeCatalog,
    config: &EngineConfig,
) -> Vec<ArchetypeMatch> {
    let mut scored: Vec<(f64, &ArchetypePrototype)> = catalog
        .prototypes()
        .iter()
        .map(|proto| (raw_score(traits, secondary, proto, config), proto))
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    break_ties(&mut scored, secondary);

    let runner_up_score = scored.get(1).map(|&(s, _)| s).unwrap_or(0.0);
    scored
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(rank, (score, proto))| {
            let confidence = if rank == 0 {
                top_confidence(score, runner_up_score, traits, proto, config)
            } else {
                // Lower ranks never claim more confidence than 0.8x their
                // own (0-1) score.
                0.8 * score / 100.0
            };
            ArchetypeMatch {
                archetype: proto.archetype,
                score,
                confidence,
                explanation: explain(traits, proto, catalog, config),
            }
        })
        .collect()
}

// ============================================================================
// SIMILARITY
// ============================================================================

/// Penalized, bonused similarity on the 0-100 scale.
fn raw_score(
    traits: &TraitVector,
    secondary: Option<&SecondaryProfile>,
    proto: &ArchetypePrototype,
    config: &EngineConfig,
) -> f64 {
    let similarity = weighted_cosine(traits, proto, config);
    let penalty = overshoot_penalty(traits, proto, config);
    let bonus = secondary
        .map(|s| f64::from(s.matches(&proto.secondary)) * config.secondary_field_bonus)
        .unwrap_or(0.0);
    ((similarity * penalty + bonus) * 100.0).clamp(0.0, 100.0)
}

/// Cosine similarity between the weight-scaled user and prototype vectors,
/// each dimension first normalized to [0,1]. Signal traits carry the
/// configured extra weight. A zero-magnitude side yields 0 rather than a
/// division error: an all-zero profile is a valid degenerate state.
fn weighted_cosine(traits: &TraitVector, proto: &ArchetypePrototype, config: &EngineConfig) -> f64 {
    let mut dot = 0.0;
    let mut user_norm = 0.0;
    let mut proto_norm = 0.0;
    for dim in TraitDimension::ALL {
        let weight = if proto.signal_traits.contains(&dim) {
            config.signal_trait_weight
        } else {
            1.0
        };
        let u = weight * traits.get(dim) / 100.0;
        let p = weight * proto.traits.get(dim) / 100.0;
        dot += u * p;
        user_norm += u * u;
        proto_norm += p * p;
    }
    if user_norm == 0.0 || proto_norm == 0.0 {
        return 0.0;
    }
    dot / (user_norm.sqrt() * proto_norm.sqrt())
}

/// Multiplicative dampening for users dramatically more extreme than the
/// prototype on its own signature traits. Such users usually belong to a
/// different, more extreme archetype being miscounted, and the nonlinear
/// score rescaling would otherwise run away with the similarity term.
fn overshoot_penalty(
    traits: &TraitVector,
    proto: &ArchetypePrototype,
    config: &EngineConfig,
) -> f64 {
    let mut penalty = 1.0;
    for &dim in &proto.signal_traits {
        let excess = (traits.get(dim) - proto.traits.get(dim)) / config.population_sigma;
        if excess > config.overshoot_threshold {
            penalty *= 1.0
                / (1.0 + config.overshoot_penalty_coeff * (excess - config.overshoot_threshold));
        }
    }
    penalty
}

// ============================================================================
// CONFIDENCE
// ============================================================================

/// How close the user sits to the prototype on its signal traits, as the
/// inverse of mean absolute difference on the 0-1 scale.
fn signal_alignment(traits: &TraitVector, proto: &ArchetypePrototype) -> f64 {
    if proto.signal_traits.is_empty() {
        return 0.0;
    }
    let total: f64 = proto
        .signal_traits
        .iter()
        .map(|&dim| 1.0 - (traits.get(dim) - proto.traits.get(dim)).abs() / 100.0)
        .sum();
    total / proto.signal_traits.len() as f64
}

/// Top-rank confidence: at least 0.8 only when the winner is both clearly
/// separated from the runner-up and well aligned on its signal traits.
/// Otherwise it degrades toward 0.5 plus a fraction of the gap, with the
/// absolute match quality deciding how far below 0.8 it lands (cosine
/// scores cluster high, so the gap alone would under-report a strong fit).
fn top_confidence(
    score: f64,
    runner_up: f64,
    traits: &TraitVector,
    proto: &ArchetypePrototype,
    config: &EngineConfig,
) -> f64 {
    let gap = (score - runner_up) / 100.0;
    let alignment = signal_alignment(traits, proto);
    if gap >= config.high_confidence_gap && alignment >= config.high_confidence_alignment {
        (0.8 + 0.5 * (gap - config.high_confidence_gap)
            + 0.2 * (alignment - config.high_confidence_alignment))
            .min(0.95)
    } else {
        (0.5 + 0.25 * score / 100.0 + 0.5 * gap).min(0.79)
    }
}

// ============================================================================
// TIE-BREAK
// ============================================================================

/// Secondary-field points for the tie-break pass. Motivation direction and
/// conflict posture separate lookalike pairs better than the risk and
/// status fields, so they weigh more.
fn tie_break_points(proto: &SecondaryProfile, user: &SecondaryProfile) -> f64 {
    let mut points = 0.0;
    if proto.motivation == user.motivation {
        points += 3.0;
    }
    if proto.conflict == user.conflict {
        points += 3.0;
    }
    if proto.risk == user.risk {
        points += 2.0;
    }
    if proto.status == user.status {
        points += 2.0;
    }
    points
}

/// Re-rank candidates whose final scores are within noise of the leader by
/// adding (not replacing) the weighted secondary match count. The six
/// continuous dimensions alone cannot separate certain archetype pairs
/// that differ only in qualitative orientation. Adjusted scores stay on
/// the 0-100 scale; near-saturated candidates saturate instead of
/// overflowing it.
fn break_ties(scored: &mut [(f64, &ArchetypePrototype)], secondary: Option<&SecondaryProfile>) {
    let Some(user) = secondary else {
        return;
    };
    let Some(&(top_score, _)) = scored.first() else {
        return;
    };
    let tied = scored
        .iter()
        .take_while(|&&(s, _)| top_score - s <= TIE_EPSILON)
        .count();
    if tied < 2 {
        return;
    }
    for entry in scored[..tied].iter_mut() {
        entry.0 = (entry.0 + tie_break_points(&entry.1.secondary, user)).min(100.0);
    }
    scored[..tied].sort_by(|a, b| b.0.total_cmp(&a.0));
}

// ============================================================================
// EXPLANATIONS
// ============================================================================

fn explain(
    traits: &TraitVector,
    proto: &ArchetypePrototype,
    catalog: &ArchetypeCatalog,
    config: &EngineConfig,
) -> MatchExplanation {
    let driving_traits = proto
        .signal_traits
        .iter()
        .copied()
        .filter(|&dim| (traits.get(dim) - proto.traits.get(dim)).abs() <= DRIVING_TRAIT_DISTANCE)
        .collect();

    let overshoots = proto
        .signal_traits
        .iter()
        .filter_map(|&dim| {
            let excess = (traits.get(dim) - proto.traits.get(dim)) / config.population_sigma;
            (excess > config.overshoot_threshold).then(|| TraitOvershoot {
                dimension: dim,
                excess_sigma: excess,
                interpretation: format!(
                    "scores much higher on {} than a typical {}; a more extreme type may fit better",
                    dim.label(),
                    proto.archetype.name(),
                ),
            })
        })
        .collect();

    let similar = proto
        .confusable_with
        .iter()
        .take(2)
        .filter_map(|&other| catalog.prototype(other))
        .map(|other_proto| SimilarPrototype {
            archetype: other_proto.archetype,
            shared_high_dimensions: TraitDimension::ALL
                .iter()
                .copied()
                .filter(|&dim| {
                    proto.traits.get(dim) >= HIGH_VALUE_SCORE
                        && other_proto.traits.get(dim) >= HIGH_VALUE_SCORE
                })
                .collect(),
        })
        .collect();

    MatchExplanation {
        driving_traits,
        overshoots,
        similar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_core::{ConflictPosture, MotivationDirection, RiskTolerance, StatusOrientation};
    use proptest::prelude::*;

    fn cfg() -> EngineConfig {
        EngineConfig::standard()
    }

    fn catalog() -> &'static ArchetypeCatalog {
        ArchetypeCatalog::standard()
    }

    #[test]
    fn prototype_vector_matches_itself_best() {
        let config = cfg();
        for proto in catalog().prototypes() {
            let matches = find_best_matches(&proto.traits, None, 3, catalog(), &config);
            assert_eq!(
                matches[0].archetype, proto.archetype,
                "self-match failed for {:?}",
                proto.archetype
            );
        }
    }

    #[test]
    fn degenerate_all_zero_profile_scores_zero_everywhere() {
        let matches = find_best_matches(&TraitVector::zeroed(), None, 12, catalog(), &cfg());
        assert_eq!(matches.len(), 12);
        for m in &matches {
            assert_eq!(m.score, 0.0);
        }
    }

    #[test]
    fn overshoot_penalty_engages_past_threshold() {
        let config = cfg();
        let sentinel = catalog().prototype(Archetype::Sentinel).unwrap();
        // Sentinel's signal trait is emotional stability at 88; a user at
        // 100 is only 0.8 sigma over, under the 1.5 sigma threshold.
        let near = sentinel.traits.with(TraitDimension::EmotionalStability, 100.0);
        assert_eq!(overshoot_penalty(&near, sentinel, &config), 1.0);

        // Curator's openness reference is 72; a user at 100 sits 28 points
        // over, about 1.87 sigma out.
        let curator = catalog().prototype(Archetype::Curator).unwrap();
        let over = curator.traits.with(TraitDimension::Openness, 100.0);
        let excess = 28.0 / config.population_sigma;
        let expected = 1.0
            / (1.0 + config.overshoot_penalty_coeff * (excess - config.overshoot_threshold));
        assert!((overshoot_penalty(&over, curator, &config) - expected).abs() < 1e-9);
    }

    #[test]
    fn overshoot_reduces_final_score() {
        let config = cfg();
        let curator = catalog().prototype(Archetype::Curator).unwrap();
        let aligned = curator.traits;
        let overshot = curator.traits.with(TraitDimension::Openness, 100.0);

        let aligned_score = raw_score(&aligned, None, curator, &config);
        let overshot_score = raw_score(&overshot, None, curator, &config);
        assert!(overshot_score < aligned_score);
    }

    #[test]
    fn secondary_match_adds_flat_bonus() {
        let config = cfg();
        let proto = catalog().prototype(Archetype::Captain).unwrap();
        // A poor fit, so the bonus is visible instead of clamped at 100.
        let traits = TraitVector::from_scores([20.0, 80.0, 20.0, 80.0, 20.0, 20.0]);

        let without = raw_score(&traits, None, proto, &config);
        assert!(without < 90.0);
        let with = raw_score(&traits, Some(&proto.secondary), proto, &config);
        let expected_bonus = 4.0 * config.secondary_field_bonus * 100.0;
        assert!((with - without - expected_bonus).abs() < 1e-6);
    }

    #[test]
    fn top_confidence_requires_gap_and_alignment() {
        let config = cfg();
        let proto = catalog().prototype(Archetype::Firestarter).unwrap();

        // Perfect alignment, wide gap: high confidence.
        let high = top_confidence(90.0, 60.0, &proto.traits, proto, &config);
        assert!(high >= 0.8);

        // Narrow gap: degrades below 0.8 regardless of alignment.
        let low = top_confidence(90.0, 85.0, &proto.traits, proto, &config);
        assert!(low < 0.8);
        assert!(low >= 0.5);
    }

    #[test]
    fn lower_ranks_cap_confidence_at_fraction_of_score() {
        let proto = catalog().prototype(Archetype::Connector).unwrap();
        let matches = find_best_matches(&proto.traits, None, 5, catalog(), &cfg());
        for m in &matches[1..] {
            assert!(m.confidence <= 0.8 * m.score / 100.0 + 1e-9);
        }
    }

    #[test]
    fn tie_break_prefers_secondary_match() {
        // Maven and Curator share signal traits and near-identical
        // vectors; a profile between them plus Curator's qualitative
        // orientation should tip the call to Curator.
        let config = cfg();
        let maven = catalog().prototype(Archetype::Maven).unwrap();
        let curator = catalog().prototype(Archetype::Curator).unwrap();
        let mut between = TraitVector::neutral();
        for dim in TraitDimension::ALL {
            between.set(dim, (maven.traits.get(dim) + curator.traits.get(dim)) / 2.0);
        }

        let secondary = SecondaryProfile {
            motivation: MotivationDirection::Avoidance,
            conflict: ConflictPosture::Avoiding,
            risk: RiskTolerance::Low,
            status: StatusOrientation::Indifferent,
        };
        let matches = find_best_matches(&between, Some(&secondary), 3, catalog(), &config);
        assert_eq!(matches[0].archetype, Archetype::Curator);
        assert_eq!(secondary, curator.secondary);
    }

    #[test]
    fn tie_break_saturates_at_the_score_cap() {
        // A near-saturated tie plus a full four-field secondary match is
        // the worst case: the raw score already clamped at 100 and the
        // tie-break pass adds its full 10 points on top.
        let config = cfg();
        let maven = catalog().prototype(Archetype::Maven).unwrap();
        let curator = catalog().prototype(Archetype::Curator).unwrap();
        let mut between = TraitVector::neutral();
        for dim in TraitDimension::ALL {
            between.set(dim, (maven.traits.get(dim) + curator.traits.get(dim)) / 2.0);
        }

        let matches = find_best_matches(&between, Some(&curator.secondary), 12, catalog(), &config);
        assert_eq!(matches[0].archetype, Archetype::Curator);
        for m in &matches {
            assert!((0.0..=100.0).contains(&m.score), "{:?}: {}", m.archetype, m.score);
            assert!((0.0..=1.0).contains(&m.confidence));
        }
    }

    #[test]
    fn tie_break_points_weight_fields_unevenly() {
        let curator = catalog().prototype(Archetype::Curator).unwrap();
        assert_eq!(tie_break_points(&curator.secondary, &curator.secondary), 10.0);

        // Sharing only risk and status is worth less than sharing
        // motivation and conflict.
        let partial = SecondaryProfile {
            motivation: MotivationDirection::Approach,
            conflict: ConflictPosture::Direct,
            risk: curator.secondary.risk,
            status: curator.secondary.status,
        };
        assert_eq!(tie_break_points(&curator.secondary, &partial), 4.0);
    }

    #[test]
    fn explanation_lists_confusable_prototypes() {
        let proto = catalog().prototype(Archetype::Firestarter).unwrap();
        let matches = find_best_matches(&proto.traits, None, 1, catalog(), &cfg());
        let explanation = &matches[0].explanation;
        assert!(explanation.similar.len() <= 2);
        assert!(!explanation.similar.is_empty());
        assert!(!explanation.driving_traits.is_empty());
    }

    #[test]
    fn explanation_reports_overshoot_interpretation() {
        let config = cfg();
        let curator = catalog().prototype(Archetype::Curator).unwrap();
        let overshot = curator.traits.with(TraitDimension::Openness, 100.0);
        let explanation = explain(&overshot, curator, catalog(), &config);
        assert_eq!(explanation.overshoots.len(), 1);
        let overshoot = &explanation.overshoots[0];
        assert_eq!(overshoot.dimension, TraitDimension::Openness);
        assert!(overshoot.interpretation.contains("openness"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Identical trait vectors always produce identical rankings,
        /// regardless of how the vector was reached.
        #[test]
        fn prop_ranking_is_a_pure_function_of_the_vector(
            scores in prop::collection::vec(0.0f64..=100.0, 6)
        ) {
            let config = cfg();
            let v = TraitVector::from_scores([
                scores[0], scores[1], scores[2], scores[3], scores[4], scores[5],
            ]);
            let a = find_best_matches(&v, None, 12, catalog(), &config);
            let b = find_best_matches(&v, None, 12, catalog(), &config);
            prop_assert_eq!(a, b);
        }

        /// Scores and confidences stay in their documented ranges, with
        /// and without secondary data feeding the bonus and tie-break.
        #[test]
        fn prop_scores_and_confidence_bounded(
            scores in prop::collection::vec(0.0f64..=100.0, 6),
            secondary_idx in prop::option::of(0usize..12),
        ) {
            let config = cfg();
            let v = TraitVector::from_scores([
                scores[0], scores[1], scores[2], scores[3], scores[4], scores[5],
            ]);
            let secondary = secondary_idx.map(|i| catalog().prototypes()[i].secondary);
            for m in find_best_matches(&v, secondary.as_ref(), 12, catalog(), &config) {
                prop_assert!((0.0..=100.0).contains(&m.score));
                prop_assert!((0.0..=1.0).contains(&m.confidence));
            }
        }
    }
}
