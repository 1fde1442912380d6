//! KINDRED Scoring - Trait Evidence Accumulation
//!
//! Accumulates per-dimension raw scores and sample counts from answered
//! questions and derives normalized 0-100 scores with per-dimension
//! confidence. Every operation is value-in/value-out: callers discard the
//! old tracker after deriving a new one.

use kindred_core::{
    EngineConfig, EngineResult, InputError, Question, TraitConfidence, TraitDimension,
    TraitVector, DIMENSION_COUNT,
};
use serde::{Deserialize, Serialize};

pub mod bias;

// ============================================================================
// EVIDENCE
// ============================================================================

/// Raw accumulated evidence for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DimensionEvidence {
    /// Sum of applied deltas
    pub raw_total: i32,
    /// Answers that carried a non-zero delta here
    pub samples: u32,
    /// Of those, how many pushed positive
    pub positive: u32,
    /// And how many pushed negative
    pub negative: u32,
}

impl DimensionEvidence {
    /// Evidence is consistent when every delta so far shared a sign.
    fn is_consistent(&self) -> bool {
        self.samples > 0 && (self.positive == 0 || self.negative == 0)
    }
}

// ============================================================================
// TRACKER
// ============================================================================

/// Live per-dimension scoring state for one session.
///
/// Normalized scores deliberately amplify small per-question deltas into
/// full-range movement (score = center + raw * scale, clamped), since each
/// question only nudges 1-3 dimensions a few points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitTracker {
    evidence: [DimensionEvidence; DIMENSION_COUNT],
    scores: TraitVector,
    confidences: [f64; DIMENSION_COUNT],
}

impl TraitTracker {
    /// Fresh tracker: zero evidence, neutral scores, zero confidence.
    pub fn new() -> Self {
        Self {
            evidence: [DimensionEvidence::default(); DIMENSION_COUNT],
            scores: TraitVector::neutral(),
            confidences: [0.0; DIMENSION_COUNT],
        }
    }

    /// Process one answer, returning the successor tracker.
    ///
    /// Fails with [`InputError::UnknownOption`] when `chosen_value` is not
    /// among the question's options; the input tracker is untouched (the
    /// caller keeps using the value it already holds).
    pub fn apply_answer(
        &self,
        question: &Question,
        chosen_value: i32,
        config: &EngineConfig,
    ) -> EngineResult<TraitTracker> {
        let option = question
            .option(chosen_value)
            .ok_or_else(|| InputError::UnknownOption {
                question: question.id.clone(),
                value: chosen_value,
            })?;

        let mut next = self.clone();
        for &(dim, delta) in &option.deltas {
            if delta == 0 {
                continue;
            }
            let ev = &mut next.evidence[dim.index()];
            ev.raw_total += delta;
            ev.samples += 1;
            if delta > 0 {
                ev.positive += 1;
            } else {
                ev.negative += 1;
            }
        }
        next.recompute(config);
        Ok(next)
    }

    fn recompute(&mut self, config: &EngineConfig) {
        for dim in TraitDimension::ALL {
            let ev = self.evidence[dim.index()];
            let score = config.score_center + f64::from(ev.raw_total) * config.score_scale;
            self.scores.set(dim, score.clamp(0.0, 100.0));
            self.confidences[dim.index()] = confidence_for(&ev, config);
        }
    }

    /// Current normalized trait vector.
    pub fn scores(&self) -> &TraitVector {
        &self.scores
    }

    /// Confidence for one dimension, [0,1].
    pub fn confidence(&self, dim: TraitDimension) -> f64 {
        self.confidences[dim.index()]
    }

    /// Sample count for one dimension.
    pub fn samples(&self, dim: TraitDimension) -> u32 {
        self.evidence[dim.index()].samples
    }

    /// Raw evidence for one dimension.
    pub fn evidence(&self, dim: TraitDimension) -> &DimensionEvidence {
        &self.evidence[dim.index()]
    }

    /// Mean confidence across all dimensions.
    pub fn average_confidence(&self) -> f64 {
        self.confidences.iter().sum::<f64>() / DIMENSION_COUNT as f64
    }

    /// Lowest per-dimension confidence.
    pub fn min_confidence(&self) -> f64 {
        self.confidences.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Per-dimension summaries in canonical order, for the final result.
    pub fn summaries(&self) -> [TraitConfidence; DIMENSION_COUNT] {
        let mut out = [TraitConfidence::default(); DIMENSION_COUNT];
        for dim in TraitDimension::ALL {
            out[dim.index()] = TraitConfidence {
                score: self.scores.get(dim),
                confidence: self.confidence(dim),
                samples: self.samples(dim),
            };
        }
        out
    }
}

impl Default for TraitTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Saturating count curve: n / (n + 1) reaches 0.8 at four samples and
/// approaches 1 as evidence grows. Consistent (never-contradicted) evidence
/// earns a small bonus, capped at 1.
fn confidence_for(ev: &DimensionEvidence, config: &EngineConfig) -> f64 {
    if ev.samples == 0 {
        return 0.0;
    }
    let base = f64::from(ev.samples) / f64::from(ev.samples + 1);
    let bonus = if ev.samples >= 2 && ev.is_consistent() {
        config.consistency_bonus
    } else {
        0.0
    };
    (base + bonus).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_core::{EngineError, QuestionLevel, QuestionOption};
    use proptest::prelude::*;

    fn cfg() -> EngineConfig {
        EngineConfig::standard()
    }

    fn question(id: &str, deltas: Vec<(TraitDimension, i32)>) -> Question {
        Question::new(
            id,
            QuestionLevel::Core,
            deltas.iter().map(|&(d, _)| d).take(3).collect(),
            vec![
                QuestionOption::new(1, deltas),
                QuestionOption::new(2, vec![]),
            ],
        )
    }

    #[test]
    fn answer_moves_touched_dimensions_only() {
        let q = question("q1", vec![(TraitDimension::SocialEnergy, 3)]);
        let next = TraitTracker::new().apply_answer(&q, 1, &cfg()).unwrap();

        assert_eq!(next.scores().get(TraitDimension::SocialEnergy), 65.0);
        assert_eq!(next.samples(TraitDimension::SocialEnergy), 1);
        for dim in TraitDimension::ALL {
            if dim != TraitDimension::SocialEnergy {
                assert_eq!(next.scores().get(dim), 50.0);
                assert_eq!(next.samples(dim), 0);
            }
        }
    }

    #[test]
    fn scores_clamp_to_range() {
        let q = question("q1", vec![(TraitDimension::Openness, 4)]);
        let mut tracker = TraitTracker::new();
        for _ in 0..5 {
            tracker = tracker.apply_answer(&q, 1, &cfg()).unwrap();
        }
        assert_eq!(tracker.scores().get(TraitDimension::Openness), 100.0);

        let neg = question("q2", vec![(TraitDimension::Openness, -3)]);
        let mut tracker = TraitTracker::new();
        for _ in 0..8 {
            tracker = tracker.apply_answer(&neg, 1, &cfg()).unwrap();
        }
        assert_eq!(tracker.scores().get(TraitDimension::Openness), 0.0);
    }

    #[test]
    fn unknown_option_fails_without_mutation() {
        let q = question("q1", vec![(TraitDimension::Openness, 2)]);
        let tracker = TraitTracker::new();
        let err = tracker.apply_answer(&q, 99, &cfg()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Input(InputError::UnknownOption { .. })
        ));
        // Value semantics: the input tracker is still pristine.
        assert_eq!(tracker, TraitTracker::new());
    }

    #[test]
    fn confidence_hits_point_eight_at_four_samples() {
        let up = question("up", vec![(TraitDimension::Assertiveness, 2)]);
        let down = question("down", vec![(TraitDimension::Assertiveness, -2)]);
        // Alternate signs so the consistency bonus stays out of the way.
        let mut tracker = TraitTracker::new();
        for q in [&up, &down, &up, &down] {
            tracker = tracker.apply_answer(q, 1, &cfg()).unwrap();
        }
        assert_eq!(tracker.samples(TraitDimension::Assertiveness), 4);
        assert!((tracker.confidence(TraitDimension::Assertiveness) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn consistent_evidence_earns_bonus() {
        let config = cfg();
        let q = question("q1", vec![(TraitDimension::Agreeableness, 2)]);
        let mut tracker = TraitTracker::new();
        for _ in 0..4 {
            tracker = tracker.apply_answer(&q, 1, &config).unwrap();
        }
        // Four same-sign samples: 0.8 base plus the consistency bonus.
        let got = tracker.confidence(TraitDimension::Agreeableness);
        assert!((got - (0.8 + config.consistency_bonus)).abs() < 1e-9);
    }

    #[test]
    fn zero_delta_entries_do_not_count_as_samples() {
        let q = Question::new(
            "q1",
            QuestionLevel::Core,
            vec![TraitDimension::Openness],
            vec![QuestionOption::new(
                1,
                vec![(TraitDimension::Openness, 0), (TraitDimension::Agreeableness, 1)],
            )],
        );
        let next = TraitTracker::new().apply_answer(&q, 1, &cfg()).unwrap();
        assert_eq!(next.samples(TraitDimension::Openness), 0);
        assert_eq!(next.samples(TraitDimension::Agreeableness), 1);
    }

    #[test]
    fn attention_check_answer_moves_nothing() {
        let q = Question::new(
            "ac",
            QuestionLevel::Anchor,
            vec![TraitDimension::Openness],
            vec![QuestionOption::new(1, vec![]), QuestionOption::new(2, vec![])],
        );
        let base = TraitTracker::new();
        let next = base.apply_answer(&q, 1, &cfg()).unwrap();
        assert_eq!(next, base);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Identical answer sequences always produce bit-identical trackers.
        #[test]
        fn prop_deterministic_replay(
            deltas in prop::collection::vec((0usize..6, -3i32..=4), 1..20)
        ) {
            let config = cfg();
            let questions: Vec<Question> = deltas
                .iter()
                .enumerate()
                .map(|(i, &(dim_idx, delta))| {
                    question(
                        &format!("q{i}"),
                        vec![(TraitDimension::ALL[dim_idx], delta)],
                    )
                })
                .collect();

            let run = |qs: &[Question]| {
                let mut t = TraitTracker::new();
                for q in qs {
                    t = t.apply_answer(q, 1, &config).unwrap();
                }
                t
            };
            prop_assert_eq!(run(&questions), run(&questions));
        }

        /// Sample counts increase by exactly one per non-zero delta, and
        /// confidence never decreases with more evidence on a dimension.
        #[test]
        fn prop_monotonic_samples_and_confidence(
            deltas in prop::collection::vec(-3i32..=4, 1..15)
        ) {
            let config = cfg();
            let dim = TraitDimension::Conscientiousness;
            let mut tracker = TraitTracker::new();
            let mut expected_samples = 0u32;
            let mut last_confidence = 0.0f64;
            for (i, &delta) in deltas.iter().enumerate() {
                let q = question(&format!("q{i}"), vec![(dim, delta)]);
                tracker = tracker.apply_answer(&q, 1, &config).unwrap();
                if delta != 0 {
                    expected_samples += 1;
                }
                prop_assert_eq!(tracker.samples(dim), expected_samples);
                // The count term is monotonic; the bonus can only add.
                let base = f64::from(expected_samples) / f64::from(expected_samples + 1);
                prop_assert!(tracker.confidence(dim) >= base - 1e-12);
                prop_assert!(tracker.confidence(dim) <= 1.0);
                let _ = last_confidence;
                last_confidence = tracker.confidence(dim);
            }
        }
    }
}
