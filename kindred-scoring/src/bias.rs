//! Bias-correction utilities
//!
//! Two independent corrections applied to the final trait vector at
//! result-finalization time only. Running them mid-session would
//! destabilize the adaptive loop, so nothing here touches a live tracker.

use kindred_core::{AnswerRecord, EngineConfig, QuestionCatalog, TraitDimension, TraitVector};

/// Cap desirability-prone dimensions at a fixed z-score against the
/// population baseline (mean = center, sigma = population estimate).
/// Scores above the cap are pulled down to exactly the cap.
pub fn cap_desirability_z(scores: &TraitVector, config: &EngineConfig) -> TraitVector {
    let cap = config.score_center + config.desirability_z_cap * config.population_sigma;
    let mut out = *scores;
    for dim in TraitDimension::ALL {
        if dim.desirability_prone() && out.get(dim) > cap {
            out.set(dim, cap);
        }
    }
    out
}

/// 0-100 social-desirability index: the percentage of answers whose applied
/// deltas pushed a desirability-prone dimension by more than the cutoff in
/// normalized points (delta * scale).
pub fn desirability_index(history: &[AnswerRecord], config: &EngineConfig) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let cutoff = f64::from(config.desirability_raw_cutoff);
    let flagged = history
        .iter()
        .filter(|record| {
            record.applied_deltas.iter().any(|&(dim, delta)| {
                dim.desirability_prone() && f64::from(delta) * config.score_scale > cutoff
            })
        })
        .count();
    100.0 * flagged as f64 / history.len() as f64
}

/// When the desirability index exceeds its threshold, shrink every
/// dimension toward the neutral center by its susceptibility factor scaled
/// by how far over threshold the index sits.
pub fn correct_desirability(
    scores: &TraitVector,
    history: &[AnswerRecord],
    config: &EngineConfig,
) -> TraitVector {
    let index = desirability_index(history, config);
    if index <= config.desirability_index_threshold {
        return *scores;
    }
    let overage = (index - config.desirability_index_threshold)
        / (100.0 - config.desirability_index_threshold);
    let mut out = *scores;
    for dim in TraitDimension::ALL {
        let score = out.get(dim);
        let shrink = (score - config.score_center) * config.susceptibility(dim) * overage;
        out.set(dim, score - shrink);
    }
    out
}

/// Both corrections in finalization order: z-cap first, then the
/// index-driven shrink.
pub fn apply_corrections(
    scores: &TraitVector,
    history: &[AnswerRecord],
    config: &EngineConfig,
) -> TraitVector {
    let capped = cap_desirability_z(scores, config);
    correct_desirability(&capped, history, config)
}

/// 0-100 validity score: fraction of attention-check questions answered
/// with their designated correct option. 100 when none were asked.
pub fn validity_score(history: &[AnswerRecord], catalog: &QuestionCatalog) -> f64 {
    let mut checks = 0u32;
    let mut correct = 0u32;
    for record in history {
        let Some(question) = catalog.get(&record.question_id) else {
            continue;
        };
        if !question.is_attention_check() {
            continue;
        }
        checks += 1;
        if question.correct_value == Some(record.chosen_value) {
            correct += 1;
        }
    }
    if checks == 0 {
        100.0
    } else {
        100.0 * f64::from(correct) / f64::from(checks)
    }
}
