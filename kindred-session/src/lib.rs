//! KINDRED Session - Assessment Orchestration
//!
//! Drives the adaptive loop: select a question, receive an answer, rescore,
//! re-rank, decide continue or stop. The engine holds the immutable catalogs
//! and configuration; all per-session data lives in [`SessionState`] values
//! that flow in and out of every operation. Concurrent sessions need no
//! locking because nothing is shared between them.

use kindred_core::{
    AnswerRecord, AssessmentResult, EngineConfig, EngineResult, InputError, Question,
    QuestionCatalog, QuestionId, SecondaryProfile, SessionError,
};
use kindred_core::ArchetypeCatalog;
use kindred_matching::find_best_matches;
use kindred_scoring::bias;

mod selector;
mod state;
mod stopping;

pub use state::{SessionPhase, SessionState};

/// Candidates kept in the live ranking and the final result.
const RANKED_CANDIDATES: usize = 3;

// ============================================================================
// ENGINE
// ============================================================================

/// The assessment engine: immutable catalogs plus configuration.
///
/// Construct once, share freely; every session-advancing call is a pure
/// function from a state value to a successor value.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    questions: QuestionCatalog,
    archetypes: ArchetypeCatalog,
    config: EngineConfig,
}

impl AssessmentEngine {
    /// Build an engine over explicit catalogs.
    pub fn new(
        questions: QuestionCatalog,
        archetypes: ArchetypeCatalog,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        if archetypes.is_empty() {
            return Err(InputError::CatalogInvalid {
                reason: "archetype catalog is empty".to_string(),
            }
            .into());
        }
        Ok(Self {
            questions,
            archetypes,
            config,
        })
    }

    /// Engine over the standard twelve-archetype catalog and tuned config.
    pub fn with_standard_catalogs(questions: QuestionCatalog) -> EngineResult<Self> {
        Self::new(
            questions,
            ArchetypeCatalog::standard().clone(),
            EngineConfig::standard(),
        )
    }

    pub fn questions(&self) -> &QuestionCatalog {
        &self.questions
    }

    pub fn archetypes(&self) -> &ArchetypeCatalog {
        &self.archetypes
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a fresh session.
    pub fn start_session(&self) -> SessionState {
        SessionState::new()
    }

    /// Choose the next question, or `None` when the session should stop.
    /// Never re-offers an answered or skipped question (or a variant of
    /// one).
    pub fn select_next_question<'a>(&'a self, state: &SessionState) -> Option<&'a Question> {
        selector::select_next(&self.questions, &self.archetypes, state, &self.config)
    }

    /// Process one answer: accumulate evidence, re-rank archetypes, and
    /// advance the session phase. Returns the successor state; the input
    /// state is never touched, including on error.
    pub fn process_answer(
        &self,
        state: &SessionState,
        question_id: &QuestionId,
        chosen_value: i32,
    ) -> EngineResult<SessionState> {
        if state.is_terminated() {
            return Err(SessionError::Finalized.into());
        }
        let question = self
            .questions
            .get(question_id)
            .ok_or_else(|| InputError::UnknownQuestion {
                id: question_id.clone(),
            })?;
        if state.has_seen(question_id) {
            return Err(InputError::DuplicateAnswer {
                id: question_id.clone(),
            }
            .into());
        }

        // Tracker update validates the option value; any failure leaves
        // the caller's state as it was.
        let tracker = state
            .tracker
            .apply_answer(question, chosen_value, &self.config)?;
        let applied = question
            .option(chosen_value)
            .map(|o| o.deltas.clone())
            .unwrap_or_default();

        let mut next = state.clone();
        next.tracker = tracker;
        next.answered.insert(question_id.clone());
        next.history.push(AnswerRecord::new(
            question_id.clone(),
            chosen_value,
            applied,
        ));
        next.matches = find_best_matches(
            next.tracker.scores(),
            None,
            RANKED_CANDIDATES,
            &self.archetypes,
            &self.config,
        );
        next.phase = self.next_phase(&next);
        Ok(next)
    }

    /// Skip a question permanently and propose a replacement. Allowed up
    /// to the configured budget; further attempts fail without touching
    /// the state.
    pub fn skip_question<'a>(
        &'a self,
        state: &SessionState,
        question_id: &QuestionId,
    ) -> EngineResult<(SessionState, Option<&'a Question>)> {
        if state.is_terminated() {
            return Err(SessionError::Finalized.into());
        }
        if state.skips_used >= self.config.max_skips {
            return Err(SessionError::SkipBudgetExhausted {
                max: self.config.max_skips,
            }
            .into());
        }
        let question = self
            .questions
            .get(question_id)
            .ok_or_else(|| InputError::UnknownQuestion {
                id: question_id.clone(),
            })?;
        if state.has_seen(question_id) {
            return Err(InputError::DuplicateAnswer {
                id: question_id.clone(),
            }
            .into());
        }

        let mut next = state.clone();
        next.skipped.insert(question_id.clone());
        next.skips_used += 1;
        next.phase = self.next_phase(&next);

        let replacement = selector::select_replacement(
            &self.questions,
            &self.archetypes,
            &next,
            question.level,
            &self.config,
        );
        Ok((next, replacement))
    }

    /// Finalize a session into the flat result record. Usable on a
    /// terminated session or on an abandoned one (partial evidence).
    /// Bias corrections run here and only here; the adaptive loop always
    /// saw uncorrected scores.
    pub fn finalize(
        &self,
        state: &SessionState,
        secondary: Option<&SecondaryProfile>,
    ) -> EngineResult<AssessmentResult> {
        let corrected =
            bias::apply_corrections(state.tracker.scores(), &state.history, &self.config);
        let matches = find_best_matches(
            &corrected,
            secondary,
            RANKED_CANDIDATES,
            &self.archetypes,
            &self.config,
        );
        let top = matches.first().ok_or_else(|| InputError::CatalogInvalid {
            reason: "no archetype candidates ranked".to_string(),
        })?;

        let acceptance = self
            .archetypes
            .prototype(top.archetype)
            .map(|p| p.acceptance_threshold)
            .unwrap_or(self.config.confidence_threshold);

        // Report the runner-up only when it was a genuinely close call.
        let secondary_archetype = matches.get(1).and_then(|second| {
            ((top.score - second.score) / 100.0 < self.config.high_confidence_gap)
                .then_some(second.archetype)
        });

        let mut summaries = state.tracker.summaries();
        for (i, dim) in kindred_core::TraitDimension::ALL.iter().enumerate() {
            summaries[i].score = corrected.get(*dim);
        }

        Ok(AssessmentResult {
            primary: top.archetype,
            secondary: secondary_archetype,
            trait_scores: corrected,
            confidences: summaries,
            primary_confidence: top.confidence,
            validity_score: bias::validity_score(&state.history, &self.questions),
            low_confidence: top.confidence < acceptance,
        })
    }

    fn next_phase(&self, state: &SessionState) -> SessionPhase {
        if stopping::should_stop(
            state.answered_count(),
            &state.tracker,
            &state.matches,
            &self.config,
        ) {
            SessionPhase::Terminated
        } else if selector::anchors_seen(&self.questions, state) >= self.config.anchor_quota {
            SessionPhase::AnchorsDone
        } else {
            SessionPhase::Collecting
        }
    }
}
