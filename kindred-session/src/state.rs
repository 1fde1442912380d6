//! Session state

use kindred_core::{AnswerRecord, ArchetypeMatch, QuestionId};
use kindred_scoring::TraitTracker;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Opening anchor questions still outstanding
    Collecting,
    /// Anchor quota met; adaptive selection active
    AnchorsDone,
    /// Stopping rule fired or hard cap hit; state is read-only
    Terminated,
}

/// Full state of one assessment session.
///
/// Created all-zero at session start and advanced only through the engine's
/// `process_answer` and `skip_question` operations, each of which returns a
/// successor value. The engine never mutates a state in place; callers own
/// the discipline of not reusing stale snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) phase: SessionPhase,
    pub(crate) answered: BTreeSet<QuestionId>,
    pub(crate) skipped: BTreeSet<QuestionId>,
    pub(crate) skips_used: u32,
    pub(crate) tracker: TraitTracker,
    pub(crate) matches: Vec<ArchetypeMatch>,
    pub(crate) history: Vec<AnswerRecord>,
}

impl SessionState {
    /// Fresh session: neutral scores, zero confidence, empty history.
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Collecting,
            answered: BTreeSet::new(),
            skipped: BTreeSet::new(),
            skips_used: 0,
            tracker: TraitTracker::new(),
            matches: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == SessionPhase::Terminated
    }

    /// Questions answered so far.
    pub fn answered_count(&self) -> u32 {
        self.answered.len() as u32
    }

    pub fn skips_used(&self) -> u32 {
        self.skips_used
    }

    /// Whether this question id has been answered or skipped.
    pub fn has_seen(&self, id: &QuestionId) -> bool {
        self.answered.contains(id) || self.skipped.contains(id)
    }

    /// Live scoring state.
    pub fn tracker(&self) -> &TraitTracker {
        &self.tracker
    }

    /// Current ranked candidates, best first. Empty before the first answer.
    pub fn matches(&self) -> &[ArchetypeMatch] {
        &self.matches
    }

    /// Full answer history in order.
    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    pub fn answered_ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.answered.iter()
    }

    pub fn skipped_ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.skipped.iter()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
