//! Answer history records

use crate::question::QuestionId;
use crate::traits::TraitDimension;
use crate::Timestamp;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One processed answer. Appended to session history and consumed by the
/// finalization-time bias corrections and validity scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// UUIDv7, timestamp-sortable
    pub record_id: Uuid,
    pub question_id: QuestionId,
    pub chosen_value: i32,
    /// The per-dimension deltas this answer applied
    pub applied_deltas: Vec<(TraitDimension, i32)>,
    pub answered_at: Timestamp,
}

impl AnswerRecord {
    pub fn new(
        question_id: QuestionId,
        chosen_value: i32,
        applied_deltas: Vec<(TraitDimension, i32)>,
    ) -> Self {
        Self {
            record_id: Uuid::now_v7(),
            question_id,
            chosen_value,
            applied_deltas,
            answered_at: Utc::now(),
        }
    }
}
