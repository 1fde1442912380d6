//! KINDRED Core - Entity Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types - no assessment logic.

use chrono::{DateTime, Utc};

mod archetype;
mod config;
mod error;
mod history;
mod matching;
mod question;
mod result;
mod traits;

pub use archetype::{
    Archetype, ArchetypeCatalog, ArchetypePrototype, ConflictPosture, MotivationDirection,
    RiskTolerance, SecondaryProfile, StatusOrientation, CONFUSABLE_PAIRS,
};
pub use archetype::is_confusable_pair;
pub use config::{EngineConfig, UtilityWeights};
pub use error::{EngineError, EngineResult, InputError, SessionError};
pub use history::AnswerRecord;
pub use matching::{ArchetypeMatch, MatchExplanation, SimilarPrototype, TraitOvershoot};
pub use question::{
    Question, QuestionCatalog, QuestionFlags, QuestionId, QuestionLevel, QuestionOption,
};
pub use result::AssessmentResult;
pub use traits::{TraitConfidence, TraitDimension, TraitVector, DIMENSION_COUNT};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;
