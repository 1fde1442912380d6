//! Question catalog: externally supplied scenario items

use crate::archetype::Archetype;
use crate::error::{EngineResult, InputError};
use crate::traits::TraitDimension;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// IDENTIFIERS AND LEVELS
// ============================================================================

/// Catalog-assigned question identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Question granularity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionLevel {
    /// Level 1: broad, universally discriminating. Asked first.
    Anchor,
    /// Level 2: core measurement items
    Core,
    /// Level 3: high-precision tie-breakers
    Precision,
}

bitflags! {
    /// Behavioral flags on a question.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct QuestionFlags: u8 {
        /// Must be asked during the opening anchor phase
        const ANCHOR = 0b0001;
        /// Reverse-keyed item counteracting acquiescence bias.
        /// Deltas are authored pre-inverted; the engine never flips signs.
        const REVERSED = 0b0010;
        /// Has one objectively correct option; scores nothing
        const ATTENTION_CHECK = 0b0100;
        /// Deliberately withholds the dominant-strategy option to
        /// separate two positively correlated traits
        const FORCED_CHOICE = 0b1000;
    }
}

// ============================================================================
// QUESTIONS
// ============================================================================

/// One selectable answer. `value` is the stable key the host sends back;
/// `deltas` is the sparse per-dimension evidence this choice contributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub value: i32,
    /// Sparse dimension deltas, typically -3..=4
    pub deltas: Vec<(TraitDimension, i32)>,
}

impl QuestionOption {
    pub fn new(value: i32, deltas: Vec<(TraitDimension, i32)>) -> Self {
        Self { value, deltas }
    }
}

/// An immutable scenario question record, supplied by the catalog provider.
/// The engine never renders text, so none is carried here; the host maps
/// ids to display copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub level: QuestionLevel,
    /// The 1-3 dimensions this item primarily measures
    pub primary_dimensions: Vec<TraitDimension>,
    pub options: Vec<QuestionOption>,
    #[serde(default = "QuestionFlags::empty")]
    pub flags: QuestionFlags,
    /// Empirical discrimination index. Falls back to 0.3 when absent.
    #[serde(default)]
    pub discrimination: Option<f64>,
    /// Alternate phrasing of another question; mutually exclusive with it
    #[serde(default)]
    pub variant_of: Option<QuestionId>,
    /// The specific archetype pair this item is designed to disambiguate
    #[serde(default)]
    pub target_pair: Option<(Archetype, Archetype)>,
    /// For attention checks: the objectively correct option value
    #[serde(default)]
    pub correct_value: Option<i32>,
}

impl Question {
    /// Minimal constructor; flags and metadata via `with_*`.
    pub fn new(
        id: impl Into<QuestionId>,
        level: QuestionLevel,
        primary_dimensions: Vec<TraitDimension>,
        options: Vec<QuestionOption>,
    ) -> Self {
        Self {
            id: id.into(),
            level,
            primary_dimensions,
            options,
            flags: QuestionFlags::empty(),
            discrimination: None,
            variant_of: None,
            target_pair: None,
            correct_value: None,
        }
    }

    pub fn with_flags(mut self, flags: QuestionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_discrimination(mut self, index: f64) -> Self {
        self.discrimination = Some(index);
        self
    }

    pub fn with_variant_of(mut self, primary: impl Into<QuestionId>) -> Self {
        self.variant_of = Some(primary.into());
        self
    }

    pub fn with_target_pair(mut self, a: Archetype, b: Archetype) -> Self {
        self.target_pair = Some((a, b));
        self
    }

    pub fn with_correct_value(mut self, value: i32) -> Self {
        self.correct_value = Some(value);
        self
    }

    pub fn is_anchor(&self) -> bool {
        self.flags.contains(QuestionFlags::ANCHOR)
    }

    pub fn is_attention_check(&self) -> bool {
        self.flags.contains(QuestionFlags::ATTENTION_CHECK)
    }

    /// Option matching a chosen value.
    pub fn option(&self, value: i32) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Discrimination index with the catalog-wide fallback applied.
    pub fn discrimination_or_default(&self) -> f64 {
        self.discrimination.unwrap_or(0.3)
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Immutable question bank, injected at engine construction and never
/// mutated. Lookup is by id; iteration order is the supplied order.
/// Serialize via `questions()`, rebuild via [`QuestionCatalog::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
    by_id: HashMap<QuestionId, usize>,
}

impl QuestionCatalog {
    /// Build and validate a catalog. Fails loudly on malformed records
    /// since those indicate a host/engine version mismatch.
    pub fn new(questions: Vec<Question>) -> EngineResult<Self> {
        let mut by_id = HashMap::with_capacity(questions.len());
        for (i, q) in questions.iter().enumerate() {
            if by_id.insert(q.id.clone(), i).is_some() {
                return Err(InputError::CatalogInvalid {
                    reason: format!("duplicate question id {}", q.id),
                }
                .into());
            }
        }
        let catalog = Self { questions, by_id };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from the provider's JSON representation.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let questions: Vec<Question> =
            serde_json::from_str(json).map_err(|e| InputError::CatalogInvalid {
                reason: format!("malformed question JSON: {e}"),
            })?;
        Self::new(questions)
    }

    fn validate(&self) -> EngineResult<()> {
        for q in &self.questions {
            if q.options.is_empty() {
                return Err(self.invalid(q, "no options"));
            }
            if q.primary_dimensions.is_empty() || q.primary_dimensions.len() > 3 {
                return Err(self.invalid(q, "must target 1-3 primary dimensions"));
            }
            if q.is_attention_check() {
                // Attention checks measure validity, never traits.
                let correct = match q.correct_value {
                    Some(v) => v,
                    None => return Err(self.invalid(q, "attention check without correct_value")),
                };
                if q.option(correct).is_none() {
                    return Err(self.invalid(q, "correct_value not among options"));
                }
                if q.options.iter().any(|o| o.deltas.iter().any(|&(_, d)| d != 0)) {
                    return Err(self.invalid(q, "attention check carries non-zero deltas"));
                }
            }
            if let Some(primary) = &q.variant_of {
                if !self.by_id.contains_key(primary) {
                    return Err(self.invalid(q, "variant_of references unknown question"));
                }
            }
        }
        Ok(())
    }

    fn invalid(&self, q: &Question, reason: &str) -> crate::error::EngineError {
        InputError::CatalogInvalid {
            reason: format!("question {}: {reason}", q.id),
        }
        .into()
    }

    /// Question by id.
    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.by_id.get(id).map(|&i| &self.questions[i])
    }

    /// All questions in supplied order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Anchor-flagged subset, in supplied order.
    pub fn anchors(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.is_anchor())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;

    fn opt(value: i32, deltas: Vec<(TraitDimension, i32)>) -> QuestionOption {
        QuestionOption::new(value, deltas)
    }

    fn basic_question(id: &str) -> Question {
        Question::new(
            id,
            QuestionLevel::Core,
            vec![TraitDimension::Openness],
            vec![
                opt(1, vec![(TraitDimension::Openness, 2)]),
                opt(2, vec![(TraitDimension::Openness, -2)]),
            ],
        )
    }

    #[test]
    fn catalog_lookup_by_id() {
        let catalog = QuestionCatalog::new(vec![basic_question("q1"), basic_question("q2")])
            .unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(&QuestionId::from("q1")).is_some());
        assert!(catalog.get(&QuestionId::from("missing")).is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = QuestionCatalog::new(vec![basic_question("q1"), basic_question("q1")])
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Input(InputError::CatalogInvalid { .. })
        ));
    }

    #[test]
    fn attention_check_with_nonzero_deltas_rejected() {
        let bad = Question::new(
            "ac1",
            QuestionLevel::Anchor,
            vec![TraitDimension::Openness],
            vec![opt(1, vec![(TraitDimension::Openness, 1)]), opt(2, vec![])],
        )
        .with_flags(QuestionFlags::ATTENTION_CHECK)
        .with_correct_value(2);
        assert!(QuestionCatalog::new(vec![bad]).is_err());
    }

    #[test]
    fn attention_check_requires_correct_value() {
        let bad = Question::new(
            "ac2",
            QuestionLevel::Anchor,
            vec![TraitDimension::Openness],
            vec![opt(1, vec![]), opt(2, vec![])],
        )
        .with_flags(QuestionFlags::ATTENTION_CHECK);
        assert!(QuestionCatalog::new(vec![bad]).is_err());
    }

    #[test]
    fn variant_of_must_resolve() {
        let orphan = basic_question("v1").with_variant_of("nope");
        assert!(QuestionCatalog::new(vec![orphan]).is_err());

        let primary = basic_question("p1");
        let variant = basic_question("v1").with_variant_of("p1");
        assert!(QuestionCatalog::new(vec![primary, variant]).is_ok());
    }

    #[test]
    fn json_round_trip() {
        let catalog = QuestionCatalog::new(vec![
            basic_question("q1").with_discrimination(0.6),
            basic_question("q2").with_flags(QuestionFlags::ANCHOR | QuestionFlags::REVERSED),
        ])
        .unwrap();
        let json = serde_json::to_string(catalog.questions()).unwrap();
        let reloaded = QuestionCatalog::from_json_str(&json).unwrap();
        assert_eq!(reloaded.questions(), catalog.questions());
    }

    #[test]
    fn malformed_json_fails_loudly() {
        assert!(QuestionCatalog::from_json_str("{not json").is_err());
    }

    #[test]
    fn discrimination_default() {
        let q = basic_question("q1");
        assert_eq!(q.discrimination_or_default(), 0.3);
        assert_eq!(q.with_discrimination(0.7).discrimination_or_default(), 0.7);
    }
}
