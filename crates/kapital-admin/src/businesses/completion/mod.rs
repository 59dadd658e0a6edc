//! Profile and document completion scoring.
//!
//! A business earns a fixed base score, up to 40 points for its profile
//! fields and up to 40 points for the documents its incorporation type
//! requires. Each stage is rounded on its own (half away from zero) before it
//! feeds the next, and all rounding is done in integer arithmetic.

mod profile;
mod requirements;

pub use profile::ProfileField;
pub use requirements::{IncorporationType, RequirementSet};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::domain::{BusinessRecord, DocumentRecord, DocumentType};

/// Points awarded regardless of what the business has filled in.
pub const BASE_SCORE: u8 = 20;
/// Completion at or above which an unverified email becomes an action item.
pub const VERIFICATION_THRESHOLD: u8 = 80;

/// Headline numbers rendered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub completion_percentage: u8,
    pub is_verification_pending: bool,
}

/// What a component was scored against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionItem {
    Field(ProfileField),
    Document(DocumentType),
}

/// Single weighted line of the completion audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub item: CompletionItem,
    pub weight: u32,
    pub credited: u32,
    pub notes: String,
}

impl ScoreComponent {
    pub fn is_satisfied(&self) -> bool {
        self.credited > 0
    }
}

/// Score plus the intermediate percentages and per-item breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    #[serde(flatten)]
    pub result: ScoreResult,
    pub profile_percent: u8,
    pub document_percent: u8,
    pub incorporation_type: IncorporationType,
    pub requirement_set: RequirementSet,
    pub missing_documents: Vec<DocumentType>,
    pub components: Vec<ScoreComponent>,
}

/// Stateless scorer; reads a business record and never modifies it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionScorer;

impl CompletionScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, business: &BusinessRecord) -> ScoreResult {
        self.assess(business).result
    }

    pub fn assess(&self, business: &BusinessRecord) -> CompletionReport {
        let mut components = Vec::with_capacity(ProfileField::ALL.len() + 5);

        let (profile_credited, profile_available) = score_profile(business, &mut components);
        let profile_percent = percent_of(profile_credited, profile_available);

        let incorporation_type = IncorporationType::parse(business.incorporation_type());
        let requirement_set = incorporation_type.requirement_set();
        let (document_credited, document_available, missing_documents) =
            score_documents(&business.documents, requirement_set, &mut components);
        let document_percent = percent_of(document_credited, document_available);

        let completion_percentage = combine(profile_percent, document_percent);
        let is_verification_pending =
            completion_percentage >= VERIFICATION_THRESHOLD && !business.is_email_verified();

        CompletionReport {
            result: ScoreResult {
                completion_percentage,
                is_verification_pending,
            },
            profile_percent,
            document_percent,
            incorporation_type,
            requirement_set,
            missing_documents,
            components,
        }
    }
}

fn score_profile(business: &BusinessRecord, components: &mut Vec<ScoreComponent>) -> (u32, u32) {
    let mut credited = 0;
    let mut available = 0;

    for field in ProfileField::ALL {
        let weight = field.weight();
        available += weight;

        let (earned, notes) = match field.value(&business.profile) {
            None => (0, format!("{} missing", field.key())),
            Some(value) if field.accepts(value) => (weight, format!("{} provided", field.key())),
            Some(_) => (0, format!("{} present but not usable", field.key())),
        };
        credited += earned;

        components.push(ScoreComponent {
            item: CompletionItem::Field(field),
            weight,
            credited: earned,
            notes,
        });
    }

    (credited, available)
}

fn score_documents(
    documents: &[DocumentRecord],
    requirement_set: RequirementSet,
    components: &mut Vec<ScoreComponent>,
) -> (u32, u32, Vec<DocumentType>) {
    let uploaded: HashSet<&DocumentType> = documents.iter().map(|doc| &doc.doc_type).collect();

    let mut credited = 0;
    let mut available = 0;
    let mut missing = Vec::new();

    for required in requirement_set.required_documents() {
        let weight = required.weight();
        available += weight;

        let earned = if uploaded.contains(required) {
            weight
        } else {
            missing.push(required.clone());
            0
        };
        credited += earned;

        components.push(ScoreComponent {
            item: CompletionItem::Document(required.clone()),
            weight,
            credited: earned,
            notes: if earned > 0 {
                format!("{required} uploaded")
            } else {
                format!("{required} required for {}", requirement_set.label())
            },
        });
    }

    (credited, available, missing)
}

/// `round(100 * part / whole)`, half away from zero. An empty whole scores 0.
pub(crate) fn percent_of(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = u64::from(part.min(whole));
    let whole = u64::from(whole);
    ((200 * part + whole) / (2 * whole)) as u8
}

/// `round(percent * 0.4)`, half away from zero.
pub(crate) fn weighted_share(percent: u8) -> u8 {
    ((4 * u32::from(percent) + 5) / 10) as u8
}

pub(crate) fn combine(profile_percent: u8, document_percent: u8) -> u8 {
    let total = u32::from(BASE_SCORE)
        + u32::from(weighted_share(profile_percent))
        + u32::from(weighted_share(document_percent));
    total.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_rounds_half_away_from_zero() {
        assert_eq!(percent_of(4, 34), 12);
        assert_eq!(percent_of(15, 34), 44);
        assert_eq!(percent_of(1, 8), 13);
        assert_eq!(percent_of(1, 200), 1);
        assert_eq!(percent_of(34, 34), 100);
        assert_eq!(percent_of(0, 34), 0);
    }

    #[test]
    fn percent_of_empty_whole_is_zero() {
        assert_eq!(percent_of(0, 0), 0);
    }

    #[test]
    fn weighted_share_rounds_each_stage() {
        assert_eq!(weighted_share(12), 5);
        assert_eq!(weighted_share(63), 25);
        assert_eq!(weighted_share(100), 40);
        assert_eq!(weighted_share(0), 0);
        for percent in 0..=100u8 {
            let expected = (f64::from(percent) * 0.4).round() as u8;
            assert_eq!(weighted_share(percent), expected, "{percent}");
        }
    }

    #[test]
    fn combine_adds_base_and_caps_at_hundred() {
        assert_eq!(combine(0, 0), 20);
        assert_eq!(combine(100, 0), 60);
        assert_eq!(combine(100, 100), 100);
    }
}
