use serde::{Deserialize, Serialize};

use super::super::domain::DocumentType;

/// Legal structure of a business as declared in its profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncorporationType {
    SoleProprietorship,
    GeneralPartnership,
    LimitedPartnership,
    LimitedLiabilityPartnership,
    LimitedLiabilityCompany,
    PrivateLimitedCompany,
    PublicLimitedCompany,
    SCorporation,
    CCorporation,
    NonProfit,
    /// Missing, blank, or not one of the known structures.
    Unrecognized,
}

impl IncorporationType {
    /// Case-insensitive; spaces and underscores are treated like hyphens.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return IncorporationType::Unrecognized;
        };

        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '_' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "sole-proprietorship" | "sole-proprietor" => IncorporationType::SoleProprietorship,
            "general-partnership" => IncorporationType::GeneralPartnership,
            "limited-partnership" => IncorporationType::LimitedPartnership,
            "limited-liability-partnership" | "llp" => {
                IncorporationType::LimitedLiabilityPartnership
            }
            "limited-liability-company" | "llc" => IncorporationType::LimitedLiabilityCompany,
            "private-limited-company" | "private-limited" => {
                IncorporationType::PrivateLimitedCompany
            }
            "public-limited-company" | "public-limited" => IncorporationType::PublicLimitedCompany,
            "s-corporation" | "s-corp" => IncorporationType::SCorporation,
            "c-corporation" | "c-corp" => IncorporationType::CCorporation,
            "non-profit" | "nonprofit" | "non-profit-organization" => IncorporationType::NonProfit,
            _ => IncorporationType::Unrecognized,
        }
    }

    pub const fn requirement_set(self) -> RequirementSet {
        match self {
            IncorporationType::SoleProprietorship => RequirementSet::SoleProprietorship,
            IncorporationType::GeneralPartnership | IncorporationType::LimitedPartnership => {
                RequirementSet::Partnership
            }
            IncorporationType::LimitedLiabilityPartnership
            | IncorporationType::LimitedLiabilityCompany
            | IncorporationType::PrivateLimitedCompany
            | IncorporationType::PublicLimitedCompany
            | IncorporationType::SCorporation
            | IncorporationType::CCorporation
            | IncorporationType::NonProfit => RequirementSet::Company,
            // Unmapped structures are held to the sole-proprietorship list.
            IncorporationType::Unrecognized => RequirementSet::SoleProprietorship,
        }
    }
}

/// Required-document list selected by incorporation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementSet {
    SoleProprietorship,
    Partnership,
    Company,
}

static SOLE_PROPRIETORSHIP_DOCUMENTS: [DocumentType; 5] = [
    DocumentType::BusinessRegistration,
    DocumentType::TaxRegistrationDocument,
    DocumentType::BusinessPermit,
    DocumentType::AnnualBankStatement,
    DocumentType::PitchDeck,
];

static PARTNERSHIP_DOCUMENTS: [DocumentType; 5] = [
    DocumentType::PartnershipDeed,
    DocumentType::TaxRegistrationDocument,
    DocumentType::AnnualBankStatement,
    DocumentType::BusinessPermit,
    DocumentType::PitchDeck,
];

static COMPANY_DOCUMENTS: [DocumentType; 5] = [
    DocumentType::CertificateOfIncorporation,
    DocumentType::MemorandumOfAssociation,
    DocumentType::TaxRegistrationDocument,
    DocumentType::AnnualBankStatement,
    DocumentType::PitchDeck,
];

impl RequirementSet {
    pub fn required_documents(self) -> &'static [DocumentType] {
        match self {
            RequirementSet::SoleProprietorship => &SOLE_PROPRIETORSHIP_DOCUMENTS,
            RequirementSet::Partnership => &PARTNERSHIP_DOCUMENTS,
            RequirementSet::Company => &COMPANY_DOCUMENTS,
        }
    }

    pub fn total_weight(self) -> u32 {
        self.required_documents()
            .iter()
            .map(DocumentType::weight)
            .sum()
    }

    pub const fn label(self) -> &'static str {
        match self {
            RequirementSet::SoleProprietorship => "sole_proprietorship",
            RequirementSet::Partnership => "partnership",
            RequirementSet::Company => "company",
        }
    }
}

impl DocumentType {
    /// Fixed weight of a document, independent of the requirement set it
    /// appears in. Unscored tags weigh nothing.
    pub fn weight(&self) -> u32 {
        match self {
            DocumentType::BusinessRegistration
            | DocumentType::CertificateOfIncorporation
            | DocumentType::PartnershipDeed => 8,
            DocumentType::MemorandumOfAssociation
            | DocumentType::TaxRegistrationDocument
            | DocumentType::BusinessPermit
            | DocumentType::BusinessPlan
            | DocumentType::ArticlesOfAssociation
            | DocumentType::TaxClearanceDocument
            | DocumentType::AuditedFinancialStatement => 7,
            DocumentType::AnnualBankStatement | DocumentType::PitchDeck => 6,
            DocumentType::Other(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_structures_regardless_of_case() {
        assert_eq!(
            IncorporationType::parse(Some("Sole-Proprietorship")),
            IncorporationType::SoleProprietorship
        );
        assert_eq!(
            IncorporationType::parse(Some("PRIVATE_LIMITED_COMPANY")),
            IncorporationType::PrivateLimitedCompany
        );
        assert_eq!(
            IncorporationType::parse(Some(" limited partnership ")),
            IncorporationType::LimitedPartnership
        );
        assert_eq!(
            IncorporationType::parse(Some("LLC")),
            IncorporationType::LimitedLiabilityCompany
        );
    }

    #[test]
    fn unmapped_structures_use_sole_proprietorship_list() {
        for raw in [None, Some(""), Some("cooperative"), Some("sole-propietorship")] {
            let parsed = IncorporationType::parse(raw);
            assert_eq!(parsed, IncorporationType::Unrecognized, "{raw:?}");
            assert_eq!(parsed.requirement_set(), RequirementSet::SoleProprietorship);
        }
    }

    #[test]
    fn corporate_structures_share_the_company_list() {
        for raw in [
            "llp",
            "llc",
            "private-limited",
            "public-limited-company",
            "s-corp",
            "c-corporation",
            "non-profit",
        ] {
            assert_eq!(
                IncorporationType::parse(Some(raw)).requirement_set(),
                RequirementSet::Company,
                "{raw}"
            );
        }
    }

    #[test]
    fn every_requirement_set_weighs_thirty_four() {
        for set in [
            RequirementSet::SoleProprietorship,
            RequirementSet::Partnership,
            RequirementSet::Company,
        ] {
            assert_eq!(set.total_weight(), 34, "{set:?}");
            assert_eq!(set.required_documents().len(), 5);
        }
    }

    #[test]
    fn document_weights_stay_within_range() {
        for doc in DocumentType::SCORED.iter() {
            assert!((6..=8).contains(&doc.weight()), "{doc:?}");
        }
        assert_eq!(DocumentType::Other("Utility Bill".into()).weight(), 0);
    }
}
