use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Identifier wrapper for registered businesses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BusinessId(pub String);

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One SME's business profile as delivered by the lending backend.
///
/// Profile fields sit at the top level of the JSON payload next to `documents`
/// and `personalProfile`; unknown keys are ignored. Values of the wrong shape
/// are dropped rather than rejecting the record, so they simply do not count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<BusinessId>,
    #[serde(flatten)]
    pub profile: BusinessProfile,
    #[serde(default, deserialize_with = "lenient_documents")]
    pub documents: Vec<DocumentRecord>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub personal_profile: Option<PersonalProfile>,
}

impl BusinessRecord {
    pub fn business_name(&self) -> Option<&str> {
        self.profile.business_name.as_ref().and_then(FieldValue::as_text)
    }

    pub fn incorporation_type(&self) -> Option<&str> {
        self.profile
            .type_of_incorporation
            .as_ref()
            .and_then(FieldValue::as_text)
    }

    /// Only the backend's `verifiedEmail == 1` counts as verified.
    pub fn is_email_verified(&self) -> bool {
        self.personal_profile
            .as_ref()
            .and_then(|profile| profile.verified_email)
            == Some(1)
    }
}

/// Descriptive and financial fields supplied by the applicant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_description: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_of_incorporation: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_annual_turnover: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_monthly_turnover: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_of_registration: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street1: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_loans: Option<FieldValue>,
}

/// Loosely typed profile value. The backend does not enforce field types, so
/// a value is kept in whatever JSON shape it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<serde_json::Value>),
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

/// Metadata for an uploaded supporting file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub doc_type: DocumentType,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl DocumentRecord {
    pub fn new(doc_type: DocumentType) -> Self {
        Self {
            doc_type,
            name: None,
            url: None,
            uploaded_at: None,
        }
    }
}

/// Category tag attached to an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentType {
    BusinessRegistration,
    CertificateOfIncorporation,
    MemorandumOfAssociation,
    PartnershipDeed,
    TaxRegistrationDocument,
    BusinessPermit,
    AnnualBankStatement,
    BusinessPlan,
    PitchDeck,
    ArticlesOfAssociation,
    TaxClearanceDocument,
    AuditedFinancialStatement,
    /// Any tag the scorer does not weigh, kept verbatim.
    Other(String),
}

impl DocumentType {
    pub const SCORED: [DocumentType; 12] = [
        DocumentType::BusinessRegistration,
        DocumentType::CertificateOfIncorporation,
        DocumentType::MemorandumOfAssociation,
        DocumentType::PartnershipDeed,
        DocumentType::TaxRegistrationDocument,
        DocumentType::BusinessPermit,
        DocumentType::AnnualBankStatement,
        DocumentType::BusinessPlan,
        DocumentType::PitchDeck,
        DocumentType::ArticlesOfAssociation,
        DocumentType::TaxClearanceDocument,
        DocumentType::AuditedFinancialStatement,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            DocumentType::BusinessRegistration => "BUSINESS_REGISTRATION",
            DocumentType::CertificateOfIncorporation => "CERTIFICATE_OF_INCORPORATION",
            DocumentType::MemorandumOfAssociation => "MEMORANDUM_OF_ASSOCIATION",
            DocumentType::PartnershipDeed => "PARTNERSHIP_DEED",
            DocumentType::TaxRegistrationDocument => "TAX_REGISTRATION_DOCUMENT",
            DocumentType::BusinessPermit => "BUSINESS_PERMIT",
            DocumentType::AnnualBankStatement => "ANNUAL_BANK_STATEMENT",
            DocumentType::BusinessPlan => "BUSINESS_PLAN",
            DocumentType::PitchDeck => "PITCH_DECK",
            DocumentType::ArticlesOfAssociation => "ARTICLES_OF_ASSOCIATION",
            DocumentType::TaxClearanceDocument => "TAX_CLEARANCE_DOCUMENT",
            DocumentType::AuditedFinancialStatement => "AUDITED_FINANCIAL_STATEMENT",
            DocumentType::Other(raw) => raw,
        }
    }
}

impl FromStr for DocumentType {
    type Err = Infallible;

    /// Case and `-`, `_`, space separators are ignored; unmatched tags become
    /// [`DocumentType::Other`].
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let parsed = match key.as_str() {
            "businessregistration" => DocumentType::BusinessRegistration,
            "certificateofincorporation" => DocumentType::CertificateOfIncorporation,
            "memorandumofassociation" => DocumentType::MemorandumOfAssociation,
            "partnershipdeed" => DocumentType::PartnershipDeed,
            "taxregistrationdocument" => DocumentType::TaxRegistrationDocument,
            "businesspermit" => DocumentType::BusinessPermit,
            "annualbankstatement" => DocumentType::AnnualBankStatement,
            "businessplan" => DocumentType::BusinessPlan,
            "pitchdeck" => DocumentType::PitchDeck,
            "articlesofassociation" => DocumentType::ArticlesOfAssociation,
            "taxclearancedocument" => DocumentType::TaxClearanceDocument,
            "auditedfinancialstatement" => DocumentType::AuditedFinancialStatement,
            _ => DocumentType::Other(raw.to_string()),
        };
        Ok(parsed)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DocumentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DocumentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Non-string tags never match a scored type; keep their JSON text.
        let raw = match Value::deserialize(deserializer)? {
            Value::String(raw) => raw,
            other => return Ok(DocumentType::Other(other.to_string())),
        };
        Ok(raw
            .parse::<DocumentType>()
            .unwrap_or_else(|never: Infallible| match never {}))
    }
}

/// Subset of the applicant's personal profile consulted for verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalProfile {
    /// Integral numbers only; `1.0` reads as `1`, booleans and strings as absent.
    #[serde(
        default,
        deserialize_with = "lenient_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub verified_email: Option<i64>,
}

impl PersonalProfile {
    pub fn verified() -> Self {
        Self {
            verified_email: Some(1),
        }
    }

    pub fn unverified() -> Self {
        Self {
            verified_email: Some(0),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<BusinessId>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Value::deserialize(deserializer)? {
        Value::String(raw) if !raw.trim().is_empty() => Some(raw),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    };
    Ok(id.map(BusinessId))
}

fn lenient_documents<'de, D>(deserializer: D) -> Result<Vec<DocumentRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let Value::Number(number) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|flag| flag.fract() == 0.0 && flag.abs() <= i32::MAX as f64)
            .map(|flag| flag as i64)
    }))
}
