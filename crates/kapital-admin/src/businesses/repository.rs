use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::completion::CompletionReport;
use super::domain::{BusinessId, BusinessRecord};

/// Lifecycle of a business inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    Registered,
    Scored,
    VerificationPending,
}

impl BusinessStatus {
    pub const fn label(self) -> &'static str {
        match self {
            BusinessStatus::Registered => "registered",
            BusinessStatus::Scored => "scored",
            BusinessStatus::VerificationPending => "verification_pending",
        }
    }
}

/// Repository entry holding the record, its latest report, and status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessEntry {
    pub id: BusinessId,
    pub business: BusinessRecord,
    pub status: BusinessStatus,
    pub completion: Option<CompletionReport>,
    pub scored_at: Option<DateTime<Utc>>,
}

impl BusinessEntry {
    pub fn summary_view(&self) -> BusinessSummaryView {
        BusinessSummaryView {
            business_id: self.id.clone(),
            business_name: self.business.business_name().map(str::to_string),
            status: self.status.label(),
            completion_percentage: self
                .completion
                .as_ref()
                .map(|report| report.result.completion_percentage),
            is_verification_pending: self
                .completion
                .as_ref()
                .is_some_and(|report| report.result.is_verification_pending),
            scored_at: self.scored_at,
        }
    }
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait BusinessRepository: Send + Sync {
    fn insert(&self, entry: BusinessEntry) -> Result<BusinessEntry, RepositoryError>;
    fn update(&self, entry: BusinessEntry) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &BusinessId) -> Result<Option<BusinessEntry>, RepositoryError>;
    fn verification_pending(&self, limit: usize) -> Result<Vec<BusinessEntry>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("business already exists")]
    Conflict,
    #[error("business not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook used to prompt applicants to verify their email.
pub trait VerificationNotifier: Send + Sync {
    fn publish(&self, reminder: VerificationReminder) -> Result<(), NotifierError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReminder {
    pub template: String,
    pub business_id: BusinessId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Dashboard-facing view of a registered business.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessSummaryView {
    pub business_id: BusinessId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_percentage: Option<u8>,
    pub is_verification_pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scored_at: Option<DateTime<Utc>>,
}
