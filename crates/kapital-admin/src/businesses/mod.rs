//! Business registry and completion scoring for SME applicants.
//!
//! Records arrive from the lending backend, get scored for profile and
//! document completeness, and businesses that are nearly complete but still
//! have an unverified email are queued for follow-up.

pub mod completion;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use completion::{
    CompletionItem, CompletionReport, CompletionScorer, IncorporationType, ProfileField,
    RequirementSet, ScoreComponent, ScoreResult, BASE_SCORE, VERIFICATION_THRESHOLD,
};
pub use domain::{
    BusinessId, BusinessProfile, BusinessRecord, DocumentRecord, DocumentType, FieldValue,
    PersonalProfile,
};
pub use repository::{
    BusinessEntry, BusinessRepository, BusinessStatus, BusinessSummaryView, NotifierError,
    RepositoryError, VerificationNotifier, VerificationReminder,
};
pub use router::business_router;
pub use service::{BusinessCompletionService, BusinessServiceError};
