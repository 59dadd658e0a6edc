use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::businesses::domain::{
    BusinessId, BusinessProfile, BusinessRecord, DocumentRecord, DocumentType, FieldValue,
    PersonalProfile,
};
use crate::businesses::repository::{
    BusinessEntry, BusinessRepository, BusinessStatus, NotifierError, RepositoryError,
    VerificationNotifier, VerificationReminder,
};
use crate::businesses::BusinessCompletionService;

pub(super) fn full_profile(incorporation: &str) -> BusinessProfile {
    BusinessProfile {
        business_name: Some("Kilimo Fresh Ltd".into()),
        business_description: Some("Cold-chain distribution for smallholder farmers".into()),
        type_of_incorporation: Some(incorporation.into()),
        sector: Some("Agriculture".into()),
        country: Some("Kenya".into()),
        city: Some("Nairobi".into()),
        postal_code: Some("00100".into()),
        average_annual_turnover: Some(FieldValue::Number(2_400_000.0)),
        average_monthly_turnover: Some(FieldValue::Number(200_000.0)),
        year_of_registration: Some(2019u32.into()),
        street1: Some("Moi Avenue 14".into()),
        previous_loans: Some(false.into()),
    }
}

pub(super) fn sole_proprietorship_documents() -> Vec<DocumentType> {
    vec![
        DocumentType::BusinessRegistration,
        DocumentType::TaxRegistrationDocument,
        DocumentType::BusinessPermit,
        DocumentType::AnnualBankStatement,
        DocumentType::PitchDeck,
    ]
}

pub(super) fn documents(types: &[DocumentType]) -> Vec<DocumentRecord> {
    types.iter().cloned().map(DocumentRecord::new).collect()
}

pub(super) fn business(
    profile: BusinessProfile,
    types: &[DocumentType],
    verified_email: Option<i64>,
) -> BusinessRecord {
    BusinessRecord {
        id: None,
        profile,
        documents: documents(types),
        personal_profile: verified_email.map(|flag| PersonalProfile {
            verified_email: Some(flag),
        }),
    }
}

/// Fully populated sole proprietorship with every required document.
pub(super) fn complete_business(verified_email: i64) -> BusinessRecord {
    business(
        full_profile("sole-proprietorship"),
        &sole_proprietorship_documents(),
        Some(verified_email),
    )
}

/// Fully populated profile but nothing uploaded.
pub(super) fn undocumented_business() -> BusinessRecord {
    business(full_profile("sole-proprietorship"), &[], Some(0))
}

pub(super) fn build_service() -> (
    BusinessCompletionService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = BusinessCompletionService::new(repository.clone(), notifier.clone());
    (service, repository, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) entries: Arc<Mutex<HashMap<BusinessId, BusinessEntry>>>,
}

impl BusinessRepository for MemoryRepository {
    fn insert(&self, entry: BusinessEntry) -> Result<BusinessEntry, RepositoryError> {
        let mut guard = self.entries.lock().expect("repository mutex poisoned");
        if guard.contains_key(&entry.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    fn update(&self, entry: BusinessEntry) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("repository mutex poisoned");
        guard.insert(entry.id.clone(), entry);
        Ok(())
    }

    fn fetch(&self, id: &BusinessId) -> Result<Option<BusinessEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn verification_pending(&self, limit: usize) -> Result<Vec<BusinessEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("repository mutex poisoned");
        let mut pending: Vec<BusinessEntry> = guard
            .values()
            .filter(|entry| entry.status == BusinessStatus::VerificationPending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.id.cmp(&b.id));
        pending.truncate(limit);
        Ok(pending)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<VerificationReminder>>>,
}

impl VerificationNotifier for MemoryNotifier {
    fn publish(&self, reminder: VerificationReminder) -> Result<(), NotifierError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(reminder);
        Ok(())
    }
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<VerificationReminder> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

pub(super) struct ConflictRepository;

impl BusinessRepository for ConflictRepository {
    fn insert(&self, _entry: BusinessEntry) -> Result<BusinessEntry, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _entry: BusinessEntry) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &BusinessId) -> Result<Option<BusinessEntry>, RepositoryError> {
        Ok(None)
    }

    fn verification_pending(&self, _limit: usize) -> Result<Vec<BusinessEntry>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl BusinessRepository for UnavailableRepository {
    fn insert(&self, _entry: BusinessEntry) -> Result<BusinessEntry, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _entry: BusinessEntry) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &BusinessId) -> Result<Option<BusinessEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn verification_pending(&self, _limit: usize) -> Result<Vec<BusinessEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct FailingNotifier;

impl VerificationNotifier for FailingNotifier {
    fn publish(&self, _reminder: VerificationReminder) -> Result<(), NotifierError> {
        Err(NotifierError::Transport("smtp relay down".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}
