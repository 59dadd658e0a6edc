use kapital_admin::businesses::{
    BusinessEntry, BusinessId, BusinessRecord, BusinessRepository, BusinessStatus,
    NotifierError, RepositoryError, VerificationNotifier, VerificationReminder,
};
use kapital_admin::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Ordered by id so the verification queue pages deterministically.
#[derive(Default, Clone)]
pub(crate) struct InMemoryBusinessRepository {
    entries: Arc<Mutex<BTreeMap<BusinessId, BusinessEntry>>>,
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("repository lock poisoned".to_string())
}

impl BusinessRepository for InMemoryBusinessRepository {
    fn insert(&self, entry: BusinessEntry) -> Result<BusinessEntry, RepositoryError> {
        let mut guard = self.entries.lock().map_err(poisoned)?;
        if guard.contains_key(&entry.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    fn update(&self, entry: BusinessEntry) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().map_err(poisoned)?;
        if guard.contains_key(&entry.id) {
            guard.insert(entry.id.clone(), entry);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &BusinessId) -> Result<Option<BusinessEntry>, RepositoryError> {
        let guard = self.entries.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn verification_pending(&self, limit: usize) -> Result<Vec<BusinessEntry>, RepositoryError> {
        let guard = self.entries.lock().map_err(poisoned)?;
        Ok(guard
            .values()
            .filter(|entry| entry.status == BusinessStatus::VerificationPending)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Records reminders and logs them; stands in for the email provider.
#[derive(Default, Clone)]
pub(crate) struct InMemoryVerificationNotifier {
    events: Arc<Mutex<Vec<VerificationReminder>>>,
}

impl VerificationNotifier for InMemoryVerificationNotifier {
    fn publish(&self, reminder: VerificationReminder) -> Result<(), NotifierError> {
        info!(
            business_id = %reminder.business_id,
            template = %reminder.template,
            "queued verification reminder"
        );
        let mut guard = self
            .events
            .lock()
            .map_err(|_| NotifierError::Transport("notifier lock poisoned".to_string()))?;
        guard.push(reminder);
        Ok(())
    }
}

impl InMemoryVerificationNotifier {
    pub(crate) fn events(&self) -> Vec<VerificationReminder> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordBatch {
    Many(Vec<BusinessRecord>),
    One(Box<BusinessRecord>),
}

/// Parse either a single business record or an array of them.
pub(crate) fn read_records<R: Read>(reader: R) -> Result<Vec<BusinessRecord>, AppError> {
    let batch: RecordBatch = serde_json::from_reader(reader)?;
    Ok(match batch {
        RecordBatch::Many(records) => records,
        RecordBatch::One(record) => vec![*record],
    })
}

pub(crate) fn load_records(path: &Path) -> Result<Vec<BusinessRecord>, AppError> {
    let file = File::open(path)?;
    read_records(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kapital_admin::businesses::BusinessCompletionService;
    use std::io::Cursor;

    #[test]
    fn reads_single_record_or_array() {
        let single = read_records(Cursor::new(r#"{ "businessName": "Acme" }"#)).expect("parses");
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].business_name(), Some("Acme"));

        let many = read_records(Cursor::new(
            r#"[{ "businessName": "Acme" }, { "businessName": "Zuri" }]"#,
        ))
        .expect("parses");
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn rejects_non_record_payloads() {
        let err = read_records(Cursor::new("42")).expect_err("not a record");
        assert!(matches!(err, AppError::Input(_)));
    }

    #[test]
    fn repository_update_requires_existing_entry() {
        let repository = InMemoryBusinessRepository::default();
        let entry = BusinessEntry {
            id: BusinessId("biz-x".to_string()),
            business: BusinessRecord::default(),
            status: BusinessStatus::Registered,
            completion: None,
            scored_at: None,
        };

        assert!(matches!(
            repository.update(entry.clone()),
            Err(RepositoryError::NotFound)
        ));
        repository.insert(entry.clone()).expect("insert succeeds");
        assert!(matches!(
            repository.insert(entry),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn notifier_records_reminders_from_service() {
        let repository = Arc::new(InMemoryBusinessRepository::default());
        let notifier = Arc::new(InMemoryVerificationNotifier::default());
        let service = BusinessCompletionService::new(repository, notifier.clone());

        let record: BusinessRecord = serde_json::from_value(serde_json::json!({
            "businessName": "Acme Agro",
            "businessDescription": "Grain storage",
            "typeOfIncorporation": "sole-proprietorship",
            "sector": "Agriculture",
            "country": "Kenya",
            "city": "Nakuru",
            "postalCode": "20100",
            "averageAnnualTurnover": 500000,
            "averageMonthlyTurnover": 42000,
            "yearOfRegistration": 2018,
            "street1": "Kenyatta Avenue",
            "previousLoans": true,
            "documents": [
                { "docType": "BUSINESS_REGISTRATION" },
                { "docType": "TAX_REGISTRATION_DOCUMENT" },
                { "docType": "BUSINESS_PERMIT" },
                { "docType": "ANNUAL_BANK_STATEMENT" }
            ]
        }))
        .expect("record parses");

        let entry = service.register(record).expect("registered");
        let report = service.score(&entry.id).expect("scored");

        assert_eq!(report.result.completion_percentage, 93);
        assert!(report.result.is_verification_pending);
        assert_eq!(notifier.events().len(), 1);
    }
}
