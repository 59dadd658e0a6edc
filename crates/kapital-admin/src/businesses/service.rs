use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::completion::{CompletionReport, CompletionScorer};
use super::domain::{BusinessId, BusinessRecord};
use super::repository::{
    BusinessEntry, BusinessRepository, BusinessStatus, NotifierError, RepositoryError,
    VerificationNotifier, VerificationReminder,
};

const DEFAULT_QUEUE_LIMIT: usize = 50;
const VERIFICATION_TEMPLATE: &str = "verify_email_reminder";

/// Service composing the completion scorer, repository, and notifier.
pub struct BusinessCompletionService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    scorer: CompletionScorer,
    queue_limit: usize,
    sequence: AtomicU64,
}

impl<R, N> BusinessCompletionService<R, N>
where
    R: BusinessRepository + 'static,
    N: VerificationNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
            scorer: CompletionScorer::new(),
            queue_limit: DEFAULT_QUEUE_LIMIT,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_business_id(&self) -> BusinessId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        BusinessId(format!("biz-{id:06}"))
    }

    /// Override the page size used when callers do not pass one. Zero is ignored.
    pub fn with_queue_limit(mut self, limit: usize) -> Self {
        if limit > 0 {
            self.queue_limit = limit;
        }
        self
    }

    pub fn queue_limit(&self) -> usize {
        self.queue_limit
    }

    /// Store a business, assigning an id when the record carries none.
    ///
    /// Generated ids skip any id already stored; a supplied duplicate is a
    /// conflict.
    pub fn register(
        &self,
        mut business: BusinessRecord,
    ) -> Result<BusinessEntry, BusinessServiceError> {
        if let Some(id) = business.id.clone() {
            return self.insert_registered(id, business);
        }

        let mut id = self.next_business_id();
        while self.repository.fetch(&id)?.is_some() {
            debug!(business_id = %id, "generated business id already taken, skipping");
            id = self.next_business_id();
        }
        business.id = Some(id.clone());
        self.insert_registered(id, business)
    }

    fn insert_registered(
        &self,
        id: BusinessId,
        business: BusinessRecord,
    ) -> Result<BusinessEntry, BusinessServiceError> {
        let entry = BusinessEntry {
            id,
            business,
            status: BusinessStatus::Registered,
            completion: None,
            scored_at: None,
        };

        let stored = self.repository.insert(entry)?;
        debug!(business_id = %stored.id, "business registered");
        Ok(stored)
    }

    /// Score a stored business and persist the report.
    pub fn score(&self, business_id: &BusinessId) -> Result<CompletionReport, BusinessServiceError> {
        let mut entry = self
            .repository
            .fetch(business_id)?
            .ok_or(RepositoryError::NotFound)?;

        let report = self.scorer.assess(&entry.business);
        let pending = report.result.is_verification_pending;

        entry.status = if pending {
            BusinessStatus::VerificationPending
        } else {
            BusinessStatus::Scored
        };
        entry.completion = Some(report.clone());
        entry.scored_at = Some(Utc::now());
        let business_name = entry.business.business_name().map(str::to_string);

        self.repository.update(entry)?;

        info!(
            business_id = %business_id,
            completion = report.result.completion_percentage,
            pending,
            "business completion scored"
        );

        if pending {
            let mut details = BTreeMap::new();
            details.insert(
                "completion_percentage".to_string(),
                report.result.completion_percentage.to_string(),
            );
            if let Some(name) = business_name {
                details.insert("business_name".to_string(), name);
            }
            self.notifier.publish(VerificationReminder {
                template: VERIFICATION_TEMPLATE.to_string(),
                business_id: business_id.clone(),
                details,
            })?;
            info!(business_id = %business_id, "email verification reminder published");
        }

        Ok(report)
    }

    /// Score a record without storing it.
    pub fn assess(&self, business: &BusinessRecord) -> CompletionReport {
        self.scorer.assess(business)
    }

    pub fn get(&self, business_id: &BusinessId) -> Result<BusinessEntry, BusinessServiceError> {
        let entry = self
            .repository
            .fetch(business_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(entry)
    }

    /// Businesses awaiting email verification, capped at `limit` or the
    /// configured default.
    pub fn verification_queue(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<BusinessEntry>, BusinessServiceError> {
        let limit = limit.filter(|limit| *limit > 0).unwrap_or(self.queue_limit);
        let entries = self.repository.verification_pending(limit)?;
        Ok(entries)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BusinessServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notifier(#[from] NotifierError),
}
