//! Identifier allocation service.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use madrasah_shared::{NumberingConfig, TenantId};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::error::NumberingError;
use super::types::{IdentifierKind, SequenceScope};

/// Repository trait for identifier lookups.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait IdentifierRepository: Send + Sync {
    /// Returns every identifier of `kind` in the tenant that starts with `prefix`.
    fn identifiers_with_prefix(
        &self,
        tenant_id: TenantId,
        kind: IdentifierKind,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<String>, NumberingError>> + Send;

    /// Returns true if a record of `kind` other than `exclude_id` already uses `value`.
    fn identifier_exists(
        &self,
        tenant_id: TenantId,
        kind: IdentifierKind,
        value: &str,
        exclude_id: Option<Uuid>,
    ) -> impl Future<Output = Result<bool, NumberingError>> + Send;
}

/// Generates and allocates sequence identifiers.
///
/// Counters are derived from the highest identifier already stored, so two
/// writers can compute the same value. `allocate` serialises writers of one
/// scope inside this process and retries when the store still reports a
/// conflict (another process won the race). A scope's lock lives only while
/// an allocation in that scope is running.
pub struct NumberingService<R: IdentifierRepository> {
    repo: Arc<R>,
    locks: DashMap<String, Arc<Mutex<()>>>,
    max_attempts: u32,
}

impl<R: IdentifierRepository> NumberingService<R> {
    /// Creates a new numbering service.
    #[must_use]
    pub fn new(repo: Arc<R>, config: &NumberingConfig) -> Self {
        Self {
            repo,
            locks: DashMap::new(),
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Returns the identifier the next record of `kind` would receive.
    ///
    /// This is a preview: nothing is reserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository lookup fails or the counter overflows.
    pub async fn generate(
        &self,
        tenant_id: TenantId,
        kind: IdentifierKind,
        date: NaiveDate,
    ) -> Result<String, NumberingError> {
        let scope = SequenceScope::for_kind(kind, date);
        self.next_in_scope(tenant_id, kind, &scope).await
    }

    /// Checks that `value` is not used by any record of `kind` except `exclude_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository lookup fails.
    pub async fn is_unique(
        &self,
        tenant_id: TenantId,
        kind: IdentifierKind,
        value: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, NumberingError> {
        let exists = self
            .repo
            .identifier_exists(tenant_id, kind, value, exclude_id)
            .await?;
        Ok(!exists)
    }

    /// Generates an identifier and hands it to `persist`, retrying on conflict.
    ///
    /// `persist` must insert the record carrying the identifier and return
    /// `NumberingError::Conflict` when the store rejects it as a duplicate.
    ///
    /// # Errors
    ///
    /// Returns the last conflict once `max_attempts` is exhausted, or the
    /// first non-retryable error.
    pub async fn allocate<T, F, Fut>(
        &self,
        tenant_id: TenantId,
        kind: IdentifierKind,
        date: NaiveDate,
        persist: F,
    ) -> Result<T, NumberingError>
    where
        F: FnMut(String) -> Fut + Send,
        Fut: Future<Output = Result<T, NumberingError>> + Send,
    {
        let scope = SequenceScope::for_kind(kind, date);
        let key = format!("{tenant_id}:{scope}");
        let lock = self.locks.entry(key.clone()).or_default().clone();

        let result = {
            let _guard = lock.lock().await;
            self.allocate_in_scope(tenant_id, kind, &scope, persist).await
        };

        // Evict idle scopes; a waiter still holds its own clone of the lock.
        drop(lock);
        self.locks.remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    async fn allocate_in_scope<T, F, Fut>(
        &self,
        tenant_id: TenantId,
        kind: IdentifierKind,
        scope: &SequenceScope,
        mut persist: F,
    ) -> Result<T, NumberingError>
    where
        F: FnMut(String) -> Fut + Send,
        Fut: Future<Output = Result<T, NumberingError>> + Send,
    {
        let mut attempt = 1;
        loop {
            let identifier = self.next_in_scope(tenant_id, kind, scope).await?;

            match persist(identifier.clone()).await {
                Ok(value) => {
                    tracing::debug!(
                        tenant_id = %tenant_id,
                        identifier = %identifier,
                        attempt,
                        "Identifier allocated"
                    );
                    return Ok(value);
                }
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    tracing::warn!(
                        tenant_id = %tenant_id,
                        identifier = %identifier,
                        attempt,
                        "Identifier conflict, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Number of scopes with an allocation in flight.
    #[cfg(test)]
    pub(crate) fn active_scopes(&self) -> usize {
        self.locks.len()
    }

    async fn next_in_scope(
        &self,
        tenant_id: TenantId,
        kind: IdentifierKind,
        scope: &SequenceScope,
    ) -> Result<String, NumberingError> {
        let existing = self
            .repo
            .identifiers_with_prefix(tenant_id, kind, &scope.pattern_prefix())
            .await?;
        scope.next_identifier(&existing)
    }
}
