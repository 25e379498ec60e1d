//! Numbering service tests against an in-memory identifier store.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use madrasah_shared::{NumberingConfig, TenantId};
use proptest::prelude::*;
use uuid::Uuid;

use super::error::NumberingError;
use super::service::{IdentifierRepository, NumberingService};
use super::types::{IdentifierKind, SequenceScope};

#[derive(Debug, Clone)]
struct StoredIdentifier {
    tenant_id: TenantId,
    kind: IdentifierKind,
    record_id: Uuid,
    value: String,
}

/// In-memory store enforcing per-tenant uniqueness like the database does.
#[derive(Default)]
struct MemoryIdentifierStore {
    rows: Mutex<Vec<StoredIdentifier>>,
}

impl MemoryIdentifierStore {
    fn insert(
        &self,
        tenant_id: TenantId,
        kind: IdentifierKind,
        value: &str,
    ) -> Result<Uuid, NumberingError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.tenant_id == tenant_id && r.kind == kind && r.value == value)
        {
            return Err(NumberingError::Conflict(value.to_string()));
        }
        let record_id = Uuid::new_v4();
        rows.push(StoredIdentifier {
            tenant_id,
            kind,
            record_id,
            value: value.to_string(),
        });
        Ok(record_id)
    }

    fn values(&self, tenant_id: TenantId, kind: IdentifierKind) -> Vec<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.tenant_id == tenant_id && r.kind == kind)
            .map(|r| r.value.clone())
            .collect()
    }
}

impl IdentifierRepository for MemoryIdentifierStore {
    async fn identifiers_with_prefix(
        &self,
        tenant_id: TenantId,
        kind: IdentifierKind,
        prefix: &str,
    ) -> Result<Vec<String>, NumberingError> {
        Ok(self
            .values(tenant_id, kind)
            .into_iter()
            .filter(|v| v.starts_with(prefix))
            .collect())
    }

    async fn identifier_exists(
        &self,
        tenant_id: TenantId,
        kind: IdentifierKind,
        value: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, NumberingError> {
        Ok(self.rows.lock().unwrap().iter().any(|r| {
            r.tenant_id == tenant_id
                && r.kind == kind
                && r.value == value
                && Some(r.record_id) != exclude_id
        }))
    }
}

fn service(store: &Arc<MemoryIdentifierStore>, max_attempts: u32) -> NumberingService<MemoryIdentifierStore> {
    NumberingService::new(Arc::clone(store), &NumberingConfig { max_attempts })
}

fn day(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 8, 1).unwrap()
}

#[tokio::test]
async fn test_generate_first_identifier_for_year() {
    let store = Arc::new(MemoryIdentifierStore::default());
    let numbering = service(&store, 3);

    let id = numbering
        .generate(TenantId::new(), IdentifierKind::Student, day(2025))
        .await
        .unwrap();
    assert_eq!(id, "STU-25-001");
}

#[tokio::test]
async fn test_allocate_is_gapless_and_increasing() {
    let store = Arc::new(MemoryIdentifierStore::default());
    let numbering = service(&store, 3);
    let tenant = TenantId::new();

    let mut allocated = Vec::new();
    for _ in 0..12 {
        let value = numbering
            .allocate(tenant, IdentifierKind::Employee, day(2025), |candidate| {
                let store = Arc::clone(&store);
                async move {
                    store.insert(tenant, IdentifierKind::Employee, &candidate)?;
                    Ok(candidate)
                }
            })
            .await
            .unwrap();
        allocated.push(value);
    }

    let expected: Vec<String> = (1..=12).map(|n| format!("EMP-25-{n:03}")).collect();
    assert_eq!(allocated, expected);
}

#[tokio::test]
async fn test_counters_partitioned_by_tenant_and_year() {
    let store = Arc::new(MemoryIdentifierStore::default());
    let numbering = service(&store, 3);
    let tenant_a = TenantId::new();
    let tenant_b = TenantId::new();

    store.insert(tenant_a, IdentifierKind::Guardian, "PAR-25-007").unwrap();
    store.insert(tenant_a, IdentifierKind::Guardian, "PAR-24-040").unwrap();

    let next_a = numbering
        .generate(tenant_a, IdentifierKind::Guardian, day(2025))
        .await
        .unwrap();
    let next_b = numbering
        .generate(tenant_b, IdentifierKind::Guardian, day(2025))
        .await
        .unwrap();
    let next_a_2026 = numbering
        .generate(tenant_a, IdentifierKind::Guardian, day(2026))
        .await
        .unwrap();

    assert_eq!(next_a, "PAR-25-008");
    assert_eq!(next_b, "PAR-25-001");
    assert_eq!(next_a_2026, "PAR-26-001");
}

#[tokio::test]
async fn test_malformed_existing_identifier_does_not_fail() {
    let store = Arc::new(MemoryIdentifierStore::default());
    let numbering = service(&store, 3);
    let tenant = TenantId::new();
    store.insert(tenant, IdentifierKind::Student, "STU-25-X").unwrap();

    let id = numbering
        .generate(tenant, IdentifierKind::Student, day(2025))
        .await
        .unwrap();
    assert_eq!(id, "STU-25-001");
}

#[tokio::test]
async fn test_allocate_retries_after_concurrent_insert() {
    let store = Arc::new(MemoryIdentifierStore::default());
    let numbering = service(&store, 3);
    let tenant = TenantId::new();
    let mut raced = false;

    let value = numbering
        .allocate(tenant, IdentifierKind::Student, day(2025), |candidate| {
            let store = Arc::clone(&store);
            // Another process grabs the candidate right before our first insert.
            let race = !raced;
            raced = true;
            async move {
                if race {
                    store.insert(tenant, IdentifierKind::Student, &candidate)?;
                }
                store.insert(tenant, IdentifierKind::Student, &candidate)?;
                Ok(candidate)
            }
        })
        .await
        .unwrap();

    assert_eq!(value, "STU-25-002");
    assert_eq!(store.values(tenant, IdentifierKind::Student).len(), 2);
}

#[tokio::test]
async fn test_allocate_gives_up_after_max_attempts() {
    let store = Arc::new(MemoryIdentifierStore::default());
    let numbering = service(&store, 2);
    let mut calls = 0;

    let result: Result<String, _> = numbering
        .allocate(TenantId::new(), IdentifierKind::Student, day(2025), |candidate| {
            calls += 1;
            async move { Err(NumberingError::Conflict(candidate)) }
        })
        .await;

    assert!(matches!(result, Err(NumberingError::Conflict(_))));
    assert_eq!(calls, 2);
}

#[tokio::test]
async fn test_allocate_does_not_retry_other_errors() {
    let store = Arc::new(MemoryIdentifierStore::default());
    let numbering = service(&store, 5);
    let mut calls = 0;

    let result: Result<String, _> = numbering
        .allocate(TenantId::new(), IdentifierKind::Student, day(2025), |_| {
            calls += 1;
            async move { Err(NumberingError::repository("connection reset")) }
        })
        .await;

    assert!(matches!(result, Err(NumberingError::Repository(_))));
    assert_eq!(calls, 1);
}

#[tokio::test]
async fn test_concurrent_allocations_are_unique() {
    let store = Arc::new(MemoryIdentifierStore::default());
    let numbering = Arc::new(service(&store, 3));
    let tenant = TenantId::new();

    let tasks = (0..25).map(|_| {
        let numbering = Arc::clone(&numbering);
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            numbering
                .allocate(tenant, IdentifierKind::Student, day(2025), move |candidate| {
                    let store = Arc::clone(&store);
                    async move {
                        tokio::task::yield_now().await;
                        store.insert(tenant, IdentifierKind::Student, &candidate)?;
                        Ok(candidate)
                    }
                })
                .await
        })
    });

    let mut values: Vec<String> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();
    values.sort();

    let expected: Vec<String> = (1..=25).map(|n| format!("STU-25-{n:03}")).collect();
    assert_eq!(values, expected);
    assert_eq!(numbering.active_scopes(), 0);
}

#[tokio::test]
async fn test_scope_locks_are_released_after_allocation() {
    let store = Arc::new(MemoryIdentifierStore::default());
    let numbering = service(&store, 2);

    for year in 2020..2030 {
        let tenant = TenantId::new();
        numbering
            .allocate(tenant, IdentifierKind::Guardian, day(year), |candidate| {
                let store = Arc::clone(&store);
                async move {
                    store.insert(tenant, IdentifierKind::Guardian, &candidate)?;
                    Ok(candidate)
                }
            })
            .await
            .unwrap();
    }
    assert_eq!(numbering.active_scopes(), 0);

    // Failed allocations release their scope too.
    let result: Result<String, _> = numbering
        .allocate(TenantId::new(), IdentifierKind::Guardian, day(2025), |candidate| async move {
            Err(NumberingError::Conflict(candidate))
        })
        .await;
    assert!(result.is_err());
    assert_eq!(numbering.active_scopes(), 0);
}

#[tokio::test]
async fn test_is_unique_excludes_own_record() {
    let store = Arc::new(MemoryIdentifierStore::default());
    let numbering = service(&store, 3);
    let tenant = TenantId::new();
    let own_id = store
        .insert(tenant, IdentifierKind::Student, "STU-25-001")
        .unwrap();

    assert!(!numbering
        .is_unique(tenant, IdentifierKind::Student, "STU-25-001", None)
        .await
        .unwrap());
    assert!(numbering
        .is_unique(tenant, IdentifierKind::Student, "STU-25-001", Some(own_id))
        .await
        .unwrap());
    assert!(numbering
        .is_unique(TenantId::new(), IdentifierKind::Student, "STU-25-001", None)
        .await
        .unwrap());
}

proptest! {
    /// The next counter is always one past the highest well-formed counter in scope.
    #[test]
    fn prop_next_counter_is_max_plus_one(
        counters in proptest::collection::vec(1u32..100_000, 0..40),
    ) {
        let scope = SequenceScope::for_kind(IdentifierKind::Student, day(2025));
        let existing: Vec<String> = counters.iter().map(|c| scope.format(*c)).collect();

        let expected = counters.iter().copied().max().unwrap_or(0) + 1;
        prop_assert_eq!(scope.next_counter(&existing).unwrap(), expected);
    }

    /// Repeated allocation from an empty scope yields 1..=n with no gaps.
    #[test]
    fn prop_sequential_generation_is_gapless(n in 1usize..60) {
        let scope = SequenceScope::for_invoice(2025, 3);
        let mut existing: Vec<String> = Vec::new();
        for expected in 1..=n {
            let next = scope.next_identifier(&existing).unwrap();
            prop_assert_eq!(scope.parse_counter(&next) as usize, expected);
            existing.push(next);
        }
    }
}
