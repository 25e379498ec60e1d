//! Identifier lookups for the numbering engine.

use madrasah_core::numbering::{
    IdentifierKind, IdentifierRepository as IdentifierRepoTrait, NumberingError,
};
use madrasah_shared::TenantId;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect,
};
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::{employees, guardians, students};
use crate::rls::RlsConnection;

/// Unique constraint guarding the identifier column of `kind`.
#[must_use]
pub const fn identifier_constraint(kind: IdentifierKind) -> &'static str {
    match kind {
        IdentifierKind::Student => "uq_students_tenant_admission",
        IdentifierKind::Guardian => "uq_guardians_tenant_number",
        IdentifierKind::Employee => "uq_employees_tenant_number",
    }
}

/// Maps an insert failure of a record carrying `identifier`.
///
/// A violation of the kind's identifier constraint becomes the retryable
/// `NumberingError::Conflict`.
#[must_use]
pub fn map_identifier_insert_error(
    err: &DbErr,
    kind: IdentifierKind,
    identifier: &str,
) -> NumberingError {
    if is_unique_violation(err, identifier_constraint(kind)) {
        NumberingError::Conflict(identifier.to_string())
    } else {
        NumberingError::repository(err)
    }
}

/// Identifier repository over the student, guardian and employee tables.
#[derive(Debug, Clone)]
pub struct IdentifierRepository {
    db: DatabaseConnection,
}

impl IdentifierRepository {
    /// Creates a new identifier repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl IdentifierRepoTrait for IdentifierRepository {
    async fn identifiers_with_prefix(
        &self,
        tenant_id: TenantId,
        kind: IdentifierKind,
        prefix: &str,
    ) -> Result<Vec<String>, NumberingError> {
        let rls = RlsConnection::new(&self.db, tenant_id)
            .await
            .map_err(NumberingError::repository)?;
        let txn = rls.transaction();
        let tenant = tenant_id.into_inner();

        let identifiers = match kind {
            IdentifierKind::Student => {
                prefixed::<students::Entity>(
                    txn,
                    students::Column::TenantId,
                    students::Column::AdmissionNumber,
                    tenant,
                    prefix,
                )
                .await
            }
            IdentifierKind::Guardian => {
                prefixed::<guardians::Entity>(
                    txn,
                    guardians::Column::TenantId,
                    guardians::Column::GuardianNumber,
                    tenant,
                    prefix,
                )
                .await
            }
            IdentifierKind::Employee => {
                prefixed::<employees::Entity>(
                    txn,
                    employees::Column::TenantId,
                    employees::Column::EmployeeNumber,
                    tenant,
                    prefix,
                )
                .await
            }
        }
        .map_err(NumberingError::repository)?;

        rls.commit().await.map_err(NumberingError::repository)?;
        Ok(identifiers)
    }

    async fn identifier_exists(
        &self,
        tenant_id: TenantId,
        kind: IdentifierKind,
        value: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, NumberingError> {
        let rls = RlsConnection::new(&self.db, tenant_id)
            .await
            .map_err(NumberingError::repository)?;
        let txn = rls.transaction();
        let tenant = tenant_id.into_inner();

        let matches = match kind {
            IdentifierKind::Student => {
                count_matching::<students::Entity>(
                    txn,
                    [
                        students::Column::TenantId,
                        students::Column::AdmissionNumber,
                        students::Column::Id,
                    ],
                    tenant,
                    value,
                    exclude_id,
                )
                .await
            }
            IdentifierKind::Guardian => {
                count_matching::<guardians::Entity>(
                    txn,
                    [
                        guardians::Column::TenantId,
                        guardians::Column::GuardianNumber,
                        guardians::Column::Id,
                    ],
                    tenant,
                    value,
                    exclude_id,
                )
                .await
            }
            IdentifierKind::Employee => {
                count_matching::<employees::Entity>(
                    txn,
                    [
                        employees::Column::TenantId,
                        employees::Column::EmployeeNumber,
                        employees::Column::Id,
                    ],
                    tenant,
                    value,
                    exclude_id,
                )
                .await
            }
        }
        .map_err(NumberingError::repository)?;

        rls.commit().await.map_err(NumberingError::repository)?;
        Ok(matches > 0)
    }
}

async fn prefixed<E: EntityTrait>(
    txn: &DatabaseTransaction,
    tenant_column: E::Column,
    identifier_column: E::Column,
    tenant_id: Uuid,
    prefix: &str,
) -> Result<Vec<String>, DbErr> {
    E::find()
        .select_only()
        .column(identifier_column)
        .filter(tenant_column.eq(tenant_id))
        .filter(identifier_column.starts_with(prefix))
        .into_tuple::<String>()
        .all(txn)
        .await
}

/// Counts records using `value`; columns are `[tenant, identifier, id]`.
async fn count_matching<E>(
    txn: &DatabaseTransaction,
    [tenant_column, identifier_column, id_column]: [E::Column; 3],
    tenant_id: Uuid,
    value: &str,
    exclude_id: Option<Uuid>,
) -> Result<u64, DbErr>
where
    E: EntityTrait,
    E::Model: Sync,
{
    let mut query = E::find()
        .filter(tenant_column.eq(tenant_id))
        .filter(identifier_column.eq(value));

    if let Some(id) = exclude_id {
        query = query.filter(id_column.ne(id));
    }

    query.count(txn).await
}
