//! Row-Level Security (RLS) tenant context.
//!
//! Every tenant-owned table carries a `tenant_isolation` policy keyed on the
//! `app.current_tenant_id` setting. The setting is applied with `SET LOCAL`,
//! so it lives exactly as long as the transaction that set it.
//!
//! # Usage
//!
//! ```ignore
//! use madrasah_db::rls::RlsConnection;
//!
//! let rls = RlsConnection::new(&db, tenant_id).await?;
//! let guardians = guardians::Entity::find().all(rls.transaction()).await?;
//! rls.commit().await?;
//! ```

use madrasah_shared::TenantId;
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

/// A transaction with the tenant RLS context applied.
pub struct RlsConnection {
    txn: DatabaseTransaction,
}

impl RlsConnection {
    /// Begins a transaction and scopes it to `tenant_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the RLS
    /// context cannot be set.
    pub async fn new(db: &DatabaseConnection, tenant_id: TenantId) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        set_rls_context(&txn, tenant_id).await?;
        Ok(Self { txn })
    }

    /// Returns the underlying transaction for executing queries.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Unwraps the transaction, keeping the RLS context.
    #[must_use]
    pub fn into_transaction(self) -> DatabaseTransaction {
        self.txn
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

/// Builds the `SET LOCAL` statement for a tenant.
///
/// The value is a formatted UUID, so it cannot carry quotes.
#[must_use]
pub fn rls_context_sql(tenant_id: TenantId) -> String {
    format!("SET LOCAL app.current_tenant_id = '{tenant_id}'")
}

/// Sets the RLS context on an existing transaction.
///
/// # Errors
///
/// Returns an error if the RLS context cannot be set.
pub async fn set_rls_context(txn: &DatabaseTransaction, tenant_id: TenantId) -> Result<(), DbErr> {
    txn.execute_unprepared(&rls_context_sql(tenant_id)).await?;
    Ok(())
}
