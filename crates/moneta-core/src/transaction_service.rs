//! Business logic helpers for managing transactions.

use uuid::Uuid;

use moneta_domain::Transaction;

use crate::error::{CoreError, CoreResult};
use crate::storage::{Store, TransactionFilter};

/// Validated CRUD over user transactions.
pub struct TransactionService;

impl TransactionService {
    pub fn create(store: &dyn Store, transaction: Transaction) -> CoreResult<Transaction> {
        Self::validate(store, &transaction)?;
        store.insert_transaction(&transaction)?;
        Ok(transaction)
    }

    pub fn get(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<Transaction> {
        load_owned(store, user_id, id)
    }

    /// Replaces the stored transaction identified by `changes.id`.
    pub fn update(store: &dyn Store, user_id: Uuid, changes: Transaction) -> CoreResult<Transaction> {
        let existing = load_owned(store, user_id, changes.id)?;
        if changes.user_id != existing.user_id {
            return Err(CoreError::validation("transaction owner cannot change"));
        }
        Self::validate(store, &changes)?;
        store.update_transaction(&changes)?;
        Ok(changes)
    }

    pub fn delete(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<Transaction> {
        let existing = load_owned(store, user_id, id)?;
        store.delete_transaction(id)?;
        Ok(existing)
    }

    /// Transactions matching the filter, ordered by date descending.
    pub fn list(
        store: &dyn Store,
        user_id: Uuid,
        filter: &TransactionFilter,
    ) -> CoreResult<Vec<Transaction>> {
        store.transactions(user_id, filter)
    }

    fn validate(store: &dyn Store, transaction: &Transaction) -> CoreResult<()> {
        if transaction.amount <= 0.0 {
            return Err(CoreError::validation("transaction amount must be positive"));
        }
        let category = store
            .category(transaction.category_id)?
            .ok_or(CoreError::CategoryNotFound(transaction.category_id))?;
        if category.user_id != transaction.user_id {
            return Err(CoreError::forbidden("category belongs to another user"));
        }
        Ok(())
    }
}

fn load_owned(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<Transaction> {
    let txn = store
        .transaction(id)?
        .ok_or(CoreError::TransactionNotFound(id))?;
    if txn.user_id != user_id {
        return Err(CoreError::forbidden("transaction belongs to another user"));
    }
    Ok(txn)
}
