use thiserror::Error;
use uuid::Uuid;

pub type CoreResult<T> = Result<T, CoreError>;

/// Terminal, caller-visible failures. None of these warrant a retry.
///
/// Ownership checks resolve the not-found variants before `Forbidden`:
/// existence first, then ownership.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),
    #[error("Budget not found: {0}")]
    BudgetNotFound(Uuid),
    #[error("No allocation for category {0}")]
    AllocationNotFound(Uuid),
    #[error("Bill not found: {0}")]
    BillNotFound(Uuid),
    #[error("Savings goal not found: {0}")]
    GoalNotFound(Uuid),
    #[error("Access denied: {0}")]
    Forbidden(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        CoreError::Forbidden(reason.into())
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        CoreError::Validation(reason.into())
    }
}
