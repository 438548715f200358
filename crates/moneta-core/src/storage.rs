//! Persistence contract consumed by the services.
//!
//! The backing store is an external collaborator; this trait describes the
//! only query shapes the core needs: find-many with filters and ordering,
//! find-one by id, create, update-by-id, delete-by-id, and one transactional
//! batch for plan replacement.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use moneta_domain::{
    Bill, Budget, Category, CategoryAllocation, DateWindow, PlanItem, PlanType, SavingsGoal,
    Transaction, TransactionKind,
};

use crate::CoreError;

/// Optional criteria for transaction listings. A clause is applied only when
/// its field is present.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<Uuid>,
    pub bill_id: Option<Uuid>,
}

impl TransactionFilter {
    pub fn window(window: &DateWindow) -> Self {
        Self {
            from: Some(window.start),
            to: Some(window.end),
            ..Self::default()
        }
    }

    pub fn expenses_in(window: &DateWindow) -> Self {
        Self {
            kind: Some(TransactionKind::Expense),
            ..Self::window(window)
        }
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(from) = self.from {
            if txn.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if txn.date > to {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if txn.kind != kind {
                return false;
            }
        }
        if let Some(category_id) = self.category_id {
            if txn.category_id != category_id {
                return false;
            }
        }
        if let Some(bill_id) = self.bill_id {
            if txn.bill_id != Some(bill_id) {
                return false;
            }
        }
        true
    }
}

/// Abstraction over persistence backends.
///
/// Find-one methods look up by id alone and return `None` for unknown ids;
/// ownership is the caller's concern. Find-many methods are scoped to one
/// user and return deterministic orderings: transactions by date descending,
/// bills by due date ascending, plan items by creation time ascending.
pub trait Store: Send + Sync {
    fn transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, CoreError>;
    fn transaction(&self, id: Uuid) -> Result<Option<Transaction>, CoreError>;
    fn insert_transaction(&self, txn: &Transaction) -> Result<(), CoreError>;
    fn update_transaction(&self, txn: &Transaction) -> Result<(), CoreError>;
    fn delete_transaction(&self, id: Uuid) -> Result<(), CoreError>;

    fn categories(&self, user_id: Uuid) -> Result<Vec<Category>, CoreError>;
    fn category(&self, id: Uuid) -> Result<Option<Category>, CoreError>;
    fn insert_category(&self, category: &Category) -> Result<(), CoreError>;
    fn update_category(&self, category: &Category) -> Result<(), CoreError>;
    fn delete_category(&self, id: Uuid) -> Result<(), CoreError>;

    fn budgets(&self, user_id: Uuid) -> Result<Vec<Budget>, CoreError>;
    fn budget(&self, id: Uuid) -> Result<Option<Budget>, CoreError>;
    fn insert_budget(&self, budget: &Budget) -> Result<(), CoreError>;
    fn update_budget(&self, budget: &Budget) -> Result<(), CoreError>;
    /// Also removes the budget's allocations; transactions are never cascaded.
    fn delete_budget(&self, id: Uuid) -> Result<(), CoreError>;
    fn allocations(&self, budget_id: Uuid) -> Result<Vec<CategoryAllocation>, CoreError>;
    /// Inserts, or replaces the existing row for the same `(budget, category)`.
    fn upsert_allocation(&self, allocation: &CategoryAllocation) -> Result<(), CoreError>;
    /// Returns whether a row existed.
    fn delete_allocation(&self, budget_id: Uuid, category_id: Uuid) -> Result<bool, CoreError>;

    fn bills(&self, user_id: Uuid) -> Result<Vec<Bill>, CoreError>;
    fn bill(&self, id: Uuid) -> Result<Option<Bill>, CoreError>;
    fn insert_bill(&self, bill: &Bill) -> Result<(), CoreError>;
    fn update_bill(&self, bill: &Bill) -> Result<(), CoreError>;
    fn delete_bill(&self, id: Uuid) -> Result<(), CoreError>;

    fn goals(&self, user_id: Uuid) -> Result<Vec<SavingsGoal>, CoreError>;
    fn goal(&self, id: Uuid) -> Result<Option<SavingsGoal>, CoreError>;
    fn insert_goal(&self, goal: &SavingsGoal) -> Result<(), CoreError>;
    fn update_goal(&self, goal: &SavingsGoal) -> Result<(), CoreError>;
    fn delete_goal(&self, id: Uuid) -> Result<(), CoreError>;

    fn plan_items(
        &self,
        user_id: Uuid,
        plan_type: Option<PlanType>,
    ) -> Result<Vec<PlanItem>, CoreError>;
    /// Atomic delete-all-then-insert-all for one `(user, plan type)` group.
    /// A failed replacement must leave the prior item set intact.
    fn replace_plan_items(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
        items: &[PlanItem],
    ) -> Result<(), CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn filter_clauses_apply_only_when_present() {
        let user = Uuid::new_v4();
        let category = Uuid::new_v4();
        let date = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let txn = Transaction::new(user, 25.0, TransactionKind::Expense, date, category);

        assert!(TransactionFilter::default().matches(&txn));
        assert!(TransactionFilter {
            kind: Some(TransactionKind::Expense),
            category_id: Some(category),
            ..Default::default()
        }
        .matches(&txn));
        assert!(!TransactionFilter {
            kind: Some(TransactionKind::Income),
            ..Default::default()
        }
        .matches(&txn));
        assert!(!TransactionFilter {
            to: Some(date - chrono::Duration::days(1)),
            ..Default::default()
        }
        .matches(&txn));
        // bill filter never matches a transaction without a bill link
        assert!(!TransactionFilter {
            bill_id: Some(Uuid::new_v4()),
            ..Default::default()
        }
        .matches(&txn));
    }
}
