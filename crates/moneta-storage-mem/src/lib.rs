//! In-memory `Store` backend.
//!
//! Reference implementation of the persistence contract, used by tests and
//! by embedders that do not bring their own database. All interior state
//! sits behind one `RwLock`; the plan-replacement batch performs its
//! delete-and-insert under a single write guard, so readers never observe a
//! partial swap.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use moneta_core::storage::{Store, TransactionFilter};
use moneta_core::CoreError;
use moneta_domain::{
    Bill, Budget, Category, CategoryAllocation, Identifiable, PlanItem, PlanType, SavingsGoal,
    Transaction,
};

#[derive(Default)]
struct Inner {
    transactions: HashMap<Uuid, Transaction>,
    categories: HashMap<Uuid, Category>,
    budgets: HashMap<Uuid, Budget>,
    allocations: HashMap<Uuid, CategoryAllocation>,
    bills: HashMap<Uuid, Bill>,
    goals: HashMap<Uuid, SavingsGoal>,
    plan_items: HashMap<Uuid, PlanItem>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, CoreError> {
        self.inner
            .read()
            .map_err(|_| CoreError::Storage("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, CoreError> {
        self.inner
            .write()
            .map_err(|_| CoreError::Storage("store lock poisoned".into()))
    }
}

fn missing(entity: &str, id: Uuid) -> CoreError {
    CoreError::Storage(format!("{entity} {id} does not exist"))
}

/// Update-by-id semantics: replacing a row that was never inserted is a
/// backend error.
fn replace_existing<T: Identifiable + Clone>(
    map: &mut HashMap<Uuid, T>,
    row: &T,
    entity: &str,
) -> Result<(), CoreError> {
    if !map.contains_key(&row.id()) {
        return Err(missing(entity, row.id()));
    }
    map.insert(row.id(), row.clone());
    Ok(())
}

impl Store for MemoryStore {
    fn transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, CoreError> {
        let inner = self.read()?;
        let mut rows: Vec<Transaction> = inner
            .transactions
            .values()
            .filter(|txn| txn.user_id == user_id && filter.matches(txn))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    fn transaction(&self, id: Uuid) -> Result<Option<Transaction>, CoreError> {
        Ok(self.read()?.transactions.get(&id).cloned())
    }

    fn insert_transaction(&self, txn: &Transaction) -> Result<(), CoreError> {
        self.write()?.transactions.insert(txn.id, txn.clone());
        Ok(())
    }

    fn update_transaction(&self, txn: &Transaction) -> Result<(), CoreError> {
        replace_existing(&mut self.write()?.transactions, txn, "transaction")
    }

    fn delete_transaction(&self, id: Uuid) -> Result<(), CoreError> {
        self.write()?
            .transactions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("transaction", id))
    }

    fn categories(&self, user_id: Uuid) -> Result<Vec<Category>, CoreError> {
        let inner = self.read()?;
        let mut rows: Vec<Category> = inner
            .categories
            .values()
            .filter(|category| category.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    fn category(&self, id: Uuid) -> Result<Option<Category>, CoreError> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    fn insert_category(&self, category: &Category) -> Result<(), CoreError> {
        self.write()?.categories.insert(category.id, category.clone());
        Ok(())
    }

    fn update_category(&self, category: &Category) -> Result<(), CoreError> {
        replace_existing(&mut self.write()?.categories, category, "category")
    }

    fn delete_category(&self, id: Uuid) -> Result<(), CoreError> {
        self.write()?
            .categories
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("category", id))
    }

    fn budgets(&self, user_id: Uuid) -> Result<Vec<Budget>, CoreError> {
        let inner = self.read()?;
        let mut rows: Vec<Budget> = inner
            .budgets
            .values()
            .filter(|budget| budget.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    fn budget(&self, id: Uuid) -> Result<Option<Budget>, CoreError> {
        Ok(self.read()?.budgets.get(&id).cloned())
    }

    fn insert_budget(&self, budget: &Budget) -> Result<(), CoreError> {
        self.write()?.budgets.insert(budget.id, budget.clone());
        Ok(())
    }

    fn update_budget(&self, budget: &Budget) -> Result<(), CoreError> {
        replace_existing(&mut self.write()?.budgets, budget, "budget")
    }

    fn delete_budget(&self, id: Uuid) -> Result<(), CoreError> {
        let mut inner = self.write()?;
        inner
            .budgets
            .remove(&id)
            .ok_or_else(|| missing("budget", id))?;
        inner.allocations.retain(|_, allocation| allocation.budget_id != id);
        Ok(())
    }

    fn allocations(&self, budget_id: Uuid) -> Result<Vec<CategoryAllocation>, CoreError> {
        let inner = self.read()?;
        let mut rows: Vec<CategoryAllocation> = inner
            .allocations
            .values()
            .filter(|allocation| allocation.budget_id == budget_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.category_id.cmp(&b.category_id));
        Ok(rows)
    }

    fn upsert_allocation(&self, allocation: &CategoryAllocation) -> Result<(), CoreError> {
        let mut inner = self.write()?;
        inner.allocations.retain(|_, existing| {
            !(existing.budget_id == allocation.budget_id
                && existing.category_id == allocation.category_id)
        });
        inner.allocations.insert(allocation.id, allocation.clone());
        Ok(())
    }

    fn delete_allocation(&self, budget_id: Uuid, category_id: Uuid) -> Result<bool, CoreError> {
        let mut inner = self.write()?;
        let before = inner.allocations.len();
        inner.allocations.retain(|_, allocation| {
            !(allocation.budget_id == budget_id && allocation.category_id == category_id)
        });
        Ok(inner.allocations.len() < before)
    }

    fn bills(&self, user_id: Uuid) -> Result<Vec<Bill>, CoreError> {
        let inner = self.read()?;
        let mut rows: Vec<Bill> = inner
            .bills
            .values()
            .filter(|bill| bill.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    fn bill(&self, id: Uuid) -> Result<Option<Bill>, CoreError> {
        Ok(self.read()?.bills.get(&id).cloned())
    }

    fn insert_bill(&self, bill: &Bill) -> Result<(), CoreError> {
        self.write()?.bills.insert(bill.id, bill.clone());
        Ok(())
    }

    fn update_bill(&self, bill: &Bill) -> Result<(), CoreError> {
        replace_existing(&mut self.write()?.bills, bill, "bill")
    }

    fn delete_bill(&self, id: Uuid) -> Result<(), CoreError> {
        self.write()?
            .bills
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("bill", id))
    }

    fn goals(&self, user_id: Uuid) -> Result<Vec<SavingsGoal>, CoreError> {
        let inner = self.read()?;
        let mut rows: Vec<SavingsGoal> = inner
            .goals
            .values()
            .filter(|goal| goal.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    fn goal(&self, id: Uuid) -> Result<Option<SavingsGoal>, CoreError> {
        Ok(self.read()?.goals.get(&id).cloned())
    }

    fn insert_goal(&self, goal: &SavingsGoal) -> Result<(), CoreError> {
        self.write()?.goals.insert(goal.id, goal.clone());
        Ok(())
    }

    fn update_goal(&self, goal: &SavingsGoal) -> Result<(), CoreError> {
        replace_existing(&mut self.write()?.goals, goal, "goal")
    }

    fn delete_goal(&self, id: Uuid) -> Result<(), CoreError> {
        self.write()?
            .goals
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("goal", id))
    }

    fn plan_items(
        &self,
        user_id: Uuid,
        plan_type: Option<PlanType>,
    ) -> Result<Vec<PlanItem>, CoreError> {
        let inner = self.read()?;
        let mut rows: Vec<PlanItem> = inner
            .plan_items
            .values()
            .filter(|item| {
                item.user_id == user_id && plan_type.map_or(true, |pt| item.plan_type == pt)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    fn replace_plan_items(
        &self,
        user_id: Uuid,
        plan_type: PlanType,
        items: &[PlanItem],
    ) -> Result<(), CoreError> {
        // A rejected batch must leave the prior item set untouched: validate
        // everything before the first mutation.
        for item in items {
            if item.user_id != user_id || item.plan_type != plan_type {
                return Err(CoreError::Storage(
                    "replacement batch contains items outside the target plan".into(),
                ));
            }
        }
        let mut inner = self.write()?;
        inner
            .plan_items
            .retain(|_, item| !(item.user_id == user_id && item.plan_type == plan_type));
        for item in items {
            inner.plan_items.insert(item.id, item.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Utc};
    use moneta_domain::{PlanItemType, TransactionKind};

    #[test]
    fn transactions_come_back_newest_first() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let category = Uuid::new_v4();
        for day in [3, 1, 2] {
            let date = Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap();
            store
                .insert_transaction(&Transaction::new(
                    user,
                    10.0,
                    TransactionKind::Expense,
                    date,
                    category,
                ))
                .unwrap();
        }
        let rows = store
            .transactions(user, &TransactionFilter::default())
            .unwrap();
        let days: Vec<u32> = rows
            .iter()
            .map(|txn| txn.date.date_naive().day())
            .collect();
        assert_eq!(days, vec![3, 2, 1]);
    }

    #[test]
    fn rejected_replacement_leaves_previous_plan_intact() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let original = PlanItem::new(
            user,
            "Rent",
            1200.0,
            PlanType::Monthly,
            PlanItemType::Expense,
            created,
        );
        store
            .replace_plan_items(user, PlanType::Monthly, &[original.clone()])
            .unwrap();

        // batch contains a foreign item: whole replacement is rejected
        let foreign = PlanItem::new(
            Uuid::new_v4(),
            "Other",
            1.0,
            PlanType::Monthly,
            PlanItemType::Expense,
            created,
        );
        let err = store
            .replace_plan_items(user, PlanType::Monthly, &[foreign])
            .unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));

        let remaining = store.plan_items(user, Some(PlanType::Monthly)).unwrap();
        assert_eq!(remaining, vec![original]);
    }

    #[test]
    fn upsert_allocation_replaces_the_pair_row() {
        let store = MemoryStore::new();
        let budget_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        store
            .upsert_allocation(&CategoryAllocation::new(budget_id, category_id, 100.0))
            .unwrap();
        store
            .upsert_allocation(&CategoryAllocation::new(budget_id, category_id, 150.0))
            .unwrap();
        let rows = store.allocations(budget_id).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 150.0);
    }
}
