//! Budget lifecycle and per-category allocations.

use serde::Serialize;
use uuid::Uuid;

use moneta_domain::{Budget, CategoryAllocation};

use crate::error::{CoreError, CoreResult};
use crate::storage::Store;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A budget together with its category allocations.
pub struct BudgetDetail {
    pub budget: Budget,
    pub allocations: Vec<CategoryAllocation>,
}

pub struct BudgetService;

impl BudgetService {
    pub fn create(store: &dyn Store, budget: Budget) -> CoreResult<Budget> {
        validate(&budget)?;
        store.insert_budget(&budget)?;
        Ok(budget)
    }

    pub fn get(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<BudgetDetail> {
        let budget = load_owned(store, user_id, id)?;
        let allocations = store.allocations(id)?;
        Ok(BudgetDetail {
            budget,
            allocations,
        })
    }

    pub fn update(store: &dyn Store, user_id: Uuid, changes: Budget) -> CoreResult<Budget> {
        load_owned(store, user_id, changes.id)?;
        validate(&changes)?;
        store.update_budget(&changes)?;
        Ok(changes)
    }

    /// Removes the budget and its allocations. Transactions are untouched.
    pub fn delete(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<()> {
        load_owned(store, user_id, id)?;
        store.delete_budget(id)
    }

    pub fn list(store: &dyn Store, user_id: Uuid) -> CoreResult<Vec<Budget>> {
        store.budgets(user_id)
    }

    /// Upserts the single allocation a category may hold within a budget.
    /// Zero amounts are allowed.
    pub fn set_allocation(
        store: &dyn Store,
        user_id: Uuid,
        budget_id: Uuid,
        category_id: Uuid,
        amount: f64,
    ) -> CoreResult<CategoryAllocation> {
        load_owned(store, user_id, budget_id)?;
        if amount < 0.0 {
            return Err(CoreError::validation("allocation amount must not be negative"));
        }
        let category = store
            .category(category_id)?
            .ok_or(CoreError::CategoryNotFound(category_id))?;
        if category.user_id != user_id {
            return Err(CoreError::forbidden("category belongs to another user"));
        }
        let allocation = CategoryAllocation::new(budget_id, category_id, amount);
        store.upsert_allocation(&allocation)?;
        Ok(allocation)
    }

    pub fn remove_allocation(
        store: &dyn Store,
        user_id: Uuid,
        budget_id: Uuid,
        category_id: Uuid,
    ) -> CoreResult<()> {
        load_owned(store, user_id, budget_id)?;
        if store.delete_allocation(budget_id, category_id)? {
            Ok(())
        } else {
            Err(CoreError::AllocationNotFound(category_id))
        }
    }
}

fn load_owned(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<Budget> {
    let budget = store.budget(id)?.ok_or(CoreError::BudgetNotFound(id))?;
    if budget.user_id != user_id {
        return Err(CoreError::forbidden("budget belongs to another user"));
    }
    Ok(budget)
}

fn validate(budget: &Budget) -> CoreResult<()> {
    if budget.amount < 0.0 {
        return Err(CoreError::validation("budget amount must not be negative"));
    }
    if budget.end_date <= budget.start_date {
        return Err(CoreError::validation("budget end date must be after start date"));
    }
    Ok(())
}
