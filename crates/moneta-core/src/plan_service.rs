//! Financial plans: the aggregate view over plan items, and whole-plan
//! replacement.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use moneta_domain::{PlanItem, PlanItemType, PlanType};

use crate::error::{CoreError, CoreResult};
use crate::storage::Store;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// The aggregate view over one `(user, plan type)` item group. Not a stored
/// row.
pub struct Plan {
    pub plan_type: PlanType,
    pub items: Vec<PlanItem>,
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_savings: f64,
    pub leftover: f64,
}

pub struct PlanService;

impl PlanService {
    pub fn plan(store: &dyn Store, user_id: Uuid, plan_type: PlanType) -> CoreResult<Plan> {
        let items = store.plan_items(user_id, Some(plan_type))?;
        Ok(assemble(plan_type, items))
    }

    /// Replaces the entire item set of one plan in a single all-or-nothing
    /// batch. A rejected replacement leaves the previous items intact.
    pub fn replace(
        store: &dyn Store,
        user_id: Uuid,
        plan_type: PlanType,
        items: Vec<PlanItem>,
    ) -> CoreResult<Plan> {
        for item in &items {
            if item.user_id != user_id {
                return Err(CoreError::validation("plan item owner mismatch"));
            }
            if item.plan_type != plan_type {
                return Err(CoreError::validation("plan item belongs to a different plan type"));
            }
            if item.amount < 0.0 {
                return Err(CoreError::validation("plan item amount must not be negative"));
            }
            if let Some(category_id) = item.category_id {
                let category = store
                    .category(category_id)?
                    .ok_or(CoreError::CategoryNotFound(category_id))?;
                if category.user_id != user_id {
                    return Err(CoreError::forbidden("category belongs to another user"));
                }
            }
        }
        store.replace_plan_items(user_id, plan_type, &items)?;
        info!(user = %user_id, plan = %plan_type, count = items.len(), "plan replaced");
        Ok(assemble(plan_type, items))
    }
}

fn assemble(plan_type: PlanType, items: Vec<PlanItem>) -> Plan {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut total_savings = 0.0;
    for item in &items {
        match item.item_type {
            PlanItemType::Income => total_income += item.amount,
            PlanItemType::Expense => total_expenses += item.amount,
            PlanItemType::Savings => total_savings += item.amount,
        }
    }
    Plan {
        plan_type,
        items,
        total_income,
        total_expenses,
        total_savings,
        leftover: total_income - total_expenses - total_savings,
    }
}
