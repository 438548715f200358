//! Domain types for periodic budgets and their per-category allocations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// A spending target over an explicit date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub amount: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub timeframe: BudgetTimeframe,
}

impl Budget {
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        amount: f64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        timeframe: BudgetTimeframe,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            amount,
            start_date,
            end_date,
            timeframe,
        }
    }
}

impl Identifiable for Budget {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// The amount of one budget reserved for one category. At most one
/// allocation exists per `(budget, category)` pair; writes are upserts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryAllocation {
    pub id: Uuid,
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub amount: f64,
}

impl CategoryAllocation {
    pub fn new(budget_id: Uuid, category_id: Uuid, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            budget_id,
            category_id,
            amount,
        }
    }
}

impl Identifiable for CategoryAllocation {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Cadence a budget is meant to cover.
pub enum BudgetTimeframe {
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for BudgetTimeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetTimeframe::Weekly => "Weekly",
            BudgetTimeframe::Monthly => "Monthly",
            BudgetTimeframe::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

impl FromStr for BudgetTimeframe {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(BudgetTimeframe::Weekly),
            "monthly" => Ok(BudgetTimeframe::Monthly),
            "yearly" => Ok(BudgetTimeframe::Yearly),
            other => Err(format!("unrecognized budget timeframe `{other}`")),
        }
    }
}
