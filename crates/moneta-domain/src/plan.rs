//! Domain types for financial plan items.
//!
//! A "plan" is not a stored row: it is the aggregate view over all items
//! sharing one `(user, plan type)` pair.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// One line of a financial plan. `created_at` is persisted because monthly
/// trend reporting attributes savings lines by their creation date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub plan_type: PlanType,
    pub item_type: PlanItemType,
    pub created_at: DateTime<Utc>,
}

impl PlanItem {
    pub fn new(
        user_id: Uuid,
        description: impl Into<String>,
        amount: f64,
        plan_type: PlanType,
        item_type: PlanItemType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            description: description.into(),
            amount,
            category_id: None,
            notes: None,
            plan_type,
            item_type,
            created_at,
        }
    }
}

impl Identifiable for PlanItem {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Cadence a plan describes.
pub enum PlanType {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlanType::Daily => "Daily",
            PlanType::Weekly => "Weekly",
            PlanType::Monthly => "Monthly",
        };
        f.write_str(label)
    }
}

impl FromStr for PlanType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(PlanType::Daily),
            "weekly" => Ok(PlanType::Weekly),
            "monthly" => Ok(PlanType::Monthly),
            other => Err(format!("unrecognized plan type `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Role of a line inside a plan.
pub enum PlanItemType {
    Income,
    Expense,
    Savings,
}

impl fmt::Display for PlanItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlanItemType::Income => "Income",
            PlanItemType::Expense => "Expense",
            PlanItemType::Savings => "Savings",
        };
        f.write_str(label)
    }
}

impl FromStr for PlanItemType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(PlanItemType::Income),
            "expense" => Ok(PlanItemType::Expense),
            "savings" => Ok(PlanItemType::Savings),
            other => Err(format!("unrecognized plan item type `{other}`")),
        }
    }
}
