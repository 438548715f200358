//! Domain type for savings goals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// A savings target. `current_amount` only grows through the fund-adding
/// operation; `completed` flips automatically once the target is reached, or
/// manually through forced completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<DateTime<Utc>>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SavingsGoal {
    pub fn new(user_id: Uuid, name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            target_date: None,
            completed: false,
            notes: None,
        }
    }

    pub fn with_target_date(mut self, target_date: DateTime<Utc>) -> Self {
        self.target_date = Some(target_date);
        self
    }
}

impl Identifiable for SavingsGoal {
    fn id(&self) -> Uuid {
        self.id
    }
}
