//! Domain types representing transaction categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// Categorises transactions and bills for budgeting and reporting.
///
/// Default categories are seeded once per user and are protected from edits
/// and deletion at the service boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub color: String,
    pub icon: String,
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        kind: CategoryKind,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            kind,
            color: color.into(),
            icon: icon.into(),
            is_default: false,
            description: None,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryKind {
    Income,
    Expense,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Income => "Income",
            CategoryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            other => Err(format!("unrecognized category kind `{other}`")),
        }
    }
}
