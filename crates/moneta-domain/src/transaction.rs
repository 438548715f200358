//! Domain models for income and expense transactions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// A single dated money movement, always owned by one user and assigned to
/// one category. Transactions created by bill payments carry the bill's id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub category_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        amount: f64,
        kind: TransactionKind,
        date: DateTime<Utc>,
        category_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            kind,
            date,
            category_id,
            bill_id: None,
            description: None,
            notes: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_bill(mut self, bill_id: Uuid) -> Self {
        self.bill_id = Some(bill_id);
        self
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Direction of a money movement.
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("unrecognized transaction kind `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parsing_is_strict() {
        assert_eq!("INCOME".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!(" expense ".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn dates_serialize_as_iso8601_instants() {
        use chrono::TimeZone;

        let date = Utc.with_ymd_and_hms(2025, 6, 10, 14, 30, 0).unwrap();
        let txn = Transaction::new(
            Uuid::new_v4(),
            42.5,
            TransactionKind::Expense,
            date,
            Uuid::new_v4(),
        );
        let json = serde_json::to_value(&txn).unwrap();
        assert!(json["date"].as_str().unwrap().starts_with("2025-06-10T14:30:00"));
        // optional fields stay off the wire until set
        assert!(json.get("bill_id").is_none());

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, txn);
    }
}
