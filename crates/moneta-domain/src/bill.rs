//! Domain types for recurring bills.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// A recurring obligation. `due_date` always points at the next occurrence
/// and is advanced by one frequency unit when the bill is paid. There is no
/// payment ledger behind it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub frequency: Frequency,
    pub autopay: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub category_id: Uuid,
}

impl Bill {
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        amount: f64,
        due_date: DateTime<Utc>,
        frequency: Frequency,
        category_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            amount,
            due_date,
            frequency,
            autopay: false,
            notes: None,
            category_id,
        }
    }
}

impl Identifiable for Bill {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// How often a bill comes due.
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Biannually,
    Annually,
}

impl Frequency {
    /// Lenient parser for recurrence input from untrusted sources: unknown
    /// values fail closed to `Monthly`. Query filters use the strict
    /// [`FromStr`] implementation instead.
    pub fn parse_lossy(value: &str) -> Frequency {
        value.parse().unwrap_or(Frequency::Monthly)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Biweekly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Biannually => "Biannually",
            Frequency::Annually => "Annually",
        };
        f.write_str(label)
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "biannually" => Ok(Frequency::Biannually),
            "annually" => Ok(Frequency::Annually),
            other => Err(format!("unrecognized frequency `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Lifecycle state derived from a bill's due date.
///
/// `Paid` exists for wire compatibility but is never produced by
/// classification: no payment history is persisted to derive it from.
pub enum BillStatus {
    Upcoming,
    Overdue,
    Paid,
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BillStatus::Upcoming => "Upcoming",
            BillStatus::Overdue => "Overdue",
            BillStatus::Paid => "Paid",
        };
        f.write_str(label)
    }
}

impl FromStr for BillStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(BillStatus::Upcoming),
            "overdue" => Ok(BillStatus::Overdue),
            "paid" => Ok(BillStatus::Paid),
            other => Err(format!("unrecognized bill status `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lossy_frequency_parse_defaults_to_monthly() {
        assert_eq!(Frequency::parse_lossy("weekly"), Frequency::Weekly);
        assert_eq!(Frequency::parse_lossy("fortnightly"), Frequency::Monthly);
        assert_eq!(Frequency::parse_lossy(""), Frequency::Monthly);
    }

    #[test]
    fn strict_frequency_parse_rejects_unknown_values() {
        assert!("fortnightly".parse::<Frequency>().is_err());
        assert_eq!("QUARTERLY".parse::<Frequency>(), Ok(Frequency::Quarterly));
    }
}
