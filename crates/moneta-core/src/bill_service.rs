//! Bill lifecycle: due-date classification, payment, CRUD.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use moneta_domain::{ceil_days_between, Bill, BillStatus, Transaction, TransactionKind};

use crate::error::{CoreError, CoreResult};
use crate::recurrence;
use crate::storage::Store;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A bill enriched with its derived lifecycle fields.
pub struct BillView {
    pub bill: Bill,
    pub status: BillStatus,
    pub days_until_due: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Result of paying a bill. `last_payment_date` is echoed from the pay call
/// only; it is never persisted on the bill.
pub struct PaymentReceipt {
    pub bill: BillView,
    pub transaction: Option<Transaction>,
    pub last_payment_date: DateTime<Utc>,
}

pub struct BillService;

impl BillService {
    /// Derives `(status, days until due)` from the due date and the current
    /// time. Distances use calendar-day granularity with fractional
    /// remainders rounding toward the later boundary. Classification never
    /// yields [`BillStatus::Paid`]: no payment history exists to derive it.
    pub fn classify(due_date: DateTime<Utc>, now: DateTime<Utc>) -> (BillStatus, i64) {
        let days_until_due = ceil_days_between(now, due_date);
        let status = if days_until_due < 0 {
            BillStatus::Overdue
        } else {
            BillStatus::Upcoming
        };
        (status, days_until_due)
    }

    pub fn create(store: &dyn Store, bill: Bill) -> CoreResult<Bill> {
        validate(store, &bill)?;
        store.insert_bill(&bill)?;
        Ok(bill)
    }

    pub fn get(store: &dyn Store, user_id: Uuid, id: Uuid, now: DateTime<Utc>) -> CoreResult<BillView> {
        Ok(view(load_owned(store, user_id, id)?, now))
    }

    pub fn update(store: &dyn Store, user_id: Uuid, changes: Bill) -> CoreResult<Bill> {
        load_owned(store, user_id, changes.id)?;
        validate(store, &changes)?;
        store.update_bill(&changes)?;
        Ok(changes)
    }

    pub fn delete(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<()> {
        load_owned(store, user_id, id)?;
        store.delete_bill(id)
    }

    /// All bills with derived status, ordered by due date. `status_filter`
    /// accepts a bill status name; unrecognized values are a validation
    /// failure rather than an empty result.
    pub fn list(
        store: &dyn Store,
        user_id: Uuid,
        status_filter: Option<&str>,
        now: DateTime<Utc>,
    ) -> CoreResult<Vec<BillView>> {
        let wanted = status_filter
            .map(|raw| raw.parse::<BillStatus>().map_err(CoreError::Validation))
            .transpose()?;
        let mut views: Vec<BillView> = store
            .bills(user_id)?
            .into_iter()
            .map(|bill| view(bill, now))
            .collect();
        if let Some(status) = wanted {
            views.retain(|v| v.status == status);
        }
        Ok(views)
    }

    /// Pays a bill: advances its due date by one frequency unit and, unless
    /// suppressed, records one expense transaction for the bill's amount,
    /// dated `payment_date` (default: now) and linked to the bill.
    pub fn pay(
        store: &dyn Store,
        user_id: Uuid,
        bill_id: Uuid,
        payment_date: Option<DateTime<Utc>>,
        create_transaction: bool,
        now: DateTime<Utc>,
    ) -> CoreResult<PaymentReceipt> {
        let mut bill = load_owned(store, user_id, bill_id)?;
        let paid_on = payment_date.unwrap_or(now);

        bill.due_date = recurrence::advance(bill.due_date, bill.frequency);
        store.update_bill(&bill)?;

        let transaction = if create_transaction {
            let txn = Transaction::new(
                user_id,
                bill.amount,
                TransactionKind::Expense,
                paid_on,
                bill.category_id,
            )
            .with_bill(bill.id)
            .with_description(format!("Payment for {}", bill.name));
            store.insert_transaction(&txn)?;
            Some(txn)
        } else {
            None
        };

        info!(bill = %bill.id, due = %bill.due_date, "bill paid, due date advanced");
        Ok(PaymentReceipt {
            bill: view(bill, now),
            transaction,
            last_payment_date: paid_on,
        })
    }
}

fn view(bill: Bill, now: DateTime<Utc>) -> BillView {
    let (status, days_until_due) = BillService::classify(bill.due_date, now);
    BillView {
        bill,
        status,
        days_until_due,
    }
}

fn load_owned(store: &dyn Store, user_id: Uuid, id: Uuid) -> CoreResult<Bill> {
    let bill = store.bill(id)?.ok_or(CoreError::BillNotFound(id))?;
    if bill.user_id != user_id {
        return Err(CoreError::forbidden("bill belongs to another user"));
    }
    Ok(bill)
}

fn validate(store: &dyn Store, bill: &Bill) -> CoreResult<()> {
    if bill.amount < 0.0 {
        return Err(CoreError::validation("bill amount must not be negative"));
    }
    let category = store
        .category(bill.category_id)?
        .ok_or(CoreError::CategoryNotFound(bill.category_id))?;
    if category.user_id != bill.user_id {
        return Err(CoreError::forbidden("category belongs to another user"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 8, 0, 0).unwrap()
    }

    #[test]
    fn classification_matches_sign_of_day_distance() {
        let now = at(2025, 6, 10);
        for offset in -30i64..30 {
            let due = now + Duration::days(offset);
            let (status, days) = BillService::classify(due, now);
            assert_eq!(days, offset);
            assert_eq!(status == BillStatus::Overdue, days < 0);
        }
    }

    #[test]
    fn due_later_today_is_upcoming() {
        let now = at(2025, 6, 10);
        let (status, days) = BillService::classify(now + Duration::hours(3), now);
        assert_eq!(status, BillStatus::Upcoming);
        assert_eq!(days, 1);
    }

    #[test]
    fn three_days_overdue_reports_minus_three() {
        let now = at(2025, 6, 10);
        let (status, days) = BillService::classify(now - Duration::days(3), now);
        assert_eq!(status, BillStatus::Overdue);
        assert_eq!(days, -3);
    }
}
