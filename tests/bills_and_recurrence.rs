mod common;

use chrono::Duration;
use uuid::Uuid;

use moneta::recurrence::advance;
use moneta::{
    Bill, BillService, BillStatus, CoreError, Frequency, Store, TransactionFilter, TransactionKind,
};

use common::{at, expense_category, store_with_user};

#[test]
fn overdue_bill_is_paid_and_advanced_one_month() {
    let (store, user) = store_with_user();
    let utilities = expense_category(&store, user, "Utilities");
    let now = at(2025, 6, 10, 8);
    let due = now - Duration::days(3);

    let bill = BillService::create(
        &store,
        Bill::new(user, "Electricity", 80.0, due, Frequency::Monthly, utilities.id),
    )
    .unwrap();

    let view = BillService::get(&store, user, bill.id, now).unwrap();
    assert_eq!(view.status, BillStatus::Overdue);
    assert_eq!(view.days_until_due, -3);

    let receipt = BillService::pay(&store, user, bill.id, None, true, now).unwrap();

    // one frequency unit forward from the old due date
    assert_eq!(receipt.bill.bill.due_date, advance(due, Frequency::Monthly));
    assert_eq!(receipt.last_payment_date, now);
    assert_eq!(receipt.bill.status, BillStatus::Upcoming);

    // exactly one expense transaction, dated today, for the bill's amount
    let linked = store
        .transactions(
            user,
            &TransactionFilter {
                bill_id: Some(bill.id),
                ..TransactionFilter::default()
            },
        )
        .unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].amount, 80.0);
    assert_eq!(linked[0].kind, TransactionKind::Expense);
    assert_eq!(linked[0].date, now);
    assert_eq!(linked[0].category_id, utilities.id);
}

#[test]
fn paying_without_transaction_only_moves_the_due_date() {
    let (store, user) = store_with_user();
    let rent = expense_category(&store, user, "Housing");
    let now = at(2025, 6, 1, 9);

    let bill = BillService::create(
        &store,
        Bill::new(user, "Rent", 1200.0, now, Frequency::Monthly, rent.id),
    )
    .unwrap();

    let receipt = BillService::pay(&store, user, bill.id, None, false, now).unwrap();
    assert!(receipt.transaction.is_none());
    assert_eq!(receipt.bill.bill.due_date, at(2025, 7, 1, 9));

    let all = store
        .transactions(user, &TransactionFilter::default())
        .unwrap();
    assert!(all.is_empty());
}

#[test]
fn explicit_payment_date_is_echoed_and_stamped_on_the_transaction() {
    let (store, user) = store_with_user();
    let category = expense_category(&store, user, "Subscriptions");
    let now = at(2025, 6, 10, 8);
    let paid_on = at(2025, 6, 8, 14);

    let bill = BillService::create(
        &store,
        Bill::new(user, "Streaming", 15.0, now, Frequency::Monthly, category.id),
    )
    .unwrap();

    let receipt = BillService::pay(&store, user, bill.id, Some(paid_on), true, now).unwrap();
    assert_eq!(receipt.last_payment_date, paid_on);
    assert_eq!(receipt.transaction.as_ref().unwrap().date, paid_on);
}

#[test]
fn status_filter_narrows_and_rejects_unknown_values() {
    let (store, user) = store_with_user();
    let category = expense_category(&store, user, "Utilities");
    let now = at(2025, 6, 10, 8);

    BillService::create(
        &store,
        Bill::new(user, "Water", 30.0, now - Duration::days(5), Frequency::Monthly, category.id),
    )
    .unwrap();
    BillService::create(
        &store,
        Bill::new(user, "Internet", 60.0, now + Duration::days(5), Frequency::Monthly, category.id),
    )
    .unwrap();

    let overdue = BillService::list(&store, user, Some("overdue"), now).unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].bill.name, "Water");

    let upcoming = BillService::list(&store, user, Some("upcoming"), now).unwrap();
    assert_eq!(upcoming.len(), 1);

    // `paid` is a legal status name that nothing ever derives
    let paid = BillService::list(&store, user, Some("paid"), now).unwrap();
    assert!(paid.is_empty());

    let err = BillService::list(&store, user, Some("pending"), now).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn bill_access_resolves_not_found_before_ownership() {
    let (store, user) = store_with_user();
    let stranger = Uuid::new_v4();
    let category = expense_category(&store, user, "Utilities");
    let now = at(2025, 6, 10, 8);

    let bill = BillService::create(
        &store,
        Bill::new(user, "Gas", 45.0, now, Frequency::Monthly, category.id),
    )
    .unwrap();

    let missing = BillService::get(&store, user, Uuid::new_v4(), now).unwrap_err();
    assert!(matches!(missing, CoreError::BillNotFound(_)));

    let denied = BillService::get(&store, stranger, bill.id, now).unwrap_err();
    assert!(matches!(denied, CoreError::Forbidden(_)));
}

#[test]
fn advance_composes_across_every_frequency() {
    let start = at(2025, 1, 15, 12);
    for frequency in [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Biannually,
        Frequency::Annually,
    ] {
        let mut date = start;
        for _ in 0..3 {
            let next = advance(date, frequency);
            assert!(next > date, "{frequency} must move the date forward");
            date = next;
        }
    }
    // two monthly advances equal a single two-month calendar shift
    let twice = advance(advance(start, Frequency::Monthly), Frequency::Monthly);
    assert_eq!(twice, at(2025, 3, 15, 12));
}
