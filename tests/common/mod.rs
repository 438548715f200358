#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use moneta::{Category, CategoryKind, MemoryStore, Store, Transaction, TransactionKind};

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn store_with_user() -> (MemoryStore, Uuid) {
    (MemoryStore::new(), Uuid::new_v4())
}

pub fn expense_category(store: &MemoryStore, user_id: Uuid, name: &str) -> Category {
    let category = Category::new(user_id, name, CategoryKind::Expense, "#ef4444", "tag");
    store.insert_category(&category).unwrap();
    category
}

pub fn income_category(store: &MemoryStore, user_id: Uuid, name: &str) -> Category {
    let category = Category::new(user_id, name, CategoryKind::Income, "#22c55e", "coins");
    store.insert_category(&category).unwrap();
    category
}

pub fn record_expense(
    store: &MemoryStore,
    user_id: Uuid,
    category_id: Uuid,
    amount: f64,
    date: DateTime<Utc>,
) -> Transaction {
    let txn = Transaction::new(user_id, amount, TransactionKind::Expense, date, category_id);
    store.insert_transaction(&txn).unwrap();
    txn
}

pub fn record_income(
    store: &MemoryStore,
    user_id: Uuid,
    category_id: Uuid,
    amount: f64,
    date: DateTime<Utc>,
) -> Transaction {
    let txn = Transaction::new(user_id, amount, TransactionKind::Income, date, category_id);
    store.insert_transaction(&txn).unwrap();
    txn
}
