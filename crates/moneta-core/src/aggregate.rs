//! Numeric aggregation over transactions and allocations.
//!
//! Every ratio in this module is zero-guarded: a zero denominator yields 0,
//! never an error or NaN.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use moneta_domain::{Transaction, TransactionKind};

use crate::period::PeriodBucket;

#[derive(Debug, Clone, Serialize, PartialEq)]
/// Income/expense totals for one time bucket.
pub struct BucketTotals {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

/// Sums transactions into the given buckets, split by kind. Every bucket is
/// reported, empty ones with zero totals.
pub fn totals_per_bucket(buckets: &[PeriodBucket], transactions: &[Transaction]) -> Vec<BucketTotals> {
    buckets
        .iter()
        .map(|bucket| {
            let mut income = 0.0;
            let mut expenses = 0.0;
            for txn in transactions.iter().filter(|t| bucket.contains(t.date)) {
                match txn.kind {
                    TransactionKind::Income => income += txn.amount,
                    TransactionKind::Expense => expenses += txn.amount,
                }
            }
            BucketTotals {
                label: bucket.label.clone(),
                start: bucket.start,
                end: bucket.end,
                income,
                expenses,
                net: income - expenses,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
/// One category's share of a transaction set.
pub struct CategorySlice {
    pub category_id: Uuid,
    pub amount: f64,
    pub count: usize,
    pub percentage: f64,
}

/// Groups transactions by category, computing each group's share of the
/// total. Sorted by descending amount; all percentages are 0 when the total
/// is 0.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategorySlice> {
    let mut groups: HashMap<Uuid, (f64, usize)> = HashMap::new();
    for txn in transactions {
        let entry = groups.entry(txn.category_id).or_insert((0.0, 0));
        entry.0 += txn.amount;
        entry.1 += 1;
    }
    let total: f64 = groups.values().map(|(amount, _)| amount).sum();

    let mut slices: Vec<CategorySlice> = groups
        .into_iter()
        .map(|(category_id, (amount, count))| CategorySlice {
            category_id,
            amount,
            count,
            percentage: share_of(amount, total),
        })
        .collect();
    slices.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    slices
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn share_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// `(variance, variance percentage)` of actual against budget. The
/// percentage is 0 when the budget is 0.
pub fn variance(actual: f64, budget: f64) -> (f64, f64) {
    let variance = actual - budget;
    (variance, share_of(variance, budget))
}

/// Two-point trend over a window: `(last - first) / first * 100`, or 0 when
/// `first` is 0. Not a regression.
pub fn trend_percentage(first: f64, last: f64) -> f64 {
    share_of(last - first, first)
}
