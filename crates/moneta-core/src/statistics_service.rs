//! Statistics views: income-vs-expense chart, category breakdown, monthly
//! trends, daily spending, budget-vs-actual.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use moneta_domain::{Budget, BudgetTimeframe, DateWindow, PlanItemType, TransactionKind};

use crate::aggregate::{
    category_breakdown, share_of, totals_per_bucket, trend_percentage, variance, BucketTotals,
    CategorySlice,
};
use crate::error::{CoreError, CoreResult};
use crate::period::{bucketize, Granularity, PeriodBucket};
use crate::storage::{Store, TransactionFilter};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// One month of the trend report.
pub struct MonthlyTrendPoint {
    pub label: String,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Month-by-month totals plus two-point trends over the window.
pub struct MonthlyTrendReport {
    pub points: Vec<MonthlyTrendPoint>,
    pub income_trend: f64,
    pub expense_trend: f64,
    pub savings_trend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySpendingPoint {
    pub date: NaiveDate,
    pub amount: f64,
    pub comparison_to_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Per-day spending over a trailing window. Zero-spend days stay in the
/// series; the lowest figure only considers days with actual spending.
pub struct DailySpendingReport {
    pub days: Vec<DailySpendingPoint>,
    pub average: f64,
    pub highest: Option<DailySpendingPoint>,
    pub lowest_nonzero: Option<DailySpendingPoint>,
    pub zero_spend_days: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Axis for the budget-vs-actual comparison.
pub enum ComparisonMode {
    Month,
    Category,
}

impl FromStr for ComparisonMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(ComparisonMode::Month),
            "category" => Ok(ComparisonMode::Category),
            other => Err(format!("unrecognized comparison mode `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthComparison {
    pub label: String,
    pub budget_amount: f64,
    pub actual_amount: f64,
    pub variance: f64,
    pub variance_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryComparison {
    pub category_id: Uuid,
    pub budget_amount: f64,
    pub actual_amount: f64,
    pub variance: f64,
    pub variance_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BudgetVsActual {
    ByMonth(Vec<MonthComparison>),
    ByCategory(Vec<CategoryComparison>),
}

pub struct StatisticsService;

impl StatisticsService {
    /// Income and expense totals over the last `months` months, bucketed by
    /// week or month.
    pub fn income_vs_expenses(
        store: &dyn Store,
        user_id: Uuid,
        months: u32,
        granularity: Granularity,
        now: DateTime<Utc>,
    ) -> CoreResult<Vec<BucketTotals>> {
        let window = DateWindow::last_months(now, months);
        let buckets = bucketize(window.start, window.end, granularity);
        let transactions = store.transactions(user_id, &TransactionFilter::window(&window))?;
        Ok(totals_per_bucket(&buckets, &transactions))
    }

    /// Expense share per category over an explicit window.
    pub fn expense_categories(
        store: &dyn Store,
        user_id: Uuid,
        window: DateWindow,
    ) -> CoreResult<Vec<CategorySlice>> {
        let expenses = store.transactions(user_id, &TransactionFilter::expenses_in(&window))?;
        Ok(category_breakdown(&expenses))
    }

    /// Month-by-month income/expense/savings totals over the last `months`
    /// months, with two-point trends. Savings are attributed to the month a
    /// savings plan item was created in.
    pub fn monthly_trends(
        store: &dyn Store,
        user_id: Uuid,
        months: u32,
        now: DateTime<Utc>,
    ) -> CoreResult<MonthlyTrendReport> {
        let window = DateWindow::last_months(now, months);
        let buckets = bucketize(window.start, window.end, Granularity::Month);
        let transactions = store.transactions(user_id, &TransactionFilter::window(&window))?;
        let totals = totals_per_bucket(&buckets, &transactions);

        let plan_items = store.plan_items(user_id, None)?;
        let points: Vec<MonthlyTrendPoint> = totals
            .into_iter()
            .zip(buckets.iter())
            .map(|(bucket_totals, bucket)| {
                let savings = plan_items
                    .iter()
                    .filter(|item| {
                        item.item_type == PlanItemType::Savings && bucket.contains(item.created_at)
                    })
                    .map(|item| item.amount)
                    .sum();
                MonthlyTrendPoint {
                    label: bucket_totals.label,
                    income: bucket_totals.income,
                    expenses: bucket_totals.expenses,
                    savings,
                    net: bucket_totals.net,
                }
            })
            .collect();

        let (income_trend, expense_trend, savings_trend) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (
                trend_percentage(first.income, last.income),
                trend_percentage(first.expenses, last.expenses),
                trend_percentage(first.savings, last.savings),
            ),
            _ => (0.0, 0.0, 0.0),
        };

        Ok(MonthlyTrendReport {
            points,
            income_trend,
            expense_trend,
            savings_trend,
        })
    }

    /// Per-day expense totals over the last `days` days. The comparison is
    /// against the arithmetic mean over every day in the window, zero-spend
    /// days included.
    pub fn daily_spending(
        store: &dyn Store,
        user_id: Uuid,
        days: u32,
        now: DateTime<Utc>,
    ) -> CoreResult<DailySpendingReport> {
        let window = DateWindow::last_days(now, days);
        let buckets = bucketize(window.start, window.end, Granularity::Day);
        let expenses = store.transactions(user_id, &TransactionFilter::expenses_in(&window))?;
        let totals = totals_per_bucket(&buckets, &expenses);

        let total: f64 = totals.iter().map(|t| t.expenses).sum();
        let average = if totals.is_empty() {
            0.0
        } else {
            total / totals.len() as f64
        };

        let days: Vec<DailySpendingPoint> = totals
            .into_iter()
            .map(|t| DailySpendingPoint {
                date: t.start.date_naive(),
                amount: t.expenses,
                comparison_to_average: share_of(t.expenses - average, average),
            })
            .collect();

        let highest = days
            .iter()
            .max_by(|a, b| a.amount.total_cmp(&b.amount))
            .filter(|point| point.amount > 0.0)
            .cloned();
        let lowest_nonzero = days
            .iter()
            .filter(|point| point.amount > 0.0)
            .min_by(|a, b| a.amount.total_cmp(&b.amount))
            .cloned();
        let zero_spend_days = days.iter().filter(|point| point.amount == 0.0).count();

        Ok(DailySpendingReport {
            days,
            average,
            highest,
            lowest_nonzero,
            zero_spend_days,
        })
    }

    /// Budget against actual spending: per month over the current year, or
    /// per category over the current month.
    pub fn budget_vs_actual(
        store: &dyn Store,
        user_id: Uuid,
        mode: ComparisonMode,
        now: DateTime<Utc>,
    ) -> CoreResult<BudgetVsActual> {
        match mode {
            ComparisonMode::Month => Ok(BudgetVsActual::ByMonth(by_month(store, user_id, now)?)),
            ComparisonMode::Category => {
                Ok(BudgetVsActual::ByCategory(by_category(store, user_id, now)?))
            }
        }
    }

    /// Parses a comparison mode string, mapping unknown values to a
    /// validation failure.
    pub fn parse_mode(raw: &str) -> CoreResult<ComparisonMode> {
        raw.parse::<ComparisonMode>().map_err(CoreError::Validation)
    }
}

/// Monthly budgets overlapping the bucket contribute their full amount.
fn monthly_budget_for(budgets: &[Budget], bucket: &PeriodBucket) -> f64 {
    budgets
        .iter()
        .filter(|budget| {
            budget.timeframe == BudgetTimeframe::Monthly
                && budget.start_date <= bucket.end
                && budget.end_date >= bucket.start
        })
        .map(|budget| budget.amount)
        .sum()
}

fn by_month(store: &dyn Store, user_id: Uuid, now: DateTime<Utc>) -> CoreResult<Vec<MonthComparison>> {
    let window = DateWindow::year_of(now);
    let buckets = bucketize(window.start, window.end, Granularity::Month);
    let expenses = store.transactions(
        user_id,
        &TransactionFilter {
            kind: Some(TransactionKind::Expense),
            ..TransactionFilter::window(&window)
        },
    )?;
    let actuals = totals_per_bucket(&buckets, &expenses);
    let budgets = store.budgets(user_id)?;

    Ok(buckets
        .iter()
        .zip(actuals)
        .map(|(bucket, actual)| {
            let budget_amount = monthly_budget_for(&budgets, bucket);
            let (variance, variance_percentage) = variance(actual.expenses, budget_amount);
            MonthComparison {
                label: bucket.label.clone(),
                budget_amount,
                actual_amount: actual.expenses,
                variance,
                variance_percentage,
            }
        })
        .collect())
}

fn by_category(
    store: &dyn Store,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> CoreResult<Vec<CategoryComparison>> {
    let window = DateWindow::month_of(now);
    let expenses = store.transactions(user_id, &TransactionFilter::expenses_in(&window))?;

    let mut actual_by_category: HashMap<Uuid, f64> = HashMap::new();
    for txn in &expenses {
        *actual_by_category.entry(txn.category_id).or_insert(0.0) += txn.amount;
    }

    // Allocations of every monthly budget overlapping the current month.
    let mut budget_by_category: HashMap<Uuid, f64> = HashMap::new();
    for budget in store.budgets(user_id)? {
        let overlaps = budget.timeframe == BudgetTimeframe::Monthly
            && budget.start_date <= window.end
            && budget.end_date >= window.start;
        if !overlaps {
            continue;
        }
        for allocation in store.allocations(budget.id)? {
            *budget_by_category.entry(allocation.category_id).or_insert(0.0) += allocation.amount;
        }
    }

    // Union of both sides: unbudgeted spending shows budget 0, unspent
    // allocations show actual 0.
    let mut category_ids: Vec<Uuid> = actual_by_category
        .keys()
        .chain(budget_by_category.keys())
        .copied()
        .collect();
    category_ids.sort();
    category_ids.dedup();

    let mut rows: Vec<CategoryComparison> = category_ids
        .into_iter()
        .map(|category_id| {
            let budget_amount = budget_by_category.get(&category_id).copied().unwrap_or(0.0);
            let actual_amount = actual_by_category.get(&category_id).copied().unwrap_or(0.0);
            let (variance, variance_percentage) = variance(actual_amount, budget_amount);
            CategoryComparison {
                category_id,
                budget_amount,
                actual_amount,
                variance,
                variance_percentage,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.actual_amount.total_cmp(&a.actual_amount));
    Ok(rows)
}
