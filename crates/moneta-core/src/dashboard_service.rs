//! Dashboard views: financial summary, today spending, budget progress,
//! recent expenses.
//!
//! Each view is a pure composition over the store's current state; callers
//! supply `now` and the service derives the default window from it.

use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use moneta_domain::common::days_in_month;
use moneta_domain::{Budget, BudgetTimeframe, DateWindow, PlanItemType, Transaction, TransactionKind};

use crate::aggregate::share_of;
use crate::error::{CoreError, CoreResult};
use crate::storage::{Store, TransactionFilter};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Income, expense, and savings totals over one window.
pub struct FinancialSummary {
    pub window: DateWindow,
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_savings: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Today's spending against the monthly budget's daily slice.
pub struct TodaySpending {
    pub date: NaiveDate,
    pub spent_today: f64,
    pub daily_budget: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Window selector for the budget-progress view.
pub enum ProgressPeriod {
    Week,
    Month,
}

impl FromStr for ProgressPeriod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(ProgressPeriod::Week),
            "month" => Ok(ProgressPeriod::Month),
            other => Err(format!("unrecognized progress period `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub window: DateWindow,
    pub target_amount: f64,
    pub spent: f64,
    pub percentage_used: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Expenses of one calendar day, newest day first in listings.
pub struct DayExpenses {
    pub date: NaiveDate,
    pub total: f64,
    pub transactions: Vec<Transaction>,
}

pub struct DashboardService;

impl DashboardService {
    /// Totals over `window`, defaulting to the current calendar month.
    /// `remaining = income - expenses - savings`; savings are the plan items
    /// of savings type created inside the window, matching the monthly-trend
    /// attribution.
    pub fn financial_summary(
        store: &dyn Store,
        user_id: Uuid,
        window: Option<DateWindow>,
        now: DateTime<Utc>,
    ) -> CoreResult<FinancialSummary> {
        let window = window.unwrap_or_else(|| DateWindow::month_of(now));
        let transactions = store.transactions(user_id, &TransactionFilter::window(&window))?;
        let mut total_income = 0.0;
        let mut total_expenses = 0.0;
        for txn in &transactions {
            match txn.kind {
                TransactionKind::Income => total_income += txn.amount,
                TransactionKind::Expense => total_expenses += txn.amount,
            }
        }
        let total_savings = savings_created_in(store, user_id, &window)?;
        Ok(FinancialSummary {
            window,
            total_income,
            total_expenses,
            total_savings,
            remaining: total_income - total_expenses - total_savings,
        })
    }

    /// Spending for the current UTC day against one day's share of the
    /// active monthly budget. Without a monthly budget the daily budget is 0
    /// and remaining floors at 0.
    pub fn today_spending(
        store: &dyn Store,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> CoreResult<TodaySpending> {
        let window = DateWindow::day_of(now);
        let spent_today = expense_total(store, user_id, &window)?;
        let today = now.date_naive();
        let daily_budget = match active_budget(store, user_id, BudgetTimeframe::Monthly, now)? {
            Some(budget) => budget.amount / f64::from(days_in_month(today.year(), today.month())),
            None => 0.0,
        };
        Ok(TodaySpending {
            date: today,
            spent_today,
            daily_budget,
            remaining: (daily_budget - spent_today).max(0.0),
        })
    }

    /// Spending against the active weekly or monthly budget for the period
    /// containing `now`. `percentage_used` is 0 when no target exists.
    pub fn budget_progress(
        store: &dyn Store,
        user_id: Uuid,
        period: ProgressPeriod,
        now: DateTime<Utc>,
    ) -> CoreResult<BudgetProgress> {
        let (window, timeframe) = match period {
            ProgressPeriod::Week => (DateWindow::week_of(now), BudgetTimeframe::Weekly),
            ProgressPeriod::Month => (DateWindow::month_of(now), BudgetTimeframe::Monthly),
        };
        let spent = expense_total(store, user_id, &window)?;
        let target_amount = active_budget(store, user_id, timeframe, now)?
            .map(|budget| budget.amount)
            .unwrap_or(0.0);
        Ok(BudgetProgress {
            window,
            target_amount,
            spent,
            percentage_used: share_of(spent, target_amount),
        })
    }

    /// The `limit` most recent expenses, grouped by calendar day, newest day
    /// first.
    pub fn recent_expenses(
        store: &dyn Store,
        user_id: Uuid,
        limit: usize,
    ) -> CoreResult<Vec<DayExpenses>> {
        let filter = TransactionFilter {
            kind: Some(TransactionKind::Expense),
            ..TransactionFilter::default()
        };
        let recent: Vec<Transaction> = store
            .transactions(user_id, &filter)?
            .into_iter()
            .take(limit)
            .collect();

        // Store order is date-descending, so one calendar day's rows are
        // contiguous.
        let mut groups: Vec<DayExpenses> = Vec::new();
        for txn in recent {
            let day = txn.date.date_naive();
            match groups.last_mut() {
                Some(group) if group.date == day => {
                    group.total += txn.amount;
                    group.transactions.push(txn);
                }
                _ => groups.push(DayExpenses {
                    date: day,
                    total: txn.amount,
                    transactions: vec![txn],
                }),
            }
        }
        Ok(groups)
    }
}

fn expense_total(store: &dyn Store, user_id: Uuid, window: &DateWindow) -> CoreResult<f64> {
    let expenses = store.transactions(user_id, &TransactionFilter::expenses_in(window))?;
    Ok(expenses.iter().map(|txn| txn.amount).sum())
}

/// The most recently started budget of the given timeframe whose range
/// contains `now`.
fn active_budget(
    store: &dyn Store,
    user_id: Uuid,
    timeframe: BudgetTimeframe,
    now: DateTime<Utc>,
) -> CoreResult<Option<Budget>> {
    Ok(store
        .budgets(user_id)?
        .into_iter()
        .filter(|b| b.timeframe == timeframe && b.start_date <= now && b.end_date >= now)
        .max_by_key(|b| b.start_date))
}

fn savings_created_in(store: &dyn Store, user_id: Uuid, window: &DateWindow) -> CoreResult<f64> {
    let items = store.plan_items(user_id, None)?;
    Ok(items
        .iter()
        .filter(|item| item.item_type == PlanItemType::Savings && window.contains(item.created_at))
        .map(|item| item.amount)
        .sum())
}
