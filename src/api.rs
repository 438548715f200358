//! Stable, public-facing helpers that wrap the internal service layer.
//!
//! This module is the seam an HTTP layer (or any other frontend) calls into:
//! plain data-in/data-out functions that parse untrusted string parameters,
//! apply the configured default windows, and stamp the current time. String
//! parameters that fail to parse surface as [`CoreError::Validation`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use moneta_config::Config;
use moneta_core::aggregate::{BucketTotals, CategorySlice};
use moneta_core::storage::{Store, TransactionFilter};
use moneta_core::{
    BillService, BillView, BudgetProgress, BudgetVsActual, CoreError, CoreResult,
    DailySpendingReport, DashboardService, DayExpenses, FinancialSummary, GoalService, GoalView,
    Granularity, MonthlyTrendReport, PaymentReceipt, Plan, PlanService, ProgressPeriod,
    StatisticsService, TodaySpending, TransactionService,
};
use moneta_domain::{Category, DateWindow, PlanItem, PlanType, SavingsGoal, Transaction};

fn parse<T>(raw: &str) -> CoreResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse::<T>().map_err(CoreError::Validation)
}

/// Seeds the default category set for a user. Idempotent.
pub fn api_seed_default_categories(store: &dyn Store, user_id: Uuid) -> CoreResult<Vec<Category>> {
    moneta_core::CategoryService::seed_defaults(store, user_id)
}

pub fn api_record_transaction(store: &dyn Store, transaction: Transaction) -> CoreResult<Transaction> {
    TransactionService::create(store, transaction)
}

pub fn api_list_transactions(
    store: &dyn Store,
    user_id: Uuid,
    filter: TransactionFilter,
) -> CoreResult<Vec<Transaction>> {
    TransactionService::list(store, user_id, &filter)
}

/// Income/expense/savings totals; defaults to the current calendar month.
pub fn api_financial_summary(
    store: &dyn Store,
    user_id: Uuid,
    window: Option<DateWindow>,
) -> CoreResult<FinancialSummary> {
    DashboardService::financial_summary(store, user_id, window, Utc::now())
}

pub fn api_today_spending(store: &dyn Store, user_id: Uuid) -> CoreResult<TodaySpending> {
    DashboardService::today_spending(store, user_id, Utc::now())
}

/// `period` accepts `week` or `month` (default).
pub fn api_budget_progress(
    store: &dyn Store,
    user_id: Uuid,
    period: Option<&str>,
) -> CoreResult<BudgetProgress> {
    let period = match period {
        Some(raw) => parse::<ProgressPeriod>(raw)?,
        None => ProgressPeriod::Month,
    };
    DashboardService::budget_progress(store, user_id, period, Utc::now())
}

pub fn api_recent_expenses(
    store: &dyn Store,
    user_id: Uuid,
    limit: Option<usize>,
    config: &Config,
) -> CoreResult<Vec<DayExpenses>> {
    let limit = limit.unwrap_or(config.recent_expenses_limit);
    DashboardService::recent_expenses(store, user_id, limit)
}

/// `granularity` accepts `week` or `month` (default); `months` defaults from
/// config.
pub fn api_income_vs_expenses(
    store: &dyn Store,
    user_id: Uuid,
    months: Option<u32>,
    granularity: Option<&str>,
    config: &Config,
) -> CoreResult<Vec<BucketTotals>> {
    let months = months.unwrap_or(config.chart_months);
    let granularity = match granularity {
        Some(raw) => parse::<Granularity>(raw)?,
        None => Granularity::Month,
    };
    StatisticsService::income_vs_expenses(store, user_id, months, granularity, Utc::now())
}

/// Expense share per category over an explicit window.
pub fn api_expense_categories(
    store: &dyn Store,
    user_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> CoreResult<Vec<CategorySlice>> {
    let window = DateWindow::new(start, end).map_err(|err| CoreError::Validation(err.to_string()))?;
    StatisticsService::expense_categories(store, user_id, window)
}

pub fn api_monthly_trends(
    store: &dyn Store,
    user_id: Uuid,
    months: Option<u32>,
    config: &Config,
) -> CoreResult<MonthlyTrendReport> {
    let months = months.unwrap_or(config.trend_months);
    StatisticsService::monthly_trends(store, user_id, months, Utc::now())
}

pub fn api_daily_spending(
    store: &dyn Store,
    user_id: Uuid,
    days: Option<u32>,
    config: &Config,
) -> CoreResult<DailySpendingReport> {
    let days = days.unwrap_or(config.daily_spending_days);
    StatisticsService::daily_spending(store, user_id, days, Utc::now())
}

/// `mode` accepts `month` (default) or `category`.
pub fn api_budget_vs_actual(
    store: &dyn Store,
    user_id: Uuid,
    mode: Option<&str>,
) -> CoreResult<BudgetVsActual> {
    let mode = match mode {
        Some(raw) => StatisticsService::parse_mode(raw)?,
        None => moneta_core::ComparisonMode::Month,
    };
    StatisticsService::budget_vs_actual(store, user_id, mode, Utc::now())
}

/// Bills with derived status; `status` filters on `upcoming`/`overdue`.
pub fn api_list_bills(
    store: &dyn Store,
    user_id: Uuid,
    status: Option<&str>,
) -> CoreResult<Vec<BillView>> {
    BillService::list(store, user_id, status, Utc::now())
}

/// Pays a bill. `create_transaction` defaults to true; `payment_date`
/// defaults to now.
pub fn api_pay_bill(
    store: &dyn Store,
    user_id: Uuid,
    bill_id: Uuid,
    payment_date: Option<DateTime<Utc>>,
    create_transaction: Option<bool>,
) -> CoreResult<PaymentReceipt> {
    BillService::pay(
        store,
        user_id,
        bill_id,
        payment_date,
        create_transaction.unwrap_or(true),
        Utc::now(),
    )
}

pub fn api_list_goals(store: &dyn Store, user_id: Uuid) -> CoreResult<Vec<GoalView>> {
    GoalService::list(store, user_id, Utc::now())
}

pub fn api_add_goal_funds(
    store: &dyn Store,
    user_id: Uuid,
    goal_id: Uuid,
    amount: f64,
) -> CoreResult<SavingsGoal> {
    GoalService::add_funds(store, user_id, goal_id, amount)
}

pub fn api_complete_goal(store: &dyn Store, user_id: Uuid, goal_id: Uuid) -> CoreResult<SavingsGoal> {
    GoalService::complete(store, user_id, goal_id)
}

/// The aggregate plan view for one plan type string (`daily`, `weekly`,
/// `monthly`).
pub fn api_plan(store: &dyn Store, user_id: Uuid, plan_type: &str) -> CoreResult<Plan> {
    let plan_type = parse::<PlanType>(plan_type)?;
    PlanService::plan(store, user_id, plan_type)
}

/// Replaces a plan's entire item set atomically.
pub fn api_replace_plan(
    store: &dyn Store,
    user_id: Uuid,
    plan_type: &str,
    items: Vec<PlanItem>,
) -> CoreResult<Plan> {
    let plan_type = parse::<PlanType>(plan_type)?;
    PlanService::replace(store, user_id, plan_type, items)
}
