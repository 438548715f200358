//! moneta-core
//!
//! Business logic and services for Moneta. Depends on moneta-domain. No HTTP,
//! no terminal I/O, no direct storage interactions — persistence goes through
//! the [`storage::Store`] trait.

pub mod aggregate;
pub mod bill_service;
pub mod budget_service;
pub mod category_service;
pub mod dashboard_service;
pub mod error;
pub mod goal_service;
pub mod period;
pub mod plan_service;
pub mod recurrence;
pub mod statistics_service;
pub mod storage;
pub mod transaction_service;

pub use bill_service::{BillService, BillView, PaymentReceipt};
pub use budget_service::{BudgetDetail, BudgetService};
pub use category_service::CategoryService;
pub use dashboard_service::{
    BudgetProgress, DashboardService, DayExpenses, FinancialSummary, ProgressPeriod, TodaySpending,
};
pub use error::{CoreError, CoreResult};
pub use goal_service::{GoalProgress, GoalService, GoalView};
pub use period::{bucketize, Granularity, PeriodBucket};
pub use plan_service::{Plan, PlanService};
pub use statistics_service::{
    BudgetVsActual, CategoryComparison, ComparisonMode, DailySpendingPoint, DailySpendingReport,
    MonthComparison, MonthlyTrendPoint, MonthlyTrendReport, StatisticsService,
};
pub use storage::{Store, TransactionFilter};
pub use transaction_service::TransactionService;
