mod common;

use chrono::NaiveDate;

use moneta::{
    Budget, BudgetService, BudgetTimeframe, BudgetVsActual, DateWindow, Granularity, PlanItem,
    PlanItemType, PlanService, PlanType, StatisticsService,
};

use common::{at, expense_category, income_category, record_expense, record_income, store_with_user};

#[test]
fn seven_day_window_materializes_every_bucket() {
    let (store, user) = store_with_user();
    let groceries = expense_category(&store, user, "Groceries");
    let now = at(2025, 6, 7, 18);

    record_expense(&store, user, groceries.id, 50.0, at(2025, 6, 1, 10));
    record_expense(&store, user, groceries.id, 30.0, at(2025, 6, 3, 10));
    record_expense(&store, user, groceries.id, 20.0, at(2025, 6, 6, 10));

    let report = StatisticsService::daily_spending(&store, user, 7, now).unwrap();
    assert_eq!(report.days.len(), 7);
    let non_zero = report.days.iter().filter(|d| d.amount > 0.0).count();
    assert_eq!(non_zero, 3);
    assert_eq!(report.zero_spend_days, 4);
    let total: f64 = report.days.iter().map(|d| d.amount).sum();
    assert_eq!(total, 100.0);
}

#[test]
fn daily_spending_tracks_average_and_extremes() {
    let (store, user) = store_with_user();
    let groceries = expense_category(&store, user, "Groceries");
    let now = at(2025, 6, 7, 18);

    record_expense(&store, user, groceries.id, 50.0, at(2025, 6, 1, 10));
    record_expense(&store, user, groceries.id, 30.0, at(2025, 6, 3, 10));
    record_expense(&store, user, groceries.id, 20.0, at(2025, 6, 6, 10));

    let report = StatisticsService::daily_spending(&store, user, 7, now).unwrap();
    let expected_average = 100.0 / 7.0;
    assert!((report.average - expected_average).abs() < 1e-9);

    let highest = report.highest.as_ref().unwrap();
    assert_eq!(highest.amount, 50.0);
    assert_eq!(highest.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());

    // lowest figure skips zero-spend days
    let lowest = report.lowest_nonzero.as_ref().unwrap();
    assert_eq!(lowest.amount, 20.0);

    let spike = report
        .days
        .iter()
        .find(|d| d.amount == 50.0)
        .unwrap();
    let expected = (50.0 - expected_average) / expected_average * 100.0;
    assert!((spike.comparison_to_average - expected).abs() < 1e-9);

    let quiet = report.days.iter().find(|d| d.amount == 0.0).unwrap();
    assert_eq!(quiet.comparison_to_average, -100.0);
}

#[test]
fn daily_spending_with_no_expenses_is_all_zero() {
    let (store, user) = store_with_user();
    let now = at(2025, 6, 7, 18);

    let report = StatisticsService::daily_spending(&store, user, 14, now).unwrap();
    assert_eq!(report.days.len(), 14);
    assert_eq!(report.average, 0.0);
    assert_eq!(report.zero_spend_days, 14);
    assert!(report.highest.is_none());
    assert!(report.lowest_nonzero.is_none());
    assert!(report.days.iter().all(|d| d.comparison_to_average == 0.0));
}

#[test]
fn income_vs_expenses_chart_reports_net_per_month() {
    let (store, user) = store_with_user();
    let salary = income_category(&store, user, "Salary");
    let groceries = expense_category(&store, user, "Groceries");
    let now = at(2025, 6, 20, 12);

    record_income(&store, user, salary.id, 3000.0, at(2025, 4, 5, 9));
    record_expense(&store, user, groceries.id, 500.0, at(2025, 4, 20, 9));
    record_income(&store, user, salary.id, 3000.0, at(2025, 6, 5, 9));

    let chart =
        StatisticsService::income_vs_expenses(&store, user, 3, Granularity::Month, now).unwrap();
    assert_eq!(chart.len(), 3);
    assert_eq!(chart[0].label, "Apr 2025");
    assert_eq!(chart[0].net, 2500.0);
    assert_eq!(chart[1].income, 0.0);
    assert_eq!(chart[1].expenses, 0.0);
    assert_eq!(chart[2].income, 3000.0);
}

#[test]
fn expense_categories_share_the_window_total() {
    let (store, user) = store_with_user();
    let groceries = expense_category(&store, user, "Groceries");
    let dining = expense_category(&store, user, "Dining Out");

    record_expense(&store, user, groceries.id, 75.0, at(2025, 6, 2, 12));
    record_expense(&store, user, dining.id, 25.0, at(2025, 6, 3, 19));

    let window = DateWindow::new(at(2025, 6, 1, 0), at(2025, 6, 30, 23)).unwrap();
    let slices = StatisticsService::expense_categories(&store, user, window).unwrap();
    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].category_id, groceries.id);
    assert_eq!(slices[0].percentage, 75.0);
    assert_eq!(slices[1].percentage, 25.0);
}

#[test]
fn monthly_trends_attribute_savings_by_plan_item_creation_date() {
    let (store, user) = store_with_user();
    let salary = income_category(&store, user, "Salary");
    let now = at(2025, 6, 20, 12);

    record_income(&store, user, salary.id, 2000.0, at(2025, 5, 5, 9));
    record_income(&store, user, salary.id, 2400.0, at(2025, 6, 5, 9));

    let items = vec![
        PlanItem::new(
            user,
            "Nest egg",
            300.0,
            PlanType::Monthly,
            PlanItemType::Savings,
            at(2025, 5, 10, 0),
        ),
        PlanItem::new(
            user,
            "Vacation",
            150.0,
            PlanType::Weekly,
            PlanItemType::Savings,
            at(2025, 6, 12, 0),
        ),
    ];
    PlanService::replace(&store, user, PlanType::Monthly, vec![items[0].clone()]).unwrap();
    PlanService::replace(&store, user, PlanType::Weekly, vec![items[1].clone()]).unwrap();

    let report = StatisticsService::monthly_trends(&store, user, 3, now).unwrap();
    assert_eq!(report.points.len(), 3);
    assert_eq!(report.points[0].savings, 0.0);
    assert_eq!(report.points[1].savings, 300.0);
    assert_eq!(report.points[2].savings, 150.0);
    assert_eq!(report.points[2].income, 2400.0);
}

#[test]
fn trend_from_a_zero_income_month_is_zero_not_infinite() {
    let (store, user) = store_with_user();
    let salary = income_category(&store, user, "Salary");
    let now = at(2025, 6, 20, 12);

    // no income in May, income in June: baseline is zero
    record_income(&store, user, salary.id, 1800.0, at(2025, 6, 5, 9));

    let report = StatisticsService::monthly_trends(&store, user, 2, now).unwrap();
    assert_eq!(report.points[0].income, 0.0);
    assert_eq!(report.income_trend, 0.0);
    assert!(report.income_trend.is_finite());
}

#[test]
fn budget_vs_actual_by_category_includes_both_sides_of_the_union() {
    let (store, user) = store_with_user();
    let groceries = expense_category(&store, user, "Groceries");
    let dining = expense_category(&store, user, "Dining Out");
    let transport = expense_category(&store, user, "Transport");
    let now = at(2025, 6, 20, 12);

    let budget = BudgetService::create(
        &store,
        Budget::new(
            user,
            "June",
            800.0,
            at(2025, 6, 1, 0),
            at(2025, 6, 30, 23),
            BudgetTimeframe::Monthly,
        ),
    )
    .unwrap();
    BudgetService::set_allocation(&store, user, budget.id, groceries.id, 400.0).unwrap();
    BudgetService::set_allocation(&store, user, budget.id, transport.id, 100.0).unwrap();

    record_expense(&store, user, groceries.id, 450.0, at(2025, 6, 10, 12));
    // dining is unbudgeted spending; transport is budgeted but unspent
    record_expense(&store, user, dining.id, 80.0, at(2025, 6, 11, 19));

    let rows = match StatisticsService::budget_vs_actual(
        &store,
        user,
        moneta::ComparisonMode::Category,
        now,
    )
    .unwrap()
    {
        BudgetVsActual::ByCategory(rows) => rows,
        other => panic!("unexpected report shape: {other:?}"),
    };
    assert_eq!(rows.len(), 3);

    let by_id = |id| rows.iter().find(|r| r.category_id == id).unwrap();
    let over = by_id(groceries.id);
    assert_eq!(over.variance, 50.0);
    assert_eq!(over.variance_percentage, 12.5);

    let unbudgeted = by_id(dining.id);
    assert_eq!(unbudgeted.budget_amount, 0.0);
    assert_eq!(unbudgeted.actual_amount, 80.0);
    assert_eq!(unbudgeted.variance_percentage, 0.0);

    let unspent = by_id(transport.id);
    assert_eq!(unspent.actual_amount, 0.0);
    assert_eq!(unspent.variance, -100.0);
}

#[test]
fn budget_vs_actual_by_month_spans_the_current_year() {
    let (store, user) = store_with_user();
    let groceries = expense_category(&store, user, "Groceries");
    let now = at(2025, 6, 20, 12);

    BudgetService::create(
        &store,
        Budget::new(
            user,
            "June",
            600.0,
            at(2025, 6, 1, 0),
            at(2025, 6, 30, 23),
            BudgetTimeframe::Monthly,
        ),
    )
    .unwrap();
    record_expense(&store, user, groceries.id, 720.0, at(2025, 6, 10, 12));

    let rows = match StatisticsService::budget_vs_actual(
        &store,
        user,
        moneta::ComparisonMode::Month,
        now,
    )
    .unwrap()
    {
        BudgetVsActual::ByMonth(rows) => rows,
        other => panic!("unexpected report shape: {other:?}"),
    };
    assert_eq!(rows.len(), 12);
    let june = rows.iter().find(|r| r.label == "Jun 2025").unwrap();
    assert_eq!(june.budget_amount, 600.0);
    assert_eq!(june.actual_amount, 720.0);
    assert_eq!(june.variance, 120.0);
    assert_eq!(june.variance_percentage, 20.0);

    let january = rows.iter().find(|r| r.label == "Jan 2025").unwrap();
    assert_eq!(january.budget_amount, 0.0);
    assert_eq!(january.actual_amount, 0.0);
    assert_eq!(january.variance_percentage, 0.0);
}
