//! Read-only reporting endpoints.

use api_types::analytics::{
    CategorySpendingView, DailyFlowView, DashboardView, FinancialHealthView, HealthMetricsView,
    IncomeVsExpenseView, InsightsView, MoneyFlowView, MonthComparisonView, MonthlyTrendsView,
    PeriodQuery, SpendingView, TrendsQuery,
};
use axum::{
    Extension,
    extract::{Query, State, rejection::QueryRejection},
};
use engine::{
    CategorySpending, FinancialHealth, IncomeVsExpense, MonthlyTrends, Period,
    analytics::MAX_TREND_MONTHS,
};

use crate::{ApiResult, AuthUser, ServerError, ok, server::ServerState};

fn parse_period(raw: Option<&str>, default: Period) -> Result<Period, ServerError> {
    match raw {
        None => Ok(default),
        Some(raw) => Ok(Period::try_from(raw)?),
    }
}

fn category_view(category: CategorySpending) -> CategorySpendingView {
    CategorySpendingView {
        category: category.category,
        amount_minor: category.amount_minor,
        count: category.count,
        percentage: category.percentage,
        budget_limit_minor: category.budget_limit_minor,
    }
}

fn flow_view(flow: IncomeVsExpense) -> IncomeVsExpenseView {
    IncomeVsExpenseView {
        period: flow.period.as_str().to_string(),
        total_income_minor: flow.total_income_minor,
        total_expense_minor: flow.total_expense_minor,
        net_amount_minor: flow.net_amount_minor,
        savings_rate: flow.savings_rate,
        data_points: flow
            .data_points
            .into_iter()
            .map(|point| DailyFlowView {
                date: point.date,
                income_minor: point.income_minor,
                expense_minor: point.expense_minor,
            })
            .collect(),
    }
}

fn trends_view(trends: MonthlyTrends) -> MonthlyTrendsView {
    MonthlyTrendsView {
        months: trends.months,
        income_minor: trends.income_minor,
        expense_minor: trends.expense_minor,
        savings_minor: trends.savings_minor,
        average_income_minor: trends.average_income_minor,
        average_expense_minor: trends.average_expense_minor,
        trend_direction: trends.direction.as_str().to_string(),
    }
}

fn health_view(health: FinancialHealth) -> FinancialHealthView {
    FinancialHealthView {
        score: health.score,
        rating: health.rating.as_str().to_string(),
        savings_ratio: health.metrics.savings_ratio,
        debt_to_income: health.debt_to_income,
        metrics: HealthMetricsView {
            savings_ratio: health.metrics.savings_ratio,
            budget_compliance: health.metrics.budget_compliance,
            goal_progress: health.metrics.goal_progress,
            emergency_fund_ratio: health.metrics.emergency_fund_ratio,
        },
        recommendations: health.recommendations,
    }
}

pub async fn dashboard(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> ApiResult<DashboardView> {
    let summary = state.engine.dashboard(auth.id).await?;
    let comparison = summary.month_comparison;

    ok(DashboardView {
        total_balance_minor: summary.total_balance_minor,
        total_income_minor: summary.total_income_minor,
        total_expense_minor: summary.total_expense_minor,
        net_savings_minor: summary.net_savings_minor,
        active_goals_count: summary.active_goals_count,
        total_goals_progress: summary.total_goals_progress,
        budget_alerts: summary.budget_alerts,
        recent_transactions: summary.recent_transactions,
        top_categories: summary
            .top_categories
            .into_iter()
            .map(category_view)
            .collect(),
        month_comparison: MonthComparisonView {
            current_month_income_minor: comparison.current_month_income_minor,
            current_month_expense_minor: comparison.current_month_expense_minor,
            previous_month_income_minor: comparison.previous_month_income_minor,
            previous_month_expense_minor: comparison.previous_month_expense_minor,
            income_change: comparison.income_change,
            expense_change: comparison.expense_change,
        },
    })
}

/// Day-by-day flow for short periods, monthly trends for long ones.
pub async fn money_flow(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<MoneyFlowView> {
    let Query(query) = query?;
    let period = parse_period(query.period.as_deref(), Period::SixMonths)?;

    if period.is_daily() {
        let flow = state.engine.income_vs_expense(auth.id, period).await?;
        ok(MoneyFlowView::Daily(flow_view(flow)))
    } else {
        let trends = state
            .engine
            .monthly_trends(auth.id, period.months())
            .await?;
        ok(MoneyFlowView::Monthly(trends_view(trends)))
    }
}

pub async fn spending(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<SpendingView> {
    let Query(query) = query?;
    let period = parse_period(query.period.as_deref(), Period::OneMonth)?;
    let report = state.engine.spending(auth.id, period).await?;

    ok(SpendingView {
        period: period.as_str().to_string(),
        start_date: report.start,
        end_date: report.end,
        total_spending_minor: report.total_spending_minor,
        by_category: report.by_category.into_iter().map(category_view).collect(),
    })
}

pub async fn trends(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    query: Result<Query<TrendsQuery>, QueryRejection>,
) -> ApiResult<MonthlyTrendsView> {
    let Query(query) = query?;
    // 0 asks the engine for its default window.
    let months = match query.months {
        None => 0,
        Some(0) => {
            return Err(ServerError::Validation(format!(
                "months must be between 1 and {MAX_TREND_MONTHS}"
            )));
        }
        Some(months) => months,
    };
    let trends = state.engine.monthly_trends(auth.id, months).await?;

    ok(trends_view(trends))
}

pub async fn health(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> ApiResult<FinancialHealthView> {
    let health = state.engine.financial_health(auth.id).await?;
    ok(health_view(health))
}

pub async fn insights(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> ApiResult<InsightsView> {
    let insights = state.engine.insights(auth.id).await?;
    let health = insights.health;

    ok(InsightsView {
        health_score: health.score,
        rating: health.rating.as_str().to_string(),
        message: insights.message,
        recommendations: health.recommendations,
        generated_at: insights.generated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_defaults_and_rejects_unknown() {
        assert_eq!(
            parse_period(None, Period::SixMonths).unwrap(),
            Period::SixMonths
        );
        assert_eq!(
            parse_period(Some("7days"), Period::SixMonths).unwrap(),
            Period::SevenDays
        );
        assert!(matches!(
            parse_period(Some("2weeks"), Period::OneMonth),
            Err(ServerError::Engine(_))
        ));
    }
}
