//! Read-only aggregation over a user's transactions, wallets, goals and
//! budgets.
//!
//! Everything in this module is a pure function of its inputs and an
//! explicit `now`; the `Engine` methods in `ops::analytics` only load the
//! rows and call into here.
//!
//! Transactions carry no income/expense discriminator, so every completed
//! transaction is counted as an expense and income is always 0. Savings
//! rates and savings ratios are therefore 0 until transactions gain a type.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::{
    Budget, EngineError, SavingGoal, Transaction, Wallet,
    util::{percentage, saturating_sum, shift_months, start_of_month, start_of_year},
};

/// Max number of transactions scanned by a single report (newest first).
pub const TRANSACTION_SCAN_LIMIT: u64 = 10_000;
pub const DEFAULT_TREND_MONTHS: u32 = 6;
pub const MAX_TREND_MONTHS: u32 = 24;

/// Reporting window selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    SevenDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SevenDays => "7days",
            Self::OneMonth => "1month",
            Self::ThreeMonths => "3months",
            Self::SixMonths => "6months",
            Self::OneYear => "1year",
        }
    }

    /// First instant covered by the period.
    ///
    /// `7days` is a rolling week, `1month` and `1year` start at the calendar
    /// month/year, `3months` and `6months` are rolling.
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::SevenDays => now - Duration::days(7),
            Self::OneMonth => start_of_month(now),
            Self::ThreeMonths => shift_months(now, -3),
            Self::SixMonths => shift_months(now, -6),
            Self::OneYear => start_of_year(now),
        }
    }

    /// Short periods are reported day by day, long ones month by month.
    pub fn is_daily(self) -> bool {
        matches!(self, Self::SevenDays | Self::OneMonth)
    }

    /// Number of trailing months a monthly report covers.
    pub fn months(self) -> u32 {
        match self {
            Self::SevenDays | Self::OneMonth => 1,
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
            Self::OneYear => 12,
        }
    }
}

impl TryFrom<&str> for Period {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "7days" => Ok(Self::SevenDays),
            "1month" => Ok(Self::OneMonth),
            "3months" => Ok(Self::ThreeMonths),
            "6months" => Ok(Self::SixMonths),
            "1year" => Ok(Self::OneYear),
            other => Err(EngineError::Validation(format!(
                "invalid period: {other} (expected 7days, 1month, 3months, 6months or 1year)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategorySpending {
    pub category: String,
    pub amount_minor: i64,
    pub count: u64,
    /// Share of the total spend in the same window.
    pub percentage: f64,
    pub budget_limit_minor: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MonthComparison {
    pub current_month_income_minor: i64,
    pub current_month_expense_minor: i64,
    pub previous_month_income_minor: i64,
    pub previous_month_expense_minor: i64,
    pub income_change: f64,
    pub expense_change: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardSummary {
    pub total_balance_minor: i64,
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
    pub net_savings_minor: i64,
    pub active_goals_count: u64,
    pub total_goals_progress: f64,
    pub budget_alerts: u64,
    pub recent_transactions: u64,
    pub top_categories: Vec<CategorySpending>,
    pub month_comparison: MonthComparison,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpendingReport {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub total_spending_minor: i64,
    pub by_category: Vec<CategorySpending>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyFlow {
    pub date: NaiveDate,
    pub income_minor: i64,
    pub expense_minor: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IncomeVsExpense {
    pub period: Period,
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
    pub net_amount_minor: i64,
    pub savings_rate: f64,
    /// One point per calendar day with activity, oldest first.
    pub data_points: Vec<DailyFlow>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyTrends {
    /// Labels such as `Mar 2026`, oldest first.
    pub months: Vec<String>,
    pub income_minor: Vec<i64>,
    pub expense_minor: Vec<i64>,
    pub savings_minor: Vec<i64>,
    pub average_income_minor: f64,
    pub average_expense_minor: f64,
    pub direction: TrendDirection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthRating {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl HealthRating {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::NeedsImprovement,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }

    fn insight(self) -> &'static str {
        match self {
            Self::Excellent => {
                "Excellent job! Your finances are in great shape. Keep up the good work with budgeting and saving."
            }
            Self::Good => {
                "You're doing well! There are a few areas where you can improve to achieve better financial health."
            }
            Self::Fair => {
                "Your finances need some attention. Focus on the recommendations below to improve your financial health."
            }
            Self::NeedsImprovement => {
                "Your financial health needs significant improvement. Start by implementing the recommendations below."
            }
        }
    }
}

/// Raw inputs of the health score, all percentages except
/// `emergency_fund_ratio` (months of cover / 3).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HealthMetrics {
    pub savings_ratio: f64,
    pub budget_compliance: f64,
    pub goal_progress: f64,
    pub emergency_fund_ratio: f64,
}

impl HealthMetrics {
    /// Weighted score in 0..=100.
    pub fn score(&self) -> u32 {
        let savings = tier(self.savings_ratio, [(20.0, 30), (10.0, 20), (5.0, 10)]);
        let budgets = tier(self.budget_compliance, [(80.0, 25), (60.0, 15), (40.0, 10)]);
        let goals = tier(self.goal_progress, [(75.0, 20), (50.0, 15), (25.0, 10)]);
        let emergency = tier(self.emergency_fund_ratio, [(1.0, 25), (0.5, 15), (0.25, 10)]);
        savings + budgets + goals + emergency
    }

    /// Advice for every metric below its "good" tier.
    pub fn recommendations(&self, has_goals: bool) -> Vec<String> {
        let mut out = Vec::new();
        if self.savings_ratio < 10.0 {
            out.push("Try to save at least 10-20% of your income".to_string());
        }
        if self.budget_compliance < 80.0 {
            out.push("Review your budgets and track spending more carefully".to_string());
        }
        if self.emergency_fund_ratio < 1.0 {
            out.push("Build an emergency fund covering 3-6 months of expenses".to_string());
        }
        if has_goals && self.goal_progress < 50.0 {
            out.push("Increase contributions to your savings goals".to_string());
        }
        out
    }
}

fn tier(value: f64, tiers: [(f64, u32); 3]) -> u32 {
    tiers
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map_or(0, |(_, points)| *points)
}

#[derive(Clone, Debug, PartialEq)]
pub struct FinancialHealth {
    pub score: u32,
    pub rating: HealthRating,
    pub metrics: HealthMetrics,
    /// Not tracked yet; always 0.
    pub debt_to_income: f64,
    pub recommendations: Vec<String>,
}

impl FinancialHealth {
    pub fn new(metrics: HealthMetrics, has_goals: bool) -> Self {
        let score = metrics.score();
        Self {
            score,
            rating: HealthRating::from_score(score),
            metrics,
            debt_to_income: 0.0,
            recommendations: metrics.recommendations(has_goals),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Insights {
    pub message: String,
    pub generated_at: DateTime<Utc>,
    pub health: FinancialHealth,
}

impl Insights {
    pub fn new(health: FinancialHealth, generated_at: DateTime<Utc>) -> Self {
        let mut message = health.rating.insight().to_string();
        if let Some(first) = health.recommendations.first() {
            message.push(' ');
            message.push_str(first);
        }
        Self {
            message,
            generated_at,
            health,
        }
    }
}

fn completed(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions.iter().filter(|tx| tx.is_completed())
}

fn in_range(tx: &Transaction, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    tx.transaction_date >= start && tx.transaction_date < end
}

/// Group by category, biggest spend first (ties by name).
fn group_by_category<'a>(
    transactions: impl Iterator<Item = &'a Transaction>,
) -> (Vec<CategorySpending>, i64) {
    let mut by_category: HashMap<&str, (i64, u64)> = HashMap::new();
    let mut total: i64 = 0;
    for tx in transactions {
        let entry = by_category.entry(tx.category.as_str()).or_default();
        entry.0 = entry.0.saturating_add(tx.amount_minor);
        entry.1 += 1;
        total = total.saturating_add(tx.amount_minor);
    }

    let mut categories: Vec<CategorySpending> = by_category
        .into_iter()
        .map(|(category, (amount_minor, count))| CategorySpending {
            category: category.to_string(),
            amount_minor,
            count,
            percentage: percentage(amount_minor, total),
            budget_limit_minor: None,
        })
        .collect();
    categories.sort_by(|a, b| {
        b.amount_minor
            .cmp(&a.amount_minor)
            .then_with(|| a.category.cmp(&b.category))
    });
    (categories, total)
}

pub(crate) fn spent_in_category(
    transactions: &[Transaction],
    category: &str,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> i64 {
    let amounts = completed(transactions)
        .filter(|tx| tx.category == category && tx.transaction_date >= start)
        .filter(|tx| end.is_none_or(|end| tx.transaction_date < end))
        .map(|tx| tx.amount_minor);
    saturating_sum(amounts)
}

/// Current-month overview.
pub fn dashboard(
    wallets: &[Wallet],
    transactions: &[Transaction],
    goals: &[SavingGoal],
    budgets: &[Budget],
    now: DateTime<Utc>,
) -> DashboardSummary {
    let month_start = start_of_month(now);
    let month_end = shift_months(month_start, 1);

    let (top_categories, total_expense) = group_by_category(
        completed(transactions).filter(|tx| in_range(tx, month_start, month_end)),
    );
    let recent_transactions = top_categories.iter().map(|c| c.count).sum();

    let total_target = saturating_sum(goals.iter().map(|g| g.target_amount_minor));
    let total_current = saturating_sum(goals.iter().map(|g| g.current_amount_minor));

    let budget_alerts = budgets
        .iter()
        .filter(|budget| {
            let spent = top_categories
                .iter()
                .find(|c| c.category == budget.category)
                .map_or(0, |c| c.amount_minor);
            spent > budget.limit_amount_minor
                || percentage(spent, budget.limit_amount_minor)
                    >= f64::from(budget.alert_threshold)
        })
        .count() as u64;

    let total_income: i64 = 0;
    DashboardSummary {
        total_balance_minor: saturating_sum(wallets.iter().map(|w| w.balance_minor)),
        total_income_minor: total_income,
        total_expense_minor: total_expense,
        net_savings_minor: total_income.saturating_sub(total_expense),
        active_goals_count: goals.iter().filter(|g| !g.is_completed()).count() as u64,
        total_goals_progress: percentage(total_current, total_target),
        budget_alerts,
        recent_transactions,
        top_categories,
        month_comparison: month_comparison(transactions, month_start),
    }
}

fn month_comparison(transactions: &[Transaction], month_start: DateTime<Utc>) -> MonthComparison {
    let month_end = shift_months(month_start, 1);
    let previous_start = shift_months(month_start, -1);

    let mut comparison = MonthComparison::default();
    for tx in completed(transactions) {
        if in_range(tx, month_start, month_end) {
            comparison.current_month_expense_minor = comparison
                .current_month_expense_minor
                .saturating_add(tx.amount_minor);
        } else if in_range(tx, previous_start, month_start) {
            comparison.previous_month_expense_minor = comparison
                .previous_month_expense_minor
                .saturating_add(tx.amount_minor);
        }
    }
    comparison.income_change = change(
        comparison.current_month_income_minor,
        comparison.previous_month_income_minor,
    );
    comparison.expense_change = change(
        comparison.current_month_expense_minor,
        comparison.previous_month_expense_minor,
    );
    comparison
}

fn change(current: i64, previous: i64) -> f64 {
    percentage(current.saturating_sub(previous), previous)
}

/// Spending per category over the inclusive window `[start, end]`.
pub fn spending_by_category(
    transactions: &[Transaction],
    budgets: &[Budget],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> SpendingReport {
    let (mut by_category, total_spending_minor) = group_by_category(
        completed(transactions)
            .filter(|tx| tx.transaction_date >= start && tx.transaction_date <= end),
    );
    let limits: HashMap<&str, i64> = budgets
        .iter()
        .map(|b| (b.category.as_str(), b.limit_amount_minor))
        .collect();
    for category in &mut by_category {
        category.budget_limit_minor = limits.get(category.category.as_str()).copied();
    }
    SpendingReport {
        start,
        end,
        total_spending_minor,
        by_category,
    }
}

/// Day-by-day flow since the start of `period`.
pub fn income_vs_expense(
    transactions: &[Transaction],
    period: Period,
    now: DateTime<Utc>,
) -> IncomeVsExpense {
    let start = period.start(now);
    let mut daily: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for tx in completed(transactions).filter(|tx| tx.transaction_date >= start) {
        let day = daily.entry(tx.transaction_date.date_naive()).or_default();
        *day = day.saturating_add(tx.amount_minor);
    }

    let total_income_minor: i64 = 0;
    let total_expense_minor = saturating_sum(daily.values().copied());
    let net_amount_minor = total_income_minor.saturating_sub(total_expense_minor);
    IncomeVsExpense {
        period,
        total_income_minor,
        total_expense_minor,
        net_amount_minor,
        savings_rate: percentage(net_amount_minor, total_income_minor),
        data_points: daily
            .into_iter()
            .map(|(date, expense_minor)| DailyFlow {
                date,
                income_minor: 0,
                expense_minor,
            })
            .collect(),
    }
}

/// Per-month series for the trailing `months` calendar months, current
/// month included. `0` means the default of 6; anything above 24 is capped.
pub fn monthly_trends(transactions: &[Transaction], months: u32, now: DateTime<Utc>) -> MonthlyTrends {
    let months = match months {
        0 => DEFAULT_TREND_MONTHS,
        n => n.min(MAX_TREND_MONTHS),
    };
    let current = start_of_month(now);
    let starts: Vec<DateTime<Utc>> = (0..months)
        .rev()
        .map(|back| shift_months(current, -(back as i32)))
        .collect();

    let mut expense_by_month: HashMap<(i32, u32), i64> = HashMap::new();
    for tx in completed(transactions) {
        let key = (tx.transaction_date.year(), tx.transaction_date.month());
        let month = expense_by_month.entry(key).or_default();
        *month = month.saturating_add(tx.amount_minor);
    }

    let mut trends = MonthlyTrends {
        months: Vec::with_capacity(starts.len()),
        income_minor: Vec::with_capacity(starts.len()),
        expense_minor: Vec::with_capacity(starts.len()),
        savings_minor: Vec::with_capacity(starts.len()),
        average_income_minor: 0.0,
        average_expense_minor: 0.0,
        direction: TrendDirection::Stable,
    };
    for start in &starts {
        let expense = expense_by_month
            .get(&(start.year(), start.month()))
            .copied()
            .unwrap_or(0);
        let income: i64 = 0;
        trends.months.push(start.format("%b %Y").to_string());
        trends.income_minor.push(income);
        trends.expense_minor.push(expense);
        trends.savings_minor.push(income.saturating_sub(expense));
    }

    let count = f64::from(months);
    trends.average_income_minor =
        saturating_sum(trends.income_minor.iter().copied()) as f64 / count;
    trends.average_expense_minor =
        saturating_sum(trends.expense_minor.iter().copied()) as f64 / count;
    trends.direction = match trends.savings_minor.as_slice() {
        [.., previous, recent] if recent > previous => TrendDirection::Up,
        [.., previous, recent] if recent < previous => TrendDirection::Down,
        _ => TrendDirection::Stable,
    };
    trends
}

/// Compute the health metrics from current-month activity.
pub fn health_metrics(
    wallets: &[Wallet],
    transactions: &[Transaction],
    goals: &[SavingGoal],
    budgets: &[Budget],
    now: DateTime<Utc>,
) -> HealthMetrics {
    let month_start = start_of_month(now);
    let monthly_income: i64 = 0;
    let monthly_expense = saturating_sum(
        completed(transactions)
            .filter(|tx| tx.transaction_date >= month_start)
            .map(|tx| tx.amount_minor),
    );

    let compliant = budgets
        .iter()
        .filter(|b| {
            spent_in_category(transactions, &b.category, month_start, None) <= b.limit_amount_minor
        })
        .count();

    let total_target = saturating_sum(goals.iter().map(|g| g.target_amount_minor));
    let total_current = saturating_sum(goals.iter().map(|g| g.current_amount_minor));
    let total_balance = saturating_sum(wallets.iter().map(|w| w.balance_minor));

    HealthMetrics {
        savings_ratio: percentage(monthly_income.saturating_sub(monthly_expense), monthly_income),
        budget_compliance: percentage(compliant as i64, budgets.len() as i64),
        goal_progress: percentage(total_current, total_target),
        emergency_fund_ratio: if monthly_expense > 0 {
            total_balance as f64 / (monthly_expense as f64 * 3.0)
        } else {
            0.0
        },
    }
}

pub fn financial_health(
    wallets: &[Wallet],
    transactions: &[Transaction],
    goals: &[SavingGoal],
    budgets: &[Budget],
    now: DateTime<Utc>,
) -> FinancialHealth {
    let metrics = health_metrics(wallets, transactions, goals, budgets, now);
    FinancialHealth::new(metrics, !goals.is_empty())
}
