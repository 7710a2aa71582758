//! Request and response bodies of the HTTP API.
//!
//! Every response is wrapped in [`ApiResponse`]. Money is always an integer
//! amount of minor units in fields suffixed `_minor`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Uniform response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Deserializer for fields that distinguish "absent" from "null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<Option<T>>`: a missing field stays `None`, an explicit `null`
/// becomes `Some(None)`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub version: String,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub is_onboarded: bool,
        pub monthly_income_minor: i64,
        pub currency: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Returned by register and login.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        /// HS256 bearer token.
        pub token: String,
        pub user: UserView,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub name: Option<String>,
        pub email: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OnboardingRequest {
        pub monthly_income_minor: i64,
        /// ISO 4217 code, e.g. `KES`.
        pub currency: String,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum WalletType {
        #[serde(rename = "Mobile Money")]
        MobileMoney,
        Bank,
        Cash,
        Credit,
        Savings,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: WalletType,
        /// Opening balance, defaults to 0.
        pub balance_minor: Option<i64>,
        /// Defaults to `KES`.
        pub currency: Option<String>,
        pub color: String,
        pub account_number: Option<String>,
        #[serde(default)]
        pub is_default: bool,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WalletUpdate {
        pub name: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<WalletType>,
        pub balance_minor: Option<i64>,
        pub currency: Option<String>,
        pub color: Option<String>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub account_number: Option<Option<String>>,
        pub is_default: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: WalletType,
        pub balance_minor: i64,
        pub currency: String,
        pub color: String,
        pub account_number: Option<String>,
        pub is_default: bool,
        pub last_synced: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferRequest {
        pub from_wallet_id: Uuid,
        pub to_wallet_id: Uuid,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferResponse {
        pub message: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum TransactionStatus {
        Completed,
        Pending,
        Failed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub amount_minor: i64,
        pub description: String,
        pub method: String,
        pub category: String,
        pub wallet_id: Option<Uuid>,
        /// Defaults to `Completed`.
        pub status: Option<TransactionStatus>,
        pub notes: Option<String>,
        pub receipt_url: Option<String>,
        /// Defaults to the time of the request.
        pub transaction_date: Option<DateTime<Utc>>,
    }

    /// Partial update. `null` clears `wallet_id`, `notes` and `receipt_url`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub wallet_id: Option<Option<Uuid>>,
        pub amount_minor: Option<i64>,
        pub description: Option<String>,
        pub method: Option<String>,
        pub category: Option<String>,
        pub status: Option<TransactionStatus>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub notes: Option<Option<String>>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub receipt_url: Option<Option<String>>,
        pub transaction_date: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub wallet_id: Option<Uuid>,
        pub amount_minor: i64,
        pub description: String,
        pub method: String,
        pub category: String,
        pub status: TransactionStatus,
        pub notes: Option<String>,
        pub receipt_url: Option<String>,
        pub transaction_date: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        /// 1-based, defaults to 1.
        pub page: Option<u64>,
        /// 1..=100, defaults to 20.
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Pagination {
        pub page: u64,
        pub limit: u64,
        pub total: u64,
        pub total_pages: u64,
        pub has_next: bool,
        pub has_prev: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        pub pagination: Pagination,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionStatsView {
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        pub net_balance_minor: i64,
        pub transaction_count: u64,
    }
}

pub mod goal {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum GoalPriority {
        High,
        Medium,
        Low,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum GoalStatus {
        Active,
        Paused,
        Completed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        pub target_amount_minor: i64,
        #[serde(default)]
        pub current_amount_minor: i64,
        pub color: String,
        pub icon: Option<String>,
        pub deadline: Option<DateTime<Utc>>,
        pub priority: Option<GoalPriority>,
        pub category: Option<String>,
        pub status: Option<GoalStatus>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub name: Option<String>,
        pub target_amount_minor: Option<i64>,
        pub current_amount_minor: Option<i64>,
        pub color: Option<String>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub icon: Option<Option<String>>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub deadline: Option<Option<DateTime<Utc>>>,
        pub priority: Option<GoalPriority>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub category: Option<Option<String>>,
        pub status: Option<GoalStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalProgress {
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub name: String,
        pub target_amount_minor: i64,
        pub current_amount_minor: i64,
        pub color: String,
        pub icon: Option<String>,
        pub deadline: Option<DateTime<Utc>>,
        pub priority: GoalPriority,
        pub category: Option<String>,
        pub status: GoalStatus,
        pub progress_percentage: f64,
        pub remaining_minor: i64,
        pub days_remaining: Option<i64>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalSummaryView {
        pub total_goals: u64,
        pub completed_goals: u64,
        pub active_goals: u64,
        pub total_target_minor: i64,
        pub total_saved_minor: i64,
        pub overall_progress: f64,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum BudgetType {
        Fixed,
        Variable,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category: String,
        pub limit_amount_minor: i64,
        pub color: String,
        pub icon: Option<String>,
        #[serde(default)]
        pub is_rollover: bool,
        /// Defaults to `Variable`.
        #[serde(rename = "type")]
        pub kind: Option<BudgetType>,
        /// Percentage (0-100), defaults to 80.
        pub alert_threshold: Option<i32>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub category: Option<String>,
        pub limit_amount_minor: Option<i64>,
        pub color: Option<String>,
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub icon: Option<Option<String>>,
        pub is_rollover: Option<bool>,
        #[serde(rename = "type")]
        pub kind: Option<BudgetType>,
        pub alert_threshold: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub category: String,
        pub limit_amount_minor: i64,
        pub color: String,
        pub icon: Option<String>,
        pub is_rollover: bool,
        #[serde(rename = "type")]
        pub kind: BudgetType,
        pub alert_threshold: i32,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetStatusView {
        pub budget_id: Uuid,
        pub category: String,
        pub limit_amount_minor: i64,
        pub spent_amount_minor: i64,
        pub remaining_amount_minor: i64,
        pub percentage_used: f64,
        pub is_over_budget: bool,
        pub is_near_limit: bool,
        pub alert_threshold: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSummaryView {
        pub total_budgets: u64,
        pub total_limit_minor: i64,
        pub total_spent_minor: i64,
        pub total_remaining_minor: i64,
        pub over_budget_count: u64,
        pub near_limit_count: u64,
    }
}

pub mod analytics {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PeriodQuery {
        /// `7days`, `1month`, `3months`, `6months` or `1year`.
        pub period: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TrendsQuery {
        pub months: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpendingView {
        pub category: String,
        pub amount_minor: i64,
        pub count: u64,
        pub percentage: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub budget_limit_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthComparisonView {
        pub current_month_income_minor: i64,
        pub current_month_expense_minor: i64,
        pub previous_month_income_minor: i64,
        pub previous_month_expense_minor: i64,
        pub income_change: f64,
        pub expense_change: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardView {
        pub total_balance_minor: i64,
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        pub net_savings_minor: i64,
        pub active_goals_count: u64,
        pub total_goals_progress: f64,
        pub budget_alerts: u64,
        pub recent_transactions: u64,
        pub top_categories: Vec<CategorySpendingView>,
        pub month_comparison: MonthComparisonView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingView {
        pub period: String,
        pub start_date: DateTime<Utc>,
        pub end_date: DateTime<Utc>,
        pub total_spending_minor: i64,
        pub by_category: Vec<CategorySpendingView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyFlowView {
        pub date: NaiveDate,
        pub income_minor: i64,
        pub expense_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeVsExpenseView {
        pub period: String,
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        pub net_amount_minor: i64,
        pub savings_rate: f64,
        pub data_points: Vec<DailyFlowView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTrendsView {
        pub months: Vec<String>,
        pub income_minor: Vec<i64>,
        pub expense_minor: Vec<i64>,
        pub savings_minor: Vec<i64>,
        pub average_income_minor: f64,
        pub average_expense_minor: f64,
        /// `up`, `down` or `stable`.
        pub trend_direction: String,
    }

    /// Short periods are reported per day, long ones per month.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum MoneyFlowView {
        Daily(IncomeVsExpenseView),
        Monthly(MonthlyTrendsView),
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HealthMetricsView {
        pub savings_ratio: f64,
        pub budget_compliance: f64,
        pub goal_progress: f64,
        pub emergency_fund_ratio: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FinancialHealthView {
        pub score: u32,
        /// `Excellent`, `Good`, `Fair` or `Needs Improvement`.
        pub rating: String,
        pub savings_ratio: f64,
        pub debt_to_income: f64,
        pub metrics: HealthMetricsView,
        pub recommendations: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InsightsView {
        pub health_score: u32,
        pub rating: String,
        pub message: String,
        pub recommendations: Vec<String>,
        pub generated_at: DateTime<Utc>,
    }
}
