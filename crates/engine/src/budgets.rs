//! Per-category monthly budgets and their spending status.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

pub const DEFAULT_ALERT_THRESHOLD: i32 = 80;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BudgetKind {
    Fixed,
    #[default]
    Variable,
}

impl BudgetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Variable => "Variable",
        }
    }
}

impl TryFrom<&str> for BudgetKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Fixed" => Ok(Self::Fixed),
            "Variable" => Ok(Self::Variable),
            other => Err(EngineError::Validation(format!(
                "invalid budget type: {other}"
            ))),
        }
    }
}

/// A monthly spending ceiling for one category.
///
/// A user has at most one live budget per category.
#[derive(Clone, Debug, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub limit_amount_minor: i64,
    pub color: String,
    pub icon: Option<String>,
    pub is_rollover: bool,
    pub kind: BudgetKind,
    /// Percentage (0-100) of the limit at which the budget is "near limit".
    pub alert_threshold: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How much of a budget has been spent in the current month.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetStatus {
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

impl BudgetStatus {
    pub fn new(budget: &Budget, spent_amount_minor: i64) -> Self {
        let percentage_used =
            crate::util::percentage(spent_amount_minor, budget.limit_amount_minor);
        let is_over_budget = spent_amount_minor > budget.limit_amount_minor;
        Self {
            budget_id: budget.id,
            category: budget.category.clone(),
            limit_amount_minor: budget.limit_amount_minor,
            spent_amount_minor,
            remaining_amount_minor: budget.limit_amount_minor.saturating_sub(spent_amount_minor),
            percentage_used,
            is_over_budget,
            is_near_limit: percentage_used >= f64::from(budget.alert_threshold)
                && !is_over_budget,
            alert_threshold: budget.alert_threshold,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BudgetSummary {
    pub total_budgets: u64,
    pub total_limit_minor: i64,
    pub total_spent_minor: i64,
    pub total_remaining_minor: i64,
    pub over_budget_count: u64,
    pub near_limit_count: u64,
}

impl BudgetSummary {
    pub fn from_statuses(statuses: &[BudgetStatus]) -> Self {
        statuses.iter().fold(
            Self {
                total_budgets: statuses.len() as u64,
                ..Self::default()
            },
            |mut summary, status| {
                summary.total_limit_minor = summary
                    .total_limit_minor
                    .saturating_add(status.limit_amount_minor);
                summary.total_spent_minor = summary
                    .total_spent_minor
                    .saturating_add(status.spent_amount_minor);
                summary.total_remaining_minor = summary
                    .total_remaining_minor
                    .saturating_add(status.remaining_amount_minor);
                if status.is_over_budget {
                    summary.over_budget_count += 1;
                }
                if status.is_near_limit {
                    summary.near_limit_count += 1;
                }
                summary
            },
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub limit_amount_minor: i64,
    pub color: String,
    pub icon: Option<String>,
    pub is_rollover: bool,
    pub kind: String,
    pub alert_threshold: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id.to_string()),
            user_id: ActiveValue::Set(budget.user_id.to_string()),
            category: ActiveValue::Set(budget.category.clone()),
            limit_amount_minor: ActiveValue::Set(budget.limit_amount_minor),
            color: ActiveValue::Set(budget.color.clone()),
            icon: ActiveValue::Set(budget.icon.clone()),
            is_rollover: ActiveValue::Set(budget.is_rollover),
            kind: ActiveValue::Set(budget.kind.as_str().to_string()),
            alert_threshold: ActiveValue::Set(budget.alert_threshold),
            created_at: ActiveValue::Set(budget.created_at),
            updated_at: ActiveValue::Set(budget.updated_at),
            deleted_at: ActiveValue::Set(None),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "budget")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            category: model.category,
            limit_amount_minor: model.limit_amount_minor,
            color: model.color,
            icon: model.icon,
            is_rollover: model.is_rollover,
            kind: BudgetKind::try_from(model.kind.as_str())?,
            alert_threshold: model.alert_threshold,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
