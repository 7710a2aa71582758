//! Saving goals.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GoalPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl GoalPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl TryFrom<&str> for GoalPriority {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            "Low" => Ok(Self::Low),
            other => Err(EngineError::Validation(format!(
                "invalid goal priority: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GoalStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Paused => "Paused",
            Self::Completed => "Completed",
        }
    }
}

impl TryFrom<&str> for GoalStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Active" => Ok(Self::Active),
            "Paused" => Ok(Self::Paused),
            "Completed" => Ok(Self::Completed),
            other => Err(EngineError::Validation(format!(
                "invalid goal status: {other}"
            ))),
        }
    }
}

/// A savings target.
///
/// Invariant: `0 <= current_amount_minor <= target_amount_minor`, and the
/// goal is `Completed` as soon as the two are equal.
#[derive(Clone, Debug, PartialEq)]
pub struct SavingGoal {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavingGoal {
    pub fn is_completed(&self) -> bool {
        self.status == GoalStatus::Completed
    }

    /// Mark the goal completed once the target is reached.
    pub(crate) fn refresh_status(&mut self) {
        if self.current_amount_minor >= self.target_amount_minor {
            self.status = GoalStatus::Completed;
        }
    }

    pub fn progress_percentage(&self) -> f64 {
        crate::util::percentage(self.current_amount_minor, self.target_amount_minor)
    }

    pub fn remaining_minor(&self) -> i64 {
        self.target_amount_minor
            .saturating_sub(self.current_amount_minor)
            .max(0)
    }

    /// Whole days until the deadline (negative once it has passed).
    pub fn days_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.deadline.map(|deadline| (deadline - now).num_days())
    }
}

/// Aggregate progress over all goals of a user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GoalSummary {
    pub total_goals: u64,
    pub completed_goals: u64,
    pub active_goals: u64,
    pub total_target_minor: i64,
    pub total_saved_minor: i64,
    pub overall_progress: f64,
}

impl GoalSummary {
    pub fn from_goals(goals: &[SavingGoal]) -> Self {
        let mut summary = Self {
            total_goals: goals.len() as u64,
            ..Self::default()
        };
        for goal in goals {
            if goal.is_completed() {
                summary.completed_goals += 1;
            } else {
                summary.active_goals += 1;
            }
            summary.total_target_minor = summary
                .total_target_minor
                .saturating_add(goal.target_amount_minor);
            summary.total_saved_minor = summary
                .total_saved_minor
                .saturating_add(goal.current_amount_minor);
        }
        summary.overall_progress =
            crate::util::percentage(summary.total_saved_minor, summary.total_target_minor);
        summary
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "saving_goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount_minor: i64,
    pub current_amount_minor: i64,
    pub color: String,
    pub icon: Option<String>,
    pub deadline: Option<DateTimeUtc>,
    pub priority: String,
    pub category: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SavingGoal> for ActiveModel {
    fn from(goal: &SavingGoal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            user_id: ActiveValue::Set(goal.user_id.to_string()),
            name: ActiveValue::Set(goal.name.clone()),
            target_amount_minor: ActiveValue::Set(goal.target_amount_minor),
            current_amount_minor: ActiveValue::Set(goal.current_amount_minor),
            color: ActiveValue::Set(goal.color.clone()),
            icon: ActiveValue::Set(goal.icon.clone()),
            deadline: ActiveValue::Set(goal.deadline),
            priority: ActiveValue::Set(goal.priority.as_str().to_string()),
            category: ActiveValue::Set(goal.category.clone()),
            status: ActiveValue::Set(goal.status.as_str().to_string()),
            created_at: ActiveValue::Set(goal.created_at),
            updated_at: ActiveValue::Set(goal.updated_at),
            deleted_at: ActiveValue::Set(None),
        }
    }
}

impl TryFrom<Model> for SavingGoal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "goal")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            name: model.name,
            target_amount_minor: model.target_amount_minor,
            current_amount_minor: model.current_amount_minor,
            color: model.color,
            icon: model.icon,
            deadline: model.deadline,
            priority: GoalPriority::try_from(model.priority.as_str())?,
            category: model.category,
            status: GoalStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn goal(target: i64, current: i64) -> SavingGoal {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        SavingGoal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Laptop".to_string(),
            target_amount_minor: target,
            current_amount_minor: current,
            color: "#0ea5e9".to_string(),
            icon: None,
            deadline: Some(now + Duration::days(30)),
            priority: GoalPriority::default(),
            category: None,
            status: GoalStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn derived_progress_fields() {
        let goal = goal(10_000, 2_500);
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(goal.progress_percentage(), 25.0);
        assert_eq!(goal.remaining_minor(), 7_500);
        assert_eq!(goal.days_remaining(now), Some(30));
    }

    #[test]
    fn reaching_target_completes() {
        let mut goal = goal(10_000, 10_000);
        goal.refresh_status();
        assert!(goal.is_completed());
    }

    #[test]
    fn summary_counts_and_progress() {
        let mut done = goal(5_000, 5_000);
        done.refresh_status();
        let summary = GoalSummary::from_goals(&[goal(10_000, 2_500), done]);
        assert_eq!(summary.total_goals, 2);
        assert_eq!(summary.completed_goals, 1);
        assert_eq!(summary.active_goals, 1);
        assert_eq!(summary.total_target_minor, 15_000);
        assert_eq!(summary.total_saved_minor, 7_500);
        assert_eq!(summary.overall_progress, 50.0);
    }

    #[test]
    fn empty_summary_has_zero_progress() {
        assert_eq!(GoalSummary::from_goals(&[]), GoalSummary::default());
    }
}
