use chrono::Utc;
use uuid::Uuid;

use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{
    EngineError, GoalPatch, GoalStatus, GoalSummary, NewGoalCmd, ResultEngine, SavingGoal, goals,
};

use super::{
    Engine, normalize_optional_text, normalize_required_text, require_non_negative,
    require_positive, with_tx,
};

fn check_amounts(target_minor: i64, current_minor: i64) -> ResultEngine<()> {
    require_positive(target_minor, "target amount")?;
    require_non_negative(current_minor, "current amount")?;
    if current_minor > target_minor {
        return Err(EngineError::Validation(
            "current amount cannot exceed target amount".to_string(),
        ));
    }
    Ok(())
}

fn deadline_in_past() -> EngineError {
    EngineError::Validation("deadline must be in the future".to_string())
}

fn goal_active_model(goal: &SavingGoal) -> goals::ActiveModel {
    let mut active = goals::ActiveModel::from(goal);
    active.user_id = ActiveValue::NotSet;
    active.created_at = ActiveValue::NotSet;
    active.deleted_at = ActiveValue::NotSet;
    active
}

impl Engine {
    /// Create a saving goal. A goal created with its target already met
    /// starts out `Completed`.
    pub async fn create_goal(&self, cmd: NewGoalCmd) -> ResultEngine<SavingGoal> {
        let name = normalize_required_text(&cmd.name, "name")?;
        let color = normalize_required_text(&cmd.color, "color")?;
        let now = Utc::now();
        if cmd.deadline.is_some_and(|deadline| deadline < now) {
            return Err(deadline_in_past());
        }
        check_amounts(cmd.target_amount_minor, cmd.current_amount_minor)?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.user_id).await?;

            let mut goal = SavingGoal {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                name,
                target_amount_minor: cmd.target_amount_minor,
                current_amount_minor: cmd.current_amount_minor,
                color,
                icon: normalize_optional_text(cmd.icon.as_deref()),
                deadline: cmd.deadline,
                priority: cmd.priority.unwrap_or_default(),
                category: normalize_optional_text(cmd.category.as_deref()),
                status: cmd.status.unwrap_or_default(),
                created_at: now,
                updated_at: now,
            };
            goal.refresh_status();
            goals::ActiveModel::from(&goal).insert(&db_tx).await?;
            Ok(goal)
        })
    }

    /// Goals of the user, newest first.
    pub async fn goals(&self, user_id: Uuid) -> ResultEngine<Vec<SavingGoal>> {
        let models = goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id.to_string()))
            .filter(goals::Column::DeletedAt.is_null())
            .order_by_desc(goals::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(SavingGoal::try_from).collect()
    }

    pub async fn goal(&self, user_id: Uuid, goal_id: Uuid) -> ResultEngine<SavingGoal> {
        let model = self.require_goal(&self.database, user_id, goal_id).await?;
        SavingGoal::try_from(model)
    }

    /// Apply the fields present in `patch`, then re-check completion.
    ///
    /// A past deadline is only accepted on a goal that is already completed.
    pub async fn update_goal(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        patch: GoalPatch,
    ) -> ResultEngine<SavingGoal> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_text(name, "name"))
            .transpose()?;
        let color = patch
            .color
            .as_deref()
            .map(|color| normalize_required_text(color, "color"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, user_id, goal_id).await?;
            let mut goal = SavingGoal::try_from(model)?;
            let now = Utc::now();

            if let Some(name) = name {
                goal.name = name;
            }
            if let Some(target_amount_minor) = patch.target_amount_minor {
                goal.target_amount_minor = target_amount_minor;
            }
            if let Some(current_amount_minor) = patch.current_amount_minor {
                goal.current_amount_minor = current_amount_minor;
            }
            check_amounts(goal.target_amount_minor, goal.current_amount_minor)?;

            if let Some(color) = color {
                goal.color = color;
            }
            if let Some(icon) = patch.icon {
                goal.icon = normalize_optional_text(icon.as_deref());
            }
            if let Some(deadline) = patch.deadline {
                if !goal.is_completed() && deadline.is_some_and(|deadline| deadline < now) {
                    return Err(deadline_in_past());
                }
                goal.deadline = deadline;
            }
            if let Some(priority) = patch.priority {
                goal.priority = priority;
            }
            if let Some(category) = patch.category {
                goal.category = normalize_optional_text(category.as_deref());
            }
            if let Some(status) = patch.status {
                goal.status = status;
            }
            goal.refresh_status();
            goal.updated_at = now;

            goal_active_model(&goal).update(&db_tx).await?;
            Ok(goal)
        })
    }

    pub async fn delete_goal(&self, user_id: Uuid, goal_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, user_id, goal_id).await?;
            let now = Utc::now();
            let active = goals::ActiveModel {
                id: ActiveValue::Set(model.id),
                updated_at: ActiveValue::Set(now),
                deleted_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Add `amount_minor` to the saved amount of an active goal.
    ///
    /// The increment is a single column update. It may meet the target but
    /// never exceed it; meeting it completes the goal.
    pub async fn add_goal_progress(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        amount_minor: i64,
    ) -> ResultEngine<SavingGoal> {
        require_positive(amount_minor, "amount")?;

        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, user_id, goal_id).await?;
            if model.status == GoalStatus::Completed.as_str() {
                return Err(EngineError::GoalCompleted(
                    "cannot add progress to completed goal".to_string(),
                ));
            }
            let within_target = model
                .current_amount_minor
                .checked_add(amount_minor)
                .is_some_and(|total| total <= model.target_amount_minor);
            if !within_target {
                return Err(EngineError::Validation(
                    "current amount cannot exceed target amount".to_string(),
                ));
            }

            goals::Entity::update_many()
                .col_expr(
                    goals::Column::CurrentAmountMinor,
                    Expr::col(goals::Column::CurrentAmountMinor).add(amount_minor),
                )
                .col_expr(goals::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(goals::Column::Id.eq(goal_id.to_string()))
                .exec(&db_tx)
                .await?;

            let model = self
                .find_goal(&db_tx, goal_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("goal not found".to_string()))?;
            let mut goal = SavingGoal::try_from(model)?;
            if !goal.is_completed() {
                goal.refresh_status();
                if goal.is_completed() {
                    let active = goals::ActiveModel {
                        id: ActiveValue::Set(goal.id.to_string()),
                        status: ActiveValue::Set(goal.status.as_str().to_string()),
                        ..Default::default()
                    };
                    active.update(&db_tx).await?;
                }
            }
            Ok(goal)
        })
    }

    pub async fn goal_summary(&self, user_id: Uuid) -> ResultEngine<GoalSummary> {
        let goals = self.goals(user_id).await?;
        Ok(GoalSummary::from_goals(&goals))
    }
}
