use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Budget, BudgetPatch, BudgetStatus, BudgetSummary, EngineError, NewBudgetCmd, ResultEngine,
    Transaction, TransactionStatus,
    analytics::spent_in_category,
    budgets::{self, DEFAULT_ALERT_THRESHOLD},
    transactions,
    util::{shift_months, start_of_month},
};

use super::{Engine, normalize_optional_text, normalize_required_text, require_positive, with_tx};

fn check_alert_threshold(threshold: i32) -> ResultEngine<()> {
    if !(0..=100).contains(&threshold) {
        return Err(EngineError::Validation(
            "alert threshold must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

fn duplicate_category() -> EngineError {
    EngineError::ExistingKey("budget already exists for this category".to_string())
}

impl Engine {
    async fn budget_for_category<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
        category: &str,
    ) -> ResultEngine<Option<budgets::Model>> {
        budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id.to_string()))
            .filter(budgets::Column::Category.eq(category))
            .filter(budgets::Column::DeletedAt.is_null())
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Create a budget. A user has at most one budget per category.
    pub async fn create_budget(&self, cmd: NewBudgetCmd) -> ResultEngine<Budget> {
        let category = normalize_required_text(&cmd.category, "category")?;
        let color = normalize_required_text(&cmd.color, "color")?;
        require_positive(cmd.limit_amount_minor, "limit amount")?;
        let alert_threshold = cmd.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD);
        check_alert_threshold(alert_threshold)?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.user_id).await?;
            if self
                .budget_for_category(&db_tx, cmd.user_id, &category)
                .await?
                .is_some()
            {
                return Err(duplicate_category());
            }

            let now = Utc::now();
            let budget = Budget {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                category,
                limit_amount_minor: cmd.limit_amount_minor,
                color,
                icon: normalize_optional_text(cmd.icon.as_deref()),
                is_rollover: cmd.is_rollover,
                kind: cmd.kind.unwrap_or_default(),
                alert_threshold,
                created_at: now,
                updated_at: now,
            };
            budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
            Ok(budget)
        })
    }

    /// Budgets of the user, newest first.
    pub async fn budgets(&self, user_id: Uuid) -> ResultEngine<Vec<Budget>> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id.to_string()))
            .filter(budgets::Column::DeletedAt.is_null())
            .order_by_desc(budgets::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Budget::try_from).collect()
    }

    pub async fn budget(&self, user_id: Uuid, budget_id: Uuid) -> ResultEngine<Budget> {
        let model = self
            .require_budget(&self.database, user_id, budget_id)
            .await?;
        Budget::try_from(model)
    }

    pub async fn update_budget(
        &self,
        user_id: Uuid,
        budget_id: Uuid,
        patch: BudgetPatch,
    ) -> ResultEngine<Budget> {
        let category = patch
            .category
            .as_deref()
            .map(|category| normalize_required_text(category, "category"))
            .transpose()?;
        let color = patch
            .color
            .as_deref()
            .map(|color| normalize_required_text(color, "color"))
            .transpose()?;
        if let Some(limit_amount_minor) = patch.limit_amount_minor {
            require_positive(limit_amount_minor, "limit amount")?;
        }
        if let Some(alert_threshold) = patch.alert_threshold {
            check_alert_threshold(alert_threshold)?;
        }

        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, user_id, budget_id).await?;
            let mut budget = Budget::try_from(model)?;

            if let Some(category) = category
                && category != budget.category
            {
                if self
                    .budget_for_category(&db_tx, user_id, &category)
                    .await?
                    .is_some()
                {
                    return Err(duplicate_category());
                }
                budget.category = category;
            }
            if let Some(limit_amount_minor) = patch.limit_amount_minor {
                budget.limit_amount_minor = limit_amount_minor;
            }
            if let Some(color) = color {
                budget.color = color;
            }
            if let Some(icon) = patch.icon {
                budget.icon = normalize_optional_text(icon.as_deref());
            }
            if let Some(is_rollover) = patch.is_rollover {
                budget.is_rollover = is_rollover;
            }
            if let Some(kind) = patch.kind {
                budget.kind = kind;
            }
            if let Some(alert_threshold) = patch.alert_threshold {
                budget.alert_threshold = alert_threshold;
            }
            budget.updated_at = Utc::now();

            let mut active = budgets::ActiveModel::from(&budget);
            active.user_id = ActiveValue::NotSet;
            active.created_at = ActiveValue::NotSet;
            active.deleted_at = ActiveValue::NotSet;
            active.update(&db_tx).await?;
            Ok(budget)
        })
    }

    pub async fn delete_budget(&self, user_id: Uuid, budget_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget(&db_tx, user_id, budget_id).await?;
            let now = Utc::now();
            let active = budgets::ActiveModel {
                id: ActiveValue::Set(model.id),
                updated_at: ActiveValue::Set(now),
                deleted_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Current-month spending against every budget of the user.
    pub async fn budget_statuses(&self, user_id: Uuid) -> ResultEngine<Vec<BudgetStatus>> {
        let budgets = self.budgets(user_id).await?;
        if budgets.is_empty() {
            return Ok(Vec::new());
        }

        let month_start = start_of_month(Utc::now());
        let month_end = shift_months(month_start, 1);
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .filter(transactions::Column::Status.eq(TransactionStatus::Completed.as_str()))
            .filter(transactions::Column::DeletedAt.is_null())
            .filter(transactions::Column::TransactionDate.gte(month_start))
            .filter(transactions::Column::TransactionDate.lt(month_end))
            .all(&self.database)
            .await?;
        let month = models
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(budgets
            .iter()
            .map(|budget| {
                let spent =
                    spent_in_category(&month, &budget.category, month_start, Some(month_end));
                BudgetStatus::new(budget, spent)
            })
            .collect())
    }

    pub async fn budget_summary(&self, user_id: Uuid) -> ResultEngine<BudgetSummary> {
        let statuses = self.budget_statuses(user_id).await?;
        Ok(BudgetSummary::from_statuses(&statuses))
    }
}
