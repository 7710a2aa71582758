use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};

use crate::{
    NewTransactionCmd, Page, Paged, ResultEngine, Transaction, TransactionPatch, TransactionStats,
    TransactionStatus, transactions, util::saturating_sum,
};

use super::{Engine, normalize_optional_text, normalize_required_text, require_positive, with_tx};

/// Page size used when the caller passes a non-positive limit.
const DEFAULT_PAGE_LIMIT: u64 = 50;

impl Engine {
    /// Record a transaction. Wallet balances are not touched.
    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Transaction> {
        require_positive(cmd.amount_minor, "amount")?;
        let description = normalize_required_text(&cmd.description, "description")?;
        let category = normalize_required_text(&cmd.category, "category")?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.user_id).await?;
            if let Some(wallet_id) = cmd.wallet_id {
                self.require_wallet(&db_tx, cmd.user_id, wallet_id).await?;
            }

            let now = Utc::now();
            let tx = Transaction {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                wallet_id: cmd.wallet_id,
                amount_minor: cmd.amount_minor,
                description,
                method: cmd.method.trim().to_string(),
                category,
                status: cmd.status.unwrap_or_default(),
                notes: normalize_optional_text(cmd.notes.as_deref()),
                receipt_url: normalize_optional_text(cmd.receipt_url.as_deref()),
                transaction_date: cmd.transaction_date.unwrap_or(now),
                created_at: now,
                updated_at: now,
            };
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })
    }

    pub async fn transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        let model = self
            .require_transaction(&self.database, user_id, transaction_id)
            .await?;
        Transaction::try_from(model)
    }

    /// List transactions newest first.
    ///
    /// A non-positive `limit` falls back to 50, a negative `offset` to 0.
    pub async fn transactions_page(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> ResultEngine<Paged<Transaction>> {
        let limit = u64::try_from(limit)
            .ok()
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT);
        let offset = u64::try_from(offset).unwrap_or(0);

        let base = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .filter(transactions::Column::DeletedAt.is_null());

        let total = base.clone().count(&self.database).await?;
        let models = base
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&self.database)
            .await?;

        let items = models
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok(Paged {
            items,
            page: Page::new(total, limit, offset),
        })
    }

    /// Apply the fields present in `patch`.
    pub async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        if let Some(amount_minor) = patch.amount_minor {
            require_positive(amount_minor, "amount")?;
        }
        let description = patch
            .description
            .as_deref()
            .map(|d| normalize_required_text(d, "description"))
            .transpose()?;
        let category = patch
            .category
            .as_deref()
            .map(|c| normalize_required_text(c, "category"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            let mut tx = Transaction::try_from(model)?;

            if let Some(wallet_id) = patch.wallet_id {
                if let Some(wallet_id) = wallet_id {
                    self.require_wallet(&db_tx, user_id, wallet_id).await?;
                }
                tx.wallet_id = wallet_id;
            }
            if let Some(amount_minor) = patch.amount_minor {
                tx.amount_minor = amount_minor;
            }
            if let Some(description) = description {
                tx.description = description;
            }
            if let Some(method) = patch.method {
                tx.method = method.trim().to_string();
            }
            if let Some(category) = category {
                tx.category = category;
            }
            if let Some(status) = patch.status {
                tx.status = status;
            }
            if let Some(notes) = patch.notes {
                tx.notes = normalize_optional_text(notes.as_deref());
            }
            if let Some(receipt_url) = patch.receipt_url {
                tx.receipt_url = normalize_optional_text(receipt_url.as_deref());
            }
            if let Some(transaction_date) = patch.transaction_date {
                tx.transaction_date = transaction_date;
            }
            tx.updated_at = Utc::now();

            let mut active = transactions::ActiveModel::from(&tx);
            active.created_at = ActiveValue::NotSet;
            active.deleted_at = ActiveValue::NotSet;
            active.update(&db_tx).await?;
            Ok(tx)
        })
    }

    pub async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            let now = Utc::now();
            let active = transactions::ActiveModel {
                id: ActiveValue::Set(model.id),
                updated_at: ActiveValue::Set(now),
                deleted_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Totals of completed transactions within `[start, end]`. Either bound
    /// may be omitted.
    pub async fn transaction_stats(
        &self,
        user_id: Uuid,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> ResultEngine<TransactionStats> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .filter(transactions::Column::Status.eq(TransactionStatus::Completed.as_str()))
            .filter(transactions::Column::DeletedAt.is_null());
        if let Some(start) = start {
            query = query.filter(transactions::Column::TransactionDate.gte(start));
        }
        if let Some(end) = end {
            query = query.filter(transactions::Column::TransactionDate.lte(end));
        }
        let models = query.all(&self.database).await?;

        let total_income_minor: i64 = 0;
        let total_expense_minor = saturating_sum(models.iter().map(|m| m.amount_minor));
        Ok(TransactionStats {
            total_income_minor,
            total_expense_minor,
            net_balance_minor: total_income_minor.saturating_sub(total_expense_minor),
            transaction_count: models.len() as u64,
        })
    }
}
