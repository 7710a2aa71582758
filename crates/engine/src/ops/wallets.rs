use chrono::Utc;
use uuid::Uuid;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    EngineError, NewWalletCmd, ResultEngine, TransferCmd, Wallet, WalletPatch, wallets,
};

use super::{
    Engine, MAX_AMOUNT_MINOR, normalize_optional_text, normalize_required_text,
    require_non_negative, require_positive, with_tx,
};

/// Clear `is_default` on every live wallet of the user, except `keep`.
async fn demote_defaults(
    db_tx: &DatabaseTransaction,
    user_id: Uuid,
    keep: Option<Uuid>,
) -> ResultEngine<()> {
    let mut query = wallets::Entity::update_many()
        .col_expr(wallets::Column::IsDefault, Expr::value(false))
        .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(wallets::Column::UserId.eq(user_id.to_string()))
        .filter(wallets::Column::IsDefault.eq(true))
        .filter(wallets::Column::DeletedAt.is_null());
    if let Some(keep) = keep {
        query = query.filter(wallets::Column::Id.ne(keep.to_string()));
    }
    query.exec(db_tx).await?;
    Ok(())
}

async fn add_to_balance(
    db_tx: &DatabaseTransaction,
    wallet_id: Uuid,
    delta_minor: i64,
) -> ResultEngine<()> {
    wallets::Entity::update_many()
        .col_expr(
            wallets::Column::BalanceMinor,
            Expr::col(wallets::Column::BalanceMinor).add(delta_minor),
        )
        .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(wallets::Column::Id.eq(wallet_id.to_string()))
        .exec(db_tx)
        .await?;
    Ok(())
}

impl Engine {
    /// Create a wallet.
    ///
    /// The first wallet of a user always becomes the default one; asking
    /// for `is_default` demotes the previous default.
    pub async fn create_wallet(&self, cmd: NewWalletCmd) -> ResultEngine<Wallet> {
        let name = normalize_required_text(&cmd.name, "name")?;
        let color = normalize_required_text(&cmd.color, "color")?;
        require_non_negative(cmd.balance_minor, "balance")?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, cmd.user_id).await?;

            let existing = wallets::Entity::find()
                .filter(wallets::Column::UserId.eq(cmd.user_id.to_string()))
                .filter(wallets::Column::DeletedAt.is_null())
                .count(&db_tx)
                .await?;
            let is_default = cmd.is_default || existing == 0;
            if is_default {
                demote_defaults(&db_tx, cmd.user_id, None).await?;
            }

            let mut wallet = Wallet::new(
                cmd.user_id,
                name,
                cmd.kind,
                cmd.balance_minor,
                cmd.currency.unwrap_or_default(),
                color,
            );
            wallet.account_number = normalize_optional_text(cmd.account_number.as_deref());
            wallet.is_default = is_default;
            wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;
            Ok(wallet)
        })
    }

    /// Every live wallet of the user, default first, then newest first.
    pub async fn wallets(&self, user_id: Uuid) -> ResultEngine<Vec<Wallet>> {
        let models = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id.to_string()))
            .filter(wallets::Column::DeletedAt.is_null())
            .order_by_desc(wallets::Column::IsDefault)
            .order_by_desc(wallets::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Wallet::try_from).collect()
    }

    pub async fn wallet(&self, user_id: Uuid, wallet_id: Uuid) -> ResultEngine<Wallet> {
        let model = self
            .require_wallet(&self.database, user_id, wallet_id)
            .await?;
        Wallet::try_from(model)
    }

    pub async fn default_wallet(&self, user_id: Uuid) -> ResultEngine<Wallet> {
        let model = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id.to_string()))
            .filter(wallets::Column::IsDefault.eq(true))
            .filter(wallets::Column::DeletedAt.is_null())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("no default wallet found".to_string()))?;
        Wallet::try_from(model)
    }

    /// Apply the fields present in `patch`.
    pub async fn update_wallet(
        &self,
        user_id: Uuid,
        wallet_id: Uuid,
        patch: WalletPatch,
    ) -> ResultEngine<Wallet> {
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
        if let Some(balance_minor) = patch.balance_minor {
            require_non_negative(balance_minor, "balance")?;
        }

        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, user_id, wallet_id).await?;
            let mut wallet = Wallet::try_from(model)?;

            if let Some(name) = name {
                wallet.name = name;
            }
            if let Some(kind) = patch.kind {
                wallet.kind = kind;
            }
            if let Some(balance_minor) = patch.balance_minor {
                wallet.balance_minor = balance_minor;
            }
            if let Some(currency) = patch.currency {
                wallet.currency = currency;
            }
            if let Some(color) = color {
                wallet.color = color;
            }
            if let Some(account_number) = patch.account_number {
                wallet.account_number = normalize_optional_text(account_number.as_deref());
            }
            if let Some(last_synced) = patch.last_synced {
                wallet.last_synced = last_synced;
            }
            if let Some(is_default) = patch.is_default {
                if is_default && !wallet.is_default {
                    demote_defaults(&db_tx, user_id, Some(wallet_id)).await?;
                }
                wallet.is_default = is_default;
            }
            wallet.updated_at = Utc::now();

            let active = wallets::ActiveModel {
                id: ActiveValue::Set(wallet.id.to_string()),
                name: ActiveValue::Set(wallet.name.clone()),
                kind: ActiveValue::Set(wallet.kind.as_str().to_string()),
                balance_minor: ActiveValue::Set(wallet.balance_minor),
                currency: ActiveValue::Set(wallet.currency.code().to_string()),
                color: ActiveValue::Set(wallet.color.clone()),
                account_number: ActiveValue::Set(wallet.account_number.clone()),
                is_default: ActiveValue::Set(wallet.is_default),
                last_synced: ActiveValue::Set(wallet.last_synced),
                updated_at: ActiveValue::Set(wallet.updated_at),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(wallet)
        })
    }

    /// Soft-delete an empty wallet. When it was the default wallet, the
    /// newest remaining wallet takes over.
    pub async fn delete_wallet(&self, user_id: Uuid, wallet_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, user_id, wallet_id).await?;
            if model.balance_minor > 0 {
                return Err(EngineError::BusinessRule(
                    "cannot delete wallet with remaining balance".to_string(),
                ));
            }

            let now = Utc::now();
            let active = wallets::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                is_default: ActiveValue::Set(false),
                updated_at: ActiveValue::Set(now),
                deleted_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            if model.is_default {
                let successor = wallets::Entity::find()
                    .filter(wallets::Column::UserId.eq(user_id.to_string()))
                    .filter(wallets::Column::DeletedAt.is_null())
                    .order_by_desc(wallets::Column::CreatedAt)
                    .one(&db_tx)
                    .await?;
                if let Some(successor) = successor {
                    let active = wallets::ActiveModel {
                        id: ActiveValue::Set(successor.id),
                        is_default: ActiveValue::Set(true),
                        updated_at: ActiveValue::Set(now),
                        ..Default::default()
                    };
                    active.update(&db_tx).await?;
                }
            }
            Ok(())
        })
    }

    /// Make `wallet_id` the only default wallet of the user.
    pub async fn set_default_wallet(&self, user_id: Uuid, wallet_id: Uuid) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, user_id, wallet_id).await?;
            let mut wallet = Wallet::try_from(model)?;
            if wallet.is_default {
                return Ok(wallet);
            }

            demote_defaults(&db_tx, user_id, Some(wallet_id)).await?;
            wallet.is_default = true;
            wallet.updated_at = Utc::now();
            let active = wallets::ActiveModel {
                id: ActiveValue::Set(wallet.id.to_string()),
                is_default: ActiveValue::Set(true),
                updated_at: ActiveValue::Set(wallet.updated_at),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(wallet)
        })
    }

    /// Move `amount_minor` between two wallets of the same user.
    ///
    /// Both legs are applied as relative column updates in one DB
    /// transaction. Wallets with different currencies are allowed; no
    /// conversion happens.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<()> {
        require_positive(cmd.amount_minor, "amount")?;
        if cmd.from_wallet_id == cmd.to_wallet_id {
            return Err(EngineError::Validation(
                "source and destination wallets must differ".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let from = self
                .require_wallet(&db_tx, cmd.user_id, cmd.from_wallet_id)
                .await?;
            let to = self
                .require_wallet(&db_tx, cmd.user_id, cmd.to_wallet_id)
                .await?;

            if from.balance_minor < cmd.amount_minor {
                return Err(EngineError::InsufficientFunds(
                    "insufficient balance".to_string(),
                ));
            }
            let credited = to
                .balance_minor
                .checked_add(cmd.amount_minor)
                .filter(|balance| *balance <= MAX_AMOUNT_MINOR);
            if credited.is_none() {
                return Err(EngineError::Validation(format!(
                    "destination balance must not exceed {MAX_AMOUNT_MINOR}"
                )));
            }
            if from.currency != to.currency {
                tracing::warn!(
                    from_wallet = %from.id,
                    to_wallet = %to.id,
                    from_currency = %from.currency,
                    to_currency = %to.currency,
                    "transfer between wallets with different currencies"
                );
            }

            add_to_balance(&db_tx, cmd.from_wallet_id, -cmd.amount_minor).await?;
            add_to_balance(&db_tx, cmd.to_wallet_id, cmd.amount_minor).await?;
            Ok(())
        })
    }
}
