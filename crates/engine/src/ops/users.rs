use chrono::Utc;
use email_address::EmailAddress;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, OnboardingCmd, ProfilePatch, ResultEngine, User, Wallet, WalletKind, users,
    wallets,
};

use super::{Engine, normalize_required_text, require_non_negative, with_tx};

pub const MIN_PASSWORD_LEN: usize = 8;

const ONBOARDING_WALLET_NAME: &str = "Main Wallet";
const ONBOARDING_WALLET_COLOR: &str = "#4F46E5";

fn normalize_email(raw: &str) -> ResultEngine<String> {
    let email = raw.trim().to_lowercase();
    if !EmailAddress::is_valid(&email) {
        return Err(EngineError::Validation(format!("invalid email: {}", raw.trim())));
    }
    Ok(email)
}

impl Engine {
    /// Create an account. The password is stored as a bcrypt hash.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ResultEngine<User> {
        let name = normalize_required_text(name, "name")?;
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(EngineError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        with_tx!(self, |db_tx| {
            if self.find_user_by_email(&db_tx, &email).await?.is_some() {
                return Err(EngineError::ExistingKey("email already exists".to_string()));
            }
            let password_hash = bcrypt::hash(password, self.password_cost)?;
            let user = User::new(name, email, password_hash);
            users::ActiveModel::from(&user).insert(&db_tx).await?;
            Ok(user)
        })
    }

    /// Check credentials. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> ResultEngine<User> {
        let email = email.trim().to_lowercase();
        let model = self
            .find_user_by_email(&self.database, &email)
            .await?
            .ok_or(EngineError::InvalidCredentials)?;
        if !bcrypt::verify(password, &model.password_hash)? {
            return Err(EngineError::InvalidCredentials);
        }
        User::try_from(model)
    }

    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        User::try_from(self.require_user(&self.database, user_id).await?)
    }

    /// Change name and/or email. An email already used by another account is
    /// rejected.
    pub async fn update_profile(&self, user_id: Uuid, patch: ProfilePatch) -> ResultEngine<User> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_text(name, "name"))
            .transpose()?;
        let email = patch.email.as_deref().map(normalize_email).transpose()?;

        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            let mut user = User::try_from(model)?;

            if let Some(email) = email
                && email != user.email
            {
                if self.find_user_by_email(&db_tx, &email).await?.is_some() {
                    return Err(EngineError::ExistingKey("email already exists".to_string()));
                }
                user.email = email;
            }
            if let Some(name) = name {
                user.name = name;
            }
            user.updated_at = Utc::now();

            let active = users::ActiveModel {
                id: ActiveValue::Set(user.id.to_string()),
                name: ActiveValue::Set(user.name.clone()),
                email: ActiveValue::Set(user.email.clone()),
                updated_at: ActiveValue::Set(user.updated_at),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(user)
        })
    }

    /// Store income and currency, mark the user onboarded and, if the user
    /// has no wallet yet, create a default "Main Wallet".
    pub async fn complete_onboarding(&self, cmd: OnboardingCmd) -> ResultEngine<User> {
        require_non_negative(cmd.monthly_income_minor, "monthly income")?;

        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, cmd.user_id).await?;
            let mut user = User::try_from(model)?;
            user.is_onboarded = true;
            user.monthly_income_minor = cmd.monthly_income_minor;
            user.currency = cmd.currency.clone();
            user.updated_at = Utc::now();

            let active = users::ActiveModel {
                id: ActiveValue::Set(user.id.to_string()),
                is_onboarded: ActiveValue::Set(true),
                monthly_income_minor: ActiveValue::Set(user.monthly_income_minor),
                currency: ActiveValue::Set(user.currency.code().to_string()),
                updated_at: ActiveValue::Set(user.updated_at),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            let has_wallet = wallets::Entity::find()
                .filter(wallets::Column::UserId.eq(user.id.to_string()))
                .filter(wallets::Column::DeletedAt.is_null())
                .count(&db_tx)
                .await?
                > 0;
            if !has_wallet {
                let mut wallet = Wallet::new(
                    user.id,
                    ONBOARDING_WALLET_NAME.to_string(),
                    WalletKind::Cash,
                    0,
                    cmd.currency,
                    ONBOARDING_WALLET_COLOR.to_string(),
                );
                wallet.is_default = true;
                wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;
                tracing::info!(user_id = %user.id, "created onboarding wallet");
            }

            Ok(user)
        })
    }
}
