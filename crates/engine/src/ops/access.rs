use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, budgets, goals, transactions, users, wallets};

use super::Engine;

/// Generates a `find_*` method returning the live (not soft-deleted) row by
/// id and a `require_*` method that also checks the row belongs to the
/// caller.
///
/// A missing row is `KeyNotFound("<label> not found")`, a row of another
/// user is `Unauthorized("unauthorized access to <label>")`.
macro_rules! impl_owned_lookup {
    ($find_fn:ident, $require_fn:ident, $entity:path, $deleted_col:expr, $label:literal) => {
        pub(super) async fn $find_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            id: Uuid,
        ) -> ResultEngine<Option<<$entity as EntityTrait>::Model>> {
            <$entity>::find_by_id(id.to_string())
                .filter($deleted_col.is_null())
                .one(db)
                .await
                .map_err(Into::into)
        }

        pub(super) async fn $require_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            user_id: Uuid,
            id: Uuid,
        ) -> ResultEngine<<$entity as EntityTrait>::Model> {
            let model = self
                .$find_fn(db, id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(concat!($label, " not found").to_string()))?;
            if model.user_id != user_id.to_string() {
                return Err(EngineError::Unauthorized(
                    concat!("unauthorized access to ", $label).to_string(),
                ));
            }
            Ok(model)
        }
    };
}

impl Engine {
    impl_owned_lookup!(
        find_wallet,
        require_wallet,
        wallets::Entity,
        wallets::Column::DeletedAt,
        "wallet"
    );

    impl_owned_lookup!(
        find_transaction,
        require_transaction,
        transactions::Entity,
        transactions::Column::DeletedAt,
        "transaction"
    );

    impl_owned_lookup!(
        find_goal,
        require_goal,
        goals::Entity,
        goals::Column::DeletedAt,
        "goal"
    );

    impl_owned_lookup!(
        find_budget,
        require_budget,
        budgets::Entity,
        budgets::Column::DeletedAt,
        "budget"
    );

    pub(super) async fn require_user<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .filter(users::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not found".to_string()))
    }

    pub(super) async fn find_user_by_email<C: ConnectionTrait>(
        &self,
        db: &C,
        email: &str,
    ) -> ResultEngine<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::DeletedAt.is_null())
            .one(db)
            .await
            .map_err(Into::into)
    }
}
