//! The module contains `Wallet` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    Currency, EngineError,
    util::{model_currency, parse_uuid},
};

/// Where the money of a wallet physically lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalletKind {
    MobileMoney,
    Bank,
    Cash,
    Credit,
    Savings,
}

impl WalletKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MobileMoney => "Mobile Money",
            Self::Bank => "Bank",
            Self::Cash => "Cash",
            Self::Credit => "Credit",
            Self::Savings => "Savings",
        }
    }
}

impl TryFrom<&str> for WalletKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Mobile Money" => Ok(Self::MobileMoney),
            "Bank" => Ok(Self::Bank),
            "Cash" => Ok(Self::Cash),
            "Credit" => Ok(Self::Credit),
            "Savings" => Ok(Self::Savings),
            other => Err(EngineError::Validation(format!(
                "invalid wallet type: {other}"
            ))),
        }
    }
}

/// A wallet.
///
/// A wallet is a representation of a real place where money is kept: a
/// mobile money account, a bank account, cash in hand. Its balance is only
/// changed by explicit wallet operations (create, update, transfer);
/// recording a transaction does not touch it.
#[derive(Clone, Debug, PartialEq)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: WalletKind,
    pub balance_minor: i64,
    pub currency: Currency,
    pub color: String,
    pub account_number: Option<String>,
    /// At most one live wallet per user has this flag set.
    pub is_default: bool,
    pub last_synced: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(
        user_id: Uuid,
        name: String,
        kind: WalletKind,
        balance_minor: i64,
        currency: Currency,
        color: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            kind,
            balance_minor,
            currency,
            color,
            account_number: None,
            is_default: false,
            last_synced: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: String,
    pub balance_minor: i64,
    pub currency: String,
    pub color: String,
    pub account_number: Option<String>,
    pub is_default: bool,
    pub last_synced: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            balance_minor: ActiveValue::Set(value.balance_minor),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            color: ActiveValue::Set(value.color.clone()),
            account_number: ActiveValue::Set(value.account_number.clone()),
            is_default: ActiveValue::Set(value.is_default),
            last_synced: ActiveValue::Set(value.last_synced),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
            deleted_at: ActiveValue::Set(None),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "wallet")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            name: model.name,
            kind: WalletKind::try_from(model.kind.as_str())?,
            balance_minor: model.balance_minor,
            currency: model_currency(&model.currency)?,
            color: model.color,
            account_number: model.account_number,
            is_default: model.is_default,
            last_synced: model.last_synced,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
