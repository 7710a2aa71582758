//! Transaction primitives.
//!
//! A `Transaction` records a single money movement. There is no
//! income/expense discriminator: every aggregate treats a transaction as
//! spending, and recording one never changes a wallet balance.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransactionStatus {
    #[default]
    Completed,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Pending => "Pending",
            Self::Failed => "Failed",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Completed" => Ok(Self::Completed),
            "Pending" => Ok(Self::Pending),
            "Failed" => Ok(Self::Failed),
            other => Err(EngineError::Validation(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wallet_id: Option<Uuid>,
    /// Always > 0.
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

impl Transaction {
    /// Whether the transaction counts toward aggregates.
    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }
}

/// Totals over a date window (see `Engine::transaction_stats`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionStats {
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
    pub net_balance_minor: i64,
    pub transaction_count: u64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub wallet_id: Option<String>,
    pub amount_minor: i64,
    pub description: String,
    pub method: String,
    pub category: String,
    pub status: String,
    pub notes: Option<String>,
    pub receipt_url: Option<String>,
    pub transaction_date: DateTimeUtc,
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
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Wallets,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.to_string()),
            wallet_id: ActiveValue::Set(tx.wallet_id.map(|id| id.to_string())),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            description: ActiveValue::Set(tx.description.clone()),
            method: ActiveValue::Set(tx.method.clone()),
            category: ActiveValue::Set(tx.category.clone()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            notes: ActiveValue::Set(tx.notes.clone()),
            receipt_url: ActiveValue::Set(tx.receipt_url.clone()),
            transaction_date: ActiveValue::Set(tx.transaction_date),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
            deleted_at: ActiveValue::Set(None),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            wallet_id: model
                .wallet_id
                .as_deref()
                .map(|id| parse_uuid(id, "wallet"))
                .transpose()?,
            amount_minor: model.amount_minor,
            description: model.description,
            method: model.method,
            category: model.category,
            status: TransactionStatus::try_from(model.status.as_str())?,
            notes: model.notes,
            receipt_url: model.receipt_url,
            transaction_date: model.transaction_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
