//! Command structs for engine operations.
//!
//! `New*Cmd` types group the parameters of create operations and keep call
//! sites readable. `*Patch` types describe partial updates: a field left as
//! `None` is untouched, `Some(value)` is applied even when the value is zero
//! or empty. Nullable columns use `Option<Option<T>>` so a caller can
//! explicitly clear them with `Some(None)`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{BudgetKind, Currency, GoalPriority, GoalStatus, TransactionStatus, WalletKind};

/// Create a wallet.
#[derive(Clone, Debug)]
pub struct NewWalletCmd {
    pub user_id: Uuid,
    pub name: String,
    pub kind: WalletKind,
    pub balance_minor: i64,
    pub currency: Option<Currency>,
    pub color: String,
    pub account_number: Option<String>,
    pub is_default: bool,
}

impl NewWalletCmd {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        kind: WalletKind,
        color: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            name: name.into(),
            kind,
            balance_minor: 0,
            currency: None,
            color: color.into(),
            account_number: None,
            is_default: false,
        }
    }

    #[must_use]
    pub fn balance_minor(mut self, balance_minor: i64) -> Self {
        self.balance_minor = balance_minor;
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    #[must_use]
    pub fn account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(account_number.into());
        self
    }

    #[must_use]
    pub fn is_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct WalletPatch {
    pub name: Option<String>,
    pub kind: Option<WalletKind>,
    pub balance_minor: Option<i64>,
    pub currency: Option<Currency>,
    pub color: Option<String>,
    pub account_number: Option<Option<String>>,
    pub is_default: Option<bool>,
    pub last_synced: Option<Option<DateTime<Utc>>>,
}

impl WalletPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn balance_minor(mut self, balance_minor: i64) -> Self {
        self.balance_minor = Some(balance_minor);
        self
    }

    #[must_use]
    pub fn is_default(mut self, is_default: bool) -> Self {
        self.is_default = Some(is_default);
        self
    }
}

/// Move money from one wallet to another of the same user.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub user_id: Uuid,
    pub from_wallet_id: Uuid,
    pub to_wallet_id: Uuid,
    pub amount_minor: i64,
}

/// Record a transaction.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub user_id: Uuid,
    pub amount_minor: i64,
    pub description: String,
    pub method: String,
    pub category: String,
    pub wallet_id: Option<Uuid>,
    /// Defaults to `Completed`.
    pub status: Option<TransactionStatus>,
    pub notes: Option<String>,
    pub receipt_url: Option<String>,
    /// Defaults to now.
    pub transaction_date: Option<DateTime<Utc>>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        amount_minor: i64,
        description: impl Into<String>,
        method: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            amount_minor,
            description: description.into(),
            method: method.into(),
            category: category.into(),
            wallet_id: None,
            status: None,
            notes: None,
            receipt_url: None,
            transaction_date: None,
        }
    }

    #[must_use]
    pub fn wallet_id(mut self, wallet_id: Uuid) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    #[must_use]
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn transaction_date(mut self, transaction_date: DateTime<Utc>) -> Self {
        self.transaction_date = Some(transaction_date);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub wallet_id: Option<Option<Uuid>>,
    pub amount_minor: Option<i64>,
    pub description: Option<String>,
    pub method: Option<String>,
    pub category: Option<String>,
    pub status: Option<TransactionStatus>,
    pub notes: Option<Option<String>>,
    pub receipt_url: Option<Option<String>>,
    pub transaction_date: Option<DateTime<Utc>>,
}

/// Create a saving goal.
#[derive(Clone, Debug)]
pub struct NewGoalCmd {
    pub user_id: Uuid,
    pub name: String,
    pub target_amount_minor: i64,
    pub current_amount_minor: i64,
    pub color: String,
    pub icon: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Option<GoalPriority>,
    pub category: Option<String>,
    pub status: Option<GoalStatus>,
}

impl NewGoalCmd {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        target_amount_minor: i64,
        color: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            name: name.into(),
            target_amount_minor,
            current_amount_minor: 0,
            color: color.into(),
            icon: None,
            deadline: None,
            priority: None,
            category: None,
            status: None,
        }
    }

    #[must_use]
    pub fn current_amount_minor(mut self, current_amount_minor: i64) -> Self {
        self.current_amount_minor = current_amount_minor;
        self
    }

    #[must_use]
    pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: GoalPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target_amount_minor: Option<i64>,
    pub current_amount_minor: Option<i64>,
    pub color: Option<String>,
    pub icon: Option<Option<String>>,
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub priority: Option<GoalPriority>,
    pub category: Option<Option<String>>,
    pub status: Option<GoalStatus>,
}

/// Create a budget.
#[derive(Clone, Debug)]
pub struct NewBudgetCmd {
    pub user_id: Uuid,
    pub category: String,
    pub limit_amount_minor: i64,
    pub color: String,
    pub icon: Option<String>,
    pub is_rollover: bool,
    /// Defaults to `Variable`.
    pub kind: Option<BudgetKind>,
    /// Defaults to 80.
    pub alert_threshold: Option<i32>,
}

impl NewBudgetCmd {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        category: impl Into<String>,
        limit_amount_minor: i64,
        color: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            category: category.into(),
            limit_amount_minor,
            color: color.into(),
            icon: None,
            is_rollover: false,
            kind: None,
            alert_threshold: None,
        }
    }

    #[must_use]
    pub fn alert_threshold(mut self, alert_threshold: i32) -> Self {
        self.alert_threshold = Some(alert_threshold);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct BudgetPatch {
    pub category: Option<String>,
    pub limit_amount_minor: Option<i64>,
    pub color: Option<String>,
    pub icon: Option<Option<String>>,
    pub is_rollover: Option<bool>,
    pub kind: Option<BudgetKind>,
    pub alert_threshold: Option<i32>,
}

#[derive(Clone, Debug, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Finish onboarding: record income and currency, create the first wallet.
#[derive(Clone, Debug)]
pub struct OnboardingCmd {
    pub user_id: Uuid,
    pub monthly_income_minor: i64,
    pub currency: Currency,
}
