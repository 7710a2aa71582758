//! Domain engine for Kibubu.
//!
//! The [`Engine`] owns the database handle and exposes every domain
//! operation (users, wallets, transactions, goals, budgets) plus the
//! read-only reports in [`analytics`].

pub use analytics::{
    CategorySpending, DailyFlow, DashboardSummary, FinancialHealth, HealthMetrics, HealthRating,
    IncomeVsExpense, Insights, MonthComparison, MonthlyTrends, Period, SpendingReport,
    TrendDirection,
};
pub use budgets::{Budget, BudgetKind, BudgetStatus, BudgetSummary};
pub use commands::{
    BudgetPatch, GoalPatch, NewBudgetCmd, NewGoalCmd, NewTransactionCmd, NewWalletCmd,
    OnboardingCmd, ProfilePatch, TransactionPatch, TransferCmd, WalletPatch,
};
pub use currency::Currency;
pub use error::EngineError;
pub use goals::{GoalPriority, GoalStatus, GoalSummary, SavingGoal};
pub use ops::{Engine, EngineBuilder, MAX_AMOUNT_MINOR, MIN_PASSWORD_LEN};
pub use pagination::{Page, Paged};
pub use transactions::{Transaction, TransactionStats, TransactionStatus};
pub use users::User;
pub use wallets::{Wallet, WalletKind};

pub mod analytics;
mod budgets;
mod commands;
mod currency;
mod error;
mod goals;
mod ops;
mod pagination;
mod transactions;
mod users;
mod util;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
