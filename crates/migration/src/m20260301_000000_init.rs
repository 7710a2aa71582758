//! Initial schema.
//!
//! - `users`: accounts and onboarding profile
//! - `wallets`: places where money is kept (mobile money, bank, cash)
//! - `transactions`: spending records, optionally tied to a wallet
//! - `saving_goals`: savings targets with tracked progress
//! - `budgets`: per-category monthly spending limits
//!
//! Every table carries `created_at`, `updated_at` and a nullable
//! `deleted_at` used for soft deletes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    IsOnboarded,
    MonthlyIncomeMinor,
    Currency,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Wallets {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    BalanceMinor,
    Currency,
    Color,
    AccountNumber,
    IsDefault,
    LastSynced,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    WalletId,
    AmountMinor,
    Description,
    Method,
    Category,
    Status,
    Notes,
    ReceiptUrl,
    TransactionDate,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum SavingGoals {
    Table,
    Id,
    UserId,
    Name,
    TargetAmountMinor,
    CurrentAmountMinor,
    Color,
    Icon,
    Deadline,
    Priority,
    Category,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    UserId,
    Category,
    LimitAmountMinor,
    Color,
    Icon,
    IsRollover,
    Kind,
    AlertThreshold,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

/// Columns shared by every table.
fn timestamps(
    table: &mut TableCreateStatement,
    created_at: impl IntoIden,
    updated_at: impl IntoIden,
    deleted_at: impl IntoIden,
) {
    table
        .col(ColumnDef::new(created_at).timestamp().not_null())
        .col(ColumnDef::new(updated_at).timestamp().not_null())
        .col(ColumnDef::new(deleted_at).timestamp());
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users
        let mut users = Table::create();
        users
            .table(Users::Table)
            .if_not_exists()
            .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
            .col(ColumnDef::new(Users::Name).string().not_null())
            .col(ColumnDef::new(Users::Email).string().not_null())
            .col(ColumnDef::new(Users::PasswordHash).string().not_null())
            .col(
                ColumnDef::new(Users::IsOnboarded)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Users::MonthlyIncomeMinor)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(Users::Currency)
                    .string()
                    .not_null()
                    .default("KES"),
            );
        timestamps(&mut users, Users::CreatedAt, Users::UpdatedAt, Users::DeletedAt);
        manager.create_table(users.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-email-unique")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Wallets
        let mut wallets = Table::create();
        wallets
            .table(Wallets::Table)
            .if_not_exists()
            .col(ColumnDef::new(Wallets::Id).string().not_null().primary_key())
            .col(ColumnDef::new(Wallets::UserId).string().not_null())
            .col(ColumnDef::new(Wallets::Name).string().not_null())
            .col(ColumnDef::new(Wallets::Kind).string().not_null())
            .col(
                ColumnDef::new(Wallets::BalanceMinor)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(Wallets::Currency)
                    .string()
                    .not_null()
                    .default("KES"),
            )
            .col(ColumnDef::new(Wallets::Color).string().not_null())
            .col(ColumnDef::new(Wallets::AccountNumber).string())
            .col(
                ColumnDef::new(Wallets::IsDefault)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(ColumnDef::new(Wallets::LastSynced).timestamp())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-wallets-user_id")
                    .from(Wallets::Table, Wallets::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        timestamps(
            &mut wallets,
            Wallets::CreatedAt,
            Wallets::UpdatedAt,
            Wallets::DeletedAt,
        );
        manager.create_table(wallets.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wallets-user_id")
                    .table(Wallets::Table)
                    .col(Wallets::UserId)
                    .to_owned(),
            )
            .await?;

        // Transactions
        let mut transactions = Table::create();
        transactions
            .table(Transactions::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Transactions::Id)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Transactions::UserId).string().not_null())
            .col(ColumnDef::new(Transactions::WalletId).string())
            .col(
                ColumnDef::new(Transactions::AmountMinor)
                    .big_integer()
                    .not_null(),
            )
            .col(ColumnDef::new(Transactions::Description).string().not_null())
            .col(ColumnDef::new(Transactions::Method).string().not_null())
            .col(ColumnDef::new(Transactions::Category).string().not_null())
            .col(
                ColumnDef::new(Transactions::Status)
                    .string()
                    .not_null()
                    .default("Completed"),
            )
            .col(ColumnDef::new(Transactions::Notes).string())
            .col(ColumnDef::new(Transactions::ReceiptUrl).string())
            .col(
                ColumnDef::new(Transactions::TransactionDate)
                    .timestamp()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-transactions-user_id")
                    .from(Transactions::Table, Transactions::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-transactions-wallet_id")
                    .from(Transactions::Table, Transactions::WalletId)
                    .to(Wallets::Table, Wallets::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            );
        timestamps(
            &mut transactions,
            Transactions::CreatedAt,
            Transactions::UpdatedAt,
            Transactions::DeletedAt,
        );
        manager.create_table(transactions.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-transaction_date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await?;

        // Saving goals
        let mut goals = Table::create();
        goals
            .table(SavingGoals::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(SavingGoals::Id)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(SavingGoals::UserId).string().not_null())
            .col(ColumnDef::new(SavingGoals::Name).string().not_null())
            .col(
                ColumnDef::new(SavingGoals::TargetAmountMinor)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(SavingGoals::CurrentAmountMinor)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(SavingGoals::Color).string().not_null())
            .col(ColumnDef::new(SavingGoals::Icon).string())
            .col(ColumnDef::new(SavingGoals::Deadline).timestamp())
            .col(
                ColumnDef::new(SavingGoals::Priority)
                    .string()
                    .not_null()
                    .default("Medium"),
            )
            .col(ColumnDef::new(SavingGoals::Category).string())
            .col(
                ColumnDef::new(SavingGoals::Status)
                    .string()
                    .not_null()
                    .default("Active"),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-saving_goals-user_id")
                    .from(SavingGoals::Table, SavingGoals::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        timestamps(
            &mut goals,
            SavingGoals::CreatedAt,
            SavingGoals::UpdatedAt,
            SavingGoals::DeletedAt,
        );
        manager.create_table(goals.to_owned()).await?;

        // Budgets
        let mut budgets = Table::create();
        budgets
            .table(Budgets::Table)
            .if_not_exists()
            .col(ColumnDef::new(Budgets::Id).string().not_null().primary_key())
            .col(ColumnDef::new(Budgets::UserId).string().not_null())
            .col(ColumnDef::new(Budgets::Category).string().not_null())
            .col(
                ColumnDef::new(Budgets::LimitAmountMinor)
                    .big_integer()
                    .not_null(),
            )
            .col(ColumnDef::new(Budgets::Color).string().not_null())
            .col(ColumnDef::new(Budgets::Icon).string())
            .col(
                ColumnDef::new(Budgets::IsRollover)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Budgets::Kind)
                    .string()
                    .not_null()
                    .default("Variable"),
            )
            .col(
                ColumnDef::new(Budgets::AlertThreshold)
                    .integer()
                    .not_null()
                    .default(80),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-budgets-user_id")
                    .from(Budgets::Table, Budgets::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        timestamps(
            &mut budgets,
            Budgets::CreatedAt,
            Budgets::UpdatedAt,
            Budgets::DeletedAt,
        );
        manager.create_table(budgets.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-user_id-category")
                    .table(Budgets::Table)
                    .col(Budgets::UserId)
                    .col(Budgets::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SavingGoals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
