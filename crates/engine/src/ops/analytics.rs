use chrono::Utc;
use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{
    DashboardSummary, FinancialHealth, IncomeVsExpense, Insights, MonthlyTrends, Period,
    ResultEngine, SpendingReport, Transaction,
    analytics::{self, TRANSACTION_SCAN_LIMIT},
    transactions,
};

use super::Engine;

impl Engine {
    /// Newest transactions of the user, at most `TRANSACTION_SCAN_LIMIT`.
    async fn scan_transactions(&self, user_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .filter(transactions::Column::DeletedAt.is_null())
            .order_by_desc(transactions::Column::TransactionDate)
            .limit(TRANSACTION_SCAN_LIMIT)
            .all(&self.database)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    pub async fn dashboard(&self, user_id: Uuid) -> ResultEngine<DashboardSummary> {
        let wallets = self.wallets(user_id).await?;
        let transactions = self.scan_transactions(user_id).await?;
        let goals = self.goals(user_id).await?;
        let budgets = self.budgets(user_id).await?;
        Ok(analytics::dashboard(
            &wallets,
            &transactions,
            &goals,
            &budgets,
            Utc::now(),
        ))
    }

    /// Spending per category from the start of `period` until now.
    pub async fn spending(&self, user_id: Uuid, period: Period) -> ResultEngine<SpendingReport> {
        let transactions = self.scan_transactions(user_id).await?;
        let budgets = self.budgets(user_id).await?;
        let now = Utc::now();
        Ok(analytics::spending_by_category(
            &transactions,
            &budgets,
            period.start(now),
            now,
        ))
    }

    pub async fn income_vs_expense(
        &self,
        user_id: Uuid,
        period: Period,
    ) -> ResultEngine<IncomeVsExpense> {
        let transactions = self.scan_transactions(user_id).await?;
        Ok(analytics::income_vs_expense(
            &transactions,
            period,
            Utc::now(),
        ))
    }

    /// `months == 0` selects the default window; large values are capped.
    pub async fn monthly_trends(&self, user_id: Uuid, months: u32) -> ResultEngine<MonthlyTrends> {
        let transactions = self.scan_transactions(user_id).await?;
        Ok(analytics::monthly_trends(&transactions, months, Utc::now()))
    }

    pub async fn financial_health(&self, user_id: Uuid) -> ResultEngine<FinancialHealth> {
        let wallets = self.wallets(user_id).await?;
        let transactions = self.scan_transactions(user_id).await?;
        let goals = self.goals(user_id).await?;
        let budgets = self.budgets(user_id).await?;
        Ok(analytics::financial_health(
            &wallets,
            &transactions,
            &goals,
            &budgets,
            Utc::now(),
        ))
    }

    pub async fn insights(&self, user_id: Uuid) -> ResultEngine<Insights> {
        let health = self.financial_health(user_id).await?;
        Ok(Insights::new(health, Utc::now()))
    }
}
