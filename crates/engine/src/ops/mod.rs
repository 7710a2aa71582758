use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod analytics;
mod budgets;
mod goals;
mod transactions;
mod users;
mod wallets;

pub use users::MIN_PASSWORD_LEN;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    password_cost: u32,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Largest amount, in minor units, a single stored value may hold.
///
/// Ten trillion major units at two decimals. Sums over thousands of such
/// values still fit in `i64`.
pub const MAX_AMOUNT_MINOR: i64 = 1_000_000_000_000_000;

fn require_at_most_max(amount_minor: i64, label: &str) -> ResultEngine<()> {
    if amount_minor > MAX_AMOUNT_MINOR {
        return Err(EngineError::Validation(format!(
            "{label} must not exceed {MAX_AMOUNT_MINOR}"
        )));
    }
    Ok(())
}

fn require_positive(amount_minor: i64, label: &str) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::Validation(format!(
            "{label} must be greater than 0"
        )));
    }
    require_at_most_max(amount_minor, label)
}

fn require_non_negative(amount_minor: i64, label: &str) -> ResultEngine<()> {
    if amount_minor < 0 {
        return Err(EngineError::Validation(format!(
            "{label} must not be negative"
        )));
    }
    require_at_most_max(amount_minor, label)
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    password_cost: u32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// bcrypt cost used when hashing passwords (4..=31).
    pub fn password_cost(mut self, cost: u32) -> EngineBuilder {
        self.password_cost = cost;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if !(4..=31).contains(&self.password_cost) {
            return Err(EngineError::Validation(format!(
                "invalid bcrypt cost: {}",
                self.password_cost
            )));
        }
        Ok(Engine {
            database: self.database,
            password_cost: self.password_cost,
        })
    }
}
