use crate::EngineError;

/// ISO-4217 style currency code attached to users and wallets.
///
/// Kibubu does not convert between currencies. The code is validated
/// (three ASCII letters, stored uppercase) and carried along so clients can
/// format amounts. `KES` is the default.
///
/// ```rust
/// use engine::Currency;
///
/// let currency = Currency::try_from(" usd ").unwrap();
/// assert_eq!(currency.code(), "USD");
/// assert_eq!(Currency::default().code(), "KES");
/// assert!(Currency::try_from("shilling").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Currency(String);

impl Currency {
    pub const DEFAULT_CODE: &'static str = "KES";

    /// Canonical (uppercase) currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(Self::DEFAULT_CODE.to_string())
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::Validation(format!(
                "invalid currency code: {}",
                value.trim()
            )));
        }
        Ok(Self(code))
    }
}
