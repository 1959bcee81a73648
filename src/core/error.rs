/// Result alias used across the accounting core.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors raised while validating or computing ledger entries.
///
/// Nothing in the core catches these: every violated invariant is returned
/// to the caller from the constructor or operation that detected it.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Argument has the wrong shape or kind (e.g. wrong transaction
    /// category, a non-taxable event where a taxable one is required).
    #[error("type error: {0}")]
    Type(String),
    /// Argument has the right shape but is semantically invalid (unknown
    /// asset, negative amount, lot dated after its taxable event, ...).
    #[error("value error: {0}")]
    Value(String),
    /// Division by zero.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),
}

impl LedgerError {
    pub fn is_type_error(&self) -> bool {
        matches!(self, LedgerError::Type(_))
    }

    pub fn is_value_error(&self) -> bool {
        matches!(self, LedgerError::Value(_))
    }

    pub fn message(&self) -> &str {
        match self {
            LedgerError::Type(msg) | LedgerError::Value(msg) | LedgerError::Arithmetic(msg) => msg,
        }
    }
}
