use super::error::{LedgerError, Result};
use std::fmt;

/// Transaction subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Buy,
    Donate,
    Earn,
    Gift,
    Interest,
    Mining,
    Move,
    Sell,
    Staking,
    Wages,
}

impl TransactionType {
    /// Parse a subtype name, ignoring case and surrounding whitespace.
    pub fn type_check_from_string(name: &str, value: &str) -> Result<TransactionType> {
        match value.trim().to_uppercase().as_str() {
            "BUY" => Ok(TransactionType::Buy),
            "DONATE" => Ok(TransactionType::Donate),
            "EARN" => Ok(TransactionType::Earn),
            "GIFT" => Ok(TransactionType::Gift),
            "INTEREST" => Ok(TransactionType::Interest),
            "MINING" => Ok(TransactionType::Mining),
            "MOVE" => Ok(TransactionType::Move),
            "SELL" => Ok(TransactionType::Sell),
            "STAKING" => Ok(TransactionType::Staking),
            "WAGES" => Ok(TransactionType::Wages),
            _ => Err(LedgerError::Value(format!(
                "Parameter '{name}' has invalid transaction type value: {value:?}"
            ))),
        }
    }

    /// Income-type subtypes manufacture value with no cost basis.
    pub fn is_income(self) -> bool {
        matches!(
            self,
            TransactionType::Earn
                | TransactionType::Interest
                | TransactionType::Mining
                | TransactionType::Staking
                | TransactionType::Wages
        )
    }

    /// Whether a transaction of `category` may carry this subtype. `Gift`
    /// is valid both as an inflow and as an outflow.
    pub fn is_allowed_in(self, category: EntrySetType) -> bool {
        match category {
            EntrySetType::In => self == TransactionType::Buy || self == TransactionType::Gift || self.is_income(),
            EntrySetType::Out => matches!(
                self,
                TransactionType::Sell | TransactionType::Gift | TransactionType::Donate
            ),
            EntrySetType::Intra => self == TransactionType::Move,
            EntrySetType::Mixed => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Donate => "DONATE",
            TransactionType::Earn => "EARN",
            TransactionType::Gift => "GIFT",
            TransactionType::Interest => "INTEREST",
            TransactionType::Mining => "MINING",
            TransactionType::Move => "MOVE",
            TransactionType::Sell => "SELL",
            TransactionType::Staking => "STAKING",
            TransactionType::Wages => "WAGES",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category a transaction set is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntrySetType {
    In,
    Out,
    Intra,
    Mixed,
}

impl EntrySetType {
    pub fn type_check_from_string(name: &str, value: &str) -> Result<EntrySetType> {
        match value.trim().to_uppercase().as_str() {
            "IN" => Ok(EntrySetType::In),
            "OUT" => Ok(EntrySetType::Out),
            "INTRA" => Ok(EntrySetType::Intra),
            "MIXED" => Ok(EntrySetType::Mixed),
            _ => Err(LedgerError::Value(format!(
                "Parameter '{name}' has invalid entry set type value: {value:?}"
            ))),
        }
    }

    /// Whether a transaction of `category` may join a set of this type.
    pub fn accepts(self, category: EntrySetType) -> bool {
        match self {
            EntrySetType::Mixed => true,
            EntrySetType::In | EntrySetType::Out | EntrySetType::Intra => self == category,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntrySetType::In => "IN",
            EntrySetType::Out => "OUT",
            EntrySetType::Intra => "INTRA",
            EntrySetType::Mixed => "MIXED",
        }
    }
}

impl fmt::Display for EntrySetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_ignores_case() {
        assert_eq!(
            TransactionType::type_check_from_string("transaction_type", "bUy").unwrap(),
            TransactionType::Buy
        );
        assert_eq!(
            TransactionType::type_check_from_string("transaction_type", " eaRn ").unwrap(),
            TransactionType::Earn
        );
        assert_eq!(
            EntrySetType::type_check_from_string("entry_set_type", "intra").unwrap(),
            EntrySetType::Intra
        );
    }

    #[test]
    fn unknown_names_rejected() {
        let err = TransactionType::type_check_from_string("transaction_type", "swap").unwrap_err();
        assert!(err.is_value_error());
        let err = EntrySetType::type_check_from_string("entry_set_type", "foobar").unwrap_err();
        assert_eq!(
            err,
            LedgerError::Value(
                "Parameter 'entry_set_type' has invalid entry set type value: \"foobar\"".to_string()
            )
        );
    }

    #[test]
    fn income_types_identified() {
        assert!(TransactionType::Earn.is_income());
        assert!(TransactionType::Staking.is_income());
        assert!(TransactionType::Wages.is_income());
        assert!(!TransactionType::Buy.is_income());
        assert!(!TransactionType::Gift.is_income());
        assert!(!TransactionType::Sell.is_income());
    }

    #[test]
    fn subtypes_per_category() {
        assert!(TransactionType::Buy.is_allowed_in(EntrySetType::In));
        assert!(TransactionType::Gift.is_allowed_in(EntrySetType::In));
        assert!(TransactionType::Gift.is_allowed_in(EntrySetType::Out));
        assert!(!TransactionType::Sell.is_allowed_in(EntrySetType::In));
        assert!(!TransactionType::Move.is_allowed_in(EntrySetType::Out));
        assert!(TransactionType::Move.is_allowed_in(EntrySetType::Intra));
    }

    #[test]
    fn mixed_accepts_every_category() {
        for category in [EntrySetType::In, EntrySetType::Out, EntrySetType::Intra] {
            assert!(EntrySetType::Mixed.accepts(category));
            assert!(category.accepts(category));
        }
        assert!(!EntrySetType::In.accepts(EntrySetType::Out));
        assert!(!EntrySetType::Intra.accepts(EntrySetType::In));
    }
}
