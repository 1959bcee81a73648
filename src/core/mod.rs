pub mod configuration;
pub mod decimal;
pub mod entry;
pub mod entry_types;
pub mod error;
pub mod gain_loss;
pub mod transaction;
pub mod transaction_set;

// Flat public surface for domain types and functions.
pub use configuration::{configuration_schema, Configuration};
pub use decimal::{PrecisionDecimal, Scale, CRYPTO_DECIMALS, USD_DECIMALS, ZERO};
pub use entry::{parse_timestamp, Entry, Style};
pub use entry_types::{EntrySetType, TransactionType};
pub use error::{LedgerError, Result};
pub use gain_loss::{GainLoss, LONG_TERM_CAPITAL_GAINS_DAYS};
pub use transaction::{Flow, Inflow, Outflow, Transaction, TransactionDetails, Transfer};
pub use transaction_set::TransactionSet;
