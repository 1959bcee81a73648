use super::configuration::Configuration;
use super::decimal::PrecisionDecimal;
use super::entry::{self, Entry, Style};
use super::entry_types::{EntrySetType, TransactionType};
use super::error::{LedgerError, Result};
use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::hash::{Hash, Hasher};

mod inflow;
mod outflow;
mod transfer;

pub use inflow::Inflow;
pub use outflow::Outflow;
pub use transfer::Transfer;

/// Category-specific part of a transaction. Each category decides how much
/// crypto and fiat the transaction moves and how much of it is taxable.
pub trait Flow {
    fn category(&self) -> EntrySetType;

    fn crypto_balance_change(&self) -> PrecisionDecimal;

    fn usd_balance_change(&self) -> PrecisionDecimal;

    fn usd_taxable_amount(&self, transaction_type: TransactionType) -> PrecisionDecimal;

    fn is_taxable(&self, transaction_type: TransactionType) -> bool;

    /// Rendered `field=value` strings for the category-specific fields
    fn fields(&self, style: Style) -> Vec<String>;
}

/// A single line of an asset's history: common fields plus the
/// category-specific details.
#[derive(Debug, Clone)]
pub struct Transaction {
    line: i64,
    unique_id: String,
    timestamp: DateTime<FixedOffset>,
    asset: String,
    transaction_type: TransactionType,
    spot_price: PrecisionDecimal,
    notes: Option<String>,
    details: TransactionDetails,
}

#[derive(Debug, Clone)]
pub enum TransactionDetails {
    /// Lot-creating acquisition
    In(Inflow),
    /// Lot-consuming disposal
    Out(Outflow),
    /// Movement between accounts of the same owner; only the fee is taxable
    Intra(Transfer),
}

/// Validated fields shared by every category.
struct Common {
    line: i64,
    timestamp: DateTime<FixedOffset>,
    asset: String,
    transaction_type: TransactionType,
    spot_price: PrecisionDecimal,
}

impl Common {
    fn type_check(
        configuration: &Configuration,
        category: EntrySetType,
        line: i64,
        timestamp: &str,
        asset: &str,
        transaction_type: &str,
        spot_price: PrecisionDecimal,
    ) -> Result<Common> {
        let line = configuration.type_check_positive_int("line", line, true)?;
        let timestamp = entry::parse_timestamp("timestamp", timestamp)?;
        let asset = configuration.type_check_asset("asset", asset)?;
        let parsed = TransactionType::type_check_from_string("transaction_type", transaction_type)?;
        if !parsed.is_allowed_in(category) {
            return Err(LedgerError::Value(format!(
                "Parameter 'transaction_type' has invalid transaction type value for an {category} transaction: {transaction_type:?}"
            )));
        }
        let spot_price = configuration.type_check_positive_decimal("spot_price", spot_price, false)?;
        Ok(Common {
            line,
            timestamp,
            asset,
            transaction_type: parsed,
            spot_price,
        })
    }

    fn into_transaction(self, details: TransactionDetails) -> Transaction {
        Transaction {
            line: self.line,
            unique_id: self.line.to_string(),
            timestamp: self.timestamp,
            asset: self.asset,
            transaction_type: self.transaction_type,
            spot_price: self.spot_price,
            notes: None,
            details,
        }
    }
}

impl Transaction {
    /// Attach free-form notes. Blank notes are dropped.
    pub fn with_notes(mut self, notes: &str) -> Self {
        let notes = notes.trim();
        self.notes = (!notes.is_empty()).then(|| notes.to_string());
        self
    }

    /// Source line the transaction was read from; also its identifier.
    pub fn line(&self) -> i64 {
        self.line
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn spot_price(&self) -> PrecisionDecimal {
        self.spot_price
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn details(&self) -> &TransactionDetails {
        &self.details
    }

    pub fn category(&self) -> EntrySetType {
        self.flow().category()
    }

    pub fn as_inflow(&self) -> Option<&Inflow> {
        match &self.details {
            TransactionDetails::In(inflow) => Some(inflow),
            TransactionDetails::Out(_) | TransactionDetails::Intra(_) => None,
        }
    }

    pub fn as_outflow(&self) -> Option<&Outflow> {
        match &self.details {
            TransactionDetails::Out(outflow) => Some(outflow),
            TransactionDetails::In(_) | TransactionDetails::Intra(_) => None,
        }
    }

    pub fn as_transfer(&self) -> Option<&Transfer> {
        match &self.details {
            TransactionDetails::Intra(transfer) => Some(transfer),
            TransactionDetails::In(_) | TransactionDetails::Out(_) => None,
        }
    }

    /// Fiat amount subject to tax: proceeds for outflows, fee value for
    /// transfers, full value for income and zero for other inflows.
    pub fn usd_taxable_amount(&self) -> PrecisionDecimal {
        self.flow().usd_taxable_amount(self.transaction_type)
    }

    pub fn is_taxable(&self) -> bool {
        self.flow().is_taxable(self.transaction_type)
    }

    /// Income-type events are matched against no lot.
    pub fn is_income(&self) -> bool {
        self.category() == EntrySetType::In && self.transaction_type.is_income()
    }

    fn flow(&self) -> &dyn Flow {
        match &self.details {
            TransactionDetails::In(inflow) => inflow,
            TransactionDetails::Out(outflow) => outflow,
            TransactionDetails::Intra(transfer) => transfer,
        }
    }

    fn kind(&self) -> &'static str {
        match self.details {
            TransactionDetails::In(_) => "Inflow",
            TransactionDetails::Out(_) => "Outflow",
            TransactionDetails::Intra(_) => "Transfer",
        }
    }
}

impl Entry for Transaction {
    fn id(&self) -> String {
        self.unique_id.clone()
    }

    fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    fn asset(&self) -> &str {
        &self.asset
    }

    fn crypto_balance_change(&self) -> PrecisionDecimal {
        self.flow().crypto_balance_change()
    }

    fn usd_balance_change(&self) -> PrecisionDecimal {
        self.flow().usd_balance_change()
    }

    fn to_string_with(&self, indent: usize, style: Style, extra_data: &[String]) -> String {
        let mut fields = vec![
            format!("id={}", entry::stringify(style, &self.unique_id)),
            format!("timestamp={}", entry::stringify(style, &entry::format_timestamp(&self.timestamp))),
            format!("asset={}", entry::stringify(style, &self.asset)),
            format!("transaction_type={}", self.transaction_type),
            format!("spot_price={}", self.spot_price.format_fiat()),
        ];
        fields.extend(self.flow().fields(style));
        fields.push(format!("crypto_balance_change={}", self.crypto_balance_change().format_quantity()));
        fields.push(format!("usd_balance_change={}", self.usd_balance_change().format_fiat()));
        fields.push(format!("usd_taxable_amount={}", self.usd_taxable_amount().format_fiat()));
        fields.push(format!("is_taxable={}", self.is_taxable()));
        if let Some(notes) = &self.notes {
            fields.push(format!("notes={}", entry::stringify(style, notes)));
        }
        fields.extend(extra_data.iter().cloned());
        entry::render(self.kind(), indent, style, &fields)
    }
}

/// Transactions are identified by category, asset and line.
impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.category() == other.category() && self.asset == other.asset && self.unique_id == other.unique_id
    }
}

impl Eq for Transaction {}

impl Hash for Transaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.category().hash(state);
        self.asset.hash(state);
        self.unique_id.hash(state);
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(0, Style::Display, &[]))
    }
}
