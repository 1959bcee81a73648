use super::{Common, Flow, Transaction, TransactionDetails};
use crate::core::configuration::Configuration;
use crate::core::decimal::{PrecisionDecimal, ZERO};
use crate::core::entry::{self, Style};
use crate::core::entry_types::{EntrySetType, TransactionType};
use crate::core::error::{LedgerError, Result};

/// Movement between two accounts of the same owner.
///
/// The amount received stays under the owner's control, so only the fee
/// (`crypto_sent - crypto_received`) changes the balance and is taxable.
#[derive(Debug, Clone)]
pub struct Transfer {
    from_exchange: String,
    from_holder: String,
    to_exchange: String,
    to_holder: String,
    crypto_sent: PrecisionDecimal,
    crypto_received: PrecisionDecimal,
    crypto_fee: PrecisionDecimal,
    usd_fee: PrecisionDecimal,
}

impl Transfer {
    pub fn from_exchange(&self) -> &str {
        &self.from_exchange
    }

    pub fn from_holder(&self) -> &str {
        &self.from_holder
    }

    pub fn to_exchange(&self) -> &str {
        &self.to_exchange
    }

    pub fn to_holder(&self) -> &str {
        &self.to_holder
    }

    pub fn crypto_sent(&self) -> PrecisionDecimal {
        self.crypto_sent
    }

    pub fn crypto_received(&self) -> PrecisionDecimal {
        self.crypto_received
    }

    pub fn crypto_fee(&self) -> PrecisionDecimal {
        self.crypto_fee
    }

    pub fn usd_fee(&self) -> PrecisionDecimal {
        self.usd_fee
    }
}

impl Flow for Transfer {
    fn category(&self) -> EntrySetType {
        EntrySetType::Intra
    }

    fn crypto_balance_change(&self) -> PrecisionDecimal {
        self.crypto_fee
    }

    fn usd_balance_change(&self) -> PrecisionDecimal {
        self.usd_fee
    }

    fn usd_taxable_amount(&self, _transaction_type: TransactionType) -> PrecisionDecimal {
        self.usd_fee
    }

    fn is_taxable(&self, _transaction_type: TransactionType) -> bool {
        self.crypto_fee.is_positive()
    }

    fn fields(&self, style: Style) -> Vec<String> {
        vec![
            format!("from_exchange={}", entry::stringify(style, &self.from_exchange)),
            format!("from_holder={}", entry::stringify(style, &self.from_holder)),
            format!("to_exchange={}", entry::stringify(style, &self.to_exchange)),
            format!("to_holder={}", entry::stringify(style, &self.to_holder)),
            format!("crypto_sent={}", self.crypto_sent.format_quantity()),
            format!("crypto_received={}", self.crypto_received.format_quantity()),
            format!("crypto_fee={}", self.crypto_fee.format_quantity()),
            format!("usd_fee={}", self.usd_fee.format_fiat()),
        ]
    }
}

impl Transaction {
    /// Build a validated transfer. The subtype is always `MOVE`.
    ///
    /// A difference between sent and received that vanishes at quantity
    /// scale is rounding dust and counts as no fee. A real fee must be
    /// valued, so it requires a non-zero `spot_price`.
    #[allow(clippy::too_many_arguments)]
    pub fn transfer(
        configuration: &Configuration,
        line: i64,
        timestamp: &str,
        asset: &str,
        from_exchange: &str,
        from_holder: &str,
        to_exchange: &str,
        to_holder: &str,
        spot_price: PrecisionDecimal,
        crypto_sent: PrecisionDecimal,
        crypto_received: PrecisionDecimal,
    ) -> Result<Transaction> {
        let common = Common::type_check(
            configuration,
            EntrySetType::Intra,
            line,
            timestamp,
            asset,
            TransactionType::Move.as_str(),
            spot_price,
        )?;
        let from_exchange = configuration.type_check_exchange("from_exchange", from_exchange)?;
        let from_holder = configuration.type_check_holder("from_holder", from_holder)?;
        let to_exchange = configuration.type_check_exchange("to_exchange", to_exchange)?;
        let to_holder = configuration.type_check_holder("to_holder", to_holder)?;
        let crypto_sent = configuration.type_check_positive_decimal("crypto_sent", crypto_sent, true)?;
        let crypto_received =
            configuration.type_check_positive_decimal("crypto_received", crypto_received, false)?;

        let difference = crypto_sent.checked_sub(crypto_received)?;
        if difference.is_negative() {
            return Err(LedgerError::Value(format!(
                "Parameter 'crypto_received' ({crypto_received}) is greater than crypto_sent ({crypto_sent})"
            )));
        }
        let crypto_fee = if difference.is_zero() {
            if !difference.value().is_zero() {
                log::warn!(
                    "Transfer on line {} has rounding dust {} between sent and received, treated as no fee",
                    common.line,
                    difference
                );
            }
            ZERO
        } else {
            difference
        };
        if crypto_fee.is_positive() && common.spot_price.is_zero() {
            return Err(LedgerError::Value(format!(
                "Parameter 'spot_price' has zero value but transfer fee is {crypto_fee}: the fee cannot be valued"
            )));
        }

        let usd_fee = crypto_fee.checked_mul(common.spot_price)?;
        Ok(common.into_transaction(TransactionDetails::Intra(Transfer {
            from_exchange,
            from_holder,
            to_exchange,
            to_holder,
            crypto_sent,
            crypto_received,
            crypto_fee,
            usd_fee,
        })))
    }
}
