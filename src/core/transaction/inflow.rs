use super::{Common, Flow, Transaction, TransactionDetails};
use crate::core::configuration::Configuration;
use crate::core::decimal::{PrecisionDecimal, ZERO};
use crate::core::entry::{self, Style};
use crate::core::entry_types::{EntrySetType, TransactionType};
use crate::core::error::Result;

/// Acquisition that creates a lot.
#[derive(Debug, Clone)]
pub struct Inflow {
    exchange: String,
    holder: String,
    crypto_in: PrecisionDecimal,
    usd_fee: PrecisionDecimal,
    usd_in_no_fee: PrecisionDecimal,
    usd_in_with_fee: PrecisionDecimal,
}

impl Inflow {
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn crypto_in(&self) -> PrecisionDecimal {
        self.crypto_in
    }

    pub fn usd_fee(&self) -> PrecisionDecimal {
        self.usd_fee
    }

    pub fn usd_in_no_fee(&self) -> PrecisionDecimal {
        self.usd_in_no_fee
    }

    /// Total fiat paid for the lot, fee included; this is the lot's cost.
    pub fn usd_in_with_fee(&self) -> PrecisionDecimal {
        self.usd_in_with_fee
    }
}

impl Flow for Inflow {
    fn category(&self) -> EntrySetType {
        EntrySetType::In
    }

    fn crypto_balance_change(&self) -> PrecisionDecimal {
        self.crypto_in
    }

    fn usd_balance_change(&self) -> PrecisionDecimal {
        self.usd_in_with_fee
    }

    fn usd_taxable_amount(&self, transaction_type: TransactionType) -> PrecisionDecimal {
        if transaction_type.is_income() {
            self.usd_in_with_fee
        } else {
            ZERO
        }
    }

    fn is_taxable(&self, transaction_type: TransactionType) -> bool {
        transaction_type.is_income()
    }

    fn fields(&self, style: Style) -> Vec<String> {
        vec![
            format!("exchange={}", entry::stringify(style, &self.exchange)),
            format!("holder={}", entry::stringify(style, &self.holder)),
            format!("crypto_in={}", self.crypto_in.format_quantity()),
            format!("usd_fee={}", self.usd_fee.format_fiat()),
            format!("usd_in_no_fee={}", self.usd_in_no_fee.format_fiat()),
            format!("usd_in_with_fee={}", self.usd_in_with_fee.format_fiat()),
        ]
    }
}

impl Transaction {
    /// Build a validated inflow.
    ///
    /// `usd_in_no_fee` defaults to `crypto_in * spot_price` and
    /// `usd_in_with_fee` to `usd_in_no_fee + usd_fee`.
    #[allow(clippy::too_many_arguments)]
    pub fn inflow(
        configuration: &Configuration,
        line: i64,
        timestamp: &str,
        asset: &str,
        exchange: &str,
        holder: &str,
        transaction_type: &str,
        spot_price: PrecisionDecimal,
        crypto_in: PrecisionDecimal,
        usd_fee: PrecisionDecimal,
        usd_in_no_fee: Option<PrecisionDecimal>,
        usd_in_with_fee: Option<PrecisionDecimal>,
    ) -> Result<Transaction> {
        let common = Common::type_check(
            configuration,
            EntrySetType::In,
            line,
            timestamp,
            asset,
            transaction_type,
            spot_price,
        )?;
        let exchange = configuration.type_check_exchange("exchange", exchange)?;
        let holder = configuration.type_check_holder("holder", holder)?;
        let crypto_in = configuration.type_check_positive_decimal("crypto_in", crypto_in, true)?;
        let usd_fee = configuration.type_check_positive_decimal("usd_fee", usd_fee, false)?;
        let usd_in_no_fee = match usd_in_no_fee {
            Some(value) => value,
            None => crypto_in.checked_mul(common.spot_price)?,
        };
        let usd_in_no_fee = configuration.type_check_positive_decimal("usd_in_no_fee", usd_in_no_fee, false)?;
        let usd_in_with_fee = match usd_in_with_fee {
            Some(value) => value,
            None => usd_in_no_fee.checked_add(usd_fee)?,
        };
        let usd_in_with_fee =
            configuration.type_check_positive_decimal("usd_in_with_fee", usd_in_with_fee, false)?;

        Ok(common.into_transaction(TransactionDetails::In(Inflow {
            exchange,
            holder,
            crypto_in,
            usd_fee,
            usd_in_no_fee,
            usd_in_with_fee,
        })))
    }
}
