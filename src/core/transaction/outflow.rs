use super::{Common, Flow, Transaction, TransactionDetails};
use crate::core::configuration::Configuration;
use crate::core::decimal::PrecisionDecimal;
use crate::core::entry::{self, Style};
use crate::core::entry_types::{EntrySetType, TransactionType};
use crate::core::error::Result;

/// Disposal that consumes lots. Always taxable.
#[derive(Debug, Clone)]
pub struct Outflow {
    exchange: String,
    holder: String,
    crypto_out_no_fee: PrecisionDecimal,
    crypto_fee: PrecisionDecimal,
    crypto_out_with_fee: PrecisionDecimal,
    usd_out_no_fee: PrecisionDecimal,
    usd_fee: PrecisionDecimal,
    usd_out_with_fee: PrecisionDecimal,
}

impl Outflow {
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn crypto_out_no_fee(&self) -> PrecisionDecimal {
        self.crypto_out_no_fee
    }

    pub fn crypto_fee(&self) -> PrecisionDecimal {
        self.crypto_fee
    }

    pub fn crypto_out_with_fee(&self) -> PrecisionDecimal {
        self.crypto_out_with_fee
    }

    pub fn usd_out_no_fee(&self) -> PrecisionDecimal {
        self.usd_out_no_fee
    }

    pub fn usd_fee(&self) -> PrecisionDecimal {
        self.usd_fee
    }

    pub fn usd_out_with_fee(&self) -> PrecisionDecimal {
        self.usd_out_with_fee
    }
}

impl Flow for Outflow {
    fn category(&self) -> EntrySetType {
        EntrySetType::Out
    }

    fn crypto_balance_change(&self) -> PrecisionDecimal {
        self.crypto_out_with_fee()
    }

    fn usd_balance_change(&self) -> PrecisionDecimal {
        self.usd_out_with_fee()
    }

    // The fee leaves the holder's hands too, so it is part of the disposal.
    fn usd_taxable_amount(&self, _transaction_type: TransactionType) -> PrecisionDecimal {
        self.usd_out_with_fee()
    }

    fn is_taxable(&self, _transaction_type: TransactionType) -> bool {
        true
    }

    fn fields(&self, style: Style) -> Vec<String> {
        vec![
            format!("exchange={}", entry::stringify(style, &self.exchange)),
            format!("holder={}", entry::stringify(style, &self.holder)),
            format!("crypto_out_no_fee={}", self.crypto_out_no_fee.format_quantity()),
            format!("crypto_fee={}", self.crypto_fee.format_quantity()),
            format!("usd_out_no_fee={}", self.usd_out_no_fee.format_fiat()),
            format!("usd_fee={}", self.usd_fee.format_fiat()),
        ]
    }
}

impl Transaction {
    /// Build a validated outflow. Fiat amounts are valued at `spot_price`.
    #[allow(clippy::too_many_arguments)]
    pub fn outflow(
        configuration: &Configuration,
        line: i64,
        timestamp: &str,
        asset: &str,
        exchange: &str,
        holder: &str,
        transaction_type: &str,
        spot_price: PrecisionDecimal,
        crypto_out_no_fee: PrecisionDecimal,
        crypto_fee: PrecisionDecimal,
    ) -> Result<Transaction> {
        let common = Common::type_check(
            configuration,
            EntrySetType::Out,
            line,
            timestamp,
            asset,
            transaction_type,
            spot_price,
        )?;
        let exchange = configuration.type_check_exchange("exchange", exchange)?;
        let holder = configuration.type_check_holder("holder", holder)?;
        let crypto_out_no_fee =
            configuration.type_check_positive_decimal("crypto_out_no_fee", crypto_out_no_fee, true)?;
        let crypto_fee = configuration.type_check_positive_decimal("crypto_fee", crypto_fee, false)?;

        let spot_price = common.spot_price;
        let crypto_out_with_fee = crypto_out_no_fee.checked_add(crypto_fee)?;
        let usd_out_no_fee = crypto_out_no_fee.checked_mul(spot_price)?;
        let usd_fee = crypto_fee.checked_mul(spot_price)?;
        let usd_out_with_fee = usd_out_no_fee.checked_add(usd_fee)?;
        Ok(common.into_transaction(TransactionDetails::Out(Outflow {
            exchange,
            holder,
            crypto_out_no_fee,
            crypto_fee,
            crypto_out_with_fee,
            usd_out_no_fee,
            usd_fee,
            usd_out_with_fee,
        })))
    }
}
