use super::configuration::Configuration;
use super::decimal::{PrecisionDecimal, ZERO};
use super::entry::{self, Entry, Style};
use super::error::{LedgerError, Result};
use super::transaction::{Inflow, Transaction};
use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Minimum holding period, in whole days, for long-term capital gains.
pub const LONG_TERM_CAPITAL_GAINS_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy)]
struct Lot<'a> {
    transaction: &'a Transaction,
    inflow: &'a Inflow,
}

/// Allocation of part of a lot against part of a taxable event.
///
/// Construction validates the pair completely, including that the fiat
/// products behind the fractions are representable; once built, every derived
/// amount is a pure function of the borrowed transactions and
/// `crypto_amount`. Income-type events (see [`Transaction::is_income`]) have
/// no lot and therefore no cost basis.
#[derive(Debug, Clone)]
pub struct GainLoss<'a> {
    crypto_amount: PrecisionDecimal,
    taxable_event: &'a Transaction,
    from_lot: Option<Lot<'a>>,
    /// taxable event fiat amount * crypto_amount
    event_usd_product: PrecisionDecimal,
    /// lot cost * crypto_amount, zero for income
    lot_usd_product: PrecisionDecimal,
}

impl<'a> GainLoss<'a> {
    pub fn new(
        configuration: &Configuration,
        crypto_amount: PrecisionDecimal,
        taxable_event: &'a Transaction,
        from_lot: Option<&'a Transaction>,
    ) -> Result<GainLoss<'a>> {
        if !taxable_event.is_taxable() {
            return Err(LedgerError::Type(format!(
                "Parameter 'taxable_event' is not taxable: {}",
                taxable_event.to_string_with(0, Style::Repr, &[])
            )));
        }
        configuration.type_check_asset("asset", taxable_event.asset())?;
        let crypto_amount = configuration.type_check_positive_decimal("crypto_amount", crypto_amount, true)?;
        let event_amount = taxable_event.crypto_balance_change();

        let from_lot = if taxable_event.is_income() {
            if let Some(lot) = from_lot {
                return Err(LedgerError::Type(format!(
                    "Parameter 'from_lot' must be None for income-type taxable events, instead it's {}",
                    lot.to_string_with(0, Style::Repr, &[])
                )));
            }
            if !crypto_amount.equals(&event_amount) {
                return Err(LedgerError::Value(format!(
                    "Parameter 'crypto_amount' must be equal to the crypto balance change of income-type taxable events, but they differ: {crypto_amount} != {event_amount}"
                )));
            }
            None
        } else {
            let transaction = from_lot.ok_or_else(|| {
                LedgerError::Type(format!(
                    "Parameter 'from_lot' must not be None for non-income taxable events: {}",
                    taxable_event.to_string_with(0, Style::Repr, &[])
                ))
            })?;
            let inflow = transaction.as_inflow().ok_or_else(|| {
                LedgerError::Type(format!(
                    "Parameter 'from_lot' is not an inflow: {}",
                    transaction.to_string_with(0, Style::Repr, &[])
                ))
            })?;
            Some(Lot { transaction, inflow })
        };

        if crypto_amount.compare(&event_amount).is_gt() {
            return Err(LedgerError::Value(format!(
                "Parameter 'crypto_amount' ({crypto_amount}) is greater than taxable event amount ({event_amount})"
            )));
        }

        if let Some(lot) = &from_lot {
            let lot_amount = lot.transaction.crypto_balance_change();
            if crypto_amount.compare(&lot_amount).is_gt() {
                return Err(LedgerError::Value(format!(
                    "Parameter 'crypto_amount' ({crypto_amount}) is greater than from_lot amount ({lot_amount})"
                )));
            }
            if taxable_event.timestamp() <= lot.transaction.timestamp() {
                return Err(LedgerError::Value(format!(
                    "Parameter 'taxable_event' timestamp ({}) is not after from_lot timestamp ({})",
                    entry::format_timestamp(&taxable_event.timestamp()),
                    entry::format_timestamp(&lot.transaction.timestamp())
                )));
            }
            if taxable_event.asset() != lot.transaction.asset() {
                return Err(LedgerError::Value(format!(
                    "Parameter 'taxable_event' asset ({}) != from_lot asset ({})",
                    taxable_event.asset(),
                    lot.transaction.asset()
                )));
            }
        }

        let event_usd_product = taxable_event.usd_taxable_amount().checked_mul(crypto_amount)?;
        let lot_usd_product = match &from_lot {
            Some(lot) => lot.inflow.usd_in_with_fee().checked_mul(crypto_amount)?,
            None => ZERO,
        };

        let gain_loss = GainLoss {
            crypto_amount,
            taxable_event,
            from_lot,
            event_usd_product,
            lot_usd_product,
        };
        log::debug!(
            "GainLoss {}: {} {} allocated",
            gain_loss.id(),
            crypto_amount.format_quantity(),
            gain_loss.asset()
        );
        Ok(gain_loss)
    }

    pub fn crypto_amount(&self) -> PrecisionDecimal {
        self.crypto_amount
    }

    pub fn taxable_event(&self) -> &'a Transaction {
        self.taxable_event
    }

    pub fn from_lot(&self) -> Option<&'a Transaction> {
        self.from_lot.map(|lot| lot.transaction)
    }

    /// Share of the taxable event covered by this allocation.
    pub fn taxable_event_fraction_percentage(&self) -> PrecisionDecimal {
        fraction(self.crypto_amount, self.taxable_event.crypto_balance_change())
    }

    /// Share of the lot consumed by this allocation (zero for income).
    pub fn from_lot_fraction_percentage(&self) -> PrecisionDecimal {
        match self.lot() {
            Some(lot) => fraction(self.crypto_amount, lot.transaction.crypto_balance_change()),
            None => ZERO,
        }
    }

    // Products come from `new`; the division is the last step.
    pub fn taxable_event_usd_amount_with_fee_fraction(&self) -> PrecisionDecimal {
        fraction(self.event_usd_product, self.taxable_event.crypto_balance_change())
    }

    pub fn from_lot_usd_amount_with_fee_fraction(&self) -> PrecisionDecimal {
        match self.lot() {
            Some(lot) => fraction(self.lot_usd_product, lot.transaction.crypto_balance_change()),
            None => ZERO,
        }
    }

    /// Fiat cost of the allocated part of the lot.
    pub fn usd_cost_basis(&self) -> PrecisionDecimal {
        self.from_lot_usd_amount_with_fee_fraction()
    }

    pub fn usd_gain(&self) -> PrecisionDecimal {
        self.taxable_event_usd_amount_with_fee_fraction() - self.usd_cost_basis()
    }

    /// Held for at least [`LONG_TERM_CAPITAL_GAINS_DAYS`] whole days. Income
    /// is always short-term.
    pub fn is_long_term_capital_gains(&self) -> bool {
        match self.lot() {
            Some(lot) => {
                let held = self.taxable_event.timestamp() - lot.transaction.timestamp();
                held.num_days() >= LONG_TERM_CAPITAL_GAINS_DAYS
            }
            None => false,
        }
    }

    /// The lot, or `None` for income. A missing lot on any other event
    /// cannot come out of `new`.
    fn lot(&self) -> Option<Lot<'a>> {
        if self.from_lot.is_none() && !self.taxable_event.is_income() {
            panic!(
                "invariant broken: from_lot is None but taxable event {} is not income-type",
                self.taxable_event.id()
            );
        }
        self.from_lot
    }
}

fn fraction(numerator: PrecisionDecimal, denominator: PrecisionDecimal) -> PrecisionDecimal {
    numerator
        .checked_div(denominator)
        .unwrap_or_else(|err| panic!("invariant broken: {err}"))
}

impl Entry for GainLoss<'_> {
    fn id(&self) -> String {
        match self.from_lot {
            Some(lot) => format!("{}->{}", self.taxable_event.id(), lot.transaction.id()),
            None => format!("{}->None", self.taxable_event.id()),
        }
    }

    fn timestamp(&self) -> DateTime<FixedOffset> {
        self.taxable_event.timestamp()
    }

    fn asset(&self) -> &str {
        self.taxable_event.asset()
    }

    fn crypto_balance_change(&self) -> PrecisionDecimal {
        self.crypto_amount
    }

    fn usd_balance_change(&self) -> PrecisionDecimal {
        self.taxable_event.usd_balance_change()
    }

    fn to_string_with(&self, indent: usize, style: Style, extra_data: &[String]) -> String {
        let from_lot = match self.from_lot {
            Some(lot) => lot
                .transaction
                .to_string_with(indent + 1, style, &[])
                .trim_start()
                .to_string(),
            None => "None".to_string(),
        };
        let mut fields = vec![
            format!("crypto_amount={}", self.crypto_amount.format_quantity()),
            format!("usd_cost_basis={}", self.usd_cost_basis().format_fiat()),
            format!("usd_gain={}", self.usd_gain().format_fiat()),
            format!("is_long_term_capital_gains={}", self.is_long_term_capital_gains()),
            format!(
                "taxable_event_usd_amount_with_fee_fraction={}",
                self.taxable_event_usd_amount_with_fee_fraction().format_fiat()
            ),
            format!(
                "taxable_event_fraction_percentage={}",
                self.taxable_event_fraction_percentage().format_percentage()
            ),
            format!(
                "taxable_event={}",
                self.taxable_event
                    .to_string_with(indent + 1, style, &[])
                    .trim_start()
            ),
            format!(
                "from_lot_usd_amount_with_fee_fraction={}",
                self.from_lot_usd_amount_with_fee_fraction().format_fiat()
            ),
            format!(
                "from_lot_fraction_percentage={}",
                self.from_lot_fraction_percentage().format_percentage()
            ),
            format!("from_lot={from_lot}"),
        ];
        fields.extend(extra_data.iter().cloned());
        entry::render("GainLoss", indent, style, &fields)
    }
}

/// Identity is the (taxable event, lot) pair; the allocated amount is not part of it.
impl PartialEq for GainLoss<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.taxable_event == other.taxable_event && self.from_lot() == other.from_lot()
    }
}

impl Eq for GainLoss<'_> {}

impl Hash for GainLoss<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.taxable_event.hash(state);
        self.from_lot().hash(state);
    }
}

impl fmt::Display for GainLoss<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(0, Style::Display, &[]))
    }
}
