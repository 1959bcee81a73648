use super::error::{LedgerError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Fractional digits considered when comparing crypto quantities.
pub const CRYPTO_DECIMALS: u32 = 13;
/// Fractional digits considered when comparing fiat amounts.
pub const USD_DECIMALS: u32 = 2;

/// The zero value, shared by every computation.
pub const ZERO: PrecisionDecimal = PrecisionDecimal(Decimal::ZERO);

/// Comparison granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// 13 fractional digits
    Quantity,
    /// 2 fractional digits
    Currency,
}

impl Scale {
    pub fn decimals(self) -> u32 {
        match self {
            Scale::Quantity => CRYPTO_DECIMALS,
            Scale::Currency => USD_DECIMALS,
        }
    }
}

/// Exact decimal number for quantities and fiat amounts.
///
/// Arithmetic keeps full precision. Comparisons never look at the raw
/// representation: they round the difference of the two operands to the
/// quantity scale and compare that against zero, so values such as
/// `3.00020000000001` and `3.0002` are equal. Compare with
/// [`PrecisionDecimal::compare`] and [`PrecisionDecimal::equals`]; there is no
/// `PartialEq`/`Ord` implementation.
///
/// There is no conversion from `f32`/`f64`: build values from strings,
/// integers or [`Decimal`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecisionDecimal(Decimal);

impl PrecisionDecimal {
    pub const fn new(value: Decimal) -> Self {
        PrecisionDecimal(value)
    }

    /// Raw value, with any trailing noise intact.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// True when `a - b` rounds to zero at `scale`.
    pub fn is_equal_within_precision(a: PrecisionDecimal, b: PrecisionDecimal, scale: Scale) -> bool {
        round_half_even(a.0 - b.0, scale.decimals()).is_zero()
    }

    pub fn compare(&self, other: &PrecisionDecimal) -> Ordering {
        round_half_even(self.0 - other.0, CRYPTO_DECIMALS).cmp(&Decimal::ZERO)
    }

    pub fn equals(&self, other: &PrecisionDecimal) -> bool {
        self.compare(other) == Ordering::Equal
    }

    pub fn is_zero(&self) -> bool {
        self.equals(&ZERO)
    }

    pub fn is_positive(&self) -> bool {
        self.compare(&ZERO) == Ordering::Greater
    }

    pub fn is_negative(&self) -> bool {
        self.compare(&ZERO) == Ordering::Less
    }

    pub fn checked_add(self, other: PrecisionDecimal) -> Result<PrecisionDecimal> {
        self.0
            .checked_add(other.0)
            .map(PrecisionDecimal)
            .ok_or_else(|| overflow("addition", '+', self, other))
    }

    pub fn checked_sub(self, other: PrecisionDecimal) -> Result<PrecisionDecimal> {
        self.0
            .checked_sub(other.0)
            .map(PrecisionDecimal)
            .ok_or_else(|| overflow("subtraction", '-', self, other))
    }

    /// Multiplication at full precision. Fails when the integer part of the
    /// product does not fit (about 7.9e28); excess fractional digits are rounded.
    pub fn checked_mul(self, other: PrecisionDecimal) -> Result<PrecisionDecimal> {
        self.0
            .checked_mul(other.0)
            .map(PrecisionDecimal)
            .ok_or_else(|| overflow("multiplication", '*', self, other))
    }

    /// Division at full precision. Fails if `divisor` is zero at quantity scale.
    pub fn checked_div(self, divisor: PrecisionDecimal) -> Result<PrecisionDecimal> {
        if divisor.is_zero() {
            return Err(LedgerError::Arithmetic(format!(
                "division by zero: {} / {}",
                self.0, divisor.0
            )));
        }
        self.0
            .checked_div(divisor.0)
            .map(PrecisionDecimal)
            .ok_or_else(|| overflow("division", '/', self, divisor))
    }

    /// Quantity rendering: 8 fractional digits.
    pub fn format_quantity(&self) -> String {
        format_fixed(self.0, 8)
    }

    /// Fiat rendering: 4 fractional digits.
    pub fn format_fiat(&self) -> String {
        format_fixed(self.0, 4)
    }

    /// Fraction rendered as a percentage with 4 fractional digits (0.5 -> "50.0000%").
    pub fn format_percentage(&self) -> String {
        format!("{}%", format_fixed(self.0 * Decimal::ONE_HUNDRED, 4))
    }
}

fn overflow(operation: &str, symbol: char, a: PrecisionDecimal, b: PrecisionDecimal) -> LedgerError {
    LedgerError::Arithmetic(format!("{operation} overflow: {} {symbol} {}", a.0, b.0))
}

fn round_half_even(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven)
}

fn format_fixed(value: Decimal, decimals: u32) -> String {
    let mut rounded = round_half_even(value, decimals);
    rounded.rescale(decimals);
    rounded.to_string()
}

impl From<Decimal> for PrecisionDecimal {
    fn from(value: Decimal) -> Self {
        PrecisionDecimal(value)
    }
}

impl From<i64> for PrecisionDecimal {
    fn from(value: i64) -> Self {
        PrecisionDecimal(Decimal::from(value))
    }
}

impl From<u64> for PrecisionDecimal {
    fn from(value: u64) -> Self {
        PrecisionDecimal(Decimal::from(value))
    }
}

impl From<i32> for PrecisionDecimal {
    fn from(value: i32) -> Self {
        PrecisionDecimal(Decimal::from(value))
    }
}

impl FromStr for PrecisionDecimal {
    type Err = LedgerError;

    /// Digits beyond the 28 significant digits a [`Decimal`] holds are
    /// rounded away. Well-formed numbers too large to represent are value
    /// errors; anything else is a type error.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(value) = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
            return Ok(PrecisionDecimal(value));
        }
        if is_numeric_literal(trimmed) {
            return Err(LedgerError::Value(format!(
                "Value {s:?} exceeds the 28-digit decimal precision limit"
            )));
        }
        Err(LedgerError::Type(format!("Value has non-decimal value {s:?}")))
    }
}

fn is_numeric_literal(s: &str) -> bool {
    fn unsigned(part: &str) -> &str {
        part.strip_prefix(['+', '-']).unwrap_or(part)
    }
    let (mantissa, exponent) = match s.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (s, None),
    };
    let mantissa = unsigned(mantissa);
    let mantissa_ok = mantissa.chars().any(|c| c.is_ascii_digit())
        && mantissa.chars().all(|c| c.is_ascii_digit() || c == '.')
        && mantissa.matches('.').count() <= 1;
    let exponent_ok = exponent.map_or(true, |exponent| {
        let exponent = unsigned(exponent);
        !exponent.is_empty() && exponent.chars().all(|c| c.is_ascii_digit())
    });
    mantissa_ok && exponent_ok
}

impl fmt::Display for PrecisionDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.normalize(), f)
    }
}

impl Add for PrecisionDecimal {
    type Output = PrecisionDecimal;

    fn add(self, rhs: PrecisionDecimal) -> PrecisionDecimal {
        PrecisionDecimal(self.0 + rhs.0)
    }
}

impl Sub for PrecisionDecimal {
    type Output = PrecisionDecimal;

    fn sub(self, rhs: PrecisionDecimal) -> PrecisionDecimal {
        PrecisionDecimal(self.0 - rhs.0)
    }
}

impl Mul for PrecisionDecimal {
    type Output = PrecisionDecimal;

    fn mul(self, rhs: PrecisionDecimal) -> PrecisionDecimal {
        PrecisionDecimal(self.0 * rhs.0)
    }
}

impl Neg for PrecisionDecimal {
    type Output = PrecisionDecimal;

    fn neg(self) -> PrecisionDecimal {
        PrecisionDecimal(-self.0)
    }
}

impl Sum for PrecisionDecimal {
    fn sum<I: Iterator<Item = PrecisionDecimal>>(iter: I) -> Self {
        iter.fold(ZERO, |acc, d| acc + d)
    }
}
