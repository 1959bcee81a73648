//! Accounting core of a crypto capital-gains engine: exact decimals,
//! per-asset ordered transaction histories and validated gain/loss records
//! pairing a taxable event with the lot it draws from.
//!
//! Lot selection (which lot covers which taxable event) is left to the
//! caller; [`GainLoss::new`] validates and prices each proposed allocation.

pub mod core;

pub use crate::core::*;
