use super::configuration::Configuration;
use super::entry::{Entry, Style};
use super::entry_types::EntrySetType;
use super::error::{LedgerError, Result};
use super::transaction::Transaction;
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::fmt;

/// Ordered transactions of one asset and one category.
///
/// Members are kept sorted by timestamp (ties broken by line) whatever the
/// insertion order, and each member's parent is the member right before it.
/// Build a set with [`TransactionSet::add_entry`] during ingestion, then share
/// it read-only.
#[derive(Debug, Clone)]
pub struct TransactionSet {
    configuration_name: String,
    entry_set_type: EntrySetType,
    asset: String,
    entries: Vec<Transaction>,
    /// id -> index into `entries`
    positions: HashMap<String, usize>,
}

fn sort_key(transaction: &Transaction) -> (DateTime<FixedOffset>, i64) {
    (transaction.timestamp(), transaction.line())
}

impl TransactionSet {
    pub fn new(configuration: &Configuration, entry_set_type: EntrySetType, asset: &str) -> Result<Self> {
        let asset = configuration.type_check_asset("asset", asset)?;
        Ok(TransactionSet {
            configuration_name: configuration.name.clone(),
            entry_set_type,
            asset,
            entries: Vec::new(),
            positions: HashMap::new(),
        })
    }

    /// Name of the configuration the set was built under.
    pub fn configuration_name(&self) -> &str {
        &self.configuration_name
    }

    pub fn entry_set_type(&self) -> EntrySetType {
        self.entry_set_type
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert keeping timestamp order.
    pub fn add_entry(&mut self, transaction: Transaction) -> Result<()> {
        let category = transaction.category();
        if !self.entry_set_type.accepts(category) {
            return Err(LedgerError::Type(format!(
                "Attempting to add an {category} transaction (line {}) to a set of type {}",
                transaction.line(),
                self.entry_set_type
            )));
        }
        if transaction.asset() != self.asset {
            return Err(LedgerError::Value(format!(
                "Parameter 'entry' has asset {:?} but the set holds {:?}: {}",
                transaction.asset(),
                self.asset,
                transaction.to_string_with(0, Style::Repr, &[])
            )));
        }
        let id = transaction.id();
        if self.positions.contains_key(&id) {
            return Err(LedgerError::Value(format!(
                "Parameter 'entry' duplicates id {id:?} already in the set: {}",
                transaction.to_string_with(0, Style::Repr, &[])
            )));
        }

        let key = sort_key(&transaction);
        let position = self.entries.partition_point(|e| sort_key(e) <= key);
        log::debug!(
            "TransactionSet {}/{}: add {} transaction {} at position {}",
            self.asset,
            self.entry_set_type,
            category,
            id,
            position
        );
        self.entries.insert(position, transaction);
        for (index, entry) in self.entries.iter().enumerate().skip(position) {
            self.positions.insert(entry.id(), index);
        }
        Ok(())
    }

    /// The member right before `transaction` in timestamp order, or `None`
    /// for the earliest member. Fails if `transaction` is not a member.
    pub fn get_parent(&self, transaction: &Transaction) -> Result<Option<&Transaction>> {
        let position = self
            .position(transaction)
            .ok_or_else(|| {
                LedgerError::Value(format!(
                    "Unknown entry: {}",
                    transaction.to_string_with(0, Style::Repr, &[])
                ))
            })?;
        Ok(position.checked_sub(1).map(|parent| &self.entries[parent]))
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.positions.get(id).map(|&index| &self.entries[index])
    }

    pub fn contains(&self, transaction: &Transaction) -> bool {
        self.position(transaction).is_some()
    }

    /// Members in ascending timestamp order.
    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.entries.iter()
    }

    fn position(&self, transaction: &Transaction) -> Option<usize> {
        self.positions
            .get(&transaction.id())
            .copied()
            .filter(|&index| self.entries[index] == *transaction)
    }
}

impl<'a> IntoIterator for &'a TransactionSet {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for TransactionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TransactionSet:")?;
        writeln!(f, "  configuration={}", self.configuration_name)?;
        writeln!(f, "  entry_set_type={}", self.entry_set_type)?;
        write!(f, "  asset={}", self.asset)?;
        for transaction in &self.entries {
            write!(f, "\n{}", transaction.to_string_with(1, Style::Display, &[]))?;
        }
        Ok(())
    }
}
