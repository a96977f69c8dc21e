use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Transaction;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum LedgerError {
    #[error("no transaction at index {index} (ledger holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ordered transaction store. Insertion order is display order and the index
/// is the only identity a row has.
///
/// Only [`crate::sync::SyncManager`] holds a mutable `Ledger`.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append and return the new row's index.
    pub(crate) fn add(&mut self, txn: Transaction) -> usize {
        self.transactions.push(txn);
        self.transactions.len() - 1
    }

    /// Replace the row at `index`, returning the previous value.
    pub(crate) fn update_at(
        &mut self,
        index: usize,
        txn: Transaction,
    ) -> Result<Transaction, LedgerError> {
        let len = self.len();
        let slot = self
            .transactions
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, txn))
    }

    /// Index of the first row matching `probe` with the amount compared within `tolerance`.
    pub(crate) fn position_matching(&self, probe: &Transaction, tolerance: Decimal) -> Option<usize> {
        self.transactions
            .iter()
            .position(|t| t.matches(probe, tolerance))
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Result<Transaction, LedgerError> {
        let len = self.len();
        if index >= len {
            return Err(LedgerError::IndexOutOfRange { index, len });
        }
        Ok(self.transactions.remove(index))
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    pub(crate) fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub(crate) fn len(&self) -> usize {
        self.transactions.len()
    }
}
