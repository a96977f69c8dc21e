//! The single mutation gateway over the [`Ledger`]. Every change goes
//! through [`SyncManager`], which applies it and then notifies every
//! registered observer, in registration order, before returning.

use rust_decimal::Decimal;
use std::cell::RefCell;
use std::rc::Rc;

use crate::aggregate::{self, Totals};
use crate::ledger::{Ledger, LedgerError};
use crate::models::{Category, Transaction};

/// A view that mirrors ledger state and reacts to changes.
pub(crate) trait TransactionObserver {
    fn on_transaction_added(&mut self, index: usize, txn: &Transaction);

    /// Both values arrive in one call so the view can re-key its own row.
    fn on_transaction_updated(&mut self, index: usize, old: &Transaction, new: &Transaction);

    fn on_transaction_removed(&mut self, index: usize, txn: &Transaction);
}

pub(crate) type SharedObserver = Rc<RefCell<dyn TransactionObserver>>;

/// Amounts closer than one cent are treated as equal when removing by value.
fn remove_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

#[derive(Default)]
pub(crate) struct SyncManager {
    ledger: Ledger,
    observers: Vec<SharedObserver>,
}

impl SyncManager {
    pub(crate) fn new() -> Self {
        Self {
            ledger: Ledger::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer. Returns `false` if this exact instance is
    /// already registered.
    pub(crate) fn add_listener(&mut self, observer: SharedObserver) -> bool {
        if self.observers.iter().any(|o| same_observer(o, &observer)) {
            tracing::debug!("observer already registered");
            return false;
        }
        self.observers.push(observer);
        tracing::debug!(count = self.observers.len(), "observer registered");
        true
    }

    pub(crate) fn remove_listener(&mut self, observer: &SharedObserver) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| !same_observer(o, observer));
        self.observers.len() != before
    }

    pub(crate) fn add_transaction(&mut self, txn: Transaction) -> usize {
        let index = self.ledger.add(txn);
        if let Some(added) = self.ledger.get(index) {
            tracing::debug!(index, txn = %added, "transaction added");
            self.notify(|o| o.on_transaction_added(index, added));
        }
        index
    }

    /// Replace the row at `index` and return the previous value. Observers
    /// are not notified when the index is out of range.
    pub(crate) fn update_transaction(
        &mut self,
        index: usize,
        txn: Transaction,
    ) -> Result<Transaction, LedgerError> {
        let old = self.ledger.update_at(index, txn)?;
        if let Some(new) = self.ledger.get(index) {
            tracing::debug!(index, old = %old, new = %new, "transaction updated");
            self.notify(|o| o.on_transaction_updated(index, &old, new));
        }
        Ok(old)
    }

    /// Remove the first row equal to `probe` on date, description and kind,
    /// with amounts within one cent. Returns `None` without notifying
    /// anyone when nothing matches.
    pub(crate) fn remove_transaction(&mut self, probe: &Transaction) -> Option<Transaction> {
        let Some(index) = self.ledger.position_matching(probe, remove_tolerance()) else {
            tracing::debug!(probe = %probe, "no transaction matched for removal");
            return None;
        };
        let removed = self.ledger.remove_at(index).ok()?;
        tracing::debug!(index, txn = %removed, "transaction removed");
        self.notify(|o| o.on_transaction_removed(index, &removed));
        Some(removed)
    }

    pub(crate) fn all_transactions(&self) -> &[Transaction] {
        self.ledger.all()
    }

    pub(crate) fn weekly_spending(&self) -> Vec<(&'static str, Decimal)> {
        aggregate::weekly_spending(self.ledger.all())
    }

    pub(crate) fn category_breakdown(&self) -> Vec<(Category, Decimal)> {
        aggregate::category_breakdown(self.ledger.all())
    }

    pub(crate) fn totals(&self) -> Totals {
        aggregate::totals(self.ledger.all())
    }

    /// Observers never call back into the manager, and front-ends release
    /// every view borrow before mutating, so `try_borrow_mut` cannot fail in
    /// this crate. If a caller breaks that rule the event is lost and that
    /// observer's mirror stays out of date, so it is logged as an error
    /// rather than retried or queued.
    fn notify(&self, mut event: impl FnMut(&mut dyn TransactionObserver)) {
        for (position, observer) in self.observers.iter().enumerate() {
            match observer.try_borrow_mut() {
                Ok(mut o) => event(&mut *o),
                Err(_) => tracing::error!(
                    position,
                    "observer borrowed during a ledger change, its mirror is now stale"
                ),
            }
        }
    }
}

fn same_observer(a: &SharedObserver, b: &SharedObserver) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

#[cfg(test)]
mod tests;
