#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::models::Kind;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Added(usize, Transaction),
    Updated(usize, Transaction, Transaction),
    Removed(usize, Transaction),
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl TransactionObserver for Recorder {
    fn on_transaction_added(&mut self, index: usize, txn: &Transaction) {
        self.events.push(Event::Added(index, txn.clone()));
    }

    fn on_transaction_updated(&mut self, index: usize, old: &Transaction, new: &Transaction) {
        self.events
            .push(Event::Updated(index, old.clone(), new.clone()));
    }

    fn on_transaction_removed(&mut self, index: usize, txn: &Transaction) {
        self.events.push(Event::Removed(index, txn.clone()));
    }
}

/// Appends its tag to a shared log so delivery order can be checked.
struct Tagger {
    tag: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl TransactionObserver for Tagger {
    fn on_transaction_added(&mut self, _: usize, _: &Transaction) {
        self.log.borrow_mut().push(self.tag);
    }

    fn on_transaction_updated(&mut self, _: usize, _: &Transaction, _: &Transaction) {
        self.log.borrow_mut().push(self.tag);
    }

    fn on_transaction_removed(&mut self, _: usize, _: &Transaction) {
        self.log.borrow_mut().push(self.tag);
    }
}

fn recorder() -> Rc<RefCell<Recorder>> {
    Rc::new(RefCell::new(Recorder::default()))
}

fn coffee() -> Transaction {
    Transaction::parse("15/06/2024", "Coffee", "4.50", "Expense").unwrap()
}

// ── add ───────────────────────────────────────────────────────

#[test]
fn test_add_stores_stripped_amount() {
    let mut mgr = SyncManager::new();
    let txn = Transaction::parse("01/06/2024", "Rent", "-$2,500", "Expense").unwrap();
    mgr.add_transaction(txn);
    let stored = &mgr.all_transactions()[0];
    assert_eq!(stored.amount(), dec!(2500));
    assert_eq!(stored.kind(), Kind::Expense);
}

#[test]
fn test_add_notifies_observer() {
    let mut mgr = SyncManager::new();
    let rec = recorder();
    mgr.add_listener(rec.clone());

    let index = mgr.add_transaction(coffee());
    assert_eq!(index, 0);
    assert_eq!(rec.borrow().events, vec![Event::Added(0, coffee())]);
}

#[test]
fn test_notifications_in_registration_order() {
    let mut mgr = SyncManager::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    for tag in ["table", "chart", "summary"] {
        mgr.add_listener(Rc::new(RefCell::new(Tagger {
            tag,
            log: log.clone(),
        })));
    }
    mgr.add_transaction(coffee());
    assert_eq!(*log.borrow(), vec!["table", "chart", "summary"]);
}

// ── listeners ─────────────────────────────────────────────────

#[test]
fn test_duplicate_registration_is_ignored() {
    let mut mgr = SyncManager::new();
    let rec = recorder();
    assert!(mgr.add_listener(rec.clone()));
    assert!(!mgr.add_listener(rec.clone()));

    mgr.add_transaction(coffee());
    assert_eq!(rec.borrow().events.len(), 1);
}

#[test]
fn test_distinct_instances_both_notified() {
    let mut mgr = SyncManager::new();
    let a = recorder();
    let b = recorder();
    assert!(mgr.add_listener(a.clone()));
    assert!(mgr.add_listener(b.clone()));
    mgr.add_transaction(coffee());
    assert_eq!(a.borrow().events.len(), 1);
    assert_eq!(b.borrow().events.len(), 1);
}

#[test]
fn test_remove_listener() {
    let mut mgr = SyncManager::new();
    let rec = recorder();
    let shared: SharedObserver = rec.clone();
    mgr.add_listener(shared.clone());
    assert!(mgr.remove_listener(&shared));
    assert!(!mgr.remove_listener(&shared));
    mgr.add_transaction(coffee());
    assert!(rec.borrow().events.is_empty());
}

#[test]
fn test_busy_observer_does_not_block_others() {
    let mut mgr = SyncManager::new();
    let busy = recorder();
    let other = recorder();
    mgr.add_listener(busy.clone());
    mgr.add_listener(other.clone());

    let guard = busy.borrow();
    mgr.add_transaction(coffee());
    assert_eq!(other.borrow().events.len(), 1);
    drop(guard);

    // The missed event is not replayed later
    mgr.add_transaction(coffee());
    assert_eq!(busy.borrow().events.len(), 1);
    assert_eq!(other.borrow().events.len(), 2);
}

// ── update ────────────────────────────────────────────────────

#[test]
fn test_update_shows_new_values_and_reports_both() {
    let mut mgr = SyncManager::new();
    mgr.add_transaction(Transaction::parse("01/06/2024", "Salary", "3000", "Income").unwrap());
    mgr.add_transaction(coffee());
    let rec = recorder();
    mgr.add_listener(rec.clone());

    let new = Transaction::parse("16/06/2024", "Coffee beans", "12.00", "Expense").unwrap();
    let old = mgr.update_transaction(1, new.clone()).unwrap();

    assert_eq!(old, coffee());
    assert_eq!(mgr.all_transactions()[1], new);
    assert_eq!(
        rec.borrow().events,
        vec![Event::Updated(1, coffee(), new)]
    );
}

#[test]
fn test_update_out_of_range_is_observable_and_silent() {
    let mut mgr = SyncManager::new();
    let rec = recorder();
    mgr.add_listener(rec.clone());
    let result = mgr.update_transaction(0, coffee());
    assert_eq!(result, Err(LedgerError::IndexOutOfRange { index: 0, len: 0 }));
    assert!(rec.borrow().events.is_empty());
}

// ── remove ────────────────────────────────────────────────────

#[test]
fn test_remove_first_match_within_tolerance() {
    let mut mgr = SyncManager::new();
    mgr.add_transaction(coffee());
    mgr.add_transaction(Transaction::parse("15/06/2024", "Tea", "3.00", "Expense").unwrap());
    mgr.add_transaction(coffee());
    let rec = recorder();
    mgr.add_listener(rec.clone());

    // Display layer drift: 4.500001 instead of 4.50
    let probe = Transaction::new("15/06/2024", "Coffee", dec!(4.500001), Kind::Expense);
    let removed = mgr.remove_transaction(&probe).unwrap();

    assert_eq!(removed, coffee());
    let names: Vec<&str> = mgr
        .all_transactions()
        .iter()
        .map(|t| t.description())
        .collect();
    assert_eq!(names, vec!["Tea", "Coffee"]);
    assert_eq!(rec.borrow().events, vec![Event::Removed(0, coffee())]);
}

#[test]
fn test_remove_no_match_fires_nothing() {
    let mut mgr = SyncManager::new();
    mgr.add_transaction(coffee());
    let rec = recorder();
    mgr.add_listener(rec.clone());

    let probe = Transaction::new("15/06/2024", "Coffee", dec!(4.50), Kind::Income);
    assert!(mgr.remove_transaction(&probe).is_none());
    let probe = Transaction::new("15/06/2024", "Coffee", dec!(4.60), Kind::Expense);
    assert!(mgr.remove_transaction(&probe).is_none());

    assert_eq!(mgr.all_transactions().len(), 1);
    assert!(rec.borrow().events.is_empty());
}

// ── read-through accessors ────────────────────────────────────

#[test]
fn test_aggregates_track_mutations() {
    let mut mgr = SyncManager::new();
    mgr.add_transaction(Transaction::parse("01/06/2024", "Salary", "3000", "Income").unwrap());
    assert!(mgr.category_breakdown().is_empty());
    assert!(mgr.weekly_spending().iter().all(|(_, v)| v.is_zero()));

    mgr.add_transaction(coffee());
    assert_eq!(mgr.category_breakdown(), vec![(Category::Others, dec!(4.50))]);

    let groceries = Transaction::parse("15/06/2024", "Grocery", "4.50", "Expense").unwrap();
    mgr.update_transaction(1, groceries).unwrap();
    assert_eq!(mgr.category_breakdown(), vec![(Category::Food, dec!(4.50))]);

    let sat: Decimal = mgr
        .weekly_spending()
        .iter()
        .filter(|(d, _)| *d == "Sat")
        .map(|(_, v)| *v)
        .sum();
    assert_eq!(sat, dec!(4.50));
    assert_eq!(mgr.totals().net(), dec!(2995.50));
}
