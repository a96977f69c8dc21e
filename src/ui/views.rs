//! Text views. Each keeps its own mirror of the ledger, fed only by change
//! notifications from [`crate::sync::SyncManager`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt::Write;

use super::util::{format_signed, truncate};
use crate::aggregate::{self, Totals};
use crate::import::PendingLine;
use crate::models::{Category, Transaction};
use crate::sync::TransactionObserver;

const DESCRIPTION_WIDTH: usize = 28;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    txn: Transaction,
    amount_text: String,
}

impl Row {
    fn new(txn: &Transaction) -> Self {
        Self {
            txn: txn.clone(),
            amount_text: format_signed(txn.signed_amount()),
        }
    }
}

/// The transaction list. Rows are keyed by value, so an update finds the
/// row holding the old values and swaps in the new ones.
#[derive(Debug, Default)]
pub(crate) struct TransactionTable {
    rows: Vec<Row>,
}

impl TransactionTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn transaction(&self, row: usize) -> Option<&Transaction> {
        self.rows.get(row).map(|r| &r.txn)
    }

    fn find(&self, txn: &Transaction) -> Option<usize> {
        self.rows.iter().position(|r| r.txn == *txn)
    }

    /// Render committed rows followed by a placeholder for each line still
    /// waiting on the AI rewrite.
    pub(crate) fn render<'a>(&self, pending: impl IntoIterator<Item = &'a PendingLine>) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>3}  {:<10}  {:<w$}  {:>14}  {}",
            "#",
            "Date",
            "Description",
            "Amount",
            "Category",
            w = DESCRIPTION_WIDTH
        );
        for (i, row) in self.rows.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}  {:<10}  {:<w$}  {:>14}  {}",
                i + 1,
                row.txn.date(),
                truncate(row.txn.description(), DESCRIPTION_WIDTH),
                row.amount_text,
                row.txn.category(),
                w = DESCRIPTION_WIDTH
            );
        }
        for line in pending {
            let _ = writeln!(
                out,
                "{:>3}  {:<10}  {:<w$}  {:>14}",
                "…",
                format!("line {}", line.line_no),
                truncate(&line.text, DESCRIPTION_WIDTH),
                "(rewriting)",
                w = DESCRIPTION_WIDTH
            );
        }
        if self.rows.is_empty() {
            out.push_str("  (no transactions)\n");
        }
        out
    }
}

impl TransactionObserver for TransactionTable {
    fn on_transaction_added(&mut self, index: usize, txn: &Transaction) {
        let at = index.min(self.rows.len());
        self.rows.insert(at, Row::new(txn));
    }

    fn on_transaction_updated(&mut self, index: usize, old: &Transaction, new: &Transaction) {
        let slot = self.find(old).or((index < self.rows.len()).then_some(index));
        match slot {
            Some(i) => self.rows[i] = Row::new(new),
            None => tracing::warn!(index, "table row for updated transaction not found"),
        }
    }

    fn on_transaction_removed(&mut self, index: usize, txn: &Transaction) {
        match self.find(txn) {
            Some(i) => {
                self.rows.remove(i);
            }
            None => tracing::warn!(index, "table row for removed transaction not found"),
        }
    }
}

/// Dashboard panel: totals, weekly spending and category breakdown,
/// re-derived from its own mirror after every change.
#[derive(Debug, Default)]
pub(crate) struct SpendingPanel {
    mirror: Vec<Transaction>,
    totals: Totals,
    weekly: Vec<(&'static str, Decimal)>,
    breakdown: Vec<(Category, Decimal)>,
}

impl SpendingPanel {
    pub(crate) fn new() -> Self {
        let mut panel = Self::default();
        panel.recompute();
        panel
    }

    fn recompute(&mut self) {
        self.totals = aggregate::totals(&self.mirror);
        self.weekly = aggregate::weekly_spending(&self.mirror);
        self.breakdown = aggregate::category_breakdown(&self.mirror);
    }

    pub(crate) fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "  Income:     {}", format_signed(self.totals.income));
        let _ = writeln!(out, "  Expenses:   {}", format_signed(-self.totals.expenses));
        let _ = writeln!(out, "  Net:        {}", format_signed(self.totals.net()));

        out.push_str("\nWeekly spending:\n");
        let peak = self
            .weekly
            .iter()
            .map(|(_, v)| *v)
            .max()
            .unwrap_or(Decimal::ZERO);
        for (day, amount) in &self.weekly {
            let _ = writeln!(out, "  {day}  {:>12}  {}", format!("{amount:.2}"), bar(*amount, peak));
        }

        if !self.breakdown.is_empty() {
            out.push_str("\nSpending by category:\n");
            for (category, amount) in &self.breakdown {
                let _ = writeln!(out, "  {:<14} {:>12}", category.as_str(), format!("{amount:.2}"));
            }
        }
        out
    }
}

fn bar(value: Decimal, peak: Decimal) -> String {
    const WIDTH: i64 = 20;
    if peak <= Decimal::ZERO {
        return String::new();
    }
    let filled = value
        .checked_div(peak)
        .and_then(|share| share.checked_mul(Decimal::from(WIDTH)))
        .and_then(|cells| cells.round().to_usize())
        .unwrap_or(0);
    "█".repeat(filled)
}

impl TransactionObserver for SpendingPanel {
    fn on_transaction_added(&mut self, index: usize, txn: &Transaction) {
        let at = index.min(self.mirror.len());
        self.mirror.insert(at, txn.clone());
        self.recompute();
    }

    fn on_transaction_updated(&mut self, index: usize, _old: &Transaction, new: &Transaction) {
        if let Some(slot) = self.mirror.get_mut(index) {
            *slot = new.clone();
        }
        self.recompute();
    }

    fn on_transaction_removed(&mut self, index: usize, _txn: &Transaction) {
        if index < self.mirror.len() {
            self.mirror.remove(index);
        }
        self.recompute();
    }
}

#[cfg(test)]
#[path = "views_tests.rs"]
mod tests;
