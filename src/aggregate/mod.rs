//! Derived views over a slice of transactions. Every call recomputes from
//! scratch; nothing is cached between mutations.

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::models::{Category, Kind, Transaction};

pub(crate) const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Add `txn`'s amount to `total`. A row that would overflow the running sum
/// is logged and left out, like a row with a bad date.
fn accumulate(total: &mut Decimal, txn: &Transaction, view: &'static str) {
    match total.checked_add(txn.amount()) {
        Some(sum) => *total = sum,
        None => tracing::warn!(
            description = txn.description(),
            amount = %txn.amount(),
            view,
            "skipping transaction, total would overflow"
        ),
    }
}

/// Expense totals keyed by weekday, Monday first, across every transaction
/// regardless of calendar week. Rows with unparseable dates are skipped.
pub(crate) fn weekly_spending(transactions: &[Transaction]) -> Vec<(&'static str, Decimal)> {
    let mut totals = [Decimal::ZERO; 7];

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        match txn.parsed_date() {
            Ok(date) => {
                let slot = date.weekday().num_days_from_monday() as usize;
                accumulate(&mut totals[slot], txn, "weekly spending");
            }
            Err(e) => {
                tracing::warn!(
                    description = txn.description(),
                    error = %e,
                    "skipping transaction in weekly spending"
                );
            }
        }
    }

    WEEKDAYS.iter().copied().zip(totals).collect()
}

/// Expense totals per category, in keyword-table order. Categories without
/// any expense are left out.
pub(crate) fn category_breakdown(transactions: &[Transaction]) -> Vec<(Category, Decimal)> {
    let mut totals: Vec<(Category, Option<Decimal>)> =
        Category::all().iter().map(|c| (*c, None)).collect();

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let category = txn.category();
        if let Some((_, total)) = totals.iter_mut().find(|(c, _)| *c == category) {
            accumulate(total.get_or_insert(Decimal::ZERO), txn, "category breakdown");
        }
    }

    totals
        .into_iter()
        .filter_map(|(category, total)| total.map(|t| (category, t)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Totals {
    pub(crate) income: Decimal,
    pub(crate) expenses: Decimal,
}

impl Totals {
    /// Both sides are non-negative, so the difference cannot overflow.
    pub(crate) fn net(&self) -> Decimal {
        self.income - self.expenses
    }
}

pub(crate) fn totals(transactions: &[Transaction]) -> Totals {
    transactions
        .iter()
        .fold(Totals::default(), |mut acc, txn| {
            match txn.kind() {
                Kind::Income => accumulate(&mut acc.income, txn, "totals"),
                Kind::Expense => accumulate(&mut acc.expenses, txn, "totals"),
            }
            acc
        })
}

#[cfg(test)]
mod tests;
