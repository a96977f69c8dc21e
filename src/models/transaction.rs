use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use super::Category;

/// Canonical text form of a transaction date (`dd/MM/yyyy`).
pub(crate) const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// Exact match only: `"Income"` or `"Expense"`.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            "Income" => Some(Self::Income),
            "Expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Sign applied to the stored magnitude when computing balances.
    pub(crate) fn signum(&self) -> Decimal {
        match self {
            Self::Income => Decimal::ONE,
            Self::Expense => Decimal::NEGATIVE_ONE,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum FieldError {
    #[error("invalid date '{0}', expected dd/MM/yyyy")]
    Date(String),
    #[error("invalid amount '{0}'")]
    Amount(String),
    #[error("unknown kind '{0}', expected Income or Expense")]
    Kind(String),
    #[error("description is empty")]
    EmptyDescription,
}

/// A single ledger entry. Edits replace the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transaction {
    date: String,
    description: String,
    amount: Decimal,
    kind: Kind,
}

impl Transaction {
    /// Build a transaction from already-typed fields. The amount is stored as
    /// a magnitude; the date text is kept as given.
    pub(crate) fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
        kind: Kind,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.abs(),
            kind,
        }
    }

    /// Validate raw text fields as entered by a user or read from an import line.
    pub(crate) fn parse(
        date: &str,
        description: &str,
        amount: &str,
        kind: &str,
    ) -> Result<Self, FieldError> {
        let date = parse_date(date)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(FieldError::EmptyDescription);
        }
        let amount = parse_amount(amount)?;
        let kind = Kind::parse(kind.trim()).ok_or_else(|| FieldError::Kind(kind.to_string()))?;
        Ok(Self::new(
            date.format(DATE_FORMAT).to_string(),
            description,
            amount,
            kind,
        ))
    }

    pub(crate) fn date(&self) -> &str {
        &self.date
    }

    pub(crate) fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn amount(&self) -> Decimal {
        self.amount
    }

    pub(crate) fn kind(&self) -> Kind {
        self.kind
    }

    pub(crate) fn is_expense(&self) -> bool {
        self.kind == Kind::Expense
    }

    /// Signed contribution to a running balance.
    pub(crate) fn signed_amount(&self) -> Decimal {
        self.amount * self.kind.signum()
    }

    /// Recomputed from the description on every call.
    pub(crate) fn category(&self) -> Category {
        crate::categorize::categorize(&self.description)
    }

    pub(crate) fn parsed_date(&self) -> Result<NaiveDate, FieldError> {
        parse_date(&self.date)
    }

    /// Value match on date, description and kind, with the amount compared
    /// within `tolerance`.
    pub(crate) fn matches(&self, other: &Transaction, tolerance: Decimal) -> bool {
        self.date == other.date
            && self.description == other.description
            && self.kind == other.kind
            && (self.amount - other.amount).abs() < tolerance
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.date, self.description, self.amount, self.kind
        )
    }
}

/// Parse a `dd/MM/yyyy` date.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| FieldError::Date(s.to_string()))
}

/// Parse a display amount such as `-$2,500` or `+$750.25` into its magnitude.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal, FieldError> {
    let cleaned = s.replace(['$', '€', '£', '¥', ','], "");
    let cleaned = cleaned.trim().trim_start_matches(['+', '-']).trim();
    if cleaned.is_empty() {
        return Err(FieldError::Amount(s.to_string()));
    }
    Decimal::from_str(cleaned)
        .map(|d| d.abs())
        .map_err(|_| FieldError::Amount(s.to_string()))
}
