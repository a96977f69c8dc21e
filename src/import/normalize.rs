use std::sync::Arc;
use thiserror::Error;

use crate::ai::CompletionService;
use crate::models::{FieldError, Transaction};

pub(crate) const DELIMITER: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum LineError {
    #[error("expected 4 '|'-separated fields, found {0}")]
    FieldCount(usize),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("AI rewrite failed: {0}")]
    Completion(String),
    #[error("AI rewrite returned no usable line")]
    EmptyResponse,
    #[error("import cancelled")]
    Cancelled,
}

/// Parse `date|description|amount|kind` exactly: a zero-padded
/// `dd/MM/yyyy` date, a bare decimal amount and an exact kind, with no
/// padding around any of them. Only the description is trimmed. Anything
/// looser, such as `$1,000` or ` Expense`, is left for the AI rewrite.
pub(crate) fn parse_structured(line: &str) -> Result<Transaction, LineError> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    let &[date, description, amount, kind] = fields.as_slice() else {
        return Err(LineError::FieldCount(fields.len()));
    };

    let txn = Transaction::parse(date, description, amount, kind)?;
    if txn.date() != date {
        return Err(FieldError::Date(date.to_string()).into());
    }
    if !is_bare_decimal(amount) {
        return Err(FieldError::Amount(amount.to_string()).into());
    }
    if txn.kind().as_str() != kind {
        return Err(FieldError::Kind(kind.to_string()).into());
    }
    Ok(txn)
}

fn is_bare_decimal(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Instruction sent to the completion service for a line the structured
/// parse rejected.
pub(crate) fn fallback_prompt(line: &str) -> String {
    format!(
        "Rewrite the following bank or statement line as exactly one line in the format \
date|description|amount|kind.\n\
Rules:\n\
- date must be dd/MM/yyyy\n\
- amount must be a bare positive number with no currency symbol, sign or thousands separator\n\
- kind must be exactly Income or Expense\n\
- reply with that single line only, no explanation\n\n\
Line: {line}"
    )
}

/// Lines of a completion answer that look like content, with code fences
/// and stray backticks removed.
fn response_lines(answer: &str) -> impl Iterator<Item = &str> {
    answer
        .lines()
        .map(|l| l.trim().trim_matches('`').trim())
        .filter(|l| !l.is_empty() && !l.starts_with("```"))
}

/// The first answer line that passes the structured grammar. When none
/// does, the error is the one for the first content line.
fn first_valid_line(answer: &str) -> Result<Transaction, LineError> {
    let mut first_error = None;
    for candidate in response_lines(answer) {
        match parse_structured(candidate) {
            Ok(txn) => return Ok(txn),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    Err(first_error.unwrap_or(LineError::EmptyResponse))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineOutcome {
    Blank,
    Parsed {
        txn: Transaction,
        via_fallback: bool,
    },
    Failed(LineError),
}

/// Turns one free-form line into a transaction: structured parse first,
/// AI rewrite second.
#[derive(Clone)]
pub(crate) struct Normalizer {
    completion: Arc<dyn CompletionService>,
}

impl Normalizer {
    pub(crate) fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    /// `None` for blank lines; otherwise the structured parse result.
    pub(crate) fn fast_path(line: &str) -> Option<Result<Transaction, LineError>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(parse_structured(line))
    }

    /// Ask the completion service to rewrite `line` and re-validate the
    /// answer with the structured grammar. Blocks on the service.
    pub(crate) fn fallback(&self, line: &str) -> Result<Transaction, LineError> {
        let line = line.trim();
        tracing::debug!(line, "structured parse failed, asking AI to rewrite");
        let answer = self
            .completion
            .complete(&fallback_prompt(line))
            .map_err(|e| LineError::Completion(format!("{e:#}")))?;
        first_valid_line(&answer)
    }

    pub(crate) fn normalize(&self, line: &str) -> LineOutcome {
        match Self::fast_path(line) {
            None => LineOutcome::Blank,
            Some(Ok(txn)) => LineOutcome::Parsed {
                txn,
                via_fallback: false,
            },
            Some(Err(_)) => match self.fallback(line) {
                Ok(txn) => LineOutcome::Parsed {
                    txn,
                    via_fallback: true,
                },
                Err(e) => LineOutcome::Failed(e),
            },
        }
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
