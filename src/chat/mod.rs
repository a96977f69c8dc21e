mod history;

use anyhow::Result;
use std::fmt::Write;
use std::sync::Arc;

use crate::ai::CompletionService;
use crate::sync::SyncManager;
use crate::ui::util::format_signed;

pub(crate) use history::{ChatHistory, Role};

const RECENT_LIMIT: usize = 20;

/// Answers questions about the ledger through the completion service and
/// keeps a best-effort transcript.
pub(crate) struct Assistant {
    completion: Arc<dyn CompletionService>,
    history: ChatHistory,
}

impl Assistant {
    pub(crate) fn new(completion: Arc<dyn CompletionService>, history: ChatHistory) -> Self {
        Self {
            completion,
            history,
        }
    }

    pub(crate) fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// The question is logged even when the completion call fails.
    pub(crate) fn ask(&self, question: &str, manager: &SyncManager) -> Result<String> {
        self.history.append(Role::User, question);
        let answer = self.completion.complete(&build_prompt(question, manager))?;
        self.history.append(Role::Ai, &answer);
        Ok(answer)
    }
}

/// Ledger snapshot followed by the user's question.
pub(crate) fn build_prompt(question: &str, manager: &SyncManager) -> String {
    let mut prompt = String::from(
        "You are helping a user understand their personal finances. \
Use only the data below.\n\n",
    );

    let totals = manager.totals();
    let _ = writeln!(prompt, "Income: {}", format_signed(totals.income));
    let _ = writeln!(prompt, "Expenses: {}", format_signed(-totals.expenses));
    let _ = writeln!(prompt, "Net balance: {}", format_signed(totals.net()));

    let breakdown = manager.category_breakdown();
    if !breakdown.is_empty() {
        prompt.push_str("\nSpending by category:\n");
        for (category, amount) in &breakdown {
            let _ = writeln!(prompt, "- {category}: {amount:.2}");
        }
    }

    prompt.push_str("\nSpending by weekday:\n");
    for (day, amount) in manager.weekly_spending() {
        let _ = writeln!(prompt, "- {day}: {amount:.2}");
    }

    let all = manager.all_transactions();
    if !all.is_empty() {
        let start = all.len().saturating_sub(RECENT_LIMIT);
        let _ = writeln!(
            prompt,
            "\nMost recent transactions ({} of {}), as date|description|amount|kind:",
            all.len() - start,
            all.len()
        );
        for txn in &all[start..] {
            let _ = writeln!(prompt, "{txn}");
        }
    }

    let _ = write!(prompt, "\nQuestion: {}", question.trim());
    prompt
}

#[cfg(test)]
mod tests;
