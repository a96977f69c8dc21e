mod normalize;
mod session;

use anyhow::{Context, Result};
use std::path::Path;

use crate::sync::SyncManager;

pub(crate) use normalize::{LineError, LineOutcome, Normalizer};
pub(crate) use session::{ImportSession, PendingLine};

/// Per-import tally shown to the user once the whole file is processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ImportSummary {
    pub(crate) succeeded: usize,
    pub(crate) failed: usize,
    pub(crate) via_fallback: usize,
    /// 1-based line number and reason for each failed line.
    pub(crate) failures: Vec<(usize, LineError)>,
}

impl ImportSummary {
    fn record_success(&mut self, via_fallback: bool) {
        self.succeeded += 1;
        if via_fallback {
            self.via_fallback += 1;
        }
    }

    fn record_failure(&mut self, line_no: usize, error: LineError) {
        tracing::warn!(line_no, error = %error, "import line rejected");
        self.failed += 1;
        self.failures.push((line_no, error));
    }
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Imported {} transaction", self.succeeded)?;
        if self.succeeded != 1 {
            write!(f, "s")?;
        }
        if self.via_fallback > 0 {
            write!(f, " ({} rewritten by AI)", self.via_fallback)?;
        }
        write!(f, ", {} failed", self.failed)
    }
}

/// Import every line in order, blocking on the AI fallback where needed.
/// Failed lines are counted and skipped; earlier successes stay committed.
pub(crate) fn import_lines<'a>(
    manager: &mut SyncManager,
    normalizer: &Normalizer,
    lines: impl IntoIterator<Item = &'a str>,
) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for (i, line) in lines.into_iter().enumerate() {
        match normalizer.normalize(line) {
            LineOutcome::Blank => {}
            LineOutcome::Parsed { txn, via_fallback } => {
                manager.add_transaction(txn);
                summary.record_success(via_fallback);
            }
            LineOutcome::Failed(e) => summary.record_failure(i + 1, e),
        }
    }

    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        via_fallback = summary.via_fallback,
        "import finished"
    );
    summary
}

pub(crate) fn read_import_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))
}
