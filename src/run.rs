mod cli;
mod shell;

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use crate::chat::Assistant;
use crate::import::{self, ImportSession, Normalizer};
use crate::models::Transaction;
use crate::sync::{SharedObserver, SyncManager};
use crate::ui::views::{SpendingPanel, TransactionTable};

pub(crate) use cli::as_cli;
pub(crate) use shell::as_shell;

/// Everything a front-end needs. The manager is owned by the caller and
/// shared by reference; the views are registered on it once, here.
pub(crate) struct App<'a> {
    manager: &'a mut SyncManager,
    table: Rc<RefCell<TransactionTable>>,
    panel: Rc<RefCell<SpendingPanel>>,
    normalizer: Normalizer,
    assistant: Assistant,
    import: Option<ImportSession>,
    pub(crate) running: bool,
}

impl<'a> App<'a> {
    pub(crate) fn new(
        manager: &'a mut SyncManager,
        normalizer: Normalizer,
        assistant: Assistant,
    ) -> Self {
        let table = Rc::new(RefCell::new(TransactionTable::new()));
        let panel = Rc::new(RefCell::new(SpendingPanel::new()));
        manager.add_listener(table.clone());
        manager.add_listener(panel.clone());
        Self {
            manager,
            table,
            panel,
            normalizer,
            assistant,
            import: None,
            running: true,
        }
    }

    // ── Ledger edits ──────────────────────────────────────────

    pub(crate) fn add(&mut self, txn: Transaction, out: &mut impl Write) -> Result<()> {
        let index = self.manager.add_transaction(txn);
        writeln!(out, "Added row {}", index + 1)?;
        Ok(())
    }

    pub(crate) fn edit(&mut self, row: usize, txn: Transaction, out: &mut impl Write) -> Result<()> {
        let index = row
            .checked_sub(1)
            .ok_or_else(|| anyhow::anyhow!("Rows are numbered from 1"))?;
        let old = self.manager.update_transaction(index, txn)?;
        writeln!(out, "Updated row {row} (was {old})")?;
        Ok(())
    }

    /// Remove by the values shown in the table row, the way the list view does.
    pub(crate) fn remove(&mut self, row: usize, out: &mut impl Write) -> Result<()> {
        let shown = row
            .checked_sub(1)
            .and_then(|i| self.table.borrow().transaction(i).cloned())
            .ok_or_else(|| {
                anyhow::anyhow!("No row {row} (table has {})", self.table.borrow().len())
            })?;
        match self.manager.remove_transaction(&shown) {
            Some(removed) => writeln!(out, "Removed {removed}")?,
            None => writeln!(out, "No matching transaction")?,
        }
        Ok(())
    }

    // ── Views ─────────────────────────────────────────────────

    pub(crate) fn list(&self, out: &mut impl Write) -> Result<()> {
        let table = self.table.borrow();
        let rendered = match &self.import {
            Some(session) => table.render(session.pending()),
            None => table.render(std::iter::empty()),
        };
        write!(out, "{rendered}")?;
        Ok(())
    }

    pub(crate) fn summary(&self, out: &mut impl Write) -> Result<()> {
        write!(out, "{}", self.panel.borrow().render())?;
        Ok(())
    }

    // ── Import ────────────────────────────────────────────────

    /// Import the whole file before returning, blocking on any AI rewrites.
    pub(crate) fn import_blocking(&mut self, path: &Path, out: &mut impl Write) -> Result<()> {
        let text = import::read_import_file(path)?;
        let summary = import::import_lines(self.manager, &self.normalizer, text.lines());
        writeln!(out, "{summary}")?;
        for (line_no, error) in &summary.failures {
            writeln!(out, "  line {line_no}: {error}")?;
        }
        Ok(())
    }

    /// Commit structured lines now; AI rewrites finish in the background
    /// and are picked up by [`App::poll_import`].
    pub(crate) fn import_background(&mut self, path: &Path, out: &mut impl Write) -> Result<()> {
        if self.import.is_some() {
            anyhow::bail!("An import is already running (use `wait` or `cancel`)");
        }
        let text = import::read_import_file(path)?;
        let session = ImportSession::start(self.manager, &self.normalizer, text.lines())
            .context("Failed to start import")?;
        let waiting = session.pending().count();
        self.import = Some(session);
        if waiting > 0 {
            writeln!(out, "{waiting} line(s) sent to the AI for rewriting")?;
        }
        self.poll_import(out)
    }

    /// Commit whatever background results have arrived; print the summary
    /// once the import is complete.
    pub(crate) fn poll_import(&mut self, out: &mut impl Write) -> Result<()> {
        let Some(session) = self.import.as_mut() else {
            return Ok(());
        };
        let settled = session.poll(self.manager);
        if session.is_done() {
            return self.finish_import(out);
        }
        if settled > 0 {
            let summary = session.summary();
            writeln!(
                out,
                "Import: {} added, {} failed, {} still rewriting",
                summary.succeeded,
                summary.failed,
                session.pending().count()
            )?;
        }
        Ok(())
    }

    pub(crate) fn wait_import(&mut self, out: &mut impl Write) -> Result<()> {
        if self.import.is_none() {
            writeln!(out, "No import running")?;
            return Ok(());
        }
        self.finish_import(out)
    }

    pub(crate) fn cancel_import(&mut self, out: &mut impl Write) -> Result<()> {
        match &self.import {
            Some(session) => {
                session.cancel();
                writeln!(out, "Cancelling remaining lines")?;
            }
            None => writeln!(out, "No import running")?,
        }
        Ok(())
    }

    fn finish_import(&mut self, out: &mut impl Write) -> Result<()> {
        if let Some(session) = self.import.take() {
            let summary = session.finish(self.manager);
            writeln!(out, "{summary}")?;
            for (line_no, error) in &summary.failures {
                writeln!(out, "  line {line_no}: {error}")?;
            }
        }
        Ok(())
    }

    // ── Assistant ─────────────────────────────────────────────

    pub(crate) fn chat(&self, question: &str, out: &mut impl Write) -> Result<()> {
        let answer = self.assistant.ask(question, self.manager)?;
        writeln!(out, "{answer}")?;
        Ok(())
    }

    pub(crate) fn history(&self, out: &mut impl Write) -> Result<()> {
        let messages = self.assistant.history().load();
        if messages.is_empty() {
            writeln!(
                out,
                "No chat history in {}",
                self.assistant.history().path().display()
            )?;
        }
        for message in messages {
            let who = match message.role {
                crate::chat::Role::User => "you",
                crate::chat::Role::Ai => "ai",
            };
            writeln!(out, "{who:>4}: {}", message.text)?;
        }
        Ok(())
    }
}

/// Detach the views so the manager stops feeding mirrors nobody renders.
impl Drop for App<'_> {
    fn drop(&mut self) {
        let table: SharedObserver = self.table.clone();
        let panel: SharedObserver = self.panel.clone();
        self.manager.remove_listener(&table);
        self.manager.remove_listener(&panel);
    }
}
