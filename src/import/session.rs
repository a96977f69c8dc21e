//! Background import: structured lines are committed on the calling (UI)
//! thread right away, lines that need the AI rewrite go to a worker thread
//! and come back over a channel. Only the UI thread touches the manager.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::{ImportSummary, LineError, Normalizer};
use crate::models::Transaction;
use crate::sync::SyncManager;

struct Job {
    id: u64,
    line: String,
}

struct JobResult {
    id: u64,
    outcome: Result<Transaction, LineError>,
}

/// Runs AI rewrites one at a time, in submission order.
struct FallbackWorker {
    jobs: Option<Sender<Job>>,
    results: Receiver<JobResult>,
    handle: Option<JoinHandle<()>>,
}

impl FallbackWorker {
    fn spawn(normalizer: Normalizer, cancelled: Arc<AtomicBool>) -> Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (result_tx, result_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("import-fallback".into())
            .spawn(move || {
                for job in job_rx {
                    let outcome = if cancelled.load(Ordering::SeqCst) {
                        Err(LineError::Cancelled)
                    } else {
                        normalizer.fallback(&job.line)
                    };
                    if result_tx.send(JobResult { id: job.id, outcome }).is_err() {
                        break;
                    }
                }
            })
            .context("Failed to start import worker")?;

        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            handle: Some(handle),
        })
    }

    fn submit(&self, job: Job) -> Result<(), Job> {
        match &self.jobs {
            Some(tx) => tx.send(job).map_err(|e| e.0),
            None => Err(job),
        }
    }

    /// Stop accepting jobs; queued ones are still answered.
    fn close(&mut self) {
        self.jobs.take();
    }

    fn join(&mut self) {
        self.close();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("import worker panicked");
            }
        }
    }
}

/// A line waiting on the AI rewrite. Views may render it as a placeholder
/// row; it never enters the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingLine {
    pub(crate) line_no: usize,
    pub(crate) text: String,
}

pub(crate) struct ImportSession {
    worker: Option<FallbackWorker>,
    cancelled: Arc<AtomicBool>,
    pending: BTreeMap<u64, PendingLine>,
    summary: ImportSummary,
}

impl ImportSession {
    /// Commit every structured line now and queue the rest for the worker.
    pub(crate) fn start<'a>(
        manager: &mut SyncManager,
        normalizer: &Normalizer,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut session = Self {
            worker: None,
            cancelled,
            pending: BTreeMap::new(),
            summary: ImportSummary::default(),
        };

        for (i, line) in lines.into_iter().enumerate() {
            let line_no = i + 1;
            match Normalizer::fast_path(line) {
                None => {}
                Some(Ok(txn)) => {
                    manager.add_transaction(txn);
                    session.summary.record_success(false);
                }
                Some(Err(_)) => session.queue(normalizer, line_no, line.trim())?,
            }
        }

        if let Some(worker) = session.worker.as_mut() {
            worker.close();
        }
        Ok(session)
    }

    fn queue(&mut self, normalizer: &Normalizer, line_no: usize, line: &str) -> Result<()> {
        if self.worker.is_none() {
            self.worker = Some(FallbackWorker::spawn(
                normalizer.clone(),
                self.cancelled.clone(),
            )?);
        }
        let id = line_no as u64;
        let job = Job {
            id,
            line: line.to_string(),
        };
        let submitted = self.worker.as_ref().map(|w| w.submit(job));
        match submitted {
            Some(Ok(())) => {
                self.pending.insert(
                    id,
                    PendingLine {
                        line_no,
                        text: line.to_string(),
                    },
                );
            }
            _ => self
                .summary
                .record_failure(line_no, LineError::Completion("worker unavailable".into())),
        }
        Ok(())
    }

    pub(crate) fn pending(&self) -> impl Iterator<Item = &PendingLine> {
        self.pending.values()
    }

    pub(crate) fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn summary(&self) -> &ImportSummary {
        &self.summary
    }

    /// Lines still queued when this is called are reported as cancelled; a
    /// rewrite already in flight finishes normally.
    pub(crate) fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Commit whatever results have arrived without blocking. Returns how
    /// many pending lines were settled.
    pub(crate) fn poll(&mut self, manager: &mut SyncManager) -> usize {
        let mut settled = 0;
        while let Some(result) = self.try_next() {
            self.settle(manager, result);
            settled += 1;
        }
        settled
    }

    /// Block until every pending line is settled and return the summary.
    pub(crate) fn finish(mut self, manager: &mut SyncManager) -> ImportSummary {
        while !self.pending.is_empty() {
            let next = self
                .worker
                .as_ref()
                .and_then(|w| w.results.recv().ok());
            match next {
                Some(result) => self.settle(manager, result),
                None => self.abandon_pending(),
            }
        }
        if let Some(worker) = self.worker.as_mut() {
            worker.join();
        }
        std::mem::take(&mut self.summary)
    }

    fn try_next(&mut self) -> Option<JobResult> {
        let worker = self.worker.as_ref()?;
        match worker.results.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.abandon_pending();
                None
            }
        }
    }

    /// The placeholder leaves `pending` in the same step the record is
    /// committed or counted as failed.
    fn settle(&mut self, manager: &mut SyncManager, result: JobResult) {
        let Some(line) = self.pending.remove(&result.id) else {
            return;
        };
        match result.outcome {
            Ok(txn) => {
                manager.add_transaction(txn);
                self.summary.record_success(true);
            }
            Err(e) => self.summary.record_failure(line.line_no, e),
        }
        if self.pending.is_empty() {
            tracing::info!(
                succeeded = self.summary.succeeded,
                failed = self.summary.failed,
                via_fallback = self.summary.via_fallback,
                "import finished"
            );
        }
    }

    fn abandon_pending(&mut self) {
        let lost = std::mem::take(&mut self.pending);
        for line in lost.into_values() {
            self.summary.record_failure(
                line.line_no,
                LineError::Completion("import worker stopped".into()),
            );
        }
    }
}

impl Drop for ImportSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
