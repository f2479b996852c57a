use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::TransformError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BatchSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the document failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about one document inside a batch run.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    /// Path the document was read from.
    pub input: PathBuf,
    /// Path the transformed document is written to.
    pub output: PathBuf,
}

/// Minimal stats reported when a document is transformed successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentStats {
    /// Number of features in the document.
    pub features: usize,
}

/// Observer interface for per-document outcomes of a batch run.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait BatchObserver: Send + Sync {
    /// Called when a document is transformed and written.
    fn on_success(&self, _ctx: &DocumentContext, _stats: DocumentStats) {}

    /// Called when a document fails to read, parse or write.
    fn on_failure(&self, _ctx: &DocumentContext, _severity: BatchSeverity, _error: &TransformError) {}

    /// Called when a document failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &DocumentContext, severity: BatchSeverity, error: &TransformError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn BatchObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn BatchObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl BatchObserver for CompositeObserver {
    fn on_success(&self, ctx: &DocumentContext, stats: DocumentStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &DocumentContext, severity: BatchSeverity, error: &TransformError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &DocumentContext, severity: BatchSeverity, error: &TransformError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs per-document outcomes to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl BatchObserver for StdErrObserver {
    fn on_success(&self, ctx: &DocumentContext, stats: DocumentStats) {
        eprintln!(
            "[transform][ok] input={} output={} features={}",
            ctx.input.display(),
            ctx.output.display(),
            stats.features
        );
    }

    fn on_failure(&self, ctx: &DocumentContext, severity: BatchSeverity, error: &TransformError) {
        eprintln!(
            "[transform][{:?}] input={} err={}",
            severity,
            ctx.input.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &DocumentContext, severity: BatchSeverity, error: &TransformError) {
        eprintln!(
            "[ALERT][transform][{:?}] input={} err={}",
            severity,
            ctx.input.display(),
            error
        );
    }
}

/// Appends per-document outcomes to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl BatchObserver for FileObserver {
    fn on_success(&self, ctx: &DocumentContext, stats: DocumentStats) {
        self.append_line(&format!(
            "{} ok input={} output={} features={}",
            unix_ts(),
            ctx.input.display(),
            ctx.output.display(),
            stats.features
        ));
    }

    fn on_failure(&self, ctx: &DocumentContext, severity: BatchSeverity, error: &TransformError) {
        self.append_line(&format!(
            "{} fail severity={:?} input={} err={}",
            unix_ts(),
            severity,
            ctx.input.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &DocumentContext, severity: BatchSeverity, error: &TransformError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} input={} err={}",
            unix_ts(),
            severity,
            ctx.input.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
