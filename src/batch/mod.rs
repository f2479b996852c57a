//! Directory batch orchestration.
//!
//! [`run_batch`] drives the transformation engine over every configured directory pair,
//! in declared order. Per pair:
//!
//! 1. the output directory is reset destructively (removed if present, then recreated)
//! 2. the input directory's regular files are enumerated and sorted by name
//! 3. each file is read as a feature collection, every feature is transformed in order,
//!    and a new document is written to the output directory under the same file name
//!
//! Inputs are never mutated. By default the run is fully sequential and aborts on the
//! first failure, leaving any partially written output in place. [`BatchOptions`] can
//! opt into per-file parallelism within one directory set (output content is identical)
//! and into skipping unreadable documents instead of aborting.

pub mod observability;

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::config::{Config, DirectorySet, PropertyMapping};
use crate::document::{read_collection_from_path, write_collection_to_path};
use crate::error::{TransformError, TransformResult};
use crate::transform::transform_feature;
use crate::types::FeatureCollection;

pub use observability::{
    BatchObserver, BatchSeverity, CompositeObserver, DocumentContext, DocumentStats, FileObserver,
    StdErrObserver,
};

/// What to do when a single document fails to read, parse or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentErrorPolicy {
    /// Propagate the first failure and abort the run.
    #[default]
    Abort,
    /// Report the failure to the observer, leave the document out of the output, and
    /// continue with the remaining files. Never silent: skipped documents are counted
    /// in the [`BatchSummary`] and surfaced through the observer.
    Skip,
}

/// Options controlling a batch run.
///
/// Use [`Default`] for the reference behavior: sequential, abort on first error.
#[derive(Clone)]
pub struct BatchOptions {
    /// Worker threads for per-file transformation within one directory set.
    ///
    /// `None` runs fully sequentially. Parallel runs produce identical output content;
    /// the output-directory reset always happens before any worker writes into it.
    pub num_threads: Option<usize>,
    /// Failure handling for individual documents.
    pub on_document_error: DocumentErrorPolicy,
    /// Optional observer for per-document outcomes.
    pub observer: Option<Arc<dyn BatchObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: BatchSeverity,
}

impl fmt::Debug for BatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchOptions")
            .field("num_threads", &self.num_threads)
            .field("on_document_error", &self.on_document_error)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            num_threads: None,
            on_document_error: DocumentErrorPolicy::default(),
            observer: None,
            alert_at_or_above: BatchSeverity::Critical,
        }
    }
}

/// Counters accumulated over one [`run_batch`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    /// Documents transformed and written.
    pub documents_written: usize,
    /// Features transformed across all written documents.
    pub features_transformed: usize,
    /// Documents skipped under [`DocumentErrorPolicy::Skip`].
    pub documents_skipped: usize,
}

enum DocumentOutcome {
    Written { features: usize },
    Skipped,
}

/// Run the whole batch described by `config`.
///
/// Directory sets are processed in declared order. Any error aborts the run (subject to
/// [`BatchOptions::on_document_error`] for per-document failures); output already written
/// before the error stays on disk.
pub fn run_batch(config: &Config, options: &BatchOptions) -> TransformResult<BatchSummary> {
    let mut summary = BatchSummary::default();
    for dir_set in &config.directories {
        run_directory_set(dir_set, &config.mapping, options, &mut summary)?;
    }
    Ok(summary)
}

fn run_directory_set(
    dirs: &DirectorySet,
    mapping: &PropertyMapping,
    options: &BatchOptions,
    summary: &mut BatchSummary,
) -> TransformResult<()> {
    reset_output_dir(&dirs.output)?;
    let files = list_document_files(&dirs.input)?;

    match options.num_threads {
        None => {
            for name in &files {
                let outcome = process_document(dirs, name, mapping, options)?;
                record(summary, outcome);
            }
        }
        Some(threads) => {
            let pool = ThreadPoolBuilder::new()
                .num_threads(threads.max(1))
                .build()
                .expect("failed to build thread pool");
            // The reset above happens-before the pool dispatch; workers only ever write
            // distinct file names, so no further synchronization is needed.
            let outcomes: TransformResult<Vec<DocumentOutcome>> = pool.install(|| {
                files
                    .par_iter()
                    .map(|name| process_document(dirs, name, mapping, options))
                    .collect()
            });
            for outcome in outcomes? {
                record(summary, outcome);
            }
        }
    }
    Ok(())
}

fn record(summary: &mut BatchSummary, outcome: DocumentOutcome) {
    match outcome {
        DocumentOutcome::Written { features } => {
            summary.documents_written += 1;
            summary.features_transformed += features;
        }
        DocumentOutcome::Skipped => summary.documents_skipped += 1,
    }
}

fn process_document(
    dirs: &DirectorySet,
    file_name: &OsString,
    mapping: &PropertyMapping,
    options: &BatchOptions,
) -> TransformResult<DocumentOutcome> {
    let ctx = DocumentContext {
        input: dirs.input.join(file_name),
        output: dirs.output.join(file_name),
    };

    match transform_document(&ctx.input, &ctx.output, mapping) {
        Ok(features) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_success(&ctx, DocumentStats { features });
            }
            Ok(DocumentOutcome::Written { features })
        }
        Err(error) => {
            let severity = severity_for_error(&error);
            if let Some(obs) = options.observer.as_ref() {
                obs.on_failure(&ctx, severity, &error);
                if severity >= options.alert_at_or_above {
                    obs.on_alert(&ctx, severity, &error);
                }
            }
            match options.on_document_error {
                DocumentErrorPolicy::Abort => Err(error),
                DocumentErrorPolicy::Skip => Ok(DocumentOutcome::Skipped),
            }
        }
    }
}

fn transform_document(
    input_path: &Path,
    output_path: &Path,
    mapping: &PropertyMapping,
) -> TransformResult<usize> {
    let source = read_collection_from_path(input_path)?;
    let features: Vec<_> = source
        .features
        .iter()
        .map(|feature| transform_feature(feature, mapping))
        .collect();
    let count = features.len();
    write_collection_to_path(output_path, &FeatureCollection::new(features))?;
    Ok(count)
}

/// Destructive output reset: remove the directory tree if present, then recreate it.
fn reset_output_dir(output: &Path) -> TransformResult<()> {
    match fs::remove_dir_all(output) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    fs::create_dir_all(output)?;
    Ok(())
}

/// Regular files of the input directory, sorted by name for deterministic processing
/// order across platforms. Subdirectories and other non-file entries are not documents.
fn list_document_files(input: &Path) -> TransformResult<Vec<OsString>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(input)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name());
        }
    }
    names.sort();
    Ok(names)
}

fn severity_for_error(error: &TransformError) -> BatchSeverity {
    match error {
        TransformError::Io(_) => BatchSeverity::Critical,
        TransformError::Document { .. } => BatchSeverity::Error,
        // Configuration problems cannot occur per-document (the config is compiled
        // before the run), but the classification stays total.
        TransformError::Config { .. } | TransformError::UnknownTransform { .. } => {
            BatchSeverity::Critical
        }
    }
}
