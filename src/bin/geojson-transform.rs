//! geojson-transform CLI - apply a declarative property-transform configuration to
//! directories of GeoJSON documents.
//!
//! All semantics live in the library; this binary only locates the configuration
//! document, selects run options, and maps errors to a non-zero exit status.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use geojson_transform::batch::{run_batch, BatchOptions, DocumentErrorPolicy, StdErrObserver};
use geojson_transform::config::load_config_from_path;
use geojson_transform::TransformResult;

#[derive(Parser)]
#[command(name = "geojson-transform")]
#[command(version, about = "Rewrite GeoJSON feature properties across directories using a declarative configuration", long_about = None)]
struct Cli {
    /// Path to the transform configuration document.
    #[arg(long = "config-file", value_name = "PATH")]
    config_file: PathBuf,

    /// Process the files of each directory set in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads to use with --parallel (default: available parallelism).
    #[arg(long, value_name = "N", requires = "parallel")]
    threads: Option<usize>,

    /// Skip documents that fail to read or parse instead of aborting the run.
    #[arg(long)]
    keep_going: bool,

    /// Suppress per-document progress on stderr.
    #[arg(long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> TransformResult<()> {
    let config = load_config_from_path(&cli.config_file)?;

    let mut options = BatchOptions::default();
    if cli.parallel {
        let threads = cli.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        options.num_threads = Some(threads);
    }
    if cli.keep_going {
        options.on_document_error = DocumentErrorPolicy::Skip;
    }
    if !cli.quiet {
        options.observer = Some(Arc::new(StdErrObserver));
    }

    let summary = run_batch(&config, &options)?;
    if !cli.quiet {
        let skipped = if summary.documents_skipped > 0 {
            format!(", {} skipped", summary.documents_skipped)
        } else {
            String::new()
        };
        eprintln!(
            "done: {} documents, {} features{skipped}",
            summary.documents_written, summary.features_transformed
        );
    }
    Ok(())
}
