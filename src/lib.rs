//! lprindex: dataset indexer for licence-plate detection.
//!
//! lprindex walks a dataset root of per-image JSON annotation files, pairs
//! each with its image, drops samples that are malformed or excluded by the
//! training policy, and exposes the rest as an ordered catalog that a
//! detection-model trainer can iterate and split.
//!
//! # Modules
//!
//! - [`annotation`]: annotation records, bounding polygons, and the parser
//! - [`catalog`]: directory scanning, the sample catalog, and train/val splits
//! - [`error`]: Error types for lprindex operations

pub mod annotation;
pub mod catalog;
pub mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::LprIndexError;

use catalog::{Catalog, ScanOptions, Subset, DEFAULT_TRAIN_FRACTION};

/// The lprindex CLI application.
#[derive(Parser)]
#[command(name = "lprindex")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan a dataset root and report what was kept and skipped.
    Scan(ScanArgs),
    /// List the samples of the training or validation subset.
    List(ListArgs),
}

/// Options shared by every subcommand that scans a dataset.
#[derive(clap::Args)]
struct DatasetArgs {
    /// Dataset root containing data/ and images/.
    root: PathBuf,

    /// Stop after this many accepted samples (0 = no limit).
    #[arg(long, env = "LPRINDEX_LIMIT", default_value_t = 0)]
    limit: usize,

    /// Fraction of samples assigned to the training subset.
    #[arg(long, env = "LPRINDEX_TRAIN_FRACTION", default_value_t = DEFAULT_TRAIN_FRACTION)]
    train_fraction: f64,
}

/// Arguments for the scan subcommand.
#[derive(clap::Args)]
struct ScanArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the list subcommand.
#[derive(clap::Args)]
struct ListArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Which subset to list ('train' or 'val').
    #[arg(long, default_value = "train")]
    subset: String,
}

/// Run the lprindex CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), LprIndexError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Scan(args)) => run_scan(args),
        Some(Commands::List(args)) => run_list(args),
        None => {
            println!("lprindex {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Dataset indexer for licence-plate detection annotations.");
            println!();
            println!("Run 'lprindex --help' for usage information.");
            Ok(())
        }
    }
}

fn open_catalog(args: &DatasetArgs) -> Result<Catalog, LprIndexError> {
    let opts = ScanOptions::default().with_limit(args.limit);
    Catalog::open(&args.root, &opts)
}

/// Execute the scan subcommand.
fn run_scan(args: ScanArgs) -> Result<(), LprIndexError> {
    let catalog = open_catalog(&args.dataset)?;
    let split = catalog.split_train_val(args.dataset.train_fraction)?;
    let report = catalog.report();

    match args.output.as_str() {
        "json" => {
            let value = serde_json::json!({
                "root": catalog.root().display().to_string(),
                "samples": catalog.len(),
                "train": split.train.len(),
                "val": split.val.len(),
                "report": report,
            });
            let text = serde_json::to_string_pretty(&value)
                .map_err(LprIndexError::ReportJson)?;
            println!("{}", text);
        }
        "text" => {
            print!("{}", report);
            println!(
                "Split: {} train, {} val",
                split.train.len(),
                split.val.len()
            );
        }
        other => {
            return Err(LprIndexError::UnsupportedFormat(format!(
                "output '{}' (supported: text, json)",
                other
            )));
        }
    }

    Ok(())
}

/// Execute the list subcommand.
fn run_list(args: ListArgs) -> Result<(), LprIndexError> {
    let subset: Subset = args.subset.parse()?;
    let catalog = open_catalog(&args.dataset)?;

    for sample in catalog.subset(subset, args.dataset.train_fraction)? {
        println!(
            "{}\t{}x{}\t{} plate(s)",
            sample.image_path().display(),
            sample.width(),
            sample.height(),
            sample.plate_polygons().count()
        );
    }

    Ok(())
}
