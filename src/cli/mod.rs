//! medml CLI
//!
//! Command-line interface for dataset cleaning, classifier evaluation, and
//! report comparison. This is the orchestration boundary: the only layer
//! that logs, creates directories, and decides the process exit code. Core
//! errors surface here as anyhow context.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::balance::{balance, BalanceMode};
use crate::classifier::ClassifierKind;
use crate::cleaning::DataCleaner;
use crate::compare::ComparisonReport;
use crate::dataset::arff::{read_arff_path, write_arff_path};
use crate::dataset::delimited::{DelimitedReader, DelimitedWriter};
use crate::evaluation::cross_validation::cross_validate;
use crate::evaluation::report::{parse_class_metrics, parse_overall_metrics, write_report};

#[derive(Parser)]
#[command(name = "medml")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Medical tabular dataset preparation and classifier benchmarking")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a raw delimited dataset and persist it in both formats
    Clean {
        /// Input delimited file
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory for the cleaned dataset
        #[arg(short, long, default_value = "out")]
        output: PathBuf,

        /// Token recognized as the missing marker
        #[arg(long, default_value = "?")]
        missing_token: String,
    },

    /// Cross-validate one classifier on a cleaned dataset
    Evaluate {
        /// Cleaned dataset in the typed tabular format
        #[arg(short, long)]
        data: PathBuf,

        /// Classifier kind (decision-tree, random-forest, majority)
        #[arg(short, long, default_value = "decision-tree")]
        model: String,

        /// Number of cross-validation folds
        #[arg(long, default_value = "10")]
        folds: usize,

        /// Cross-validation shuffle seed
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Class balancing mode (off, uniform)
        #[arg(long, default_value = "off")]
        balance: String,

        /// Resampling seed for uniform balancing
        #[arg(long, default_value = "1")]
        balance_seed: u64,

        /// Output report file (sibling .json is written next to it)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Compare two previously written evaluation reports
    Compare {
        /// First report file
        #[arg(long)]
        report_a: PathBuf,

        /// Second report file
        #[arg(long)]
        report_b: PathBuf,

        /// Name of the first model
        #[arg(long, default_value = "Decision Tree")]
        name_a: String,

        /// Name of the second model
        #[arg(long, default_value = "Random Forest")]
        name_b: String,

        /// Optional file for the comparison text
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn cmd_clean(data: &Path, output: &Path, missing_token: &str) -> anyhow::Result<()> {
    let raw = DelimitedReader::new()
        .with_missing_token(missing_token)
        .read_path(data)
        .with_context(|| format!("failed to read {}", data.display()))?;
    info!(
        rows = raw.n_rows(),
        attributes = raw.n_attributes(),
        "dataset loaded"
    );

    let mut raw = raw;
    raw.set_class_last()?;
    let raw = raw.nominalize_class()?;

    let (clean, summary) = DataCleaner::new().clean(&raw)?;
    info!(
        instances_before = summary.instances_before,
        instances_after = summary.instances_after,
        missing_imputed = summary.total_missing_before,
        indicators_added = summary.indicators_added,
        constants_removed = summary.constants_removed.len(),
        duplicates_removed = summary.duplicates_removed,
        "cleaning finished"
    );

    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let stem = data
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");
    let csv_path = output.join(format!("{}_cleaned.csv", stem));
    let arff_path = output.join(format!("{}_cleaned.arff", stem));

    DelimitedWriter::new().write_path(&clean, &csv_path)?;
    write_arff_path(&clean, &arff_path)?;
    info!(csv = %csv_path.display(), arff = %arff_path.display(), "cleaned dataset written");
    Ok(())
}

pub fn cmd_evaluate(
    data: &Path,
    model: &str,
    folds: usize,
    seed: u64,
    balance_mode: &str,
    balance_seed: u64,
    output: &Path,
) -> anyhow::Result<()> {
    let kind: ClassifierKind = model.parse()?;
    let mode: BalanceMode = balance_mode.parse()?;

    let mut dataset = read_arff_path(data)
        .with_context(|| format!("failed to read {}", data.display()))?;
    if dataset.class_index().is_none() {
        dataset.set_class_last()?;
    }

    let dataset = balance(&dataset, mode, balance_seed)?;
    if mode == BalanceMode::Uniform {
        info!(seed = balance_seed, "class distribution balanced");
    }

    info!(model = kind.name(), folds, seed, "cross-validation started");
    let result = cross_validate(|| kind.build(seed), &dataset, folds, seed)?;
    info!(
        accuracy = %format!("{:.2}%", result.percent_correct),
        kappa = %format!("{:.4}", result.kappa),
        elapsed_ms = result.elapsed_ms,
        "cross-validation finished"
    );

    if let Some(dir) = output.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let json_path = write_report(&result, output)?;
    info!(report = %output.display(), record = %json_path.display(), "report written");
    Ok(())
}

pub fn cmd_compare(
    report_a: &Path,
    report_b: &Path,
    name_a: &str,
    name_b: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let text_a = std::fs::read_to_string(report_a)
        .with_context(|| format!("failed to read {}", report_a.display()))?;
    let text_b = std::fs::read_to_string(report_b)
        .with_context(|| format!("failed to read {}", report_b.display()))?;

    let comparison = ComparisonReport::new(
        name_a,
        parse_overall_metrics(&text_a)?,
        parse_class_metrics(&text_a)?,
        name_b,
        parse_overall_metrics(&text_b)?,
        parse_class_metrics(&text_b)?,
    );

    let rendered = comparison.render();
    println!("{}", rendered);
    if let Some(path) = output {
        std::fs::write(path, &rendered)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(comparison = %path.display(), "comparison written");
    }
    Ok(())
}
