//! Textual metric reports and their round-trip parsing
//!
//! Reports are line-oriented text with stable label prefixes and fixed
//! decimal places; downstream comparison reads previously written reports
//! back, so the labels and formatting here are an interface, not cosmetics.
//! The parsers are deliberately lenient about absent lines (a partial,
//! human-edited report is a legitimate input) and strict about malformed
//! numeric tokens. The structured result is also persisted as JSON beside
//! the text report; the text parser remains the import path for
//! pre-existing reports.

use super::EvaluationResult;
use crate::error::{MedmlError, Result};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Overall metric mapping parsed from a report
pub type OverallMetrics = BTreeMap<String, f64>;

/// Per-class metric mappings parsed from a report, keyed by class label
pub type PerClassMetrics = BTreeMap<String, BTreeMap<String, f64>>;

/// Render the full textual report for an evaluation result
pub fn render_report(result: &EvaluationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== Performance Metrics for {} ===\n",
        result.model_name
    ));
    out.push_str(&format!(
        "Generated: {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Instances: {}\n", result.instances));
    out.push_str(&format!("Accuracy: {:.2}%\n", result.percent_correct));
    out.push_str(&format!("Error Rate: {:.2}%\n", result.percent_incorrect));
    out.push_str(&format!("Kappa Statistic: {:.4}\n", result.kappa));
    out.push_str(&format!(
        "Mean Absolute Error: {:.4}\n",
        result.mean_absolute_error
    ));
    out.push_str(&format!(
        "Root Mean Squared Error: {:.4}\n",
        result.root_mean_squared_error
    ));
    out.push_str(&format!("Cross-validation time: {} ms\n", result.elapsed_ms));
    out.push('\n');
    out.push_str("Class-specific Metrics:\n");
    for (label, metrics) in result.class_labels.iter().zip(&result.per_class) {
        out.push('\n');
        out.push_str(&format!("Class: {}\n", label));
        out.push_str(&format!("  Precision: {:.4}\n", metrics.precision));
        out.push_str(&format!("  Recall: {:.4}\n", metrics.recall));
        out.push_str(&format!("  F-Measure: {:.4}\n", metrics.f_measure));
        out.push_str(&format!("  ROC Area: {:.4}\n", metrics.roc_area));
    }
    out
}

/// Scan a report for the overall metric lines.
///
/// Recognized keys: `accuracy`, `kappa`, `mae`, `rmse`, `cv_time`,
/// `build_time`. Absent lines are simply omitted from the mapping; a
/// malformed numeric token is a hard error.
pub fn parse_overall_metrics(text: &str) -> Result<OverallMetrics> {
    let mut metrics = OverallMetrics::new();
    for line in text.lines() {
        if line.contains("Accuracy:") && line.contains('%') {
            metrics.insert("accuracy".into(), parse_value(line, &['%'])?);
        } else if line.contains("Kappa Statistic:") {
            metrics.insert("kappa".into(), parse_value(line, &[])?);
        } else if line.contains("Mean Absolute Error:") {
            metrics.insert("mae".into(), parse_value(line, &[])?);
        } else if line.contains("Root Mean Squared Error:") {
            metrics.insert("rmse".into(), parse_value(line, &[])?);
        } else if line.contains("Cross-validation time:") {
            metrics.insert("cv_time".into(), parse_time(line)?);
        } else if line.contains("Build time:") {
            metrics.insert("build_time".into(), parse_time(line)?);
        }
    }
    Ok(metrics)
}

/// Scan a report for `Class:` blocks and their metric lines.
///
/// Recognized keys per class: `precision`, `recall`, `f_measure`,
/// `roc_area`. Classes may appear in any order; the result is keyed by
/// class label so two independently written reports reconcile by label.
pub fn parse_class_metrics(text: &str) -> Result<PerClassMetrics> {
    let mut classes = PerClassMetrics::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("Class:") {
            let label = value_text(trimmed).trim().to_string();
            classes.entry(label.clone()).or_default();
            current = Some(label);
            continue;
        }
        let Some(class) = &current else { continue };
        let key = if trimmed.contains("Precision:") {
            "precision"
        } else if trimmed.contains("Recall:") {
            "recall"
        } else if trimmed.contains("F-Measure:") {
            "f_measure"
        } else if trimmed.contains("ROC Area:") {
            "roc_area"
        } else {
            continue;
        };
        let value = parse_value(trimmed, &[])?;
        classes
            .get_mut(class)
            .expect("class entry inserted above")
            .insert(key.into(), value);
    }
    Ok(classes)
}

/// Write the text report plus a sibling JSON record carrying the structured
/// result. Returns the JSON path.
pub fn write_report(result: &EvaluationResult, text_path: impl AsRef<Path>) -> Result<PathBuf> {
    let text_path = text_path.as_ref();
    let mut file = std::fs::File::create(text_path)?;
    file.write_all(render_report(result).as_bytes())?;

    let json_path = text_path.with_extension("json");
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(&json_path, json)?;
    Ok(json_path)
}

/// Load a structured evaluation record written by [`write_report`]
pub fn load_record(path: impl AsRef<Path>) -> Result<EvaluationResult> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn value_text(line: &str) -> &str {
    match line.split_once(':') {
        Some((_, rest)) => rest,
        None => "",
    }
}

fn parse_value(line: &str, strip: &[char]) -> Result<f64> {
    let mut token = value_text(line).trim().to_string();
    for c in strip {
        token = token.replace(*c, "");
    }
    token
        .trim()
        .parse()
        .map_err(|_| MedmlError::ParseError(format!("bad numeric token in line: {}", line.trim())))
}

fn parse_time(line: &str) -> Result<f64> {
    let token = value_text(line).trim().trim_end_matches("ms");
    token
        .trim()
        .parse()
        .map_err(|_| MedmlError::ParseError(format!("bad numeric token in line: {}", line.trim())))
}
