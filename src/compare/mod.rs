//! Two-model comparison reports
//!
//! Combines two named metric mappings into a ranked comparison: a
//! side-by-side metric table, class-specific comparison over the union of
//! class labels, and a winner per criterion under fixed directionality
//! (higher accuracy/kappa/precision/recall/F-measure/ROC wins; lower error
//! and lower evaluation time win). Pure over its inputs; winners are
//! computed on demand, never stored.

use crate::evaluation::report::{OverallMetrics, PerClassMetrics};
use crate::evaluation::EvaluationResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which side wins a criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Left,
    Right,
    Tie,
}

impl Winner {
    /// The same outcome seen from the other side
    pub fn flipped(self) -> Winner {
        match self {
            Winner::Left => Winner::Right,
            Winner::Right => Winner::Left,
            Winner::Tie => Winner::Tie,
        }
    }
}

/// Metrics where a lower value is the better one
const LOWER_IS_BETTER: &[&str] = &["mae", "rmse", "error_rate", "cv_time", "build_time"];

/// A pairing of two models' parsed metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub name_a: String,
    pub name_b: String,
    pub overall_a: OverallMetrics,
    pub overall_b: OverallMetrics,
    pub class_a: PerClassMetrics,
    pub class_b: PerClassMetrics,
}

impl ComparisonReport {
    pub fn new(
        name_a: impl Into<String>,
        overall_a: OverallMetrics,
        class_a: PerClassMetrics,
        name_b: impl Into<String>,
        overall_b: OverallMetrics,
        class_b: PerClassMetrics,
    ) -> Self {
        Self {
            name_a: name_a.into(),
            name_b: name_b.into(),
            overall_a,
            overall_b,
            class_a,
            class_b,
        }
    }

    /// Build a comparison straight from two structured evaluation results
    pub fn from_results(a: &EvaluationResult, b: &EvaluationResult) -> Self {
        Self::new(
            a.model_name.clone(),
            overall_of(a),
            classes_of(a),
            b.model_name.clone(),
            overall_of(b),
            classes_of(b),
        )
    }

    /// Value of an overall metric on one side; absent metrics read as 0
    fn value(&self, metric: &str, left: bool) -> f64 {
        let map = if left { &self.overall_a } else { &self.overall_b };
        map.get(metric).copied().unwrap_or(0.0)
    }

    /// Which side wins the given overall metric
    pub fn winner(&self, metric: &str) -> Winner {
        let a = self.value(metric, true);
        let b = self.value(metric, false);
        let (a, b) = if LOWER_IS_BETTER.contains(&metric) {
            (b, a)
        } else {
            (a, b)
        };
        if a > b {
            Winner::Left
        } else if b > a {
            Winner::Right
        } else {
            Winner::Tie
        }
    }

    /// Winner per overall criterion, in stable order
    pub fn winners(&self) -> Vec<(String, Winner)> {
        let keys: BTreeSet<&String> = self.overall_a.keys().chain(self.overall_b.keys()).collect();
        keys.into_iter()
            .map(|k| (k.clone(), self.winner(k)))
            .collect()
    }

    fn winner_name(&self, metric: &str) -> &str {
        match self.winner(metric) {
            Winner::Left => &self.name_a,
            Winner::Right => &self.name_b,
            Winner::Tie => "Tie",
        }
    }

    /// Render the ranked textual comparison
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("=== MODEL COMPARISON ===\n\n");
        out.push_str(&format!(
            "{:<25} | {:<15} | {:<15}\n",
            "Metric", self.name_a, self.name_b
        ));
        out.push_str(&format!("{}\n", "-".repeat(61)));

        let rows: [(&str, &str, usize); 5] = [
            ("Accuracy (%)", "accuracy", 2),
            ("Kappa Statistic", "kappa", 4),
            ("Mean Absolute Error", "mae", 4),
            ("Root Mean Squared Error", "rmse", 4),
            ("CV Time (ms)", "cv_time", 0),
        ];
        for (title, metric, decimals) in rows {
            out.push_str(&format!(
                "{:<25} | {:<15.prec$} | {:<15.prec$}\n",
                title,
                self.value(metric, true),
                self.value(metric, false),
                prec = decimals
            ));
        }

        out.push_str("\n=== Class-specific Comparison ===\n");
        let labels: BTreeSet<&String> = self.class_a.keys().chain(self.class_b.keys()).collect();
        for label in labels {
            out.push_str(&format!("\nClass: {}\n", label));
            for (title, key) in [
                ("Precision", "precision"),
                ("Recall", "recall"),
                ("F-Measure", "f_measure"),
                ("ROC Area", "roc_area"),
            ] {
                let a = self
                    .class_a
                    .get(label)
                    .and_then(|m| m.get(key))
                    .copied()
                    .unwrap_or(0.0);
                let b = self
                    .class_b
                    .get(label)
                    .and_then(|m| m.get(key))
                    .copied()
                    .unwrap_or(0.0);
                out.push_str(&format!(
                    "  {:<12} | {}: {:.4} | {}: {:.4}\n",
                    title, self.name_a, a, self.name_b, b
                ));
            }
        }

        out.push_str("\n=== WINNER ANALYSIS ===\n\n");
        out.push_str(&format!(
            "Best Accuracy: {} ({:.2}%)\n",
            self.winner_name("accuracy"),
            self.best_value("accuracy")
        ));
        out.push_str(&format!(
            "Best Kappa: {} ({:.4})\n",
            self.winner_name("kappa"),
            self.best_value("kappa")
        ));
        out.push_str(&format!(
            "Fastest Evaluation: {} ({:.0} ms)\n",
            self.winner_name("cv_time"),
            self.best_value("cv_time")
        ));

        out.push_str("\n=== CONCLUSION ===\n");
        out.push_str(&format!(
            "Better performing model: {}\n",
            self.winner_name("accuracy")
        ));
        out.push_str(&format!(
            "Accuracy improvement: {:.2}%\n",
            (self.value("accuracy", true) - self.value("accuracy", false)).abs()
        ));
        out
    }

    fn best_value(&self, metric: &str) -> f64 {
        match self.winner(metric) {
            Winner::Right => self.value(metric, false),
            _ => self.value(metric, true),
        }
    }
}

fn overall_of(result: &EvaluationResult) -> OverallMetrics {
    let mut map = OverallMetrics::new();
    map.insert("accuracy".into(), result.percent_correct);
    map.insert("error_rate".into(), result.percent_incorrect);
    map.insert("kappa".into(), result.kappa);
    map.insert("mae".into(), result.mean_absolute_error);
    map.insert("rmse".into(), result.root_mean_squared_error);
    map.insert("cv_time".into(), result.elapsed_ms as f64);
    map
}

fn classes_of(result: &EvaluationResult) -> PerClassMetrics {
    let mut classes = PerClassMetrics::new();
    for (label, metrics) in result.class_labels.iter().zip(&result.per_class) {
        let mut map = std::collections::BTreeMap::new();
        map.insert("precision".into(), metrics.precision);
        map.insert("recall".into(), metrics.recall);
        map.insert("f_measure".into(), metrics.f_measure);
        map.insert("roc_area".into(), metrics.roc_area);
        classes.insert(label.clone(), map);
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(pairs: &[(&str, f64)]) -> OverallMetrics {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn sample() -> ComparisonReport {
        ComparisonReport::new(
            "Tree",
            metrics(&[
                ("accuracy", 82.35),
                ("kappa", 0.54),
                ("mae", 0.23),
                ("rmse", 0.35),
                ("cv_time", 120.0),
            ]),
            PerClassMetrics::new(),
            "Forest",
            metrics(&[
                ("accuracy", 85.29),
                ("kappa", 0.61),
                ("mae", 0.20),
                ("rmse", 0.33),
                ("cv_time", 950.0),
            ]),
            PerClassMetrics::new(),
        )
    }

    #[test]
    fn test_directionality() {
        let report = sample();
        assert_eq!(report.winner("accuracy"), Winner::Right);
        assert_eq!(report.winner("kappa"), Winner::Right);
        // Lower error and lower time win
        assert_eq!(report.winner("mae"), Winner::Right);
        assert_eq!(report.winner("cv_time"), Winner::Left);
    }

    #[test]
    fn test_symmetry() {
        let report = sample();
        let swapped = ComparisonReport::new(
            report.name_b.clone(),
            report.overall_b.clone(),
            report.class_b.clone(),
            report.name_a.clone(),
            report.overall_a.clone(),
            report.class_a.clone(),
        );
        for (metric, winner) in report.winners() {
            assert_eq!(swapped.winner(&metric), winner.flipped(), "{}", metric);
        }
        // Same named model wins either way
        assert_eq!(report.winner_name("accuracy"), "Forest");
        assert_eq!(swapped.winner_name("accuracy"), "Forest");
    }

    #[test]
    fn test_tie() {
        let report = ComparisonReport::new(
            "A",
            metrics(&[("kappa", 0.5)]),
            PerClassMetrics::new(),
            "B",
            metrics(&[("kappa", 0.5)]),
            PerClassMetrics::new(),
        );
        assert_eq!(report.winner("kappa"), Winner::Tie);
    }

    #[test]
    fn test_missing_metric_defaults_to_zero() {
        let report = ComparisonReport::new(
            "A",
            metrics(&[("accuracy", 70.0)]),
            PerClassMetrics::new(),
            "B",
            OverallMetrics::new(),
            PerClassMetrics::new(),
        );
        assert_eq!(report.winner("accuracy"), Winner::Left);
        assert_eq!(report.winner("kappa"), Winner::Tie);
    }

    #[test]
    fn test_render_contains_sections() {
        let text = sample().render();
        assert!(text.contains("=== MODEL COMPARISON ==="));
        assert!(text.contains("=== WINNER ANALYSIS ==="));
        assert!(text.contains("Best Accuracy: Forest (85.29%)"));
        assert!(text.contains("Fastest Evaluation: Tree (120 ms)"));
        assert!(text.contains("Accuracy improvement: 2.94%"));
    }

    #[test]
    fn test_inputs_not_mutated() {
        let report = sample();
        let before = report.overall_a.clone();
        let _ = report.render();
        let _ = report.winners();
        assert_eq!(report.overall_a, before);
    }
}
