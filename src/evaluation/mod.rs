//! Evaluation metrics
//!
//! Provides the structured metrics model produced by the cross-validation
//! harness: overall accuracy, kappa, error terms, the confusion matrix, and
//! per-class precision/recall/F-measure/ROC area. Results are accumulated
//! instance by instance and finalized once; an [`EvaluationResult`] is
//! immutable after that.

pub mod cross_validation;
pub mod report;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Per-class evaluation metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f_measure: f64,
    pub roc_area: f64,
}

/// Aggregated evaluation outcome for one model on one dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub model_name: String,
    /// Number of evaluated instances
    pub instances: usize,
    pub percent_correct: f64,
    pub percent_incorrect: f64,
    /// Agreement beyond chance, from the confusion matrix
    pub kappa: f64,
    pub mean_absolute_error: f64,
    pub root_mean_squared_error: f64,
    /// Actual class (rows) by predicted class (columns) counts
    pub confusion: Array2<u64>,
    pub class_labels: Vec<String>,
    /// Per-class metrics, index-aligned with `class_labels`
    pub per_class: Vec<ClassMetrics>,
    /// Wall-clock time of the evaluation run in milliseconds
    pub elapsed_ms: u64,
}

impl EvaluationResult {
    /// Metrics for a class by label
    pub fn class_metrics(&self, label: &str) -> Option<&ClassMetrics> {
        self.class_labels
            .iter()
            .position(|l| l == label)
            .map(|i| &self.per_class[i])
    }
}

/// Instance-by-instance metrics accumulator.
///
/// Feed every evaluated instance with its actual class, predicted class, and
/// predicted class distribution; `finalize` computes all derived metrics
/// from the accumulated sums in one pass (micro aggregation).
pub struct MetricsAccumulator {
    n_classes: usize,
    confusion: Array2<u64>,
    correct: usize,
    total: usize,
    abs_error_sum: f64,
    sq_error_sum: f64,
    /// Per class: (predicted probability, instance is of this class)
    class_scores: Vec<Vec<(f64, bool)>>,
}

impl MetricsAccumulator {
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            confusion: Array2::zeros((n_classes, n_classes)),
            correct: 0,
            total: 0,
            abs_error_sum: 0.0,
            sq_error_sum: 0.0,
            class_scores: vec![Vec::new(); n_classes],
        }
    }

    /// Record one evaluated instance
    pub fn add_instance(&mut self, actual: u32, predicted: u32, distribution: &[f64]) {
        let actual = actual as usize;
        let predicted = predicted as usize;
        self.confusion[[actual, predicted]] += 1;
        self.total += 1;
        if actual == predicted {
            self.correct += 1;
        }

        let mut abs_sum = 0.0;
        for j in 0..self.n_classes {
            let p = distribution.get(j).copied().unwrap_or(0.0);
            let a = if j == actual { 1.0 } else { 0.0 };
            abs_sum += (p - a).abs();
            self.sq_error_sum += (p - a) * (p - a);
            self.class_scores[j].push((p, j == actual));
        }
        self.abs_error_sum += abs_sum / self.n_classes as f64;
    }

    /// Compute all derived metrics from the accumulated sums
    pub fn finalize(
        self,
        model_name: impl Into<String>,
        class_labels: Vec<String>,
        elapsed_ms: u64,
    ) -> EvaluationResult {
        let n = self.total.max(1) as f64;
        let percent_correct = 100.0 * self.correct as f64 / n;

        let per_class = (0..self.n_classes)
            .map(|c| {
                let tp = self.confusion[[c, c]] as f64;
                let predicted: f64 = (0..self.n_classes)
                    .map(|r| self.confusion[[r, c]] as f64)
                    .sum();
                let actual: f64 = (0..self.n_classes)
                    .map(|col| self.confusion[[c, col]] as f64)
                    .sum();

                let precision = if predicted > 0.0 { tp / predicted } else { 0.0 };
                let recall = if actual > 0.0 { tp / actual } else { 0.0 };
                let f_measure = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics {
                    precision,
                    recall,
                    f_measure,
                    roc_area: roc_area(&self.class_scores[c]),
                }
            })
            .collect();

        EvaluationResult {
            model_name: model_name.into(),
            instances: self.total,
            percent_correct,
            percent_incorrect: 100.0 - percent_correct,
            kappa: kappa(&self.confusion),
            mean_absolute_error: self.abs_error_sum / n,
            root_mean_squared_error: (self.sq_error_sum / (n * self.n_classes as f64)).sqrt(),
            confusion: self.confusion,
            class_labels,
            per_class,
            elapsed_ms,
        }
    }
}

/// Chance-corrected agreement from an actual-by-predicted confusion matrix
fn kappa(confusion: &Array2<u64>) -> f64 {
    let k = confusion.nrows();
    let total: u64 = confusion.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;

    let observed: f64 = (0..k).map(|c| confusion[[c, c]] as f64).sum::<f64>() / total;
    let expected: f64 = (0..k)
        .map(|c| {
            let row: f64 = (0..k).map(|j| confusion[[c, j]] as f64).sum();
            let col: f64 = (0..k).map(|j| confusion[[j, c]] as f64).sum();
            row * col
        })
        .sum::<f64>()
        / (total * total);

    if (1.0 - expected).abs() < f64::EPSILON {
        0.0
    } else {
        (observed - expected) / (1.0 - expected)
    }
}

/// Rank-based area under the ROC curve for one class, one-vs-rest.
///
/// Ties receive average ranks. Returns 0 when the class has no positive or
/// no negative instances, matching the metric-unavailable default.
fn roc_area(scores: &[(f64, bool)]) -> f64 {
    let n_pos = scores.iter().filter(|(_, pos)| *pos).count();
    let n_neg = scores.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.0;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .0
            .partial_cmp(&scores[b].0)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Average ranks over tie groups, 1-based
    let mut ranks = vec![0.0; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]].0 == scores[order[i]].0 {
            j += 1;
        }
        let rank = (i + 1 + j + 1) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }

    let rank_sum: f64 = scores
        .iter()
        .zip(&ranks)
        .filter(|((_, pos), _)| *pos)
        .map(|(_, &rank)| rank)
        .sum();

    (rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0) / (n_pos * n_neg) as f64
}
