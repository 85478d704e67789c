//! Deterministic k-fold cross-validation harness

use super::{EvaluationResult, MetricsAccumulator};
use crate::classifier::TrainableClassifier;
use crate::dataset::Dataset;
use crate::error::{MedmlError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// Deterministic fold membership: shuffle row indices with the seed, then
/// partition into contiguous groups whose sizes differ by at most one (the
/// first `n % folds` groups take the extra row).
pub fn fold_indices(n_rows: usize, folds: usize, seed: u64) -> Result<Vec<Vec<usize>>> {
    if folds < 2 {
        return Err(MedmlError::ConfigError(format!(
            "fold count must be at least 2, got {}",
            folds
        )));
    }
    if folds > n_rows {
        return Err(MedmlError::ConfigError(format!(
            "fold count {} exceeds row count {}",
            folds, n_rows
        )));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let base = n_rows / folds;
    let remainder = n_rows % folds;
    let mut groups = Vec::with_capacity(folds);
    let mut start = 0;
    for i in 0..folds {
        let size = base + usize::from(i < remainder);
        groups.push(indices[start..start + size].to_vec());
        start += size;
    }
    Ok(groups)
}

/// Evaluate a classifier by k-fold cross-validation.
///
/// For each fold a fresh classifier from `factory` is trained on the
/// complement and evaluated on the fold. Correctness, confusion counts, and
/// error terms accumulate across folds; all metrics are derived once from
/// the accumulated sums rather than averaged per fold. Identical
/// `(data, folds, seed)` inputs give identical fold membership and metrics.
pub fn cross_validate<C, F>(
    factory: F,
    data: &Dataset,
    folds: usize,
    seed: u64,
) -> Result<EvaluationResult>
where
    C: TrainableClassifier,
    F: Fn() -> C,
{
    let class_labels: Vec<String> = data.class_labels()?.to_vec();
    let codes = data.class_codes()?;
    let groups = fold_indices(data.n_rows(), folds, seed)?;

    let start = Instant::now();
    let mut acc = MetricsAccumulator::new(class_labels.len());
    let mut model_name = String::new();

    for group in &groups {
        let in_fold: std::collections::HashSet<usize> = group.iter().copied().collect();
        let train_rows: Vec<usize> = (0..data.n_rows())
            .filter(|i| !in_fold.contains(i))
            .collect();

        let train = subset(data, &train_rows)?;
        let test = subset(data, group)?;

        let mut model = factory();
        model.train(&train)?;
        if model_name.is_empty() {
            model_name = model.name().to_string();
        }

        let predictions = model.predict(&test)?;
        let distributions = model.distributions(&test)?;
        for (pos, &row) in group.iter().enumerate() {
            acc.add_instance(codes[row], predictions[pos], &distributions[pos]);
        }
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    Ok(acc.finalize(model_name, class_labels, elapsed_ms))
}

fn subset(data: &Dataset, rows: &[usize]) -> Result<Dataset> {
    let selected = rows.iter().map(|&i| data.row(i).clone()).collect();
    let mut out = Dataset::with_rows(
        data.name().to_string(),
        data.attributes().to_vec(),
        selected,
    )?;
    if let Some(idx) = data.class_index() {
        out.set_class_index(idx)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MajorityModel;
    use crate::dataset::{Attribute, Cell};

    fn dataset(n: usize) -> Dataset {
        let attrs = vec![
            Attribute::numeric("x"),
            Attribute::nominal("class", vec!["a".into(), "b".into()]),
        ];
        let rows = (0..n)
            .map(|i| {
                vec![
                    Cell::Numeric(i as f64),
                    Cell::Nominal(u32::from(i % 3 == 0)),
                ]
            })
            .collect();
        let mut data = Dataset::with_rows("t", attrs, rows).unwrap();
        data.set_class_last().unwrap();
        data
    }

    #[test]
    fn test_fold_sizes_near_equal() {
        let groups = fold_indices(95, 10, 1).unwrap();
        assert_eq!(groups.len(), 10);
        for group in &groups {
            assert!(group.len() == 9 || group.len() == 10);
        }
        let total: usize = groups.iter().map(|g| g.len()).sum();
        assert_eq!(total, 95);
    }

    #[test]
    fn test_folds_cover_all_rows_once() {
        let groups = fold_indices(53, 7, 3).unwrap();
        let mut all: Vec<usize> = groups.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, (0..53).collect::<Vec<_>>());
    }

    #[test]
    fn test_fold_membership_deterministic() {
        let a = fold_indices(100, 10, 42).unwrap();
        let b = fold_indices(100, 10, 42).unwrap();
        assert_eq!(a, b);

        let c = fold_indices(100, 10, 43).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_fold_count_validation() {
        assert!(matches!(
            fold_indices(10, 1, 1),
            Err(crate::error::MedmlError::ConfigError(_))
        ));
        assert!(matches!(
            fold_indices(5, 6, 1),
            Err(crate::error::MedmlError::ConfigError(_))
        ));
    }

    #[test]
    fn test_cross_validate_deterministic() {
        let data = dataset(30);
        let a = cross_validate(MajorityModel::new, &data, 10, 1).unwrap();
        let b = cross_validate(MajorityModel::new, &data, 10, 1).unwrap();

        assert_eq!(a.percent_correct, b.percent_correct);
        assert_eq!(a.kappa, b.kappa);
        assert_eq!(a.mean_absolute_error, b.mean_absolute_error);
        assert_eq!(a.confusion, b.confusion);
    }

    #[test]
    fn test_cross_validate_counts_every_instance() {
        let data = dataset(30);
        let result = cross_validate(MajorityModel::new, &data, 5, 1).unwrap();
        assert_eq!(result.instances, 30);
        assert_eq!(result.confusion.iter().sum::<u64>(), 30);
    }

    #[test]
    fn test_majority_baseline_accuracy() {
        // 20 of 30 rows are class "a"; the baseline should land near 2/3
        let data = dataset(30);
        let result = cross_validate(MajorityModel::new, &data, 10, 1).unwrap();
        assert!(result.percent_correct > 40.0);
        assert!(result.percent_correct <= 100.0);
        assert_eq!(result.model_name, "Majority Baseline");
    }

    #[test]
    fn test_requires_class_attribute() {
        let attrs = vec![Attribute::numeric("x")];
        let rows = vec![vec![Cell::Numeric(1.0)], vec![Cell::Numeric(2.0)]];
        let data = Dataset::with_rows("t", attrs, rows).unwrap();
        assert!(cross_validate(MajorityModel::new, &data, 2, 1).is_err());
    }
}
