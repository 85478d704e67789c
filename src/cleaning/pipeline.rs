//! Cleaning pipeline orchestration

use super::{encode_nominal, impute_missing, remove_duplicates, CleaningSummary};
use crate::dataset::{Attribute, Dataset};
use crate::error::{MedmlError, Result};

/// Runs the ordered cleaning stages over a dataset.
///
/// The input is never mutated; every stage builds a fresh dataset. Cleaning
/// is a fixed point: running it again on its own output changes nothing.
pub struct DataCleaner;

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl DataCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Apply all cleaning stages in order, halting on the first error
    pub fn clean(&self, data: &Dataset) -> Result<(Dataset, CleaningSummary)> {
        if data.is_empty() {
            return Err(MedmlError::DataError(
                "cannot clean an empty dataset".into(),
            ));
        }

        let mut summary = CleaningSummary {
            instances_before: data.n_rows(),
            ..CleaningSummary::default()
        };

        let renamed = self.rename_attributes(data, &mut summary)?;

        for (col, attr) in renamed.attributes().iter().enumerate() {
            let missing = renamed.missing_count(col);
            summary.missing_before.insert(attr.name.clone(), missing);
            summary.total_missing_before += missing;
        }
        let imputed = impute_missing(&renamed)?;
        summary.total_missing_after = imputed.total_missing();

        let encoded = encode_nominal(&imputed)?;
        summary.indicators_added = imputed
            .attributes()
            .iter()
            .enumerate()
            .filter(|(col, attr)| Some(*col) != imputed.class_index() && attr.is_nominal())
            .map(|(_, attr)| attr.labels().map(|l| l.len()).unwrap_or(0))
            .sum();

        let filtered = self.remove_constant_attributes(&encoded, &mut summary)?;

        let (deduped, removed) = remove_duplicates(&filtered)?;
        summary.duplicates_removed = removed;
        summary.instances_after = deduped.n_rows();

        Ok((deduped, summary))
    }

    /// Strip one matching pair of leading/trailing quote characters from any
    /// attribute name that has them. Order and count are unchanged.
    fn rename_attributes(
        &self,
        data: &Dataset,
        summary: &mut CleaningSummary,
    ) -> Result<Dataset> {
        let attributes: Vec<Attribute> = data
            .attributes()
            .iter()
            .map(|attr| {
                let name = &attr.name;
                let stripped = if name.len() >= 2
                    && ((name.starts_with('\'') && name.ends_with('\''))
                        || (name.starts_with('"') && name.ends_with('"')))
                {
                    name[1..name.len() - 1].to_string()
                } else {
                    name.clone()
                };
                if stripped != *name {
                    summary.renamed_attributes.push(stripped.clone());
                }
                Attribute {
                    name: stripped,
                    kind: attr.kind.clone(),
                }
            })
            .collect();

        let mut out =
            Dataset::with_rows(data.name().to_string(), attributes, data.rows().to_vec())?;
        if let Some(idx) = data.class_index() {
            out.set_class_index(idx)?;
        }
        Ok(out)
    }

    /// Drop every numeric non-class attribute with zero variance. Runs after
    /// encoding, which can introduce constant indicator columns. Skipped for
    /// datasets with fewer than two rows, where every column is trivially
    /// constant.
    fn remove_constant_attributes(
        &self,
        data: &Dataset,
        summary: &mut CleaningSummary,
    ) -> Result<Dataset> {
        if data.n_rows() < 2 {
            return Ok(data.clone());
        }
        let class_idx = data.class_index();

        let mut keep: Vec<usize> = Vec::with_capacity(data.n_attributes());
        for (col, attr) in data.attributes().iter().enumerate() {
            if Some(col) != class_idx && attr.is_numeric() && data.variance(col)? == 0.0 {
                summary.constants_removed.push(attr.name.clone());
            } else {
                keep.push(col);
            }
        }
        if keep.len() == data.n_attributes() {
            return Ok(data.clone());
        }

        let attributes: Vec<Attribute> = keep
            .iter()
            .map(|&col| data.attribute(col).clone())
            .collect();
        let rows = data
            .rows()
            .iter()
            .map(|row| keep.iter().map(|&col| row[col].clone()).collect())
            .collect();

        let mut out = Dataset::with_rows(data.name().to_string(), attributes, rows)?;
        if let Some(idx) = class_idx {
            let new_idx = keep.iter().position(|&col| col == idx).ok_or_else(|| {
                MedmlError::DataError("class attribute was removed as constant".into())
            })?;
            out.set_class_index(new_idx)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;

    /// The reference scenario: 10 rows, 2 missing numeric cells, one 3-way
    /// nominal attribute, one constant column, 2 duplicate rows.
    fn messy() -> Dataset {
        let attrs = vec![
            Attribute::numeric("'age'"),
            Attribute::nominal(
                "cp",
                vec!["typical".into(), "atypical".into(), "none".into()],
            ),
            Attribute::numeric("flat"),
            Attribute::nominal("target", vec!["0".into(), "1".into()]),
        ];
        let mut rows = vec![
            vec![Cell::Numeric(63.0), Cell::Nominal(0), Cell::Numeric(1.0), Cell::Nominal(1)],
            vec![Cell::Numeric(41.0), Cell::Nominal(1), Cell::Numeric(1.0), Cell::Nominal(0)],
            vec![Cell::Missing, Cell::Nominal(2), Cell::Numeric(1.0), Cell::Nominal(1)],
            vec![Cell::Numeric(55.0), Cell::Nominal(0), Cell::Numeric(1.0), Cell::Nominal(0)],
            vec![Cell::Numeric(49.0), Cell::Nominal(1), Cell::Numeric(1.0), Cell::Nominal(1)],
            vec![Cell::Missing, Cell::Nominal(2), Cell::Numeric(1.0), Cell::Nominal(0)],
            vec![Cell::Numeric(70.0), Cell::Nominal(0), Cell::Numeric(1.0), Cell::Nominal(1)],
            vec![Cell::Numeric(38.0), Cell::Nominal(1), Cell::Numeric(1.0), Cell::Nominal(0)],
        ];
        // Two exact duplicates of existing rows
        rows.push(rows[0].clone());
        rows.push(rows[3].clone());

        let mut data = Dataset::with_rows("messy", attrs, rows).unwrap();
        data.set_class_last().unwrap();
        data
    }

    #[test]
    fn test_end_to_end_scenario() {
        let (clean, summary) = DataCleaner::new().clean(&messy()).unwrap();

        assert_eq!(clean.n_rows(), 8);
        assert_eq!(clean.total_missing(), 0);
        // age + 3 indicators + class; "flat" removed as constant
        assert_eq!(clean.n_attributes(), 5);
        assert!(clean.attributes().iter().all(|a| a.name != "flat"));
        assert_eq!(clean.attribute(1).name, "cp=typical");
        assert_eq!(clean.attribute(3).name, "cp=none");

        assert_eq!(summary.instances_before, 10);
        assert_eq!(summary.instances_after, 8);
        assert_eq!(summary.duplicates_removed, 2);
        assert_eq!(summary.constants_removed, vec!["flat".to_string()]);
        assert_eq!(summary.indicators_added, 3);
        assert_eq!(summary.total_missing_before, 2);
        assert_eq!(summary.total_missing_after, 0);
    }

    #[test]
    fn test_quote_stripping() {
        let (clean, summary) = DataCleaner::new().clean(&messy()).unwrap();
        assert_eq!(clean.attribute(0).name, "age");
        assert_eq!(summary.renamed_attributes, vec!["age".to_string()]);
    }

    #[test]
    fn test_class_survives_and_stays_last() {
        let (clean, _) = DataCleaner::new().clean(&messy()).unwrap();
        assert_eq!(clean.class_index(), Some(clean.n_attributes() - 1));
        assert_eq!(clean.class_attribute().unwrap().name, "target");
        assert!(clean.class_attribute().unwrap().is_nominal());
    }

    #[test]
    fn test_idempotence() {
        let (once, _) = DataCleaner::new().clean(&messy()).unwrap();
        let (twice, summary) = DataCleaner::new().clean(&once).unwrap();

        assert_eq!(once.attributes(), twice.attributes());
        assert_eq!(once.rows(), twice.rows());
        assert_eq!(summary.duplicates_removed, 0);
        assert_eq!(summary.total_missing_before, 0);
        assert!(summary.constants_removed.is_empty());
    }

    #[test]
    fn test_nonzero_variance_after_cleaning() {
        let (clean, _) = DataCleaner::new().clean(&messy()).unwrap();
        for (col, attr) in clean.attributes().iter().enumerate() {
            if attr.is_numeric() {
                assert!(clean.variance(col).unwrap() > 0.0, "{} is constant", attr.name);
            }
        }
    }

    #[test]
    fn test_rows_unique_after_cleaning() {
        let (clean, _) = DataCleaner::new().clean(&messy()).unwrap();
        let mut seen = std::collections::HashSet::new();
        for i in 0..clean.n_rows() {
            assert!(seen.insert(clean.canonical_row(i)));
        }
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let data = Dataset::new("empty", vec![Attribute::numeric("a")]).unwrap();
        assert!(DataCleaner::new().clean(&data).is_err());
    }

    #[test]
    fn test_single_row_keeps_columns() {
        let attrs = vec![Attribute::numeric("a"), Attribute::numeric("b")];
        let rows = vec![vec![Cell::Numeric(1.0), Cell::Numeric(2.0)]];
        let data = Dataset::with_rows("one", attrs, rows).unwrap();

        let (clean, _) = DataCleaner::new().clean(&data).unwrap();
        assert_eq!(clean.n_attributes(), 2);
        assert_eq!(clean.n_rows(), 1);
    }
}
