//! Duplicate-row removal

use crate::dataset::Dataset;
use crate::error::Result;
use std::collections::HashSet;

/// Drop rows whose canonical string form was already seen, scanning in
/// original order. Surviving rows keep their relative order; the first
/// occurrence always wins. Returns the deduplicated dataset and the number
/// of rows dropped.
pub fn remove_duplicates(data: &Dataset) -> Result<(Dataset, usize)> {
    let mut seen: HashSet<String> = HashSet::with_capacity(data.n_rows());
    let mut rows = Vec::with_capacity(data.n_rows());
    let mut removed = 0usize;

    for i in 0..data.n_rows() {
        if seen.insert(data.canonical_row(i)) {
            rows.push(data.row(i).clone());
        } else {
            removed += 1;
        }
    }

    let mut out = Dataset::with_rows(data.name().to_string(), data.attributes().to_vec(), rows)?;
    if let Some(idx) = data.class_index() {
        out.set_class_index(idx)?;
    }
    Ok((out, removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Attribute, Cell};

    #[test]
    fn test_first_occurrence_wins() {
        let attrs = vec![Attribute::numeric("a"), Attribute::numeric("b")];
        let rows = vec![
            vec![Cell::Numeric(1.0), Cell::Numeric(2.0)],
            vec![Cell::Numeric(3.0), Cell::Numeric(4.0)],
            vec![Cell::Numeric(1.0), Cell::Numeric(2.0)],
            vec![Cell::Numeric(5.0), Cell::Numeric(6.0)],
            vec![Cell::Numeric(3.0), Cell::Numeric(4.0)],
        ];
        let data = Dataset::with_rows("t", attrs, rows).unwrap();

        let (out, removed) = remove_duplicates(&data).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(out.n_rows(), 3);
        assert_eq!(out.canonical_row(0), "1,2");
        assert_eq!(out.canonical_row(1), "3,4");
        assert_eq!(out.canonical_row(2), "5,6");
    }

    #[test]
    fn test_integral_float_matches_integer_form() {
        // 2.0 and 2 canonicalize identically
        let attrs = vec![Attribute::numeric("a")];
        let rows = vec![vec![Cell::Numeric(2.0)], vec![Cell::Numeric(2.0)]];
        let data = Dataset::with_rows("t", attrs, rows).unwrap();

        let (out, removed) = remove_duplicates(&data).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(out.n_rows(), 1);
    }

    #[test]
    fn test_missing_cells_compare_equal() {
        let attrs = vec![Attribute::numeric("a")];
        let rows = vec![vec![Cell::Missing], vec![Cell::Missing]];
        let data = Dataset::with_rows("t", attrs, rows).unwrap();

        let (out, removed) = remove_duplicates(&data).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(out.n_rows(), 1);
    }

    #[test]
    fn test_no_duplicates_is_identity() {
        let attrs = vec![Attribute::numeric("a")];
        let rows = vec![vec![Cell::Numeric(1.0)], vec![Cell::Numeric(2.0)]];
        let data = Dataset::with_rows("t", attrs, rows).unwrap();

        let (out, removed) = remove_duplicates(&data).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(out.rows(), data.rows());
    }
}
