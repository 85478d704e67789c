//! Missing-value imputation

use crate::dataset::{Cell, Dataset};
use crate::error::Result;

/// Replace missing cells column by column: numeric attributes take the mean
/// over non-missing values, nominal attributes take the mode (ties resolve
/// to the lowest category code). Attributes without missing cells are left
/// untouched, including their cell representations.
pub fn impute_missing(data: &Dataset) -> Result<Dataset> {
    let mut replacements: Vec<Option<Cell>> = Vec::with_capacity(data.n_attributes());
    for col in 0..data.n_attributes() {
        if data.missing_count(col) == 0 {
            replacements.push(None);
            continue;
        }
        let cell = if data.attribute(col).is_numeric() {
            Cell::Numeric(data.mean(col)?)
        } else {
            Cell::Nominal(data.mode(col)?)
        };
        replacements.push(Some(cell));
    }

    let rows = data
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| match (cell, &replacements[col]) {
                    (Cell::Missing, Some(replacement)) => replacement.clone(),
                    _ => cell.clone(),
                })
                .collect()
        })
        .collect();

    let mut out = Dataset::with_rows(data.name().to_string(), data.attributes().to_vec(), rows)?;
    if let Some(idx) = data.class_index() {
        out.set_class_index(idx)?;
    }
    Ok(out)
}
