//! Nominal-to-indicator encoding

use crate::dataset::{Attribute, Cell, Dataset, Row};
use crate::error::Result;

/// Replace every nominal attribute except the class with one numeric
/// indicator attribute per category, in declared category order, named
/// `<attribute>=<label>`.
///
/// The convention is keep-all: a k-category attribute becomes k indicator
/// columns, including k = 2, and no reference category is dropped. Attribute
/// order is preserved; indicators occupy their source attribute's position.
/// A missing source cell (possible only when encoding runs outside the
/// pipeline) yields missing indicators.
pub fn encode_nominal(data: &Dataset) -> Result<Dataset> {
    let class_idx = data.class_index();

    let mut attributes: Vec<Attribute> = Vec::new();
    let mut new_class_index = None;
    for (col, attr) in data.attributes().iter().enumerate() {
        if Some(col) == class_idx {
            new_class_index = Some(attributes.len());
            attributes.push(attr.clone());
            continue;
        }
        match attr.labels() {
            None => attributes.push(attr.clone()),
            Some(labels) => {
                for label in labels {
                    attributes.push(Attribute::numeric(format!("{}={}", attr.name, label)));
                }
            }
        }
    }

    let rows: Vec<Row> = data
        .rows()
        .iter()
        .map(|row| {
            let mut out = Vec::with_capacity(attributes.len());
            for (col, cell) in row.iter().enumerate() {
                if Some(col) == class_idx {
                    out.push(cell.clone());
                    continue;
                }
                match data.attribute(col).labels() {
                    None => out.push(cell.clone()),
                    Some(labels) => match cell {
                        Cell::Nominal(code) => {
                            for k in 0..labels.len() {
                                out.push(Cell::Numeric(if k == *code as usize {
                                    1.0
                                } else {
                                    0.0
                                }));
                            }
                        }
                        _ => {
                            for _ in 0..labels.len() {
                                out.push(Cell::Missing);
                            }
                        }
                    },
                }
            }
            out
        })
        .collect();

    let mut out = Dataset::with_rows(data.name().to_string(), attributes, rows)?;
    if let Some(idx) = new_class_index {
        out.set_class_index(idx)?;
    }
    Ok(out)
}
