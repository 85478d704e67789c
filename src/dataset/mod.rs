//! In-memory tabular dataset model
//!
//! Provides the schema-aware dataset used across the pipeline:
//! - Numeric and nominal attributes with stable category order
//! - Rows of typed cells with an explicit missing marker
//! - A designated class attribute
//! - Column statistics and canonical string forms

pub mod arff;
pub mod delimited;

use crate::error::{MedmlError, Result};
use serde::{Deserialize, Serialize};

/// Attribute value kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Continuous numeric values
    Numeric,
    /// Categorical values; label order is stable and determines integer codes
    Nominal(Vec<String>),
}

/// A named column with a fixed value kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    /// Create a numeric attribute
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    /// Create a nominal attribute with ordered category labels
    pub fn nominal(name: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal(labels),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, AttributeKind::Numeric)
    }

    pub fn is_nominal(&self) -> bool {
        matches!(self.kind, AttributeKind::Nominal(_))
    }

    /// Category labels for a nominal attribute
    pub fn labels(&self) -> Option<&[String]> {
        match &self.kind {
            AttributeKind::Nominal(labels) => Some(labels),
            AttributeKind::Numeric => None,
        }
    }
}

/// A single typed cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Explicit missing marker
    Missing,
    Numeric(f64),
    /// Code into the attribute's label list
    Nominal(u32),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

/// One record, positionally aligned with the dataset's attributes
pub type Row = Vec<Cell>;

/// Canonical text form of a numeric value.
///
/// Integral values print without a fractional part so that duplicate
/// detection and the delimited writer agree on one representation.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// An ordered schema plus ordered rows with an optional class attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    name: String,
    attributes: Vec<Attribute>,
    rows: Vec<Row>,
    class_index: Option<usize>,
}

impl Dataset {
    /// Create an empty dataset with the given schema.
    ///
    /// Attribute names must be unique.
    pub fn new(name: impl Into<String>, attributes: Vec<Attribute>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for attr in &attributes {
            if !seen.insert(attr.name.as_str()) {
                return Err(MedmlError::DataError(format!(
                    "duplicate attribute name: {}",
                    attr.name
                )));
            }
        }
        Ok(Self {
            name: name.into(),
            attributes,
            rows: Vec::new(),
            class_index: None,
        })
    }

    /// Create a dataset from a schema and rows, validating every row
    pub fn with_rows(
        name: impl Into<String>,
        attributes: Vec<Attribute>,
        rows: Vec<Row>,
    ) -> Result<Self> {
        let mut data = Self::new(name, attributes)?;
        for row in rows {
            data.push_row(row)?;
        }
        Ok(data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> &Attribute {
        &self.attributes[index]
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &Row {
        &self.rows[index]
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.attributes.is_empty()
    }

    /// Append a row after checking arity and cell kinds
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.attributes.len() {
            return Err(MedmlError::DataError(format!(
                "row has {} cells, expected {}",
                row.len(),
                self.attributes.len()
            )));
        }
        for (cell, attr) in row.iter().zip(&self.attributes) {
            match (cell, &attr.kind) {
                (Cell::Missing, _) => {}
                (Cell::Numeric(_), AttributeKind::Numeric) => {}
                (Cell::Nominal(code), AttributeKind::Nominal(labels)) => {
                    if *code as usize >= labels.len() {
                        return Err(MedmlError::DataError(format!(
                            "nominal code {} out of range for attribute {}",
                            code, attr.name
                        )));
                    }
                }
                _ => {
                    return Err(MedmlError::DataError(format!(
                        "cell kind does not match attribute {}",
                        attr.name
                    )));
                }
            }
        }
        self.rows.push(row);
        Ok(())
    }

    /// Index of the designated class attribute, if any
    pub fn class_index(&self) -> Option<usize> {
        self.class_index
    }

    /// Designate an attribute as the class
    pub fn set_class_index(&mut self, index: usize) -> Result<()> {
        if index >= self.attributes.len() {
            return Err(MedmlError::DataError(format!(
                "class index {} out of range ({} attributes)",
                index,
                self.attributes.len()
            )));
        }
        self.class_index = Some(index);
        Ok(())
    }

    /// Designate the last attribute as the class
    pub fn set_class_last(&mut self) -> Result<()> {
        if self.attributes.is_empty() {
            return Err(MedmlError::DataError("dataset has no attributes".into()));
        }
        self.class_index = Some(self.attributes.len() - 1);
        Ok(())
    }

    /// The class attribute
    pub fn class_attribute(&self) -> Result<&Attribute> {
        let idx = self
            .class_index
            .ok_or_else(|| MedmlError::DataError("class attribute is not set".into()))?;
        Ok(&self.attributes[idx])
    }

    /// Class category labels; the class must be set and nominal
    pub fn class_labels(&self) -> Result<&[String]> {
        self.class_attribute()?.labels().ok_or_else(|| {
            MedmlError::DataError("class attribute is not nominal".into())
        })
    }

    /// Convert a numeric class attribute to nominal.
    ///
    /// Distinct canonical values become the categories, in ascending numeric
    /// order. A nominal class is returned unchanged; missing class cells stay
    /// missing.
    pub fn nominalize_class(&self) -> Result<Dataset> {
        let idx = self
            .class_index
            .ok_or_else(|| MedmlError::DataError("class attribute is not set".into()))?;
        if self.attributes[idx].is_nominal() {
            return Ok(self.clone());
        }

        let mut values: Vec<f64> = Vec::new();
        for row in &self.rows {
            if let Cell::Numeric(v) = row[idx] {
                if !values.iter().any(|x| *x == v) {
                    values.push(v);
                }
            }
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let labels: Vec<String> = values.iter().map(|v| format_number(*v)).collect();

        let mut attributes = self.attributes.clone();
        attributes[idx] = Attribute::nominal(attributes[idx].name.clone(), labels);

        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|row| {
                let mut out = row.clone();
                if let Cell::Numeric(v) = row[idx] {
                    let code = values.iter().position(|x| *x == v).unwrap_or(0) as u32;
                    out[idx] = Cell::Nominal(code);
                }
                out
            })
            .collect();

        let mut data = Dataset::with_rows(self.name.clone(), attributes, rows)?;
        data.class_index = Some(idx);
        Ok(data)
    }

    /// Mean of a numeric column over non-missing cells (0 if none)
    pub fn mean(&self, col: usize) -> Result<f64> {
        if !self.attributes[col].is_numeric() {
            return Err(MedmlError::DataError(format!(
                "attribute {} is not numeric",
                self.attributes[col].name
            )));
        }
        let mut sum = 0.0;
        let mut count = 0usize;
        for row in &self.rows {
            if let Cell::Numeric(v) = row[col] {
                sum += v;
                count += 1;
            }
        }
        Ok(if count > 0 { sum / count as f64 } else { 0.0 })
    }

    /// Sample variance of a numeric column over non-missing cells (0 if < 2)
    pub fn variance(&self, col: usize) -> Result<f64> {
        let mean = self.mean(col)?;
        let mut sq = 0.0;
        let mut count = 0usize;
        for row in &self.rows {
            if let Cell::Numeric(v) = row[col] {
                sq += (v - mean) * (v - mean);
                count += 1;
            }
        }
        Ok(if count < 2 { 0.0 } else { sq / (count - 1) as f64 })
    }

    /// Most frequent category code of a nominal column over non-missing
    /// cells; ties resolve to the lowest code.
    pub fn mode(&self, col: usize) -> Result<u32> {
        let labels = self.attributes[col].labels().ok_or_else(|| {
            MedmlError::DataError(format!(
                "attribute {} is not nominal",
                self.attributes[col].name
            ))
        })?;
        if labels.is_empty() {
            return Err(MedmlError::DataError(format!(
                "attribute {} has no categories",
                self.attributes[col].name
            )));
        }
        let mut counts = vec![0usize; labels.len()];
        for row in &self.rows {
            if let Cell::Nominal(code) = row[col] {
                counts[code as usize] += 1;
            }
        }
        let mut best = 0usize;
        for (i, &c) in counts.iter().enumerate() {
            if c > counts[best] {
                best = i;
            }
        }
        Ok(best as u32)
    }

    /// Number of missing cells in a column
    pub fn missing_count(&self, col: usize) -> usize {
        self.rows.iter().filter(|row| row[col].is_missing()).count()
    }

    /// Total number of missing cells in the dataset
    pub fn total_missing(&self) -> usize {
        (0..self.attributes.len())
            .map(|col| self.missing_count(col))
            .sum()
    }

    /// Canonical text form of a single cell
    pub fn canonical_cell(&self, cell: &Cell, col: usize) -> String {
        match cell {
            Cell::Missing => "?".to_string(),
            Cell::Numeric(v) => format_number(*v),
            Cell::Nominal(code) => match self.attributes[col].labels() {
                Some(labels) => labels[*code as usize].clone(),
                None => format!("{}", code),
            },
        }
    }

    /// Canonical text form of a row; two rows are equal iff these match
    pub fn canonical_row(&self, index: usize) -> String {
        self.rows[index]
            .iter()
            .enumerate()
            .map(|(col, cell)| self.canonical_cell(cell, col))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Class code per row; the class must be set, nominal, and never missing
    pub fn class_codes(&self) -> Result<Vec<u32>> {
        let idx = self
            .class_index
            .ok_or_else(|| MedmlError::DataError("class attribute is not set".into()))?;
        self.class_labels()?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| match row[idx] {
                Cell::Nominal(code) => Ok(code),
                _ => Err(MedmlError::DataError(format!(
                    "row {} has a missing or non-nominal class value",
                    i
                ))),
            })
            .collect()
    }

    /// Per-class row counts, indexed by class code
    pub fn class_counts(&self) -> Result<Vec<usize>> {
        let labels = self.class_labels()?;
        let mut counts = vec![0usize; labels.len()];
        for code in self.class_codes()? {
            counts[code as usize] += 1;
        }
        Ok(counts)
    }

    /// Extract the non-class columns as feature vectors plus class codes.
    ///
    /// Requires a fully prepared dataset: a nominal class, every non-class
    /// attribute numeric, and no missing cells anywhere.
    pub fn features_and_labels(&self) -> Result<(Vec<Vec<f64>>, Vec<u32>)> {
        let class_idx = self
            .class_index
            .ok_or_else(|| MedmlError::DataError("class attribute is not set".into()))?;
        for (i, attr) in self.attributes.iter().enumerate() {
            if i != class_idx && !attr.is_numeric() {
                return Err(MedmlError::DataError(format!(
                    "attribute {} is nominal; run the cleaning pipeline first",
                    attr.name
                )));
            }
        }
        let labels = self.class_codes()?;
        let mut features = Vec::with_capacity(self.rows.len());
        for (r, row) in self.rows.iter().enumerate() {
            let mut out = Vec::with_capacity(self.attributes.len() - 1);
            for (c, cell) in row.iter().enumerate() {
                if c == class_idx {
                    continue;
                }
                match cell {
                    Cell::Numeric(v) => out.push(*v),
                    Cell::Missing => {
                        return Err(MedmlError::DataError(format!(
                            "row {} has a missing value in attribute {}",
                            r, self.attributes[c].name
                        )))
                    }
                    Cell::Nominal(_) => unreachable!("checked above"),
                }
            }
            features.push(out);
        }
        Ok((features, labels))
    }
}
