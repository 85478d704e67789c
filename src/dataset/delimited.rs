//! Delimited-text dataset reader and writer
//!
//! The delimited form is a header row of attribute names followed by rows of
//! cells, with one designated token recognized as the missing marker. Since
//! the format carries no type metadata, a column is read as numeric iff every
//! non-missing token parses as a number; anything else becomes nominal with
//! categories in first-seen order.

use crate::dataset::{Attribute, Cell, Dataset, Row};
use crate::error::{MedmlError, Result};
use std::io;
use std::path::Path;

/// Reader for the delimited dataset form
pub struct DelimitedReader {
    delimiter: u8,
    missing_token: String,
}

impl Default for DelimitedReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DelimitedReader {
    /// Create a reader with comma delimiter and `?` as the missing token
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            missing_token: "?".to_string(),
        }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the token recognized as the missing marker
    pub fn with_missing_token(mut self, token: impl Into<String>) -> Self {
        self.missing_token = token.into();
        self
    }

    /// Read a dataset from a file
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset")
            .to_string();
        let file = std::fs::File::open(path)?;
        self.read(file, &name)
    }

    /// Read a dataset from any reader
    pub fn read<R: io::Read>(&self, reader: R, name: &str) -> Result<Dataset> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| MedmlError::DataError(e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(MedmlError::DataError("input has no header row".into()));
        }

        let mut records: Vec<Vec<String>> = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|e| MedmlError::DataError(e.to_string()))?;
            if record.len() != headers.len() {
                return Err(MedmlError::DataError(format!(
                    "row has {} fields, expected {}",
                    record.len(),
                    headers.len()
                )));
            }
            records.push(record.iter().map(|s| s.to_string()).collect());
        }

        // A column is numeric iff every non-missing token parses.
        let mut attributes = Vec::with_capacity(headers.len());
        for (col, header) in headers.iter().enumerate() {
            let numeric = records
                .iter()
                .map(|r| r[col].as_str())
                .filter(|t| *t != self.missing_token)
                .all(|t| t.parse::<f64>().is_ok());
            if numeric {
                attributes.push(Attribute::numeric(header.clone()));
            } else {
                let mut labels: Vec<String> = Vec::new();
                for record in &records {
                    let token = &record[col];
                    if token != &self.missing_token && !labels.contains(token) {
                        labels.push(token.clone());
                    }
                }
                attributes.push(Attribute::nominal(header.clone(), labels));
            }
        }

        let mut data = Dataset::new(name, attributes)?;
        for record in &records {
            let mut row: Row = Vec::with_capacity(headers.len());
            for (col, token) in record.iter().enumerate() {
                row.push(self.parse_cell(&data, col, token)?);
            }
            data.push_row(row)?;
        }
        Ok(data)
    }

    fn parse_cell(&self, data: &Dataset, col: usize, token: &str) -> Result<Cell> {
        if token == self.missing_token {
            return Ok(Cell::Missing);
        }
        match data.attribute(col).labels() {
            None => {
                let v: f64 = token
                    .parse()
                    .map_err(|_| MedmlError::ParseError(format!("bad numeric token: {}", token)))?;
                Ok(Cell::Numeric(v))
            }
            Some(labels) => {
                let code = labels.iter().position(|l| l == token).ok_or_else(|| {
                    MedmlError::DataError(format!("unknown category: {}", token))
                })?;
                Ok(Cell::Nominal(code as u32))
            }
        }
    }
}

/// Writer for the delimited dataset form
pub struct DelimitedWriter {
    delimiter: u8,
    missing_token: String,
}

impl Default for DelimitedWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DelimitedWriter {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            missing_token: "?".to_string(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_missing_token(mut self, token: impl Into<String>) -> Self {
        self.missing_token = token.into();
        self
    }

    /// Write a dataset to a file
    pub fn write_path(&self, data: &Dataset, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write(data, file)
    }

    /// Write a dataset to any writer, one canonical cell form per field
    pub fn write<W: io::Write>(&self, data: &Dataset, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        let header: Vec<&str> = data.attributes().iter().map(|a| a.name.as_str()).collect();
        csv_writer
            .write_record(&header)
            .map_err(|e| MedmlError::DataError(e.to_string()))?;

        for (i, row) in data.rows().iter().enumerate() {
            let fields: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    if cell.is_missing() {
                        self.missing_token.clone()
                    } else {
                        data.canonical_cell(cell, col)
                    }
                })
                .collect();
            csv_writer.write_record(&fields).map_err(|e| {
                MedmlError::DataError(format!("failed writing row {}: {}", i, e))
            })?;
        }
        csv_writer
            .flush()
            .map_err(|e| MedmlError::DataError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::AttributeKind;

    const SAMPLE: &str = "age,sex,target\n63,male,1\n41,female,0\n?,male,1\n";

    #[test]
    fn test_read_infers_types() {
        let data = DelimitedReader::new().read(SAMPLE.as_bytes(), "t").unwrap();
        assert_eq!(data.n_rows(), 3);
        assert_eq!(data.n_attributes(), 3);
        assert!(data.attribute(0).is_numeric());
        assert_eq!(
            data.attribute(1).kind,
            AttributeKind::Nominal(vec!["male".into(), "female".into()])
        );
        assert!(data.attribute(2).is_numeric());
    }

    #[test]
    fn test_read_missing_token() {
        let data = DelimitedReader::new().read(SAMPLE.as_bytes(), "t").unwrap();
        assert!(data.row(2)[0].is_missing());
        assert_eq!(data.missing_count(0), 1);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let input = "c\nb\na\nb\nc\n";
        let data = DelimitedReader::new().read(input.as_bytes(), "t").unwrap();
        assert_eq!(
            data.attribute(0).kind,
            AttributeKind::Nominal(vec!["b".into(), "a".into(), "c".into()])
        );
    }

    #[test]
    fn test_ragged_row_rejected() {
        let input = "a,b\n1,2\n3\n";
        assert!(DelimitedReader::new().read(input.as_bytes(), "t").is_err());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(DelimitedReader::new().read(&b""[..], "t").is_err());
    }

    #[test]
    fn test_round_trip() {
        let data = DelimitedReader::new().read(SAMPLE.as_bytes(), "t").unwrap();

        let mut buf = Vec::new();
        DelimitedWriter::new().write(&data, &mut buf).unwrap();
        let back = DelimitedReader::new().read(&buf[..], "t").unwrap();

        assert_eq!(back.attributes(), data.attributes());
        assert_eq!(back.rows(), data.rows());
    }

    #[test]
    fn test_quoted_header_preserved() {
        let input = "'age',target\n5,1\n";
        let data = DelimitedReader::new().read(input.as_bytes(), "t").unwrap();
        assert_eq!(data.attribute(0).name, "'age'");
    }
}
