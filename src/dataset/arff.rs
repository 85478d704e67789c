//! Typed tabular dataset serialization
//!
//! The typed form carries explicit attribute-kind metadata, which the
//! delimited form cannot: a numeric-looking categorical code column reads
//! back as nominal only because the header says so. Layout:
//!
//! ```text
//! @relation <name>
//! @attribute <name> numeric
//! @attribute <name> {label,label,...}
//! @data
//! <cell>,<cell>,...
//! ```
//!
//! Missing cells are written as `?`. Reader and writer round-trip a dataset
//! exactly (schema and rows).

use crate::dataset::{format_number, Attribute, Cell, Dataset, Row};
use crate::error::{MedmlError, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Write a dataset in the typed tabular form
pub fn write_arff<W: Write>(data: &Dataset, mut writer: W) -> Result<()> {
    writeln!(writer, "@relation {}", data.name())?;
    writeln!(writer)?;
    for attr in data.attributes() {
        match attr.labels() {
            None => writeln!(writer, "@attribute {} numeric", attr.name)?,
            Some(labels) => {
                writeln!(writer, "@attribute {} {{{}}}", attr.name, labels.join(","))?
            }
        }
    }
    writeln!(writer)?;
    writeln!(writer, "@data")?;
    for row in data.rows() {
        let fields: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(col, cell)| match cell {
                Cell::Missing => "?".to_string(),
                Cell::Numeric(v) => format_number(*v),
                Cell::Nominal(code) => data.attribute(col).labels().unwrap()[*code as usize].clone(),
            })
            .collect();
        writeln!(writer, "{}", fields.join(","))?;
    }
    Ok(())
}

/// Write a dataset in the typed tabular form to a file
pub fn write_arff_path(data: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_arff(data, io::BufWriter::new(file))
}

/// Read a dataset in the typed tabular form
pub fn read_arff<R: io::Read>(reader: R) -> Result<Dataset> {
    let buf = io::BufReader::new(reader);
    let mut name = String::from("dataset");
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut rows: Vec<Row> = Vec::new();
    let mut in_data = false;

    for line in buf.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }

        if !in_data {
            let lower = line.to_lowercase();
            if lower.starts_with("@relation") {
                name = line[9..].trim().to_string();
            } else if lower.starts_with("@attribute") {
                attributes.push(parse_attribute(line[10..].trim())?);
            } else if lower == "@data" {
                in_data = true;
            } else {
                return Err(MedmlError::DataError(format!(
                    "unexpected header line: {}",
                    line
                )));
            }
            continue;
        }

        if attributes.is_empty() {
            return Err(MedmlError::DataError("data section before attributes".into()));
        }
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
        if fields.len() != attributes.len() {
            return Err(MedmlError::DataError(format!(
                "row has {} fields, expected {}",
                fields.len(),
                attributes.len()
            )));
        }
        let mut row: Row = Vec::with_capacity(fields.len());
        for (field, attr) in fields.iter().zip(&attributes) {
            row.push(parse_cell(field, attr)?);
        }
        rows.push(row);
    }

    if attributes.is_empty() {
        return Err(MedmlError::DataError("input has no attribute declarations".into()));
    }
    Dataset::with_rows(name, attributes, rows)
}

/// Read a dataset in the typed tabular form from a file
pub fn read_arff_path(path: impl AsRef<Path>) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    read_arff(file)
}

fn parse_attribute(decl: &str) -> Result<Attribute> {
    // Split into name and kind; the name never contains whitespace here
    // because the writer does not quote.
    let (attr_name, kind) = decl.split_once(char::is_whitespace).ok_or_else(|| {
        MedmlError::DataError(format!("malformed attribute declaration: {}", decl))
    })?;
    let kind = kind.trim();
    if kind.eq_ignore_ascii_case("numeric") || kind.eq_ignore_ascii_case("real") {
        Ok(Attribute::numeric(attr_name))
    } else if kind.starts_with('{') && kind.ends_with('}') {
        let labels: Vec<String> = kind[1..kind.len() - 1]
            .split(',')
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        if labels.is_empty() {
            return Err(MedmlError::DataError(format!(
                "attribute {} declares no categories",
                attr_name
            )));
        }
        Ok(Attribute::nominal(attr_name, labels))
    } else {
        Err(MedmlError::DataError(format!(
            "unsupported attribute kind: {}",
            kind
        )))
    }
}

fn parse_cell(field: &str, attr: &Attribute) -> Result<Cell> {
    if field == "?" {
        return Ok(Cell::Missing);
    }
    match attr.labels() {
        None => {
            let v: f64 = field
                .parse()
                .map_err(|_| MedmlError::ParseError(format!("bad numeric token: {}", field)))?;
            Ok(Cell::Numeric(v))
        }
        Some(labels) => {
            let code = labels
                .iter()
                .position(|l| l == field)
                .ok_or_else(|| MedmlError::DataError(format!("unknown category: {}", field)))?;
            Ok(Cell::Nominal(code as u32))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::AttributeKind;

    fn sample() -> Dataset {
        let attrs = vec![
            Attribute::numeric("age"),
            Attribute::nominal("cp", vec!["typical".into(), "atypical".into(), "none".into()]),
            Attribute::nominal("target", vec!["0".into(), "1".into()]),
        ];
        let rows = vec![
            vec![Cell::Numeric(63.0), Cell::Nominal(0), Cell::Nominal(1)],
            vec![Cell::Missing, Cell::Nominal(2), Cell::Nominal(0)],
        ];
        Dataset::with_rows("heart", attrs, rows).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let data = sample();
        let mut buf = Vec::new();
        write_arff(&data, &mut buf).unwrap();

        let back = read_arff(&buf[..]).unwrap();
        assert_eq!(back.name(), "heart");
        assert_eq!(back.attributes(), data.attributes());
        assert_eq!(back.rows(), data.rows());
    }

    #[test]
    fn test_nominal_kind_survives_numeric_looking_labels() {
        // "0"/"1" category labels must come back nominal, not numeric
        let data = sample();
        let mut buf = Vec::new();
        write_arff(&data, &mut buf).unwrap();

        let back = read_arff(&buf[..]).unwrap();
        assert_eq!(
            back.attribute(2).kind,
            AttributeKind::Nominal(vec!["0".into(), "1".into()])
        );
    }

    #[test]
    fn test_malformed_numeric_is_parse_error() {
        let text = "@relation t\n@attribute x numeric\n@data\nabc\n";
        match read_arff(text.as_bytes()) {
            Err(crate::error::MedmlError::ParseError(_)) => {}
            other => panic!("expected ParseError, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_malformed_header_rejected() {
        let text = "@relation t\n@attribute x widget\n@data\n";
        assert!(read_arff(text.as_bytes()).is_err());
        assert!(read_arff(&b"@data\n1\n"[..]).is_err());
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let text = "% comment\n@relation t\n\n@attribute x numeric\n@data\n% another\n1\n2\n";
        let data = read_arff(text.as_bytes()).unwrap();
        assert_eq!(data.n_rows(), 2);
    }
}
