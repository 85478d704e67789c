//! Class balancing by seeded resampling
//!
//! Draws a new row set with replacement, biased fully toward a uniform class
//! distribution: each draw first picks a class uniformly among the classes
//! present, then a row uniformly within that class. The output has as many
//! rows as the input; class counts come out approximately equal, never
//! exactly by construction.

use crate::dataset::Dataset;
use crate::error::{MedmlError, Result};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Balancing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceMode {
    /// Return the input unchanged
    Off,
    /// Resample with replacement toward a uniform class distribution
    Uniform,
}

impl FromStr for BalanceMode {
    type Err = MedmlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "off" => Ok(BalanceMode::Off),
            "uniform" => Ok(BalanceMode::Uniform),
            other => Err(MedmlError::ConfigError(format!(
                "unknown balancing mode: {}",
                other
            ))),
        }
    }
}

/// Resample a dataset according to the balancing mode.
///
/// The seed is explicit; every call constructs its own generator, so
/// concurrent pipelines never perturb each other's draws.
pub fn balance(data: &Dataset, mode: BalanceMode, seed: u64) -> Result<Dataset> {
    match mode {
        BalanceMode::Off => Ok(data.clone()),
        BalanceMode::Uniform => resample_uniform(data, seed),
    }
}

fn resample_uniform(data: &Dataset, seed: u64) -> Result<Dataset> {
    if data.is_empty() {
        return Err(MedmlError::DataError(
            "cannot balance an empty dataset".into(),
        ));
    }
    let codes = data.class_codes()?;
    let n_classes = data.class_labels()?.len();

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (row, &code) in codes.iter().enumerate() {
        by_class[code as usize].push(row);
    }
    // Classes declared in the schema but absent from the rows cannot be drawn.
    let populated: Vec<&Vec<usize>> = by_class.iter().filter(|rows| !rows.is_empty()).collect();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(data.n_rows());
    for _ in 0..data.n_rows() {
        let class_rows = populated[rng.gen_range(0..populated.len())];
        let row = class_rows[rng.gen_range(0..class_rows.len())];
        rows.push(data.row(row).clone());
    }

    let mut out = Dataset::with_rows(data.name().to_string(), data.attributes().to_vec(), rows)?;
    if let Some(idx) = data.class_index() {
        out.set_class_index(idx)?;
    }
    Ok(out)
}
