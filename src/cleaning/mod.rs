//! Data cleaning pipeline
//!
//! An ordered sequence of pure transforms that turns a raw dataset into a
//! fully numeric, duplicate-free one:
//! 1. Strip quote artifacts from attribute names
//! 2. Impute missing values (numeric mean, nominal mode)
//! 3. Encode nominal attributes as one indicator column per category
//! 4. Remove zero-variance attributes
//! 5. Remove duplicate rows (first occurrence wins)
//!
//! Each stage consumes the previous stage's output and returns a freshly
//! built dataset; the pipeline halts on the first error.

mod dedup;
mod encoder;
mod imputer;
mod pipeline;

pub use dedup::remove_duplicates;
pub use encoder::encode_nominal;
pub use imputer::impute_missing;
pub use pipeline::DataCleaner;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What each cleaning stage did, reportable after the run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Attribute names that had a quote pair stripped
    pub renamed_attributes: Vec<String>,
    /// Missing cells per attribute before imputation (imputed attributes
    /// end at zero)
    pub missing_before: BTreeMap<String, usize>,
    /// Total missing cells before and after imputation
    pub total_missing_before: usize,
    pub total_missing_after: usize,
    /// Indicator attributes added by nominal encoding
    pub indicators_added: usize,
    /// Constant attributes removed, by name
    pub constants_removed: Vec<String>,
    /// Duplicate rows dropped
    pub duplicates_removed: usize,
    /// Row counts at the pipeline boundaries
    pub instances_before: usize,
    pub instances_after: usize,
}
