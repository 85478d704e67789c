//! medml - Medical tabular classification benchmarking pipeline
//!
//! This crate prepares a tabular medical dataset for classification and
//! produces a comparative performance report for two classifier types:
//! - Dataset model with numeric/nominal attributes and missing markers
//! - Multi-stage cleaning pipeline (rename, impute, encode, filter, dedup)
//! - Class balancing by seeded resampling
//! - Deterministic k-fold cross-validation harness
//! - Metrics model with textual-report round-trip parsing
//! - Two-model comparison with ranked winner analysis
//!
//! # Modules
//!
//! - [`dataset`] - In-memory tabular model plus delimited and typed I/O
//! - [`cleaning`] - Ordered, pure cleaning transforms
//! - [`balance`] - Class-uniform resampling
//! - [`classifier`] - Trainable classifier capability and variants
//! - [`evaluation`] - Cross-validation, metrics, reports
//! - [`compare`] - Two-model comparison reports
//! - [`cli`] - Command-line interface

pub mod error;

pub mod dataset;
pub mod cleaning;
pub mod balance;
pub mod classifier;
pub mod evaluation;
pub mod compare;

pub mod cli;

pub use error::{MedmlError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{MedmlError, Result};

    pub use crate::dataset::{Attribute, AttributeKind, Cell, Dataset, Row};
    pub use crate::dataset::delimited::{DelimitedReader, DelimitedWriter};
    pub use crate::dataset::arff::{read_arff, write_arff};

    pub use crate::cleaning::{CleaningSummary, DataCleaner};

    pub use crate::balance::{balance, BalanceMode};

    pub use crate::classifier::{ClassifierKind, TrainableClassifier};

    pub use crate::evaluation::{ClassMetrics, EvaluationResult};
    pub use crate::evaluation::cross_validation::cross_validate;
    pub use crate::evaluation::report::{parse_class_metrics, parse_overall_metrics, render_report};

    pub use crate::compare::{ComparisonReport, Winner};
}
