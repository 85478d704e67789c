//! Trainable classifier capability
//!
//! The pipeline treats classifier induction as an external capability: it
//! trains through [`TrainableClassifier`] and never inspects a model beyond
//! asking it to predict. Variants are selected by configuration:
//! - Decision tree (delegated to smartcore)
//! - Random forest (delegated to smartcore, seeded)
//! - Majority-class baseline

mod forest;
mod majority;
mod tree;

pub use forest::RandomForestModel;
pub use majority::MajorityModel;
pub use tree::DecisionTreeModel;

use crate::dataset::Dataset;
use crate::error::{MedmlError, Result};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::str::FromStr;

/// Capability interface for classifiers used by the evaluation harness
pub trait TrainableClassifier {
    /// Human-readable model name, used in report headers
    fn name(&self) -> &str;

    /// Fit the classifier on a fully prepared dataset
    fn train(&mut self, data: &Dataset) -> Result<()>;

    /// Predicted class code per row
    fn predict(&self, data: &Dataset) -> Result<Vec<u32>>;

    /// Per-row class probability distribution.
    ///
    /// The default one-hots `predict`; implementations with calibrated
    /// probabilities can override.
    fn distributions(&self, data: &Dataset) -> Result<Vec<Vec<f64>>> {
        let n_classes = data.class_labels()?.len();
        let predictions = self.predict(data)?;
        Ok(predictions
            .iter()
            .map(|&code| {
                let mut dist = vec![0.0; n_classes];
                if (code as usize) < n_classes {
                    dist[code as usize] = 1.0;
                }
                dist
            })
            .collect())
    }
}

impl TrainableClassifier for Box<dyn TrainableClassifier> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn train(&mut self, data: &Dataset) -> Result<()> {
        (**self).train(data)
    }

    fn predict(&self, data: &Dataset) -> Result<Vec<u32>> {
        (**self).predict(data)
    }

    fn distributions(&self, data: &Dataset) -> Result<Vec<Vec<f64>>> {
        (**self).distributions(data)
    }
}

/// Classifier variant selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifierKind {
    DecisionTree,
    RandomForest,
    Majority,
}

impl ClassifierKind {
    /// Construct an untrained classifier of this kind. The seed is used by
    /// variants with internal randomness.
    pub fn build(&self, seed: u64) -> Box<dyn TrainableClassifier> {
        match self {
            ClassifierKind::DecisionTree => Box::new(DecisionTreeModel::new()),
            ClassifierKind::RandomForest => Box::new(RandomForestModel::new().with_seed(seed)),
            ClassifierKind::Majority => Box::new(MajorityModel::new()),
        }
    }

    /// Display name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            ClassifierKind::DecisionTree => "Decision Tree",
            ClassifierKind::RandomForest => "Random Forest",
            ClassifierKind::Majority => "Majority Baseline",
        }
    }
}

impl FromStr for ClassifierKind {
    type Err = MedmlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "decision-tree" | "tree" => Ok(ClassifierKind::DecisionTree),
            "random-forest" | "forest" => Ok(ClassifierKind::RandomForest),
            "majority" => Ok(ClassifierKind::Majority),
            other => Err(MedmlError::ConfigError(format!(
                "unknown classifier kind: {}",
                other
            ))),
        }
    }
}

/// Convert a prepared dataset into the matrix form the external learning
/// library consumes.
pub(crate) fn feature_matrix(data: &Dataset) -> Result<(DenseMatrix<f64>, Vec<u32>)> {
    let (features, labels) = data.features_and_labels()?;
    let x = DenseMatrix::from_2d_vec(&features);
    Ok((x, labels))
}
