//! Random forest adapter

use super::{feature_matrix, TrainableClassifier};
use crate::dataset::Dataset;
use crate::error::{MedmlError, Result};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

/// Random forest classifier backed by the external learning library.
///
/// The forest's internal bootstrap sampling is seeded so that repeated runs
/// with the same seed build the same ensemble.
pub struct RandomForestModel {
    model: Option<RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>>,
    n_trees: u16,
    seed: u64,
}

impl Default for RandomForestModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomForestModel {
    pub fn new() -> Self {
        Self {
            model: None,
            n_trees: 100,
            seed: 1,
        }
    }

    /// Set the ensemble size
    pub fn with_n_trees(mut self, n_trees: u16) -> Self {
        self.n_trees = n_trees;
        self
    }

    /// Set the bootstrap seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl TrainableClassifier for RandomForestModel {
    fn name(&self) -> &str {
        "Random Forest"
    }

    fn train(&mut self, data: &Dataset) -> Result<()> {
        let (x, y) = feature_matrix(data)?;
        let params = RandomForestClassifierParameters::default()
            .with_n_trees(self.n_trees)
            .with_seed(self.seed);
        let model = RandomForestClassifier::fit(&x, &y, params)
            .map_err(|e| MedmlError::TrainingError(e.to_string()))?;
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, data: &Dataset) -> Result<Vec<u32>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| MedmlError::TrainingError("classifier is not trained".into()))?;
        let (x, _) = feature_matrix(data)?;
        model
            .predict(&x)
            .map_err(|e| MedmlError::TrainingError(e.to_string()))
    }
}
