//! Decision tree adapter

use super::{feature_matrix, TrainableClassifier};
use crate::dataset::Dataset;
use crate::error::{MedmlError, Result};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};

/// Decision tree classifier backed by the external learning library
pub struct DecisionTreeModel {
    model: Option<DecisionTreeClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>>,
    max_depth: Option<u16>,
}

impl Default for DecisionTreeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTreeModel {
    pub fn new() -> Self {
        Self {
            model: None,
            max_depth: None,
        }
    }

    /// Limit the tree depth
    pub fn with_max_depth(mut self, depth: u16) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

impl TrainableClassifier for DecisionTreeModel {
    fn name(&self) -> &str {
        "Decision Tree"
    }

    fn train(&mut self, data: &Dataset) -> Result<()> {
        let (x, y) = feature_matrix(data)?;
        let mut params = DecisionTreeClassifierParameters::default();
        if let Some(depth) = self.max_depth {
            params = params.with_max_depth(depth);
        }
        let model = DecisionTreeClassifier::fit(&x, &y, params)
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
