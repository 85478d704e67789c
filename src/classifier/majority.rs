//! Majority-class baseline

use super::TrainableClassifier;
use crate::dataset::Dataset;
use crate::error::{MedmlError, Result};

/// Zero-rule baseline: always predicts the most frequent training class.
///
/// Useful as a sanity floor in comparisons and as a fully deterministic
/// classifier in tests. Ties resolve to the lowest class code.
pub struct MajorityModel {
    majority: Option<u32>,
}

impl Default for MajorityModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MajorityModel {
    pub fn new() -> Self {
        Self { majority: None }
    }
}

impl TrainableClassifier for MajorityModel {
    fn name(&self) -> &str {
        "Majority Baseline"
    }

    fn train(&mut self, data: &Dataset) -> Result<()> {
        let counts = data.class_counts()?;
        if data.n_rows() == 0 {
            return Err(MedmlError::DataError(
                "cannot train on an empty dataset".into(),
            ));
        }
        let mut best = 0usize;
        for (code, &count) in counts.iter().enumerate() {
            if count > counts[best] {
                best = code;
            }
        }
        self.majority = Some(best as u32);
        Ok(())
    }

    fn predict(&self, data: &Dataset) -> Result<Vec<u32>> {
        let majority = self
            .majority
            .ok_or_else(|| MedmlError::TrainingError("classifier is not trained".into()))?;
        Ok(vec![majority; data.n_rows()])
    }
}
