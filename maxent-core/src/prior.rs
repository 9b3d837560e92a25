//! Uniform prior: every outcome starts with log(1/n).

use serde::{Deserialize, Serialize};

use crate::traits::Prior;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UniformPrior {
    num_outcomes: usize,
    r: f64,
}

impl UniformPrior {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prior for UniformPrior {
    fn set_labels(&mut self, outcome_labels: &[String], _context_labels: &[String]) {
        self.num_outcomes = outcome_labels.len();
        self.r = if self.num_outcomes > 0 {
            (1.0 / self.num_outcomes as f64).ln()
        } else {
            0.0
        };
    }

    fn log_prior(&self, _context: &[usize], _values: Option<&[f32]>) -> Vec<f64> {
        vec![self.r; self.num_outcomes]
    }
}
