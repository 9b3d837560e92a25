//! # Evaluation Parameters
//!
//! Everything the evaluator needs to turn a context into outcome
//! probabilities. Immutable once built, so one instance can be shared
//! by any number of concurrent evaluations.

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::{MaxentError, MaxentResult};

/// Per-predicate parameters plus correction settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvalParameters {
    /// One context per predicate id
    parameters: Vec<Context>,

    num_outcomes: usize,

    /// Maximum number of features fired in an event, usually called C
    correction_constant: u32,

    /// Weight of the correction feature
    correction_param: f64,

    /// 1/C, or 0 when C is 0
    constant_inverse: f64,
}

impl EvalParameters {
    /// Parameters without correction
    pub fn new(parameters: Vec<Context>, num_outcomes: usize) -> MaxentResult<Self> {
        Self::with_correction(parameters, 0.0, 0, num_outcomes)
    }

    /// Parameters with a correction constant and parameter
    ///
    /// Fails if a context references an outcome >= `num_outcomes`.
    pub fn with_correction(
        parameters: Vec<Context>,
        correction_param: f64,
        correction_constant: u32,
        num_outcomes: usize,
    ) -> MaxentResult<Self> {
        for (pid, ctx) in parameters.iter().enumerate() {
            if let Some(&bad) = ctx.outcomes().iter().find(|&&o| o >= num_outcomes) {
                return Err(MaxentError::invalid_argument(format!(
                    "context {} references outcome {} but there are only {} outcomes",
                    pid, bad, num_outcomes
                )));
            }
        }

        let constant_inverse = if correction_constant != 0 {
            1.0 / correction_constant as f64
        } else {
            0.0
        };

        Ok(Self {
            parameters,
            num_outcomes,
            correction_constant,
            correction_param,
            constant_inverse,
        })
    }

    pub fn parameters(&self) -> &[Context] {
        &self.parameters
    }

    pub fn num_outcomes(&self) -> usize {
        self.num_outcomes
    }

    pub fn correction_constant(&self) -> u32 {
        self.correction_constant
    }

    pub fn correction_param(&self) -> f64 {
        self.correction_param
    }

    pub fn constant_inverse(&self) -> f64 {
        self.constant_inverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_inverse() {
        let params = EvalParameters::with_correction(Vec::new(), 0.5, 4, 2).unwrap();
        assert_eq!(params.constant_inverse(), 0.25);
        assert_eq!(params.correction_constant(), 4);

        let plain = EvalParameters::new(Vec::new(), 2).unwrap();
        assert_eq!(plain.constant_inverse(), 0.0);
        assert_eq!(plain.correction_constant(), 0);
    }

    #[test]
    fn test_outcome_out_of_range() {
        let ctx = Context::new(vec![0, 5], vec![1.0, 1.0]).unwrap();
        assert!(EvalParameters::new(vec![ctx], 2).is_err());
    }
}
