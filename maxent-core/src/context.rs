//! # Context - Parameters of One Predicate
//!
//! A context associates real-valued parameters (or expected values)
//! with a contextual predicate, one per outcome in its outcome pattern.
//! Outcomes absent from the pattern implicitly carry zero.
//!
//! The trainer owns a [`MutableContext`] per predicate while it iterates
//! and hands frozen [`Context`] snapshots to evaluation.

use serde::{Deserialize, Serialize};

use crate::error::{MaxentError, MaxentResult};

/// Immutable outcome pattern with index-aligned parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Context {
    outcomes: Vec<usize>,
    parameters: Vec<f64>,
}

impl Context {
    /// Create a context; `parameters[i]` belongs to `outcomes[i]`
    pub fn new(outcomes: Vec<usize>, parameters: Vec<f64>) -> MaxentResult<Self> {
        if outcomes.len() != parameters.len() {
            return Err(MaxentError::length_mismatch(
                "context parameters",
                outcomes.len(),
                parameters.len(),
            ));
        }
        Ok(Self {
            outcomes,
            parameters,
        })
    }

    /// Outcomes for which parameters exist
    pub fn outcomes(&self) -> &[usize] {
        &self.outcomes
    }

    /// Parameters for the outcomes in [`Context::outcomes`]
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// (outcome, parameter) pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.outcomes
            .iter()
            .copied()
            .zip(self.parameters.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Context whose parameters can be assigned or accumulated in place
#[derive(Clone, Debug, PartialEq)]
pub struct MutableContext {
    inner: Context,
}

impl MutableContext {
    pub fn new(outcomes: Vec<usize>, parameters: Vec<f64>) -> MaxentResult<Self> {
        Ok(Self {
            inner: Context::new(outcomes, parameters)?,
        })
    }

    /// Assign `value` to the parameter at position `outcome_index` of the pattern.
    ///
    /// Panics if `outcome_index` is outside the pattern.
    pub fn set_parameter(&mut self, outcome_index: usize, value: f64) {
        self.inner.parameters[outcome_index] = value;
    }

    /// Add `value` to the parameter at position `outcome_index` of the pattern.
    ///
    /// Panics if `outcome_index` is outside the pattern.
    pub fn update_parameter(&mut self, outcome_index: usize, value: f64) {
        self.inner.parameters[outcome_index] += value;
    }

    /// Checked [`MutableContext::set_parameter`]
    pub fn try_set_parameter(&mut self, outcome_index: usize, value: f64) -> MaxentResult<()> {
        *self.slot(outcome_index)? = value;
        Ok(())
    }

    /// Checked [`MutableContext::update_parameter`]
    pub fn try_update_parameter(&mut self, outcome_index: usize, value: f64) -> MaxentResult<()> {
        *self.slot(outcome_index)? += value;
        Ok(())
    }

    fn slot(&mut self, outcome_index: usize) -> MaxentResult<&mut f64> {
        let len = self.inner.parameters.len();
        self.inner.parameters.get_mut(outcome_index).ok_or_else(|| {
            MaxentError::invalid_argument(format!(
                "outcome index {} outside a pattern of {} outcomes",
                outcome_index, len
            ))
        })
    }

    /// Is `outcome` part of the outcome pattern?
    pub fn contains(&self, outcome: usize) -> bool {
        self.inner.outcomes.contains(&outcome)
    }

    /// Read-only view
    pub fn as_context(&self) -> &Context {
        &self.inner
    }

    /// Snapshot for evaluation; the trainer keeps no handle on it
    pub fn freeze(self) -> Context {
        self.inner
    }
}

impl std::ops::Deref for MutableContext {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.inner
    }
}

impl From<Context> for MutableContext {
    fn from(inner: Context) -> Self {
        Self { inner }
    }
}
