//! # Traits - Seams Between Indexing, Training and Serving
//!
//! These traits define the interfaces the other crates implement or
//! consume, so a trainer can be written against any indexer and any
//! serving code against any model.
//!
//! ## Key Traits
//!
//! - `EventStream`: Pull-style, non-rewindable source of training events
//! - `DataIndexer`: Compressed event table handed to a trainer
//! - `Prior`: Prior distribution seeding evaluation and training
//! - `MaxentModel`: A trained model that turns contexts into probabilities

use crate::error::MaxentResult;
use crate::event::Event;

/// Sequential source of training events
///
/// Each event is handed out exactly once; there is no rewind.
pub trait EventStream {
    /// Are there more events?
    fn has_next(&mut self) -> MaxentResult<bool>;

    /// Take the next event
    ///
    /// Returns `StreamExhausted` if `has_next` would return false.
    fn next_event(&mut self) -> MaxentResult<Event>;
}

impl<T: EventStream + ?Sized> EventStream for &mut T {
    fn has_next(&mut self) -> MaxentResult<bool> {
        (**self).has_next()
    }

    fn next_event(&mut self) -> MaxentResult<Event> {
        (**self).next_event()
    }
}

/// Compressed training data, one row per unique observation
///
/// All row-indexed slices have the same length.
pub trait DataIndexer {
    /// Sorted predicate ids of each row
    fn contexts(&self) -> &[Vec<usize>];

    /// Predicate weights of each row, aligned with `contexts`
    ///
    /// `None` for a row whose predicates all carry the implicit weight 1.0.
    fn values(&self) -> &[Option<Vec<f32>>];

    /// Outcome id of each row
    fn outcome_list(&self) -> &[usize];

    /// How many raw observations were merged into each row
    fn num_times_events_seen(&self) -> &[u32];

    /// Predicate names, indexed by predicate id
    fn predicate_labels(&self) -> &[String];

    /// Raw frequency of each kept predicate, indexed by predicate id
    fn predicate_counts(&self) -> &[u32];

    /// Outcome names, indexed by outcome id
    fn outcome_labels(&self) -> &[String];

    /// Number of observations before duplicates were merged
    fn number_of_events(&self) -> usize;
}

/// Prior distribution over outcomes
pub trait Prior: Send + Sync {
    /// Register the labels; called before any `log_prior`
    fn set_labels(&mut self, outcome_labels: &[String], context_labels: &[String]);

    /// Log of the prior distribution for an event with these predicate ids
    fn log_prior(&self, context: &[usize], values: Option<&[f32]>) -> Vec<f64>;
}

/// A trained maximum entropy model
pub trait MaxentModel: Send + Sync {
    /// Probabilities for each outcome given the predicate names; sums to 1
    fn evaluate(&self, context: &[&str]) -> Vec<f64>;

    /// Same as `evaluate`, `values[i]` weighting `context[i]`
    fn evaluate_with_values(&self, context: &[&str], values: &[f32]) -> MaxentResult<Vec<f64>>;

    /// Same as `evaluate`, writing into a caller supplied buffer of `num_outcomes` entries
    fn evaluate_into(&self, context: &[&str], probabilities: &mut [f64]) -> MaxentResult<()>;

    /// Name of the outcome with the highest probability (first wins ties)
    fn best_outcome(&self, outcomes: &[f64]) -> &str;

    /// Every outcome name with its probability, e.g. `A[00.7500] B[00.2500]`
    fn all_outcomes(&self, outcomes: &[f64]) -> MaxentResult<String>;

    /// Name of the outcome with this id
    fn outcome(&self, index: usize) -> Option<&str>;

    /// Id of the outcome with this name
    fn index(&self, outcome: &str) -> Option<usize>;

    fn num_outcomes(&self) -> usize;
}
