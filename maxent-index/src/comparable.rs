//! # Comparable Event
//!
//! An event re-expressed as integer ids so it can be sorted and merged
//! with identical observations.
//!
//! ## Ordering
//!
//! 1. Outcome id, ascending
//! 2. Predicate ids, position by position; at each shared position the
//!    weights are compared too, an absent weight counting as exactly 1.0.
//!    Weights use the IEEE total order, so NaN sorts after every number
//!    and only merges with an identical NaN
//! 3. The shorter predicate list first
//!
//! Two events are merged exactly when [`compare_events`] returns `Equal`.

use std::cmp::Ordering;
use std::fmt;

/// One observation in id space
#[derive(Clone, Debug)]
pub struct ComparableEvent {
    /// Outcome id
    pub outcome: usize,

    /// Predicate ids, strictly ascending
    predicate_indices: Vec<usize>,

    /// Weights aligned with `predicate_indices`
    values: Option<Vec<f32>>,

    /// Number of identical observations merged into this one
    pub seen: u32,
}

impl ComparableEvent {
    /// Build an observation; predicates are sorted and repeats dropped
    pub fn new(outcome: usize, predicate_indices: Vec<usize>) -> Self {
        let mut predicate_indices = predicate_indices;
        predicate_indices.sort_unstable();
        predicate_indices.dedup();
        Self {
            outcome,
            predicate_indices,
            values: None,
            seen: 1,
        }
    }

    /// Build a weighted observation; `values[i]` weights `predicate_indices[i]`
    ///
    /// Indices and weights are sorted together. For a repeated predicate
    /// the first weight wins.
    pub fn with_values(outcome: usize, predicate_indices: Vec<usize>, values: Vec<f32>) -> Self {
        debug_assert_eq!(predicate_indices.len(), values.len());
        let mut pairs: Vec<(usize, f32)> = predicate_indices.into_iter().zip(values).collect();
        // stable, so the first occurrence of a repeat stays first
        pairs.sort_by_key(|&(pid, _)| pid);
        pairs.dedup_by_key(|&mut (pid, _)| pid);
        let (predicate_indices, values): (Vec<usize>, Vec<f32>) = pairs.into_iter().unzip();
        Self {
            outcome,
            predicate_indices,
            values: Some(values),
            seen: 1,
        }
    }

    pub fn predicate_indices(&self) -> &[usize] {
        &self.predicate_indices
    }

    pub fn values(&self) -> Option<&[f32]> {
        self.values.as_deref()
    }

    fn weight(&self, i: usize) -> f32 {
        self.values.as_ref().map_or(1.0, |v| v[i])
    }

    pub(crate) fn into_parts(self) -> (usize, Vec<usize>, Option<Vec<f32>>, u32) {
        (self.outcome, self.predicate_indices, self.values, self.seen)
    }
}

/// Three-way comparison used for both sorting and merging
pub fn compare_events(a: &ComparableEvent, b: &ComparableEvent) -> Ordering {
    a.outcome
        .cmp(&b.outcome)
        .then_with(|| compare_predicates(a, b))
}

fn compare_predicates(a: &ComparableEvent, b: &ComparableEvent) -> Ordering {
    let weighted = a.values.is_some() || b.values.is_some();
    for (i, (pa, pb)) in a
        .predicate_indices
        .iter()
        .zip(&b.predicate_indices)
        .enumerate()
    {
        match pa.cmp(pb) {
            Ordering::Equal => {}
            other => return other,
        }
        if weighted {
            match compare_weight(a.weight(i), b.weight(i)) {
                Ordering::Equal => {}
                other => return other,
            }
        }
    }
    a.predicate_indices.len().cmp(&b.predicate_indices.len())
}

fn compare_weight(a: f32, b: f32) -> Ordering {
    a.total_cmp(&b)
}

impl fmt::Display for ComparableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.outcome)?;
        for (i, pid) in self.predicate_indices.iter().enumerate() {
            write!(f, " {}", pid)?;
            if let Some(values) = &self.values {
                write!(f, "={}", values[i])?;
            }
        }
        Ok(())
    }
}
