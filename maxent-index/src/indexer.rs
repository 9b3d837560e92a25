//! # One-Pass Data Indexer
//!
//! Turns a stream of raw events into the compressed, integer-indexed
//! event table a trainer iterates over.
//!
//! ## Phases
//!
//! 1. **Count**: drain the stream once, counting every predicate. A
//!    predicate gets an id the first time its count reaches the cutoff.
//!    Events are buffered since the vocabulary is only final at the end.
//! 2. **Index**: number outcomes in first-seen order and rewrite each
//!    event as predicate ids, dropping predicates below the cutoff.
//!    Events left with no predicates are dropped.
//! 3. **Sort and merge**: sort by [`compare_events`] and fold adjacent
//!    equal observations into one row with a seen count.
//! 4. **Fill**: lay the rows out as parallel columns.

use std::cmp::Ordering;
use std::collections::HashMap;

use maxent_core::config::IndexingConfig;
use maxent_core::error::MaxentResult;
use maxent_core::event::Event;
use maxent_core::traits::{DataIndexer, EventStream};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::comparable::{compare_events, ComparableEvent};

/// Statistics from one indexing run
#[derive(Clone, Debug, Default, Serialize)]
pub struct IndexStats {
    /// Raw events pulled from the stream
    pub events_read: u64,

    /// Events dropped because no predicate survived the cutoff
    pub events_dropped: u64,

    /// Observations built (read - dropped)
    pub events_indexed: u64,

    /// Rows left after merging duplicates
    pub unique_events: u64,

    /// Distinct predicate names seen, kept or not
    pub predicates_seen: usize,

    /// Predicates that reached the cutoff
    pub predicates_kept: usize,

    /// Distinct outcomes
    pub outcomes: usize,
}

impl IndexStats {
    /// Fraction of indexed observations removed by merging
    pub fn compression_ratio(&self) -> f32 {
        if self.events_indexed == 0 {
            return 0.0;
        }
        1.0 - self.unique_events as f32 / self.events_indexed as f32
    }
}

/// Running predicate counts and the ids of predicates past the cutoff
#[derive(Debug, Default)]
struct PredicateCounter {
    counts: HashMap<String, u32>,
    index: HashMap<String, usize>,
    labels: Vec<String>,
}

impl PredicateCounter {
    fn update(&mut self, context: &[String], cutoff: u32) {
        for pred in context {
            let count = self.counts.entry(pred.clone()).or_insert(0);
            *count += 1;
            if *count >= cutoff && !self.index.contains_key(pred) {
                self.index.insert(pred.clone(), self.labels.len());
                self.labels.push(pred.clone());
            }
        }
    }

    /// Final raw frequency of each kept predicate, by id
    fn kept_counts(&self) -> Vec<u32> {
        self.labels
            .iter()
            .map(|label| self.counts.get(label).copied().unwrap_or(0))
            .collect()
    }
}

/// Outcome ids in first-seen order
#[derive(Debug, Default)]
struct OutcomeTable {
    index: HashMap<String, usize>,
    labels: Vec<String>,
}

impl OutcomeTable {
    fn id_for(&mut self, outcome: &str) -> usize {
        if let Some(&id) = self.index.get(outcome) {
            return id;
        }
        let id = self.labels.len();
        self.index.insert(outcome.to_string(), id);
        self.labels.push(outcome.to_string());
        id
    }
}

/// Indexer which handles cutoffs for uncommon predicates and gives each
/// kept predicate a unique integer id
#[derive(Clone, Debug)]
pub struct OnePassDataIndexer {
    contexts: Vec<Vec<usize>>,
    values: Vec<Option<Vec<f32>>>,
    outcome_list: Vec<usize>,
    num_times_events_seen: Vec<u32>,
    predicate_labels: Vec<String>,
    predicate_counts: Vec<u32>,
    outcome_labels: Vec<String>,
    number_of_events: usize,
    stats: IndexStats,
}

impl OnePassDataIndexer {
    /// Index with the given cutoff, sorting and merging duplicates
    pub fn with_cutoff<S: EventStream>(stream: S, cutoff: u32) -> MaxentResult<Self> {
        Self::new(stream, &IndexingConfig { cutoff, sort: true })
    }

    /// Drain `stream` and build the compressed event table
    pub fn new<S: EventStream>(mut stream: S, config: &IndexingConfig) -> MaxentResult<Self> {
        info!("Indexing events using cutoff of {}", config.cutoff);

        let mut counter = PredicateCounter::default();
        let events = compute_event_counts(&mut stream, &mut counter, config.cutoff)?;
        info!("Computed event counts: {} events", events.len());

        let mut stats = IndexStats {
            events_read: events.len() as u64,
            predicates_seen: counter.counts.len(),
            predicates_kept: counter.labels.len(),
            ..Default::default()
        };
        if events.is_empty() {
            warn!("Event stream yielded no events");
        }

        let mut outcomes = OutcomeTable::default();
        let observations = index(events, &counter.index, &mut outcomes, &mut stats);
        info!(
            "Indexed {} events ({} dropped)",
            stats.events_indexed, stats.events_dropped
        );

        let number_of_events = observations.len();
        let unique = sort_and_merge(observations, config.sort);
        stats.unique_events = unique.len() as u64;
        stats.outcomes = outcomes.labels.len();
        info!(
            "Sorted and merged {} events into {} unique events",
            number_of_events,
            unique.len()
        );

        let mut indexer = Self {
            contexts: Vec::with_capacity(unique.len()),
            values: Vec::with_capacity(unique.len()),
            outcome_list: Vec::with_capacity(unique.len()),
            num_times_events_seen: Vec::with_capacity(unique.len()),
            predicate_counts: counter.kept_counts(),
            predicate_labels: counter.labels,
            outcome_labels: outcomes.labels,
            number_of_events,
            stats,
        };
        indexer.fill(unique);
        Ok(indexer)
    }

    /// Statistics from the indexing run
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Number of rows after merging
    pub fn unique_events(&self) -> usize {
        self.outcome_list.len()
    }

    fn fill(&mut self, rows: Vec<ComparableEvent>) {
        for row in rows {
            let (outcome, predicates, values, seen) = row.into_parts();
            self.num_times_events_seen.push(seen);
            self.outcome_list.push(outcome);
            self.contexts.push(predicates);
            self.values.push(values);
        }
    }
}

impl DataIndexer for OnePassDataIndexer {
    fn contexts(&self) -> &[Vec<usize>] {
        &self.contexts
    }

    fn values(&self) -> &[Option<Vec<f32>>] {
        &self.values
    }

    fn outcome_list(&self) -> &[usize] {
        &self.outcome_list
    }

    fn num_times_events_seen(&self) -> &[u32] {
        &self.num_times_events_seen
    }

    fn predicate_labels(&self) -> &[String] {
        &self.predicate_labels
    }

    fn predicate_counts(&self) -> &[u32] {
        &self.predicate_counts
    }

    fn outcome_labels(&self) -> &[String] {
        &self.outcome_labels
    }

    fn number_of_events(&self) -> usize {
        self.number_of_events
    }
}

/// Phase 1: buffer every event and count its predicates
fn compute_event_counts<S: EventStream>(
    stream: &mut S,
    counter: &mut PredicateCounter,
    cutoff: u32,
) -> MaxentResult<Vec<Event>> {
    let mut events = Vec::new();
    while stream.has_next()? {
        let event = stream.next_event()?;
        counter.update(event.context(), cutoff);
        events.push(event);
    }
    Ok(events)
}

/// Phase 2: rewrite events as ids, dropping those with no kept predicate
fn index(
    events: Vec<Event>,
    predicate_index: &HashMap<String, usize>,
    outcomes: &mut OutcomeTable,
    stats: &mut IndexStats,
) -> Vec<ComparableEvent> {
    let mut observations = Vec::with_capacity(events.len());
    let mut indexed = Vec::new();
    let mut weights = Vec::new();

    for event in events {
        let outcome_id = outcomes.id_for(event.outcome());

        indexed.clear();
        weights.clear();
        for (i, pred) in event.context().iter().enumerate() {
            if let Some(&pid) = predicate_index.get(pred) {
                indexed.push(pid);
                if let Some(values) = event.values() {
                    weights.push(values[i]);
                }
            }
        }

        if indexed.is_empty() {
            debug!("Dropped event {}: {}", event.outcome(), event.context().join(","));
            stats.events_dropped += 1;
            continue;
        }

        let observation = match event.values() {
            Some(_) => ComparableEvent::with_values(outcome_id, indexed.clone(), weights.clone()),
            None => ComparableEvent::new(outcome_id, indexed.clone()),
        };
        observations.push(observation);
        stats.events_indexed += 1;
    }

    observations
}

/// Phase 3: sort, then fold runs of equal observations into one
fn sort_and_merge(mut observations: Vec<ComparableEvent>, sort: bool) -> Vec<ComparableEvent> {
    if !sort {
        return observations;
    }

    observations.sort_by(compare_events);

    let mut unique: Vec<ComparableEvent> = Vec::with_capacity(observations.len());
    for ev in observations {
        match unique.last_mut() {
            Some(last) if compare_events(last, &ev) == Ordering::Equal => last.seen += 1,
            _ => unique.push(ev),
        }
    }
    unique
}
