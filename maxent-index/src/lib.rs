//! # MaxEnt Index
//!
//! Compression of raw training events into the unique, integer-indexed
//! event table a maximum entropy trainer consumes.
//!
//! This crate provides:
//! - **ComparableEvent**: An observation in id space with its sort/merge order
//! - **OnePassDataIndexer**: Counting, cutoff, indexing, sort and merge
//!
//! Indexing is single-threaded and reads its stream exactly once.

pub mod comparable;
pub mod indexer;

pub use comparable::{compare_events, ComparableEvent};
pub use indexer::{IndexStats, OnePassDataIndexer};

use maxent_core::config::MaxentConfig;
use maxent_core::error::MaxentResult;
use maxent_core::traits::EventStream;

/// Index a stream with the indexing section of `config`
pub fn index_events<S: EventStream>(
    stream: S,
    config: &MaxentConfig,
) -> MaxentResult<OnePassDataIndexer> {
    config.validate()?;
    OnePassDataIndexer::new(stream, &config.indexing)
}
