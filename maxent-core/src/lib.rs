//! # MaxEnt Core
//!
//! Core types and traits for maximum entropy (log-linear) classification.
//!
//! This crate provides the fundamental building blocks:
//! - **Event**: One labeled training observation, pulled from an `EventStream`
//! - **Context**: Sparse outcome -> parameter mapping of one predicate
//! - **EvalParameters**: Immutable bundle the evaluator reads
//! - **IndexHashTable**: Predicate name -> id lookup over a fixed key set
//!
//! Indexing lives in `maxent-index`, evaluation and the model registry
//! in `maxent-model`.

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod index_table;
pub mod params;
pub mod prior;
pub mod traits;

// Re-export main types at crate root
pub use config::{IndexingConfig, MaxentConfig, ModelConfig};
pub use context::{Context, MutableContext};
pub use error::{MaxentError, MaxentResult};
pub use event::{Event, IterEventStream, Sequence, SequenceEventStream};
pub use index_table::IndexHashTable;
pub use params::EvalParameters;
pub use prior::UniformPrior;
pub use traits::*;

/// Load factor used for predicate tables unless configured otherwise
pub const DEFAULT_LOAD_FACTOR: f64 = 0.7;
