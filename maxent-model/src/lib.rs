//! # MaxEnt Model
//!
//! Serving side of a maximum entropy classifier.
//!
//! This crate provides:
//! - **eval**: The log-linear scoring kernel and softmax
//! - **GisModel**: A trained model evaluated by predicate name
//! - **ModelRegistry**: Domain to model map shared across threads
//!
//! Models are immutable once built; retraining produces a new model that
//! is swapped into the registry.

pub mod eval;
pub mod model;
pub mod registry;

pub use eval::{eval, normalize};
pub use model::GisModel;
pub use registry::{ModelDomain, ModelRegistry};

pub use maxent_core::traits::MaxentModel;
