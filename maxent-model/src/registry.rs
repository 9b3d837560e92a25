//! # Model Registry
//!
//! Maps domains to models for concurrent serving. Readers take a cheap
//! `Arc` clone under a shared lock and evaluate without holding it, so a
//! writer swapping in a retrained model never waits on evaluation and
//! never invalidates a handle a reader already holds.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use maxent_core::error::{MaxentError, MaxentResult};
use parking_lot::RwLock;
use tracing::info;

use crate::model::GisModel;

/// Key a registry is partitioned by
pub trait ModelDomain: Hash + Eq + Clone + Send + Sync {
    /// Human readable name, used in errors and logs
    fn name(&self) -> &str;
}

impl ModelDomain for String {
    fn name(&self) -> &str {
        self
    }
}

/// Thread-safe domain to model map
pub struct ModelRegistry<D: ModelDomain = String, M: ?Sized + Send + Sync = GisModel> {
    models: RwLock<HashMap<D, Arc<M>>>,
}

impl<D: ModelDomain, M: ?Sized + Send + Sync> ModelRegistry<D, M> {
    pub fn new() -> Self {
        Self {
            models: RwLock::new(HashMap::new()),
        }
    }

    /// Install `model` for `domain`, returning the model it replaces
    pub fn set_model_for_domain(&self, domain: D, model: Arc<M>) -> Option<Arc<M>> {
        let name = domain.name().to_string();
        let previous = self.models.write().insert(domain, model);
        if previous.is_some() {
            info!("Replaced model for domain '{}'", name);
        } else {
            info!("Registered model for domain '{}'", name);
        }
        previous
    }

    /// Model registered for `domain`
    pub fn get_model(&self, domain: &D) -> MaxentResult<Arc<M>> {
        self.models
            .read()
            .get(domain)
            .cloned()
            .ok_or_else(|| MaxentError::DomainNotFound(domain.name().to_string()))
    }

    /// Unregister `domain`; handles already given out stay valid
    pub fn remove_domain(&self, domain: &D) -> Option<Arc<M>> {
        let removed = self.models.write().remove(domain);
        if removed.is_some() {
            info!("Removed model for domain '{}'", domain.name());
        }
        removed
    }

    /// Snapshot of the registered domains
    pub fn keys(&self) -> HashSet<D> {
        self.models.read().keys().cloned().collect()
    }

    pub fn contains(&self, domain: &D) -> bool {
        self.models.read().contains_key(domain)
    }

    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }
}

impl<D: ModelDomain, M: ?Sized + Send + Sync> Default for ModelRegistry<D, M> {
    fn default() -> Self {
        Self::new()
    }
}
