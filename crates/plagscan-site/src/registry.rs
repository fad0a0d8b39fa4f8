//! In-memory site definition registry.

use crate::{
    definition::SiteDefinition,
    error::{Result, SiteError},
    loader::SiteLoader,
};
use plagscan_core::SiteId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// In-memory cache of site definitions.
///
/// Built-in definitions are always present; definitions loaded from disk
/// replace a built-in with the same ID.
#[derive(Clone)]
pub struct SiteRegistry {
    definitions: Arc<RwLock<HashMap<SiteId, Arc<SiteDefinition>>>>,
}

impl SiteRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            definitions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a registry holding the built-in definitions.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.insert(SiteDefinition::plagium());
        registry
    }

    /// Create a registry with built-ins plus everything the loader finds.
    ///
    /// # Errors
    /// Returns error if the definitions directory can't be read.
    pub fn load_from(loader: &SiteLoader) -> Result<Self> {
        let registry = Self::with_builtins();
        for definition in loader.load_all()? {
            registry.insert(definition);
        }

        info!(count = registry.len(), "site registry ready");
        Ok(registry)
    }

    /// Add or replace a definition.
    pub fn insert(&self, definition: SiteDefinition) {
        let mut cache = self
            .definitions
            .write()
            .expect("acquire write lock on definitions");

        let site_id = definition.id().clone();
        if cache.insert(site_id.clone(), Arc::new(definition)).is_some() {
            debug!(site_id = %site_id, "replaced site definition");
        }
    }

    /// Get a site definition by ID.
    ///
    /// # Errors
    /// Returns error if the site is not registered.
    pub fn get(&self, site_id: &SiteId) -> Result<Arc<SiteDefinition>> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache
            .get(site_id)
            .cloned()
            .ok_or_else(|| SiteError::NotFound {
                site_id: site_id.to_string(),
            })
    }

    /// All registered definitions, ordered by ID.
    #[must_use]
    pub fn get_all(&self) -> Vec<Arc<SiteDefinition>> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        let mut all: Vec<_> = cache.values().cloned().collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        all
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions
            .read()
            .expect("acquire read lock on definitions")
            .len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
