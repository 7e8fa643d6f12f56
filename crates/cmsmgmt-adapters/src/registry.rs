//! Adapter registry.

use std::sync::Arc;

use cmsmgmt_models::PlatformTag;
use cmsmgmt_store::StoreConnector;

use crate::joomla::JoomlaAdapter;
use crate::traits::PlatformAdapter;
use crate::wordpress::WordPressAdapter;

/// Registry of platform adapters.
///
/// Adapters are kept in registration order, which is also detection
/// priority: the first adapter whose marker is present wins. The built-in
/// order is WordPress, then Joomla.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use cmsmgmt_adapters::AdapterRegistry;
/// use cmsmgmt_models::PlatformTag;
/// use cmsmgmt_store::SnapshotConnector;
///
/// let registry = AdapterRegistry::new(Arc::new(SnapshotConnector::new("/tmp/db")));
///
/// for adapter in registry.adapters() {
///     println!("{} (marker: {})", adapter.info().name, adapter.info().marker);
/// }
///
/// assert!(registry.get(PlatformTag::Joomla).is_some());
/// ```
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn PlatformAdapter>>,
}

impl AdapterRegistry {
    /// Creates a registry with the built-in adapters sharing one connector.
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(WordPressAdapter::new(connector.clone())));
        registry.register(Arc::new(JoomlaAdapter::new(connector)));
        registry
    }

    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Registers an adapter at the lowest priority.
    ///
    /// An adapter for a platform that is already registered replaces the
    /// existing one in place, keeping its priority.
    pub fn register(&mut self, adapter: Arc<dyn PlatformAdapter>) {
        let platform = adapter.platform();
        match self.adapters.iter_mut().find(|a| a.platform() == platform) {
            Some(slot) => *slot = adapter,
            None => self.adapters.push(adapter),
        }
    }

    /// Gets the adapter for a platform.
    pub fn get(&self, platform: PlatformTag) -> Option<Arc<dyn PlatformAdapter>> {
        self.adapters
            .iter()
            .find(|a| a.platform() == platform)
            .cloned()
    }

    /// Adapters in priority order.
    pub fn adapters(&self) -> &[Arc<dyn PlatformAdapter>] {
        &self.adapters
    }

    /// Lists registered platforms in priority order.
    pub fn list(&self) -> Vec<PlatformTag> {
        self.adapters.iter().map(|a| a.platform()).collect()
    }

    /// Returns the number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns true if no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
