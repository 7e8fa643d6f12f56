//! Platform detection.
//!
//! Detection asks each registered adapter, in priority order, whether its
//! marker file is present under the root. Nothing is cached: two calls
//! separated by a filesystem change may disagree.

use std::path::Path;
use std::sync::Arc;

use cmsmgmt_models::PlatformTag;
use tracing::{debug, trace};

use crate::registry::AdapterRegistry;
use crate::traits::PlatformAdapter;

/// Result of inspecting a root path.
pub struct Detection {
    /// The adapter that governs the root, if any.
    pub adapter: Option<Arc<dyn PlatformAdapter>>,
    /// Every platform whose marker is present, in priority order.
    pub matched: Vec<PlatformTag>,
}

impl Detection {
    /// The winning platform, or `Unknown`.
    pub fn platform(&self) -> PlatformTag {
        self.adapter
            .as_ref()
            .map(|a| a.platform())
            .unwrap_or(PlatformTag::Unknown)
    }

    /// True when markers for more than one platform are present.
    pub fn is_ambiguous(&self) -> bool {
        self.matched.len() > 1
    }
}

/// Selects adapters for root paths.
pub struct Detector<'a> {
    registry: &'a AdapterRegistry,
}

impl<'a> Detector<'a> {
    pub fn new(registry: &'a AdapterRegistry) -> Self {
        Self { registry }
    }

    /// Returns the first adapter whose marker is present under `root`.
    pub fn select(&self, root: &Path) -> Option<Arc<dyn PlatformAdapter>> {
        self.registry
            .adapters()
            .iter()
            .find(|adapter| {
                let hit = adapter.detect(root);
                trace!(platform = %adapter.platform(), hit, "Checked marker");
                hit
            })
            .cloned()
    }

    /// Returns the platform governing `root`.
    pub fn detect(&self, root: &Path) -> PlatformTag {
        self.select(root)
            .map(|a| a.platform())
            .unwrap_or(PlatformTag::Unknown)
    }

    /// Checks every adapter and reports all matches along with the winner.
    pub fn inspect(&self, root: &Path) -> Detection {
        let matches: Vec<Arc<dyn PlatformAdapter>> = self
            .registry
            .adapters()
            .iter()
            .filter(|adapter| adapter.detect(root))
            .cloned()
            .collect();

        let detection = Detection {
            matched: matches.iter().map(|a| a.platform()).collect(),
            adapter: matches.into_iter().next(),
        };
        debug!(
            root = %root.display(),
            platform = %detection.platform(),
            matched = detection.matched.len(),
            "Detected platform"
        );
        detection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmsmgmt_store::SnapshotConnector;
    use std::fs;
    use tempfile::tempdir;

    fn registry() -> AdapterRegistry {
        AdapterRegistry::new(Arc::new(SnapshotConnector::new("/nonexistent/db")))
    }

    #[test]
    fn test_detect_wordpress() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("wp-config.php"), "<?php\n").unwrap();

        let registry = registry();
        assert_eq!(Detector::new(&registry).detect(root.path()), PlatformTag::WordPress);
    }

    #[test]
    fn test_detect_joomla() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("configuration.php"), "<?php\n").unwrap();

        let registry = registry();
        assert_eq!(Detector::new(&registry).detect(root.path()), PlatformTag::Joomla);
    }

    #[test]
    fn test_detect_unknown() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("index.php"), "<?php\n").unwrap();

        let registry = registry();
        let detector = Detector::new(&registry);
        assert_eq!(detector.detect(root.path()), PlatformTag::Unknown);
        assert!(detector.select(root.path()).is_none());
    }

    #[test]
    fn test_both_markers_prefer_wordpress() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("wp-config.php"), "<?php\n").unwrap();
        fs::write(root.path().join("configuration.php"), "<?php\n").unwrap();

        let registry = registry();
        let detector = Detector::new(&registry);
        for _ in 0..5 {
            assert_eq!(detector.detect(root.path()), PlatformTag::WordPress);
        }

        let detection = detector.inspect(root.path());
        assert!(detection.is_ambiguous());
        assert_eq!(detection.platform(), PlatformTag::WordPress);
        assert_eq!(
            detection.matched,
            vec![PlatformTag::WordPress, PlatformTag::Joomla]
        );
    }

    #[test]
    fn test_detection_follows_filesystem_changes() {
        let root = tempdir().unwrap();
        let registry = registry();
        let detector = Detector::new(&registry);
        assert_eq!(detector.detect(root.path()), PlatformTag::Unknown);

        fs::write(root.path().join("configuration.php"), "<?php\n").unwrap();
        assert_eq!(detector.detect(root.path()), PlatformTag::Joomla);
    }

    #[test]
    fn test_empty_registry_is_unknown() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("wp-config.php"), "<?php\n").unwrap();

        let registry = AdapterRegistry::empty();
        let detection = Detector::new(&registry).inspect(root.path());
        assert_eq!(detection.platform(), PlatformTag::Unknown);
        assert!(!detection.is_ambiguous());
    }
}
