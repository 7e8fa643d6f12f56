//! Platform identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The platform governing a root path, as decided by detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTag {
    /// WordPress (`wp-config.php`).
    WordPress,
    /// Joomla (`configuration.php`).
    Joomla,
    /// No known marker was found.
    Unknown,
}

impl PlatformTag {
    /// Stable lowercase identifier, used in logs and JSON output.
    pub fn id(&self) -> &'static str {
        match self {
            PlatformTag::WordPress => "wordpress",
            PlatformTag::Joomla => "joomla",
            PlatformTag::Unknown => "unknown",
        }
    }

    /// Human-readable platform name.
    pub fn display_name(&self) -> &'static str {
        match self {
            PlatformTag::WordPress => "WordPress",
            PlatformTag::Joomla => "Joomla",
            PlatformTag::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PlatformTag::Unknown)
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_ids() {
        assert_eq!(PlatformTag::WordPress.id(), "wordpress");
        assert_eq!(PlatformTag::Joomla.id(), "joomla");
        assert_eq!(PlatformTag::Unknown.id(), "unknown");
    }

    #[test]
    fn test_is_known() {
        assert!(PlatformTag::WordPress.is_known());
        assert!(PlatformTag::Joomla.is_known());
        assert!(!PlatformTag::Unknown.is_known());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&PlatformTag::WordPress).unwrap();
        assert_eq!(json, "\"wordpress\"");
        let tag: PlatformTag = serde_json::from_str("\"joomla\"").unwrap();
        assert_eq!(tag, PlatformTag::Joomla);
    }
}
