//! Accessibility Configuration

use serde::{Deserialize, Serialize};

/// Top-level accessibility settings for the page shell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct A11yConfig {
    pub announcer: AnnouncerConfig,
    pub trap: FocusTrapConfig,
}

/// Live announcer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncerConfig {
    /// `id` of the `aria-live="polite"` region
    pub polite_region_id: String,

    /// `id` of the `aria-live="assertive"` region
    pub assertive_region_id: String,

    /// Gap between blanking a region and writing the message
    pub insertion_delay_ms: u64,

    /// Expiry for ordinary announcements
    pub default_timeout_ms: u64,

    /// Expiry for error announcements
    pub error_timeout_ms: u64,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            polite_region_id: "a11y-announcer-polite".to_string(),
            assertive_region_id: "a11y-announcer-assertive".to_string(),
            insertion_delay_ms: 100,
            default_timeout_ms: 3_000,
            error_timeout_ms: 5_000,
        }
    }
}

/// Focus trap settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusTrapConfig {
    /// Return focus to the previously focused element on deactivate
    pub restore_focus: bool,

    /// Focus the first focusable element on activate
    pub initial_focus: bool,
}

impl Default for FocusTrapConfig {
    fn default() -> Self {
        Self {
            restore_focus: true,
            initial_focus: true,
        }
    }
}
