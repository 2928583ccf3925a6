//! Groove Accessibility
//!
//! Keyboard and screen-reader plumbing for the Groove dance-community app.
//!
//! Features:
//! - Focusable element resolution in tab order
//! - Focus trap for modals and drawers
//! - Roving tabindex for icon and chip groups
//! - Keyboard list navigation with escape and autofocus handling
//! - Live-region announcements with stale-timer protection
//!
//! Nothing here panics or errors on a missing target (absent live region,
//! empty or detached container). Those cases log through `tracing` and do
//! nothing. Errors are reserved for caller bugs such as handing a text node
//! where an element is required.

pub mod config;
pub mod focusable;
pub mod focus_trap;
pub mod roving;
pub mod keyboard_nav;
pub mod live_region;
pub mod announcements;
pub mod user_agent;

pub use config::{A11yConfig, AnnouncerConfig, FocusTrapConfig};
pub use focusable::{focusable_elements, is_focusable, next_in_sequence, tab_sequence};
pub use focus_trap::FocusTrap;
pub use roving::RovingTabindex;
pub use keyboard_nav::{
    handle_list_navigation, EscapeHandler, KeyboardNavigationController, NavigationAxes,
    NavigationOptions,
};
pub use live_region::{AnnounceOptions, LiveAnnouncer, LiveRegions, Politeness};
pub use announcements::{
    CommunityAnnouncements, DataAnnouncements, FormAnnouncements, MarketplaceAnnouncements,
    NavigationAnnouncements, Severity,
};
pub use user_agent::press_key;

use groove_dom::{Document, DomError, NodeId};

/// Accessibility error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum A11yError {
    #[error("Expected an element, got node {0}")]
    NotAnElement(NodeId),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

/// Reject ids that exist but are not elements. Unknown ids pass: they behave
/// like detached nodes and degrade to no-ops downstream.
pub(crate) fn ensure_element(doc: &Document, id: NodeId) -> Result<(), A11yError> {
    if doc.exists(id) && !doc.is_element(id) {
        return Err(A11yError::NotAnElement(id));
    }
    Ok(())
}
