//! Domain announcement helpers
//!
//! Thin wrappers over [`LiveAnnouncer::announce`] that pick a severity
//! preset and a fixed message template for each part of the app.

use crate::live_region::{AnnounceOptions, LiveAnnouncer, Politeness};

/// Announcement preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
    /// Loading and progress states; stays until replaced
    Status,
}

impl Severity {
    /// Announce options for this preset under `announcer`'s configuration
    pub fn options(&self, announcer: &LiveAnnouncer) -> AnnounceOptions {
        let config = announcer.config();
        let (politeness, timeout_ms) = match self {
            Self::Error => (Politeness::Assertive, config.error_timeout_ms),
            Self::Warning => (Politeness::Assertive, config.default_timeout_ms),
            Self::Success | Self::Info => (Politeness::Polite, config.default_timeout_ms),
            Self::Status => (Politeness::Polite, 0),
        };
        AnnounceOptions {
            politeness,
            timeout_ms,
            clear_previous: true,
        }
    }
}

impl LiveAnnouncer {
    /// Announce with a severity preset
    pub fn notify(&self, severity: Severity, message: &str) {
        self.announce(message, severity.options(self));
    }

    pub fn form(&self) -> FormAnnouncements<'_> {
        FormAnnouncements { announcer: self }
    }

    pub fn navigation(&self) -> NavigationAnnouncements<'_> {
        NavigationAnnouncements { announcer: self }
    }

    pub fn data(&self) -> DataAnnouncements<'_> {
        DataAnnouncements { announcer: self }
    }

    pub fn community(&self) -> CommunityAnnouncements<'_> {
        CommunityAnnouncements { announcer: self }
    }

    pub fn marketplace(&self) -> MarketplaceAnnouncements<'_> {
        MarketplaceAnnouncements { announcer: self }
    }
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Form validation and submission
#[derive(Debug, Clone, Copy)]
pub struct FormAnnouncements<'a> {
    announcer: &'a LiveAnnouncer,
}

impl FormAnnouncements<'_> {
    pub fn field_error(&self, field: &str, message: &str) {
        self.announcer
            .notify(Severity::Error, &format!("Error in {}: {}", field, message));
    }

    pub fn validation_failed(&self, error_count: usize) {
        self.announcer.notify(
            Severity::Error,
            &format!(
                "Form has {}. Please review and correct.",
                plural(error_count, "error", "errors")
            ),
        );
    }

    pub fn submitting(&self) {
        self.announcer.notify(Severity::Status, "Submitting form...");
    }

    pub fn submitted(&self, what: &str) {
        self.announcer
            .notify(Severity::Success, &format!("{} saved successfully", what));
    }

    pub fn submit_failed(&self) {
        self.announcer
            .notify(Severity::Error, "Failed to submit form. Please try again.");
    }
}

/// Page, menu and dialog transitions
#[derive(Debug, Clone, Copy)]
pub struct NavigationAnnouncements<'a> {
    announcer: &'a LiveAnnouncer,
}

impl NavigationAnnouncements<'_> {
    pub fn page_changed(&self, page: &str) {
        self.announcer
            .notify(Severity::Info, &format!("Navigated to {}", page));
    }

    pub fn page_loading(&self) {
        self.announcer.notify(Severity::Status, "Loading page...");
    }

    pub fn menu_opened(&self, menu: &str) {
        self.announcer
            .notify(Severity::Info, &format!("{} menu opened", menu));
    }

    pub fn menu_closed(&self, menu: &str) {
        self.announcer
            .notify(Severity::Info, &format!("{} menu closed", menu));
    }

    pub fn dialog_opened(&self, title: &str) {
        self.announcer
            .notify(Severity::Info, &format!("{} dialog opened", title));
    }

    pub fn dialog_closed(&self) {
        self.announcer.notify(Severity::Info, "Dialog closed");
    }
}

/// Data fetching
#[derive(Debug, Clone, Copy)]
pub struct DataAnnouncements<'a> {
    announcer: &'a LiveAnnouncer,
}

impl DataAnnouncements<'_> {
    pub fn loading(&self, what: &str) {
        self.announcer
            .notify(Severity::Status, &format!("Loading {}...", what));
    }

    /// `"3 events loaded"`
    pub fn loaded(&self, count: usize, singular: &str, plural_form: &str) {
        self.announcer.notify(
            Severity::Success,
            &format!("{} loaded", plural(count, singular, plural_form)),
        );
    }

    pub fn load_failed(&self, what: &str) {
        self.announcer
            .notify(Severity::Error, &format!("Failed to load {}", what));
    }

    pub fn empty(&self, what: &str) {
        self.announcer
            .notify(Severity::Info, &format!("No {} found", what));
    }

    pub fn refreshed(&self, what: &str) {
        self.announcer
            .notify(Severity::Info, &format!("{} updated", what));
    }
}

/// Community feed
#[derive(Debug, Clone, Copy)]
pub struct CommunityAnnouncements<'a> {
    announcer: &'a LiveAnnouncer,
}

impl CommunityAnnouncements<'_> {
    pub fn post_published(&self) {
        self.announcer
            .notify(Severity::Success, "Your post has been published");
    }

    pub fn post_liked(&self, liked: bool) {
        let message = if liked { "Post liked" } else { "Like removed" };
        self.announcer.notify(Severity::Info, message);
    }

    pub fn comment_added(&self) {
        self.announcer.notify(Severity::Success, "Comment added");
    }

    pub fn new_posts(&self, count: usize) {
        self.announcer.notify(
            Severity::Info,
            &format!("{} available", plural(count, "new post", "new posts")),
        );
    }

    pub fn follow_changed(&self, dancer: &str, following: bool) {
        let message = if following {
            format!("You are now following {}", dancer)
        } else {
            format!("You unfollowed {}", dancer)
        };
        self.announcer.notify(Severity::Success, &message);
    }

    pub fn rsvp(&self, event: &str) {
        self.announcer
            .notify(Severity::Success, &format!("You're going to {}", event));
    }
}

/// Marketplace listings and cart
#[derive(Debug, Clone, Copy)]
pub struct MarketplaceAnnouncements<'a> {
    announcer: &'a LiveAnnouncer,
}

impl MarketplaceAnnouncements<'_> {
    pub fn item_listed(&self, title: &str) {
        self.announcer
            .notify(Severity::Success, &format!("{} is now listed", title));
    }

    pub fn added_to_cart(&self, title: &str) {
        self.announcer
            .notify(Severity::Success, &format!("{} added to cart", title));
    }

    pub fn removed_from_cart(&self, title: &str) {
        self.announcer
            .notify(Severity::Info, &format!("{} removed from cart", title));
    }

    pub fn filters_applied(&self, count: usize) {
        self.announcer.notify(
            Severity::Info,
            &format!("{} match your filters", plural(count, "item", "items")),
        );
    }

    pub fn out_of_stock(&self, title: &str) {
        self.announcer
            .notify(Severity::Warning, &format!("{} is out of stock", title));
    }

    pub fn purchase_complete(&self) {
        self.announcer.notify(Severity::Success, "Purchase complete");
    }

    pub fn purchase_failed(&self) {
        self.announcer.notify(
            Severity::Error,
            "Payment failed. Please check your details and try again.",
        );
    }
}
