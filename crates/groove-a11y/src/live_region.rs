//! Live Region Announcements
//!
//! Two fixed regions live in the page shell, one `aria-live="polite"` and
//! one `aria-live="assertive"`. Announcing blanks the region, writes the
//! message after a short delay so screen readers see an insertion rather
//! than a diff, and optionally clears it again later.
//!
//! The later clear is guarded: it only fires if the region still holds
//! the message it was scheduled for. A newer announcement that landed in
//! between is left alone. Timers are never cancelled; a stale one simply
//! finds different text and does nothing.

use groove_dom::{Document, NodeId};

use crate::config::AnnouncerConfig;
use crate::A11yError;

/// Announcement urgency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Politeness {
    /// Waits for the user to finish what they are doing
    #[default]
    Polite,
    /// Interrupts immediately
    Assertive,
}

impl Politeness {
    /// `aria-live` attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }

    fn role(&self) -> &'static str {
        match self {
            Self::Polite => "status",
            Self::Assertive => "alert",
        }
    }
}

/// Options for a single announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnounceOptions {
    pub politeness: Politeness,
    /// Clear the message after this long; 0 keeps it until replaced
    pub timeout_ms: u64,
    /// Blank the region before writing
    pub clear_previous: bool,
}

impl Default for AnnounceOptions {
    fn default() -> Self {
        Self {
            politeness: Politeness::Polite,
            timeout_ms: 3_000,
            clear_previous: true,
        }
    }
}

impl AnnounceOptions {
    pub fn assertive() -> Self {
        Self {
            politeness: Politeness::Assertive,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn keep_previous(mut self) -> Self {
        self.clear_previous = false;
        self
    }
}

/// The page-shell live regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveRegions {
    pub polite: NodeId,
    pub assertive: NodeId,
}

impl LiveRegions {
    /// Create both regions at the end of `<body>`. Regions that already
    /// exist under the configured ids are reused.
    pub fn install(doc: &Document, config: &AnnouncerConfig) -> Result<Self, A11yError> {
        Ok(Self {
            polite: install_region(doc, &config.polite_region_id, Politeness::Polite)?,
            assertive: install_region(doc, &config.assertive_region_id, Politeness::Assertive)?,
        })
    }

    pub fn get(&self, politeness: Politeness) -> NodeId {
        match politeness {
            Politeness::Polite => self.polite,
            Politeness::Assertive => self.assertive,
        }
    }
}

fn install_region(doc: &Document, id: &str, politeness: Politeness) -> Result<NodeId, A11yError> {
    if let Some(existing) = doc.get_element_by_id(id) {
        return Ok(existing);
    }
    let region = doc.create_element("div");
    doc.set_attribute(region, "id", id)?;
    doc.set_attribute(region, "role", politeness.role())?;
    doc.set_attribute(region, "aria-live", politeness.as_str())?;
    doc.set_attribute(region, "aria-atomic", "true")?;
    doc.set_attribute(region, "class", "sr-only")?;
    doc.append_child(doc.body(), region)?;
    Ok(region)
}

/// Writes announcements into the page-shell live regions
#[derive(Debug, Clone)]
pub struct LiveAnnouncer {
    doc: Document,
    config: AnnouncerConfig,
}

impl LiveAnnouncer {
    pub fn new(doc: &Document, config: AnnouncerConfig) -> Self {
        Self {
            doc: doc.clone(),
            config,
        }
    }

    pub fn config(&self) -> &AnnouncerConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Announce `message`. A missing region logs a warning and drops the
    /// message.
    pub fn announce(&self, message: &str, options: AnnounceOptions) {
        let Some(region) = self.region(options.politeness) else {
            return;
        };

        if options.clear_previous {
            write_region(&self.doc, region, "");
        }

        let text = message.to_string();
        self.doc.set_timeout(self.config.insertion_delay_ms, move |doc| {
            write_region(doc, region, &text);
        });

        if options.timeout_ms > 0 {
            let text = message.to_string();
            self.doc.set_timeout(self.expiry_delay(options.timeout_ms), move |doc| {
                if doc.text_content(region) == text {
                    write_region(doc, region, "");
                } else {
                    tracing::trace!("expiry for {:?} skipped: region moved on", text);
                }
            });
        }
    }

    /// Polite announcement with the configured default timeout
    pub fn announce_polite(&self, message: &str) {
        self.announce(message, AnnounceOptions::default().with_timeout(self.config.default_timeout_ms));
    }

    /// Assertive announcement with the configured default timeout
    pub fn announce_assertive(&self, message: &str) {
        self.announce(message, AnnounceOptions::assertive().with_timeout(self.config.default_timeout_ms));
    }

    /// Blank a region right away
    pub fn clear(&self, politeness: Politeness) {
        if let Some(region) = self.region(politeness) {
            write_region(&self.doc, region, "");
        }
    }

    /// Current text of a region, empty if the region is missing
    pub fn current(&self, politeness: Politeness) -> String {
        self.doc
            .get_element_by_id(self.region_id(politeness))
            .map(|region| self.doc.text_content(region))
            .unwrap_or_default()
    }

    /// Expiry counts from the call. A timeout that would fire before the
    /// message is even written counts from the write instead.
    fn expiry_delay(&self, timeout_ms: u64) -> u64 {
        let insertion = self.config.insertion_delay_ms;
        if timeout_ms > insertion {
            timeout_ms
        } else {
            insertion.saturating_add(timeout_ms)
        }
    }

    fn region_id(&self, politeness: Politeness) -> &str {
        match politeness {
            Politeness::Polite => &self.config.polite_region_id,
            Politeness::Assertive => &self.config.assertive_region_id,
        }
    }

    fn region(&self, politeness: Politeness) -> Option<NodeId> {
        let id = self.region_id(politeness);
        let region = self.doc.get_element_by_id(id);
        if region.is_none() {
            tracing::warn!("live region #{} not found; announcement dropped", id);
        }
        region
    }
}

fn write_region(doc: &Document, region: NodeId, text: &str) {
    if !doc.is_connected(region) {
        tracing::debug!("live region {} left the document; write skipped", region);
        return;
    }
    if let Err(err) = doc.set_text_content(region, text) {
        tracing::warn!("live region {} write failed: {}", region, err);
    }
}
