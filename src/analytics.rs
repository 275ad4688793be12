//! Contact link click tracking

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Contact,
    Social,
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contact => f.write_str("contact"),
            Self::Social => f.write_str("social"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEvent {
    pub category: EventCategory,
    pub action: &'static str,
    /// Page language at the time of the click.
    pub label: String,
}

/// Category and action for a clicked link, if it is one we track.
#[must_use]
pub fn classify_link(href: &str) -> Option<(EventCategory, &'static str)> {
    if href.starts_with("tel:") {
        Some((EventCategory::Contact, "phone_click"))
    } else if href.contains("maerkli.com") {
        Some((EventCategory::Contact, "website_click"))
    } else if href.contains("instagram.com") {
        Some((EventCategory::Social, "instagram_click"))
    } else {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    /// Tracked clicks, oldest first.
    history: Vec<TrackedEvent>,
}

impl ContactTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a click on `href` if it is a tracked contact link.
    pub fn link_clicked(&mut self, href: &str, language: &str) -> Option<&TrackedEvent> {
        let (category, action) = classify_link(href)?;
        let event = TrackedEvent { category, action, label: language.to_string() };
        tracing::info!(
            category = %event.category,
            action = event.action,
            language = %event.label,
            "Event: {} - {} - Language: {}",
            event.category,
            event.action,
            event.label
        );
        self.history.push(event);
        self.history.last()
    }

    #[must_use]
    pub fn history(&self) -> &[TrackedEvent] {
        &self.history
    }
}
