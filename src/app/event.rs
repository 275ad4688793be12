//! Page events
use crate::display::ElementId;

/// Everything the page loop reacts to.
///
/// Host events (clicks, connectivity, touches) come from outside; deferred
/// effects (`ScrollDue`, `DismissBanner`) are posted back by the loop itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A language selector was clicked; carries its `data-lang`.
    LanguageSelected(String),
    /// An accordion header was clicked; carries its `data-section`.
    HeaderClicked(String),
    /// A link was clicked; carries its `href`.
    LinkClicked(String),
    Online,
    Offline,
    VisibilityChanged { visible: bool },
    /// A touch ended, at host time in milliseconds.
    TouchEnd { at_ms: u64 },
    /// The host reports a fault inside an interactive handler.
    Fault { context: String, message: String },
    ScrollDue(String),
    DismissBanner(ElementId),
    /// The page is going away; stops the loop.
    Unload,
}

/// Result of handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    /// The host should suppress its default action (double-tap zoom).
    PreventDefault,
    Stop,
}
