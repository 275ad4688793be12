//! Accordion Controller
//!
//! Each labeled section is independently `Expanded` or `Collapsed`; toggling
//! one never touches another.

/// Deferred scroll after expansion.
mod scroll;

use std::collections::{
    BTreeMap,
    HashSet,
};

pub use scroll::ScrollScheduler;

use crate::display::{
    DisplayTree,
    EXPANDED_CLASS,
    ElementId,
    Role,
};

/// Sections expanded when the page opens.
pub const DEFAULT_EXPANDED: [&str; 3] = ["checkin", "wifi", "parking"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionState {
    Expanded,
    Collapsed,
}

impl SectionState {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Expanded => Self::Collapsed,
            Self::Collapsed => Self::Expanded,
        }
    }

    /// Icon glyph shown in the section header.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Expanded => "\u{2212}",
            Self::Collapsed => "+",
        }
    }
}

/// One discovered accordion section.
#[derive(Debug, Clone, Copy)]
struct Section {
    /// Header element the section was discovered through.
    header: ElementId,
    /// Lifecycle position.
    state: SectionState,
}

/// Expand/collapse state of every section found on the page.
#[derive(Debug, Clone)]
pub struct AccordionController {
    /// Labels expanded by `initialize`.
    default_expanded: HashSet<String>,
    /// Sections found by the last `initialize`, by label.
    sections: BTreeMap<String, Section>,
}

impl Default for AccordionController {
    fn default() -> Self {
        Self::new(DEFAULT_EXPANDED)
    }
}

impl AccordionController {
    pub fn new<I, S>(default_expanded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default_expanded: default_expanded.into_iter().map(Into::into).collect(),
            sections: BTreeMap::new(),
        }
    }

    /// Discover every section header and render its initial state.
    ///
    /// Headers without a `data-section` label are skipped.
    pub fn initialize<T>(&mut self, tree: &mut T)
    where
        T: DisplayTree + ?Sized,
    {
        self.sections.clear();

        for header in tree.find_by_role(Role::AccordionHeader) {
            let Some(label) = tree.data(header, "section") else {
                tracing::debug!(?header, "Accordion header without section label");
                continue;
            };
            let state = if self.default_expanded.contains(&label) {
                SectionState::Expanded
            } else {
                SectionState::Collapsed
            };
            render(tree, header, state);
            self.sections.insert(label, Section { header, state });
        }

        tracing::debug!(sections = self.sections.len(), "Accordion initialized");
    }

    /// Flip `section` and render the result. Returns the new state, or `None`
    /// for a section that was never initialized.
    pub fn toggle<T>(&mut self, tree: &mut T, section: &str) -> Option<SectionState>
    where
        T: DisplayTree + ?Sized,
    {
        let entry = self.sections.get_mut(section)?;
        entry.state = entry.state.toggled();
        render(tree, entry.header, entry.state);
        Some(entry.state)
    }

    #[must_use]
    pub fn state(&self, section: &str) -> Option<SectionState> {
        self.sections.get(section).map(|entry| entry.state)
    }

    #[must_use]
    pub fn header(&self, section: &str) -> Option<ElementId> {
        self.sections.get(section).map(|entry| entry.header)
    }

    /// Labels of the sections currently expanded.
    pub fn expanded(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .filter(|(_, entry)| entry.state == SectionState::Expanded)
            .map(|(label, _)| label.as_str())
    }
}

/// Reflect `state` on the section body class and header icon.
fn render<T>(tree: &mut T, header: ElementId, state: SectionState)
where
    T: DisplayTree + ?Sized,
{
    if let Some(content) = tree.section_content(header) {
        match state {
            SectionState::Expanded => tree.add_class(content, EXPANDED_CLASS),
            SectionState::Collapsed => tree.remove_class(content, EXPANDED_CLASS),
        }
    }
    if let Some(icon) = tree.section_icon(header) {
        tree.set_text(icon, state.glyph());
    }
}
