//! Display Tree capability
//!
//! The page core never holds element references across calls; it discovers
//! elements through [`DisplayTree`] each time it renders. Any host (a browser
//! binding, a headless renderer, [`MemoryTree`]) plugs in here.

/// In-memory tree used by tests and the binary.
mod memory;

pub use memory::{
    MemoryTree,
    SectionElements,
};

/// Opaque handle to an element of the page tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// Element roles the page core looks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Button switching the page language; carries `data-lang`.
    LanguageSelector,
    /// Clickable header of an accordion section; carries `data-section`.
    AccordionHeader,
}

/// An element annotated with a content key.
///
/// Whether it renders as text or as a list of items is decided by the value
/// stored under `key` at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBinding {
    pub element: ElementId,
    pub key: String,
}

/// CSS class marking the active language selector.
pub const ACTIVE_CLASS: &str = "active";
/// CSS class marking an expanded accordion body.
pub const EXPANDED_CLASS: &str = "expanded";
/// CSS class set on the page body while offline.
pub const OFFLINE_CLASS: &str = "offline";

/// Query and mutation surface of the page.
pub trait DisplayTree {
    /// All elements bearing a content-key annotation, in document order.
    fn find_by_content_key(&self) -> Vec<DisplayBinding>;

    /// All elements with the given role, in document order.
    fn find_by_role(&self, role: Role) -> Vec<ElementId>;

    /// Value of a `data-*` attribute.
    fn data(&self, element: ElementId, name: &str) -> Option<String>;

    /// Body of the accordion section owning `header`.
    fn section_content(&self, header: ElementId) -> Option<ElementId>;

    /// Expand/collapse glyph inside `header`.
    fn section_icon(&self, header: ElementId) -> Option<ElementId>;

    /// Replace the element's content with `text`, verbatim.
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Replace the element's children with one item node per entry.
    fn replace_with_items(&mut self, element: ElementId, items: &[String]);

    fn add_class(&mut self, element: ElementId, class: &str);

    fn remove_class(&mut self, element: ElementId, class: &str);

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Set the document's declared language (e.g. `pt-BR`).
    fn set_document_language(&mut self, tag: &str);

    /// The page body element.
    fn body(&self) -> ElementId;

    /// Best-effort scroll bringing the element into view.
    fn scroll_into_view(&mut self, element: ElementId);

    /// Append a transient notice to the body and return its handle.
    fn show_banner(&mut self, text: &str) -> ElementId;

    /// Detach an element from the page. Unknown handles are ignored.
    fn remove(&mut self, element: ElementId);
}
