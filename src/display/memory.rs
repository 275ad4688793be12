//! In-memory Display Tree
//!
//! A host-free page model following the class and `data-*` conventions of the
//! hotel page markup (`.lang-btn[data-lang]`, `[data-key]`,
//! `.accordion-item > .accordion-header[data-section] .accordion-icon`,
//! `.accordion-content`).

use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::fmt::Write as _;

use super::{
    DisplayBinding,
    DisplayTree,
    ElementId,
    Role,
};
use crate::content::{
    ContentStore,
    ContentValue,
};

/// Language selector button.
const LANG_BUTTON_CLASS: &str = "lang-btn";
/// Wrapper of one accordion section.
const ACCORDION_ITEM_CLASS: &str = "accordion-item";
/// Clickable section header.
const ACCORDION_HEADER_CLASS: &str = "accordion-header";
/// `+` / `−` glyph inside the header.
const ACCORDION_ICON_CLASS: &str = "accordion-icon";
/// Collapsible section body.
const ACCORDION_CONTENT_CLASS: &str = "accordion-content";
/// Temporary error banner.
const BANNER_CLASS: &str = "error-message";

/// One element of the page.
#[derive(Debug, Clone, Default)]
struct Node {
    /// Element name, e.g. `li`.
    tag: String,
    /// CSS classes.
    classes: BTreeSet<String>,
    /// `data-*` attributes without the prefix.
    data: BTreeMap<String, String>,
    /// Own text, rendered before children.
    text: String,
    /// Child elements in document order.
    children: Vec<ElementId>,
    /// `None` for the root and for detached nodes.
    parent: Option<ElementId>,
}

/// Handles of the elements making up one accordion section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionElements {
    pub item: ElementId,
    pub header: ElementId,
    pub icon: ElementId,
    pub content: ElementId,
}

#[derive(Debug, Clone)]
pub struct MemoryTree {
    /// Arena indexed by `ElementId`.
    nodes: Vec<Node>,
    /// Released slots, reused by `create`.
    free: Vec<ElementId>,
    /// Declared locale tag of the document.
    document_language: String,
    /// Elements scrolled into view, oldest first.
    scrolled: Vec<ElementId>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    /// Root `html` element.
    const ROOT: ElementId = ElementId(0);
    /// The `body` element, always the second node.
    const BODY: ElementId = ElementId(1);

    /// Empty page: `<html><body></body></html>`.
    #[must_use]
    pub fn new() -> Self {
        let mut tree =
            Self {
                nodes: Vec::new(),
                free: Vec::new(),
                document_language: String::new(),
                scrolled: Vec::new(),
            };
        let root = tree.create("html");
        let body = tree.create("body");
        tree.append(root, body);
        tree
    }

    /// Page skeleton for a Content Store: one selector per language, one
    /// binding per key (list-shaped when any language stores a list) and the
    /// given accordion sections.
    #[must_use]
    pub fn from_store(store: &ContentStore, sections: &[&str]) -> Self {
        let mut tree = Self::new();

        for language in store.languages() {
            tree.add_language_button(language);
        }

        // key -> whether any language stores a list under it
        let mut keys: BTreeMap<&str, bool> = BTreeMap::new();
        for (_, table) in store.tables() {
            for (key, value) in table.iter() {
                *keys.entry(key).or_default() |= matches!(value, ContentValue::List(_));
            }
        }
        for (key, is_list) in keys {
            tree.add_binding(if is_list { "ul" } else { "p" }, key);
        }

        for section in sections {
            tree.add_section(section);
        }

        tree
    }

    /// Create a detached element, reusing a released slot when one exists.
    pub fn create(&mut self, tag: &str) -> ElementId {
        let node = Node { tag: tag.to_string(), ..Node::default() };
        if let Some((id, Some(slot))) = self.free.pop().map(|id| (id, self.nodes.get_mut(id.0))) {
            *slot = node;
            return id;
        }
        let id = ElementId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }
    }

    pub fn set_data(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.data.insert(name.to_string(), value.to_string());
        }
    }

    /// `<button class="lang-btn" data-lang="..">` appended to the body.
    pub fn add_language_button(&mut self, language: &str) -> ElementId {
        let button = self.create("button");
        self.add_class(button, LANG_BUTTON_CLASS);
        self.set_data(button, "lang", language);
        self.set_text(button, &language.to_uppercase());
        self.append(Self::BODY, button);
        button
    }

    /// `<tag data-key="..">` appended to the body.
    pub fn add_binding(&mut self, tag: &str, key: &str) -> ElementId {
        let element = self.create(tag);
        self.set_data(element, "key", key);
        self.append(Self::BODY, element);
        element
    }

    /// Accordion item with header, icon and content appended to the body.
    pub fn add_section(&mut self, section: &str) -> SectionElements {
        let item = self.create("div");
        self.add_class(item, ACCORDION_ITEM_CLASS);

        let header = self.create("button");
        self.add_class(header, ACCORDION_HEADER_CLASS);
        self.set_data(header, "section", section);

        let title = self.create("span");
        self.set_data(title, "key", &format!("{section}_title"));

        let icon = self.create("span");
        self.add_class(icon, ACCORDION_ICON_CLASS);

        let content = self.create("div");
        self.add_class(content, ACCORDION_CONTENT_CLASS);

        self.append(header, title);
        self.append(header, icon);
        self.append(item, header);
        self.append(item, content);
        self.append(Self::BODY, item);

        SectionElements { item, header, icon, content }
    }

    /// Concatenated text of the element and its descendants.
    #[must_use]
    pub fn text_content(&self, element: ElementId) -> String {
        let mut text = String::new();
        self.collect_text(element, &mut text);
        text
    }

    #[must_use]
    pub fn children(&self, element: ElementId) -> &[ElementId] {
        self.nodes.get(element.0).map(|node| node.children.as_slice()).unwrap_or_default()
    }

    #[must_use]
    pub fn tag(&self, element: ElementId) -> Option<&str> {
        self.nodes.get(element.0).map(|node| node.tag.as_str())
    }

    /// Whether the element is reachable from the document root.
    #[must_use]
    pub fn is_attached(&self, element: ElementId) -> bool {
        let mut current = element;
        loop {
            if current == Self::ROOT {
                return true;
            }
            match self.nodes.get(current.0).and_then(|node| node.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    #[must_use]
    pub fn document_language(&self) -> &str {
        &self.document_language
    }

    #[must_use]
    pub fn scrolled(&self) -> &[ElementId] {
        &self.scrolled
    }

    /// Number of live elements, attached or not.
    #[must_use]
    pub fn live_elements(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Markup of everything reachable from the root.
    ///
    /// Element handles are not part of the output, so two trees showing the
    /// same page render identically.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(Self::ROOT, &mut out);
        out
    }

    /// First element in document order bound to `key`.
    #[must_use]
    pub fn element_for_key(&self, key: &str) -> Option<ElementId> {
        self.find_by_content_key()
            .into_iter()
            .find(|binding| binding.key == key)
            .map(|binding| binding.element)
    }

    /// Attached elements in document order.
    fn document_order(&self) -> Vec<ElementId> {
        let mut order = Vec::new();
        let mut stack = vec![Self::ROOT];
        while let Some(element) = stack.pop() {
            order.push(element);
            stack.extend(self.children(element).iter().rev());
        }
        order
    }

    /// Append the text of `element` and its descendants, depth first.
    fn collect_text(&self, element: ElementId, out: &mut String) {
        let Some(node) = self.nodes.get(element.0) else {
            return;
        };
        out.push_str(&node.text);
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }

    /// Serialize `element` and its subtree.
    fn render_into(&self, element: ElementId, out: &mut String) {
        let Some(node) = self.nodes.get(element.0) else {
            return;
        };
        let _ = write!(out, "<{}", node.tag);
        if !node.classes.is_empty() {
            let classes: Vec<&str> = node.classes.iter().map(String::as_str).collect();
            let _ = write!(out, " class=\"{}\"", classes.join(" "));
        }
        for (name, value) in &node.data {
            let _ = write!(out, " data-{name}=\"{value}\"");
        }
        out.push('>');
        out.push_str(&node.text);
        for child in &node.children {
            self.render_into(*child, out);
        }
        let _ = write!(out, "</{}>", node.tag);
    }

    /// Return `element` and its whole subtree to the free list.
    ///
    /// The root and body are never released. Handles to released elements
    /// must not be used again.
    fn release(&mut self, element: ElementId) {
        let mut stack = vec![element];
        while let Some(id) = stack.pop() {
            if id == Self::ROOT || id == Self::BODY || self.free.contains(&id) {
                continue;
            }
            let Some(node) = self.nodes.get_mut(id.0) else {
                continue;
            };
            stack.append(&mut node.children);
            *node = Node::default();
            self.free.push(id);
        }
    }

    /// Unlink `element` from its parent, if any.
    fn detach(&mut self, element: ElementId) {
        let Some(parent) = self.nodes.get_mut(element.0).and_then(|node| node.parent.take()) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.retain(|child| *child != element);
        }
    }

    /// Drop every child of `element`, releasing their slots.
    fn clear_children(&mut self, element: ElementId) {
        let children = self
            .nodes
            .get_mut(element.0)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        for child in children {
            self.release(child);
        }
    }

    /// Nearest ancestor (or self) carrying `class`.
    fn closest(&self, element: ElementId, class: &str) -> Option<ElementId> {
        let mut current = Some(element);
        while let Some(id) = current {
            if self.has_class(id, class) {
                return Some(id);
            }
            current = self.nodes.get(id.0).and_then(|node| node.parent);
        }
        None
    }

    /// First descendant (excluding self) carrying `class`.
    fn find_descendant(&self, element: ElementId, class: &str) -> Option<ElementId> {
        let mut stack: Vec<ElementId> = self.children(element).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.has_class(id, class) {
                return Some(id);
            }
            stack.extend(self.children(id).iter().rev());
        }
        None
    }
}

impl DisplayTree for MemoryTree {
    fn find_by_content_key(&self) -> Vec<DisplayBinding> {
        self.document_order()
            .into_iter()
            .filter_map(|element| {
                let key = self.nodes.get(element.0)?.data.get("key")?;
                Some(DisplayBinding { element, key: key.clone() })
            })
            .collect()
    }

    fn find_by_role(&self, role: Role) -> Vec<ElementId> {
        let class = match role {
            Role::LanguageSelector => LANG_BUTTON_CLASS,
            Role::AccordionHeader => ACCORDION_HEADER_CLASS,
        };
        self.document_order().into_iter().filter(|element| self.has_class(*element, class)).collect()
    }

    fn data(&self, element: ElementId, name: &str) -> Option<String> {
        self.nodes.get(element.0)?.data.get(name).cloned()
    }

    fn section_content(&self, header: ElementId) -> Option<ElementId> {
        let item = self.closest(header, ACCORDION_ITEM_CLASS)?;
        self.find_descendant(item, ACCORDION_CONTENT_CLASS)
    }

    fn section_icon(&self, header: ElementId) -> Option<ElementId> {
        self.find_descendant(header, ACCORDION_ICON_CLASS)
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.clear_children(element);
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.text = text.to_string();
        }
    }

    fn replace_with_items(&mut self, element: ElementId, items: &[String]) {
        self.set_text(element, "");
        for item in items {
            let li = self.create("li");
            if let Some(node) = self.nodes.get_mut(li.0) {
                node.text.clone_from(item);
            }
            self.append(element, li);
        }
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.classes.remove(class);
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.nodes.get(element.0).is_some_and(|node| node.classes.contains(class))
    }

    fn set_document_language(&mut self, tag: &str) {
        tag.clone_into(&mut self.document_language);
    }

    fn body(&self) -> ElementId {
        Self::BODY
    }

    fn scroll_into_view(&mut self, element: ElementId) {
        self.scrolled.push(element);
    }

    fn show_banner(&mut self, text: &str) -> ElementId {
        let banner = self.create("div");
        self.add_class(banner, BANNER_CLASS);
        self.set_text(banner, text);
        self.append(Self::BODY, banner);
        banner
    }

    fn remove(&mut self, element: ElementId) {
        self.detach(element);
        self.release(element);
    }
}
