//! Arena-backed element tree.

use super::{Content, Element, ElementId, ElementKind, LinkData};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A parsed document: an arena of elements plus the ordered root list.
///
/// Elements are appended once by the producer and never removed, so an
/// [`ElementId`] stays valid for the lifetime of the tree. A node may be
/// listed as a child of several parents; footnotes, citations and glossary
/// entries rely on this to share one body between their reference sites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementTree {
    nodes: Vec<Element>,
    roots: Vec<ElementId>,
}

impl ElementTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append an element and return its id.
    pub fn push(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(element);
        id
    }

    /// Get an element by id.
    ///
    /// Ids handed out by this tree are always valid; trees loaded from JSON
    /// are checked by [`ElementTree::validate`].
    pub fn get(&self, id: ElementId) -> &Element {
        &self.nodes[id.index()]
    }

    /// Get an element by id, if it exists.
    pub fn try_get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id.index())
    }

    /// Top-level elements in document order.
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// Append a top-level element.
    pub fn push_root(&mut self, id: ElementId) {
        self.roots.push(id);
    }

    /// Replace the root list.
    pub fn set_roots(&mut self, roots: Vec<ElementId>) {
        self.roots = roots;
    }

    /// Kind of an element.
    pub fn kind(&self, id: ElementId) -> ElementKind {
        self.get(id).kind
    }

    /// Children of an element.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.get(id).children
    }

    /// Text payload of an element, or the empty string.
    pub fn text(&self, id: ElementId) -> &str {
        self.get(id).text().unwrap_or("")
    }

    /// Link payload of an element.
    pub fn link(&self, id: ElementId) -> Option<&LinkData> {
        self.get(id).content.as_link()
    }

    /// First child, if it has the given kind.
    pub fn first_child_of_kind(&self, id: ElementId, kind: ElementKind) -> Option<ElementId> {
        self.children(id)
            .first()
            .copied()
            .filter(|child| self.kind(*child) == kind)
    }

    /// First child of the given kind anywhere in the child list.
    pub fn find_child(&self, id: ElementId, kind: ElementKind) -> Option<ElementId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.kind(*child) == kind)
    }

    // ==================== Builders ====================

    /// Add an element with a text payload.
    pub fn leaf(&mut self, kind: ElementKind, text: impl Into<String>) -> ElementId {
        self.push(Element::with_text(kind, text))
    }

    /// Add an element with children.
    pub fn node(&mut self, kind: ElementKind, children: Vec<ElementId>) -> ElementId {
        self.push(Element::with_children(kind, children))
    }

    /// Add a payload-free element without children.
    pub fn marker(&mut self, kind: ElementKind) -> ElementId {
        self.push(Element::new(kind))
    }

    /// Add a text run.
    pub fn str(&mut self, text: impl Into<String>) -> ElementId {
        self.leaf(ElementKind::Str, text)
    }

    /// Add a single space.
    pub fn space(&mut self) -> ElementId {
        self.leaf(ElementKind::Space, " ")
    }

    /// Split text on spaces into alternating `Str` / `Space` elements.
    pub fn words(&mut self, text: &str) -> Vec<ElementId> {
        let mut ids = Vec::new();
        for (i, word) in text.split(' ').enumerate() {
            if i > 0 {
                ids.push(self.space());
            }
            if !word.is_empty() {
                ids.push(self.str(word));
            }
        }
        ids
    }

    /// Add a paragraph of plain words.
    pub fn para(&mut self, text: &str) -> ElementId {
        let children = self.words(text);
        self.node(ElementKind::Para, children)
    }

    /// Add a heading of plain words.
    pub fn heading(&mut self, level: u8, text: &str) -> ElementId {
        let children = self.words(text);
        self.node(ElementKind::heading(level), children)
    }

    /// Add a link or image element.
    pub fn push_link(&mut self, kind: ElementKind, data: LinkData) -> ElementId {
        self.push(Element {
            kind,
            content: Content::Link(Box::new(data)),
            children: Vec::new(),
        })
    }

    /// Add a metadata block from key/value pairs.
    pub fn metadata(&mut self, pairs: &[(&str, &str)]) -> ElementId {
        let keys = pairs
            .iter()
            .map(|(key, value)| {
                let value = self.leaf(ElementKind::MetaValue, *value);
                let mut element = Element::with_text(ElementKind::MetaKey, *key);
                element.children.push(value);
                self.push(element)
            })
            .collect();
        self.node(ElementKind::Metadata, keys)
    }

    // ==================== Queries ====================

    /// Flatten inline content to plain text.
    ///
    /// Markup is stripped and text runs are kept. Labels, note references
    /// and raw HTML contribute nothing.
    pub fn plain_text(&self, ids: &[ElementId]) -> String {
        let mut out = String::new();
        for id in ids {
            self.push_plain_text(&mut out, *id);
        }
        out
    }

    fn push_plain_text(&self, out: &mut String, id: ElementId) {
        let element = self.get(id);
        match element.kind {
            ElementKind::Str
            | ElementKind::Space
            | ElementKind::Code
            | ElementKind::MathSpan
            | ElementKind::MetaValue
            | ElementKind::Verbatim => out.push_str(element.text().unwrap_or("")),
            ElementKind::LineBreak => out.push('\n'),
            ElementKind::Ellipsis => out.push_str("..."),
            ElementKind::EmDash => out.push_str("---"),
            ElementKind::EnDash => out.push_str("--"),
            ElementKind::Apostrophe => out.push('\''),
            ElementKind::SingleQuoted => {
                out.push('\'');
                self.push_children_text(out, id);
                out.push('\'');
            }
            ElementKind::DoubleQuoted => {
                out.push('"');
                self.push_children_text(out, id);
                out.push('"');
            }
            ElementKind::Link | ElementKind::Image | ElementKind::ImageBlock => {
                if let Some(link) = element.content.as_link() {
                    for child in &link.label {
                        self.push_plain_text(out, *child);
                    }
                }
            }
            ElementKind::Label
            | ElementKind::TableLabel
            | ElementKind::CellSpan
            | ElementKind::TableSeparator
            | ElementKind::Note
            | ElementKind::Citation
            | ElementKind::NoCitation
            | ElementKind::Locator
            | ElementKind::Glossary
            | ElementKind::GlossaryTerm
            | ElementKind::GlossarySortKey
            | ElementKind::Reference
            | ElementKind::Html
            | ElementKind::HtmlBlock
            | ElementKind::Footer => {}
            _ => self.push_children_text(out, id),
        }
    }

    fn push_children_text(&self, out: &mut String, id: ElementId) {
        for child in self.children(id) {
            self.push_plain_text(out, *child);
        }
    }

    /// Check that every referenced id exists and that the graph is acyclic.
    ///
    /// Sharing a node between several parents is allowed.
    pub fn validate(&self) -> Result<()> {
        for id in &self.roots {
            self.check_id(*id)?;
        }
        for (index, element) in self.nodes.iter().enumerate() {
            for child in self.references(element) {
                self.check_id(child).map_err(|_| {
                    Error::InvalidTree(format!(
                        "element #{} references missing element {}",
                        index, child
                    ))
                })?;
            }
        }

        // Iterative three-colour DFS: 0 = unseen, 1 = on stack, 2 = done.
        let mut state = vec![0u8; self.nodes.len()];
        for start in 0..self.nodes.len() {
            if state[start] != 0 {
                continue;
            }
            let mut stack = vec![(ElementId(start as u32), 0usize)];
            state[start] = 1;
            while let Some((id, next)) = stack.pop() {
                let refs = self.references(self.get(id));
                if next < refs.len() {
                    stack.push((id, next + 1));
                    let child = refs[next];
                    match state[child.index()] {
                        0 => {
                            state[child.index()] = 1;
                            stack.push((child, 0));
                        }
                        1 => {
                            return Err(Error::InvalidTree(format!(
                                "cycle through element {}",
                                child
                            )))
                        }
                        _ => {}
                    }
                } else {
                    state[id.index()] = 2;
                }
            }
        }
        Ok(())
    }

    fn check_id(&self, id: ElementId) -> Result<()> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::InvalidTree(format!("missing element {}", id)))
        }
    }

    fn references(&self, element: &Element) -> Vec<ElementId> {
        let mut refs = element.children.clone();
        if let Some(link) = element.content.as_link() {
            refs.extend(link.label.iter().copied());
        }
        refs
    }
}
