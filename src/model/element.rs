//! Element-level types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an element inside an [`ElementTree`](super::ElementTree).
///
/// Two sites that refer to the same footnote, citation or glossary entry
/// hold the same id; the renderers use it as the node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Position of the element in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Semantic role of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Transparent grouping of children
    List,
    /// Whitespace run (text payload is emitted verbatim)
    Space,
    /// Hard line break
    LineBreak,
    /// Text run
    Str,
    Ellipsis,
    EmDash,
    EnDash,
    Apostrophe,
    SingleQuoted,
    DoubleQuoted,
    /// Code span
    Code,
    /// Inline raw HTML
    Html,
    Link,
    Image,
    /// Stand-alone image rendered as a figure
    ImageBlock,
    Emph,
    Strong,
    /// Block of inline content without paragraph markup (tight list items)
    Plain,
    Para,
    ListItem,
    BulletList,
    OrderedList,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    BlockQuote,
    /// Code block
    Verbatim,
    /// Block-level raw HTML
    HtmlBlock,
    HRule,
    /// Link reference definition (non-printing)
    Reference,
    /// Footnote (shared between its reference sites)
    Note,
    /// Citation entry (shared between its reference sites)
    Citation,
    /// Citation that is listed in the bibliography but not printed
    NoCitation,
    /// Citation site with a locator such as `p. 23`
    Locator,
    DefList,
    Term,
    Definition,
    Metadata,
    MetaKey,
    MetaValue,
    /// End of document marker
    Footer,
    /// Pre-resolved anchor identifier
    Label,
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableCell,
    /// Marks a cell that spans extra columns
    CellSpan,
    TableCaption,
    TableLabel,
    /// Per-column alignment string
    TableSeparator,
    /// Glossary entry (shared between its reference sites)
    Glossary,
    GlossaryTerm,
    GlossarySortKey,
    MathSpan,
}

impl ElementKind {
    /// Heading kind for a level, clamped to 1-6.
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => ElementKind::H1,
            2 => ElementKind::H2,
            3 => ElementKind::H3,
            4 => ElementKind::H4,
            5 => ElementKind::H5,
            _ => ElementKind::H6,
        }
    }

    /// Heading level (1-6) of a heading kind.
    pub fn heading_level(self) -> Option<u8> {
        match self {
            ElementKind::H1 => Some(1),
            ElementKind::H2 => Some(2),
            ElementKind::H3 => Some(3),
            ElementKind::H4 => Some(4),
            ElementKind::H5 => Some(5),
            ElementKind::H6 => Some(6),
            _ => None,
        }
    }

    /// Check if this is a heading kind.
    pub fn is_heading(self) -> bool {
        self.heading_level().is_some()
    }

    /// Check if this kind is deferred to the endnote list.
    pub fn is_note_like(self) -> bool {
        matches!(
            self,
            ElementKind::Note | ElementKind::Citation | ElementKind::Glossary
        )
    }

    /// Name used in diagnostics and in the JSON form.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::List => "list",
            ElementKind::Space => "space",
            ElementKind::LineBreak => "line_break",
            ElementKind::Str => "str",
            ElementKind::Ellipsis => "ellipsis",
            ElementKind::EmDash => "em_dash",
            ElementKind::EnDash => "en_dash",
            ElementKind::Apostrophe => "apostrophe",
            ElementKind::SingleQuoted => "single_quoted",
            ElementKind::DoubleQuoted => "double_quoted",
            ElementKind::Code => "code",
            ElementKind::Html => "html",
            ElementKind::Link => "link",
            ElementKind::Image => "image",
            ElementKind::ImageBlock => "image_block",
            ElementKind::Emph => "emph",
            ElementKind::Strong => "strong",
            ElementKind::Plain => "plain",
            ElementKind::Para => "para",
            ElementKind::ListItem => "list_item",
            ElementKind::BulletList => "bullet_list",
            ElementKind::OrderedList => "ordered_list",
            ElementKind::H1 => "h1",
            ElementKind::H2 => "h2",
            ElementKind::H3 => "h3",
            ElementKind::H4 => "h4",
            ElementKind::H5 => "h5",
            ElementKind::H6 => "h6",
            ElementKind::BlockQuote => "block_quote",
            ElementKind::Verbatim => "verbatim",
            ElementKind::HtmlBlock => "html_block",
            ElementKind::HRule => "h_rule",
            ElementKind::Reference => "reference",
            ElementKind::Note => "note",
            ElementKind::Citation => "citation",
            ElementKind::NoCitation => "no_citation",
            ElementKind::Locator => "locator",
            ElementKind::DefList => "def_list",
            ElementKind::Term => "term",
            ElementKind::Definition => "definition",
            ElementKind::Metadata => "metadata",
            ElementKind::MetaKey => "meta_key",
            ElementKind::MetaValue => "meta_value",
            ElementKind::Footer => "footer",
            ElementKind::Label => "label",
            ElementKind::Table => "table",
            ElementKind::TableHead => "table_head",
            ElementKind::TableBody => "table_body",
            ElementKind::TableRow => "table_row",
            ElementKind::TableCell => "table_cell",
            ElementKind::CellSpan => "cell_span",
            ElementKind::TableCaption => "table_caption",
            ElementKind::TableLabel => "table_label",
            ElementKind::TableSeparator => "table_separator",
            ElementKind::Glossary => "glossary",
            ElementKind::GlossaryTerm => "glossary_term",
            ElementKind::GlossarySortKey => "glossary_sort_key",
            ElementKind::MathSpan => "math_span",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload carried by an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Content {
    /// No payload
    #[default]
    None,
    /// Raw text payload
    Text(String),
    /// Link or image target
    Link(Box<LinkData>),
}

impl Content {
    /// Text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Link payload, if any.
    pub fn as_link(&self) -> Option<&LinkData> {
        match self {
            Content::Link(link) => Some(link),
            _ => None,
        }
    }
}

/// Target of a link or image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkData {
    /// Destination URL
    pub url: String,

    /// Title (tooltip); empty when absent
    #[serde(default)]
    pub title: String,

    /// Link text / image alt text
    #[serde(default)]
    pub label: Vec<ElementId>,

    /// Extra attributes such as `width` or `class`
    #[serde(default)]
    pub attributes: Vec<Attribute>,

    /// Generated identifier (figure label); empty when absent
    #[serde(default)]
    pub identifier: String,
}

impl LinkData {
    /// Create link data with a URL and label.
    pub fn new(url: impl Into<String>, label: Vec<ElementId>) -> Self {
        Self {
            url: url.into(),
            label,
            ..Self::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Set the generated identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Look up an attribute value by key (case-insensitive).
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key.eq_ignore_ascii_case(key))
            .map(|a| a.value.as_str())
    }

    /// Check if the URL points inside the document.
    pub fn is_internal(&self) -> bool {
        self.url.starts_with('#')
    }
}

/// A key/value attribute attached to a link or image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// A node of the parsed document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Semantic role
    pub kind: ElementKind,

    /// Payload
    #[serde(default)]
    pub content: Content,

    /// Ordered children
    #[serde(default)]
    pub children: Vec<ElementId>,
}

impl Element {
    /// Create an element without payload or children.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            content: Content::None,
            children: Vec::new(),
        }
    }

    /// Create an element with a text payload.
    pub fn with_text(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            content: Content::Text(text.into()),
            children: Vec::new(),
        }
    }

    /// Create an element with children.
    pub fn with_children(kind: ElementKind, children: Vec<ElementId>) -> Self {
        Self {
            kind,
            content: Content::None,
            children,
        }
    }

    /// Text payload, if any.
    pub fn text(&self) -> Option<&str> {
        self.content.as_text()
    }
}

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Alignment for one character of a table separator string.
    pub fn from_separator_char(c: char) -> Self {
        match c {
            'c' | 'C' => Alignment::Center,
            'r' | 'R' => Alignment::Right,
            _ => Alignment::Left,
        }
    }

    /// Parse a whole separator string (one character per column).
    pub fn parse_separator(s: &str) -> Vec<Alignment> {
        s.chars().map(Self::from_separator_char).collect()
    }

    /// HTML attribute value.
    pub fn as_html(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }

    /// LaTeX column specifier.
    pub fn as_latex(self) -> char {
        match self {
            Alignment::Left => 'l',
            Alignment::Center => 'c',
            Alignment::Right => 'r',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_kind_roundtrip() {
        for level in 1..=6 {
            assert_eq!(ElementKind::heading(level).heading_level(), Some(level));
        }
        assert_eq!(ElementKind::heading(9), ElementKind::H6);
        assert_eq!(ElementKind::Para.heading_level(), None);
    }

    #[test]
    fn test_kind_display_matches_serde_name() {
        let json = serde_json::to_string(&ElementKind::TableSeparator).unwrap();
        assert_eq!(json, "\"table_separator\"");
        assert_eq!(ElementKind::TableSeparator.to_string(), "table_separator");
    }

    #[test]
    fn test_parse_separator() {
        assert_eq!(
            Alignment::parse_separator("lcrX"),
            vec![
                Alignment::Left,
                Alignment::Center,
                Alignment::Right,
                Alignment::Left
            ]
        );
    }

    #[test]
    fn test_link_attribute_lookup() {
        let link = LinkData::new("a.png", vec![]).with_attribute("Width", "20px");
        assert_eq!(link.attribute("width"), Some("20px"));
        assert_eq!(link.attribute("height"), None);
        assert!(!link.is_internal());
        assert!(LinkData::new("#intro", vec![]).is_internal());
    }
}
