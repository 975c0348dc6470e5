//! OPML outline rendering.
//!
//! Heading sections map onto nested `<outline>` elements. Everything
//! between a heading and its first subsection is flattened to plain text
//! and stored in the `_note` attribute. The rendering is lossy: kinds with
//! no plain-text form are logged and skipped instead of failing.

use super::context::{RenderContext, MAX_HEADING_LEVEL};
use super::escape;
use super::html::link_data;
use super::localize::Typography;
use super::sections::{outline, Section};
use crate::error::Result;
use crate::model::metadata::{self, MetaEntry};
use crate::model::{ElementId, ElementKind, ElementTree};

const NEWLINE: &str = "&#10;";

/// OPML renderer.
pub struct OpmlRenderer<'a> {
    tree: &'a ElementTree,
    ctx: &'a mut RenderContext,
}

impl<'a> OpmlRenderer<'a> {
    /// Create a renderer over a tree and a fresh context.
    pub fn new(tree: &'a ElementTree, ctx: &'a mut RenderContext) -> Self {
        Self { tree, ctx }
    }

    /// Render the whole tree as an OPML document.
    pub fn render_document(&mut self, out: &mut String) -> Result<()> {
        let tree = self.tree;
        let entries = metadata::find_block(tree)
            .map(|block| metadata::entries(tree, block))
            .unwrap_or_default();
        for entry in &entries {
            self.ctx.apply_setting(&entry.key, &entry.value);
        }
        let title = entries
            .iter()
            .find(|entry| entry.key == "title")
            .map(|entry| escape::opml(&entry.value))
            .unwrap_or_default();

        self.ctx.emit(out, "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        self.ctx.emit(out, "<opml version=\"1.0\">\n<head>\n");
        self.ctx.emit(out, &format!("<title>{}</title>\n", title));
        self.ctx.emit(out, "</head>\n<body>\n");

        let body: Vec<ElementId> = tree
            .roots()
            .iter()
            .copied()
            .filter(|id| tree.kind(*id) != ElementKind::Metadata)
            .collect();
        self.render_list(out, &body)?;

        if !entries.is_empty() {
            self.render_metadata(out, &entries);
        }
        self.ctx.emit(out, "</body>\n</opml>\n");
        self.ctx.footer_emitted = true;
        Ok(())
    }

    /// Render a sibling run as outlines.
    pub fn render_list(&mut self, out: &mut String, ids: &[ElementId]) -> Result<()> {
        let tree = self.tree;
        let grouped = outline(ids, MAX_HEADING_LEVEL, |id| {
            tree.kind(id).heading_level()
        });

        let preamble = self.note(&grouped.preamble)?;
        if !preamble.is_empty() {
            self.ctx.emit(
                out,
                &format!(
                    "<outline text=\"&gt;&gt;Preamble&lt;&lt;\" _note=\"{}\">\n</outline>\n",
                    preamble
                ),
            );
        }
        for section in &grouped.sections {
            self.render_section(out, section)?;
        }
        Ok(())
    }

    fn render_section(&mut self, out: &mut String, section: &Section) -> Result<()> {
        self.ctx.count(|s| s.add_heading());
        let mut text = String::new();
        self.inline(&mut text, self.tree.children(section.heading))?;
        let note = self.note(&section.body)?;

        self.ctx.emit(out, &format!("<outline text=\"{}\"", text));
        if !note.is_empty() {
            self.ctx.emit(out, &format!(" _note=\"{}\"", note));
        }
        self.ctx.emit(out, ">\n");
        for subsection in &section.subsections {
            self.render_section(out, subsection)?;
        }
        self.ctx.emit(out, "</outline>\n");
        Ok(())
    }

    fn render_metadata(&mut self, out: &mut String, entries: &[MetaEntry]) {
        self.ctx
            .emit(out, "<outline text=\"&gt;&gt;Metadata&lt;&lt;\">\n");
        for entry in entries {
            let key = escape::opml(self.tree.text(entry.id));
            let value = escape::opml(&entry.value);
            self.ctx
                .emit(out, &format!("<outline text=\"{}\" _note=\"{}\"/>\n", key, value));
        }
        self.ctx.emit(out, "</outline>\n");
    }

    // ==================== Note text ====================

    /// Plain text of a block run, escaped for an attribute.
    fn note(&mut self, ids: &[ElementId]) -> Result<String> {
        let mut blocks = Vec::new();
        for id in ids {
            let mut text = String::new();
            self.block(&mut text, *id)?;
            if !text.is_empty() {
                blocks.push(text);
            }
        }
        Ok(blocks.join(&NEWLINE.repeat(2)))
    }

    fn block(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let tree = self.tree;
        match tree.kind(id) {
            ElementKind::Para => {
                self.ctx.count(|s| s.add_paragraph());
                self.inline(out, tree.children(id))?;
            }
            ElementKind::Verbatim => {
                out.push_str(&escape::opml(tree.text(id).trim_end_matches('\n')));
            }
            ElementKind::BulletList | ElementKind::OrderedList => {
                let ordered = tree.kind(id) == ElementKind::OrderedList;
                let mut items = Vec::new();
                for (index, item) in tree.children(id).iter().enumerate() {
                    let marker = if ordered {
                        format!("{}. ", index + 1)
                    } else {
                        "* ".to_string()
                    };
                    let mut text = String::new();
                    for child in tree.children(*item) {
                        if !text.is_empty() {
                            text.push_str(NEWLINE);
                        }
                        self.block(&mut text, *child)?;
                    }
                    items.push(marker + &text);
                }
                out.push_str(&items.join(NEWLINE));
            }
            ElementKind::BlockQuote => {
                out.push_str("&gt; ");
                let inner = self.note(tree.children(id))?;
                out.push_str(&inner);
            }
            ElementKind::DefList => {
                let mut lines = Vec::new();
                for child in tree.children(id) {
                    let mut text = String::new();
                    if tree.kind(*child) == ElementKind::Definition {
                        text.push_str(": ");
                        let inner = self.note(tree.children(*child))?;
                        text.push_str(&inner);
                    } else {
                        self.inline(&mut text, &[*child])?;
                    }
                    lines.push(text);
                }
                out.push_str(&lines.join(NEWLINE));
            }
            ElementKind::HRule => out.push_str("* * *"),
            _ => self.inline(out, &[id])?,
        }
        Ok(())
    }

    fn inline(&mut self, out: &mut String, ids: &[ElementId]) -> Result<()> {
        let tree = self.tree;
        for &id in ids {
            let kind = tree.kind(id);
            match kind {
                ElementKind::Str
                | ElementKind::Space
                | ElementKind::Code
                | ElementKind::MathSpan
                | ElementKind::MetaValue
                | ElementKind::Term
                | ElementKind::Verbatim => out.push_str(&escape::opml(tree.text(id))),
                ElementKind::LineBreak => out.push_str(NEWLINE),
                ElementKind::Ellipsis => out.push_str(self.ctx.typography(Typography::Ellipsis)),
                ElementKind::EmDash => out.push_str(self.ctx.typography(Typography::EmDash)),
                ElementKind::EnDash => out.push_str(self.ctx.typography(Typography::EnDash)),
                ElementKind::Apostrophe => {
                    out.push_str(self.ctx.typography(Typography::Apostrophe))
                }
                ElementKind::SingleQuoted => {
                    out.push_str(self.ctx.typography(Typography::LeftSingleQuote));
                    self.inline(out, tree.children(id))?;
                    out.push_str(self.ctx.typography(Typography::RightSingleQuote));
                }
                ElementKind::DoubleQuoted => {
                    out.push_str(self.ctx.typography(Typography::LeftDoubleQuote));
                    self.inline(out, tree.children(id))?;
                    out.push_str(self.ctx.typography(Typography::RightDoubleQuote));
                }
                ElementKind::Link | ElementKind::Image | ElementKind::ImageBlock => {
                    match link_data(tree, id) {
                        Ok(link) => {
                            if kind == ElementKind::Link {
                                self.ctx.count(|s| s.add_link());
                            } else {
                                self.ctx.count(|s| s.add_image());
                            }
                            self.inline(out, &link.label)?;
                        }
                        Err(err) => log::warn!("opml: skipping element: {}", err),
                    }
                }
                ElementKind::Emph
                | ElementKind::Strong
                | ElementKind::List
                | ElementKind::Plain
                | ElementKind::Para
                | ElementKind::H1
                | ElementKind::H2
                | ElementKind::H3
                | ElementKind::H4
                | ElementKind::H5
                | ElementKind::H6
                | ElementKind::ListItem
                | ElementKind::BulletList
                | ElementKind::OrderedList
                | ElementKind::BlockQuote
                | ElementKind::DefList
                | ElementKind::Definition
                | ElementKind::MetaKey => self.inline(out, tree.children(id))?,
                ElementKind::Html
                | ElementKind::HRule
                | ElementKind::Reference
                | ElementKind::Footer
                | ElementKind::Label
                | ElementKind::Metadata
                | ElementKind::CellSpan
                | ElementKind::TableLabel
                | ElementKind::TableSeparator
                | ElementKind::GlossarySortKey => {}
                ElementKind::HtmlBlock
                | ElementKind::Note
                | ElementKind::Citation
                | ElementKind::NoCitation
                | ElementKind::Locator
                | ElementKind::Glossary
                | ElementKind::GlossaryTerm
                | ElementKind::Table
                | ElementKind::TableHead
                | ElementKind::TableBody
                | ElementKind::TableRow
                | ElementKind::TableCell
                | ElementKind::TableCaption => {
                    log::warn!("opml output skips element kind `{}`", kind);
                }
            }
        }
        Ok(())
    }
}
