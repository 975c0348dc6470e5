//! groff rendering with the mm macro package.

use super::context::{NoteMark, RenderContext};
use super::escape;
use super::html::link_data;
use super::localize::Typography;
use crate::error::{Error, Result};
use crate::model::metadata::{self, normalize_key};
use crate::model::{ElementId, ElementKind, ElementTree};

/// groff-mm renderer.
///
/// Produces a body without any document wrapping. Tables, citations and
/// glossary entries have no mm rendering and fail the render.
pub struct GroffRenderer<'a> {
    tree: &'a ElementTree,
    ctx: &'a mut RenderContext,
}

impl<'a> GroffRenderer<'a> {
    /// Create a renderer over a tree and a fresh context.
    pub fn new(tree: &'a ElementTree, ctx: &'a mut RenderContext) -> Self {
        Self { tree, ctx }
    }

    /// Render the whole tree.
    pub fn render_document(&mut self, out: &mut String) -> Result<()> {
        self.render_list(out, self.tree.roots())?;
        self.ctx.footer_emitted = true;
        Ok(())
    }

    /// Render a sibling run.
    pub fn render_list(&mut self, out: &mut String, ids: &[ElementId]) -> Result<()> {
        for (index, id) in ids.iter().enumerate() {
            self.render_element(out, *id, index == 0)?;
        }
        Ok(())
    }

    /// Render one element; `first` marks the first of its siblings.
    pub fn render_element(&mut self, out: &mut String, id: ElementId, first: bool) -> Result<()> {
        let tree = self.tree;
        let kind = tree.kind(id);
        match kind {
            ElementKind::Space => self.ctx.emit(out, tree.text(id)),
            ElementKind::LineBreak => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, ".br\n");
                self.ctx.set_padded(1);
            }
            ElementKind::Str | ElementKind::MathSpan | ElementKind::MetaValue => {
                self.ctx.emit(out, &escape::groff(tree.text(id)))
            }
            ElementKind::Ellipsis => self.typography(out, Typography::Ellipsis),
            ElementKind::EmDash => self.typography(out, Typography::EmDash),
            ElementKind::EnDash => self.typography(out, Typography::EnDash),
            ElementKind::Apostrophe => self.typography(out, Typography::Apostrophe),
            ElementKind::SingleQuoted => {
                self.typography(out, Typography::LeftSingleQuote);
                self.render_list(out, tree.children(id))?;
                self.typography(out, Typography::RightSingleQuote);
            }
            ElementKind::DoubleQuoted => {
                self.typography(out, Typography::LeftDoubleQuote);
                self.render_list(out, tree.children(id))?;
                self.typography(out, Typography::RightDoubleQuote);
            }
            ElementKind::Code => {
                let code = escape::groff(tree.text(id));
                self.ctx.emit(out, &format!("\\fC{}\\fR", code));
            }
            ElementKind::Html
            | ElementKind::HtmlBlock
            | ElementKind::Reference
            | ElementKind::Label
            | ElementKind::Footer => {}
            ElementKind::Link => {
                let link = link_data(tree, id)?;
                self.ctx.count(|s| s.add_link());
                self.render_list(out, &link.label)?;
                self.ctx.emit(out, &format!(" ({})", link.url));
            }
            ElementKind::Image | ElementKind::ImageBlock => {
                let link = link_data(tree, id)?;
                self.ctx.count(|s| s.add_image());
                if kind == ElementKind::ImageBlock {
                    self.ctx.pad(out, 1);
                }
                self.ctx.emit(out, "[IMAGE: ");
                self.render_list(out, &link.label)?;
                self.ctx.emit(out, "]");
            }
            ElementKind::Emph => self.wrap(out, id, "\\fI", "\\fR")?,
            ElementKind::Strong => self.wrap(out, id, "\\fB", "\\fR")?,
            ElementKind::List => self.render_list(out, tree.children(id))?,
            ElementKind::H1
            | ElementKind::H2
            | ElementKind::H3
            | ElementKind::H4
            | ElementKind::H5
            | ElementKind::H6 => {
                let level = self.ctx.effective_level(kind.heading_level().unwrap_or(1));
                self.ctx.count(|s| s.add_heading());
                self.ctx.pad(out, 1);
                self.ctx.emit(out, &format!(".H {} \"", level));
                self.render_list(out, tree.children(id))?;
                self.ctx.emit(out, "\"");
            }
            ElementKind::Plain => {
                self.ctx.pad(out, 1);
                self.render_list(out, tree.children(id))?;
                self.ctx.set_padded(0);
            }
            ElementKind::Para => {
                self.ctx.count(|s| s.add_paragraph());
                self.ctx.pad(out, 1);
                if !self.ctx.in_list_item || !first {
                    self.ctx.emit(out, ".P\n");
                }
                self.render_list(out, tree.children(id))?;
                self.ctx.set_padded(0);
            }
            ElementKind::HRule => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "\\l'\\n(.lu*8u/10u'");
            }
            ElementKind::Verbatim => {
                let text = escape::groff(tree.text(id));
                self.ctx.pad(out, 1);
                self.ctx.emit(out, ".VERBON 2\n");
                self.ctx.emit(out, &text);
                if !text.ends_with('\n') {
                    self.ctx.emit(out, "\n");
                }
                self.ctx.emit(out, ".VERBOFF");
            }
            ElementKind::BulletList => self.render_macro_list(out, id, ".BL")?,
            ElementKind::OrderedList => self.render_macro_list(out, id, ".AL")?,
            ElementKind::DefList => self.render_macro_list(out, id, ".VL 4")?,
            ElementKind::ListItem => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, ".LI\n");
                self.render_list_item_body(out, id)?;
            }
            ElementKind::Term => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, ".LI \"");
                self.ctx.emit(out, &escape::groff(tree.text(id)));
                self.render_list(out, tree.children(id))?;
                self.ctx.emit(out, "\"\n");
                self.ctx.set_padded(1);
            }
            ElementKind::Definition => self.render_list_item_body(out, id)?,
            ElementKind::BlockQuote => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, ".DS I\n");
                self.ctx.set_padded(2);
                self.render_list(out, tree.children(id))?;
                self.ctx.pad(out, 1);
                self.ctx.emit(out, ".DE");
            }
            ElementKind::Note => match self.ctx.register_note(id) {
                NoteMark::First(_) => {
                    self.ctx.count(|s| s.add_note());
                    self.ctx.emit(out, "\\*F\n.FS\n");
                    self.ctx.set_padded(2);
                    self.render_list(out, tree.children(id))?;
                    self.ctx.pad(out, 1);
                    self.ctx.emit(out, ".FE\n");
                    self.ctx.set_padded(1);
                }
                NoteMark::Repeat(n) => self.ctx.emit(out, &format!("\\u\\s-2{}\\s+2\\d", n)),
            },
            ElementKind::Metadata => {
                for entry in metadata::entries(tree, id) {
                    self.ctx.apply_setting(&entry.key, &entry.value);
                }
            }
            ElementKind::MetaKey => {
                let key = normalize_key(tree.text(id));
                let value = tree.plain_text(tree.children(id));
                self.ctx.apply_setting(&key, value.trim());
            }
            ElementKind::Citation
            | ElementKind::NoCitation
            | ElementKind::Locator
            | ElementKind::Glossary
            | ElementKind::GlossaryTerm
            | ElementKind::GlossarySortKey
            | ElementKind::Table
            | ElementKind::TableHead
            | ElementKind::TableBody
            | ElementKind::TableRow
            | ElementKind::TableCell
            | ElementKind::CellSpan
            | ElementKind::TableCaption
            | ElementKind::TableLabel
            | ElementKind::TableSeparator => {
                return Err(Error::unhandled(self.ctx.format, kind));
            }
        }
        Ok(())
    }

    fn render_list_item_body(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let outer = self.ctx.in_list_item;
        self.ctx.in_list_item = true;
        self.ctx.set_padded(2);
        let result = self.render_list(out, self.tree.children(id));
        self.ctx.in_list_item = outer;
        result
    }

    fn render_macro_list(&mut self, out: &mut String, id: ElementId, open: &str) -> Result<()> {
        self.ctx.pad(out, 1);
        self.ctx.emit(out, open);
        // Nested list items start their own first-paragraph rule.
        let outer = self.ctx.in_list_item;
        self.ctx.in_list_item = false;
        let result = self.render_list(out, self.tree.children(id));
        self.ctx.in_list_item = outer;
        result?;
        self.ctx.pad(out, 1);
        self.ctx.emit(out, ".LE 1");
        Ok(())
    }

    fn wrap(&mut self, out: &mut String, id: ElementId, open: &str, close: &str) -> Result<()> {
        self.ctx.emit(out, open);
        self.render_list(out, self.tree.children(id))?;
        self.ctx.emit(out, close);
        Ok(())
    }

    fn typography(&mut self, out: &mut String, symbol: Typography) {
        let text = self.ctx.typography(symbol);
        self.ctx.emit(out, text);
    }
}
