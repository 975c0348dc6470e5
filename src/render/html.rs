//! XHTML rendering.

use super::context::{CellRole, NoteMark, RenderContext};
use super::escape;
use super::label::{label_from_elements, label_from_text};
use super::localize::Typography;
use crate::error::{Error, Result};
use crate::model::metadata::{self, normalize_key};
use crate::model::{Alignment, ElementId, ElementKind, ElementTree, LinkData};

const HTML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n\
<html xmlns=\"http://www.w3.org/1999/xhtml\">\n<head>\n";

const HTML_FOOTER: &str = "\n</body>\n</html>";

/// HTML renderer.
pub struct HtmlRenderer<'a> {
    tree: &'a ElementTree,
    ctx: &'a mut RenderContext,
    obfuscate: bool,
}

impl<'a> HtmlRenderer<'a> {
    /// Create a renderer over a tree and a fresh context.
    pub fn new(tree: &'a ElementTree, ctx: &'a mut RenderContext) -> Self {
        Self {
            tree,
            ctx,
            obfuscate: false,
        }
    }

    /// Render the whole tree, then endnotes and the footer.
    pub fn render_document(&mut self, out: &mut String) -> Result<()> {
        self.render_list(out, self.tree.roots())?;
        self.finish(out)
    }

    /// Render a sibling run.
    pub fn render_list(&mut self, out: &mut String, ids: &[ElementId]) -> Result<()> {
        for id in ids {
            self.render_element(out, *id)?;
        }
        Ok(())
    }

    /// Render one element.
    pub fn render_element(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let tree = self.tree;
        let kind = tree.kind(id);
        match kind {
            ElementKind::Space => self.ctx.emit(out, tree.text(id)),
            ElementKind::LineBreak => self.ctx.emit(out, "<br/>\n"),
            ElementKind::Str => {
                let text = self.escape(tree.text(id));
                self.ctx.emit(out, &text);
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
                let code = self.escape(tree.text(id));
                self.ctx.emit(out, &format!("<code>{}</code>", code));
            }
            ElementKind::Html => {
                if !self.ctx.options.extensions.filter_html {
                    self.ctx.emit(out, tree.text(id));
                }
            }
            ElementKind::Link => self.render_link(out, id)?,
            ElementKind::Image => {
                let link = link_data(tree, id)?;
                self.ctx.count(|s| s.add_image());
                let img = self.image_tag(link);
                self.ctx.emit(out, &img);
            }
            ElementKind::ImageBlock => self.render_figure(out, id)?,
            ElementKind::Emph => self.wrap(out, id, "<em>", "</em>")?,
            ElementKind::Strong => self.wrap(out, id, "<strong>", "</strong>")?,
            ElementKind::List => self.render_list(out, tree.children(id))?,
            ElementKind::Plain => {
                self.ctx.pad(out, 1);
                self.render_list(out, tree.children(id))?;
                self.ctx.set_padded(0);
            }
            ElementKind::Para => {
                self.ctx.count(|s| s.add_paragraph());
                self.ctx.pad(out, 2);
                self.ctx.emit(out, "<p>");
                self.render_list(out, tree.children(id))?;
                self.ctx.emit(out, "</p>");
            }
            ElementKind::H1
            | ElementKind::H2
            | ElementKind::H3
            | ElementKind::H4
            | ElementKind::H5
            | ElementKind::H6 => self.render_heading(out, id, kind)?,
            ElementKind::HRule => {
                self.ctx.pad(out, 2);
                self.ctx.emit(out, "<hr />");
            }
            ElementKind::HtmlBlock => {
                let html = tree.text(id);
                if !self.filtered(html) {
                    self.ctx.pad(out, 2);
                    self.ctx.emit(out, html);
                }
            }
            ElementKind::Verbatim => {
                self.ctx.pad(out, 2);
                let code = self.escape(tree.text(id));
                self.ctx.emit(out, &format!("<pre><code>{}</code></pre>", code));
            }
            ElementKind::BulletList => self.render_block_list(out, id, "<ul>", "</ul>")?,
            ElementKind::OrderedList => self.render_block_list(out, id, "<ol>", "</ol>")?,
            ElementKind::ListItem => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "<li>");
                self.ctx.set_padded(2);
                self.render_list(out, tree.children(id))?;
                self.ctx.emit(out, "</li>");
            }
            ElementKind::BlockQuote => {
                self.ctx.pad(out, 2);
                self.ctx.emit(out, "<blockquote>\n");
                self.ctx.set_padded(2);
                self.render_list(out, tree.children(id))?;
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "</blockquote>");
            }
            ElementKind::Reference
            | ElementKind::Label
            | ElementKind::TableLabel
            | ElementKind::CellSpan
            | ElementKind::TableSeparator
            | ElementKind::GlossarySortKey => {}
            ElementKind::Note => {
                let mark = self.ctx.register_note(id);
                if mark.is_first() {
                    self.ctx.count(|s| s.add_note());
                }
                let n = mark.number();
                let anchor = match mark {
                    NoteMark::First(_) => format!(
                        "<a href=\"#fn:{n}\" id=\"fnref:{n}\" title=\"see footnote\" class=\"footnote\">[{n}]</a>"
                    ),
                    NoteMark::Repeat(_) => format!(
                        "<a href=\"#fn:{n}\" title=\"see footnote\" class=\"footnote\">[{n}]</a>"
                    ),
                };
                self.ctx.emit(out, &anchor);
            }
            ElementKind::Citation => self.render_citation(out, id, None)?,
            ElementKind::Locator => {
                let citation = note_target(tree, id, ElementKind::Citation)?;
                let locator = self.escape(tree.text(id));
                self.render_citation(out, citation, Some(&locator))?;
            }
            ElementKind::NoCitation => {
                let citation = note_target(tree, id, ElementKind::Citation)?;
                if !tree.children(citation).is_empty() && self.ctx.register_note(citation).is_first() {
                    self.ctx.count(|s| s.add_citation());
                }
            }
            ElementKind::Glossary => {
                let term = glossary_term(tree, id)?;
                let mark = self.ctx.register_note(id);
                if mark.is_first() {
                    self.ctx.count(|s| s.add_glossary());
                }
                let n = mark.number();
                let term = self.escape(&term);
                let anchor = match mark {
                    NoteMark::First(_) => format!(
                        "<a href=\"#fn:{n}\" id=\"fnref:{n}\" title=\"see glossary\" class=\"footnote glossary\">{term}</a>"
                    ),
                    NoteMark::Repeat(_) => format!(
                        "<a href=\"#fn:{n}\" title=\"see glossary\" class=\"footnote glossary\">{term}</a>"
                    ),
                };
                self.ctx.emit(out, &anchor);
            }
            ElementKind::GlossaryTerm => {
                let term = self.escape(tree.text(id));
                self.ctx
                    .emit(out, &format!("<span class=\"glossary name\">{}</span>:\n", term));
                self.ctx.set_padded(2);
            }
            ElementKind::DefList => {
                self.ctx.pad(out, 2);
                self.ctx.emit(out, "<dl>");
                self.render_list(out, tree.children(id))?;
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "</dl>");
            }
            ElementKind::Term => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "<dt>");
                let text = self.escape(tree.text(id));
                self.ctx.emit(out, &text);
                self.render_list(out, tree.children(id))?;
                self.ctx.emit(out, "</dt>");
            }
            ElementKind::Definition => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "<dd>");
                self.ctx.set_padded(2);
                self.render_list(out, tree.children(id))?;
                self.ctx.emit(out, "</dd>");
            }
            ElementKind::Metadata => self.render_metadata(out, id)?,
            ElementKind::MetaKey => self.render_meta_key(out, id)?,
            ElementKind::MetaValue => {
                let text = self.escape(tree.text(id));
                self.ctx.emit(out, &text);
            }
            ElementKind::Footer => self.finish(out)?,
            ElementKind::Table => self.render_table(out, id)?,
            ElementKind::TableHead => self.render_table_section(out, id, "thead", CellRole::Header)?,
            ElementKind::TableBody => self.render_table_section(out, id, "tbody", CellRole::Body)?,
            ElementKind::TableRow => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "<tr>");
                self.ctx.column = 0;
                self.render_list(out, tree.children(id))?;
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "</tr>");
            }
            ElementKind::TableCell => self.render_cell(out, id)?,
            ElementKind::TableCaption => {
                self.ctx.pad(out, 1);
                match tree.first_child_of_kind(id, ElementKind::TableLabel) {
                    Some(label) if !self.ctx.options.extensions.compatibility => {
                        let label = label_from_text(tree.text(label));
                        self.ctx.emit(out, &format!("<caption id=\"{}\">", label));
                    }
                    _ => self.ctx.emit(out, "<caption>"),
                }
                self.render_list(out, tree.children(id))?;
                self.ctx.emit(out, "</caption>");
            }
            ElementKind::MathSpan => {
                let math = self.escape(tree.text(id));
                self.ctx
                    .emit(out, &format!("<span class=\"math\">{}</span>", math));
            }
        }
        Ok(())
    }

    fn children(&self, id: ElementId) -> &'a [ElementId] {
        self.tree.children(id)
    }

    /// Flush endnotes and the document footer once.
    pub fn finish(&mut self, out: &mut String) -> Result<()> {
        if self.ctx.footer_emitted {
            return Ok(());
        }
        self.ctx.footer_emitted = true;

        if self.ctx.has_endnotes() {
            self.ctx.pad(out, 2);
            self.render_endnotes(out)?;
        }
        if self.ctx.complete_document {
            self.ctx.emit(out, HTML_FOOTER);
        }
        Ok(())
    }

    fn render_endnotes(&mut self, out: &mut String) -> Result<()> {
        self.ctx
            .emit(out, "<div class=\"footnotes\">\n<hr />\n<ol>");
        // Endnote bodies may reference further notes; keep draining.
        while self.ctx.has_endnotes() {
            for id in self.ctx.take_endnotes() {
                let n = self.ctx.note_number(id).unwrap_or_default();
                self.ctx.pad(out, 1);
                self.ctx.emit(out, &format!("<li id=\"fn:{}\">\n", n));
                self.ctx.set_padded(2);
                self.render_list(out, self.children(id))?;
                self.ctx.emit(
                    out,
                    &format!(
                        " <a href=\"#fnref:{}\" title=\"return to article\" class=\"reversefootnote\">&#160;&#8617;</a>",
                        n
                    ),
                );
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "</li>");
            }
        }
        self.ctx.pad(out, 1);
        self.ctx.emit(out, "</ol>\n</div>");
        Ok(())
    }

    fn render_heading(&mut self, out: &mut String, id: ElementId, kind: ElementKind) -> Result<()> {
        let tree = self.tree;
        let level = self.ctx.effective_level(kind.heading_level().unwrap_or(1));
        self.ctx.count(|s| s.add_heading());
        self.ctx.pad(out, 2);

        let extensions = self.ctx.options.extensions;
        let children = tree.children(id);
        let anchor = if extensions.compatibility {
            None
        } else if let Some(label) = tree.first_child_of_kind(id, ElementKind::Label) {
            Some(tree.text(label).to_string())
        } else if extensions.no_labels {
            None
        } else {
            Some(label_from_elements(tree, children))
        };

        match anchor {
            Some(anchor) => self
                .ctx
                .emit(out, &format!("<h{} id=\"{}\">", level, escape::html(&anchor))),
            None => self.ctx.emit(out, &format!("<h{}>", level)),
        }
        self.render_list(out, children)?;
        self.ctx.emit(out, &format!("</h{}>", level));
        Ok(())
    }

    fn render_link(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let link = link_data(self.tree, id)?;
        self.ctx.count(|s| s.add_link());

        let saved = self.obfuscate;
        if link.url.starts_with("mailto:") {
            self.obfuscate = true;
        }

        let mut tag = format!("<a href=\"{}\"", self.escape(&link.url));
        if !link.title.is_empty() {
            tag.push_str(&format!(" title=\"{}\"", self.escape(&link.title)));
        }
        for attribute in &link.attributes {
            tag.push_str(&format!(
                " {}=\"{}\"",
                escape::html(&attribute.key),
                escape::html(&attribute.value)
            ));
        }
        tag.push('>');
        self.ctx.emit(out, &tag);
        self.render_list(out, &link.label)?;
        self.ctx.emit(out, "</a>");

        self.obfuscate = saved;
        Ok(())
    }

    fn image_tag(&mut self, link: &LinkData) -> String {
        let mut tag = format!("<img src=\"{}\"", self.escape(&link.url));
        let alt = self.escape(&self.tree.plain_text(&link.label));
        tag.push_str(&format!(" alt=\"{}\"", alt));
        if !link.identifier.is_empty() {
            tag.push_str(&format!(" id=\"{}\"", escape::html(&link.identifier)));
        }
        if !link.title.is_empty() {
            tag.push_str(&format!(" title=\"{}\"", self.escape(&link.title)));
        }
        for attribute in &link.attributes {
            tag.push_str(&format!(
                " {}=\"{}\"",
                escape::html(&attribute.key),
                escape::html(&attribute.value)
            ));
        }
        tag.push_str(" />");
        tag
    }

    fn render_figure(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let link = link_data(self.tree, id)?;
        self.ctx.count(|s| s.add_image());
        self.ctx.pad(out, 2);
        self.ctx.emit(out, "<figure>\n");
        let img = self.image_tag(link);
        self.ctx.emit(out, &img);
        if !link.label.is_empty() {
            self.ctx.emit(out, "\n<figcaption>");
            self.render_list(out, &link.label)?;
            self.ctx.emit(out, "</figcaption>");
        }
        self.ctx.emit(out, "\n</figure>");
        Ok(())
    }

    fn render_citation(&mut self, out: &mut String, id: ElementId, locator: Option<&str>) -> Result<()> {
        let tree = self.tree;
        if tree.children(id).is_empty() {
            // Resolved outside the document (BibTeX), so not numbered.
            let key = self.escape(tree.text(id));
            let text = match locator {
                Some(locator) => format!("<span class=\"externalcitation\">[{}][{}]</span>", locator, key),
                None => format!("<span class=\"externalcitation\">[{}]</span>", key),
            };
            self.ctx.emit(out, &text);
            return Ok(());
        }

        let mark = self.ctx.register_note(id);
        if mark.is_first() {
            self.ctx.count(|s| s.add_citation());
        }
        let n = mark.number();
        let id_attr = match mark {
            NoteMark::First(_) => format!(" id=\"fnref:{}\"", n),
            NoteMark::Repeat(_) => String::new(),
        };
        let body = match locator {
            Some(locator) => format!("[<span class=\"locator\">{}</span>, {}]", locator, n),
            None => format!("[{}]", n),
        };
        self.ctx.emit(
            out,
            &format!(
                "<a class=\"citation\"{} href=\"#fn:{}\" title=\"Jump to citation {}\">{}</a>",
                id_attr, n, n, body
            ),
        );
        Ok(())
    }

    fn render_block_list(&mut self, out: &mut String, id: ElementId, open: &str, close: &str) -> Result<()> {
        self.ctx.pad(out, 2);
        self.ctx.emit(out, open);
        self.render_list(out, self.children(id))?;
        self.ctx.pad(out, 1);
        self.ctx.emit(out, close);
        Ok(())
    }

    fn render_metadata(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        if !self.ctx.complete_document {
            // Only settings matter for a fragment.
            for entry in metadata::entries(self.tree, id) {
                self.ctx.apply_setting(&entry.key, &entry.value);
            }
            return Ok(());
        }
        self.ctx.emit(out, HTML_HEADER);
        self.render_list(out, self.children(id))?;
        self.ctx.emit(out, "</head>\n<body>\n");
        self.ctx.set_padded(2);
        Ok(())
    }

    fn render_meta_key(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let tree = self.tree;
        let key = normalize_key(tree.text(id));
        let value = tree.plain_text(tree.children(id)).trim().to_string();

        if self.ctx.apply_setting(&key, &value) {
            return Ok(());
        }
        match key.as_str() {
            "title" => {
                let title = self.escape(&value);
                self.ctx.emit(out, &format!("\t<title>{}</title>\n", title));
            }
            "css" => {
                let href = self.escape(&value);
                self.ctx.emit(
                    out,
                    &format!("\t<link type=\"text/css\" rel=\"stylesheet\" href=\"{}\"/>\n", href),
                );
            }
            "xhtmlheader" => self.ctx.emit(out, &format!("{}\n", value)),
            "latexinput" | "latexinclude" | "latexfooter" | "bibtex" => {}
            _ => {
                let name = self.escape(&key);
                let content = self.escape(&value);
                self.ctx.emit(
                    out,
                    &format!("\t<meta name=\"{}\" content=\"{}\"/>\n", name, content),
                );
            }
        }
        Ok(())
    }

    fn render_table(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let tree = self.tree;
        let alignment = tree
            .find_child(id, ElementKind::TableSeparator)
            .map(|sep| Alignment::parse_separator(tree.text(sep)))
            .unwrap_or_default();
        self.ctx.count(|s| s.add_table());
        self.ctx.begin_table(alignment);

        self.ctx.pad(out, 2);
        self.ctx.emit(out, "<table>");
        if let Some(caption) = tree.find_child(id, ElementKind::TableCaption) {
            self.render_element(out, caption)?;
        }
        for child in tree.children(id) {
            if tree.kind(*child) != ElementKind::TableCaption {
                self.render_element(out, *child)?;
            }
        }
        self.ctx.pad(out, 1);
        self.ctx.emit(out, "</table>");
        self.ctx.end_table();
        Ok(())
    }

    fn render_table_section(
        &mut self,
        out: &mut String,
        id: ElementId,
        tag: &str,
        role: CellRole,
    ) -> Result<()> {
        self.ctx.cell_role = role;
        self.ctx.pad(out, 1);
        self.ctx.emit(out, &format!("<{}>", tag));
        self.render_list(out, self.children(id))?;
        self.ctx.pad(out, 1);
        self.ctx.emit(out, &format!("</{}>", tag));
        self.ctx.cell_role = CellRole::Body;
        Ok(())
    }

    fn render_cell(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let tree = self.tree;
        let tag = match self.ctx.cell_role {
            CellRole::Header => "th",
            CellRole::Body => "td",
        };
        let span = cell_span(tree, id);
        let align = self.ctx.column_alignment(self.ctx.column).as_html();

        self.ctx.pad(out, 1);
        let mut open = format!("\t<{} align=\"{}\"", tag, align);
        if span > 1 {
            open.push_str(&format!(" colspan=\"{}\"", span));
        }
        open.push('>');
        self.ctx.emit(out, &open);
        self.render_list(out, tree.children(id))?;
        self.ctx.emit(out, &format!("</{}>", tag));
        self.ctx.column += span;
        Ok(())
    }

    fn wrap(&mut self, out: &mut String, id: ElementId, open: &str, close: &str) -> Result<()> {
        self.ctx.emit(out, open);
        self.render_list(out, self.children(id))?;
        self.ctx.emit(out, close);
        Ok(())
    }

    fn typography(&mut self, out: &mut String, symbol: Typography) {
        let text = self.ctx.typography(symbol);
        self.ctx.emit(out, text);
    }

    fn escape(&mut self, text: &str) -> String {
        if self.obfuscate {
            escape::html_obfuscated(text, &mut self.ctx.rng)
        } else {
            escape::html(text)
        }
    }

    fn filtered(&self, html: &str) -> bool {
        let extensions = self.ctx.options.extensions;
        let is_style = html.trim_start().to_ascii_lowercase().starts_with("<style");
        if is_style {
            extensions.filter_styles
        } else {
            extensions.filter_html
        }
    }
}

/// Link payload of a link or image element.
pub(crate) fn link_data(tree: &ElementTree, id: ElementId) -> Result<&LinkData> {
    tree.link(id)
        .ok_or_else(|| Error::malformed(tree.kind(id), "missing link target"))
}

/// The shared node a per-site wrapper points at.
pub(crate) fn note_target(tree: &ElementTree, id: ElementId, kind: ElementKind) -> Result<ElementId> {
    tree.first_child_of_kind(id, kind).ok_or_else(|| {
        Error::malformed(tree.kind(id), format!("missing `{}` target", kind))
    })
}

/// Term text of a glossary entry.
pub(crate) fn glossary_term(tree: &ElementTree, id: ElementId) -> Result<String> {
    let term = tree
        .find_child(id, ElementKind::GlossaryTerm)
        .ok_or_else(|| Error::malformed(ElementKind::Glossary, "missing glossary term"))?;
    let text = tree.text(term);
    if text.is_empty() {
        Ok(tree.plain_text(tree.children(term)))
    } else {
        Ok(text.to_string())
    }
}

/// Sort key of a glossary entry, if any.
pub(crate) fn glossary_sort_key(tree: &ElementTree, id: ElementId) -> Option<String> {
    tree.find_child(id, ElementKind::GlossarySortKey)
        .map(|key| tree.text(key).to_string())
}

/// Number of columns a cell spans.
pub(crate) fn cell_span(tree: &ElementTree, cell: ElementId) -> usize {
    tree.first_child_of_kind(cell, ElementKind::CellSpan)
        .map(|span| 1 + tree.text(span).chars().count())
        .unwrap_or(1)
}
