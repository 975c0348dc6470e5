//! LaTeX rendering.
//!
//! [`LatexRenderer`] implements the article-class rules. The memoir and
//! beamer dialects override a handful of element kinds in their own modules
//! and hand everything else back to [`LatexRenderer::render_base`].

use super::context::{CellRole, NoteMark, RenderContext};
use super::escape;
use super::html::{cell_span, glossary_sort_key, glossary_term, link_data, note_target};
use super::label::{dimension_for_attribute, label_from_elements, label_from_fragment, label_from_text};
use super::localize::Typography;
use super::{beamer, memoir};
use crate::error::Result;
use crate::model::metadata::{self, normalize_key};
use crate::model::{Alignment, ElementId, ElementKind, ElementTree, LinkData};
use regex::Regex;
use std::sync::LazyLock;

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*<!--(.*?)-->\s*$").expect("comment pattern is valid"));

/// LaTeX document class family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatexDialect {
    /// Article class
    Article,
    /// Memoir book class
    Memoir,
    /// Beamer slides
    Beamer,
}

/// LaTeX renderer.
pub struct LatexRenderer<'a> {
    pub(crate) tree: &'a ElementTree,
    pub(crate) ctx: &'a mut RenderContext,
    dialect: LatexDialect,
}

impl<'a> LatexRenderer<'a> {
    /// Create a renderer for a dialect.
    pub fn new(tree: &'a ElementTree, ctx: &'a mut RenderContext, dialect: LatexDialect) -> Self {
        Self { tree, ctx, dialect }
    }

    /// Render the whole tree, then the bibliography and footer.
    pub fn render_document(&mut self, out: &mut String) -> Result<()> {
        self.render_list(out, self.tree.roots())?;
        self.finish(out)
    }

    /// Render a sibling run through the dialect's list walker.
    pub fn render_list(&mut self, out: &mut String, ids: &[ElementId]) -> Result<()> {
        match self.dialect {
            LatexDialect::Beamer => beamer::render_list(self, out, ids),
            LatexDialect::Article | LatexDialect::Memoir => self.render_list_base(out, ids),
        }
    }

    /// Render a sibling run one element at a time.
    pub(crate) fn render_list_base(&mut self, out: &mut String, ids: &[ElementId]) -> Result<()> {
        for id in ids {
            self.render_element(out, *id)?;
        }
        Ok(())
    }

    /// Render one element through the dialect's dispatcher.
    pub fn render_element(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        match self.dialect {
            LatexDialect::Article => self.render_base(out, id),
            LatexDialect::Memoir => memoir::render_element(self, out, id),
            LatexDialect::Beamer => beamer::render_element(self, out, id),
        }
    }

    pub(crate) fn children(&self, id: ElementId) -> &'a [ElementId] {
        self.tree.children(id)
    }

    /// Article-class rendering of one element.
    pub(crate) fn render_base(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let tree = self.tree;
        let kind = tree.kind(id);
        match kind {
            ElementKind::Space => self.ctx.emit(out, tree.text(id)),
            ElementKind::LineBreak => self.ctx.emit(out, "\\\\\n"),
            ElementKind::Str => self.ctx.emit(out, &escape::latex(tree.text(id))),
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
                let code = escape::latex(tree.text(id));
                self.ctx.emit(out, &format!("\\texttt{{{}}}", code));
            }
            ElementKind::Html => {
                if let Some(raw) = unwrap_comment(tree.text(id)) {
                    self.ctx.emit(out, raw);
                }
            }
            ElementKind::HtmlBlock => {
                if let Some(raw) = unwrap_comment(tree.text(id)) {
                    self.ctx.pad(out, 2);
                    self.ctx.emit(out, raw);
                }
            }
            ElementKind::Link => self.render_link(out, id)?,
            ElementKind::Image => {
                let link = link_data(tree, id)?;
                self.ctx.count(|s| s.add_image());
                self.ctx.emit(out, &include_graphics(link));
            }
            ElementKind::ImageBlock => self.render_figure(out, id)?,
            ElementKind::Emph => self.wrap(out, id, "\\emph{", "}")?,
            ElementKind::Strong => self.wrap(out, id, "\\textbf{", "}")?,
            ElementKind::List => self.render_list(out, tree.children(id))?,
            ElementKind::Plain => {
                self.ctx.pad(out, 1);
                self.render_list(out, tree.children(id))?;
                self.ctx.set_padded(0);
            }
            ElementKind::Para => {
                self.ctx.count(|s| s.add_paragraph());
                self.ctx.pad(out, 2);
                self.render_list(out, tree.children(id))?;
                self.ctx.set_padded(0);
            }
            ElementKind::H1
            | ElementKind::H2
            | ElementKind::H3
            | ElementKind::H4
            | ElementKind::H5
            | ElementKind::H6 => {
                let level = self.heading_level(kind);
                self.render_heading_with(out, id, article_heading(level))?;
            }
            ElementKind::HRule => {
                self.ctx.pad(out, 2);
                self.ctx
                    .emit(out, "\\begin{center}\\rule{3in}{0.4pt}\\end{center}");
            }
            ElementKind::Verbatim => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "\\begin{verbatim}\n");
                self.emit_verbatim_body(out, tree.text(id));
                self.ctx.emit(out, "\\end{verbatim}");
            }
            ElementKind::BulletList => self.render_environment(out, id, "itemize")?,
            ElementKind::OrderedList => self.render_environment(out, id, "enumerate")?,
            ElementKind::ListItem => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "\\item ");
                self.ctx.set_padded(2);
                self.render_list(out, tree.children(id))?;
                self.ctx.set_padded(0);
            }
            ElementKind::BlockQuote => self.render_environment(out, id, "quote")?,
            ElementKind::Reference
            | ElementKind::Label
            | ElementKind::TableLabel
            | ElementKind::CellSpan
            | ElementKind::TableSeparator
            | ElementKind::GlossaryTerm
            | ElementKind::GlossarySortKey => {}
            ElementKind::Note => match self.ctx.register_note(id) {
                NoteMark::First(_) => {
                    self.ctx.count(|s| s.add_note());
                    self.ctx.emit(out, "\\footnote{");
                    self.ctx.set_padded(2);
                    self.render_list(out, tree.children(id))?;
                    self.ctx.emit(out, "}");
                }
                NoteMark::Repeat(n) => self.ctx.emit(out, &format!("\\footnotemark[{}]", n)),
            },
            ElementKind::Citation => self.render_citation(out, id, None)?,
            ElementKind::Locator => {
                let citation = note_target(tree, id, ElementKind::Citation)?;
                let locator = escape::latex(tree.text(id));
                self.render_citation(out, citation, Some(&locator))?;
            }
            ElementKind::NoCitation => {
                let citation = note_target(tree, id, ElementKind::Citation)?;
                self.register_citation(citation);
                let key = tree.text(citation);
                self.ctx.emit(out, &format!("\\nocite{{{}}}", key));
            }
            ElementKind::Glossary => {
                let term = glossary_term(tree, id)?;
                if self.ctx.register_note(id).is_first() {
                    self.ctx.count(|s| s.add_glossary());
                }
                self.ctx
                    .emit(out, &format!("\\gls{{{}}}", label_from_text(&term)));
            }
            ElementKind::DefList => self.render_environment(out, id, "description")?,
            ElementKind::Term => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "\\item[");
                self.ctx.emit(out, &escape::latex(tree.text(id)));
                self.render_list(out, tree.children(id))?;
                self.ctx.emit(out, "]");
            }
            ElementKind::Definition => {
                self.ctx.pad(out, 1);
                self.ctx.set_padded(2);
                self.render_list(out, tree.children(id))?;
                self.ctx.set_padded(0);
            }
            ElementKind::Metadata => self.render_metadata(out, id)?,
            ElementKind::MetaKey => self.render_meta_key(out, id)?,
            ElementKind::MetaValue => self.ctx.emit(out, &escape::latex(tree.text(id))),
            ElementKind::Footer => self.finish(out)?,
            ElementKind::Table => self.render_table(out, id)?,
            ElementKind::TableHead => {
                self.ctx.cell_role = CellRole::Header;
                self.render_list(out, tree.children(id))?;
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "\\midrule");
                self.ctx.cell_role = CellRole::Body;
            }
            ElementKind::TableBody => {
                self.ctx.cell_role = CellRole::Body;
                self.render_list(out, tree.children(id))?;
            }
            ElementKind::TableRow => {
                self.ctx.pad(out, 1);
                self.ctx.column = 0;
                for (i, cell) in tree.children(id).iter().enumerate() {
                    if i > 0 {
                        self.ctx.emit(out, " & ");
                    }
                    self.render_element(out, *cell)?;
                }
                self.ctx.emit(out, " \\\\");
            }
            ElementKind::TableCell => {
                let span = cell_span(tree, id);
                if span > 1 {
                    let align = self.ctx.column_alignment(self.ctx.column).as_latex();
                    self.ctx
                        .emit(out, &format!("\\multicolumn{{{}}}{{{}}}{{", span, align));
                    self.render_list(out, tree.children(id))?;
                    self.ctx.emit(out, "}");
                } else {
                    self.render_list(out, tree.children(id))?;
                }
                self.ctx.column += span;
            }
            ElementKind::TableCaption => {
                self.ctx.pad(out, 1);
                self.ctx.emit(out, "\\caption{");
                self.render_list(out, tree.children(id))?;
                self.ctx.emit(out, "}");
                if let Some(label) = self.caption_label(id) {
                    self.ctx.emit(out, &format!("\n\\label{{{}}}", label));
                }
            }
            ElementKind::MathSpan => self.ctx.emit(out, tree.text(id)),
        }
        Ok(())
    }

    /// Emit the bibliography, glossary definitions and footer input once.
    pub fn finish(&mut self, out: &mut String) -> Result<()> {
        if self.ctx.footer_emitted {
            return Ok(());
        }
        self.ctx.footer_emitted = true;

        let mut citations = Vec::new();
        let mut glossary = Vec::new();
        self.collect_endnotes(&mut citations, &mut glossary)?;

        if !citations.is_empty() {
            if self.ctx.bibtex {
                // Entries come from the .bib file; a footer template
                // runs the command itself.
                if self.ctx.latex_footer.is_none() {
                    self.ctx.pad(out, 2);
                    self.ctx.emit(out, "\\bibliocommand");
                }
            } else {
                self.ctx.pad(out, 2);
                match self.dialect {
                    LatexDialect::Beamer => {
                        beamer::render_bibliography(self, out, citations, &mut glossary)?
                    }
                    LatexDialect::Article | LatexDialect::Memoir => {
                        self.render_bibliography(out, citations, &mut glossary)?
                    }
                }
            }
        }

        for entry in glossary {
            self.ctx.pad(out, 2);
            self.ctx.emit(out, &entry);
        }

        if let Some(footer) = self.ctx.latex_footer.clone() {
            self.ctx.pad(out, 2);
            self.ctx.emit(out, &format!("\\input{{{}}}", footer));
        }
        Ok(())
    }

    /// Drain the endnote queue until it stays empty. Glossary entries are
    /// rendered on the spot since their descriptions may queue more notes.
    fn collect_endnotes(&mut self, citations: &mut Vec<ElementId>, glossary: &mut Vec<String>) -> Result<()> {
        let tree = self.tree;
        while self.ctx.has_endnotes() {
            for id in self.ctx.take_endnotes() {
                match tree.kind(id) {
                    ElementKind::Citation => citations.push(id),
                    ElementKind::Glossary => glossary.push(self.glossary_entry(id)?),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// `thebibliography` environment with one `\bibitem` per citation.
    ///
    /// Citations first reached inside an entry are appended and listed too.
    pub(crate) fn render_bibliography(
        &mut self,
        out: &mut String,
        mut citations: Vec<ElementId>,
        glossary: &mut Vec<String>,
    ) -> Result<()> {
        self.ctx.emit(out, "\\begin{thebibliography}{0}");
        let mut next = 0;
        while let Some(&id) = citations.get(next) {
            self.ctx.pad(out, 1);
            self.ctx
                .emit(out, &format!("\\bibitem{{{}}}\n", self.tree.text(id)));
            self.ctx.set_padded(2);
            self.render_list(out, self.children(id))?;
            self.collect_endnotes(&mut citations, glossary)?;
            next += 1;
        }
        self.ctx.pad(out, 1);
        self.ctx.emit(out, "\\end{thebibliography}");
        Ok(())
    }

    fn glossary_entry(&mut self, id: ElementId) -> Result<String> {
        let tree = self.tree;
        let term = glossary_term(tree, id)?;
        let description: Vec<ElementId> = tree
            .children(id)
            .iter()
            .copied()
            .filter(|child| {
                !matches!(
                    tree.kind(*child),
                    ElementKind::GlossaryTerm | ElementKind::GlossarySortKey
                )
            })
            .collect();

        let padded = self.ctx.padded();
        let mut body = String::new();
        self.ctx.set_padded(2);
        self.render_list(&mut body, &description)?;
        self.ctx.set_padded(padded);

        let mut entry = format!(
            "\\newglossaryentry{{{}}}{{name={{{}}},description={{{}}}",
            label_from_text(&term),
            escape::latex(&term),
            body.trim()
        );
        if let Some(sort) = glossary_sort_key(tree, id) {
            entry.push_str(&format!(",sort={{{}}}", escape::latex(&sort)));
        }
        entry.push('}');
        Ok(entry)
    }

    /// Effective depth of a heading kind.
    pub(crate) fn heading_level(&self, kind: ElementKind) -> u8 {
        self.ctx.effective_level(kind.heading_level().unwrap_or(1))
    }

    /// Render a heading with a sectioning command such as `\section{`.
    pub(crate) fn render_heading_with(&mut self, out: &mut String, id: ElementId, open: &str) -> Result<()> {
        self.ctx.count(|s| s.add_heading());
        self.ctx.pad(out, 2);
        self.ctx.emit(out, open);
        self.render_list(out, self.children(id))?;
        self.ctx.emit(out, "}");
        self.emit_heading_label(out, id);
        Ok(())
    }

    /// Emit `\label{...}` for a heading unless anchors are disabled.
    pub(crate) fn emit_heading_label(&mut self, out: &mut String, id: ElementId) {
        if let Some(label) = self.heading_label(id) {
            self.ctx.emit(out, &format!("\n\\label{{{}}}", label));
        }
    }

    fn heading_label(&self, id: ElementId) -> Option<String> {
        let extensions = self.ctx.options.extensions;
        if extensions.compatibility {
            return None;
        }
        if let Some(label) = self.tree.first_child_of_kind(id, ElementKind::Label) {
            return Some(self.tree.text(label).to_string());
        }
        if extensions.no_labels {
            return None;
        }
        Some(label_from_elements(self.tree, self.tree.children(id)))
    }

    fn caption_label(&self, caption: ElementId) -> Option<String> {
        let extensions = self.ctx.options.extensions;
        if extensions.compatibility {
            return None;
        }
        if let Some(label) = self.tree.first_child_of_kind(caption, ElementKind::TableLabel) {
            return Some(label_from_text(self.tree.text(label)));
        }
        if extensions.no_labels {
            return None;
        }
        let label = label_from_elements(self.tree, self.tree.children(caption));
        (!label.is_empty()).then_some(label)
    }

    /// Copy a verbatim body, ending it with a newline.
    pub(crate) fn emit_verbatim_body(&mut self, out: &mut String, text: &str) {
        self.ctx.emit(out, text);
        if !text.ends_with('\n') {
            self.ctx.emit(out, "\n");
        }
    }

    fn render_link(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let tree = self.tree;
        let link = link_data(tree, id)?;
        self.ctx.count(|s| s.add_link());
        let label_text = tree.plain_text(&link.label);

        if link.is_internal() {
            let target = label_from_fragment(&link.url);
            if link.label.is_empty() {
                self.ctx.emit(out, &format!("\\autoref{{{}}}", target));
            } else {
                self.render_list(out, &link.label)?;
                self.ctx.emit(out, &format!(" (\\autoref{{{}}})", target));
            }
        } else if label_text == link.url {
            self.ctx
                .emit(out, &format!("\\url{{{}}}", escape::latex_url(&link.url)));
        } else if link.url.strip_prefix("mailto:") == Some(label_text.as_str()) {
            self.ctx.emit(
                out,
                &format!(
                    "\\href{{{}}}{{{}}}",
                    escape::latex_url(&link.url),
                    escape::latex(&label_text)
                ),
            );
        } else {
            let url = escape::latex_url(&link.url);
            self.ctx.emit(out, &format!("\\href{{{}}}{{", url));
            self.render_list(out, &link.label)?;
            self.ctx.emit(
                out,
                &format!(
                    "}}\\footnote{{\\href{{{}}}{{{}}}}}",
                    url,
                    escape::latex(&link.url)
                ),
            );
        }
        Ok(())
    }

    fn render_figure(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let link = link_data(self.tree, id)?;
        self.ctx.count(|s| s.add_image());
        self.ctx.pad(out, 2);
        self.ctx.emit(out, "\\begin{figure}[htbp]\n\\centering\n");
        self.ctx.emit(out, &include_graphics(link));
        if !link.label.is_empty() {
            self.ctx.emit(out, "\n\\caption{");
            self.render_list(out, &link.label)?;
            self.ctx.emit(out, "}");
        }
        if !link.identifier.is_empty() {
            self.ctx
                .emit(out, &format!("\n\\label{{{}}}", label_from_text(&link.identifier)));
        }
        self.ctx.emit(out, "\n\\end{figure}");
        Ok(())
    }

    fn register_citation(&mut self, citation: ElementId) {
        if !self.tree.children(citation).is_empty() && self.ctx.register_note(citation).is_first() {
            self.ctx.count(|s| s.add_citation());
        }
    }

    fn render_citation(&mut self, out: &mut String, id: ElementId, locator: Option<&str>) -> Result<()> {
        self.register_citation(id);
        let key = self.tree.text(id);
        let cite = match locator {
            Some(locator) => format!("~\\cite[{}]{{{}}}", locator, key),
            None => format!("~\\cite{{{}}}", key),
        };
        self.ctx.emit(out, &cite);
        Ok(())
    }

    fn render_environment(&mut self, out: &mut String, id: ElementId, name: &str) -> Result<()> {
        self.ctx.pad(out, 1);
        self.ctx.emit(out, &format!("\\begin{{{}}}", name));
        self.render_list(out, self.children(id))?;
        self.ctx.pad(out, 1);
        self.ctx.emit(out, &format!("\\end{{{}}}", name));
        Ok(())
    }

    fn render_metadata(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        if !self.ctx.complete_document {
            for entry in metadata::entries(self.tree, id) {
                self.ctx.apply_setting(&entry.key, &entry.value);
            }
            return Ok(());
        }
        self.render_list(out, self.children(id))?;
        self.ctx.set_padded(1);
        Ok(())
    }

    fn render_meta_key(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let tree = self.tree;
        let key = normalize_key(tree.text(id));
        let value = tree.plain_text(tree.children(id)).trim().to_string();

        if self.ctx.apply_setting(&key, &value) {
            return Ok(());
        }
        let line = match key.as_str() {
            "title" => format!("\\def\\mytitle{{{}}}\n", escape::latex(&value)),
            "author" => format!("\\def\\myauthor{{{}}}\n", escape::latex(&value)),
            "latexinput" => format!("\\input{{{}}}\n", value),
            "latexinclude" => format!("\\include{{{}}}\n", value),
            "latexfooter" => {
                self.ctx.latex_footer = Some(value);
                return Ok(());
            }
            "bibtex" => {
                self.ctx.bibtex = true;
                format!("\\def\\bibliocommand{{\\bibliography{{{}}}}}\n", value)
            }
            "css" | "xhtmlheader" => return Ok(()),
            _ => {
                let name: String = key.chars().filter(|c| c.is_ascii_alphabetic()).collect();
                format!("\\def\\my{}{{{}}}\n", name, escape::latex(&value))
            }
        };
        self.ctx.emit(out, &line);
        Ok(())
    }

    fn render_table(&mut self, out: &mut String, id: ElementId) -> Result<()> {
        let tree = self.tree;
        let alignment = tree
            .find_child(id, ElementKind::TableSeparator)
            .map(|sep| Alignment::parse_separator(tree.text(sep)))
            .unwrap_or_default();
        let spec: String = alignment.iter().map(|a| a.as_latex()).collect();
        self.ctx.count(|s| s.add_table());
        self.ctx.begin_table(alignment);

        self.ctx.pad(out, 2);
        self.ctx.emit(
            out,
            &format!(
                "\\begin{{table}}[htbp]\n\\begin{{minipage}}{{\\linewidth}}\n\\centering\n\\begin{{tabulary}}{{\\linewidth}}{{@{{}}{}@{{}}}} \\toprule",
                spec
            ),
        );

        let mut bodies = 0;
        for child in tree.children(id) {
            match tree.kind(*child) {
                ElementKind::TableCaption => {}
                ElementKind::TableBody => {
                    if bodies > 0 {
                        self.ctx.pad(out, 1);
                        self.ctx.emit(out, "\\midrule");
                    }
                    bodies += 1;
                    self.render_element(out, *child)?;
                }
                _ => self.render_element(out, *child)?,
            }
        }

        self.ctx.pad(out, 1);
        self.ctx.emit(out, "\\bottomrule\n\\end{tabulary}");
        if let Some(caption) = tree.find_child(id, ElementKind::TableCaption) {
            self.render_element(out, caption)?;
        }
        self.ctx.pad(out, 1);
        self.ctx.emit(out, "\\end{minipage}\n\\end{table}");
        self.ctx.end_table();
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
}

/// Article-class sectioning command for a depth.
fn article_heading(level: u8) -> &'static str {
    match level {
        1 => "\\section{",
        2 => "\\subsection{",
        3 => "\\subsubsection{",
        4 => "\\paragraph{",
        5 => "\\subparagraph{",
        _ => "{\\itshape ",
    }
}

/// Body of an HTML comment, which carries raw LaTeX.
fn unwrap_comment(html: &str) -> Option<&str> {
    HTML_COMMENT
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn include_graphics(link: &LinkData) -> String {
    let mut options = Vec::new();
    for key in ["width", "height"] {
        if let Some(value) = link.attribute(key) {
            match dimension_for_attribute(value) {
                Some(dimension) => options.push(format!("{}={}", key, dimension)),
                None => log::warn!("dropping image {} `{}`: not a dimension", key, value),
            }
        }
    }
    if options.len() == 1 {
        options.push("keepaspectratio".to_string());
    }
    if options.is_empty() {
        format!("\\includegraphics{{{}}}", link.url)
    } else {
        format!("\\includegraphics[{}]{{{}}}", options.join(","), link.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{OutputFormat, RenderOptions};

    fn render(tree: &ElementTree) -> String {
        let mut ctx = RenderContext::new(OutputFormat::Latex, &RenderOptions::default());
        ctx.complete_document = metadata::requests_complete_document(tree);
        let mut out = String::new();
        LatexRenderer::new(tree, &mut ctx, LatexDialect::Article)
            .render_document(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_heading_with_label() {
        let mut tree = ElementTree::new();
        let h = tree.heading(2, "Getting Started");
        let p = tree.para("50% done");
        tree.set_roots(vec![h, p]);

        assert_eq!(
            render(&tree),
            "\\subsection{Getting Started}\n\\label{getting-started}\n\n50\\% done"
        );
    }

    #[test]
    fn test_deepest_heading_is_italic() {
        let mut tree = ElementTree::new();
        let h = tree.heading(6, "Aside");
        tree.push_root(h);
        assert_eq!(render(&tree), "{\\itshape Aside}\n\\label{aside}");
    }

    #[test]
    fn test_link_forms() {
        let mut tree = ElementTree::new();
        let bare_label = tree.words("http://x.org");
        let bare = tree.push_link(ElementKind::Link, LinkData::new("http://x.org", bare_label));
        let mail_label = tree.words("me@x.org");
        let mail = tree.push_link(ElementKind::Link, LinkData::new("mailto:me@x.org", mail_label));
        let text_label = tree.words("site");
        let general = tree.push_link(ElementKind::Link, LinkData::new("http://x.org/#top", text_label));
        let internal_label = tree.words("see");
        let internal = tree.push_link(ElementKind::Link, LinkData::new("#Intro", internal_label));
        tree.set_roots(vec![bare, mail, general, internal]);

        let out = render(&tree);
        assert!(out.contains("\\url{http://x.org}"));
        assert!(out.contains("\\href{mailto:me@x.org}{me@x.org}"));
        assert!(out.contains(
            "\\href{http://x.org/\\#top}{site}\\footnote{\\href{http://x.org/\\#top}{http:\\slash{}\\slash{}x.org\\slash{}\\#top}}"
        ));
        assert!(out.contains("see (\\autoref{intro})"));
    }

    #[test]
    fn test_repeated_footnote_uses_mark() {
        let mut tree = ElementTree::new();
        let body = tree.para("Note body");
        let note = tree.node(ElementKind::Note, vec![body]);
        let a = tree.str("A");
        let b = tree.str("B");
        let p = tree.node(ElementKind::Para, vec![a, note, b, note]);
        tree.push_root(p);

        assert_eq!(render(&tree), "A\\footnote{Note body}B\\footnotemark[1]");
    }

    #[test]
    fn test_html_comment_is_unwrapped() {
        let mut tree = ElementTree::new();
        let comment = tree.leaf(ElementKind::HtmlBlock, "<!-- \\newpage -->");
        let div = tree.leaf(ElementKind::HtmlBlock, "<div>x</div>");
        tree.set_roots(vec![comment, div]);
        assert_eq!(render(&tree), "\\newpage");
    }

    #[test]
    fn test_metadata_macros_and_footer() {
        let mut tree = ElementTree::new();
        let meta = tree.metadata(&[
            ("Title", "A & B"),
            ("Author", "Ann"),
            ("LaTeX Footer", "mmd-footer"),
            ("Copyright", "2024"),
        ]);
        let p = tree.para("Body");
        tree.set_roots(vec![meta, p]);

        assert_eq!(
            render(&tree),
            "\\def\\mytitle{A \\& B}\n\\def\\myauthor{Ann}\n\\def\\mycopyright{2024}\n\nBody\n\n\\input{mmd-footer}"
        );
    }

    #[test]
    fn test_image_dimensions() {
        let link = LinkData::new("pic.png", vec![])
            .with_attribute("width", "50%")
            .with_attribute("height", "bogus");
        assert_eq!(
            include_graphics(&link),
            "\\includegraphics[width=0.5\\textwidth,keepaspectratio]{pic.png}"
        );
        assert_eq!(
            include_graphics(&LinkData::new("pic.png", vec![])),
            "\\includegraphics{pic.png}"
        );
    }
}
