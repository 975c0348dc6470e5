//! LaTeX rendering for beamer slides.
//!
//! Heading sections become the slide structure: depth 1 is a `\part`,
//! depth 2 a `\section`, depth 3 a frame and anything deeper a block
//! inside the frame.

use super::context::MAX_HEADING_LEVEL;
use super::latex::LatexRenderer;
use super::sections::{outline, Section};
use crate::error::Result;
use crate::model::ElementId;

/// Render a sibling run, grouping heading sections into frames.
pub(crate) fn render_list(r: &mut LatexRenderer<'_>, out: &mut String, ids: &[ElementId]) -> Result<()> {
    let tree = r.tree;
    let grouped = outline(ids, MAX_HEADING_LEVEL, |id| {
        let kind = tree.kind(id);
        kind.is_heading().then(|| r.heading_level(kind))
    });

    r.render_list_base(out, &grouped.preamble)?;
    for section in &grouped.sections {
        render_section(r, out, section)?;
    }
    Ok(())
}

/// Render one element; headings reached outside a sibling run get an
/// empty section of their own.
pub(crate) fn render_element(r: &mut LatexRenderer<'_>, out: &mut String, id: ElementId) -> Result<()> {
    let kind = r.tree.kind(id);
    if kind.is_heading() {
        let section = Section {
            heading: id,
            level: r.heading_level(kind),
            body: Vec::new(),
            subsections: Vec::new(),
        };
        return render_section(r, out, &section);
    }
    r.render_base(out, id)
}

fn render_section(r: &mut LatexRenderer<'_>, out: &mut String, section: &Section) -> Result<()> {
    let heading = section.heading;
    match section.level {
        1 => {
            r.render_heading_with(out, heading, "\\part{")?;
            render_contents(r, out, section)?;
        }
        2 => {
            r.render_heading_with(out, heading, "\\section{")?;
            render_contents(r, out, section)?;
        }
        3 => {
            r.ctx.count(|s| s.add_heading());
            r.ctx.pad(out, 2);
            r.ctx.emit(out, "\\begin{frame}[fragile]");
            r.ctx.pad(out, 1);
            r.ctx.emit(out, "\\frametitle{");
            r.render_list(out, r.children(heading))?;
            r.ctx.emit(out, "}");
            r.emit_heading_label(out, heading);
            render_contents(r, out, section)?;
            r.ctx.pad(out, 2);
            r.ctx.emit(out, "\\end{frame}");
        }
        _ => {
            r.ctx.count(|s| s.add_heading());
            r.ctx.pad(out, 2);
            r.ctx.emit(out, "\\begin{block}{");
            r.render_list(out, r.children(heading))?;
            r.ctx.emit(out, "}");
            render_contents(r, out, section)?;
            r.ctx.pad(out, 1);
            r.ctx.emit(out, "\\end{block}");
        }
    }
    Ok(())
}

fn render_contents(r: &mut LatexRenderer<'_>, out: &mut String, section: &Section) -> Result<()> {
    r.render_list_base(out, &section.body)?;
    for subsection in &section.subsections {
        render_section(r, out, subsection)?;
    }
    Ok(())
}

/// Place the bibliography in a frame that may break across slides.
pub(crate) fn render_bibliography(
    r: &mut LatexRenderer<'_>,
    out: &mut String,
    citations: Vec<ElementId>,
    glossary: &mut Vec<String>,
) -> Result<()> {
    r.ctx.emit(
        out,
        "\\part{Bibliography}\n\\begin{frame}[allowframebreaks]\n\\frametitle{Bibliography}\n\\def\\newblock{}\n",
    );
    r.render_bibliography(out, citations, glossary)?;
    r.ctx.pad(out, 1);
    r.ctx.emit(out, "\\end{frame}");
    Ok(())
}
