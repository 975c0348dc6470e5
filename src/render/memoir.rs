//! LaTeX rendering for the memoir book class.
//!
//! Only sectioning and code blocks differ from the article rules.

use super::latex::LatexRenderer;
use crate::error::Result;
use crate::model::{ElementId, ElementKind};

/// Render one element, delegating to the article rules where memoir agrees.
pub(crate) fn render_element(r: &mut LatexRenderer<'_>, out: &mut String, id: ElementId) -> Result<()> {
    let kind = r.tree.kind(id);
    match kind {
        ElementKind::H1
        | ElementKind::H2
        | ElementKind::H3
        | ElementKind::H4
        | ElementKind::H5
        | ElementKind::H6 => {
            let level = r.heading_level(kind);
            r.render_heading_with(out, id, heading_command(level))
        }
        ElementKind::Verbatim => {
            let tree = r.tree;
            let text = tree.text(id);
            r.ctx.pad(out, 1);
            r.ctx
                .emit(out, "\\begin{adjustwidth}{2.5em}{2.5em}\n\\begin{verbatim}\n");
            r.emit_verbatim_body(out, text);
            r.ctx.emit(out, "\\end{verbatim}\n\\end{adjustwidth}");
            Ok(())
        }
        _ => r.render_base(out, id),
    }
}

fn heading_command(level: u8) -> &'static str {
    match level {
        1 => "\\part{",
        2 => "\\chapter{",
        3 => "\\section{",
        4 => "\\subsection{",
        5 => "\\subsubsection{",
        _ => "\\paragraph{",
    }
}
