//! Rendering of element trees into the supported output formats.
//!
//! Each format has its own emitter sharing one [`RenderContext`] per call.
//! The memoir and beamer dialects wrap the article LaTeX emitter and hand
//! every kind they do not override back to it.

mod beamer;
pub mod context;
pub mod escape;
mod groff;
mod html;
pub mod label;
mod latex;
pub mod localize;
mod memoir;
mod opml;
mod options;
mod result;
pub mod sections;

pub use context::{NoteMark, RenderContext};
pub use groff::GroffRenderer;
pub use html::HtmlRenderer;
pub use label::{dimension_for_attribute, label_from_elements, label_from_text};
pub use latex::{LatexDialect, LatexRenderer};
pub use localize::{localize, Language, OutputFamily, Typography};
pub use opml::OpmlRenderer;
pub use options::{Extensions, OutputFormat, RenderOptions};
pub use result::{RenderResult, RenderStats};

use crate::error::Result;
use crate::model::{metadata, ElementTree};
use rayon::prelude::*;

/// Format that will actually be produced for a request.
///
/// A LaTeX-family request follows the document's `latexmode` metadata, so
/// a document can ask for memoir or beamer output on its own.
pub fn resolve_format(tree: &ElementTree, requested: OutputFormat) -> OutputFormat {
    if !requested.is_latex() {
        return requested;
    }
    let Some(mode) = metadata::extract(tree, "latexmode") else {
        return requested;
    };
    let resolved = match mode.trim().to_lowercase().as_str() {
        "memoir" => OutputFormat::Memoir,
        "beamer" => OutputFormat::Beamer,
        "latex" | "article" => OutputFormat::Latex,
        other => {
            log::warn!("ignoring unknown latex mode `{}`", other);
            requested
        }
    };
    if resolved != requested {
        log::debug!("latex mode metadata switches {} to {}", requested, resolved);
    }
    resolved
}

/// Render a tree to a string.
pub fn render(tree: &ElementTree, format: OutputFormat, options: &RenderOptions) -> Result<String> {
    render_internal(tree, format, options).map(|result| result.content)
}

/// Render a tree with statistics.
pub fn render_with_stats(
    tree: &ElementTree,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<RenderResult> {
    let mut options = options.clone();
    options.collect_stats = true;
    let mut result = render_internal(tree, format, &options)?;

    // Count words and characters in final content
    result.stats.count_text(&result.content);
    Ok(result)
}

/// Render many trees in parallel.
///
/// Results keep the order of `trees`; each tree gets its own context.
pub fn render_batch(
    trees: &[ElementTree],
    format: OutputFormat,
    options: &RenderOptions,
) -> Vec<Result<String>> {
    trees
        .par_iter()
        .map(|tree| render(tree, format, options))
        .collect()
}

fn render_internal(
    tree: &ElementTree,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<RenderResult> {
    let format = resolve_format(tree, format);
    let mut ctx = RenderContext::new(format, options);
    ctx.complete_document = metadata::requests_complete_document(tree);

    let mut out = String::new();
    match format {
        OutputFormat::Html => HtmlRenderer::new(tree, &mut ctx).render_document(&mut out)?,
        OutputFormat::Latex => {
            LatexRenderer::new(tree, &mut ctx, LatexDialect::Article).render_document(&mut out)?
        }
        OutputFormat::Memoir => {
            LatexRenderer::new(tree, &mut ctx, LatexDialect::Memoir).render_document(&mut out)?
        }
        OutputFormat::Beamer => {
            LatexRenderer::new(tree, &mut ctx, LatexDialect::Beamer).render_document(&mut out)?
        }
        OutputFormat::GroffMm => GroffRenderer::new(tree, &mut ctx).render_document(&mut out)?,
        OutputFormat::Opml => OpmlRenderer::new(tree, &mut ctx).render_document(&mut out)?,
    }

    Ok(RenderResult::new(out, format, ctx.stats))
}
