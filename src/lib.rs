//! # multimark
//!
//! Rendering engine for MultiMarkdown element trees.
//!
//! A markdown parser hands over an [`ElementTree`]; this library walks it and
//! produces HTML, LaTeX (article, memoir and beamer), groff-mm or OPML.
//!
//! ## Quick Start
//!
//! ```no_run
//! use multimark::{render, ElementTree, OutputFormat, RenderOptions};
//!
//! fn main() -> multimark::Result<()> {
//!     let mut tree = ElementTree::new();
//!     let heading = tree.heading(1, "Intro");
//!     let para = tree.para("Hello & welcome");
//!     tree.set_roots(vec![heading, para]);
//!
//!     let html = render(&tree, OutputFormat::Html, &RenderOptions::default())?;
//!     println!("{}", html);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Multiple output formats**: HTML, LaTeX, memoir, beamer, groff-mm, OPML
//! - **Cross references**: heading labels, footnotes, citations, glossary
//! - **Typography**: localized quotes and dashes
//! - **Parallel processing**: Uses Rayon for batches of documents

pub mod error;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    from_json, to_json, Alignment, Content, Element, ElementId, ElementKind, ElementTree,
    JsonFormat, LinkData,
};
pub use render::{
    label_from_text, render, render_batch, render_with_stats, resolve_format, Extensions,
    Language, OutputFormat, RenderOptions, RenderResult, RenderStats,
};

use std::io::Read;
use std::path::Path;

/// Load a tree from a JSON file.
///
/// # Example
///
/// ```no_run
/// let tree = multimark::load_file("document.json").unwrap();
/// println!("Elements: {}", tree.len());
/// ```
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<ElementTree> {
    let input = std::fs::read_to_string(path)?;
    from_json(&input)
}

/// Load a tree from a reader producing JSON.
pub fn load_reader<R: Read>(mut reader: R) -> Result<ElementTree> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    from_json(&input)
}

/// Render a JSON tree file to a format.
///
/// # Example
///
/// ```no_run
/// use multimark::{render_file, OutputFormat, RenderOptions};
///
/// let latex = render_file("document.json", OutputFormat::Latex, &RenderOptions::default()).unwrap();
/// std::fs::write("document.tex", latex).unwrap();
/// ```
pub fn render_file<P: AsRef<Path>>(
    path: P,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<String> {
    let tree = load_file(path)?;
    render(&tree, format, options)
}

/// Plain-text value of a metadata key, for `--extract` style lookups.
pub fn extract_metadata(tree: &ElementTree, key: &str) -> Option<String> {
    model::metadata::extract(tree, key)
}

/// Builder for rendering element trees.
///
/// # Example
///
/// ```no_run
/// use multimark::{Multimark, OutputFormat};
///
/// let tree = multimark::load_file("document.json")?;
/// let html = Multimark::new()
///     .to(OutputFormat::Html)
///     .compatibility()
///     .render(&tree)?;
/// # Ok::<(), multimark::Error>(())
/// ```
pub struct Multimark {
    format: OutputFormat,
    options: RenderOptions,
}

impl Multimark {
    /// Create a new builder producing HTML.
    pub fn new() -> Self {
        Self {
            format: OutputFormat::default(),
            options: RenderOptions::default(),
        }
    }

    /// Set the output format.
    pub fn to(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Produce plain-markdown compatible output.
    pub fn compatibility(mut self) -> Self {
        self.options = self.options.with_compatibility(true);
        self
    }

    /// Replace the extension flags.
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.options = self.options.with_extensions(extensions);
        self
    }

    /// Set the typography language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.options = self.options.with_language(language);
        self
    }

    /// Set the level of top-level headings.
    pub fn with_base_header_level(mut self, level: u8) -> Self {
        self.options = self.options.with_base_header_level(level);
        self
    }

    /// Seed the address obfuscation for reproducible output.
    pub fn with_obfuscation_seed(mut self, seed: u64) -> Self {
        self.options = self.options.with_obfuscation_seed(seed);
        self
    }

    /// Render one tree.
    pub fn render(&self, tree: &ElementTree) -> Result<String> {
        render::render(tree, self.format, &self.options)
    }

    /// Render one tree with statistics.
    pub fn render_with_stats(&self, tree: &ElementTree) -> Result<RenderResult> {
        render::render_with_stats(tree, self.format, &self.options)
    }

    /// Render a JSON tree.
    pub fn render_json(&self, input: &str) -> Result<String> {
        let tree = from_json(input)?;
        self.render(&tree)
    }

    /// Render several trees in parallel.
    pub fn render_batch(&self, trees: &[ElementTree]) -> Vec<Result<String>> {
        render::render_batch(trees, self.format, &self.options)
    }
}

impl Default for Multimark {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_renders_latex() {
        let mut tree = ElementTree::new();
        let p = tree.para("50% off");
        tree.push_root(p);

        let out = Multimark::new().to(OutputFormat::Latex).render(&tree).unwrap();
        assert_eq!(out, "50\\% off");
    }

    #[test]
    fn test_load_reader_roundtrip() {
        let mut tree = ElementTree::new();
        let h = tree.heading(2, "Setup");
        tree.push_root(h);
        let json = to_json(&tree, JsonFormat::Compact).unwrap();

        let loaded = load_reader(json.as_bytes()).unwrap();
        assert_eq!(loaded, tree);
        assert_eq!(
            Multimark::new().compatibility().render(&loaded).unwrap(),
            "<h2>Setup</h2>"
        );
    }

    #[test]
    fn test_extract_metadata() {
        let mut tree = ElementTree::new();
        let meta = tree.metadata(&[("Title", "Notes")]);
        tree.push_root(meta);
        assert_eq!(extract_metadata(&tree, "title"), Some("Notes".to_string()));
        assert_eq!(extract_metadata(&tree, "author"), None);
    }
}
