//! Rendering result with statistics.

use super::OutputFormat;
use serde::{Deserialize, Serialize};

/// Result of rendering a tree, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content
    pub content: String,

    /// Format actually produced (after any `latexmode` override)
    pub format: OutputFormat,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, format: OutputFormat, stats: RenderStats) -> Self {
        Self {
            content,
            format,
            stats,
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected while walking the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of headings rendered
    pub heading_count: u32,

    /// Number of paragraphs rendered
    pub paragraph_count: u32,

    /// Number of tables rendered
    pub table_count: u32,

    /// Number of images rendered
    pub image_count: u32,

    /// Number of links rendered
    pub link_count: u32,

    /// Number of distinct footnotes
    pub note_count: u32,

    /// Number of distinct citations
    pub citation_count: u32,

    /// Number of distinct glossary entries
    pub glossary_count: u32,

    /// Approximate word count of the output
    pub word_count: u32,

    /// Character count of the output (excluding whitespace)
    pub char_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment heading count.
    pub fn add_heading(&mut self) {
        self.heading_count += 1;
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Increment table count.
    pub fn add_table(&mut self) {
        self.table_count += 1;
    }

    /// Increment image count.
    pub fn add_image(&mut self) {
        self.image_count += 1;
    }

    /// Increment link count.
    pub fn add_link(&mut self) {
        self.link_count += 1;
    }

    /// Increment footnote count.
    pub fn add_note(&mut self) {
        self.note_count += 1;
    }

    /// Increment citation count.
    pub fn add_citation(&mut self) {
        self.citation_count += 1;
    }

    /// Increment glossary entry count.
    pub fn add_glossary(&mut self) {
        self.glossary_count += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.table_count += other.table_count;
        self.image_count += other.image_count;
        self.link_count += other.link_count;
        self.note_count += other.note_count;
        self.citation_count += other.citation_count;
        self.glossary_count += other.glossary_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_stats_count_text() {
        let mut stats = RenderStats::new();
        stats.count_text("<p>Hello &amp; welcome</p>");

        assert_eq!(stats.word_count, 3);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_render_stats_merge() {
        let mut stats1 = RenderStats::new();
        stats1.paragraph_count = 5;
        stats1.note_count = 2;

        let stats2 = RenderStats {
            paragraph_count: 3,
            note_count: 1,
            citation_count: 4,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.paragraph_count, 8);
        assert_eq!(stats1.note_count, 3);
        assert_eq!(stats1.citation_count, 4);
    }

    #[test]
    fn test_render_result_len() {
        let result = RenderResult::new("<p>x</p>".to_string(), OutputFormat::Html, RenderStats::new());
        assert_eq!(result.content_len(), 8);
        assert_eq!(result.format, OutputFormat::Html);
    }
}
