//! Mutable state threaded through one render call.

use super::localize::{localize, Language, Typography};
use super::{OutputFormat, RenderOptions, RenderStats};
use crate::model::{Alignment, ElementId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

/// Whether a note reference is the first one for its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteMark {
    /// First reference; the node was queued as an endnote
    First(u32),
    /// Later reference to an already numbered node
    Repeat(u32),
}

impl NoteMark {
    /// Number assigned to the node.
    pub fn number(self) -> u32 {
        match self {
            NoteMark::First(n) | NoteMark::Repeat(n) => n,
        }
    }

    /// Check if this is the first reference.
    pub fn is_first(self) -> bool {
        matches!(self, NoteMark::First(_))
    }
}

/// Role of the table cells currently being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellRole {
    #[default]
    Body,
    Header,
}

/// Deepest heading level any output distinguishes.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Render state for one top-level call.
///
/// A context is never shared between calls; [`RenderContext::new`] gives
/// every call its own numbering, padding and endnote queue.
pub struct RenderContext {
    /// Output format being produced
    pub format: OutputFormat,

    /// Blank lines already preceding the output position (0..=2)
    padded: u8,

    endnotes: Vec<ElementId>,
    note_numbers: HashMap<ElementId, u32>,
    note_counter: u32,

    /// Level of a top-level heading
    pub base_header_level: u8,

    /// Typography language
    pub language: Language,

    /// Column alignments of the table being rendered
    pub table_alignment: Vec<Alignment>,

    /// Column index of the next cell
    pub column: usize,

    /// Role of the cells being rendered
    pub cell_role: CellRole,

    /// Wrap output in a document header and footer
    pub complete_document: bool,

    /// Footer and endnotes have been flushed
    pub footer_emitted: bool,

    /// Inside a list item (groff suppresses the first `.P`)
    pub in_list_item: bool,

    /// File for the trailing LaTeX `\input{}`
    pub latex_footer: Option<String>,

    /// Bibliography comes from BibTeX
    pub bibtex: bool,

    /// Generator for address obfuscation
    pub rng: StdRng,

    /// Collected statistics
    pub stats: RenderStats,
    collect_stats: bool,

    /// Rendering options of this call
    pub options: RenderOptions,
}

impl RenderContext {
    /// Create a fresh context for one render call.
    pub fn new(format: OutputFormat, options: &RenderOptions) -> Self {
        let rng = match options.obfuscation_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            format,
            padded: 2,
            endnotes: Vec::new(),
            note_numbers: HashMap::new(),
            note_counter: 0,
            base_header_level: options.base_header_level.clamp(1, 6),
            language: options.language,
            table_alignment: Vec::new(),
            column: 0,
            cell_role: CellRole::Body,
            complete_document: false,
            footer_emitted: false,
            in_list_item: false,
            latex_footer: None,
            bibtex: false,
            rng,
            stats: RenderStats::new(),
            collect_stats: options.collect_stats,
            options: options.clone(),
        }
    }

    // ==================== Padding ====================

    /// Ensure `n` newlines precede the next output.
    pub fn pad(&mut self, out: &mut String, n: u8) {
        while self.padded < n {
            out.push('\n');
            self.padded += 1;
        }
        self.padded = n;
    }

    /// Append text and reset the padding count.
    pub fn emit(&mut self, out: &mut String, text: &str) {
        out.push_str(text);
        self.padded = 0;
    }

    /// Override the padding count.
    pub fn set_padded(&mut self, n: u8) {
        self.padded = n.min(2);
    }

    /// Current padding count.
    pub fn padded(&self) -> u8 {
        self.padded
    }

    // ==================== Endnotes ====================

    /// Number a note-like node, queueing it on first sight.
    pub fn register_note(&mut self, id: ElementId) -> NoteMark {
        if let Some(&n) = self.note_numbers.get(&id) {
            return NoteMark::Repeat(n);
        }
        self.note_counter += 1;
        self.note_numbers.insert(id, self.note_counter);
        self.endnotes.push(id);
        NoteMark::First(self.note_counter)
    }

    /// Number already assigned to a node.
    pub fn note_number(&self, id: ElementId) -> Option<u32> {
        self.note_numbers.get(&id).copied()
    }

    /// Check if endnotes are waiting to be flushed.
    pub fn has_endnotes(&self) -> bool {
        !self.endnotes.is_empty()
    }

    /// Drain queued endnotes in first-seen order.
    pub fn take_endnotes(&mut self) -> Vec<ElementId> {
        std::mem::take(&mut self.endnotes)
    }

    // ==================== Headings ====================

    /// Effective heading level after the base level offset, clamped.
    pub fn effective_level(&self, kind_level: u8) -> u8 {
        let level = kind_level as i32 - 1 + self.base_header_level as i32;
        level.clamp(1, MAX_HEADING_LEVEL as i32) as u8
    }

    /// Apply a header level value from metadata.
    pub fn set_base_header_level(&mut self, value: &str) {
        match value.trim().parse::<u8>() {
            Ok(level) => {
                self.base_header_level = level.clamp(1, 6);
                log::debug!("base header level set to {}", self.base_header_level);
            }
            Err(_) => log::warn!("ignoring non-numeric header level `{}`", value.trim()),
        }
    }

    /// Route a rendering setting from metadata into the context.
    ///
    /// Returns `false` for keys that are not settings.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> bool {
        match key {
            "baseheaderlevel" => self.set_base_header_level(value),
            "htmlheaderlevel" => {
                if self.format == OutputFormat::Html {
                    self.set_base_header_level(value);
                }
            }
            "latexheaderlevel" => {
                if self.format.is_latex() {
                    self.set_base_header_level(value);
                }
            }
            "language" | "quoteslanguage" => {
                self.language = Language::from_metadata(value);
                log::debug!("typography language set to {:?}", self.language);
            }
            "latexmode" => {}
            _ => return false,
        }
        true
    }

    // ==================== Tables ====================

    /// Start rendering a table.
    pub fn begin_table(&mut self, alignment: Vec<Alignment>) {
        self.table_alignment = alignment;
        self.column = 0;
        self.cell_role = CellRole::Body;
    }

    /// Alignment of a column; missing columns are left aligned.
    pub fn column_alignment(&self, column: usize) -> Alignment {
        self.table_alignment
            .get(column)
            .copied()
            .unwrap_or_default()
    }

    /// Forget table state.
    pub fn end_table(&mut self) {
        self.table_alignment.clear();
        self.column = 0;
        self.cell_role = CellRole::Body;
    }

    // ==================== Misc ====================

    /// Localized typography for the current language and format.
    pub fn typography(&self, symbol: Typography) -> &'static str {
        localize(symbol, self.language, self.format.family())
    }

    /// Record statistics when collection is enabled.
    pub fn count(&mut self, update: impl FnOnce(&mut RenderStats)) {
        if self.collect_stats {
            update(&mut self.stats);
        }
    }
}
