//! Rendering options and configuration.

use super::localize::{Language, OutputFamily};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format of a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// XHTML fragment or complete document
    #[default]
    Html,
    /// LaTeX, article class sectioning
    Latex,
    /// LaTeX for the memoir book class
    Memoir,
    /// LaTeX slides for beamer
    Beamer,
    /// groff with the mm macro package
    GroffMm,
    /// OPML outline
    Opml,
}

impl OutputFormat {
    /// All supported formats.
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::Html,
        OutputFormat::Latex,
        OutputFormat::Memoir,
        OutputFormat::Beamer,
        OutputFormat::GroffMm,
        OutputFormat::Opml,
    ];

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Latex => "latex",
            OutputFormat::Memoir => "memoir",
            OutputFormat::Beamer => "beamer",
            OutputFormat::GroffMm => "groff-mm",
            OutputFormat::Opml => "opml",
        }
    }

    /// File extension (without dot) for batch output.
    pub fn file_extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Latex | OutputFormat::Memoir | OutputFormat::Beamer => "tex",
            OutputFormat::GroffMm => "mm",
            OutputFormat::Opml => "opml",
        }
    }

    /// Check if this is one of the LaTeX dialects.
    pub fn is_latex(self) -> bool {
        matches!(
            self,
            OutputFormat::Latex | OutputFormat::Memoir | OutputFormat::Beamer
        )
    }

    /// Column of the localization table used by this format.
    pub fn family(self) -> OutputFamily {
        match self {
            OutputFormat::Html => OutputFamily::Html,
            OutputFormat::Latex | OutputFormat::Memoir | OutputFormat::Beamer => {
                OutputFamily::Latex
            }
            OutputFormat::GroffMm => OutputFamily::Groff,
            OutputFormat::Opml => OutputFamily::Opml,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "xhtml" => Ok(OutputFormat::Html),
            "latex" | "tex" => Ok(OutputFormat::Latex),
            "memoir" => Ok(OutputFormat::Memoir),
            "beamer" => Ok(OutputFormat::Beamer),
            "groff" | "groff-mm" | "mm" => Ok(OutputFormat::GroffMm),
            "opml" => Ok(OutputFormat::Opml),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// Syntax extension flags that change how elements are rendered.
///
/// The parser resolves which extensions were active; the renderers only
/// branch on the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extensions {
    /// Plain-markdown compatible output: no generated anchors
    pub compatibility: bool,

    /// Only use explicit labels for heading anchors
    pub no_labels: bool,

    /// Drop raw HTML (except style blocks)
    pub filter_html: bool,

    /// Drop `<style>` blocks
    pub filter_styles: bool,
}

impl Extensions {
    /// No extensions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Compatibility mode (implies `no_labels`).
    pub fn compatibility() -> Self {
        Self {
            compatibility: true,
            no_labels: true,
            ..Self::default()
        }
    }
}

/// Options for rendering an element tree.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Extension flags
    pub extensions: Extensions,

    /// Typography language (metadata may override)
    pub language: Language,

    /// Level of a top-level heading (metadata may override)
    pub base_header_level: u8,

    /// Seed for e-mail address obfuscation; random when `None`
    pub obfuscation_seed: Option<u64>,

    /// Collect rendering statistics
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extension flags.
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Enable or disable compatibility mode.
    pub fn with_compatibility(mut self, enabled: bool) -> Self {
        self.extensions.compatibility = enabled;
        if enabled {
            self.extensions.no_labels = true;
        }
        self
    }

    /// Set the typography language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set the base header level.
    pub fn with_base_header_level(mut self, level: u8) -> Self {
        self.base_header_level = level.clamp(1, 6);
        self
    }

    /// Use a fixed seed for address obfuscation.
    pub fn with_obfuscation_seed(mut self, seed: u64) -> Self {
        self.obfuscation_seed = Some(seed);
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            extensions: Extensions::default(),
            language: Language::English,
            base_header_level: 1,
            obfuscation_seed: None,
            collect_stats: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_compatibility(true)
            .with_base_header_level(9)
            .with_language(Language::German)
            .with_obfuscation_seed(7);

        assert!(options.extensions.compatibility);
        assert!(options.extensions.no_labels);
        assert_eq!(options.base_header_level, 6);
        assert_eq!(options.language, Language::German);
        assert_eq!(options.obfuscation_seed, Some(7));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("HTML".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!("mm".parse::<OutputFormat>().unwrap(), OutputFormat::GroffMm);
        assert_eq!(
            "beamer".parse::<OutputFormat>().unwrap(),
            OutputFormat::Beamer
        );
        assert!(matches!(
            "odt".parse::<OutputFormat>(),
            Err(Error::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_output_format_names_parse_back() {
        for format in OutputFormat::ALL {
            assert_eq!(format.name().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(OutputFormat::Memoir.file_extension(), "tex");
        assert_eq!(OutputFormat::Opml.file_extension(), "opml");
        assert!(OutputFormat::Beamer.is_latex());
        assert!(!OutputFormat::Opml.is_latex());
    }
}
