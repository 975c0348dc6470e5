//! Language-specific typography.
//!
//! Smart punctuation is stored in the tree as dedicated element kinds
//! (`Ellipsis`, `EmDash`, quotes...). The literal text for each depends on
//! both the document language and the output format.

use serde::{Deserialize, Serialize};

/// Typographic symbol produced by smart punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Typography {
    Ellipsis,
    EmDash,
    EnDash,
    Apostrophe,
    LeftSingleQuote,
    RightSingleQuote,
    LeftDoubleQuote,
    RightDoubleQuote,
}

/// Language selecting quote and dash conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    #[default]
    English,
    Dutch,
    French,
    German,
    /// German with guillemets instead of low-high quotes
    GermanGuillemets,
    Swedish,
}

impl Language {
    /// Parse a metadata or command-line value; unknown values mean English.
    pub fn from_metadata(value: &str) -> Self {
        let value: String = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        match value.as_str() {
            "nl" | "dutch" => Language::Dutch,
            "fr" | "french" => Language::French,
            "de" | "german" => Language::German,
            "germanguillemets" => Language::GermanGuillemets,
            "sv" | "swedish" => Language::Swedish,
            _ => Language::English,
        }
    }
}

/// Output family: the LaTeX dialects share one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFamily {
    Html,
    Latex,
    Groff,
    Opml,
}

/// Literal text for a symbol in a language and output family.
pub fn localize(symbol: Typography, language: Language, family: OutputFamily) -> &'static str {
    lookup(symbol, language, family).unwrap_or_else(|| english(symbol, family))
}

fn english(symbol: Typography, family: OutputFamily) -> &'static str {
    use OutputFamily::*;
    use Typography::*;
    match (family, symbol) {
        (Html, Ellipsis) => "&hellip;",
        (Html, EmDash) => "&mdash;",
        (Html, EnDash) => "&ndash;",
        (Html, Apostrophe) => "&rsquo;",
        (Html, LeftSingleQuote) => "&lsquo;",
        (Html, RightSingleQuote) => "&rsquo;",
        (Html, LeftDoubleQuote) => "&ldquo;",
        (Html, RightDoubleQuote) => "&rdquo;",

        (Latex, Ellipsis) => "{\\ldots}",
        (Latex, EmDash) => "---",
        (Latex, EnDash) => "--",
        (Latex, Apostrophe) => "'",
        (Latex, LeftSingleQuote) => "`",
        (Latex, RightSingleQuote) => "'",
        (Latex, LeftDoubleQuote) => "``",
        (Latex, RightDoubleQuote) => "''",

        (Groff, Ellipsis) => "...",
        (Groff, EmDash) => "\\[em]",
        (Groff, EnDash) => "\\[en]",
        (Groff, Apostrophe) => "'",
        (Groff, LeftSingleQuote) => "`",
        (Groff, RightSingleQuote) => "'",
        (Groff, LeftDoubleQuote) => "\\[lq]",
        (Groff, RightDoubleQuote) => "\\[rq]",

        (Opml, Ellipsis) => "...",
        (Opml, EmDash) => "---",
        (Opml, EnDash) => "--",
        (Opml, Apostrophe) => "'",
        (Opml, LeftSingleQuote) => "'",
        (Opml, RightSingleQuote) => "'",
        (Opml, LeftDoubleQuote) => "&quot;",
        (Opml, RightDoubleQuote) => "&quot;",
    }
}

// Only entries that differ from English are listed.
fn lookup(symbol: Typography, language: Language, family: OutputFamily) -> Option<&'static str> {
    use Language::*;
    use OutputFamily::*;
    use Typography::*;
    let text = match (language, family, symbol) {
        (Dutch, Html, LeftDoubleQuote) => "&bdquo;",
        (Dutch, Html, RightDoubleQuote) => "&rdquo;",
        (Dutch, Html, LeftSingleQuote) => "&sbquo;",
        (Dutch, Latex, LeftDoubleQuote) => ",,",
        (Dutch, Latex, LeftSingleQuote) => ",",

        (French, Html, LeftDoubleQuote) => "&laquo;&nbsp;",
        (French, Html, RightDoubleQuote) => "&nbsp;&raquo;",
        (French, Html, LeftSingleQuote) => "&lsaquo;",
        (French, Html, RightSingleQuote) => "&rsaquo;",
        (French, Latex, LeftDoubleQuote) => "\\og{}",
        (French, Latex, RightDoubleQuote) => "\\fg{}",
        (French, Latex, LeftSingleQuote) => "\\guilsinglleft{}",
        (French, Latex, RightSingleQuote) => "\\guilsinglright{}",

        (German, Html, LeftDoubleQuote) => "&bdquo;",
        (German, Html, RightDoubleQuote) => "&ldquo;",
        (German, Html, LeftSingleQuote) => "&sbquo;",
        (German, Html, RightSingleQuote) => "&lsquo;",
        (German, Latex, LeftDoubleQuote) => "\\glqq{}",
        (German, Latex, RightDoubleQuote) => "\\grqq{}",
        (German, Latex, LeftSingleQuote) => "\\glq{}",
        (German, Latex, RightSingleQuote) => "\\grq{}",

        (GermanGuillemets, Html, LeftDoubleQuote) => "&raquo;",
        (GermanGuillemets, Html, RightDoubleQuote) => "&laquo;",
        (GermanGuillemets, Html, LeftSingleQuote) => "&rsaquo;",
        (GermanGuillemets, Html, RightSingleQuote) => "&lsaquo;",
        (GermanGuillemets, Latex, LeftDoubleQuote) => "\\frqq{}",
        (GermanGuillemets, Latex, RightDoubleQuote) => "\\flqq{}",
        (GermanGuillemets, Latex, LeftSingleQuote) => "\\frq{}",
        (GermanGuillemets, Latex, RightSingleQuote) => "\\flq{}",

        (Swedish, Html, LeftDoubleQuote) => "&rdquo;",
        (Swedish, Html, LeftSingleQuote) => "&rsquo;",
        (Swedish, Latex, LeftDoubleQuote) => "''",
        (Swedish, Latex, LeftSingleQuote) => "'",
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_html() {
        assert_eq!(
            localize(Typography::EmDash, Language::English, OutputFamily::Html),
            "&mdash;"
        );
        assert_eq!(
            localize(Typography::LeftDoubleQuote, Language::English, OutputFamily::Latex),
            "``"
        );
    }

    #[test]
    fn test_fallback_to_english() {
        assert_eq!(
            localize(Typography::Ellipsis, Language::French, OutputFamily::Html),
            "&hellip;"
        );
        assert_eq!(
            localize(Typography::LeftDoubleQuote, Language::German, OutputFamily::Groff),
            "\\[lq]"
        );
    }

    #[test]
    fn test_german_quotes() {
        assert_eq!(
            localize(Typography::LeftDoubleQuote, Language::German, OutputFamily::Html),
            "&bdquo;"
        );
        assert_eq!(
            localize(Typography::RightDoubleQuote, Language::German, OutputFamily::Latex),
            "\\grqq{}"
        );
    }

    #[test]
    fn test_language_from_metadata() {
        assert_eq!(Language::from_metadata("fr"), Language::French);
        assert_eq!(Language::from_metadata(" German "), Language::German);
        assert_eq!(
            Language::from_metadata("German Guillemets"),
            Language::GermanGuillemets
        );
        assert_eq!(Language::from_metadata("klingon"), Language::English);
    }
}
