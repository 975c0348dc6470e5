//! Per-format string escaping.
//!
//! Every escaper is a single left-to-right scan that substitutes reserved
//! characters and copies everything else. None of them can fail.

use rand::Rng;

/// Escape text for HTML element content and attribute values.
pub fn html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for HTML, turning every unreserved character into a
/// decimal or hexadecimal character reference chosen by coin flip.
pub fn html_obfuscated<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let mut out = String::with_capacity(text.len() * 6);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ if rng.random_bool(0.5) => out.push_str(&format!("&#{};", c as u32)),
            _ => out.push_str(&format!("&#x{:x};", c as u32)),
        }
    }
    out
}

/// Escape text for LaTeX.
///
/// Two trailing spaces before a newline become a forced line break.
pub fn latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' | '}' | '$' | '%' | '&' | '_' | '#' => {
                out.push('\\');
                out.push(c);
            }
            '^' => out.push_str("\\^{}"),
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\ensuremath{\\sim}"),
            '|' => out.push_str("\\textbar{}"),
            '<' => out.push_str("\\textless{}"),
            '>' => out.push_str("\\textgreater{}"),
            '/' => out.push_str("\\slash{}"),
            ' ' if chars.peek() == Some(&' ') => {
                // Look past the whole run of spaces for a newline.
                let mut run = 1;
                while chars.peek() == Some(&' ') {
                    chars.next();
                    run += 1;
                }
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    out.push_str("\\\\\n");
                } else {
                    out.push_str(&" ".repeat(run));
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escape a URL used inside `\href` or `\url`.
pub fn latex_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        if matches!(c, '%' | '#') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape text for groff.
pub fn groff(text: &str) -> String {
    text.replace('\\', "\\e")
}

/// Escape text for an OPML attribute value.
pub fn opml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_html_escape() {
        assert_eq!(html("Hello & <b>\"x\"</b>"), "Hello &amp; &lt;b&gt;&quot;x&quot;&lt;/b&gt;");
        assert_eq!(html("plain text"), "plain text");
    }

    #[test]
    fn test_html_obfuscated_decodes_back() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = html_obfuscated("ab@c.d", &mut rng);
        assert!(!out.contains('@'));

        // Decode the character references again.
        let decoded: String = out
            .split(';')
            .filter(|s| !s.is_empty())
            .map(|entity| {
                let body = entity.trim_start_matches("&#");
                let code = match body.strip_prefix('x') {
                    Some(hex) => u32::from_str_radix(hex, 16).unwrap(),
                    None => body.parse().unwrap(),
                };
                char::from_u32(code).unwrap()
            })
            .collect();
        assert_eq!(decoded, "ab@c.d");
    }

    #[test]
    fn test_html_obfuscated_keeps_reserved_entities() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(html_obfuscated("&", &mut rng), "&amp;");
    }

    #[test]
    fn test_latex_escape() {
        assert_eq!(latex("50% of $x_1$"), "50\\% of \\$x\\_1\\$");
        assert_eq!(latex("a~b"), "a\\ensuremath{\\sim}b");
        assert_eq!(latex("a/b"), "a\\slash{}b");
        assert_eq!(latex("c:\\dir"), "c:\\textbackslash{}dir");
        assert_eq!(latex("x^2"), "x\\^{}2");
    }

    #[test]
    fn test_latex_forced_line_break() {
        assert_eq!(latex("one  \ntwo"), "one\\\\\ntwo");
        assert_eq!(latex("one   two"), "one   two");
        assert_eq!(latex("one \ntwo"), "one \ntwo");
    }

    #[test]
    fn test_latex_reserved_tokens_are_distinct() {
        let reserved = ['{', '}', '$', '%', '&', '_', '#', '^', '\\', '~', '|', '<', '>', '/'];
        let mut tokens: Vec<String> = reserved.iter().map(|c| latex(&c.to_string())).collect();
        tokens.sort();
        tokens.dedup();
        assert_eq!(tokens.len(), reserved.len());
    }

    #[test]
    fn test_latex_url() {
        assert_eq!(latex_url("http://x.org/a_b#top"), "http://x.org/a_b\\#top");
    }

    #[test]
    fn test_groff_escape() {
        assert_eq!(groff("a\\b"), "a\\eb");
        assert_eq!(groff("plain"), "plain");
    }

    #[test]
    fn test_opml_escape() {
        assert_eq!(opml("a & b\n<c>"), "a &amp; b&#10;&lt;c&gt;");
    }
}
