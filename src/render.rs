//! Hyperlink detection for displayed results.
//!
//! Finds URLs (scheme-qualified, `www.` prefixed or bare domains) in model
//! output and turns them into HTML anchors or terminal hyperlinks.

use regex::Regex;
use std::sync::OnceLock;

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"https?://[^\s<>"'(){}\[\]]+|www\.[^\s<>"'(){}\[\]]+|[a-zA-Z0-9-]+\.[a-zA-Z]{2,}(?:/[^\s<>"'(){}\[\]]*)?"#,
        )
        .expect("valid regex")
    })
}

/// Trailing characters that end a sentence rather than a URL.
const TRAILING: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Link target for a matched URL; scheme-less matches get `https://`.
pub fn href(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

fn replace_links(
    text: &str,
    plain: impl Fn(&str) -> String,
    link: impl Fn(&str) -> String,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in url_pattern().find_iter(text) {
        let url = m.as_str().trim_end_matches(TRAILING);
        if url.is_empty() {
            continue;
        }
        let end = m.start() + url.len();

        out.push_str(&plain(&text[last..m.start()]));
        out.push_str(&link(url));
        last = end;
    }

    out.push_str(&plain(&text[last..]));
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render text as HTML with every URL as a clickable anchor opening in a new tab.
pub fn to_html(text: &str) -> String {
    replace_links(text, escape_html, |url| {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            escape_html(&href(url)),
            escape_html(url)
        )
    })
}

/// Wrap every URL in an OSC 8 terminal hyperlink.
pub fn to_terminal(text: &str) -> String {
    replace_links(text, str::to_string, |url| {
        format!(
            "\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\",
            href(url),
            console::style(url).underlined()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_anchors() {
        let html = to_html("See https://example.com/a?b=1 for more.");
        assert_eq!(
            html,
            r#"See <a href="https://example.com/a?b=1" target="_blank" rel="noopener">https://example.com/a?b=1</a> for more."#
        );
    }

    #[test]
    fn test_scheme_is_added_to_bare_urls() {
        let html = to_html("Visit www.rust-lang.org or docs.rs/regex.");
        assert!(html.contains(r#"href="https://www.rust-lang.org""#));
        assert!(html.contains(r#"href="https://docs.rs/regex""#));
        assert!(html.ends_with("</a>."));
    }

    #[test]
    fn test_plain_text_is_escaped() {
        let html = to_html("1. <script> & no links");
        assert_eq!(html, "1. &lt;script&gt; &amp; no links");
    }

    #[test]
    fn test_terminal_hyperlinks() {
        console::set_colors_enabled(false);
        let out = to_terminal("URL: https://example.com/nn");
        assert_eq!(
            out,
            "URL: \x1b]8;;https://example.com/nn\x1b\\https://example.com/nn\x1b]8;;\x1b\\"
        );
        assert_eq!(to_terminal("no links here"), "no links here");
    }
}
