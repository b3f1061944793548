//! HTML normalization for admin-authored homepage text.

use std::sync::LazyLock;

use regex::Regex;

const ALLOWED_TAGS: [&str; 9] = ["br", "div", "p", "strong", "em", "b", "i", "u", "a"];

static LOOKS_LIKE_HTML: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)</?[a-z].*>").expect("valid regex"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static EVENT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z0-9_-]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).expect("valid regex")
});
static JS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\s(href|src)\s*=\s*(?:"\s*javascript:[^"]*"|'\s*javascript:[^']*'|javascript:[^\s>]*)"#,
    )
    .expect("valid regex")
});
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n").expect("valid regex"));

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn looks_like_html(raw: &str) -> bool {
    LOOKS_LIKE_HTML.is_match(raw)
}

fn is_allowed_tag(tag: &str) -> bool {
    let body = tag.trim_start_matches('<');
    let body = body.strip_prefix('/').unwrap_or(body);
    let name: String = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    ALLOWED_TAGS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&name))
}

/// Event handlers go, `javascript:` URLs become `#`. Quoted, bare and
/// spaced-out attribute forms are all covered.
fn clean_attributes(tag: &str) -> String {
    let tag = EVENT_ATTR.replace_all(tag, "");
    JS_URL.replace_all(&tag, r##" $1="#""##).into_owned()
}

/// Drops every tag outside the allow-list and cleans the attributes of the
/// rest. Text content is left untouched.
pub fn sanitize_allow_list(html: &str) -> String {
    ANY_TAG
        .replace_all(html, |caps: &regex::Captures<'_>| {
            let tag = &caps[0];
            if is_allowed_tag(tag) {
                clean_attributes(tag)
            } else {
                String::new()
            }
        })
        .into_owned()
}

pub fn text_to_html_with_br(raw: &str) -> String {
    LINE_BREAK
        .replace_all(&escape_html(raw), "<br/>")
        .into_owned()
}

/// Message blocks: HTML is sanitized, plain text keeps its line breaks.
pub fn normalize_html(raw: &str) -> String {
    if looks_like_html(raw) {
        sanitize_allow_list(raw)
    } else {
        text_to_html_with_br(raw)
    }
}

/// Titles are usually plain text and render inside a single span.
pub fn title_html(raw: &str) -> String {
    if looks_like_html(raw) {
        sanitize_allow_list(raw)
    } else {
        format!("<span>{}</span>", escape_html(raw))
    }
}
