//! Styled-span document behind the homepage title and message editor.
//!
//! The editor works on a flat list of spans addressed by character offsets.
//! HTML only appears at the boundary: [`Document::from_html`] reads what is
//! stored in `settings`, [`Document::to_html`] writes it back.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::sanitize::{escape_html, looks_like_html};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShadowPreset {
    #[default]
    None,
    Soft,
    Glow,
    Hard,
}

impl ShadowPreset {
    pub fn css(&self) -> &'static str {
        match self {
            ShadowPreset::None => "",
            ShadowPreset::Soft => "0 1px 2px rgba(0,0,0,.15)",
            ShadowPreset::Glow => "0 0 8px rgba(255,215,0,.6)",
            ShadowPreset::Hard => "0 2px 0 rgba(0,0,0,.5)",
        }
    }

    pub fn from_css(css: &str) -> Option<Self> {
        let css = css.trim();
        [ShadowPreset::Soft, ShadowPreset::Glow, ShadowPreset::Hard]
            .into_iter()
            .find(|preset| preset.css() == css)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" => Some(ShadowPreset::None),
            "soft" => Some(ShadowPreset::Soft),
            "glow" => Some(ShadowPreset::Glow),
            "hard" => Some(ShadowPreset::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShadowPreset::None => "none",
            ShadowPreset::Soft => "soft",
            ShadowPreset::Glow => "glow",
            ShadowPreset::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpanStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub font_family: Option<String>,
    pub color: Option<String>,
    pub font_size_px: Option<u16>,
    pub line_height: Option<String>,
    pub letter_spacing: Option<String>,
    pub text_shadow: Option<ShadowPreset>,
}

impl SpanStyle {
    fn css(&self) -> String {
        let mut decls = Vec::new();
        if let Some(family) = &self.font_family {
            decls.push(format!("font-family:{family}"));
        }
        if let Some(color) = &self.color {
            decls.push(format!("color:{color}"));
        }
        if let Some(size) = self.font_size_px {
            decls.push(format!("font-size:{size}px"));
        }
        if let Some(lh) = &self.line_height {
            decls.push(format!("line-height:{lh}"));
        }
        if let Some(ls) = &self.letter_spacing {
            decls.push(format!("letter-spacing:{ls}"));
        }
        if let Some(shadow) = self.text_shadow.filter(|s| *s != ShadowPreset::None) {
            decls.push(format!("text-shadow:{}", shadow.css()));
        }
        decls.join(";")
    }

    fn apply_css(&mut self, css: &str) {
        for decl in css.split(';') {
            let Some((prop, value)) = decl.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match prop.trim().to_ascii_lowercase().as_str() {
                "font-family" => self.font_family = Some(value.to_string()),
                "color" => self.color = Some(value.to_string()),
                "font-size" => {
                    if let Ok(px) = value.trim_end_matches("px").trim().parse::<f32>() {
                        self.font_size_px = Some(px.round().clamp(1.0, 400.0) as u16);
                    }
                }
                "line-height" => self.line_height = Some(value.to_string()),
                "letter-spacing" => self.letter_spacing = Some(value.to_string()),
                "text-shadow" => self.text_shadow = ShadowPreset::from_css(value),
                "font-weight" => {
                    self.bold = value == "bold" || value.parse::<u16>().is_ok_and(|w| w >= 600)
                }
                "font-style" => self.italic = value == "italic",
                "text-decoration" | "text-decoration-line" => {
                    self.underline = value.contains("underline")
                }
                _ => {}
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

/// Character range; `start == end` is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    fn clamp(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Command {
    Bold,
    Italic,
    Underline,
    FontName(String),
    ForeColor(String),
    FontSize(u16),
    LineHeight(String),
    LetterSpacing(String),
    TextShadow(ShadowPreset),
    RemoveFormat,
    InsertText(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    spans: Vec<Span>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_plain(text: &str) -> Self {
        let mut doc = Self::default();
        doc.spans.push(Span {
            text: text.replace("\r\n", "\n"),
            style: SpanStyle::default(),
        });
        doc.normalize();
        doc
    }

    /// Stored setting values may be legacy plain text or HTML.
    pub fn from_stored(raw: &str) -> Self {
        if looks_like_html(raw) {
            Self::from_html(raw)
        } else {
            Self::from_plain(raw)
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn char_len(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Makes `at` a span boundary and returns the index of the span starting there.
    fn split_at(&mut self, at: usize) -> usize {
        let mut pos = 0;
        for i in 0..self.spans.len() {
            if at == pos {
                return i;
            }
            let len = self.spans[i].text.chars().count();
            if at < pos + len {
                let byte = self.spans[i]
                    .text
                    .char_indices()
                    .nth(at - pos)
                    .map_or(self.spans[i].text.len(), |(b, _)| b);
                let tail = self.spans[i].text.split_off(byte);
                let style = self.spans[i].style.clone();
                self.spans.insert(i + 1, Span { text: tail, style });
                return i + 1;
            }
            pos += len;
        }
        self.spans.len()
    }

    fn span_range(&mut self, sel: Selection) -> std::ops::Range<usize> {
        let start = self.split_at(sel.start);
        let end = self.split_at(sel.end);
        start..end
    }

    fn restyle(&mut self, sel: Selection, mut f: impl FnMut(&mut SpanStyle)) -> bool {
        let sel = sel.clamp(self.char_len());
        if sel.is_collapsed() {
            return false;
        }
        let range = self.span_range(sel);
        for span in &mut self.spans[range] {
            f(&mut span.style);
        }
        self.normalize();
        true
    }

    fn toggle(&mut self, sel: Selection, flag: fn(&mut SpanStyle) -> &mut bool) -> bool {
        let sel = sel.clamp(self.char_len());
        if sel.is_collapsed() {
            return false;
        }
        let range = self.span_range(sel);
        let all_set = self.spans[range.clone()]
            .iter_mut()
            .all(|span| *flag(&mut span.style));
        for span in &mut self.spans[range] {
            *flag(&mut span.style) = !all_set;
        }
        self.normalize();
        true
    }

    /// Replaces the selected text and returns the caret after the insertion.
    fn insert_text(&mut self, sel: Selection, text: &str) -> usize {
        let sel = sel.clamp(self.char_len());
        let range = self.span_range(sel);
        let style = if range.start > 0 {
            self.spans[range.start - 1].style.clone()
        } else {
            self.spans
                .get(range.start)
                .map(|s| s.style.clone())
                .unwrap_or_default()
        };
        self.spans.drain(range.clone());
        self.spans.insert(
            range.start,
            Span {
                text: text.replace("\r\n", "\n"),
                style,
            },
        );
        self.normalize();
        sel.start + text.replace("\r\n", "\n").chars().count()
    }

    fn normalize(&mut self) {
        self.spans.retain(|span| !span.text.is_empty());
        let mut merged: Vec<Span> = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            match merged.last_mut() {
                Some(last) if last.style == span.style => last.text.push_str(&span.text),
                _ => merged.push(span),
            }
        }
        self.spans = merged;
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            let css = span.style.css();
            if !css.is_empty() {
                out.push_str(&format!("<span style=\"{}\">", escape_html(&css)));
            }
            if span.style.bold {
                out.push_str("<strong>");
            }
            if span.style.italic {
                out.push_str("<em>");
            }
            if span.style.underline {
                out.push_str("<u>");
            }
            out.push_str(&escape_html(&span.text).replace('\n', "<br/>"));
            if span.style.underline {
                out.push_str("</u>");
            }
            if span.style.italic {
                out.push_str("</em>");
            }
            if span.style.bold {
                out.push_str("</strong>");
            }
            if !css.is_empty() {
                out.push_str("</span>");
            }
        }
        out
    }

    /// Reads the inline subset the editor writes, plus legacy `b`, `i`,
    /// `font`, `div` and `p`. Unknown tags are skipped, their text is kept.
    pub fn from_html(html: &str) -> Self {
        let mut doc = Document::default();
        let mut stack: Vec<(String, SpanStyle)> = Vec::new();
        let mut rest = html;

        while !rest.is_empty() {
            let Some(lt) = rest.find('<') else {
                doc.push_text(&decode_entities(rest), &current_style(&stack));
                break;
            };
            if lt > 0 {
                doc.push_text(&decode_entities(&rest[..lt]), &current_style(&stack));
            }
            let Some(gt) = rest[lt..].find('>') else {
                doc.push_text(&decode_entities(&rest[lt..]), &current_style(&stack));
                break;
            };
            let tag = Tag::parse(&rest[lt + 1..lt + gt]);
            rest = &rest[lt + gt + 1..];

            let Some(tag) = tag else {
                continue;
            };
            if tag.closing {
                if let Some(pos) = stack.iter().rposition(|(name, _)| *name == tag.name) {
                    stack.truncate(pos);
                }
                continue;
            }

            let mut style = current_style(&stack);
            match tag.name.as_str() {
                "br" => {
                    doc.push_text("\n", &style);
                    continue;
                }
                "div" | "p" => {
                    if !doc.plain_text().is_empty() && !doc.plain_text().ends_with('\n') {
                        doc.push_text("\n", &style);
                    }
                }
                "strong" | "b" => style.bold = true,
                "em" | "i" => style.italic = true,
                "u" => style.underline = true,
                "span" => {
                    if let Some(css) = tag.attr("style") {
                        style.apply_css(css);
                    }
                }
                "font" => {
                    if let Some(face) = tag.attr("face") {
                        style.font_family = Some(face.to_string());
                    }
                    if let Some(color) = tag.attr("color") {
                        style.color = Some(color.to_string());
                    }
                }
                _ => continue,
            }
            if !tag.self_closing {
                stack.push((tag.name, style));
            }
        }

        doc.normalize();
        doc
    }

    fn push_text(&mut self, text: &str, style: &SpanStyle) {
        if text.is_empty() {
            return;
        }
        self.spans.push(Span {
            text: text.to_string(),
            style: style.clone(),
        });
    }
}

fn current_style(stack: &[(String, SpanStyle)]) -> SpanStyle {
    stack.last().map(|(_, s)| s.clone()).unwrap_or_default()
}

fn decode_entities(raw: &str) -> String {
    let collapsed: String = raw
        .chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect();
    collapsed
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

struct Tag {
    name: String,
    closing: bool,
    self_closing: bool,
    attrs: Vec<(String, String)>,
}

impl Tag {
    fn parse(inner: &str) -> Option<Tag> {
        let inner = inner.trim();
        let (closing, inner) = match inner.strip_prefix('/') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, inner),
        };
        let (self_closing, inner) = match inner.strip_suffix('/') {
            Some(rest) => (true, rest.trim_end()),
            None => (false, inner),
        };
        let name_end = inner
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(inner.len());
        if name_end == 0 {
            return None;
        }
        let name = inner[..name_end].to_ascii_lowercase();
        Some(Tag {
            name,
            closing,
            self_closing,
            attrs: parse_attrs(&inner[name_end..]),
        })
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn parse_attrs(mut raw: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    loop {
        raw = raw.trim_start();
        let Some(eq) = raw.find('=') else {
            break;
        };
        let key = raw[..eq].trim().to_ascii_lowercase();
        let after = raw[eq + 1..].trim_start();
        let (value, next) = match after.chars().next() {
            Some(quote @ ('"' | '\'')) => match after[1..].find(quote) {
                Some(close) => (&after[1..close + 1], &after[close + 2..]),
                None => (&after[1..], ""),
            },
            _ => {
                let end = after.find(char::is_whitespace).unwrap_or(after.len());
                (&after[..end], &after[end..])
            }
        };
        attrs.push((key, decode_entities(value)));
        raw = next;
    }
    attrs
}

/// Editor state: the document, the remembered selection and the HTML snapshot
/// refreshed after every change.
#[derive(Debug, Clone)]
pub struct Editor {
    doc: Document,
    selection: Option<Selection>,
    html: String,
}

impl Editor {
    pub fn new(doc: Document) -> Self {
        let html = doc.to_html();
        Self {
            doc,
            selection: None,
            html,
        }
    }

    pub fn from_stored(raw: &str) -> Self {
        Self::new(Document::from_stored(raw))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn save_selection(&mut self, selection: Selection) {
        self.selection = Some(selection.clamp(self.doc.char_len()));
    }

    /// Applies one command to the saved selection. Returns whether the
    /// document changed.
    pub fn apply(&mut self, command: &Command) -> bool {
        let changed = match command {
            Command::InsertText(text) => {
                let sel = self
                    .selection
                    .unwrap_or_else(|| Selection::caret(self.doc.char_len()));
                let caret = self.doc.insert_text(sel, text);
                self.selection = Some(Selection::caret(caret));
                true
            }
            other => match self.selection {
                Some(sel) => self.style(sel, other),
                None => false,
            },
        };
        if changed {
            self.html = self.doc.to_html();
        }
        changed
    }

    fn style(&mut self, sel: Selection, command: &Command) -> bool {
        let doc = &mut self.doc;
        match command {
            Command::Bold => doc.toggle(sel, |s| &mut s.bold),
            Command::Italic => doc.toggle(sel, |s| &mut s.italic),
            Command::Underline => doc.toggle(sel, |s| &mut s.underline),
            Command::FontName(family) => {
                let family = non_empty(family);
                doc.restyle(sel, |s| s.font_family = family.clone())
            }
            Command::ForeColor(color) => {
                let color = non_empty(color);
                doc.restyle(sel, |s| s.color = color.clone())
            }
            Command::FontSize(px) => {
                let px = (*px).clamp(1, 400);
                doc.restyle(sel, |s| s.font_size_px = Some(px))
            }
            Command::LineHeight(lh) => {
                let lh = non_empty(lh);
                doc.restyle(sel, |s| s.line_height = lh.clone())
            }
            Command::LetterSpacing(ls) => {
                let ls = non_empty(ls);
                doc.restyle(sel, |s| s.letter_spacing = ls.clone())
            }
            Command::TextShadow(preset) => {
                let preset = (*preset != ShadowPreset::None).then_some(*preset);
                doc.restyle(sel, |s| s.text_shadow = preset)
            }
            Command::RemoveFormat => doc.restyle(sel, |s| *s = SpanStyle::default()),
            Command::InsertText(_) => false,
        }
    }
}

/// `inherit` and blank values clear the property.
fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("inherit") {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(text: &str, start: usize, end: usize) -> Editor {
        let mut editor = Editor::new(Document::from_plain(text));
        editor.save_selection(Selection::new(start, end));
        editor
    }

    #[test]
    fn bold_wraps_only_the_selection() {
        let mut ed = editor("Fresh nuts daily", 6, 10);
        assert!(ed.apply(&Command::Bold));
        assert_eq!(ed.html(), "Fresh <strong>nuts</strong> daily");
        assert_eq!(ed.document().spans().len(), 3);
    }

    #[test]
    fn bold_toggles_off_when_range_is_bold() {
        let mut ed = editor("Fresh nuts daily", 6, 10);
        ed.apply(&Command::Bold);
        ed.apply(&Command::Bold);
        assert_eq!(ed.html(), "Fresh nuts daily");
        assert_eq!(ed.document().spans().len(), 1);
    }

    #[test]
    fn partially_bold_range_becomes_fully_bold() {
        let mut ed = editor("abcdef", 0, 3);
        ed.apply(&Command::Bold);
        ed.save_selection(Selection::new(1, 5));
        ed.apply(&Command::Bold);
        assert_eq!(ed.html(), "<strong>abcde</strong>f");
    }

    #[test]
    fn collapsed_or_missing_selection_is_noop_for_styles() {
        let mut ed = Editor::new(Document::from_plain("hello"));
        assert!(!ed.apply(&Command::Italic));
        ed.save_selection(Selection::caret(2));
        assert!(!ed.apply(&Command::Underline));
        assert_eq!(ed.html(), "hello");
    }

    #[test]
    fn inline_styles_render_as_span_css() {
        let mut ed = editor("Willkommen", 0, 10);
        ed.apply(&Command::FontSize(32));
        ed.apply(&Command::ForeColor("#111111".into()));
        ed.apply(&Command::TextShadow(ShadowPreset::Soft));
        assert_eq!(
            ed.html(),
            "<span style=\"color:#111111;font-size:32px;text-shadow:0 1px 2px rgba(0,0,0,.15)\">Willkommen</span>"
        );
    }

    #[test]
    fn font_names_with_quotes_are_escaped() {
        let mut ed = editor("Hi", 0, 2);
        ed.apply(&Command::FontName("\"Playfair Display\", serif".into()));
        assert_eq!(
            ed.html(),
            "<span style=\"font-family:&quot;Playfair Display&quot;, serif\">Hi</span>"
        );
        let parsed = Document::from_html(ed.html());
        assert_eq!(
            parsed.spans()[0].style.font_family.as_deref(),
            Some("\"Playfair Display\", serif")
        );
    }

    #[test]
    fn remove_format_clears_everything() {
        let mut ed = editor("abc", 0, 3);
        ed.apply(&Command::Bold);
        ed.apply(&Command::LineHeight("1.5".into()));
        ed.apply(&Command::RemoveFormat);
        assert_eq!(ed.html(), "abc");
    }

    #[test]
    fn insert_replaces_selection_and_inherits_style() {
        let mut ed = editor("ab cd", 0, 2);
        ed.apply(&Command::Bold);
        ed.save_selection(Selection::new(2, 5));
        ed.apply(&Command::InsertText("!".into()));
        assert_eq!(ed.document().plain_text(), "ab!");
        assert_eq!(ed.html(), "<strong>ab!</strong>");
        assert_eq!(ed.selection(), Some(Selection::caret(3)));
    }

    #[test]
    fn insert_without_selection_appends() {
        let mut ed = Editor::new(Document::from_plain("one"));
        ed.apply(&Command::InsertText("\ntwo".into()));
        assert_eq!(ed.html(), "one<br/>two");
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let mut ed = editor("Hoş geldiniz", 0, 3);
        ed.apply(&Command::Italic);
        assert_eq!(ed.html(), "<em>Hoş</em> geldiniz");
    }

    #[test]
    fn text_is_escaped() {
        let doc = Document::from_plain("a < b & \"c\"");
        assert_eq!(doc.to_html(), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn parses_legacy_markup() {
        let doc = Document::from_html(
            "<div>Hallo <b>Welt</b></div><div><font face=\"Georgia, serif\" color=\"red\">zwei</font><script>x</script></div>",
        );
        assert_eq!(doc.plain_text(), "Hallo Welt\nzweix");
        assert_eq!(
            doc.to_html(),
            "Hallo <strong>Welt</strong><br/><span style=\"font-family:Georgia, serif;color:red\">zwei</span>x"
        );
    }

    #[test]
    fn editor_output_parses_back_to_the_same_spans() {
        let mut ed = editor("Nuts & more\nfresh", 0, 4);
        ed.apply(&Command::Bold);
        ed.apply(&Command::Underline);
        ed.save_selection(Selection::new(5, 11));
        ed.apply(&Command::LetterSpacing("0.05em".into()));
        let parsed = Document::from_html(ed.html());
        assert_eq!(&parsed, ed.document());
    }

    #[test]
    fn stored_plain_text_keeps_newlines() {
        let ed = Editor::from_stored("line one\r\nline two");
        assert_eq!(ed.html(), "line one<br/>line two");
    }

    #[test]
    fn commands_deserialize_from_tagged_json() {
        let cmds: Vec<Command> = serde_json::from_str(
            r#"[{"type":"bold"},{"type":"font_size","value":18},{"type":"text_shadow","value":"glow"}]"#,
        )
        .expect("commands");
        assert_eq!(
            cmds,
            vec![
                Command::Bold,
                Command::FontSize(18),
                Command::TextShadow(ShadowPreset::Glow)
            ]
        );
    }
}
