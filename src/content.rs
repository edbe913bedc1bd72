// SPDX-License-Identifier: PMPL-1.0-or-later

//! Structured content blocks carried by locale bundles.
//!
//! Long-form copy (engine modals, legal pages) is stored in the translation
//! files as an array of typed blocks rather than a single string:
//!
//! ```json
//! [
//!   { "type": "h4", "text": "How it works" },
//!   { "type": "p", "text": "Every document is <strong>parsed</strong> first." },
//!   { "type": "ul", "items": ["one", "two"] },
//!   { "type": "quote", "text": "…", "text2": "— author" }
//! ]
//! ```
//!
//! Inline markup is allowed in paragraph, list and quote text. Only a small
//! set of attribute-free inline tags survives HTML rendering; everything else
//! is escaped. Terminal rendering strips markup entirely.
//!
//! Block arrays are read element by element: an entry with an unknown
//! `type` or missing fields is skipped and the rest still render.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::OnceLock;
use tracing::debug;

/// One block of structured copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "p")]
    Paragraph { text: String },
    #[serde(rename = "h4")]
    Heading { text: String },
    #[serde(rename = "ul")]
    List { items: Vec<String> },
    #[serde(rename = "code")]
    Code { text: String },
    #[serde(rename = "quote")]
    Quote {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text2: Option<String>,
    },
}

/// Deserialize an array of blocks, dropping the entries that do not parse.
pub fn deserialize_blocks<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<ContentBlock>(value) {
            Ok(block) => Some(block),
            Err(err) => {
                debug!(%err, "skipping content block");
                None
            }
        })
        .collect())
}

const INLINE_TAGS: &str = "strong|em|b|i|code|br";

fn inline_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"&lt;(/?)({})\s*/?&gt;", INLINE_TAGS))
            .expect("inline tag pattern is valid")
    })
}

fn any_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Escape text for HTML, then re-open the allowed inline tags.
pub fn sanitize_inline(raw: &str) -> String {
    let escaped = escape_html(raw);
    inline_tag_re().replace_all(&escaped, "<$1$2>").into_owned()
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Remove markup and decode the handful of entities the copy uses.
pub fn strip_markup(raw: &str) -> String {
    let without_tags = any_tag_re().replace_all(raw, "");
    without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

impl ContentBlock {
    pub fn to_html(&self) -> String {
        match self {
            ContentBlock::Paragraph { text } => format!("<p>{}</p>", sanitize_inline(text)),
            ContentBlock::Heading { text } => format!("<h4>{}</h4>", escape_html(text)),
            ContentBlock::List { items } => {
                let body: String = items
                    .iter()
                    .map(|item| format!("<li>{}</li>", sanitize_inline(item)))
                    .collect();
                format!("<ul>{}</ul>", body)
            }
            ContentBlock::Code { text } => {
                format!("<pre><code>{}</code></pre>", escape_html(text))
            }
            ContentBlock::Quote { text, text2 } => {
                let mut html = format!("<blockquote><p>{}</p>", sanitize_inline(text));
                if let Some(second) = text2 {
                    html.push_str(&format!("<p>{}</p>", sanitize_inline(second)));
                }
                html.push_str("</blockquote>");
                html
            }
        }
    }

    /// Plain-text lines for terminal output.
    pub fn to_plain_lines(&self) -> Vec<String> {
        match self {
            ContentBlock::Paragraph { text } => vec![strip_markup(text)],
            ContentBlock::Heading { text } => vec![format!("## {}", strip_markup(text))],
            ContentBlock::List { items } => items
                .iter()
                .map(|item| format!("  • {}", strip_markup(item)))
                .collect(),
            ContentBlock::Code { text } => text.lines().map(|line| format!("    {}", line)).collect(),
            ContentBlock::Quote { text, text2 } => {
                let mut lines = vec![format!("  │ {}", strip_markup(text))];
                if let Some(second) = text2 {
                    lines.push(format!("  │ {}", strip_markup(second)));
                }
                lines
            }
        }
    }
}

pub fn render_html(blocks: &[ContentBlock]) -> String {
    blocks.iter().map(ContentBlock::to_html).collect()
}

pub fn render_plain(blocks: &[ContentBlock]) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        lines.extend(block.to_plain_lines());
    }
    lines
}
