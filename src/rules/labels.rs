// SPDX-License-Identifier: PMPL-1.0-or-later
//! Label text inserted by attribute-presence fixes.
//!
//! `Placeholder` mode inserts a fixed marker for a human to replace.
//! `Heuristic` mode guesses from filenames, hrefs, classes and input types.
//! Heuristic output is a starting point, never a verified description.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Default placeholder inserted in `Placeholder` mode
pub const DEFAULT_PLACEHOLDER: &str = "TODO: describe";

/// Maximum label length before truncation
const MAX_LABEL_LEN: usize = 60;

/// Domains recognised in link hrefs
const SOCIAL_SITES: &[&str] = &["twitter", "facebook", "linkedin", "instagram", "youtube", "github"];

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_\-+]+").expect("valid regex"));
static IMAGE_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(img|image|photo|picture)\b").expect("valid regex"));
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));
static SCHEME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://(www\.)?").expect("valid regex"));

/// Button hints: (pattern over the tag's attributes, label)
static BUTTON_HINTS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\b(close|dismiss|cancel|close-btn)\b", "Close"),
        (r"\b(submit|send|save|confirm)\b", "Submit"),
        (r"\b(search|find)\b", "Search"),
        (r"\b(menu|open-menu|toggle)\b", "Open menu"),
        (r"\b(next|prev|previous)\b", "Next"),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(pattern).expect("valid regex"), label))
    .collect()
});

/// How label text is produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// Insert the configured placeholder
    #[default]
    Placeholder,
    /// Guess a label from the surrounding markup
    Heuristic,
}

impl std::str::FromStr for LabelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "placeholder" => Ok(LabelMode::Placeholder),
            "heuristic" => Ok(LabelMode::Heuristic),
            other => Err(format!("Unknown label mode: {}", other)),
        }
    }
}

/// Produces attribute values for the attribute-presence fixes
#[derive(Debug, Clone)]
pub struct Labeler {
    mode: LabelMode,
    placeholder: String,
}

impl Default for Labeler {
    fn default() -> Self {
        Self::new(LabelMode::Placeholder, DEFAULT_PLACEHOLDER)
    }
}

impl Labeler {
    pub fn new(mode: LabelMode, placeholder: &str) -> Self {
        Self {
            mode,
            placeholder: placeholder.replace('"', "'"),
        }
    }

    pub fn mode(&self) -> LabelMode {
        self.mode
    }

    pub fn image(&self, src: Option<&str>) -> String {
        match self.mode {
            LabelMode::Placeholder => self.placeholder.clone(),
            LabelMode::Heuristic => sanitize(&guess_alt_from_src(src.unwrap_or(""))),
        }
    }

    pub fn button(&self, attrs: &str, inner: &str) -> String {
        match self.mode {
            LabelMode::Placeholder => self.placeholder.clone(),
            LabelMode::Heuristic => guess_button_label(attrs, inner),
        }
    }

    pub fn control(&self, attrs: &str) -> String {
        match self.mode {
            LabelMode::Placeholder => self.placeholder.clone(),
            LabelMode::Heuristic => guess_control_label(attrs),
        }
    }

    pub fn link(&self, href: Option<&str>, inner: &str) -> String {
        match self.mode {
            LabelMode::Placeholder => self.placeholder.clone(),
            LabelMode::Heuristic => guess_link_label(href.unwrap_or(""), inner),
        }
    }
}

/// Collapse whitespace, swap double quotes for single, truncate long text
pub fn sanitize(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ").replace('"', "'");
    if collapsed.chars().count() > MAX_LABEL_LEN {
        let truncated: String = collapsed.chars().take(MAX_LABEL_LEN).collect();
        format!("{}...", truncated.trim_end())
    } else {
        collapsed
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Guess alt text from an image source path
pub fn guess_alt_from_src(src: &str) -> String {
    let src = src.split(['?', '#']).next().unwrap_or("");
    if src.is_empty() || src.starts_with("data:") {
        return "Image".to_string();
    }
    let filename = src.rsplit('/').next().unwrap_or(src);
    let stem = match filename.rfind('.') {
        Some(dot) if dot > 0 => &filename[..dot],
        _ => filename,
    };
    let name = SEPARATORS.replace_all(stem, " ");
    let name = IMAGE_WORDS.replace_all(&name, "");
    let name = DIGITS.replace_all(&name, "");
    let name = sanitize(&name);
    if name.is_empty() {
        "Image".to_string()
    } else {
        capitalize(&name)
    }
}

/// Guess a button label from its visible content or its attributes
pub fn guess_button_label(attrs: &str, inner: &str) -> String {
    let visible = super::markup::visible_text(inner);
    if !visible.is_empty() {
        return sanitize(&visible);
    }

    let attrs = attrs.to_lowercase();
    let inner_lower = inner.to_lowercase();
    for (pattern, label) in BUTTON_HINTS.iter() {
        if pattern.is_match(&attrs) || (*label == "Close" && inner_lower.contains("close")) {
            return label.to_string();
        }
    }
    if inner_lower.contains("<svg") || attrs.contains("icon") {
        return "Icon button".to_string();
    }
    "Button".to_string()
}

/// Guess a form control label from its type, name, id and class
pub fn guess_control_label(attrs: &str) -> String {
    let tag_text = format!("<x{}>", attrs);
    let tag = super::markup::start_tags(&tag_text).next();
    let value = |name: &str| {
        tag.as_ref()
            .and_then(|t| t.attr_value(name))
            .unwrap_or("")
            .to_string()
    };
    let kind = value("type").to_lowercase();
    let name = value("name");
    let id = value("id");
    let class = value("class");

    let label = if format!("{}{}{}{}", kind, name, id, class).contains("email") {
        "Email address"
    } else if format!("{}{}{}", kind, name, id).contains("password") {
        "Password"
    } else if kind.contains("tel") || name.contains("phone") {
        "Phone number"
    } else if kind.contains("search") || name.contains("search") {
        "Search"
    } else if kind.contains("date") {
        "Date"
    } else if kind.contains("number") {
        "Number"
    } else if !name.is_empty() {
        return sanitize(&name.replace(['_', '-'], " "));
    } else if !id.is_empty() {
        return sanitize(&id.replace(['_', '-'], " "));
    } else if let Some(token) = class.split_whitespace().next() {
        return sanitize(&token.replace('-', " "));
    } else {
        "Input field"
    };
    label.to_string()
}

/// Guess a link label from its href
pub fn guess_link_label(href: &str, inner: &str) -> String {
    if href.is_empty() {
        let visible = super::markup::visible_text(inner);
        return if visible.is_empty() { "Link".to_string() } else { sanitize(&visible) };
    }

    let href = href.to_lowercase();
    if let Some(site) = SOCIAL_SITES.iter().find(|s| href.contains(*s)) {
        return format!("Visit {}", capitalize(site));
    }

    if href.starts_with('/') {
        let first = href.trim_matches('/').split('/').next().unwrap_or("");
        let part = if first.is_empty() { "page" } else { first };
        return format!("Go to {}", sanitize(&part.replace('-', " ")));
    }

    let rest = SCHEME.replace(&href, "");
    let host = rest.split('/').next().unwrap_or("");
    let host = host.split(':').next().unwrap_or("");
    let parts: Vec<&str> = host.split('.').collect();
    let host = if parts.len() > 1 { parts[parts.len() - 2] } else { host };
    let host = sanitize(host);
    if host.is_empty() {
        "Visit link".to_string()
    } else {
        format!("Visit {}", capitalize(&host))
    }
}
