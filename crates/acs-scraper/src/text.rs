//! Pure text and URL helpers shared by the extractors.

use std::sync::LazyLock;

use acs_core::Sport;
use regex::Regex;
use reqwest::Url;
use sha2::{Digest, Sha256};

/// Shown wherever the upstream leaves a team cell blank or as a dash.
pub const FALLBACK_TEAM_NAME: &str = "تیم نامشخص";

const SLUG_TITLE_MAX_CHARS: usize = 60;
const HASHED_ID_LEN: usize = 12;

static BEACH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)beach|ساحلی").expect("valid beach regex"));
static HREF_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(?:fullcontent|news|newsdetail)/(\d+)").expect("valid href id regex")
});
static SLUG_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^news-([0-9A-Za-z]+)(?:-|$)").expect("valid slug id regex"));
static SLUG_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\x{0600}-\x{06FF}-]+").expect("valid slug strip regex"));
static SLUG_SEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("valid slug separator regex"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]?\d+").expect("valid number regex"));

/// Collapses every whitespace run to one space and trims the ends.
#[must_use]
pub fn clean_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves `input` against `base`.
///
/// Empty input yields an empty string; absolute URLs pass through unchanged.
/// Input that cannot be joined also yields an empty string, which every
/// caller treats as "no URL".
#[must_use]
pub fn absolute_url(base: &Url, input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return trimmed.to_owned();
    }
    base.join(trimmed).map(String::from).unwrap_or_default()
}

#[must_use]
pub fn normalize_team_name(input: &str) -> String {
    let cleaned = clean_text(input);
    match cleaned.as_str() {
        "" | "-" | "—" | "–" => FALLBACK_TEAM_NAME.to_owned(),
        _ => cleaned,
    }
}

/// Beach soccer if the text mentions it, futsal otherwise.
#[must_use]
pub fn infer_sport(text: &str) -> Sport {
    if BEACH_RE.is_match(text) {
        Sport::Beach
    } else {
        Sport::Futsal
    }
}

/// Article id for a link: the numeric upstream id when the path carries one,
/// else a stable 12-character hash of the href.
#[must_use]
pub fn extract_id_from_href(href: &str) -> String {
    if let Some(id) = HREF_ID_RE.captures(href).and_then(|c| c.get(1)) {
        return id.as_str().to_owned();
    }
    let digest = Sha256::digest(href.trim().as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..HASHED_ID_LEN].to_owned()
}

/// Inverse of [`create_article_slug`].
#[must_use]
pub fn extract_id_from_slug(slug: &str) -> Option<String> {
    SLUG_ID_RE
        .captures(slug.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Builds `news-{id}-{slugified title}`, or `news-{id}` for an empty title.
#[must_use]
pub fn create_article_slug(id: &str, title: &str) -> String {
    let title_part: String = slugify(title).chars().take(SLUG_TITLE_MAX_CHARS).collect();
    let title_part = title_part.trim_matches('-');
    if title_part.is_empty() {
        format!("news-{id}")
    } else {
        format!("news-{id}-{title_part}")
    }
}

/// Lowercases, drops characters outside word/Persian/whitespace/hyphen and
/// joins the remaining words with single hyphens.
#[must_use]
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    let stripped = SLUG_STRIP_RE.replace_all(&lowered, "");
    let hyphenated = SLUG_SEP_RE.replace_all(stripped.trim(), "-");
    hyphenated.trim_matches('-').to_owned()
}

/// Maps Persian and Arabic-Indic digits to ASCII.
#[must_use]
pub fn normalize_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{06F0}'..='\u{06F9}' => {
                char::from_digit(u32::from(c) - 0x06F0, 10).unwrap_or(c)
            }
            '\u{0660}'..='\u{0669}' => {
                char::from_digit(u32::from(c) - 0x0660, 10).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// First signed integer found in a table cell; `0` when there is none.
#[must_use]
pub fn coerce_number(cell: &str) -> i64 {
    let normalized = normalize_digits(cell).replace('\u{2212}', "-");
    NUMBER_RE
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "text_test.rs"]
mod tests;
