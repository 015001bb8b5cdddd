//! Page decoding and location of the active zones block.

use crate::domain::model::ValidityInterval;
use crate::utils::error::{AzbaError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Opening phrase of the active zones block, in the page's wording and in English.
pub const SECTION_START_MARKERS: &[&str] = &["Liste des zones activées", "list of activated zones"];

/// Phrase that follows the block. The block runs to end of text without it.
pub const SECTION_END_MARKERS: &[&str] = &["Au delà du", "beyond the"];

fn marker_regex(markers: &[&str]) -> Regex {
    let alternatives: Vec<String> = markers.iter().map(|m| regex::escape(m)).collect();
    Regex::new(&format!("(?i){}", alternatives.join("|"))).expect("marker regex is valid")
}

static SECTION_START: LazyLock<Regex> = LazyLock::new(|| marker_regex(SECTION_START_MARKERS));
static SECTION_END: LazyLock<Regex> = LazyLock::new(|| marker_regex(SECTION_END_MARKERS));

static INTERVAL_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:du|from)\s+(\d{2}/\d{2}/\d{4})\s+(?:à|at)\s+(\d{2}:\d{2})\s+UTC")
        .expect("interval start regex is valid")
});
static INTERVAL_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:à|at)\s+(\d{2}/\d{2}/\d{4})\s+(?:à|at)\s+(\d{2}:\d{2})\s+UTC")
        .expect("interval end regex is valid")
});

static COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex is valid"));
static SCRIPTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>")
        .expect("script regex is valid")
});
static BLOCK_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*/?\s*(?:br|p|div|tr|td|th|li|ul|ol|table|tbody|thead|h[1-6])\b[^>]*>")
        .expect("block tag regex is valid")
});
static TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSection {
    pub text: String,
    pub interval: ValidityInterval,
}

/// Turns raw HTML into plain text: markup dropped, entities resolved,
/// block-level elements on their own lines.
pub fn decode_page(html: &str) -> String {
    let text = COMMENTS.replace_all(html, "");
    let text = SCRIPTS.replace_all(&text, "");
    let text = BLOCK_TAGS.replace_all(&text, "\n");
    let text = TAGS.replace_all(&text, "");
    html_escape::decode_html_entities(&text).replace('\u{a0}', " ")
}

/// Bounds the active zones block and reads the stated display interval.
///
/// The interval is searched in the whole text, not only the block.
pub fn extract_section(text: &str) -> Result<PageSection> {
    let start = SECTION_START
        .find(text)
        .ok_or_else(|| AzbaError::SectionNotFound {
            marker: SECTION_START_MARKERS[0].to_string(),
        })?
        .start();

    let end = SECTION_END
        .find_at(text, start)
        .map(|m| m.start())
        .unwrap_or(text.len());

    tracing::debug!(start, end, "active zones block located");

    Ok(PageSection {
        text: text[start..end].to_string(),
        interval: extract_interval(text),
    })
}

pub fn extract_interval(text: &str) -> ValidityInterval {
    let interval = ValidityInterval {
        start: capture_instant(&INTERVAL_START, text),
        end: capture_instant(&INTERVAL_END, text),
    };
    if interval.start.is_none() || interval.end.is_none() {
        tracing::debug!(?interval, "display interval incomplete");
    }
    interval
}

fn capture_instant(pattern: &Regex, text: &str) -> Option<DateTime<Utc>> {
    let caps = pattern.captures(text)?;
    let raw = format!("{} {}", &caps[1], &caps[2]);
    match NaiveDateTime::parse_from_str(&raw, "%d/%m/%Y %H:%M") {
        Ok(naive) => Some(naive.and_utc()),
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "unparseable interval bound");
            None
        }
    }
}
