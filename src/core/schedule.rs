//! Line-oriented parser for the active zones block.
//!
//! The block is a flat run of lines: a date line, then zone names each
//! followed by their `HHMM-HHMM` slots, until the next date. Lines are
//! classified on their own, then folded through a small state machine that
//! carries the current date and zone.

use crate::core::extract::SECTION_START_MARKERS;
use crate::domain::model::{Activation, ParsedSchedule};
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

const COLUMN_HEADERS: &[&str] = &["créneaux horaires", "time slots"];
const NO_ACTIVE_ZONE: &[&str] = &["aucune zone active", "no active zone"];
const HEADER_PREFIXES: &[&str] = &["date", "zone"];

static DATE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("date regex is valid"));
static ZONE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^R[0-9A-Z.]+$").expect("zone regex is valid"));
static TIME_SLOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([01][0-9]|2[0-3])([0-5][0-9])-([01][0-9]|2[0-3])([0-5][0-9])\b")
        .expect("time slot regex is valid")
});

/// What a single trimmed line of the block is, tried in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Header,
    /// `None` when the line is shaped like a date but is not a calendar day.
    Date(Option<NaiveDate>),
    NoActiveZone,
    Zone(&'a str),
    Text(&'a str),
}

fn contains_ci(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|needle| lower.contains(&needle.to_lowercase()))
}

fn is_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    contains_ci(line, SECTION_START_MARKERS)
        || contains_ci(line, COLUMN_HEADERS)
        || HEADER_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

pub fn classify_line(raw: &str) -> LineKind<'_> {
    let line = raw.trim();
    if line.is_empty() || line == "-" {
        return LineKind::Blank;
    }
    if is_header(line) {
        return LineKind::Header;
    }
    if let Some(caps) = DATE_LINE.captures(line) {
        let day = caps[1].parse().unwrap_or(0);
        let month = caps[2].parse().unwrap_or(0);
        let year = caps[3].parse().unwrap_or(0);
        return LineKind::Date(NaiveDate::from_ymd_opt(year, month, day));
    }
    if contains_ci(line, NO_ACTIVE_ZONE) {
        return LineKind::NoActiveZone;
    }
    if ZONE_LINE.is_match(line) {
        return LineKind::Zone(line);
    }
    LineKind::Text(line)
}

/// Every `HHMM-HHMM` slot in `line`, as (start, end) wall-clock times.
pub fn time_slots(line: &str) -> Vec<(NaiveTime, NaiveTime)> {
    TIME_SLOT
        .captures_iter(line)
        .filter_map(|caps| {
            let field = |i: usize| caps[i].parse::<u32>().ok();
            let start = NaiveTime::from_hms_opt(field(1)?, field(2)?, 0)?;
            let end = NaiveTime::from_hms_opt(field(3)?, field(4)?, 0)?;
            Some((start, end))
        })
        .collect()
}

/// Anchors a slot on `date`. An end at or before the start (`2200-0000`)
/// belongs to the next calendar day.
pub fn build_activation(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Option<Activation> {
    let end_date = if end <= start { date.succ_opt()? } else { date };
    Some(Activation {
        date,
        start_utc: date.and_time(start).and_utc(),
        end_utc: end_date.and_time(end).and_utc(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    NoDate,
    Dated(NaiveDate),
    InZone { date: NaiveDate, zone: usize },
}

impl ScanState {
    fn date(self) -> Option<NaiveDate> {
        match self {
            ScanState::NoDate => None,
            ScanState::Dated(date) | ScanState::InZone { date, .. } => Some(date),
        }
    }
}

fn step(state: ScanState, kind: LineKind<'_>, schedule: &mut ParsedSchedule) -> ScanState {
    match kind {
        LineKind::Blank | LineKind::Header => state,
        LineKind::Date(Some(date)) => ScanState::Dated(date),
        LineKind::Date(None) => {
            tracing::warn!("invalid calendar date in schedule, dropping date context");
            ScanState::NoDate
        }
        LineKind::NoActiveZone => match state.date() {
            Some(date) => ScanState::Dated(date),
            None => ScanState::NoDate,
        },
        LineKind::Zone(name) => match state.date() {
            Some(date) => ScanState::InZone {
                date,
                zone: schedule.entry(name),
            },
            None => {
                tracing::warn!(zone = name, "zone listed before any date, skipped");
                ScanState::NoDate
            }
        },
        LineKind::Text(line) => {
            if let ScanState::InZone { date, zone } = state {
                for (start, end) in time_slots(line) {
                    match build_activation(date, start, end) {
                        Some(activation) => schedule.zones[zone].activations.push(activation),
                        None => tracing::warn!(%date, line, "time slot could not be anchored"),
                    }
                }
            }
            state
        }
    }
}

/// Parses the block into zones and activations, in first-seen order.
pub fn parse_schedule(section: &str) -> ParsedSchedule {
    let mut schedule = ParsedSchedule::default();
    section
        .split(|c: char| c == '\n' || c == '\r')
        .map(classify_line)
        .fold(ScanState::NoDate, |state, kind| step(state, kind, &mut schedule));

    tracing::debug!(
        zones = schedule.zones.len(),
        activations = schedule.activation_count(),
        "schedule parsed"
    );
    schedule
}
