use crate::domain::model::{Activation, ParsedSchedule, ZoneFlags, ZoneRecord};
use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_ANTICIPATION_MINUTES: i64 = 5;
pub const DEFAULT_SOON_WINDOW_MINUTES: i64 = 4 * 60;

/// Derives the per-zone activity flags relative to a reference instant.
///
/// Starts are compared against `now + anticipation` so a zone flips to active
/// slightly before its slot while a polling client waits for the next refresh.
/// Ends are compared against `now` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEvaluator {
    anticipation: Duration,
    soon_window: Duration,
}

impl Default for StatusEvaluator {
    fn default() -> Self {
        Self::new(
            Duration::minutes(DEFAULT_ANTICIPATION_MINUTES),
            Duration::minutes(DEFAULT_SOON_WINDOW_MINUTES),
        )
    }
}

impl StatusEvaluator {
    pub fn new(anticipation: Duration, soon_window: Duration) -> Self {
        Self {
            anticipation,
            soon_window,
        }
    }

    pub fn flags(&self, activations: &[Activation], now: DateTime<Utc>) -> ZoneFlags {
        let now_anticipated = now + self.anticipation;
        let soon_horizon = now + self.soon_window + self.anticipation;

        activations
            .iter()
            .fold(ZoneFlags::default(), |mut flags, activation| {
                let start = activation.start_utc;
                if now_anticipated >= start && now <= activation.end_utc {
                    flags.is_active_now = true;
                }
                if start > now_anticipated {
                    flags.will_be_active = true;
                    if start <= soon_horizon {
                        flags.will_be_active_soon = true;
                    }
                }
                flags
            })
    }

    pub fn evaluate(&self, schedule: ParsedSchedule, now: DateTime<Utc>) -> Vec<ZoneRecord> {
        schedule
            .zones
            .into_iter()
            .map(|zone| {
                let flags = self.flags(&zone.activations, now);
                ZoneRecord::new(zone, flags)
            })
            .collect()
    }
}
