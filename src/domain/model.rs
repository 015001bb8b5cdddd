use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Instants are rendered as `YYYY-MM-DDTHH:MM:SSZ`, never with fractional seconds.
pub mod utc_seconds {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::Serializer;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(instant) => super::serialize(instant, serializer),
                None => serializer.serialize_none(),
            }
        }
    }
}

/// One scheduled window for a zone. `end_utc` is always after `start_utc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activation {
    pub date: NaiveDate,
    #[serde(with = "utc_seconds")]
    pub start_utc: DateTime<Utc>,
    #[serde(with = "utc_seconds")]
    pub end_utc: DateTime<Utc>,
}

/// Activations collected for one zone, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneActivations {
    pub name: String,
    pub activations: Vec<Activation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedSchedule {
    pub zones: Vec<ZoneActivations>,
}

impl ParsedSchedule {
    /// Index of the zone named `name`, created on first encounter.
    pub fn entry(&mut self, name: &str) -> usize {
        if let Some(index) = self.zones.iter().position(|zone| zone.name == name) {
            return index;
        }
        self.zones.push(ZoneActivations {
            name: name.to_string(),
            activations: Vec::new(),
        });
        self.zones.len() - 1
    }

    pub fn get(&self, name: &str) -> Option<&ZoneActivations> {
        self.zones.iter().find(|zone| zone.name == name)
    }

    pub fn activation_count(&self) -> usize {
        self.zones.iter().map(|zone| zone.activations.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneFlags {
    pub is_active_now: bool,
    pub will_be_active: bool,
    pub will_be_active_soon: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneRecord {
    #[serde(skip)]
    pub name: String,
    pub activations: Vec<Activation>,
    pub is_active_now: bool,
    pub will_be_active: bool,
    pub will_be_active_soon: bool,
}

impl ZoneRecord {
    pub fn new(zone: ZoneActivations, flags: ZoneFlags) -> Self {
        Self {
            name: zone.name,
            activations: zone.activations,
            is_active_now: flags.is_active_now,
            will_be_active: flags.will_be_active,
            will_be_active_soon: flags.will_be_active_soon,
        }
    }

    pub fn indicator(&self) -> ZoneIndicator {
        if self.is_active_now {
            ZoneIndicator::ActiveNow
        } else if self.will_be_active_soon {
            ZoneIndicator::ActiveSoon
        } else if self.will_be_active {
            ZoneIndicator::ActiveLater
        } else {
            ZoneIndicator::Inactive
        }
    }
}

/// Single display level for a zone, as shown by field indicator devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneIndicator {
    ActiveNow,
    ActiveSoon,
    ActiveLater,
    Inactive,
}

impl fmt::Display for ZoneIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ZoneIndicator::ActiveNow => "active now",
            ZoneIndicator::ActiveSoon => "active within 4 hours",
            ZoneIndicator::ActiveLater => "active later",
            ZoneIndicator::Inactive => "inactive",
        };
        f.write_str(label)
    }
}

/// Display window stated by the page. Either bound may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidityInterval {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Flagged zones plus the page interval, before filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvaluatedSchedule {
    pub interval: ValidityInterval,
    pub zones: Vec<ZoneRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(with = "utc_seconds::option")]
    pub interval_start_utc: Option<DateTime<Utc>>,
    #[serde(with = "utc_seconds::option")]
    pub interval_end_utc: Option<DateTime<Utc>>,
    pub zones_total: usize,
    pub zones_active_now: usize,
    pub zones_will_be_active: usize,
    pub zones_will_be_active_soon: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultDocument {
    pub metadata: Metadata,
    #[serde(serialize_with = "zones_as_map")]
    pub zones: Vec<ZoneRecord>,
}

impl ResultDocument {
    pub fn zone(&self, name: &str) -> Option<&ZoneRecord> {
        self.zones.iter().find(|zone| zone.name == name)
    }

    pub fn indicator_for(&self, name: &str) -> ZoneIndicator {
        self.zone(name)
            .map(ZoneRecord::indicator)
            .unwrap_or(ZoneIndicator::Inactive)
    }
}

// Keeps first-seen order in the JSON object.
fn zones_as_map<S: Serializer>(zones: &[ZoneRecord], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(zones.len()))?;
    for zone in zones {
        map.serialize_entry(&zone.name, zone)?;
    }
    map.end()
}
