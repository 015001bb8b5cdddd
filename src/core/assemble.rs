use crate::domain::model::{EvaluatedSchedule, Metadata, ResultDocument, ZoneRecord};

/// Uppercases and removes all whitespace. An empty raw value means no filter.
pub fn normalize_zone_filter(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    Some(
        raw.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect(),
    )
}

/// Builds the output document. An unmatched filter gives an empty zone map,
/// never an error. Counters describe the returned zones only.
pub fn assemble(schedule: EvaluatedSchedule, zone_filter: Option<&str>) -> ResultDocument {
    let filter = zone_filter.and_then(normalize_zone_filter);

    let zones: Vec<ZoneRecord> = match &filter {
        Some(name) => schedule
            .zones
            .into_iter()
            .filter(|zone| &zone.name == name)
            .collect(),
        None => schedule.zones,
    };

    if let Some(name) = &filter {
        if zones.is_empty() {
            tracing::info!(zone = %name, "requested zone not in schedule");
        }
    }

    let count = |flag: fn(&ZoneRecord) -> bool| zones.iter().filter(|z| flag(z)).count();
    let metadata = Metadata {
        interval_start_utc: schedule.interval.start,
        interval_end_utc: schedule.interval.end,
        zones_total: zones.len(),
        zones_active_now: count(|z| z.is_active_now),
        zones_will_be_active: count(|z| z.will_be_active),
        zones_will_be_active_soon: count(|z| z.will_be_active_soon),
    };

    ResultDocument { metadata, zones }
}
