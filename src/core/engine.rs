use crate::core::Pipeline;
use crate::domain::model::ResultDocument;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub now: DateTime<Utc>,
    pub zone_filter: Option<String>,
}

impl ScheduleRequest {
    pub fn new(now: DateTime<Utc>, zone_filter: Option<&str>) -> Self {
        Self {
            now,
            zone_filter: zone_filter.map(str::to_string),
        }
    }

    pub fn at_wall_clock(zone_filter: Option<&str>) -> Self {
        Self::new(Utc::now(), zone_filter)
    }
}

/// Runs one request end to end. Holds no state between requests.
pub struct ScheduleEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ScheduleEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self, request: &ScheduleRequest) -> Result<ResultDocument> {
        let started = Instant::now();

        let html = self.pipeline.extract().await?;
        let schedule = self.pipeline.transform(&html, request.now)?;
        tracing::debug!("Evaluated {} zones at {}", schedule.zones.len(), request.now);

        let document = self
            .pipeline
            .load(schedule, request.zone_filter.as_deref());

        tracing::info!(
            zones_total = document.metadata.zones_total,
            zones_active_now = document.metadata.zones_active_now,
            zones_will_be_active = document.metadata.zones_will_be_active,
            zones_will_be_active_soon = document.metadata.zones_will_be_active_soon,
            filter = ?request.zone_filter,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "schedule assembled"
        );

        Ok(document)
    }
}
