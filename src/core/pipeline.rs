use crate::core::assemble::assemble;
use crate::core::extract::{decode_page, extract_section};
use crate::core::schedule::parse_schedule;
use crate::core::status::StatusEvaluator;
use crate::core::{ConfigProvider, PageSource, Pipeline};
use crate::domain::model::{EvaluatedSchedule, ResultDocument};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Fetch, parse and flag the schedule page from one `PageSource`.
pub struct SchedulePipeline<S: PageSource> {
    source: S,
    evaluator: StatusEvaluator,
}

impl<S: PageSource> SchedulePipeline<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            evaluator: StatusEvaluator::default(),
        }
    }

    pub fn with_config<C: ConfigProvider>(source: S, config: &C) -> Self {
        Self {
            source,
            evaluator: StatusEvaluator::new(config.anticipation(), config.soon_window()),
        }
    }
}

#[async_trait::async_trait]
impl<S: PageSource> Pipeline for SchedulePipeline<S> {
    async fn extract(&self) -> Result<String> {
        tracing::debug!("Fetching schedule page from {}", self.source.describe());
        let html = self.source.fetch_page().await?;
        tracing::debug!("Fetched {} bytes", html.len());
        Ok(html)
    }

    fn transform(&self, html: &str, now: DateTime<Utc>) -> Result<EvaluatedSchedule> {
        let text = decode_page(html);
        let section = extract_section(&text)?;
        let parsed = parse_schedule(&section.text);
        let zones = self.evaluator.evaluate(parsed, now);

        Ok(EvaluatedSchedule {
            interval: section.interval,
            zones,
        })
    }

    fn load(&self, schedule: EvaluatedSchedule, zone_filter: Option<&str>) -> ResultDocument {
        assemble(schedule, zone_filter)
    }
}
