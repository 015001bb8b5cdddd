use crate::domain::model::{EvaluatedSchedule, ResultDocument};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Where the raw schedule page comes from.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self) -> Result<String>;

    /// Human readable origin, for logs.
    fn describe(&self) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn source_url(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn anticipation(&self) -> chrono::Duration;
    fn soon_window(&self) -> chrono::Duration;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Raw HTML of the schedule page.
    async fn extract(&self) -> Result<String>;
    fn transform(&self, html: &str, now: DateTime<Utc>) -> Result<EvaluatedSchedule>;
    fn load(&self, schedule: EvaluatedSchedule, zone_filter: Option<&str>) -> ResultDocument;
}
