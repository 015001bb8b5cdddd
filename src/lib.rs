pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TomlConfig;

pub use adapters::{HttpPageSource, StaticPageSource};
pub use crate::core::{
    engine::{ScheduleEngine, ScheduleRequest},
    pipeline::SchedulePipeline,
};
pub use domain::model::{Activation, ResultDocument, ZoneIndicator, ZoneRecord};
pub use utils::error::{AzbaError, Result};
