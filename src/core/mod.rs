pub mod assemble;
pub mod engine;
pub mod extract;
pub mod pipeline;
pub mod schedule;
pub mod status;

pub use crate::domain::model::{EvaluatedSchedule, ResultDocument};
pub use crate::domain::ports::{ConfigProvider, PageSource, Pipeline};
pub use crate::utils::error::Result;
