// Adapters layer: concrete page sources for the schedule pipeline.

pub mod file;
pub mod http;

pub use file::StaticPageSource;
pub use http::HttpPageSource;
