pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
#[cfg(feature = "s3")]
pub use config::s3::S3Storage;
pub use config::{cli::LocalStorage, ReportSettings};
pub use core::{engine::ReportEngine, report::ReportPipeline};
pub use render::HtmlTimeline;
pub use utils::error::{ReportError, Result};
