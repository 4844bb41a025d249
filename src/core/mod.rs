pub mod engine;
pub mod enrich;
pub mod fields;
pub mod filter;
pub mod flatten;
pub mod path;
pub mod report;
pub mod summary;

pub use crate::domain::model::{
    EnrichedRecord, FlatRecord, ReportData, ReportOutcome, SummaryReport,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, TimelineRenderer};
pub use crate::utils::error::Result;
