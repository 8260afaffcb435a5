pub mod aggregate;
pub mod extractor;
pub mod fetcher;
pub mod guard;
pub mod insights;
pub mod pipeline;
pub mod prediction;
pub mod render;
pub mod stats;
pub mod surface;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod visuals;


pub use pipeline::{Pipeline, PipelineSettings, RunOutcome, RunReport};
pub use surface::{Fragment, MemorySurface, ReportSurface, StreamSurface};
