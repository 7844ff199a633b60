pub mod archive_builder;
pub mod converter;
pub mod error;
pub mod filter;
pub mod orchestrator;
pub mod post_renderer;

pub use error::ExportError;
pub use orchestrator::{ConversionPolicy, ExportOrchestrator, ExportRequest, ExportSettings, ExportedArchive};
