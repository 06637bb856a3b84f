pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod output;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, Command};

pub use adapters::storage::LocalStorage;
pub use config::ReportConfig;
pub use core::{etl::ReportEngine, library::parse_library, pipeline::ReportPipeline};
pub use utils::error::{ReportError, Result};
pub use utils::logger::RunLog;
