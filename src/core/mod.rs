pub mod classifier;
pub mod etl;
pub mod letters;
pub mod library;
pub mod pipeline;
pub mod scantron;
pub mod statistics;

pub use crate::domain::model::{Library, ReportData, ScantronData, Statistics, SurveyInput};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
