pub mod aggregate;
pub mod chart;
pub mod count;
pub mod dashboard;
pub mod etl;
pub mod loader;
pub mod pipeline;

pub use crate::domain::model::{ExtractResult, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
