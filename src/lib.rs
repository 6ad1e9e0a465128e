pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{aggregate::aggregate, chart::build_chart, count::parse_count};
pub use core::{dashboard::Dashboard, etl::EtlEngine, pipeline::DashboardPipeline};
pub use domain::model::{ChartSpec, CountValue, DestinationAggregate, DisplacementRecord, PeriodView};
pub use domain::tables::{ColorTable, SplitTable};
pub use utils::error::{EtlError, Result};
