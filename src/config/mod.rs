pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "displacement-etl")]
#[command(about = "Builds per-period displacement dashboards from a CSV table")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dashboard.toml")]
    pub config: String,

    /// Override the displacement table path
    #[arg(long)]
    pub data: Option<String>,

    /// Override the output directory
    #[arg(long)]
    pub output: Option<String>,

    /// Render only this period (repeatable)
    #[arg(long = "period")]
    pub periods: Vec<String>,

    /// Override output formats (json, csv)
    #[arg(long, value_delimiter = ',')]
    pub format: Vec<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    /// Show what would be processed without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Apply command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut toml_config::TomlConfig) {
        if let Some(data) = &self.data {
            config.set_data_path(data.clone());
            tracing::info!("🔧 Data path overridden to: {}", data);
        }
        if let Some(output) = &self.output {
            config.set_output_path(output.clone());
            tracing::info!("🔧 Output path overridden to: {}", output);
        }
        if !self.format.is_empty() {
            config.set_output_formats(self.format.clone());
        }
        if !self.periods.is_empty() {
            config.select_periods(self.periods.clone());
        }
    }
}
