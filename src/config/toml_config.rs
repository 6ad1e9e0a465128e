use crate::core::pipeline::period_slug;
use crate::core::ConfigProvider;
use crate::domain::content::ContentRepository;
use crate::domain::tables::{ColorTable, SplitTable};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const SUPPORTED_FORMATS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub dashboard: DashboardInfo,
    pub source: SourceConfig,
    pub load: LoadConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    /// Replaces the built-in compound destination table when present.
    #[serde(default)]
    pub splits: SplitTable,
    /// Replaces the built-in color table when present.
    pub colors: Option<HashMap<String, String>>,
    #[serde(rename = "periods", default)]
    pub content: ContentRepository,
    #[serde(skip)]
    color_table: ColorTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardInfo {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub data_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    /// Periods to render. All configured periods when absent.
    pub periods: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartConfig {
    pub fallback_palette: Option<Vec<String>>,
}

impl TomlConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: TomlConfig = toml::from_str(&processed_content)?;
        config.rebuild_color_table();
        Ok(config)
    }

    /// Substitute environment variables such as `${DATA_DIR}`.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn rebuild_color_table(&mut self) {
        let defaults = ColorTable::default();
        let colors = self
            .colors
            .clone()
            .unwrap_or_else(|| defaults.colors().clone());
        let palette = self
            .chart
            .fallback_palette
            .clone()
            .unwrap_or_else(ColorTable::default_fallback_palette);
        self.color_table = ColorTable::new(colors, palette);
    }

    pub fn set_data_path(&mut self, path: impl Into<String>) {
        self.source.data_path = path.into();
    }

    pub fn set_output_path(&mut self, path: impl Into<String>) {
        self.load.output_path = path.into();
    }

    pub fn set_output_formats(&mut self, formats: Vec<String>) {
        self.load.output_formats = formats;
    }

    pub fn select_periods(&mut self, periods: Vec<String>) {
        self.load.periods = Some(periods);
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("dashboard.title", &self.dashboard.title)?;

        validation::validate_path("source.data_path", &self.source.data_path)?;
        validation::validate_file_extensions(
            "source.data_path",
            std::slice::from_ref(&self.source.data_path),
            &["csv"],
        )?;

        validation::validate_path("load.output_path", &self.load.output_path)?;

        if self.load.output_formats.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "load.output_formats".to_string(),
            });
        }
        for format in &self.load.output_formats {
            if !SUPPORTED_FORMATS.contains(&format.as_str()) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "load.output_formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        SUPPORTED_FORMATS.join(", ")
                    ),
                });
            }
        }

        if self.content.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "periods".to_string(),
            });
        }
        let keys: Vec<&str> = self.content.keys().collect();
        validation::validate_unique("periods.key", &keys)?;
        // Keys become output file names; distinct keys must not share one.
        let slugs: Vec<String> = keys.iter().map(|key| period_slug(key)).collect();
        let slug_refs: Vec<&str> = slugs.iter().map(String::as_str).collect();
        validation::validate_unique("periods.key (file name)", &slug_refs)?;
        for period in self.content.iter() {
            validation::validate_non_empty_string("periods.key", &period.key)?;
            validation::validate_path("periods.map_file", &period.map_file)?;
            validation::validate_file_extensions(
                "periods.map_file",
                std::slice::from_ref(&period.map_file),
                &["html", "htm"],
            )?;
        }

        for period in self.selected_periods() {
            if !self.content.contains(period) {
                return Err(EtlError::UnknownPeriod {
                    period: period.clone(),
                });
            }
        }

        for (compound, parts) in self.splits.iter() {
            for part in parts {
                validation::validate_non_empty_string(&format!("splits.{}", compound), part)?;
            }
        }

        for (label, color) in self.color_table.colors() {
            validation::validate_hex_color(&format!("colors.{}", label), color)?;
        }
        for color in self.color_table.fallback_palette() {
            validation::validate_hex_color("chart.fallback_palette", color)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn dashboard_title(&self) -> &str {
        &self.dashboard.title
    }

    fn data_path(&self) -> &str {
        &self.source.data_path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn selected_periods(&self) -> &[String] {
        self.load.periods.as_deref().unwrap_or(&[])
    }

    fn content(&self) -> &ContentRepository {
        &self.content
    }

    fn splits(&self) -> &SplitTable {
        &self.splits
    }

    fn colors(&self) -> &ColorTable {
        &self.color_table
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[dashboard]
name = "yugoslav-displacement"
title = "Displacement Mapping: Yugoslav Conflicts (1991–1999)"

[source]
data_path = "data/Yugoslav_War_Data.csv"

[load]
output_path = "./output"
output_formats = ["json", "csv"]

[[periods]]
key = "1991–1992"
title = "Displacement During the Croatian War (1991–1992)"
map_file = "maps/displacement_map_1991_1992.html"

[[periods.description]]
heading = "Background and Outbreak of War"
body = "The conflict in Croatia began in June 1991."

[[periods]]
key = "1998–1999"
title = "Displacement During the Kosovo War (1998–1999)"
map_file = "maps/displacement_map_1998_1999.html"

[[periods.testimonies]]
context = "A Kosovar Albanian teacher."
quotes = ["My village was surrounded."]
source = "Human Rights Watch"
url = "https://www.hrw.org/"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.dashboard.name, "yugoslav-displacement");
        assert_eq!(config.data_path(), "data/Yugoslav_War_Data.csv");
        assert_eq!(config.content().len(), 2);
        assert_eq!(config.content().default_period(), Some("1991–1992"));
        assert_eq!(config.content().get("1991–1992").unwrap().description.len(), 1);
        assert_eq!(
            config.content().get("1998–1999").unwrap().testimonies[0].url.as_deref(),
            Some("https://www.hrw.org/")
        );
        assert!(config.selected_periods().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_tables_when_not_configured() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.splits(), &SplitTable::default());
        assert_eq!(config.colors().color_for("Albania"), "#EF553B");
    }

    #[test]
    fn test_custom_tables_replace_defaults() {
        let toml_content = format!(
            r##"{}
[splits]
"Czechoslovakia" = ["Czechia", "Slovakia"]

[colors]
"Czechia" = "#112233"

[chart]
fallback_palette = ["#000000"]
"##,
            BASIC
        );
        // Top-level tables after [[periods]] still parse as top-level.
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();

        assert!(config.splits().parts("Serbia and Montenegro").is_none());
        assert!(config.splits().parts("Czechoslovakia").is_some());
        assert_eq!(config.colors().color_for("Czechia"), "#112233");
        assert_eq!(config.colors().color_for("Albania"), "#000000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DISPLACEMENT_TEST_DATA", "/srv/data/flows.csv");

        let toml_content = BASIC.replace(
            "data/Yugoslav_War_Data.csv",
            "${DISPLACEMENT_TEST_DATA}",
        );
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.data_path(), "/srv/data/flows.csv");

        std::env::remove_var("DISPLACEMENT_TEST_DATA");
    }

    #[test]
    fn test_unknown_format_fails_validation() {
        let toml_content = BASIC.replace(r#"["json", "csv"]"#, r#"["json", "zip"]"#);
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();

        assert!(matches!(
            config.validate(),
            Err(EtlError::InvalidConfigValueError { ref value, .. }) if value == "zip"
        ));
    }

    #[test]
    fn test_selected_unknown_period_fails_validation() {
        let mut config = TomlConfig::from_toml_str(BASIC).unwrap();
        config.select_periods(vec!["1992–1995".to_string()]);

        assert!(matches!(
            config.validate(),
            Err(EtlError::UnknownPeriod { .. })
        ));
    }

    #[test]
    fn test_keys_sharing_a_file_name_fail_validation() {
        let toml_content = format!(
            "{}\n[[periods]]\nkey = \"1991-1992\"\ntitle = \"Hyphenated duplicate\"\nmap_file = \"maps/other.html\"\n",
            BASIC
        );
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();

        assert!(matches!(
            config.validate(),
            Err(EtlError::InvalidConfigValueError { ref field, ref value, .. })
                if field == "periods.key (file name)" && value == "1991_1992"
        ));
    }

    #[test]
    fn test_bad_color_fails_validation() {
        let toml_content = format!("{}\n[colors]\n\"Albania\" = \"red\"\n", BASIC);
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_split_with_wrong_arity_is_rejected_at_parse_time() {
        let toml_content = format!(
            "{}\n[splits]\n\"Yugoslavia\" = [\"Serbia\", \"Montenegro\", \"Kosovo\"]\n",
            BASIC
        );
        assert!(TomlConfig::from_toml_str(&toml_content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.dashboard.title, "Displacement Mapping: Yugoslav Conflicts (1991–1999)");
    }
}
