use displacement_etl::core::{ConfigProvider, Pipeline};
use displacement_etl::utils::validation::Validate;
use displacement_etl::{DashboardPipeline, EtlEngine, EtlError, LocalStorage, TomlConfig};
use std::path::Path;
use tempfile::TempDir;

const FIXTURE: &str = include_str!("fixtures/displacement.csv");

fn normalized(path: &Path) -> String {
    path.to_str().unwrap().replace('\\', "/")
}

fn write_config(dir: &Path, data_path: &Path, formats: &str) -> TomlConfig {
    let maps_dir = normalized(&dir.join("maps"));

    let config_content = format!(
        r#"
[dashboard]
name = "integration"
title = "Displacement Mapping: Yugoslav Conflicts (1991–1999)"

[source]
data_path = "{data}"

[load]
output_path = "{output}"
output_formats = {formats}

[[periods]]
key = "1991–1992"
title = "Displacement During the Croatian War (1991–1992)"
map_file = "{maps}/displacement_map_1991_1992.html"

[[periods.timeline]]
date = "November 18, 1991"
heading = "Fall of Vukovar"
body = "After 87 days of siege, Vukovar fell."

[[periods]]
key = "1992–1995"
title = "Displacement During the Bosnian War (1992–1995)"
map_file = "{maps}/displacement_map_1992_1995.html"

[[periods]]
key = "1998–1999"
title = "Displacement During the Kosovo War (1998–1999)"
map_file = "{maps}/displacement_map_1998_1999.html"
"#,
        data = normalized(data_path),
        output = normalized(&dir.join("output")),
        formats = formats,
        maps = maps_dir,
    );

    let config_path = dir.join("dashboard.toml");
    std::fs::write(&config_path, config_content).unwrap();
    TomlConfig::from_file(&config_path).unwrap()
}

fn seed_workspace(dir: &Path, data: &str) -> std::path::PathBuf {
    let data_path = dir.join("displacement.csv");
    std::fs::write(&data_path, data).unwrap();

    std::fs::create_dir_all(dir.join("maps")).unwrap();
    std::fs::write(
        dir.join("maps/displacement_map_1991_1992.html"),
        "<html><body>Croatia map</body></html>",
    )
    .unwrap();
    std::fs::write(
        dir.join("maps/displacement_map_1998_1999.html"),
        "<html><body>Kosovo map</body></html>",
    )
    .unwrap();
    // The 1992–1995 map is intentionally absent.

    data_path
}

fn pipeline(config: TomlConfig) -> DashboardPipeline<LocalStorage, TomlConfig> {
    let output = LocalStorage::new(config.output_path());
    DashboardPipeline::new(LocalStorage::new("."), output, config)
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_end_to_end_dashboard_build() {
    let temp_dir = TempDir::new().unwrap();
    let data_path = seed_workspace(temp_dir.path(), FIXTURE);
    let config = write_config(temp_dir.path(), &data_path, r#"["json", "csv"]"#);
    assert!(config.validate().is_ok());

    let engine = EtlEngine::new(pipeline(config));
    let output_path = engine.run().await.unwrap();

    let output_dir = Path::new(&output_path);
    assert!(output_dir.join("dashboard.json").exists());
    assert!(output_dir.join("1991_1992.json").exists());
    assert!(output_dir.join("1992_1995_destinations.csv").exists());

    let croatia = read_json(&output_dir.join("1991_1992.json"));
    let slices = croatia["chart"]["slices"].as_array().unwrap();
    let labels: Vec<&str> = slices.iter().map(|s| s["label"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["Serbia", "Montenegro", "Germany", "Croatia"]);
    assert_eq!(slices[0]["value"], 75_000);
    assert_eq!(slices[1]["value"], 75_000);
    assert_eq!(slices[2]["value"], 120_000);
    assert_eq!(
        slices[2]["hover"],
        "From: Croatia, Bosnia and Herzegovina → Germany\n120,000 displaced"
    );
    assert_eq!(slices[2]["color"], "#FECB52");
    assert_eq!(slices[3]["value"], 250_000);
    assert_eq!(croatia["chart"]["title"], "Displacement Destinations (1991–1992)");
    assert_eq!(croatia["map"]["status"], "document");
    assert_eq!(croatia["map"]["html"], "<html><body>Croatia map</body></html>");
    assert_eq!(croatia["timeline"][0]["heading"], "Fall of Vukovar");

    let bosnia = read_json(&output_dir.join("1992_1995.json"));
    assert_eq!(bosnia["map"]["status"], "unavailable");
    assert_eq!(bosnia["chart"]["slices"].as_array().unwrap().len(), 5);

    let index = read_json(&output_dir.join("dashboard.json"));
    assert_eq!(index["title"], "Displacement Mapping: Yugoslav Conflicts (1991–1999)");
    assert_eq!(index["default_period"], "1991–1992");
    assert_eq!(index["periods"][0]["total_displaced"], 520_000);
    assert_eq!(index["periods"][1]["total_displaced"], 1_050_000);
    assert_eq!(index["periods"][2]["total_displaced"], 1_539_100);
    assert_eq!(index["periods"][1]["map_available"], false);
}

#[tokio::test]
async fn test_destination_csv_output() {
    let temp_dir = TempDir::new().unwrap();
    let data_path = seed_workspace(temp_dir.path(), FIXTURE);
    let config = write_config(temp_dir.path(), &data_path, r#"["csv"]"#);

    let output_path = EtlEngine::new(pipeline(config)).run().await.unwrap();

    let mut reader = csv::Reader::from_path(Path::new(&output_path).join("1998_1999_destinations.csv")).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

    assert_eq!(rows.len(), 5);
    assert_eq!(&rows[2][0], "Kosovo (internal)");
    assert_eq!(&rows[2][1], "550000");
    assert_eq!(&rows[3][0], "Serbia (internal)");
    assert_eq!(&rows[3][1], "100000");
    assert_eq!(&rows[4][0], "Montenegro (internal)");
    assert!(!Path::new(&output_path).join("dashboard.json").exists());
}

#[tokio::test]
async fn test_selected_period_only() {
    let temp_dir = TempDir::new().unwrap();
    let data_path = seed_workspace(temp_dir.path(), FIXTURE);
    let mut config = write_config(temp_dir.path(), &data_path, r#"["json"]"#);
    config.select_periods(vec!["1998–1999".to_string()]);
    assert!(config.validate().is_ok());

    let output_path = EtlEngine::new(pipeline(config)).run().await.unwrap();

    let output_dir = Path::new(&output_path);
    assert!(output_dir.join("1998_1999.json").exists());
    assert!(!output_dir.join("1991_1992.json").exists());

    let index = read_json(&output_dir.join("dashboard.json"));
    assert_eq!(index["periods"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_count_halts_build() {
    let temp_dir = TempDir::new().unwrap();
    let data = format!("{}1998–1999,Kosovo,Montenegro,unknown,fixture\n", FIXTURE);
    let data_path = seed_workspace(temp_dir.path(), &data);
    let config = write_config(temp_dir.path(), &data_path, r#"["json", "csv"]"#);
    let output_path = config.output_path().to_string();

    let result = EtlEngine::new(pipeline(config)).run().await;

    match result {
        Err(EtlError::MalformedCount { value, row, .. }) => {
            assert_eq!(value, "unknown");
            assert_eq!(row, Some(13));
        }
        other => panic!("expected MalformedCount, got {:?}", other),
    }
    assert!(!Path::new(&output_path).join("dashboard.json").exists());
}

#[tokio::test]
async fn test_period_without_records_renders_empty_chart() {
    let temp_dir = TempDir::new().unwrap();
    let only_kosovo: String = FIXTURE
        .lines()
        .filter(|line| line.starts_with("Period") || line.starts_with("1998"))
        .map(|line| format!("{}\n", line))
        .collect();
    let data_path = seed_workspace(temp_dir.path(), &only_kosovo);
    let config = write_config(temp_dir.path(), &data_path, r#"["json"]"#);

    let pipeline = pipeline(config);
    let extracted = pipeline.extract().await.unwrap();
    let result = pipeline.transform(extracted).await.unwrap();

    assert_eq!(result.views.len(), 3);
    assert!(result.views[0].chart.is_empty());
    assert!(result.views[1].chart.is_empty());
    assert!(!result.views[2].chart.is_empty());
}

#[test]
fn test_shipped_dashboard_config_is_valid() {
    let config = TomlConfig::from_toml_str(include_str!("../dashboard.toml")).unwrap();

    assert!(config.validate().is_ok());
    let keys: Vec<&str> = config.content().keys().collect();
    assert_eq!(keys, vec!["1991–1992", "1992–1995", "1998–1999"]);
    for period in config.content().iter() {
        assert!(!period.description.is_empty());
        assert!(!period.timeline.is_empty());
        assert_eq!(period.testimonies.len(), 1);
    }
    assert_eq!(config.colors().color_for("Kosovo (internal)"), "#636EFA");
}
