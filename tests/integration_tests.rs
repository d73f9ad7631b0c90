use std::fs;
use std::path::PathBuf;

use telemetry_scorer::config::{PipelineConfig, SourceSpec};
use telemetry_scorer::pipeline;
use telemetry_scorer::table::Table;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir); // clean up any prior run
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_csv(dir: &PathBuf, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn config_for(dir: &PathBuf, sources: Vec<SourceSpec>, positions: PathBuf) -> PipelineConfig {
    PipelineConfig {
        sources,
        merged_output: dir.join("merged_sum_score.csv"),
        positions_file: positions,
        final_output: dir.join("final_data_with_gps_data.csv"),
        min_score: 9.0,
    }
}

#[test]
fn test_full_pipeline() {
    let dir = scratch_dir("telemetry_scorer_it_full");

    // Key 1 appears in both sources (9 + 3 = 12, kept); key 2 only in the
    // second source (3, dropped by the threshold).
    let special = write_csv(&dir, "special.csv", "Time (s),Voltage\n1,3.3\n");
    let anomalies = write_csv(&dir, "anomalies.csv", "Time (s),Voltage\n1,3.4\n2,5.0\n");
    let gps = write_csv(
        &dir,
        "gps.csv",
        "Time (s),Latitude,Longitude\n1,47.60,-122.33\n2,47.61,-122.34\n",
    );

    let sources = vec![
        SourceSpec {
            path: special,
            score: 9.0,
            output: dir.join("special_updated.csv"),
        },
        SourceSpec {
            path: anomalies,
            score: 3.0,
            output: dir.join("anomalies_updated.csv"),
        },
    ];
    let config = config_for(&dir, sources, gps);

    let report = pipeline::run(&config).expect("pipeline failed");

    assert_eq!(report.annotated.len(), 2);
    assert_eq!(report.annotated[0].rows, 1);
    assert_eq!(report.annotated[1].rows, 2);
    assert_eq!(report.merged_rows, 1);
    assert_eq!(report.matched_rows, 1);

    let merged = Table::read_csv(&config.merged_output).unwrap();
    assert_eq!(merged.rows, vec![vec!["1".to_string(), "12".to_string()]]);

    let final_table = Table::read_csv(&config.final_output).unwrap();
    assert_eq!(
        final_table.columns,
        vec![
            "Time (s)".to_string(),
            "Score".to_string(),
            "Latitude".to_string(),
            "Longitude".to_string(),
        ]
    );
    assert_eq!(
        final_table.rows,
        vec![vec![
            "1".to_string(),
            "12".to_string(),
            "47.60".to_string(),
            "-122.33".to_string(),
        ]]
    );

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_pipeline_drops_keys_without_gps_match() {
    let dir = scratch_dir("telemetry_scorer_it_no_gps");

    let source = write_csv(&dir, "records.csv", "Time (s)\n3\n");
    // GPS capture has no row for key 3, so the final join is empty.
    let gps = write_csv(&dir, "gps.csv", "Time (s),Latitude\n1,47.60\n");

    let sources = vec![SourceSpec {
        path: source,
        score: 10.0,
        output: dir.join("records_updated.csv"),
    }];
    let config = config_for(&dir, sources, gps);

    let report = pipeline::run(&config).expect("pipeline failed");

    assert_eq!(report.merged_rows, 1);
    assert_eq!(report.matched_rows, 0);

    let final_table = Table::read_csv(&config.final_output).unwrap();
    assert!(final_table.is_empty());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_pipeline_aborts_on_missing_source() {
    let dir = scratch_dir("telemetry_scorer_it_missing");

    let gps = write_csv(&dir, "gps.csv", "Time (s),Latitude\n1,47.60\n");
    let sources = vec![SourceSpec {
        path: dir.join("nonexistent.csv"),
        score: 9.0,
        output: dir.join("nonexistent_updated.csv"),
    }];
    let config = config_for(&dir, sources, gps);

    assert!(pipeline::run(&config).is_err());
    // Nothing past the failed stage gets written.
    assert!(!config.merged_output.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_pipeline_aborts_on_missing_key_column() {
    let dir = scratch_dir("telemetry_scorer_it_schema");

    let source = write_csv(&dir, "records.csv", "Timestamp\n1\n");
    let gps = write_csv(&dir, "gps.csv", "Time (s),Latitude\n1,47.60\n");

    let sources = vec![SourceSpec {
        path: source,
        score: 9.0,
        output: dir.join("records_updated.csv"),
    }];
    let config = config_for(&dir, sources, gps);

    let err = pipeline::run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("Time (s)"));

    fs::remove_dir_all(&dir).unwrap();
}
