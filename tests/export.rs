use std::fs;
use std::path::PathBuf;

use fbref_scout::dataset::{DEFAULT_MIN_MINUTES, load};
use fbref_scout::export::{ExportRequest, export_records_json, export_workbook, write_enriched_csv};
use fbref_scout::synthetic::synthetic_season;
use fbref_scout::{EnrichedTable, RawTable};

fn sample() -> EnrichedTable {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("players_sample.csv");
    let raw = RawTable::from_csv_path(&path).expect("fixture should parse");
    load(&raw, DEFAULT_MIN_MINUTES).expect("fixture should load")
}

#[test]
fn enriched_csv_reloads_with_same_players() {
    let table = sample();
    let mut buf = Vec::new();
    write_enriched_csv(&table, &mut buf).unwrap();

    let raw = RawTable::from_csv_reader(buf.as_slice()).unwrap();
    assert_eq!(raw.len(), table.len());
    assert_eq!(raw.headers(), table.output_headers().as_slice());

    let col = raw.column_index("Goals per 90").unwrap();
    assert_eq!(raw.cell(0, col), Some("0.50"));

    // Derived columns written back in are recomputed, not duplicated.
    let again = load(&raw, DEFAULT_MIN_MINUTES).unwrap();
    assert_eq!(again.output_headers(), table.output_headers());
    assert_eq!(again.len(), table.len());
}

#[test]
fn json_records_carry_key_columns() {
    let table = sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("web").join("players.json");

    let count = export_records_json(&table, &path).unwrap();
    assert_eq!(count, 15);

    let text = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 15);
    assert_eq!(rows[0]["player"], "Ola Berg");
    assert_eq!(rows[0]["league"], "Premier League");
    assert_eq!(rows[0]["position"], "FW");
    assert_eq!(rows[0]["Goals per 90"], 0.5);
    assert_eq!(rows[0]["ga"], 7.0);
    // Undefined metrics are left out rather than written as null.
    let zero = rows.iter().find(|r| r["player"] == "Zero Nineties").unwrap();
    assert!(zero.get("Goals per 90").is_none());
}

#[test]
fn workbook_reports_rows_and_errors() {
    let table = sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scout.xlsx");
    let request = ExportRequest {
        similar_for: vec!["Ola Berg".to_string(), "Ghost".to_string()],
        percentiles_for: vec!["Luca Fischer".to_string()],
        top_n: 5,
        metrics: Vec::new(),
    };

    let report = export_workbook(&table, &path, &request).unwrap();
    assert!(path.exists());
    assert_eq!(report.players, 15);
    assert_eq!(report.similar_rows, 4);
    assert_eq!(report.percentile_rows, 6);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("Ghost"));
}

#[test]
fn synthetic_season_loads_end_to_end() {
    let raw = synthetic_season(300, 11);
    let table = load(&raw, DEFAULT_MIN_MINUTES).unwrap();
    assert!(!table.is_empty());
    assert!(table.len() < 300);
    assert!(table.records().iter().all(|r| r.minutes >= DEFAULT_MIN_MINUTES));
    assert_eq!(table.leagues().len(), 5);

    let again = load(&synthetic_season(300, 11), DEFAULT_MIN_MINUTES).unwrap();
    assert_eq!(table.fingerprint(), again.fingerprint());
}
