//! End-to-end tests: raw CSV files in, enriched Parquet table out, plus the
//! failure modes that must surface as distinct errors.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tempfile::TempDir;

use trafficflow::{
    anomaly, export, pipeline, simulator, Config, DailyTraffic, PipelineError, SENSOR_SENTINEL,
};

// ---

const HEADER: &str = "date,heure,id_du_capteur,id_du_magasin,nombre_visiteurs,unite\n";

fn test_config(root: &Path) -> Config {
    // ---
    Config {
        raw_data_dir: root.join("raw"),
        filtered_path: root.join("filtered/daily_traffic_anomalies.parquet"),
        api_port: 0,
        sim_start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        sim_end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        sim_noise_rate: 0.0,
    }
}

/// Four consecutive Wednesdays for Lille sensor 0 with a spike on the last
/// one, a zero-traffic sensor 1, and one corrupted row (missing sensor id,
/// closed-store count) on a non-Sunday.
fn write_fixture(raw_dir: &Path) {
    // ---
    fs::create_dir_all(raw_dir).unwrap();

    let mut march = String::from(HEADER);
    for (date, count) in [
        ("2025-03-05", 100),
        ("2025-03-12", 100),
        ("2025-03-19", 100),
        ("2025-03-26", 400),
    ] {
        march.push_str(&format!("{date},12:00:00,0,Lille,{count},visiteurs\n"));
        march.push_str(&format!("{date},12:00:00,1,Lille,0,visiteurs\n"));
    }
    // Injected fault: sensor id missing, count is the -1 closed sentinel
    march.push_str("2025-03-05,12:00:00,,Lille,-1,kg\n");
    fs::write(raw_dir.join("visiteurs_2025-03.csv"), march).unwrap();

    let april = format!("{HEADER}2025-04-02,12:00:00,0,Paris,900,visiteurs\n");
    fs::write(raw_dir.join("visiteurs_2025-04.csv"), april).unwrap();
}

fn find<'a>(table: &'a [DailyTraffic], date: &str, store: &str, sensor: i32) -> &'a DailyTraffic {
    // ---
    let date: NaiveDate = date.parse().unwrap();
    table
        .iter()
        .find(|r| r.date == date && r.store_id == store && r.sensor_id == sensor)
        .unwrap_or_else(|| panic!("no row for {date} {store} sensor {sensor}"))
}

// ---

#[test]
fn full_run_computes_baselines_and_scores() {
    // ---
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(tmp.path());
    write_fixture(&cfg.raw_data_dir);

    let table = pipeline::run(&cfg).unwrap();

    // Same-weekday rolling averages for the Lille spike scenario
    for (date, avg) in [
        ("2025-03-05", 100.0),
        ("2025-03-12", 100.0),
        ("2025-03-19", 100.0),
        ("2025-03-26", 175.0),
    ] {
        assert_eq!(find(&table, date, "Lille", 0).rolling_avg, Some(avg));
    }

    // (400 - 175) / 175 * 100, inside [-100, 200] so unclamped
    let spike = find(&table, "2025-03-26", "Lille", 0);
    let pct = spike.pct_change.unwrap();
    assert!((pct - 128.571_428_571).abs() < 1e-6);

    // The corrupted row cleans to the sentinel sensor group with 0 traffic
    let sentinel = find(&table, "2025-03-05", "Lille", SENSOR_SENTINEL);
    assert_eq!(sentinel.traffic, 0.0);

    // A zero baseline yields no score, not an infinity
    let silent = find(&table, "2025-03-26", "Lille", 1);
    assert_eq!(silent.rolling_avg, Some(0.0));
    assert_eq!(silent.pct_change, None);

    // Rows from the second monthly file made it in
    assert_eq!(find(&table, "2025-04-02", "Paris", 0).traffic, 900.0);

    // Calendar attributes
    assert_eq!(spike.weekday_name, "Wednesday");
    assert_eq!(spike.month_name, "March");
    assert_eq!(spike.year, 2025);
}

#[test]
fn persisted_table_round_trips_exactly() {
    // ---
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(tmp.path());
    write_fixture(&cfg.raw_data_dir);

    let table = pipeline::run(&cfg).unwrap();
    assert!(table.iter().any(|r| r.pct_change.is_none()));

    let read_back = export::read_daily_traffic(&cfg.filtered_path).unwrap();
    assert_eq!(table, read_back);
}

#[test]
fn rerun_produces_byte_identical_output() {
    // ---
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(tmp.path());
    write_fixture(&cfg.raw_data_dir);

    pipeline::run(&cfg).unwrap();
    let first = fs::read(&cfg.filtered_path).unwrap();

    fs::remove_file(&cfg.filtered_path).unwrap();
    pipeline::run(&cfg).unwrap();
    let second = fs::read(&cfg.filtered_path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn anomaly_threshold_filters_at_query_time() {
    // ---
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(tmp.path());
    write_fixture(&cfg.raw_data_dir);

    let table = pipeline::run(&cfg).unwrap();
    let flagged: Vec<&DailyTraffic> = table
        .iter()
        .filter(|r| anomaly::is_anomaly(r, 50.0))
        .collect();

    // Only the spiking Wednesday exceeds 50% deviation
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].date, "2025-03-26".parse::<NaiveDate>().unwrap());
    assert_eq!(flagged[0].sensor_id, 0);
}

#[test]
fn missing_raw_directory_aborts_with_not_found() {
    // ---
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(tmp.path());

    let err = pipeline::run(&cfg).unwrap_err();
    assert!(matches!(err, PipelineError::NotFound(_)));
}

#[test]
fn all_garbage_inputs_abort_with_no_valid_data() {
    // ---
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(tmp.path());
    fs::create_dir_all(&cfg.raw_data_dir).unwrap();
    fs::write(
        cfg.raw_data_dir.join("visiteurs_2025-01.csv"),
        "wrong,header\n1,2\n",
    )
    .unwrap();

    let err = pipeline::run(&cfg).unwrap_err();
    assert!(matches!(err, PipelineError::NoValidData(_)));
}

#[test]
fn query_before_any_run_is_upstream_unavailable() {
    // ---
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(tmp.path());

    let err = export::read_daily_traffic(&cfg.filtered_path).unwrap_err();
    assert!(matches!(err, PipelineError::UpstreamUnavailable(_)));
}

#[test]
fn generated_month_flows_through_the_pipeline() {
    // ---
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(tmp.path());

    let files = simulator::generate_monthly_reports(&cfg).unwrap();
    assert_eq!(files.len(), 1);

    let table = pipeline::run(&cfg).unwrap();

    // 31 days x 5 stores x 8 sensors, no injected faults
    assert_eq!(table.len(), 31 * 5 * 8);
    assert!(table.iter().all(|r| r.traffic >= 0.0));

    // Sundays are closed; the -1 raw sentinel cleans to 0
    assert!(table
        .iter()
        .filter(|r| r.weekday_name == "Sunday")
        .all(|r| r.traffic == 0.0));
}
