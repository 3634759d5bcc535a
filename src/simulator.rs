//! Synthetic foot-traffic sensor simulator and raw CSV generator.
//!
//! Simulates door sensors at the entrances of a small set of retail stores
//! and writes one raw CSV file per calendar month, optionally salted with
//! injected-fault rows (missing/garbled sensor ids, out-of-range counts,
//! wrong units) that the downstream cleaner is expected to absorb.
//!
//! Simulation is a pure function of (date, sensor identity, config): the RNG
//! is seeded per call from those inputs rather than from process-wide state,
//! and noteworthy conditions come back as structured [`SensorEvent`]s instead
//! of being appended to a hidden log.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, Weekday};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::info;

use crate::config::Config;
use crate::error::Result;

// ---

pub const STORES: [&str; 5] = ["Lille", "Paris", "Lyon", "Toulouse", "Marseille"];
pub const SENSORS_PER_STORE: u8 = 8;

/// Raw-count value written when the store is closed (Sundays).
pub const CLOSED_SENTINEL: f64 = -1.0;

/// Condition observed by a sensor on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorEvent {
    StoreClosed,
    Breakdown,
    Malfunction,
}

/// Outcome of one simulated day for one sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReport {
    /// Integer-valued count; [`CLOSED_SENTINEL`] when the store is closed.
    pub count: f64,
    pub events: Vec<SensorEvent>,
}

/// Simulates a sensor at one entrance of a store.
///
/// Takes a mean and a standard deviation and returns the number of visitors
/// that passed through that door on a given date.
#[derive(Debug, Clone, Copy)]
pub struct VisitSensor {
    // ---
    avg_visit: f64,
    std_visit: f64,
    perc_break: f64,
    perc_malfunction: f64,
}

impl VisitSensor {
    pub fn new(avg_visit: f64, std_visit: f64) -> Self {
        Self {
            avg_visit,
            std_visit,
            perc_break: 0.015,
            perc_malfunction: 0.035,
        }
    }

    #[cfg(test)]
    fn with_failure_rates(mut self, perc_break: f64, perc_malfunction: f64) -> Self {
        self.perc_break = perc_break;
        self.perc_malfunction = perc_malfunction;
        self
    }

    /// Simulate the number of visitors detected during `date`.
    ///
    /// Deterministic for a given (date, store, sensor) triple. A breakdown
    /// zeroes the count outright; a malfunction scales it down hard enough
    /// to be detectable downstream. Sundays report [`CLOSED_SENTINEL`].
    pub fn visit_count(&self, date: NaiveDate, store_id: &str, sensor_id: u8) -> SensorReport {
        // ---
        let mut rng = StdRng::seed_from_u64(daily_seed(date, store_id, sensor_id));
        let proba_malfunction = rng.random::<f64>();

        if proba_malfunction < self.perc_break {
            return SensorReport {
                count: 0.0,
                events: vec![SensorEvent::Breakdown],
            };
        }

        let normal = Normal::new(self.avg_visit, self.std_visit)
            .expect("sensor spread is a positive finite literal");
        let mut visit: f64 = normal.sample(&mut rng);

        // More traffic on Wednesdays, Fridays and Saturdays
        visit *= match date.weekday() {
            Weekday::Wed => 1.10,
            Weekday::Fri => 1.25,
            Weekday::Sat => 1.35,
            _ => 1.0,
        };

        let mut events = Vec::new();

        if date.weekday() == Weekday::Sun {
            visit = CLOSED_SENTINEL;
            events.push(SensorEvent::StoreClosed);
        }

        if proba_malfunction < self.perc_malfunction {
            visit = (visit * 0.2).floor();
            events.push(SensorEvent::Malfunction);
        }

        SensorReport {
            count: visit.floor(),
            events,
        }
    }
}

// ---

/// Per-call RNG seed derived from the target date and the sensor identity.
fn daily_seed(date: NaiveDate, store_id: &str, sensor_id: u8) -> u64 {
    // ---
    let mut hasher = DefaultHasher::new();
    store_id.hash(&mut hasher);
    sensor_id.hash(&mut hasher);
    (date.num_days_from_ce() as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(hasher.finish())
}

/// Sensor parameters for one store entrance.
///
/// Stores differ in overall footfall; each entrance carries a slightly
/// different share of it.
fn sensor_for(store_id: &str, sensor_id: u8) -> VisitSensor {
    // ---
    let store_avg = match store_id {
        "Paris" => 2500.0,
        "Marseille" => 2000.0,
        "Lyon" => 1800.0,
        "Toulouse" => 1400.0,
        _ => 1200.0, // Lille
    };
    let avg = store_avg / f64::from(SENSORS_PER_STORE) * (0.8 + 0.05 * f64::from(sensor_id));
    VisitSensor::new(avg, avg * 0.1)
}

/// Generate one `visiteurs_YYYY-MM.csv` per month covering the configured
/// date range, for every store and sensor, with injected-fault rows appended
/// at the configured noise rate.
///
/// Returns the paths of the files written.
pub fn generate_monthly_reports(config: &Config) -> Result<Vec<PathBuf>> {
    // ---
    fs::create_dir_all(&config.raw_data_dir)?;

    let mut written = Vec::new();
    let mut month_start = first_of_month(config.sim_start_date);

    while month_start <= config.sim_end_date {
        let filename = config
            .raw_data_dir
            .join(format!("visiteurs_{}.csv", month_start.format("%Y-%m")));
        let mut writer = csv::Writer::from_path(&filename)?;
        writer.write_record([
            "date",
            "heure",
            "id_du_capteur",
            "id_du_magasin",
            "nombre_visiteurs",
            "unite",
        ])?;

        let mut breakdowns = 0usize;
        let mut malfunctions = 0usize;

        let mut day = month_start;
        while day.month() == month_start.month() && day <= config.sim_end_date {
            for store in STORES {
                for sensor in 0..SENSORS_PER_STORE {
                    let report = sensor_for(store, sensor).visit_count(day, store, sensor);
                    breakdowns += report
                        .events
                        .iter()
                        .filter(|e| **e == SensorEvent::Breakdown)
                        .count();
                    malfunctions += report
                        .events
                        .iter()
                        .filter(|e| **e == SensorEvent::Malfunction)
                        .count();
                    writer.write_record([
                        day.format("%Y-%m-%d").to_string(),
                        "12:00:00".to_string(),
                        sensor.to_string(),
                        store.to_string(),
                        report.count.to_string(),
                        "visiteurs".to_string(),
                    ])?;
                }

                // Injected faults, one candidate row per store per day
                let mut noise_rng =
                    StdRng::seed_from_u64(daily_seed(day, store, SENSORS_PER_STORE));
                if noise_rng.random::<f64>() < config.sim_noise_rate {
                    let bad_sensor = if noise_rng.random_bool(0.5) {
                        String::new()
                    } else {
                        "999".to_string()
                    };
                    let bad_count = if noise_rng.random_bool(0.5) {
                        "-1"
                    } else {
                        "999999"
                    };
                    let bad_unit = ["litres", "kg", "foo"][noise_rng.random_range(0..3)];
                    writer.write_record([
                        day.format("%Y-%m-%d").to_string(),
                        "12:00:00".to_string(),
                        bad_sensor,
                        store.to_string(),
                        bad_count.to_string(),
                        bad_unit.to_string(),
                    ])?;
                }
            }
            day += chrono::Duration::days(1);
        }

        writer.flush()?;
        info!(
            "Generated raw file: {} ({} breakdowns, {} malfunctions)",
            filename.display(),
            breakdowns,
            malfunctions
        );
        written.push(filename);
        month_start = next_month(month_start);
    }

    Ok(written)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("first of month is valid")
}

fn next_month(month_start: NaiveDate) -> NaiveDate {
    // ---
    let (year, month) = if month_start.month() == 12 {
        (month_start.year() + 1, 1)
    } else {
        (month_start.year(), month_start.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is valid")
}
