//! Anomaly scoring: percentage deviation from the rolling baseline.

use tracing::debug;

use crate::models::DailyTraffic;

// ---

/// Display clamp range for `pct_change`. The asymmetric upper bound matches
/// what the anomaly threshold and dashboard assume downstream.
pub const PCT_CHANGE_MIN: f64 = -100.0;
pub const PCT_CHANGE_MAX: f64 = 200.0;

/// Default query-time anomaly threshold on `|pct_change|`.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 50.0;

/// Enrich every row with its percentage deviation from the baseline.
///
/// `pct_change = (traffic - rolling_avg) / rolling_avg * 100`, clamped into
/// `[PCT_CHANGE_MIN, PCT_CHANGE_MAX]`. A zero baseline yields no score at
/// all rather than an infinity or a zero. Whether a row counts as an anomaly
/// is decided at query time against a caller-chosen threshold.
pub fn score_anomalies(rows: &mut [DailyTraffic]) {
    // ---
    let mut unscored = 0usize;
    for row in rows.iter_mut() {
        row.pct_change = match row.rolling_avg {
            Some(avg) if avg != 0.0 => {
                let pct = (row.traffic - avg) / avg * 100.0;
                Some(pct.clamp(PCT_CHANGE_MIN, PCT_CHANGE_MAX))
            }
            _ => {
                unscored += 1;
                None
            }
        };
    }
    debug!("Scored {} rows ({} with no baseline)", rows.len(), unscored);
}

/// Query-time anomaly predicate: a scored row whose absolute deviation
/// exceeds `threshold`. Rows with no score never match.
pub fn is_anomaly(row: &DailyTraffic, threshold: f64) -> bool {
    row.pct_change.is_some_and(|pct| pct.abs() > threshold)
}

#[cfg(test)]
mod tests {
    // ---
    use chrono::{Datelike, NaiveDate};

    use super::*;

    fn scored_row(traffic: f64, rolling_avg: Option<f64>) -> DailyTraffic {
        // ---
        let date: NaiveDate = "2025-03-26".parse().unwrap();
        let mut row = DailyTraffic {
            date,
            store_id: "Lille".to_string(),
            sensor_id: 0,
            traffic,
            weekday_name: date.format("%A").to_string(),
            month_name: date.format("%B").to_string(),
            year: date.year(),
            rolling_avg,
            pct_change: None,
        };
        score_anomalies(std::slice::from_mut(&mut row));
        row
    }

    #[test]
    fn pct_change_formula() {
        // ---
        let row = scored_row(400.0, Some(175.0));
        let pct = row.pct_change.unwrap();
        assert!((pct - 128.571_428_571).abs() < 1e-6);
    }

    #[test]
    fn zero_baseline_yields_no_score() {
        // ---
        assert_eq!(scored_row(50.0, Some(0.0)).pct_change, None);
        assert_eq!(scored_row(50.0, None).pct_change, None);
    }

    #[test]
    fn score_is_clamped_not_dropped() {
        // ---
        // +900% truncates to the upper bound
        let high = scored_row(1000.0, Some(100.0));
        assert_eq!(high.pct_change, Some(PCT_CHANGE_MAX));

        // -100% is the natural floor (traffic is non-negative)
        let low = scored_row(0.0, Some(100.0));
        assert_eq!(low.pct_change, Some(PCT_CHANGE_MIN));
    }

    #[test]
    fn scores_stay_in_display_range() {
        // ---
        for (traffic, avg) in [(0.0, 1.0), (5.0, 1000.0), (1e9, 1.0), (175.0, 175.0)] {
            let pct = scored_row(traffic, Some(avg)).pct_change.unwrap();
            assert!((PCT_CHANGE_MIN..=PCT_CHANGE_MAX).contains(&pct));
        }
    }

    #[test]
    fn anomaly_predicate_uses_absolute_deviation() {
        // ---
        let spike = scored_row(175.0, Some(100.0)); // +75%
        let calm = scored_row(130.0, Some(100.0)); // +30%
        let dip = scored_row(25.0, Some(100.0)); // -75%
        let unscored = scored_row(50.0, Some(0.0));

        assert!(is_anomaly(&spike, DEFAULT_ANOMALY_THRESHOLD));
        assert!(!is_anomaly(&calm, DEFAULT_ANOMALY_THRESHOLD));
        assert!(is_anomaly(&dip, DEFAULT_ANOMALY_THRESHOLD));
        assert!(!is_anomaly(&unscored, DEFAULT_ANOMALY_THRESHOLD));
    }
}
