//! Same-weekday rolling baseline.
//!
//! For each (store, sensor, weekday) partition the baseline of a row is the
//! mean of `traffic` over a trailing window of at most
//! [`BASELINE_WINDOW`] rows ending at and including that row. A Wednesday's
//! baseline only looks at prior Wednesdays for the same store and sensor;
//! the window shrinks at the start of a partition (minimum 1, the row
//! itself) and never looks ahead.

use std::collections::HashMap;

use tracing::debug;

use crate::models::DailyTraffic;

// ---

/// Trailing window size: the current occurrence plus up to three prior
/// same-weekday occurrences (a four-week view).
pub const BASELINE_WINDOW: usize = 4;

/// Enrich every row with its trailing same-weekday mean.
///
/// The trailing window is order-dependent, so each partition is sorted by
/// date internally rather than trusting the caller's row order.
pub fn rolling_baseline(rows: &mut [DailyTraffic]) {
    // ---
    let mut partitions: HashMap<(String, i32, String), Vec<usize>> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        partitions
            .entry((row.store_id.clone(), row.sensor_id, row.weekday_name.clone()))
            .or_default()
            .push(i);
    }
    debug!("Computing baselines over {} partitions", partitions.len());

    for indices in partitions.values_mut() {
        indices.sort_by_key(|&i| rows[i].date);

        let mut window: Vec<f64> = Vec::with_capacity(BASELINE_WINDOW);
        for &i in indices.iter() {
            if window.len() == BASELINE_WINDOW {
                window.remove(0);
            }
            window.push(rows[i].traffic);
            rows[i].rolling_avg = Some(window.iter().sum::<f64>() / window.len() as f64);
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use chrono::{Datelike, NaiveDate};

    use super::*;

    fn day_row(date: &str, store: &str, sensor: i32, traffic: f64) -> DailyTraffic {
        // ---
        let date: NaiveDate = date.parse().unwrap();
        DailyTraffic {
            date,
            store_id: store.to_string(),
            sensor_id: sensor,
            traffic,
            weekday_name: date.format("%A").to_string(),
            month_name: date.format("%B").to_string(),
            year: date.year(),
            rolling_avg: None,
            pct_change: None,
        }
    }

    /// Four consecutive Wednesdays for one store and sensor.
    fn four_wednesdays(traffic: [f64; 4]) -> Vec<DailyTraffic> {
        // ---
        ["2025-03-05", "2025-03-12", "2025-03-19", "2025-03-26"]
            .iter()
            .zip(traffic)
            .map(|(d, t)| day_row(d, "Lille", 0, t))
            .collect()
    }

    #[test]
    fn lille_wednesday_scenario() {
        // ---
        let mut rows = four_wednesdays([100.0, 100.0, 100.0, 400.0]);
        rolling_baseline(&mut rows);

        let avgs: Vec<f64> = rows.iter().map(|r| r.rolling_avg.unwrap()).collect();
        assert_eq!(avgs, vec![100.0, 100.0, 100.0, 175.0]);
    }

    #[test]
    fn window_size_is_min_n_4() {
        // ---
        let dates = [
            "2025-03-05", "2025-03-12", "2025-03-19", "2025-03-26", "2025-04-02", "2025-04-09",
        ];
        let mut rows: Vec<DailyTraffic> = dates
            .iter()
            .enumerate()
            .map(|(i, d)| day_row(d, "Lille", 0, (i + 1) as f64 * 10.0))
            .collect();
        rolling_baseline(&mut rows);

        // Nth occurrence averages exactly min(N, 4) trailing values
        let expected = [
            10.0,
            (10.0 + 20.0) / 2.0,
            (10.0 + 20.0 + 30.0) / 3.0,
            (10.0 + 20.0 + 30.0 + 40.0) / 4.0,
            (20.0 + 30.0 + 40.0 + 50.0) / 4.0,
            (30.0 + 40.0 + 50.0 + 60.0) / 4.0,
        ];
        for (row, want) in rows.iter().zip(expected) {
            assert_eq!(row.rolling_avg, Some(want), "on {}", row.date);
        }
    }

    #[test]
    fn never_looks_ahead() {
        // ---
        let mut with_future = four_wednesdays([100.0, 100.0, 100.0, 400.0]);
        let mut without_future = with_future.clone();
        without_future.truncate(3);

        rolling_baseline(&mut with_future);
        rolling_baseline(&mut without_future);

        // Baselines of the first three rows are unchanged by the fourth
        for (a, b) in with_future.iter().zip(&without_future) {
            assert_eq!(a.rolling_avg, b.rolling_avg);
        }
    }

    #[test]
    fn partitions_by_weekday() {
        // ---
        // A huge Thursday must not contaminate the Wednesday baseline
        let mut rows = four_wednesdays([100.0, 100.0, 100.0, 100.0]);
        rows.push(day_row("2025-03-20", "Lille", 0, 100_000.0));
        rolling_baseline(&mut rows);

        assert_eq!(rows[3].rolling_avg, Some(100.0));
        assert_eq!(rows[4].rolling_avg, Some(100_000.0));
    }

    #[test]
    fn partitions_by_store_and_sensor() {
        // ---
        let mut rows = vec![
            day_row("2025-03-05", "Lille", 0, 100.0),
            day_row("2025-03-05", "Lille", 1, 300.0),
            day_row("2025-03-05", "Paris", 0, 500.0),
        ];
        rolling_baseline(&mut rows);

        assert_eq!(rows[0].rolling_avg, Some(100.0));
        assert_eq!(rows[1].rolling_avg, Some(300.0));
        assert_eq!(rows[2].rolling_avg, Some(500.0));
    }

    #[test]
    fn unsorted_input_is_sorted_internally() {
        // ---
        let mut shuffled = four_wednesdays([100.0, 100.0, 100.0, 400.0]);
        shuffled.reverse();
        rolling_baseline(&mut shuffled);

        let last = shuffled
            .iter()
            .find(|r| r.date == "2025-03-26".parse::<NaiveDate>().unwrap())
            .unwrap();
        assert_eq!(last.rolling_avg, Some(175.0));
    }
}
