use std::collections::VecDeque;
use std::fmt;

use dredge_feed::{EquipmentStatus, FeedEvent};
use tracing::warn;

pub const DEFAULT_LOW_FUEL_THRESHOLD: f64 = 55.0;
pub const DEFAULT_SERIES_WINDOW: usize = 600;

/// Consumer-owned state: the running fuel/oil series and the one-shot
/// low-fuel alert flag.
///
/// The time index counts accepted readings from 1 and never moves for a
/// rejected message. The series keep only the most recent `series_window`
/// points, like a scrolling chart.
#[derive(Debug, Clone)]
pub struct ConsumerState {
    low_fuel_threshold: f64,
    low_fuel_notified: bool,
    readings: u64,
    series_window: usize,
    fuel_series: VecDeque<(u64, f64)>,
    oil_series: VecDeque<(u64, f64)>,
}

/// Snapshot of the series for periodic reporting
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub readings: u64,
    /// Points currently held in the window
    pub window_len: usize,
    pub first_fuel_percent: f64,
    pub last_fuel_percent: f64,
    pub min_oil_liters: f64,
    pub max_oil_liters: f64,
    pub low_fuel_notified: bool,
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} readings, last {}: fuel {:.2}% -> {:.2}%, oil {:.2}-{:.2}L, low fuel alert {}",
            self.readings,
            self.window_len,
            self.first_fuel_percent,
            self.last_fuel_percent,
            self.min_oil_liters,
            self.max_oil_liters,
            if self.low_fuel_notified { "raised" } else { "not raised" }
        )
    }
}

impl ConsumerState {
    pub fn new(low_fuel_threshold: f64) -> Self {
        Self::with_series_window(low_fuel_threshold, DEFAULT_SERIES_WINDOW)
    }

    pub fn with_series_window(low_fuel_threshold: f64, series_window: usize) -> Self {
        let series_window = series_window.max(1);
        Self {
            low_fuel_threshold,
            low_fuel_notified: false,
            readings: 0,
            series_window,
            fuel_series: VecDeque::with_capacity(series_window),
            oil_series: VecDeque::with_capacity(series_window),
        }
    }

    pub fn time_index(&self) -> u64 {
        self.readings
    }

    #[allow(dead_code)]
    pub fn low_fuel_notified(&self) -> bool {
        self.low_fuel_notified
    }

    #[allow(dead_code)]
    pub fn fuel_series(&self) -> &VecDeque<(u64, f64)> {
        &self.fuel_series
    }

    #[allow(dead_code)]
    pub fn oil_series(&self) -> &VecDeque<(u64, f64)> {
        &self.oil_series
    }

    /// None until the first reading arrives
    pub fn summary(&self) -> Option<SeriesSummary> {
        let (_, first_fuel_percent) = *self.fuel_series.front()?;
        let (_, last_fuel_percent) = *self.fuel_series.back()?;
        let (min_oil_liters, max_oil_liters) = self
            .oil_series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, oil)| {
                (lo.min(*oil), hi.max(*oil))
            });
        Some(SeriesSummary {
            readings: self.readings,
            window_len: self.fuel_series.len(),
            first_fuel_percent,
            last_fuel_percent,
            min_oil_liters,
            max_oil_liters,
            low_fuel_notified: self.low_fuel_notified,
        })
    }

    fn push_point(&mut self, time_index: u64, status: &EquipmentStatus) {
        if self.fuel_series.len() == self.series_window {
            self.fuel_series.pop_front();
            self.oil_series.pop_front();
        }
        self.fuel_series.push_back((time_index, status.fuel_percent));
        self.oil_series.push_back((time_index, status.oil_liters));
    }

    /// Record an accepted reading. Returns the reading event and, the first
    /// time fuel is below the threshold, the alert that follows it.
    pub fn accept_reading(&mut self, status: EquipmentStatus) -> (FeedEvent, Option<FeedEvent>) {
        self.readings += 1;
        let time_index = self.readings;
        self.push_point(time_index, &status);

        let reading = FeedEvent::EquipmentReading {
            time_index,
            fuel_percent: status.fuel_percent,
            oil_liters: status.oil_liters,
        };

        let alert = if !self.low_fuel_notified && status.fuel_percent < self.low_fuel_threshold {
            self.low_fuel_notified = true;
            warn!(
                "Low fuel: {:.2}% is below {:.2}% (reading #{})",
                status.fuel_percent, self.low_fuel_threshold, time_index
            );
            Some(FeedEvent::LowFuelAlert {
                time_index,
                fuel_percent: status.fuel_percent,
            })
        } else {
            None
        };

        (reading, alert)
    }
}

impl Default for ConsumerState {
    fn default() -> Self {
        Self::new(DEFAULT_LOW_FUEL_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(fuel_percent: f64) -> EquipmentStatus {
        EquipmentStatus {
            fuel_percent,
            oil_liters: 40.0,
        }
    }

    fn alerts_for(levels: &[f64]) -> Vec<FeedEvent> {
        let mut state = ConsumerState::default();
        levels
            .iter()
            .filter_map(|level| state.accept_reading(status(*level)).1)
            .collect()
    }

    #[test]
    fn test_time_index_counts_from_one() {
        let mut state = ConsumerState::default();
        assert_eq!(state.time_index(), 0);
        for expected in 1..=5 {
            let (reading, _) = state.accept_reading(status(90.0));
            match reading {
                FeedEvent::EquipmentReading { time_index, .. } => assert_eq!(time_index, expected),
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(state.fuel_series().len(), 5);
        assert_eq!(state.oil_series()[4], (5, 40.0));
    }

    #[test]
    fn test_alert_fires_once() {
        let alerts = alerts_for(&[60.0, 56.0, 54.99, 50.0, 40.0, -3.0]);
        assert_eq!(
            alerts,
            vec![FeedEvent::LowFuelAlert { time_index: 3, fuel_percent: 54.99 }]
        );
    }

    #[test]
    fn test_alert_never_fires_above_threshold() {
        assert!(alerts_for(&[100.0, 80.0, 55.0, 55.0]).is_empty());
    }

    #[test]
    fn test_alert_not_rearmed_by_rising_fuel() {
        let alerts = alerts_for(&[50.0, 90.0, 40.0]);
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_flag_is_sticky() {
        let mut state = ConsumerState::new(10.0);
        assert!(!state.low_fuel_notified());
        state.accept_reading(status(9.0));
        assert!(state.low_fuel_notified());
        state.accept_reading(status(50.0));
        assert!(state.low_fuel_notified());
    }

    #[test]
    fn test_series_window_keeps_latest_points() {
        let mut state = ConsumerState::with_series_window(DEFAULT_LOW_FUEL_THRESHOLD, 3);
        for fuel in [90.0, 80.0, 70.0, 60.0, 50.0] {
            state.accept_reading(status(fuel));
        }
        assert_eq!(state.time_index(), 5);
        assert_eq!(
            state.fuel_series().iter().copied().collect::<Vec<_>>(),
            vec![(3, 70.0), (4, 60.0), (5, 50.0)]
        );
        assert_eq!(state.oil_series().len(), 3);
    }

    #[test]
    fn test_summary() {
        let mut state = ConsumerState::with_series_window(DEFAULT_LOW_FUEL_THRESHOLD, 2);
        assert!(state.summary().is_none());

        state.accept_reading(EquipmentStatus { fuel_percent: 70.0, oil_liters: 33.0 });
        state.accept_reading(EquipmentStatus { fuel_percent: 60.0, oil_liters: 48.5 });
        state.accept_reading(EquipmentStatus { fuel_percent: 52.5, oil_liters: 40.0 });

        let summary = state.summary().unwrap();
        assert_eq!(
            summary,
            SeriesSummary {
                readings: 3,
                window_len: 2,
                first_fuel_percent: 60.0,
                last_fuel_percent: 52.5,
                min_oil_liters: 40.0,
                max_oil_liters: 48.5,
                low_fuel_notified: true,
            }
        );
        assert_eq!(
            summary.to_string(),
            "3 readings, last 2: fuel 60.00% -> 52.50%, oil 40.00-48.50L, low fuel alert raised"
        );
    }
}
