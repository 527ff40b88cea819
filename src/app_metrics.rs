use std::time::{Duration, Instant};
use tracing::info;

use dredge_feed::FeedEvent;

/// Counters that can be logged and cleared at a fixed interval
pub trait Metrics {
    fn log(&self);
    fn reset(&mut self);
}

/// Consumer-side counters for the read loop and its parsed events
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConsumerMetrics {
    /// Bytes received from the stream
    pub bytes_read: u64,
    /// Complete frames recovered by the stream reader
    pub frames: u64,
    pub sentences: u64,
    pub telemetry_records: u64,
    pub equipment_readings: u64,
    pub low_fuel_alerts: u64,
    /// Frames dropped because they did not parse
    pub parse_errors: u64,
}

impl ConsumerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one event handed to the sink
    pub fn record(&mut self, event: &FeedEvent) {
        match event {
            FeedEvent::SentenceParsed { .. } => self.sentences += 1,
            FeedEvent::TelemetryParsed { .. } => self.telemetry_records += 1,
            FeedEvent::EquipmentReading { .. } => self.equipment_readings += 1,
            FeedEvent::LowFuelAlert { .. } => self.low_fuel_alerts += 1,
            FeedEvent::ParseError { .. } => self.parse_errors += 1,
        }
    }
}

impl Metrics for ConsumerMetrics {
    fn log(&self) {
        info!(
            "[Metrics] Bytes: {}, Frames: {}, Sentences: {}, Telemetry: {}, Equipment: {}, Alerts: {}, Parse errors: {}",
            self.bytes_read,
            self.frames,
            self.sentences,
            self.telemetry_records,
            self.equipment_readings,
            self.low_fuel_alerts,
            self.parse_errors
        );
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Producer-side counters
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProducerMetrics {
    pub cycles: u64,
    pub messages_sent: u64,
    pub bytes_sent: u64,
}

impl ProducerMetrics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metrics for ProducerMetrics {
    fn log(&self) {
        info!(
            "[Metrics] Cycles: {}, Messages sent: {}, Bytes sent: {}",
            self.cycles, self.messages_sent, self.bytes_sent
        );
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Manages periodic logging of application metrics
pub struct MetricsLogger {
    last_log: Instant,
    log_interval: Duration,
}

impl MetricsLogger {
    /// Create a new MetricsLogger with the specified logging interval
    pub fn new(log_interval: Duration) -> Self {
        Self {
            last_log: Instant::now(),
            log_interval,
        }
    }

    /// Check if it's time to log metrics, and if so, log them and reset
    /// Returns true if metrics were logged
    pub fn check_and_log<M: Metrics>(&mut self, metrics: &mut M) -> bool {
        if self.last_log.elapsed() >= self.log_interval {
            metrics.log();
            metrics.reset();
            self.last_log = Instant::now();
            true
        } else {
            false
        }
    }
}
