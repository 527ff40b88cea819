use dredge_feed::{ChecksumMode, EquipmentProfile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub producer: ProducerConfig,
    #[serde(default)]
    pub consumer: ConsumerConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Directory where log files will be stored
    pub directory: String,
    /// Log file name prefix (date will be appended)
    pub file_prefix: String,
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Write the log file as JSON lines instead of plain text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: "./logs".to_string(),
            file_prefix: "dredge_telemetry".to_string(),
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Where the producer listens and the consumer connects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub host: String,
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 65432,
        }
    }
}

impl NetworkConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Pause after each NMEA 0183 sentence
    pub sentence_interval_ms: u64,
    /// Extra pause before the telemetry record
    pub record_interval_ms: u64,
    /// Pause before the next cycle starts
    pub cycle_interval_ms: u64,
    pub initial_fuel_percent: f64,
    pub fuel_decay_min: f64,
    pub fuel_decay_max: f64,
    pub oil_min_liters: f64,
    pub oil_max_liters: f64,
    /// 0 seeds from the OS, anything else gives a reproducible feed
    pub random_seed: u64,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            sentence_interval_ms: 250,
            record_interval_ms: 250,
            cycle_interval_ms: 1000,
            initial_fuel_percent: 100.0,
            fuel_decay_min: 2.7,
            fuel_decay_max: 3.8,
            oil_min_liters: 31.0,
            oil_max_liters: 51.0,
            random_seed: 0,
        }
    }
}

impl ProducerConfig {
    pub fn sentence_interval(&self) -> Duration {
        Duration::from_millis(self.sentence_interval_ms)
    }

    pub fn record_interval(&self) -> Duration {
        Duration::from_millis(self.record_interval_ms)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }

    pub fn equipment_profile(&self) -> EquipmentProfile {
        EquipmentProfile {
            fuel_decay: self.fuel_decay_min..=self.fuel_decay_max,
            oil_liters: self.oil_min_liters..=self.oil_max_liters,
        }
    }
}

/// How the consumer presents parsed events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable lines through the logger
    #[default]
    Log,
    /// One JSON object per event on stdout
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    /// Reject sentences whose checksum does not match
    pub strict_checksum: bool,
    pub low_fuel_threshold_percent: f64,
    pub read_buffer_size: usize,
    pub metrics_interval_seconds: u64,
    /// Most recent readings kept in the fuel/oil series
    pub series_window: usize,
    pub output: OutputFormat,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            strict_checksum: false,
            low_fuel_threshold_percent: 55.0,
            read_buffer_size: 1024,
            metrics_interval_seconds: 60,
            series_window: 600,
            output: OutputFormat::Log,
        }
    }
}

impl ConsumerConfig {
    pub fn checksum_mode(&self) -> ChecksumMode {
        if self.strict_checksum {
            ChecksumMode::Strict
        } else {
            ChecksumMode::Skip
        }
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_interval_seconds)
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        let producer = &self.producer;
        if producer.fuel_decay_min <= 0.0 {
            return Err(format!(
                "fuel_decay_min ({}) must be positive so fuel keeps falling",
                producer.fuel_decay_min
            )
            .into());
        }
        if producer.fuel_decay_min > producer.fuel_decay_max {
            return Err(format!(
                "fuel_decay_min ({}) is greater than fuel_decay_max ({})",
                producer.fuel_decay_min, producer.fuel_decay_max
            )
            .into());
        }
        if producer.oil_min_liters > producer.oil_max_liters {
            return Err(format!(
                "oil_min_liters ({}) is greater than oil_max_liters ({})",
                producer.oil_min_liters, producer.oil_max_liters
            )
            .into());
        }
        if self.consumer.read_buffer_size == 0 {
            return Err("read_buffer_size must be at least 1".into());
        }
        if self.consumer.series_window == 0 {
            return Err("series_window must be at least 1".into());
        }
        Ok(())
    }
}
