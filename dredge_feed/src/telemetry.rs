//! Coarse NMEA 2000-style telemetry records carried as plain text lines.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::Serialize;

use crate::error::ParseError;
use crate::fields::{labeled_f64, labeled_text, labeled_u32};

/// Every telemetry line starts with this marker.
pub const TELEMETRY_MARKER: &str = "NMEA 2000 PGN:";

pub const ENGINE_PARAMETERS_PGN: u32 = 100;
/// Lies outside `PGN_DRAW_RANGE`, so `TelemetryRecord::generate` never
/// produces an environmental payload. Decoding still supports it.
pub const ENVIRONMENTAL_PARAMETERS_PGN: u32 = 130311;
pub const PGN_DRAW_RANGE: RangeInclusive<u32> = 100..=200;

const GENERIC_LABEL: &str = "Example Data";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant")]
pub enum TelemetryPayload {
    EngineParameters { rpm: u32, temp_c: f64 },
    EnvironmentalParameters { depth_m: f64, temp_c: f64 },
    GenericPayload { label: String },
}

impl TelemetryPayload {
    /// Draw the payload that belongs to `pgn`.
    pub fn generate<R: Rng + ?Sized>(pgn: u32, rng: &mut R) -> Self {
        match pgn {
            ENGINE_PARAMETERS_PGN => TelemetryPayload::EngineParameters {
                rpm: rng.random_range(600..=3000),
                temp_c: rng.random_range(50.0..=120.0),
            },
            ENVIRONMENTAL_PARAMETERS_PGN => TelemetryPayload::EnvironmentalParameters {
                depth_m: rng.random_range(0.0..=50.0),
                temp_c: rng.random_range(5.0..=30.0),
            },
            _ => TelemetryPayload::GenericPayload {
                label: GENERIC_LABEL.to_string(),
            },
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            TelemetryPayload::EngineParameters { .. } => "EngineParameters",
            TelemetryPayload::EnvironmentalParameters { .. } => "EnvironmentalParameters",
            TelemetryPayload::GenericPayload { .. } => "GenericPayload",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub pgn: u32,
    pub payload: TelemetryPayload,
}

impl TelemetryRecord {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let pgn = rng.random_range(PGN_DRAW_RANGE);
        Self {
            pgn,
            payload: TelemetryPayload::generate(pgn, rng),
        }
    }

    pub fn to_line(&self) -> String {
        self.to_string()
    }

    /// Parse a line that starts with [`TELEMETRY_MARKER`]. The payload
    /// variant is chosen by the PGN alone, the same way it was generated.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        if !line.starts_with(TELEMETRY_MARKER) {
            return Err(ParseError::unknown_shape("missing telemetry marker"));
        }
        let pgn = labeled_u32(line, TELEMETRY_MARKER)?;
        let payload = match pgn {
            ENGINE_PARAMETERS_PGN => TelemetryPayload::EngineParameters {
                rpm: labeled_u32(line, "Engine RPM:")?,
                temp_c: labeled_f64(line, "Engine Temperature:")?,
            },
            ENVIRONMENTAL_PARAMETERS_PGN => TelemetryPayload::EnvironmentalParameters {
                depth_m: labeled_f64(line, "Water Depth:")?,
                temp_c: labeled_f64(line, "Water Temperature:")?,
            },
            _ => TelemetryPayload::GenericPayload {
                label: labeled_text(line, "Data:")
                    .map(str::to_string)
                    .unwrap_or_default(),
            },
        };
        Ok(Self { pgn, payload })
    }
}

impl fmt::Display for TelemetryRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}, ", TELEMETRY_MARKER, self.pgn)?;
        match &self.payload {
            TelemetryPayload::EngineParameters { rpm, temp_c } => {
                write!(f, "Engine RPM: {}, Engine Temperature: {:.2} C", rpm, temp_c)
            }
            TelemetryPayload::EnvironmentalParameters { depth_m, temp_c } => {
                write!(f, "Water Depth: {:.2}m, Water Temperature: {:.2}C", depth_m, temp_c)
            }
            TelemetryPayload::GenericPayload { label } => write!(f, "Data: {}", label),
        }
    }
}
