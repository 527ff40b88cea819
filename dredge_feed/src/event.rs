use std::fmt;

use serde::Serialize;

use crate::error::ParseError;
use crate::sentences::{Nmea0183Message, TalkerType};
use crate::telemetry::TelemetryPayload;

/// What the consumer hands to its sink, one event per accepted message
/// (plus the one-shot alert).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum FeedEvent {
    SentenceParsed {
        talker: TalkerType,
        fields: Vec<String>,
    },
    TelemetryParsed {
        pgn: u32,
        payload: TelemetryPayload,
    },
    EquipmentReading {
        time_index: u64,
        fuel_percent: f64,
        oil_liters: f64,
    },
    LowFuelAlert {
        time_index: u64,
        fuel_percent: f64,
    },
    ParseError {
        reason: ParseError,
        raw_message: String,
    },
}

impl FeedEvent {
    /// Typed view of a `SentenceParsed` event
    pub fn decode_sentence(&self) -> Option<Nmea0183Message> {
        match self {
            FeedEvent::SentenceParsed { talker, fields } => {
                Some(Nmea0183Message::from_fields(*talker, fields))
            }
            _ => None,
        }
    }
}

impl fmt::Display for FeedEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FeedEvent::SentenceParsed { .. } => match self.decode_sentence() {
                Some(msg) => write!(f, "{}", msg),
                None => Ok(()),
            },
            FeedEvent::TelemetryParsed { pgn, payload } => match payload {
                TelemetryPayload::EngineParameters { rpm, temp_c } => {
                    write!(f, "PGN {}: Engine {} rpm | {:.2}°C", pgn, rpm, temp_c)
                }
                TelemetryPayload::EnvironmentalParameters { depth_m, temp_c } => {
                    write!(f, "PGN {}: Water depth {:.2} m | {:.2}°C", pgn, depth_m, temp_c)
                }
                TelemetryPayload::GenericPayload { label } => write!(f, "PGN {}: {}", pgn, label),
            },
            FeedEvent::EquipmentReading { time_index, fuel_percent, oil_liters } => write!(
                f,
                "#{} Fuel: {:.2}% | Oil: {:.2} L",
                time_index, fuel_percent, oil_liters
            ),
            FeedEvent::LowFuelAlert { time_index, fuel_percent } => {
                write!(f, "#{} LOW FUEL: {:.2}%", time_index, fuel_percent)
            }
            FeedEvent::ParseError { reason, raw_message } => {
                write!(f, "{} in {:?}", reason, raw_message)
            }
        }
    }
}

/// Trait for components that receive feed events (display, plotting,
/// alerting, forwarding).
///
/// Events arrive in stream order; a sink must not drop or reorder them.
pub trait EventSink {
    fn handle_event(&mut self, event: FeedEvent);
}

impl EventSink for Vec<FeedEvent> {
    fn handle_event(&mut self, event: FeedEvent) {
        self.push(event);
    }
}
