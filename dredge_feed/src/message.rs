//! Classification of complete frames into typed feed messages.

use crate::checksum::FramedSentence;
use crate::equipment::EquipmentStatus;
use crate::error::ParseError;
use crate::sentences::{Nmea0183Message, TalkerType};
use crate::telemetry::{TELEMETRY_MARKER, TelemetryRecord};

/// Whether the `*HH` checksum of received sentences is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumMode {
    /// Accept sentences whatever their checksum
    #[default]
    Skip,
    /// Reject sentences whose checksum does not match their body
    Strict,
}

/// A received NMEA 0183 sentence, split into its talker and data fields
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub talker: TalkerType,
    pub fields: Vec<String>,
}

impl Sentence {
    pub fn parse(frame: &str, mode: ChecksumMode) -> Result<Self, ParseError> {
        let framed = FramedSentence::split(frame)
            .ok_or_else(|| ParseError::unknown_shape("sentence lacks a $...*HH frame"))?;
        if mode == ChecksumMode::Strict && !framed.is_valid() {
            return Err(ParseError::MalformedMessage {
                expected: framed.computed(),
                actual: framed.transmitted,
            });
        }

        let mut parts = framed.body.split(',');
        let id = parts.next().unwrap_or_default();
        let talker = TalkerType::from_id(id)
            .ok_or_else(|| ParseError::unknown_shape(format!("unsupported sentence type '{}'", id)))?;
        Ok(Self {
            talker,
            fields: parts.map(str::to_string).collect(),
        })
    }

    pub fn decode(&self) -> Nmea0183Message {
        Nmea0183Message::from_fields(self.talker, &self.fields)
    }
}

/// Any message the feed carries
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    Sentence(Sentence),
    Telemetry(TelemetryRecord),
    Equipment(EquipmentStatus),
}

impl FeedMessage {
    /// Classify a complete frame by its structure: a `$` sentence, a line
    /// starting with the telemetry marker, or a line carrying both the fuel
    /// and the oil labels.
    pub fn classify(frame: &str, mode: ChecksumMode) -> Result<Self, ParseError> {
        if frame.starts_with('$') {
            Sentence::parse(frame, mode).map(FeedMessage::Sentence)
        } else if frame.starts_with(TELEMETRY_MARKER) {
            TelemetryRecord::parse(frame).map(FeedMessage::Telemetry)
        } else if EquipmentStatus::matches_shape(frame) {
            EquipmentStatus::parse(frame).map(FeedMessage::Equipment)
        } else {
            Err(ParseError::unknown_shape("matches no known message"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::frame;
    use crate::telemetry::TelemetryPayload;

    #[test]
    fn test_classify_sentence() {
        let msg = FeedMessage::classify(&frame("SDDBT,32.81,f,10.00,M"), ChecksumMode::Strict).unwrap();
        match msg {
            FeedMessage::Sentence(sentence) => {
                assert_eq!(sentence.talker, TalkerType::Sddbt);
                assert_eq!(sentence.fields, vec!["32.81", "f", "10.00", "M"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_checksum_modes() {
        let corrupted = "$SDMTW,18.50,C*00";
        assert!(matches!(
            FeedMessage::classify(corrupted, ChecksumMode::Skip),
            Ok(FeedMessage::Sentence(_))
        ));
        assert_eq!(
            FeedMessage::classify(corrupted, ChecksumMode::Strict).unwrap_err(),
            ParseError::MalformedMessage { expected: 0x38, actual: 0x00 }
        );
    }

    #[test]
    fn test_classify_telemetry_and_equipment() {
        let telemetry = FeedMessage::classify("NMEA 2000 PGN: 142, Data: Example Data", ChecksumMode::Skip).unwrap();
        assert_eq!(
            telemetry,
            FeedMessage::Telemetry(TelemetryRecord {
                pgn: 142,
                payload: TelemetryPayload::GenericPayload { label: "Example Data".to_string() },
            })
        );

        let equipment = FeedMessage::classify("Fuel Level: 50.00%, Oil Level: 40.00L", ChecksumMode::Skip).unwrap();
        assert_eq!(
            equipment,
            FeedMessage::Equipment(EquipmentStatus { fuel_percent: 50.0, oil_liters: 40.0 })
        );
    }

    #[test]
    fn test_unknown_shapes() {
        for frame_text in ["$GPGG", "$GPGLL,1,2*7F", "hello world", "Fuel Level: 3%", "xx#"] {
            assert!(
                matches!(
                    FeedMessage::classify(frame_text, ChecksumMode::Skip),
                    Err(ParseError::UnknownMessageShape { .. })
                ),
                "{}",
                frame_text
            );
        }
    }

    #[test]
    fn test_decode_sentence() {
        let sentence = Sentence::parse(&frame("SDMTW,18.50,C"), ChecksumMode::Strict).unwrap();
        assert_eq!(sentence.decode().to_string(), "Water Temperature: 18.50°C");
    }
}
