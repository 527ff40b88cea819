//! Dredge Telemetry Feed Protocol
//!
//! Everything needed to produce and to re-parse the dredge telemetry feed,
//! with no I/O of its own:
//! - `$...*HH` checksum framing for NMEA 0183 sentences
//! - generators and typed decoders for GPGGA, GPRMC, SDDBT and SDMTW
//! - PGN-tagged telemetry records and fuel/oil equipment status lines
//! - a stream reader that reassembles frames from arbitrarily chunked bytes
//! - frame classification into typed messages
//! - the event model handed to sinks
//!
//! # Example
//!
//! ```
//! use dredge_feed::{ChecksumMode, FeedMessage, FeedStreamReader};
//!
//! let mut reader = FeedStreamReader::new();
//! let frames = reader.process_bytes(b"$SDMTW,18.50,C*38\r\nFuel Level: 97.30%, Oil Level: 45.12L\r\n");
//! for frame in frames {
//!     match FeedMessage::classify(&frame, ChecksumMode::Strict) {
//!         Ok(message) => println!("{:?}", message),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

pub mod checksum;
pub mod equipment;
pub mod error;
pub mod event;
pub mod fields;
pub mod message;
pub mod sentences;
pub mod stream_reader;
pub mod telemetry;

// Re-export commonly used types
pub use equipment::{EquipmentProfile, EquipmentStatus, ProducerState};
pub use error::ParseError;
pub use event::{EventSink, FeedEvent};
pub use message::{ChecksumMode, FeedMessage, Sentence};
pub use sentences::{Nmea0183Message, TalkerType};
pub use stream_reader::{FeedStreamReader, RawFrame, ReaderState};
pub use telemetry::{TelemetryPayload, TelemetryRecord};
