use std::io::Write;

use dredge_feed::{EventSink, FeedEvent};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Writes every event to the log. Stands in for the plotting surface.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn handle_event(&mut self, event: FeedEvent) {
        match &event {
            FeedEvent::SentenceParsed { talker, .. } => info!("[{}] {}", talker, event),
            FeedEvent::TelemetryParsed { .. } => info!("[N2K] {}", event),
            FeedEvent::EquipmentReading { .. } => info!("[EQUIPMENT] {}", event),
            FeedEvent::LowFuelAlert { .. } => warn!("[ALERT] {}", event),
            FeedEvent::ParseError { .. } => warn!("[PARSE] {}", event),
        }
    }
}

/// Serializes each event as one JSON object per line
///
/// Suited to piping the feed into an external plotter.
pub struct JsonSink<W: Write> {
    writer: W,
    error_count: u64,
    event_count: u64,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error_count: 0,
            event_count: 0,
        }
    }

    /// Returns (event_count, error_count)
    #[allow(dead_code)]
    pub fn stats(&self) -> (u64, u64) {
        (self.event_count, self.error_count)
    }

    #[allow(dead_code)]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_event(&mut self, event: &FeedEvent) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(event)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> EventSink for JsonSink<W> {
    fn handle_event(&mut self, event: FeedEvent) {
        match self.write_event(&event) {
            Ok(()) => self.event_count += 1,
            Err(e) => {
                if self.error_count < 10 {
                    warn!("Failed to write event as JSON: {}", e);
                }
                self.error_count += 1;
            }
        }
    }
}

/// Forwards events to another task through an unbounded channel, which
/// keeps arrival order and never drops while the receiver is alive.
pub struct ChannelSink {
    sender: UnboundedSender<FeedEvent>,
    receiver_gone: bool,
}

impl ChannelSink {
    pub fn new(sender: UnboundedSender<FeedEvent>) -> Self {
        Self {
            sender,
            receiver_gone: false,
        }
    }
}

impl EventSink for ChannelSink {
    fn handle_event(&mut self, event: FeedEvent) {
        if self.sender.send(event).is_err() && !self.receiver_gone {
            debug!("Event receiver dropped; further events are discarded");
            self.receiver_gone = true;
        }
    }
}
