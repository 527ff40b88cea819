use dredge_feed::stream_reader::MAX_FRAME_LEN;
use dredge_feed::{ChecksumMode, EventSink, FeedEvent, FeedMessage, FeedStreamReader, ParseError, RawFrame, ReaderState};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::app_metrics::{ConsumerMetrics, Metrics, MetricsLogger};
use crate::config::ConsumerConfig;
use crate::consumer_state::ConsumerState;
use crate::error::SessionError;

/// Telemetry consumer.
///
/// Reads the stream in whatever chunks the transport delivers, rebuilds
/// whole messages, classifies them and hands one event per message to the
/// sink, in arrival order. Parse failures are reported to the sink as
/// `ParseError` events and the loop carries on; only a transport error
/// ends the session early.
pub struct StreamConsumer<S: EventSink> {
    config: ConsumerConfig,
    checksum_mode: ChecksumMode,
    reader: FeedStreamReader,
    state: ConsumerState,
    sink: S,
    metrics: ConsumerMetrics,
    metrics_logger: MetricsLogger,
}

impl<S: EventSink> StreamConsumer<S> {
    pub fn new(config: ConsumerConfig, sink: S) -> Self {
        Self {
            checksum_mode: config.checksum_mode(),
            reader: FeedStreamReader::new(),
            state: ConsumerState::with_series_window(config.low_fuel_threshold_percent, config.series_window),
            sink,
            metrics: ConsumerMetrics::new(),
            metrics_logger: MetricsLogger::new(config.metrics_interval()),
            config,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &ConsumerState {
        &self.state
    }

    #[allow(dead_code)]
    pub fn reader_state(&self) -> ReaderState {
        self.reader.state()
    }

    #[allow(dead_code)]
    pub fn into_sink(self) -> S {
        self.sink
    }

    pub async fn connect_and_run(&mut self, addr: &str) -> Result<ReaderState, SessionError> {
        let stream = TcpStream::connect(addr).await?;
        info!("Connected to producer at {}", addr);
        self.run(stream).await
    }

    /// Read until the peer closes. Returns `Closed` or `ClosedTruncated`.
    pub async fn run<R: AsyncRead + Unpin>(&mut self, mut stream: R) -> Result<ReaderState, SessionError> {
        let mut buf = vec![0u8; self.config.read_buffer_size.max(1)];
        loop {
            let n = stream.read(&mut buf).await?;
            if n == 0 {
                let end = self.reader.close();
                match end {
                    ReaderState::ClosedTruncated => warn!("Connection closed in the middle of a message"),
                    _ => info!("Connection closed by producer"),
                }
                self.metrics.log();
                self.log_series();
                return Ok(end);
            }
            self.process_bytes(&buf[..n]);
            if self.metrics_logger.check_and_log(&mut self.metrics) {
                self.log_series();
            }
        }
    }

    /// Feed one read's worth of bytes through framing and classification
    pub fn process_bytes(&mut self, data: &[u8]) {
        self.metrics.bytes_read += data.len() as u64;
        for frame in self.reader.read_frames(data) {
            self.metrics.frames += 1;
            match frame {
                RawFrame::Complete(text) => self.handle_frame(text),
                RawFrame::Overlong(prefix) => {
                    let reason = ParseError::unknown_shape(format!("frame longer than {} bytes", MAX_FRAME_LEN));
                    warn!("Dropping message: {} ({:?})", reason, prefix);
                    self.emit(FeedEvent::ParseError {
                        reason,
                        raw_message: prefix,
                    });
                }
            }
        }
    }

    fn log_series(&self) {
        if let Some(summary) = self.state.summary() {
            info!("Equipment series: {}", summary);
        }
    }

    fn handle_frame(&mut self, frame: String) {
        debug!("Received: {}", frame);
        match FeedMessage::classify(&frame, self.checksum_mode) {
            Ok(FeedMessage::Sentence(sentence)) => self.emit(FeedEvent::SentenceParsed {
                talker: sentence.talker,
                fields: sentence.fields,
            }),
            Ok(FeedMessage::Telemetry(record)) => self.emit(FeedEvent::TelemetryParsed {
                pgn: record.pgn,
                payload: record.payload,
            }),
            Ok(FeedMessage::Equipment(status)) => {
                let (reading, alert) = self.state.accept_reading(status);
                self.emit(reading);
                if let Some(alert) = alert {
                    self.emit(alert);
                }
            }
            Err(reason) => {
                warn!("Dropping message: {} ({:?})", reason, frame);
                self.emit(FeedEvent::ParseError {
                    reason,
                    raw_message: frame,
                });
            }
        }
    }

    fn emit(&mut self, event: FeedEvent) {
        self.metrics.record(&event);
        self.sink.handle_event(event);
    }
}
