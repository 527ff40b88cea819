use dredge_feed::sentences::generate_cycle;
use dredge_feed::{EquipmentProfile, ProducerState, TelemetryRecord};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::app_metrics::{Metrics, ProducerMetrics};
use crate::config::ProducerConfig;
use crate::error::SessionError;

/// Appended to every message on the wire
pub const MESSAGE_DELIMITER: &str = "\r\n";

/// Single-client telemetry producer.
///
/// Accepts one connection and streams cycles to it until the connection
/// fails. Each cycle sends the four NMEA 0183 sentences, one telemetry
/// record and one fuel/oil reading.
pub struct StreamProducer {
    config: ProducerConfig,
    profile: EquipmentProfile,
    state: ProducerState,
    rng: StdRng,
    metrics: ProducerMetrics,
}

impl StreamProducer {
    pub fn new(config: ProducerConfig) -> Self {
        let rng = if config.random_seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(config.random_seed)
        };
        Self {
            profile: config.equipment_profile(),
            state: ProducerState::new(config.initial_fuel_percent),
            rng,
            metrics: ProducerMetrics::new(),
            config,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &ProducerState {
        &self.state
    }

    #[allow(dead_code)]
    pub fn metrics(&self) -> &ProducerMetrics {
        &self.metrics
    }

    pub async fn bind(addr: &str) -> Result<TcpListener, SessionError> {
        TcpListener::bind(addr).await.map_err(|source| SessionError::Bind {
            addr: addr.to_string(),
            source,
        })
    }

    /// Listen on `addr`, accept a single peer and stream to it
    pub async fn serve(&mut self, addr: &str) -> Result<(), SessionError> {
        let listener = Self::bind(addr).await?;
        info!("Producer listening on {}", listener.local_addr()?);
        self.accept_and_run(listener).await
    }

    /// Accept exactly one connection; the listener is closed afterwards
    pub async fn accept_and_run(&mut self, listener: TcpListener) -> Result<(), SessionError> {
        let (stream, peer) = listener.accept().await?;
        drop(listener);
        info!("Connected by {}", peer);
        stream.set_nodelay(true)?;
        let result = self.run_session(stream).await;
        self.metrics.log();
        result
    }

    /// Stream cycles until a write fails. Never returns `Ok`.
    pub async fn run_session<W: AsyncWrite + Unpin>(&mut self, mut writer: W) -> Result<(), SessionError> {
        loop {
            self.send_cycle(&mut writer).await?;
        }
    }

    /// One full cycle including its pacing delays
    pub async fn send_cycle<W: AsyncWrite + Unpin>(&mut self, writer: &mut W) -> Result<(), SessionError> {
        for sentence in generate_cycle(&mut self.rng) {
            self.send_message(writer, &sentence).await?;
            tokio::time::sleep(self.config.sentence_interval()).await;
        }
        tokio::time::sleep(self.config.record_interval()).await;

        let record = TelemetryRecord::generate(&mut self.rng);
        self.send_message(writer, &record.to_line()).await?;

        let status = self.state.tick(&self.profile, &mut self.rng);
        self.send_message(writer, &status.to_line()).await?;

        self.metrics.cycles += 1;
        debug!("Cycle {} sent, fuel at {:.2}%", self.metrics.cycles, self.state.fuel_percent);

        tokio::time::sleep(self.config.cycle_interval()).await;
        Ok(())
    }

    async fn send_message<W: AsyncWrite + Unpin>(&mut self, writer: &mut W, message: &str) -> Result<(), SessionError> {
        let line = format!("{}{}", message, MESSAGE_DELIMITER);
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        self.metrics.messages_sent += 1;
        self.metrics.bytes_sent += line.len() as u64;
        debug!("Sent: {}", message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use dredge_feed::checksum::FramedSentence;
    use dredge_feed::{EquipmentStatus, FeedStreamReader};
    use tokio::io::AsyncReadExt;

    fn fast_config(seed: u64) -> ProducerConfig {
        ProducerConfig {
            sentence_interval_ms: 0,
            record_interval_ms: 0,
            cycle_interval_ms: 0,
            random_seed: seed,
            ..ProducerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_cycle_layout() {
        let mut producer = StreamProducer::new(fast_config(3));
        let mut output = Vec::new();
        producer.send_cycle(&mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 6);
        for (line, prefix) in lines.iter().zip(["$GPGGA,", "$GPRMC,", "$SDDBT,", "$SDMTW,"]) {
            assert!(line.starts_with(prefix), "{}", line);
            assert!(FramedSentence::split(line).unwrap().is_valid());
        }
        assert!(lines[4].starts_with("NMEA 2000 PGN: "));
        let status = EquipmentStatus::parse(lines[5]).unwrap();
        assert_abs_diff_eq!(status.fuel_percent, producer.state().fuel_percent, epsilon = 1e-9);
        assert!(status.fuel_percent <= 97.3 + 1e-9 && status.fuel_percent >= 96.2 - 1e-9);

        assert_eq!(producer.metrics().cycles, 1);
        assert_eq!(producer.metrics().messages_sent, 6);
        assert_eq!(producer.metrics().bytes_sent, text.len() as u64);
    }

    #[tokio::test]
    async fn test_same_seed_same_feed() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        StreamProducer::new(fast_config(99)).send_cycle(&mut first).await.unwrap();
        StreamProducer::new(fast_config(99)).send_cycle(&mut second).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fuel_keeps_falling_across_cycles() {
        let mut producer = StreamProducer::new(fast_config(5));
        let mut output = Vec::new();
        for _ in 0..40 {
            producer.send_cycle(&mut output).await.unwrap();
        }
        let mut reader = FeedStreamReader::new();
        let fuel: Vec<f64> = reader
            .process_bytes(&output)
            .iter()
            .filter_map(|frame| EquipmentStatus::parse(frame).ok())
            .map(|status| status.fuel_percent)
            .collect();
        assert_eq!(fuel.len(), 40);
        assert!(fuel.windows(2).all(|w| w[1] < w[0]));
        // 40 cycles of at least 2.7 each take the tank below zero
        assert!(*fuel.last().unwrap() < 0.0);
    }

    #[tokio::test]
    async fn test_session_ends_when_peer_closes() {
        let (client, server) = tokio::io::duplex(64);
        let mut producer = StreamProducer::new(fast_config(8));

        let session = tokio::spawn(async move { producer.run_session(server).await });

        let mut client = client;
        let mut buf = [0u8; 256];
        let n = client.read(&mut buf).await.unwrap();
        assert!(n > 0);
        drop(client);

        let result = session.await.unwrap();
        assert!(matches!(result, Err(SessionError::Connection(_))));
    }
}
