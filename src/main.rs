use std::error::Error;

use dredge_feed::{EventSink, ReaderState};
use tokio::sync::mpsc;
use tracing::{info, warn};

mod app_metrics;
mod config;
mod consumer;
mod consumer_state;
mod error;
mod producer;
mod sinks;

use config::{Config, OutputFormat};
use consumer::StreamConsumer;
use producer::StreamProducer;
use sinks::{ChannelSink, JsonSink, LogSink};

const DEFAULT_CONFIG_PATH: &str = "config.json";

// ========== Logging Setup ==========

type LocalTimer = tracing_subscriber::fmt::time::OffsetTime<time::format_description::well_known::Rfc3339>;

fn local_timer() -> LocalTimer {
    use tracing_subscriber::fmt::time::OffsetTime;
    OffsetTime::local_rfc_3339().unwrap_or_else(|_| {
        OffsetTime::new(time::UtcOffset::UTC, time::format_description::well_known::Rfc3339)
    })
}

fn init_logging(log_config: &config::LogConfig) -> Result<(), Box<dyn Error>> {
    use tracing_appender::rolling;
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(&log_config.directory)?;
    let file_appender = rolling::daily(&log_config.directory, &log_config.file_prefix);

    // Exactly one of the two file layers is active
    let (plain_file_layer, json_file_layer) = if log_config.json {
        let layer = fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_timer(local_timer());
        (None, Some(layer))
    } else {
        let layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_timer(local_timer());
        (Some(layer), None)
    };

    // Console goes to stderr so stdout stays clean for JSON event output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(local_timer());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&log_config.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(plain_file_layer)
        .with(json_file_layer)
        .init();

    Ok(())
}

// ========== Command Line ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Producer,
    Consumer,
}

struct Args {
    role: Option<Role>,
    config_path: String,
    validate_only: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        role: None,
        config_path: DEFAULT_CONFIG_PATH.to_string(),
        validate_only: false,
        help: false,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => parsed.help = true,
            "--validate-config" | "--validate" | "-v" => parsed.validate_only = true,
            "--config" | "-c" => {
                parsed.config_path = iter
                    .next()
                    .ok_or_else(|| format!("{} requires a path", arg))?
                    .clone();
            }
            "producer" | "server" => parsed.role = Some(Role::Producer),
            "consumer" | "client" => parsed.role = Some(Role::Consumer),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(parsed)
}

fn print_usage() {
    println!("Dredge Telemetry Feed");
    println!();
    println!("USAGE:");
    println!("    dredge_telemetry <producer|consumer> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --config, -c <PATH>                  Configuration file (default: {})", DEFAULT_CONFIG_PATH);
    println!("    --validate-config, --validate, -v    Validate configuration and exit");
    println!("    --help, -h                           Show this help message");
}

// ========== Main Application ==========

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = match parse_args(&raw_args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            std::process::exit(2);
        }
    };

    if args.help {
        print_usage();
        return Ok(());
    }

    let config = match Config::from_file(&args.config_path) {
        Ok(cfg) => {
            if args.validate_only {
                println!("✓ Configuration validation successful");
                println!("  Address: {}", cfg.network.address());
                println!(
                    "  Producer intervals: sentence={}ms, record={}ms, cycle={}ms",
                    cfg.producer.sentence_interval_ms,
                    cfg.producer.record_interval_ms,
                    cfg.producer.cycle_interval_ms
                );
                println!(
                    "  Consumer: strict_checksum={}, low fuel below {}%",
                    cfg.consumer.strict_checksum, cfg.consumer.low_fuel_threshold_percent
                );
                return Ok(());
            }
            cfg
        }
        Err(e) => {
            if args.validate_only {
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
            eprintln!("Warning: Could not load {}: {}", args.config_path, e);
            eprintln!("Using default configuration");
            Config::default()
        }
    };

    let Some(role) = args.role else {
        print_usage();
        std::process::exit(2);
    };

    init_logging(&config.logging)?;
    info!("Dredge telemetry {:?} starting...", role);

    let result = match role {
        Role::Producer => run_producer(&config).await,
        Role::Consumer => run_consumer(&config).await,
    };
    if let Err(e) = &result {
        tracing::error!("Session ended with error: {}", e);
    }
    result
}

async fn run_producer(config: &Config) -> Result<(), Box<dyn Error>> {
    let mut producer = StreamProducer::new(config.producer.clone());
    let addr = config.network.address();

    tokio::select! {
        result = producer.serve(&addr) => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down producer"),
    }
    Ok(())
}

async fn run_consumer(config: &Config) -> Result<(), Box<dyn Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let addr = config.network.address();
    let consumer_config = config.consumer.clone();

    // Network reads run on their own task; rendering happens here
    let read_task = tokio::spawn(async move {
        let mut consumer = StreamConsumer::new(consumer_config, ChannelSink::new(tx));
        consumer.connect_and_run(&addr).await
    });

    let mut sink: Box<dyn EventSink> = match config.consumer.output {
        OutputFormat::Log => Box::new(LogSink),
        OutputFormat::Json => Box::new(JsonSink::new(std::io::stdout())),
    };

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => sink.handle_event(event),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, closing consumer");
                read_task.abort();
                return Ok(());
            }
        }
    }

    match read_task.await?? {
        ReaderState::ClosedTruncated => warn!("Producer closed mid-message; trailing bytes discarded"),
        _ => info!("Consumer finished"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("dredge_telemetry")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_role_and_config() {
        let parsed = parse_args(&args(&["consumer", "--config", "alt.json"])).unwrap();
        assert_eq!(parsed.role, Some(Role::Consumer));
        assert_eq!(parsed.config_path, "alt.json");
        assert!(!parsed.validate_only);

        let parsed = parse_args(&args(&["-v", "producer"])).unwrap();
        assert_eq!(parsed.role, Some(Role::Producer));
        assert_eq!(parsed.config_path, DEFAULT_CONFIG_PATH);
        assert!(parsed.validate_only);
    }

    #[test]
    fn test_parse_rejects_bad_args() {
        assert!(parse_args(&args(&["--config"])).is_err());
        assert!(parse_args(&args(&["listener"])).is_err());
        assert!(parse_args(&args(&[])).unwrap().role.is_none());
    }
}
