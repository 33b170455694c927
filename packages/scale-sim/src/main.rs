use std::{path::PathBuf, time::Duration};

use clap::{ArgAction, Parser};
use log::{info, LevelFilter};
use scale_sim::{
    config::{parse_address, Config, ConfigError},
    protocol::Weight,
    serial::{self, SerialError},
    simulator::Simulator,
    store::SharedReadings,
    stream::StreamError,
};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Emulate a serial weighing scale answering handshake and weight reads",
    long_about = None
)]
struct Cli {
    /// INI file with [port], [scale] and [readings] sections
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Serial port to listen on
    #[arg(long)]
    port: Option<String>,

    /// Baud rate
    #[arg(long)]
    baud: Option<u32>,

    /// Address used to answer requests that do not name one
    #[arg(long, value_parser = parse_address)]
    address: Option<u8>,

    /// How long one read waits for a complete request, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Gross weight reading, e.g. 72.30
    #[arg(long, allow_hyphen_values = true)]
    gross: Option<Weight>,

    /// Tare weight reading, e.g. 2.15
    #[arg(long, allow_hyphen_values = true)]
    tare: Option<Weight>,

    /// Net weight reading, e.g. 70.15
    #[arg(long, allow_hyphen_values = true)]
    net: Option<Weight>,

    /// List available serial ports and exit
    #[arg(long)]
    list: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(port) = &self.port {
            config.port.name = port.clone();
        }
        if let Some(baud) = self.baud {
            config.port.baud_rate = baud;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.port.timeout = Duration::from_millis(timeout_ms);
        }
        if let Some(address) = self.address {
            config.address = address;
        }
        if let Some(gross) = self.gross {
            config.readings.gross = gross;
        }
        if let Some(tare) = self.tare {
            config.readings.tare = tare;
        }
        if let Some(net) = self.net {
            config.readings.net = net;
        }

        Ok(config)
    }
}

#[derive(Error, Debug)]
enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Serial(#[from] SerialError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

#[tokio::main]
async fn main() -> Result<(), SimError> {
    let cli = Cli::parse();

    simplelog::TermLogger::init(
        match cli.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    if cli.list {
        for port in serial::find_ports()? {
            println!("{}", serial::describe_port(&port));
        }
        return Ok(());
    }

    let config = cli.config()?;
    let readings = SharedReadings::new(config.readings);
    info!(
        "Readings: gross {} tare {} net {}",
        config.readings.gross, config.readings.tare, config.readings.net
    );

    let transport = serial::open(&config.port)?;
    let mut simulator = Simulator::new(transport, readings)
        .with_address(config.address)
        .with_poll_timeout(config.port.timeout);

    let finished = tokio::select! {
        result = simulator.run() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    if let Some(result) = finished {
        result?;
    }

    let stats = simulator.stats();
    info!(
        "Shutting down after {} requests ({} answered, {} dropped)",
        stats.received, stats.replied, stats.dropped
    );

    Ok(())
}
