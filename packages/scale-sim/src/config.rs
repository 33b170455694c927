//! Simulator configuration.
//!
//! Settings come from built-in defaults, then an optional INI file, then the
//! command line. The file looks like:
//!
//! ```ini
//! [port]
//! name=/dev/ttyUSB0
//! baud_rate=9600
//! timeout_ms=1000
//!
//! [scale]
//! address=1
//!
//! [readings]
//! gross=72.30
//! tare=2.15
//! net=70.15
//! ```
//!
//! Every section and key is optional.

use std::{path::Path, time::Duration};

use scale_proto::{ParseWeightError, Weight};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    simulator::{DEFAULT_ADDRESS, DEFAULT_POLL_TIMEOUT},
    store::Readings,
};

pub const DEFAULT_PORT: &str = "COM1";
pub const DEFAULT_BAUD_RATE: u32 = 9600;

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct PortSection {
    pub name: Option<String>,
    pub baud_rate: Option<u32>,
    pub timeout_ms: Option<u64>,
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct ScaleSection {
    pub address: Option<String>,
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct ReadingsSection {
    pub gross: Option<String>,
    pub tare: Option<String>,
    pub net: Option<String>,
}

/// The INI file as written, before validation.
#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub port: PortSection,
    #[serde(default)]
    pub scale: ScaleSection,
    #[serde(default)]
    pub readings: ReadingsSection,
}

/// Serial line settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSettings {
    pub name: String,
    pub baud_rate: u32,
    /// How long one read waits for a complete request.
    pub timeout: Duration,
}

impl Default for PortSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

/// Validated simulator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: PortSettings,
    pub address: u8,
    pub readings: Readings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: PortSettings::default(),
            address: DEFAULT_ADDRESS,
            readings: Readings::default(),
        }
    }
}

impl Config {
    /// Reads an INI file and layers it over the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ini(&text)
    }

    /// Parses INI text and layers it over the defaults.
    pub fn from_ini(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_ini::from_str(text)?;
        let mut config = Self::default();
        config.apply(file)?;
        Ok(config)
    }

    /// Overrides every setting present in `file`.
    pub fn apply(&mut self, file: ConfigFile) -> Result<(), ConfigError> {
        let ConfigFile {
            port,
            scale,
            readings,
        } = file;

        if let Some(name) = port.name {
            self.port.name = name;
        }
        if let Some(baud_rate) = port.baud_rate {
            self.port.baud_rate = baud_rate;
        }
        if let Some(timeout_ms) = port.timeout_ms {
            self.port.timeout = Duration::from_millis(timeout_ms);
        }

        if let Some(address) = scale.address {
            self.address = parse_address(&address)?;
        }

        for (field, value) in [
            (&mut self.readings.gross, readings.gross),
            (&mut self.readings.tare, readings.tare),
            (&mut self.readings.net, readings.net),
        ] {
            if let Some(value) = value {
                *field = value.parse::<Weight>()?;
            }
        }

        Ok(())
    }
}

/// Parses a device address: exactly one printable ASCII character.
pub fn parse_address(s: &str) -> Result<u8, InvalidAddress> {
    match s.as_bytes() {
        [c] if c.is_ascii_graphic() => Ok(*c),
        _ => Err(InvalidAddress(s.to_string())),
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Device address must be one printable ASCII character, got {0:?}")]
pub struct InvalidAddress(pub String);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("INI Error: {0}")]
    IniError(#[from] serde_ini::de::Error),

    #[error(transparent)]
    Address(#[from] InvalidAddress),

    #[error("Invalid reading: {0}")]
    Weight(#[from] ParseWeightError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(Config::from_ini("").unwrap(), Config::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let config = Config::from_ini(
            "[port]\nname=/dev/ttyUSB0\nbaud_rate=19200\n\n[scale]\naddress=7\n\n[readings]\nnet=-1.5\n",
        )
        .unwrap();

        assert_eq!(config.port.name, "/dev/ttyUSB0");
        assert_eq!(config.port.baud_rate, 19200);
        assert_eq!(config.port.timeout, DEFAULT_POLL_TIMEOUT);
        assert_eq!(config.address, b'7');
        assert_eq!(config.readings.net, Weight::new(-150));
        assert_eq!(config.readings.gross, Readings::default().gross);
    }

    #[test]
    fn timeout_in_milliseconds() {
        let config = Config::from_ini("[port]\ntimeout_ms=250\n").unwrap();
        assert_eq!(config.port.timeout, Duration::from_millis(250));
    }

    #[test]
    fn bad_values_are_reported() {
        assert!(matches!(
            Config::from_ini("[scale]\naddress=12\n"),
            Err(ConfigError::Address(_))
        ));
        assert!(matches!(
            Config::from_ini("[readings]\ntare=heavy\n"),
            Err(ConfigError::Weight(ParseWeightError::InvalidDigit('h')))
        ));
        assert!(matches!(
            Config::from_ini("[readings]\ngross=12345.00\n"),
            Err(ConfigError::Weight(ParseWeightError::OutOfRange(_)))
        ));
    }

    #[test]
    fn addresses() {
        assert_eq!(parse_address("1"), Ok(b'1'));
        assert_eq!(parse_address("A"), Ok(b'A'));
        assert!(parse_address("").is_err());
        assert!(parse_address(" ").is_err());
        assert!(parse_address("é").is_err());
    }
}
