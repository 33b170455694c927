//! Opens the simulator's end of a physical or virtual serial line.

use log::{debug, info};
use serialport::{SerialPortInfo, SerialPortType};
use thiserror::Error;
use tokio_serial::SerialStream;

use crate::{config::PortSettings, stream::StreamTransport};

/// A [`Transport`](crate::Transport) over a serial port.
pub type SerialTransport = StreamTransport<SerialStream>;

/// Opens `settings.name` as 8N1 at `settings.baud_rate`.
pub fn open(settings: &PortSettings) -> Result<SerialTransport, SerialError> {
    let stream = match tokio_serial::SerialStream::open(
        &tokio_serial::new(&settings.name, settings.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .timeout(settings.timeout)
            .stop_bits(tokio_serial::StopBits::One),
    ) {
        Ok(v) => Ok(v),
        Err(e) => Err(SerialError::SerialportError(e)),
    }?;

    info!(
        "Listening on {} at {} baud",
        settings.name, settings.baud_rate
    );

    Ok(StreamTransport::new(stream))
}

/// Lists every serial port the OS reports.
pub fn find_ports() -> Result<Vec<SerialPortInfo>, SerialError> {
    let ports = tokio_serial::available_ports()?;
    debug!("Found {} serial ports", ports.len());
    Ok(ports)
}

/// One-line description of a port for listings.
pub fn describe_port(port: &SerialPortInfo) -> String {
    match &port.port_type {
        SerialPortType::UsbPort(info) => format!(
            "{} (USB {:04x}:{:04x}{})",
            port.port_name,
            info.vid,
            info.pid,
            info.product
                .as_deref()
                .map(|product| format!(" {product}"))
                .unwrap_or_default()
        ),
        SerialPortType::PciPort => format!("{} (PCI)", port.port_name),
        SerialPortType::BluetoothPort => format!("{} (Bluetooth)", port.port_name),
        SerialPortType::Unknown => port.port_name.clone(),
    }
}

#[derive(Error, Debug)]
pub enum SerialError {
    #[error("Serialport Error: {0}")]
    SerialportError(#[from] tokio_serial::Error),
}
