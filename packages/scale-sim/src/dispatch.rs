//! Turns an inbound request frame into the response the scale sends back.

use log::debug;
use scale_proto::{Decode, DecodeError, DecodeErrorKind, Reply, Request, ResponseFrame};
use thiserror::Error;

use crate::store::ReadingSource;

/// Why a request got no response.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unrecognized command byte {0:#04x}")]
    UnknownCommand(u8),

    #[error("Malformed request: {0}")]
    Malformed(DecodeError),
}

impl From<DecodeError> for DispatchError {
    fn from(err: DecodeError) -> Self {
        match err.kind() {
            DecodeErrorKind::UnexpectedByte {
                name: "command",
                value,
                ..
            } => Self::UnknownCommand(value),
            _ => Self::Malformed(err),
        }
    }
}

/// Builds the response to `request`.
///
/// The reply echoes the request's address. Requests that carry none (the
/// inquiry alias) are answered as `address`.
pub fn respond(
    mut request: &[u8],
    address: u8,
    store: &impl ReadingSource,
) -> Result<ResponseFrame, DispatchError> {
    let Request {
        address: requested,
        command,
    } = Request::decode(&mut request)?;

    let reply = match command.reading_kind() {
        None => Reply::Handshake,
        Some(kind) => Reply::Reading {
            kind,
            value: store.reading(kind),
        },
    };
    debug!("{:?} -> {:?}", command, reply);

    Ok(ResponseFrame::new(requested.unwrap_or(address), reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Readings;
    use scale_proto::{Command, Encode, ReadingKind, Weight};

    const ADDR: u8 = b'5';

    #[test]
    fn table() {
        let readings = Readings::default();
        let cases: [(&[u8], Command, Option<Weight>); 4] = [
            (b"\x021A\x03", Command::Handshake, None),
            (b"\x021B\x03", Command::ReadGross, Some(readings.gross)),
            (b"\x021C\x03", Command::ReadTare, Some(readings.tare)),
            (b"\x021D\x03", Command::ReadNet, Some(readings.net)),
        ];

        for (request, command, value) in cases {
            let frame = respond(request, ADDR, &readings).unwrap();
            assert_eq!(frame.address, b'1');
            assert_eq!(frame.command(), command);
            assert_eq!(frame.value(), value);
        }
    }

    #[test]
    fn inquiry_reads_net_at_own_address() {
        let readings = Readings::default();
        let frame = respond(b"SI\r\n\x03", ADDR, &readings).unwrap();

        assert_eq!(
            frame,
            ResponseFrame::reading(ADDR, ReadingKind::Net, readings.net)
        );
        assert_eq!(frame.encode_to_vec(), b"\x025D+00701526B\x03");
    }

    #[test]
    fn unknown_command_gets_no_response() {
        let readings = Readings::default();
        assert_eq!(
            respond(b"\x021X\x03", ADDR, &readings),
            Err(DispatchError::UnknownCommand(b'X'))
        );
    }

    #[test]
    fn short_request_is_malformed() {
        let readings = Readings::default();
        assert!(matches!(
            respond(b"\x03", ADDR, &readings),
            Err(DispatchError::Malformed(_))
        ));
    }
}
