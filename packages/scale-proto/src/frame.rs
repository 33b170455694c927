//! Request and response frames.

use alloc::vec::Vec;

use crate::{
    checksum::{checksum_chars, checksum_from_chars, xor_checksum},
    command::{cmds, Command, ReadingKind},
    decode::{expect_byte, Decode, DecodeError, DecodeErrorKind},
    encode::{Encode, EncodeError},
    weight::Weight,
    END, START,
};

/// Body of a [`ResponseFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Acknowledges a handshake. Carries no payload.
    Handshake,
    /// Reports one of the scale's readings.
    Reading { kind: ReadingKind, value: Weight },
}

impl Reply {
    pub const fn command(&self) -> Command {
        match self {
            Self::Handshake => Command::Handshake,
            Self::Reading { kind, .. } => kind.command(),
        }
    }
}

/// Scale-to-controller response frame.
///
/// # Encoding
///
/// | Field         | Size | Description |
/// |---------------|------|-------------|
/// | `start`       | 1    | Must be [`START`]. |
/// | `address`     | 1    | Device address, echoed from the request. |
/// | `command`     | 1    | A [command code](crate::command::cmds). |
/// | `sign`        | 1    | `+` or `-`. Weight replies only. |
/// | `digits`      | 6    | `|value| × 100`, zero padded. Weight replies only. |
/// | `decimal_pos` | 1    | Always [`DECIMAL_POSITION`](crate::DECIMAL_POSITION). Weight replies only. |
/// | `checksum`    | 2    | XOR of `address` through `decimal_pos`, see [`checksum_chars`]. |
/// | `end`         | 1    | Must be [`END`]. |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame {
    pub address: u8,
    pub reply: Reply,
}

impl ResponseFrame {
    pub const fn new(address: u8, reply: Reply) -> Self {
        Self { address, reply }
    }

    pub const fn handshake(address: u8) -> Self {
        Self::new(address, Reply::Handshake)
    }

    pub const fn reading(address: u8, kind: ReadingKind, value: Weight) -> Self {
        Self::new(address, Reply::Reading { kind, value })
    }

    pub const fn command(&self) -> Command {
        self.reply.command()
    }

    /// The weight carried by this frame, if any.
    pub const fn value(&self) -> Option<Weight> {
        match self.reply {
            Reply::Handshake => None,
            Reply::Reading { value, .. } => Some(value),
        }
    }
}

impl Encode for ResponseFrame {
    fn size(&self) -> usize {
        // START, address, command, two checksum characters, END
        6 + match self.reply {
            Reply::Handshake => 0,
            Reply::Reading { value, .. } => value.size(),
        }
    }

    fn encode(&self, data: &mut [u8]) {
        data[0] = START;
        data[1] = self.address;
        data[2] = self.command().code();

        let mut end = 3;
        if let Reply::Reading { value, .. } = self.reply {
            value.encode(&mut data[end..]);
            end += value.size();
        }

        let checksum = xor_checksum(&data[1..end]);
        checksum_chars(checksum).encode(&mut data[end..]);
        data[end + 2] = END;
    }
}

impl Decode for ResponseFrame {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        if u8::decode(data)? != START {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::InvalidHeader));
        }

        let body = *data;
        let address = u8::decode(data)?;
        let code = expect_byte::<Self>(data, "command", cmds::ALL)?;
        let reply = match Command::from_code(code).and_then(Command::reading_kind) {
            None => Reply::Handshake,
            Some(kind) => Reply::Reading {
                kind,
                value: Weight::decode(data)?,
            },
        };
        let expected = xor_checksum(&body[..body.len() - data.len()]);

        let chars = <[u8; 2]>::decode(data)?;
        let value = checksum_from_chars(chars).ok_or_else(|| {
            DecodeError::new::<Self>(DecodeErrorKind::UnexpectedByte {
                name: "checksum",
                value: chars[0],
                expected: b"0123456789ABCDEF",
            })
        })?;
        if value != expected {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::Checksum {
                value,
                expected,
            }));
        }

        if u8::decode(data)? != END {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::MissingTerminator));
        }

        Ok(Self { address, reply })
    }
}

/// Assembles a response frame from loosely typed parts.
///
/// `value` is ignored for [`Command::Handshake`].
///
/// # Errors
///
/// Returns [`EncodeError::MissingReading`] if a weight command is given no value.
pub fn build_response(
    address: u8,
    command: Command,
    value: Option<Weight>,
) -> Result<Vec<u8>, EncodeError> {
    let reply = match (command.reading_kind(), value) {
        (None, _) => Reply::Handshake,
        (Some(kind), Some(value)) => Reply::Reading { kind, value },
        (Some(_), None) => return Err(EncodeError::MissingReading(command)),
    };

    Ok(ResponseFrame::new(address, reply).encode_to_vec())
}

/// Controller-to-scale request.
///
/// Two shapes are accepted: a framed request, where byte 1 is the device
/// address and byte 2 the [command code](crate::command::cmds), and the bare
/// [`INQUIRY`](cmds::INQUIRY) alias, which asks for the net weight and
/// carries no address.
///
/// Decoding consumes the whole input, trailing [`END`] included. The start
/// byte is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub address: Option<u8>,
    pub command: Command,
}

impl Decode for Request {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let frame = core::mem::take(data);

        if let Some(command) = frame.get(2).copied().and_then(Command::from_code) {
            return Ok(Self {
                address: Some(frame[1]),
                command,
            });
        }

        if frame.starts_with(&cmds::INQUIRY) {
            return Ok(Self {
                address: None,
                command: Command::ReadNet,
            });
        }

        match frame.get(2) {
            Some(&value) => Err(DecodeError::new::<Self>(DecodeErrorKind::UnexpectedByte {
                name: "command",
                value,
                expected: cmds::ALL,
            })),
            None => Err(DecodeError::new::<Self>(DecodeErrorKind::UnexpectedEnd)),
        }
    }
}
