use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    type_name: &'static str,
}

impl DecodeError {
    pub fn new<T>(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            type_name: core::any::type_name::<T>(),
        }
    }

    pub const fn kind(&self) -> DecodeErrorKind {
        self.kind
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Failed to decode {}: {}", self.type_name, self.kind)
    }
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
    #[error("Frame was too short.")]
    UnexpectedEnd,

    #[error(
        "Could not decode {name} with unexpected byte. Found {value:x}, expected one of: {expected:x?}."
    )]
    UnexpectedByte {
        name: &'static str,
        value: u8,
        expected: &'static [u8],
    },

    #[error("XOR checksum mismatch. Found {value:x}, expected {expected:x}.")]
    Checksum { value: u8, expected: u8 },

    #[error("Frame did not begin with the start marker.")]
    InvalidHeader,

    #[error("Frame did not end with the end marker.")]
    MissingTerminator,
}

/// A type that can be reconstructed (decoded) from a raw sequence of bytes.
///
/// The input slice is advanced by the number of bytes consumed.
pub trait Decode {
    /// Attempts to decode `Self` from the beginning of the provided byte slice.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the input is malformed or insufficient
    /// to decode a complete value of this type.
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError>
    where
        Self: Sized;
}

impl Decode for u8 {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let (&byte, rest) = data
            .split_first()
            .ok_or_else(|| DecodeError::new::<Self>(DecodeErrorKind::UnexpectedEnd))?;
        *data = rest;
        Ok(byte)
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let bytes = data
            .get(..N)
            .ok_or_else(|| DecodeError::new::<Self>(DecodeErrorKind::UnexpectedEnd))?;
        let mut arr = [0; N];
        arr.copy_from_slice(bytes);
        *data = &data[N..];
        Ok(arr)
    }
}

/// Reads one byte and checks it against the bytes allowed at this position.
pub(crate) fn expect_byte<T>(
    data: &mut &[u8],
    name: &'static str,
    expected: &'static [u8],
) -> Result<u8, DecodeError> {
    let value = u8::decode(data).map_err(|_| DecodeError::new::<T>(DecodeErrorKind::UnexpectedEnd))?;
    if expected.contains(&value) {
        Ok(value)
    } else {
        Err(DecodeError::new::<T>(DecodeErrorKind::UnexpectedByte {
            name,
            value,
            expected,
        }))
    }
}
