use alloc::vec;
use alloc::vec::Vec;
use thiserror::Error;

use crate::command::Command;

/// A type that can be encoded into a sequence of bytes.
pub trait Encode {
    /// Returns the number of bytes this value will take when encoded.
    fn size(&self) -> usize;

    /// Encodes this instance into the provided byte slice.
    ///
    /// `data` must be at least [`Encode::size`] bytes long.
    fn encode(&self, data: &mut [u8]);

    /// Encodes this instance into a newly allocated buffer.
    fn encode_to_vec(&self) -> Vec<u8> {
        let mut encoded = vec![0; self.size()];
        self.encode(&mut encoded);
        encoded
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn size(&self) -> usize {
        N
    }

    fn encode(&self, data: &mut [u8]) {
        data[..N].copy_from_slice(self);
    }
}

/// Returned when a response cannot be assembled from loosely typed parts.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{0:?} replies must carry a weight reading.")]
    MissingReading(Command),
}
