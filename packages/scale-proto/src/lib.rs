//! Implementation of the STX/ETX ASCII weighing scale protocol in Rust.
//!
//! A controller sends a short command frame naming a device address and a
//! single-letter command. The scale answers with a frame of the form:
//!
//! ```text
//! ┌─────┬─────────┬─────────┬──────────────────────────────┬────────┬─────┐
//! │ STX │ ADDRESS │ COMMAND │ SIGN  DIGITS×6  DECIMAL_POS  │ CHK×2  │ ETX │
//! │ 1B  │ 1B      │ 1B      │ 8B (weight commands only)    │ 2B     │ 1B  │
//! └─────┴─────────┴─────────┴──────────────────────────────┴────────┴─────┘
//! ```
//!
//! Everything here is pure: the crate performs no I/O and keeps no state.
//! Types are encoded through [`Encode`] and parsed through [`Decode`].

#![no_std]

extern crate alloc;

pub mod checksum;
pub mod command;
pub mod frame;

mod decode;
mod encode;
mod weight;

pub use command::{Command, ReadingKind};
pub use decode::{Decode, DecodeError, DecodeErrorKind};
pub use encode::{Encode, EncodeError};
pub use frame::{build_response, Reply, Request, ResponseFrame};
pub use weight::{ParseWeightError, Weight, WeightRangeError};

/// Byte opening every frame (ASCII STX).
pub const START: u8 = 0x02;

/// Byte closing every frame (ASCII ETX).
pub const END: u8 = 0x03;

/// Number of fractional digits carried by every weight on the wire.
///
/// Sent as the ASCII digit [`DECIMAL_POSITION`] after the magnitude field.
pub const FRACTIONAL_DIGITS: u8 = 2;

/// Decimal-point position indicator as it appears on the wire.
pub const DECIMAL_POSITION: u8 = b'0' + FRACTIONAL_DIGITS;
