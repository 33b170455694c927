//! Emulates a serial-line weighing scale.
//!
//! A [`Simulator`](simulator::Simulator) reads command frames from a
//! [`Transport`], answers them from a [`ReadingSource`](store::ReadingSource)
//! and writes the reply back. Frame encoding lives in [`protocol`].

pub use scale_proto as protocol;

use std::future::Future;
use std::time::Duration;

use scale_proto::Encode;

pub mod config;
pub mod dispatch;
pub mod simulator;
pub mod store;
pub mod stream;

#[cfg(feature = "serial")]
pub mod serial;

/// A byte link to the controller.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Error: std::error::Error;

    /// Waits up to `timeout` for one request frame, terminator included.
    ///
    /// Returns `Ok(None)` if nothing complete arrived in time.
    fn recv_request(
        &mut self,
        timeout: Duration,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>>;

    /// Sends a packet.
    fn send(&mut self, packet: impl Encode) -> impl Future<Output = Result<(), Self::Error>>;
}
