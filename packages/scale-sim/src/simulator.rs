//! The request/response loop.

use std::time::Duration;

use log::{debug, info, warn};
use scale_proto::ResponseFrame;

use crate::{
    dispatch::{respond, DispatchError},
    store::ReadingSource,
    Transport,
};

/// How long a single receive waits before polling again.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// Address answered with when a request does not name one.
pub const DEFAULT_ADDRESS: u8 = b'1';

/// Exchange counters since the simulator was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub received: u64,
    pub replied: u64,
    pub dropped: u64,
}

/// A simulated scale bound to one transport.
#[derive(Debug)]
pub struct Simulator<T, S> {
    transport: T,
    store: S,
    address: u8,
    poll_timeout: Duration,
    stats: Stats,
}

impl<T: Transport, S: ReadingSource> Simulator<T, S> {
    pub fn new(transport: T, store: S) -> Self {
        Self {
            transport,
            store,
            address: DEFAULT_ADDRESS,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            stats: Stats::default(),
        }
    }

    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Handles at most one exchange.
    ///
    /// Returns the frame that was sent, or `None` if the receive timed out or
    /// the request was dropped.
    ///
    /// # Errors
    ///
    /// Only transport failures are errors. Requests that cannot be answered
    /// are logged and counted in [`Stats::dropped`].
    pub async fn serve_one(&mut self) -> Result<Option<ResponseFrame>, T::Error> {
        let Some(request) = self.transport.recv_request(self.poll_timeout).await? else {
            return Ok(None);
        };
        self.stats.received += 1;
        debug!("Received command: {:x?}", request);

        let response = match respond(&request, self.address, &self.store) {
            Ok(response) => response,
            Err(DispatchError::UnknownCommand(code)) => {
                warn!("Unknown command {:#04x}, not responding", code);
                self.stats.dropped += 1;
                return Ok(None);
            }
            Err(e) => {
                warn!("Dropping request {:x?}: {}", request, e);
                self.stats.dropped += 1;
                return Ok(None);
            }
        };

        self.transport.send(response).await?;
        self.stats.replied += 1;
        debug!("Sent response: {:?}", response);

        Ok(Some(response))
    }

    /// Serves requests until the transport fails.
    ///
    /// The loop holds no state between exchanges, so it can be cancelled by
    /// dropping the returned future.
    pub async fn run(&mut self) -> Result<(), T::Error> {
        info!(
            "Scale simulator answering as address {:?}",
            self.address as char
        );
        loop {
            self.serve_one().await?;
        }
    }
}
