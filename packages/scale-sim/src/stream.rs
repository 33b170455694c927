//! [`Transport`] over any async byte stream.

use std::{mem, time::Duration};

use log::{trace, warn};
use scale_proto::{Encode, END};
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    time::timeout,
};

use crate::Transport;

/// Longest request accepted, terminator included.
///
/// A request is a handful of bytes. Anything longer is line noise or a peer
/// that never terminates, and is discarded up to its next [`END`].
pub const MAX_REQUEST_LEN: usize = 64;

/// Frames requests on the [`END`] marker.
///
/// Bytes of a request that is still arriving when a receive times out are
/// kept and completed by the next call.
#[derive(Debug)]
pub struct StreamTransport<S> {
    stream: BufReader<S>,
    pending: Vec<u8>,
    discarding: bool,
}

impl<S: AsyncRead + AsyncWrite + Unpin> StreamTransport<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufReader::new(stream),
            pending: Vec::with_capacity(MAX_REQUEST_LEN),
            discarding: false,
        }
    }

    pub fn get_ref(&self) -> &S {
        self.stream.get_ref()
    }

    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }

    /// Reads until a complete request is buffered.
    ///
    /// Only consumes what it has copied into `pending`, so it can be dropped
    /// at any await point without losing bytes.
    async fn read_request(&mut self) -> Result<Vec<u8>, StreamError> {
        loop {
            let available = self.stream.fill_buf().await?;
            if available.is_empty() {
                if !self.pending.is_empty() {
                    warn!("Stream closed mid-request, dropping {:x?}", self.pending);
                    self.pending.clear();
                }
                self.discarding = false;
                return Err(StreamError::Closed);
            }

            let (chunk, complete) = match available.iter().position(|&b| b == END) {
                Some(i) => (&available[..=i], true),
                None => (available, false),
            };
            let used = chunk.len();

            if self.discarding {
                self.discarding = !complete;
            } else if self.pending.len() + used > MAX_REQUEST_LEN {
                warn!(
                    "Request longer than {} bytes without an end marker, dropping it",
                    MAX_REQUEST_LEN
                );
                self.pending.clear();
                self.discarding = !complete;
            } else {
                self.pending.extend_from_slice(chunk);
            }
            self.stream.consume(used);

            if complete && !self.pending.is_empty() {
                return Ok(mem::take(&mut self.pending));
            }
        }
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Transport for StreamTransport<S> {
    type Error = StreamError;

    async fn recv_request(&mut self, wait: Duration) -> Result<Option<Vec<u8>>, StreamError> {
        match timeout(wait, self.read_request()).await {
            Err(_) => {
                if !self.pending.is_empty() {
                    trace!("partial request after timeout: {:x?}", self.pending);
                }
                Ok(None)
            }
            Ok(Ok(request)) => {
                trace!("received request: {:x?}", request);
                Ok(Some(request))
            }
            Ok(Err(e)) => Err(e),
        }
    }

    async fn send(&mut self, packet: impl Encode) -> Result<(), StreamError> {
        let encoded = packet.encode_to_vec();

        trace!("sent response: {:x?}", encoded);

        let stream = self.stream.get_mut();
        stream.write_all(&encoded).await?;
        stream.flush().await?;

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Stream closed by peer")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use scale_proto::ResponseFrame;
    use tokio::io::{duplex, AsyncReadExt};

    const WAIT: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn frames_on_end_marker() {
        let (mut client, server) = duplex(64);
        let mut transport = StreamTransport::new(server);

        client.write_all(b"\x021A\x03\x021D\x03").await.unwrap();

        assert_eq!(
            transport.recv_request(WAIT).await.unwrap(),
            Some(b"\x021A\x03".to_vec())
        );
        assert_eq!(
            transport.recv_request(WAIT).await.unwrap(),
            Some(b"\x021D\x03".to_vec())
        );
    }

    #[tokio::test]
    async fn timeout_keeps_partial_request() {
        let (mut client, server) = duplex(64);
        let mut transport = StreamTransport::new(server);

        client.write_all(b"\x021").await.unwrap();
        assert_eq!(
            transport
                .recv_request(Duration::from_millis(20))
                .await
                .unwrap(),
            None
        );

        client.write_all(b"C\x03").await.unwrap();
        assert_eq!(
            transport.recv_request(WAIT).await.unwrap(),
            Some(b"\x021C\x03".to_vec())
        );
    }

    #[tokio::test]
    async fn unterminated_noise_is_bounded() {
        let (mut client, server) = duplex(4096);
        let mut transport = StreamTransport::new(server);

        client.write_all(&[b'x'; 3000]).await.unwrap();
        assert_eq!(
            transport
                .recv_request(Duration::from_millis(20))
                .await
                .unwrap(),
            None
        );
        assert!(transport.pending.len() <= MAX_REQUEST_LEN);

        // The rest of the oversized request is skipped, the next one is served.
        client.write_all(b"xxxx\x03\x021A\x03").await.unwrap();
        assert_eq!(
            transport.recv_request(WAIT).await.unwrap(),
            Some(b"\x021A\x03".to_vec())
        );
        assert!(transport.pending.is_empty());
    }

    #[tokio::test]
    async fn longest_request_is_accepted() {
        let (mut client, server) = duplex(256);
        let mut transport = StreamTransport::new(server);

        let mut request = vec![b'9'; MAX_REQUEST_LEN - 1];
        request.push(END);
        client.write_all(&request).await.unwrap();

        assert_eq!(transport.recv_request(WAIT).await.unwrap(), Some(request));
    }

    #[tokio::test]
    async fn closed_stream_is_an_error() {
        let (client, server) = duplex(64);
        let mut transport = StreamTransport::new(server);
        drop(client);

        assert!(matches!(
            transport.recv_request(WAIT).await,
            Err(StreamError::Closed)
        ));
    }

    #[tokio::test]
    async fn send_writes_encoded_frame() {
        let (mut client, server) = duplex(64);
        let mut transport = StreamTransport::new(server);

        transport.send(ResponseFrame::handshake(b'1')).await.unwrap();

        let mut buf = [0; 6];
        client.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"\x021A70\x03");
    }
}
