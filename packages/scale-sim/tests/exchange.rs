use std::time::Duration;

use scale_sim::{
    protocol::{checksum, Command, Decode, ReadingKind, Reply, ResponseFrame, Weight, END},
    simulator::Simulator,
    store::{Readings, SharedReadings},
    stream::{StreamError, StreamTransport},
};
use tokio::io::{duplex, AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

struct Controller {
    link: BufReader<DuplexStream>,
}

impl Controller {
    async fn ask(&mut self, request: &[u8]) -> ResponseFrame {
        self.link.get_mut().write_all(request).await.unwrap();

        let mut frame = Vec::new();
        self.link.read_until(END, &mut frame).await.unwrap();

        let n = frame.len();
        assert_eq!(
            checksum::checksum_from_chars([frame[n - 3], frame[n - 2]]),
            Some(checksum::xor_checksum(&frame[1..n - 3]))
        );

        ResponseFrame::decode(&mut frame.as_slice()).unwrap()
    }
}

fn start(store: SharedReadings) -> (Controller, tokio::task::JoinHandle<Result<(), StreamError>>) {
    let (client, server) = duplex(256);
    let mut simulator = Simulator::new(StreamTransport::new(server), store)
        .with_address(b'3')
        .with_poll_timeout(Duration::from_millis(50));

    let handle = tokio::spawn(async move { simulator.run().await });

    (
        Controller {
            link: BufReader::new(client),
        },
        handle,
    )
}

#[tokio::test]
async fn controller_session() {
    let store = SharedReadings::new(Readings::default());
    let (mut controller, handle) = start(store.clone());

    let handshake = controller.ask(b"\x024A\x03").await;
    assert_eq!(handshake, ResponseFrame::handshake(b'4'));

    let gross = controller.ask(b"\x024B\x03").await;
    assert_eq!(gross.command(), Command::ReadGross);
    assert_eq!(gross.value(), Some(Weight::new(7230)));

    // Unknown commands are dropped, so the next answer belongs to the next request.
    controller
        .link
        .get_mut()
        .write_all(b"\x024Z\x03")
        .await
        .unwrap();

    store.set(ReadingKind::Tare, Weight::new(-215));
    let tare = controller.ask(b"\x024C\x03").await;
    assert_eq!(
        tare.reply,
        Reply::Reading {
            kind: ReadingKind::Tare,
            value: Weight::new(-215)
        }
    );

    let net = controller.ask(b"SI\r\n\x03").await;
    assert_eq!(
        net,
        ResponseFrame::reading(b'3', ReadingKind::Net, Weight::new(7015))
    );

    drop(controller);
    assert!(matches!(handle.await.unwrap(), Err(StreamError::Closed)));
}
