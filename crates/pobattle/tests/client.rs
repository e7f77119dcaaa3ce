//! Integration tests for the client run loop against an in-process fake
//! server.
//!
//! The fake server is a plain `TcpListener` that writes hand-built frames,
//! so these tests cover the transport, dispatcher and state together.

use std::time::Duration;

use pobattle::prelude::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().unwrap().to_string();
    (listener, addr)
}

fn string(text: &str) -> Vec<u8> {
    let mut out = (text.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(text.as_bytes());
    out
}

fn frame(body: &[u8]) -> Vec<u8> {
    let mut out = (body.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(body);
    out
}

async fn read_frame(stream: &mut TcpStream) -> Vec<u8> {
    let mut len = [0u8; 4];
    stream.read_exact(&mut len).await.unwrap();
    let mut body = vec![0u8; u32::from_be_bytes(len) as usize];
    stream.read_exact(&mut body).await.unwrap();
    body
}

#[derive(Default)]
struct Log {
    announcements: Vec<String>,
    keep_alives: usize,
    joins: Vec<(ChannelId, PlayerId)>,
    errors: usize,
}

impl BattleObserver for Log {}

impl NetworkObserver for Log {
    fn on_announcement(&mut self, text: &str) {
        self.announcements.push(text.to_string());
    }

    fn on_keep_alive(&mut self) {
        self.keep_alives += 1;
    }

    fn on_join_channel(&mut self, channel: ChannelId, player: PlayerId) {
        self.joins.push((channel, player));
    }

    fn on_protocol_error(&mut self, _id: u8, _payload: &[u8]) {
        self.errors += 1;
    }
}

#[tokio::test]
async fn test_login_then_receive_until_close() {
    let (listener, addr) = listener().await;
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let login = read_frame(&mut stream).await;

        let mut announcement = vec![38];
        announcement.extend(string("Welcome to the test server"));
        let mut channels = vec![44, 0, 0, 0, 1, 0, 0, 0, 0];
        channels.extend(string("Lobby"));
        let join = [46, 0, 0, 0, 0, 0, 0, 0, 7];

        for body in [
            &[12][..],
            announcement.as_slice(),
            &[0xFE, 1][..],
            channels.as_slice(),
            &join[..],
        ] {
            stream.write_all(&frame(body)).await.unwrap();
        }
        login
    });

    let mut client = Client::builder()
        .addr(&addr)
        .idle_timeout(Duration::from_secs(5))
        .connect()
        .await
        .expect("should connect");
    client.login("Red").await.unwrap();

    let mut log = Log::default();
    client.run(&mut log).await.expect("clean close");

    let login = server.await.unwrap();
    assert_eq!(login[0], EventKind::Login.id());
    assert!(login.ends_with(b"\x00\x00\x00\x07default"));

    assert_eq!(log.keep_alives, 1);
    assert_eq!(log.announcements, vec!["Welcome to the test server"]);
    assert_eq!(log.errors, 1);
    assert_eq!(log.joins, vec![(ChannelId(0), PlayerId(7))]);

    let lobby = client.state().channel_by_name("Lobby").unwrap();
    assert!(lobby.players.contains(&PlayerId(7)));
}

#[tokio::test]
async fn test_silent_server_hits_idle_timeout() {
    let (listener, addr) = listener().await;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        drop(stream);
    });

    let mut client = Client::builder()
        .addr(&addr)
        .idle_timeout(Duration::from_secs(1))
        .connect()
        .await
        .unwrap();
    let err = client.run(&mut NullObserver).await.unwrap_err();
    assert!(matches!(err, ClientError::IdleTimeout(d) if d == Duration::from_secs(1)));
    server.abort();
}

#[tokio::test]
async fn test_sub_second_idle_timeout_survives_keep_alives() {
    let (listener, addr) = listener().await;
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        for _ in 0..6 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            stream.write_all(&frame(&[12])).await.unwrap();
        }
    });

    let mut client = Client::builder()
        .addr(&addr)
        .idle_timeout(Duration::from_millis(500))
        .connect()
        .await
        .unwrap();
    assert_eq!(client.config().idle_timeout(), Duration::from_millis(500));

    let mut log = Log::default();
    client.run(&mut log).await.expect("keep-alives arrive in time");
    assert_eq!(log.keep_alives, 6);
    server.await.unwrap();
}

#[tokio::test]
async fn test_connect_failure_is_transport_error() {
    // Bind then drop so the port is very likely closed.
    let (listener, addr) = listener().await;
    drop(listener);

    let result = Client::builder().addr(&addr).connect().await;
    assert!(matches!(result, Err(ClientError::Transport(_))));
}
