//! End-to-end relay tests over a real TCP socket
//!
//! Boots the full stack (listener wiring, relay actor, connection handlers)
//! on an ephemeral port and drives it with plain socket clients, the same
//! way a real chat client would.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::{TcpListener, TcpStream};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use chat_relay::{handle_connection, ChatRelay};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Start a relay server on an ephemeral port, mirroring the binary's wiring
async fn start_relay() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (cmd_tx, cmd_rx) = mpsc::channel(256);
    tokio::spawn(ChatRelay::new(cmd_rx).run());

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let cmd_tx = cmd_tx.clone();
            tokio::spawn(handle_connection(stream, cmd_tx));
        }
    });

    addr
}

struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    /// Connect and complete the name handshake
    async fn connect(addr: SocketAddr, name: &str) -> Self {
        let mut client = Self::connect_raw(addr).await;
        client.send(name).await;
        client
    }

    /// Connect without sending anything
    async fn connect_raw(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .unwrap();
    }

    async fn recv(&mut self) -> String {
        timeout(RECV_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .expect("read error")
            .expect("connection closed")
    }

    /// Expect the server to close the connection
    async fn recv_eof(&mut self) {
        let line = timeout(RECV_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for EOF")
            .expect("read error");
        assert_eq!(line, None);
    }
}

/// Assert a line is "<YYYY-MM-DD HH:MM:SS> <body>"
fn assert_timestamped(line: &str, body: &str) {
    assert!(
        line.ends_with(body),
        "expected line ending with {:?}, got {:?}",
        body,
        line
    );
    let ts = &line[..line.len() - body.len()];
    assert_eq!(ts.len(), 20, "timestamp prefix malformed in {:?}", line);
    assert_eq!(ts.chars().filter(|c| c.is_ascii_digit()).count(), 14);
}

#[tokio::test]
async fn test_full_chat_scenario() {
    let addr = start_relay().await;

    // Alice connects and registers.
    let mut alice = TestClient::connect(addr, "Alice").await;
    assert_eq!(alice.recv().await, "用户名 Alice 设置成功，您可以开始聊天了");
    assert_timestamped(&alice.recv().await, "Alice 加入了聊天室！");
    assert_eq!(alice.recv().await, "USERS:Alice");

    // Bob connects: both sides see the join notice and the new roster.
    let mut bob = TestClient::connect(addr, "Bob").await;
    assert_eq!(bob.recv().await, "用户名 Bob 设置成功，您可以开始聊天了");
    assert_timestamped(&bob.recv().await, "Bob 加入了聊天室！");
    assert_eq!(bob.recv().await, "USERS:Alice,Bob");

    assert_timestamped(&alice.recv().await, "Bob 加入了聊天室！");
    assert_eq!(alice.recv().await, "USERS:Alice,Bob");

    // A chat message reaches everyone, sender included.
    alice.send("hi").await;
    assert_timestamped(&alice.recv().await, "Alice: hi");
    assert_timestamped(&bob.recv().await, "Alice: hi");

    // Bob disconnects: Alice sees the departure and the shrunken roster.
    drop(bob);
    assert_timestamped(&alice.recv().await, "Bob 离开了聊天室。");
    assert_eq!(alice.recv().await, "USERS:Alice");
}

#[tokio::test]
async fn test_empty_name_is_rejected() {
    let addr = start_relay().await;

    let mut alice = TestClient::connect(addr, "Alice").await;
    alice.recv().await;
    alice.recv().await;
    alice.recv().await;

    // An empty first line gets one explanatory line, then the connection
    // is closed with nothing else sent.
    let mut ghost = TestClient::connect_raw(addr).await;
    ghost.send("").await;
    assert_eq!(ghost.recv().await, "用户名不能为空。连接中断。");
    ghost.recv_eof().await;

    // Nothing was broadcast for the rejected connection: the very next
    // line Alice sees is her own chat echo.
    alice.send("ping").await;
    assert_timestamped(&alice.recv().await, "Alice: ping");
}

#[tokio::test]
async fn test_close_without_name_changes_nothing() {
    let addr = start_relay().await;

    let mut alice = TestClient::connect(addr, "Alice").await;
    alice.recv().await;
    alice.recv().await;
    alice.recv().await;

    // Connect and hang up before sending a name.
    let ghost = TestClient::connect_raw(addr).await;
    drop(ghost);

    alice.send("ping").await;
    assert_timestamped(&alice.recv().await, "Alice: ping");
}

#[tokio::test]
async fn test_crlf_client() {
    let addr = start_relay().await;

    let mut carol = TestClient::connect_raw(addr).await;
    carol.send("Carol\r").await;
    assert_eq!(carol.recv().await, "用户名 Carol 设置成功，您可以开始聊天了");
    assert_timestamped(&carol.recv().await, "Carol 加入了聊天室！");
    assert_eq!(carol.recv().await, "USERS:Carol");

    carol.send("hello\r").await;
    assert_timestamped(&carol.recv().await, "Carol: hello");
}

#[tokio::test]
async fn test_empty_chat_lines_are_ignored() {
    let addr = start_relay().await;

    let mut alice = TestClient::connect(addr, "Alice").await;
    alice.recv().await;
    alice.recv().await;
    alice.recv().await;

    alice.send("").await;
    alice.send("after the blank").await;
    assert_timestamped(&alice.recv().await, "Alice: after the blank");
}

#[tokio::test]
async fn test_roster_across_many_clients() {
    let addr = start_relay().await;

    let mut first = TestClient::connect(addr, "User0").await;
    first.recv().await;
    first.recv().await;
    assert_eq!(first.recv().await, "USERS:User0");

    let mut others = Vec::new();
    for i in 1..5 {
        let name = format!("User{}", i);
        let mut client = TestClient::connect(addr, &name).await;
        client.recv().await;
        client.recv().await;
        client.recv().await;
        others.push(client);
        // The first client sees each join notice and roster update.
        first.recv().await;
        let roster = first.recv().await;
        assert!(roster.starts_with("USERS:"));
        assert_eq!(roster.split(',').count(), i + 1);
    }

    assert_eq!(
        first.recv_roster_after_drop(others.pop().unwrap()).await,
        "USERS:User0,User1,User2,User3"
    );
}

impl TestClient {
    /// Drop `leaver` and read past the departure notice to the next roster
    async fn recv_roster_after_drop(&mut self, leaver: TestClient) -> String {
        drop(leaver);
        let departure = self.recv().await;
        assert!(departure.ends_with("离开了聊天室。"), "got {:?}", departure);
        self.recv().await
    }
}
