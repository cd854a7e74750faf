//! End-to-end tests over loopback TCP
// (c) 2024 Ross Younger

use std::net::SocketAddr;
use std::time::Duration;

use filed::Server;
use filed::protocol::FILE_CHUNK_SIZE;
use filed::util::ServerRoot;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tokio::net::TcpStream;
use tokio::time::timeout;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Sets up a root directory with a few files in it, and a server for it, running in the background
async fn start_server() -> (TempDir, SocketAddr) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("big.bin"), big_file_contents()).unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub").join("inner.txt"), "inside").unwrap();

    let server = Server::bind(
        "127.0.0.1:0".parse().unwrap(),
        ServerRoot::new(dir.path()),
        0,
    )
    .unwrap();
    let addr = server.local_addr().unwrap();
    let _server = tokio::spawn(server.run());
    (dir, addr)
}

fn big_file_contents() -> Vec<u8> {
    (0..FILE_CHUNK_SIZE * 3 + 17)
        .map(|i| u8::try_from(i % 253).unwrap())
        .collect()
}

async fn request(client: &mut TcpStream, filename: &str, reply_len: usize) -> Vec<u8> {
    client.write_all(filename.as_bytes()).await.unwrap();
    let mut reply = vec![0u8; reply_len];
    let _ = timeout(TIMEOUT, client.read_exact(&mut reply))
        .await
        .unwrap()
        .unwrap();
    reply
}

fn not_found(filename: &str) -> Vec<u8> {
    format!("Error: File not found - {filename}").into_bytes()
}

#[tokio::test]
async fn existing_file() {
    let (_dir, addr) = start_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    assert_eq!(request(&mut client, "readme.txt", 5).await, b"hello");
}

#[tokio::test]
async fn missing_file() {
    let (_dir, addr) = start_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    let expected = not_found("missing.bin");
    assert_eq!(
        request(&mut client, "missing.bin", expected.len()).await,
        expected
    );
}

#[tokio::test]
async fn multi_chunk_file() {
    let (_dir, addr) = start_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    let expected = big_file_contents();
    assert_eq!(
        request(&mut client, "big.bin", expected.len()).await,
        expected
    );
}

#[tokio::test]
async fn subdirectory() {
    let (_dir, addr) = start_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    assert_eq!(request(&mut client, "sub/inner.txt", 6).await, b"inside");
}

#[tokio::test]
async fn connection_is_reused() {
    let (_dir, addr) = start_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    assert_eq!(request(&mut client, "readme.txt", 5).await, b"hello");
    let expected = not_found("nope");
    assert_eq!(request(&mut client, "nope", expected.len()).await, expected);
    // the same request twice gets the same answer
    assert_eq!(request(&mut client, "readme.txt", 5).await, b"hello");
    assert_eq!(request(&mut client, "readme.txt", 5).await, b"hello");
}

#[tokio::test]
async fn escape_is_refused() {
    let (_dir, addr) = start_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    for name in [
        "../readme.txt",
        "/etc/passwd",
        "sub/../../readme.txt",
        "..\\readme.txt",
    ] {
        let expected = not_found(name);
        assert_eq!(request(&mut client, name, expected.len()).await, expected);
    }
}

#[tokio::test]
async fn directory_is_not_found() {
    let (_dir, addr) = start_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    let expected = not_found("sub");
    assert_eq!(request(&mut client, "sub", expected.len()).await, expected);
}

#[tokio::test]
async fn concurrent_clients() {
    let (_dir, addr) = start_server().await;
    // The first client connects but says nothing; it must not hold up the second.
    let _idle = TcpStream::connect(addr).await.unwrap();
    let mut second = TcpStream::connect(addr).await.unwrap();
    assert_eq!(request(&mut second, "readme.txt", 5).await, b"hello");

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            tokio::spawn(async move {
                let mut c = TcpStream::connect(addr).await.unwrap();
                let expected = big_file_contents();
                assert_eq!(request(&mut c, "big.bin", expected.len()).await, expected);
            })
        })
        .collect();
    for t in tasks {
        timeout(TIMEOUT, t).await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn immediate_disconnect_does_not_disturb_the_server() {
    let (_dir, addr) = start_server().await;
    drop(TcpStream::connect(addr).await.unwrap());
    let mut client = TcpStream::connect(addr).await.unwrap();
    assert_eq!(request(&mut client, "readme.txt", 5).await, b"hello");
}

#[tokio::test]
async fn server_closes_when_client_does() {
    let (_dir, addr) = start_server().await;
    let mut client = TcpStream::connect(addr).await.unwrap();
    assert_eq!(request(&mut client, "readme.txt", 5).await, b"hello");
    client.shutdown().await.unwrap();
    let mut rest = Vec::new();
    let n = timeout(TIMEOUT, client.read_to_end(&mut rest))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(n, 0);
}
