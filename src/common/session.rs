//! # Duplex Chat Session
//!
//! Runs the actual chat over an established TCP connection. Both device
//! roles end up here once the Connection phase is done; from this point on
//! the two sides are symmetric.
//!
//! ## Structure
//!
//! The session splits the stream into its two directions:
//!
//! - **Inbound loop**: reads raw chunks from the peer and displays them.
//!   Spawned as a detached task; it is never joined, and abandoning it at
//!   process exit is intentional. It stops on its own when it observes the
//!   stream closing or failing.
//! - **Outbound loop**: reads operator lines from stdin and writes them to
//!   the peer. Runs on the calling task; when it returns (quit, Ctrl-C, or
//!   a broken connection) the session is over and the process exits,
//!   whatever state the inbound loop is in.
//!
//! There is no shared shutdown flag between the two loops. Each side
//! decides independently that the session is over, based only on what it
//! sees on the stream; first to notice wins.
//!
//! ## Wire Contract
//!
//! Raw, unframed UTF-8 bytes. Each read of up to [`RECV_CHUNK_SIZE`] bytes
//! is displayed as one unit; consecutive sends may coalesce or split on
//! receipt. That is an accepted display artifact of the byte stream, not a
//! protocol guarantee.

use anyhow::Result;
use log::{debug, info};
use std::io::ErrorKind;
use std::io::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Maximum bytes pulled from the stream per read. Each read is displayed
/// as one chat line.
pub const RECV_CHUNK_SIZE: usize = 4096;

/// The literal command that ends the chat. Matched case-insensitively and
/// never transmitted.
pub const QUIT_COMMAND: &str = "/quit";

/// Why the inbound loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvEnd {
    /// The peer closed the connection, orderly (zero-length read) or via
    /// reset. Both are shown as the same disconnect notice.
    Disconnected,
    /// Some other read error.
    Failed,
}

/// Why the outbound loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendEnd {
    /// The operator typed the quit command.
    Quit,
    /// Ctrl-C, or operator input ended (EOF on stdin).
    Interrupted,
    /// A write found the connection closed or broken.
    ConnectionLost,
}

/// Run a chat session over `stream` until the operator side is done.
///
/// The inbound loop is spawned detached and left to its own devices; the
/// outbound loop runs here and its return ends the session. Dropping the
/// write half on return is what closes the connection.
///
/// # Arguments
/// - `stream`: The established connection to the peer
/// - `peer_label`: Name shown before received messages (e.g., "A" or "B")
pub async fn run(stream: TcpStream, peer_label: &str) -> Result<()> {
    let (read_half, write_half) = stream.into_split();

    let label = peer_label.to_string();
    tokio::spawn(async move {
        let end = receive_loop(read_half, &label).await;
        debug!("Inbound loop ended: {:?}", end);
    });

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let end = send_loop(write_half, stdin).await?;
    info!("💬 Session closed ({:?})", end);
    Ok(())
}

/// Read chunks from the peer and display them until the stream ends.
///
/// A zero-length read and a connection reset both mean the peer is gone;
/// anything else is reported as a connection error. This loop never closes
/// the connection itself and never stops the outbound side.
async fn receive_loop<R>(mut reader: R, peer: &str) -> RecvEnd
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; RECV_CHUNK_SIZE];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => {
                println!("\n[{} disconnected]", peer);
                return RecvEnd::Disconnected;
            }
            Ok(n) => {
                // One read, one displayed line. No reassembly across reads.
                let text = String::from_utf8_lossy(&buf[..n]);
                println!("\n[{}]: {}", peer, text);
                prompt();
            }
            Err(e) if e.kind() == ErrorKind::ConnectionReset => {
                println!("\n[{} disconnected]", peer);
                return RecvEnd::Disconnected;
            }
            Err(e) => {
                println!("\n[Connection error: {}]", e);
                return RecvEnd::Failed;
            }
        }
    }
}

/// Read operator lines and write them to the peer until the operator quits,
/// is interrupted, or the connection breaks.
///
/// The quit command is matched after stripping the line terminator and is
/// never put on the wire. Everything else is written in full as raw bytes,
/// without the terminator, the way the peer expects to display it.
async fn send_loop<W, I>(mut writer: W, mut input: I) -> Result<SendEnd>
where
    W: AsyncWrite + Unpin,
    I: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    loop {
        prompt();
        line.clear();

        let read = tokio::select! {
            r = input.read_line(&mut line) => r?,
            _ = tokio::signal::ctrl_c() => {
                println!("\n[Closing connection...]");
                return Ok(SendEnd::Interrupted);
            }
        };
        if read == 0 {
            // Operator input is gone; same farewell as an interrupt.
            println!("\n[Closing connection...]");
            return Ok(SendEnd::Interrupted);
        }

        let message = line.trim_end_matches(['\r', '\n']);
        if message.eq_ignore_ascii_case(QUIT_COMMAND) {
            println!("[Closing connection...]");
            return Ok(SendEnd::Quit);
        }

        match writer.write_all(message.as_bytes()).await {
            Ok(()) => {}
            Err(e) if is_disconnect(&e) => {
                println!("[Connection lost]");
                return Ok(SendEnd::ConnectionLost);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn is_disconnect(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::BrokenPipe | ErrorKind::ConnectionReset)
}

fn prompt() {
    print!("You: ");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::BufReader;

    /// Reader that always fails with the given error kind.
    struct FailingReader(ErrorKind);

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut tokio::io::ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(self.0, "simulated failure")))
        }
    }

    /// Writer that always fails with the given error kind.
    struct FailingWriter(ErrorKind);

    impl AsyncWrite for FailingWriter {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::new(self.0, "simulated failure")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn inbound_ends_on_orderly_shutdown() {
        let (local, remote) = tokio::io::duplex(64);
        drop(remote);
        assert_eq!(receive_loop(local, "B").await, RecvEnd::Disconnected);
    }

    #[tokio::test]
    async fn inbound_displays_data_then_ends_on_close() {
        let (local, mut remote) = tokio::io::duplex(64);
        remote.write_all(b"hello").await.unwrap();
        drop(remote);
        assert_eq!(receive_loop(local, "B").await, RecvEnd::Disconnected);
    }

    #[tokio::test]
    async fn inbound_treats_reset_as_disconnect() {
        let reader = FailingReader(ErrorKind::ConnectionReset);
        assert_eq!(receive_loop(reader, "B").await, RecvEnd::Disconnected);
    }

    #[tokio::test]
    async fn inbound_reports_other_read_errors() {
        let reader = FailingReader(ErrorKind::Other);
        assert_eq!(receive_loop(reader, "B").await, RecvEnd::Failed);
    }

    #[tokio::test]
    async fn quit_is_never_transmitted() {
        let mut wire = Vec::new();
        let input = BufReader::new(&b"/quit\n"[..]);
        let end = send_loop(&mut wire, input).await.unwrap();
        assert_eq!(end, SendEnd::Quit);
        assert!(wire.is_empty());
    }

    #[tokio::test]
    async fn quit_matches_any_casing() {
        for quit in ["/QUIT\n", "/Quit\n", "/qUiT\n"] {
            let mut wire = Vec::new();
            let input = BufReader::new(quit.as_bytes());
            let end = send_loop(&mut wire, input).await.unwrap();
            assert_eq!(end, SendEnd::Quit);
            assert!(wire.is_empty());
        }
    }

    #[tokio::test]
    async fn lines_are_sent_without_terminator() {
        let mut wire = Vec::new();
        let input = BufReader::new(&b"hello\nworld\r\n/quit\n"[..]);
        let end = send_loop(&mut wire, input).await.unwrap();
        assert_eq!(end, SendEnd::Quit);
        assert_eq!(wire, b"helloworld");
    }

    #[tokio::test]
    async fn empty_lines_write_nothing() {
        let mut wire = Vec::new();
        let input = BufReader::new(&b"\n\n/quit\n"[..]);
        let end = send_loop(&mut wire, input).await.unwrap();
        assert_eq!(end, SendEnd::Quit);
        assert!(wire.is_empty());
    }

    #[tokio::test]
    async fn input_eof_closes_gracefully() {
        let mut wire = Vec::new();
        let input = BufReader::new(&b""[..]);
        let end = send_loop(&mut wire, input).await.unwrap();
        assert_eq!(end, SendEnd::Interrupted);
        assert!(wire.is_empty());
    }

    #[tokio::test]
    async fn broken_pipe_is_connection_lost() {
        let writer = FailingWriter(ErrorKind::BrokenPipe);
        let input = BufReader::new(&b"hello\n"[..]);
        let end = send_loop(writer, input).await.unwrap();
        assert_eq!(end, SendEnd::ConnectionLost);
    }

    #[tokio::test]
    async fn reset_on_write_is_connection_lost() {
        let writer = FailingWriter(ErrorKind::ConnectionReset);
        let input = BufReader::new(&b"hello\n"[..]);
        let end = send_loop(writer, input).await.unwrap();
        assert_eq!(end, SendEnd::ConnectionLost);
    }

    #[tokio::test]
    async fn unexpected_write_errors_propagate() {
        let writer = FailingWriter(ErrorKind::PermissionDenied);
        let input = BufReader::new(&b"hello\n"[..]);
        assert!(send_loop(writer, input).await.is_err());
    }
}
