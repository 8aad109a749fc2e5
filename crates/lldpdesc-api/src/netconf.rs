// NETCONF over stdio
//
// `cli xml-mode netconf need-trailer` speaks NETCONF 1.0 on its standard
// streams, every message closed by the `]]>]]>` trailer. One RPC is in
// flight at a time, so the caller sees each reply before deciding whether
// to send the next one.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::error::Error;
use crate::rest::xnm::{self, Severity};

pub const TRAILER: &str = "]]>]]>";

const CLIENT_HELLO: &str = "<hello xmlns=\"urn:ietf:params:xml:ns:netconf:base:1.0\">\
    <capabilities><capability>urn:ietf:params:netconf:base:1.0</capability></capabilities>\
    </hello>";

const CLOSE_SESSION: &str = "<close-session/>";

/// A NETCONF session over any reader/writer pair (the child's stdout/stdin).
pub struct Session<R, W> {
    peer: String,
    reader: R,
    writer: W,
    buffer: Vec<u8>,
    next_id: u32,
}

impl<R, W> Session<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(peer: impl Into<String>, reader: R, writer: W) -> Self {
        Self {
            peer: peer.into(),
            reader,
            writer,
            buffer: Vec::new(),
            next_id: 0,
        }
    }

    /// Swap hellos. The server speaks first.
    pub async fn hello(&mut self) -> Result<(), Error> {
        let greeting = self.read_message().await?;
        if !greeting.contains("<hello") {
            return Err(Error::rpc("hello", "peer did not send a NETCONF hello"));
        }
        self.write_message(CLIENT_HELLO).await
    }

    /// Send one RPC and wait for its reply. Any error-severity
    /// `<rpc-error>` fails the call; warnings are logged.
    pub async fn rpc(&mut self, name: &str, body: &str) -> Result<String, Error> {
        self.next_id += 1;
        debug!(peer = %self.peer, id = self.next_id, "rpc {name}");
        self.write_message(&format!("<rpc message-id=\"{}\">{body}</rpc>", self.next_id))
            .await?;
        let reply = self.read_message().await?;

        let mut problems = Vec::new();
        for diagnostic in xnm::scan_rpc_errors(&reply) {
            match diagnostic.severity {
                Severity::Error => problems.push(diagnostic.message),
                Severity::Warning => warn!("{}", diagnostic.message),
            }
        }

        if problems.is_empty() {
            Ok(reply)
        } else {
            Err(Error::rpc(name, problems.join("; ")))
        }
    }

    /// Close the configuration database and the session. A private
    /// database drops whatever was loaded but not committed.
    pub async fn close(&mut self) -> Result<(), Error> {
        let closed = self.rpc("close-configuration", xnm::CLOSE).await;
        self.rpc("close-session", CLOSE_SESSION).await?;
        closed.map(|_| ())
    }

    async fn write_message(&mut self, xml: &str) -> Result<(), Error> {
        let framed = format!("{xml}\n{TRAILER}\n");
        self.writer
            .write_all(framed.as_bytes())
            .await
            .map_err(|source| self.io_error(source))?;
        self.writer
            .flush()
            .await
            .map_err(|source| self.io_error(source))
    }

    async fn read_message(&mut self) -> Result<String, Error> {
        let mut chunk = [0_u8; 4096];
        loop {
            if let Some(end) = find_trailer(&self.buffer) {
                let message = String::from_utf8_lossy(&self.buffer[..end]).trim().to_owned();
                self.buffer.drain(..end + TRAILER.len());
                return Ok(message);
            }

            let read = self
                .reader
                .read(&mut chunk)
                .await
                .map_err(|source| self.io_error(source))?;
            if read == 0 {
                return Err(self.io_error(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "session closed before the end of a reply",
                )));
            }
            self.buffer.extend_from_slice(&chunk[..read]);
        }
    }

    fn io_error(&self, source: io::Error) -> Error {
        Error::Spawn {
            program: self.peer.clone(),
            source,
        }
    }
}

fn find_trailer(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(TRAILER.len())
        .position(|window| window == TRAILER.as_bytes())
}
