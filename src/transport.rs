//! Socket transport with NUL-terminated framing.
//!
//! One persistent stream per client. Every message goes out as its UTF-8 text
//! followed by a single `0x00`, and a reply is everything up to the next
//! `0x00`. Reads and writes block; there is no timeout.

use crate::{Error, Result};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::TcpStream;
#[cfg(unix)]
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use tracing::{debug, trace};

/// Message terminator byte.
pub const TERMINATOR: u8 = 0;

/// Where to connect, parsed from a `unix://` or `tcp://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Unix(PathBuf),
    Tcp { host: String, port: u16 },
}

impl Endpoint {
    pub fn parse(uri: &str) -> Result<Self> {
        if let Some(path) = uri.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(Error::Configuration(format!("missing socket path in `{}`", uri)));
            }
            Ok(Endpoint::Unix(PathBuf::from(path)))
        } else if let Some(rest) = uri.strip_prefix("tcp://") {
            let authority = rest.split('/').next().unwrap_or_default();
            let (host, port) = authority
                .rsplit_once(':')
                .ok_or_else(|| Error::Configuration(format!("missing port in `{}`", uri)))?;
            if host.is_empty() {
                return Err(Error::Configuration(format!("missing host in `{}`", uri)));
            }
            let port = port
                .parse()
                .map_err(|_| Error::Configuration(format!("invalid port in `{}`", uri)))?;
            Ok(Endpoint::Tcp {
                host: host.to_string(),
                port,
            })
        } else {
            Err(Error::Configuration(format!("unsupported server URI `{}`", uri)))
        }
    }
}

#[derive(Debug)]
enum Stream {
    #[cfg(unix)]
    Unix(UnixStream),
    Tcp(TcpStream),
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.read(buf),
            Stream::Tcp(s) => s.read(buf),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.write(buf),
            Stream::Tcp(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            #[cfg(unix)]
            Stream::Unix(s) => s.flush(),
            Stream::Tcp(s) => s.flush(),
        }
    }
}

/// A connected socket.
#[derive(Debug)]
pub struct Transport {
    endpoint: Endpoint,
    stream: Option<BufReader<Stream>>,
}

impl Transport {
    /// Connect to the server at `uri`.
    pub fn connect(uri: &str) -> Result<Self> {
        let endpoint = Endpoint::parse(uri)?;
        let stream = match &endpoint {
            #[cfg(unix)]
            Endpoint::Unix(path) => UnixStream::connect(path)
                .map(Stream::Unix)
                .map_err(|e| Error::transport(format!("failed to connect to {}", uri), e))?,
            #[cfg(not(unix))]
            Endpoint::Unix(_) => {
                return Err(Error::Configuration(format!(
                    "unix sockets are not available on this platform: `{}`",
                    uri
                )))
            }
            Endpoint::Tcp { host, port } => TcpStream::connect((host.as_str(), *port))
                .map(Stream::Tcp)
                .map_err(|e| Error::transport(format!("failed to connect to {}", uri), e))?,
        };
        debug!(uri, "connected");

        Ok(Self {
            endpoint,
            stream: Some(BufReader::new(stream)),
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn stream(&mut self) -> Result<&mut BufReader<Stream>> {
        self.stream
            .as_mut()
            .ok_or_else(|| Error::closed("connection is closed"))
    }

    /// Write `msg` followed by the terminator.
    pub fn send(&mut self, msg: &str) -> Result<()> {
        write_frame(self.stream()?.get_mut(), msg.as_bytes())
            .map_err(|e| Error::transport("failed to write message", e))?;

        trace!(bytes = msg.len(), "sent message");
        Ok(())
    }

    /// Block until a full message arrives and return it without the terminator.
    pub fn receive(&mut self) -> Result<String> {
        let reader = self.stream()?;
        let mut buf = Vec::new();
        reader
            .read_until(TERMINATOR, &mut buf)
            .map_err(|e| Error::transport("failed to read message", e))?;

        if buf.last() != Some(&TERMINATOR) {
            return Err(Error::closed(format!(
                "connection closed by server after {} bytes",
                buf.len()
            )));
        }
        buf.pop();

        trace!(bytes = buf.len(), "received message");
        String::from_utf8(buf).map_err(|e| Error::Transport {
            message: format!("message is not valid UTF-8: {}", e),
            source: None,
        })
    }

    /// Release the socket. Calling this more than once is harmless.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!(endpoint = ?self.endpoint, "closed connection");
        }
    }
}

fn write_frame(writer: &mut impl Write, payload: &[u8]) -> io::Result<()> {
    writer.write_all(payload)?;
    writer.write_all(&[TERMINATOR])?;
    writer.flush()
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.close();
    }
}
