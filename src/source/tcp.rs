//! TCP line source.

use crate::source::{read_wire_line, LineSource};
use std::io::{self, BufReader};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

/// Line source over an accepted TCP stream.
#[derive(Debug)]
pub struct TcpSource {
    reader: BufReader<TcpStream>,
    peer: SocketAddr,
}

impl TcpSource {
    /// Wrap an accepted stream.
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self {
            reader: BufReader::new(stream),
            peer,
        }
    }

    /// Apply a read timeout to the underlying stream. `None` blocks forever.
    ///
    /// # Errors
    ///
    /// Returns the socket error, e.g. for a zero duration.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)
    }

    /// Address of the remote end.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl LineSource for TcpSource {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        read_wire_line(&mut self.reader)
    }

    fn close_read(&mut self) -> io::Result<()> {
        self.reader.get_ref().shutdown(Shutdown::Read)
    }

    fn peer(&self) -> String {
        self.peer.to_string()
    }
}
