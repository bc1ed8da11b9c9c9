//! Line sources for sessions.
//!
//! This module provides the connections a session reads wire lines from:
//! - TCP streams accepted by the server
//! - Any `BufRead` (tests, piped input)
//!
//! Both yield one line per call with the line ending removed. Bytes that are
//! not valid UTF-8 are replaced rather than rejected.

use std::io::{self, BufRead, Read};

pub mod reader;
pub mod tcp;

pub use reader::ReaderSource;
pub use tcp::TcpSource;

/// A connection that produces newline-delimited lines.
pub trait LineSource {
    /// Block until the next line arrives.
    ///
    /// Returns `Ok(None)` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns the transport's I/O error, including timeouts and connections
    /// closed from elsewhere.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Stop reading from the connection. Later reads report end of stream.
    ///
    /// # Errors
    ///
    /// Returns the transport's I/O error if the shutdown itself fails.
    fn close_read(&mut self) -> io::Result<()>;

    /// Human-readable name of the remote end, e.g. `127.0.0.1:52811`.
    fn peer(&self) -> String;
}

impl<T: LineSource + ?Sized> LineSource for &mut T {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }

    fn close_read(&mut self) -> io::Result<()> {
        (**self).close_read()
    }

    fn peer(&self) -> String {
        (**self).peer()
    }
}

/// Longest accepted line in bytes, excluding the line ending.
pub const MAX_LINE_LEN: usize = 1024 * 1024;

/// Read one `\n`-terminated line from `reader`.
///
/// Strips `\n` or `\r\n`. A final line without a terminator is still
/// returned; `Ok(None)` means nothing was left to read.
///
/// # Errors
///
/// Returns `InvalidData` once a line runs past [`MAX_LINE_LEN`] without a
/// newline, besides the reader's own errors.
pub(crate) fn read_wire_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    read_wire_line_limited(reader, MAX_LINE_LEN)
}

fn read_wire_line_limited<R: BufRead>(reader: &mut R, limit: usize) -> io::Result<Option<String>> {
    let mut buffer = Vec::new();
    // Room for the longest line plus its `\r\n`.
    let cap = (limit + 2) as u64;
    let bytes_read = reader.take(cap).read_until(b'\n', &mut buffer)?;
    if bytes_read == 0 {
        return Ok(None);
    }

    if buffer.last() == Some(&b'\n') {
        buffer.pop();
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }
    }
    if buffer.len() > limit {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line longer than {limit} bytes"),
        ));
    }

    Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
}
