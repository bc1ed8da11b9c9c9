//! Line source over any buffered reader.
//!
//! Used for piped input and for driving sessions in tests without sockets.

use crate::source::{read_wire_line, LineSource};
use std::io::{self, BufRead};

/// Line source backed by a `BufRead`.
///
/// `close_read` is emulated with a flag: once set, every read reports end of
/// stream.
#[derive(Debug)]
pub struct ReaderSource<R: BufRead> {
    reader: R,
    peer: String,
    closed: bool,
}

impl<R: BufRead> ReaderSource<R> {
    /// Wrap `reader`, reporting `peer` as the remote name.
    pub fn new(reader: R, peer: impl Into<String>) -> Self {
        Self {
            reader,
            peer: peer.into(),
            closed: false,
        }
    }

    /// True once `close_read` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        if self.closed {
            return Ok(None);
        }
        read_wire_line(&mut self.reader)
    }

    fn close_read(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }

    fn peer(&self) -> String {
        self.peer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_lines_until_eof() {
        let mut source = ReaderSource::new(&b"line1\nline2\n"[..], "test");
        assert_eq!(source.read_line().unwrap(), Some("line1".to_string()));
        assert_eq!(source.read_line().unwrap(), Some("line2".to_string()));
        assert_eq!(source.read_line().unwrap(), None);
    }

    #[test]
    fn close_read_ends_stream() {
        let mut source = ReaderSource::new(&b"line1\nline2\n"[..], "test");
        source.read_line().unwrap();
        source.close_read().unwrap();
        assert!(source.is_closed());
        assert_eq!(
            source.read_line().unwrap(),
            None,
            "Remaining lines must not be read after close"
        );
    }

    #[test]
    fn peer_is_reported() {
        let source = ReaderSource::new(&b""[..], "10.0.0.1:9");
        assert_eq!(source.peer(), "10.0.0.1:9");
    }

    #[test]
    fn empty_input_is_immediate_eof() {
        let mut source = ReaderSource::new(&b""[..], "test");
        assert_eq!(source.read_line().unwrap(), None);
    }
}
