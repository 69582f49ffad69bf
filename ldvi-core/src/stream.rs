//! A small seekable byte-stream wrapper shared by both parsers.
//!
//! Every record operation in [`crate::format::RecordParser`] takes a stream
//! and an optional starting offset rather than owning the stream itself, so
//! the diff engine can freely interleave reads against the clean and data
//! copies of a document. This module is the thin line-at-a-time reader both
//! parser implementations build on.

use std::io::{self, Read, Seek, SeekFrom};

/// Object-safe alias for "a byte source ldvi can seek around in": an open
/// file, a `Cursor<Vec<u8>>` in tests, or anything else that reads and seeks.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// The outcome of reading one physical line from a [`LineReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawLine {
    /// Clean end of file: zero bytes were available.
    Eof,
    /// A complete, newline-terminated line (the LF/CRLF already stripped).
    Line(Vec<u8>),
    /// EOF was reached partway through a line, with no terminating newline.
    Unterminated(Vec<u8>),
}

pub(crate) struct LineReader<'a> {
    inner: &'a mut dyn ReadSeek,
}

impl<'a> LineReader<'a> {
    pub fn new(inner: &'a mut dyn ReadSeek) -> Self {
        LineReader { inner }
    }

    pub fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.seek(SeekFrom::Current(0))
    }

    /// Reads one physical line. The trailing LF is consumed but not
    /// returned; a trailing CR immediately before it is also stripped.
    ///
    /// Distinguishes a clean end of file (no bytes at all - the normal way
    /// a record ends) from a line that was cut off mid-way by EOF (a
    /// malformed document, since every real line must be newline-terminated).
    pub fn read_line(&mut self) -> io::Result<RawLine> {
        let mut buf = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            let n = self.inner.read(&mut byte)?;
            if n == 0 {
                return Ok(if buf.is_empty() { RawLine::Eof } else { RawLine::Unterminated(buf) });
            }
            if byte[0] == b'\n' {
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
                return Ok(RawLine::Line(buf));
            }
            buf.push(byte[0]);
        }
    }

    /// Reads exactly `n` bytes, for the native/strict numeric-length tags.
    pub fn read_exact_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Consumes one trailing newline byte if present; used after a
    /// fixed-length value so the following line starts cleanly.
    pub fn skip_newline(&mut self) -> io::Result<()> {
        let mut byte = [0u8; 1];
        let n = self.inner.read(&mut byte)?;
        if n == 1 && byte[0] != b'\n' {
            self.inner.seek(SeekFrom::Current(-1))?;
        }
        Ok(())
    }

    /// Reads a single byte, or `None` at EOF.
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        let n = self.inner.read(&mut byte)?;
        Ok(if n == 1 { Some(byte[0]) } else { None })
    }

    /// Un-reads the last byte returned by [`read_byte`](Self::read_byte),
    /// so the next read sees it again. Used to peek one byte of lookahead.
    pub fn unread_byte(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Current(-1))?;
        Ok(())
    }

    /// Consumes a run of zero or more literal space bytes.
    pub fn skip_spaces(&mut self) -> io::Result<()> {
        loop {
            match self.read_byte()? {
                Some(b' ') => continue,
                Some(_) => {
                    self.unread_byte()?;
                    return Ok(());
                }
                None => return Ok(()),
            }
        }
    }
}

/// Splits a raw line on the first ASCII space, matching the `name SP value`
/// grammar both formats share at the top level of a line.
pub(crate) fn split_once_space(line: &[u8]) -> (&[u8], Option<&[u8]>) {
    match line.iter().position(|&b| b == b' ') {
        Some(i) => (&line[..i], Some(&line[i + 1..])),
        None => (line, None),
    }
}
