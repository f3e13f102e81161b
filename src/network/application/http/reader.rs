use crate::network::Read;
use crate::network::error::{DecodeError, Error};
use heapless::Vec;

/// Bytes pulled from the connection per read.
const READ_BUF_LEN: usize = 128;

/// A small read-ahead buffer over a borrowed stream.
///
/// HTTP framing needs both line-oriented reads (status line, headers,
/// chunk sizes) and exact-length reads (chunk data), and the connection
/// traits only offer `read`. This type provides both without losing bytes
/// that were read past a line boundary.
pub struct BufReader<'c, R: Read> {
    inner: &'c mut R,
    buf: [u8; READ_BUF_LEN],
    pos: usize,
    filled: usize,
}

impl<'c, R: Read> BufReader<'c, R> {
    /// Wraps `inner`. Nothing is read until the first call.
    pub fn new(inner: &'c mut R) -> Self {
        Self {
            inner,
            buf: [0; READ_BUF_LEN],
            pos: 0,
            filled: 0,
        }
    }

    /// Makes sure at least one byte is buffered. Returns `false` once the peer
    /// has closed the stream.
    fn fill(&mut self) -> Result<bool, Error> {
        if self.pos < self.filled {
            return Ok(true);
        }
        let n = self.inner.read(&mut self.buf).map_err(Into::<Error>::into)?;
        self.pos = 0;
        self.filled = n;
        Ok(n > 0)
    }

    /// Returns the next byte without consuming it.
    pub fn peek_byte(&mut self) -> Result<Option<u8>, Error> {
        if !self.fill()? {
            return Ok(None);
        }
        Ok(Some(self.buf[self.pos]))
    }

    /// Consumes and returns the next byte, `None` at end of stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        let byte = self.peek_byte()?;
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    /// Reads one `\n`-terminated line into `line`, without the `\n`.
    ///
    /// Bytes that do not fit into `line` are discarded, so an over-long line
    /// comes back truncated. Returns `false` if the stream ended before any
    /// byte of the line was read.
    pub fn read_line<const N: usize>(&mut self, line: &mut Vec<u8, N>) -> Result<bool, Error> {
        line.clear();
        let mut seen = false;
        while let Some(byte) = self.read_byte()? {
            seen = true;
            if byte == b'\n' {
                break;
            }
            // Full: keep consuming up to the newline.
            let _ = line.push(byte);
        }
        Ok(seen)
    }

    /// Appends exactly `count` bytes to `out`.
    pub fn read_exact_into<const N: usize>(
        &mut self,
        mut count: usize,
        out: &mut Vec<u8, N>,
    ) -> Result<(), Error> {
        while count > 0 {
            if !self.fill()? {
                return Err(DecodeError::Truncated.into());
            }
            let available = &self.buf[self.pos..self.filled];
            let take = available.len().min(count);
            out.extend_from_slice(&available[..take])
                .map_err(|_| DecodeError::BodyTooLarge)?;
            self.pos += take;
            count -= take;
        }
        Ok(())
    }

    /// Skips a `\r\n` or bare `\n` if one comes next.
    pub fn skip_line_terminator(&mut self) -> Result<(), Error> {
        if self.peek_byte()? == Some(b'\r') {
            self.pos += 1;
        }
        if self.peek_byte()? == Some(b'\n') {
            self.pos += 1;
        }
        Ok(())
    }
}

impl<R: Read> core::fmt::Debug for BufReader<'_, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufReader")
            .field("buffered", &(self.filled - self.pos))
            .finish()
    }
}
