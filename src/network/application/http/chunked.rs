//! Decoder for the HTTP/1.1 chunked transfer coding (RFC 9112 §7.1).
//!
//! The body is reassembled into a fixed-size buffer. Chunk extensions are
//! ignored and the trailer section is never read, since the connection is
//! closed right after the terminal chunk.
//!
//! Unlike a lenient decoder that hands back whatever arrived before the
//! connection dropped, every framing problem here is an error: a body is
//! returned only if the terminal `0` chunk was seen.

use super::MAX_LINE_LEN;
use super::reader::BufReader;
use crate::network::Read;
use crate::network::error::{DecodeError, Error};
use heapless::Vec;

/// Reads a chunked body from `reader` and appends it to `body`.
///
/// `reader` must be positioned right after the blank line that ends the
/// response head. Blank lines where a chunk-size line is expected are
/// skipped.
///
/// # Errors
///
/// * [`DecodeError::InvalidChunkSize`] - a size line is not hexadecimal
/// * [`DecodeError::Truncated`] - the stream ended before the terminal chunk
/// * [`DecodeError::BodyTooLarge`] - the body does not fit into `body`
/// * any error of the underlying connection, converted into [`Error`]
pub fn read_chunked_body<R: Read, const N: usize>(
    reader: &mut BufReader<'_, R>,
    body: &mut Vec<u8, N>,
) -> Result<(), Error> {
    let mut line: Vec<u8, MAX_LINE_LEN> = Vec::new();
    loop {
        if !reader.read_line(&mut line)? {
            return Err(DecodeError::Truncated.into());
        }
        let size_line = line.trim_ascii();
        if size_line.is_empty() {
            continue;
        }

        let size = parse_chunk_size(size_line)?;
        if size == 0 {
            return Ok(());
        }
        reader.read_exact_into(size, body)?;
        reader.skip_line_terminator()?;
    }
}

/// Parses a chunk-size line such as `1a` or `1A;name=value`.
pub fn parse_chunk_size(line: &[u8]) -> Result<usize, DecodeError> {
    let digits = match line.iter().position(|&b| b == b';') {
        Some(end) => &line[..end],
        None => line,
    }
    .trim_ascii();

    if digits.is_empty() {
        return Err(DecodeError::InvalidChunkSize);
    }
    digits.iter().try_fold(0usize, |size, &b| {
        let digit = (b as char)
            .to_digit(16)
            .ok_or(DecodeError::InvalidChunkSize)?;
        size.checked_mul(16)
            .and_then(|s| s.checked_add(digit as usize))
            .ok_or(DecodeError::InvalidChunkSize)
    })
}
