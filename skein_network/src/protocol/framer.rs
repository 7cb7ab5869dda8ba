//! CR LF line framing over a byte stream

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;

/// Decodes CR LF terminated lines out of a byte buffer.
///
/// Unlike most line codecs this imposes no length limit: an unterminated
/// line is held for as long as the peer keeps sending it.
#[derive(Debug, Default)]
pub struct LineCodec {
    // Offset up to which the buffer is known not to contain a CR LF
    scanned: usize,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::default()
    }

    fn split_line(&mut self, src: &mut BytesMut) -> Option<String> {
        // Back up one byte in case the previous chunk ended between CR and LF
        let start = self.scanned.saturating_sub(1).min(src.len());
        match src[start..].windows(2).position(|w| w == b"\r\n") {
            Some(offset) => {
                let line = src.split_to(start + offset);
                src.advance(2);
                self.scanned = 0;
                Some(String::from_utf8_lossy(&line).into_owned())
            }
            None => {
                self.scanned = src.len();
                None
            }
        }
    }

    /// Forget how much of the buffer has been searched, for when the buffer
    /// itself is thrown away
    pub fn reset(&mut self) {
        self.scanned = 0;
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(self.split_line(src))
    }
}

/// Splits a byte stream into CR LF terminated lines.
///
/// Chunks are pushed in arrival order; complete lines are then pulled out
/// lazily. Anything after the last CR LF stays buffered until the next chunk
/// completes it.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: BytesMut,
    codec: LineCodec,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of received bytes
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Take the next complete line, without its terminator
    pub fn next_line(&mut self) -> Option<String> {
        self.codec.split_line(&mut self.buffer)
    }

    /// Iterate over the complete lines currently buffered
    pub fn lines(&mut self) -> Lines<'_> {
        Lines { framer: self }
    }

    /// Number of bytes held that don't yet form a complete line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Throw away any partial data
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.codec.reset();
    }
}

pub struct Lines<'a> {
    framer: &'a mut LineFramer,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.framer.next_line()
    }
}
