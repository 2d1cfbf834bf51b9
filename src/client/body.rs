//! Body readers: how to know where the body ends.
//!
//! Exactly one variant is active per response, chosen by the dispatcher
//! from the classified transfer encoding. Body readers attach only to
//! status classes that carry a body (2xx, 4xx, 5xx), never to 1xx or 3xx.

use heapless::Vec;

use crate::client::line::Line;
use crate::client::{Client, MAX_HEADER_LINE_LEN, TransferEncoding};
use crate::error::Error;
use crate::transport::{Connect, Connection, Read as _};

/// Active body reader variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyState {
    /// `Content-Length` delimited; `remaining` counts down to the end.
    Fixed { remaining: usize },
    /// Chunked framing, decoded incrementally.
    Chunked(ChunkState),
    /// No framing; the body runs until the peer closes.
    ToClose,
}

/// Position inside the chunked framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChunkState {
    /// Before a `<hex-size>\r\n` line.
    Size,
    /// Inside a chunk payload.
    Data { remaining: usize },
    /// After a payload, before its trailing CRLF.
    DataEnd,
    /// After the zero chunk, discarding trailer lines.
    Trailers,
    /// Terminating empty line seen; the body is complete.
    Done,
}

impl<C: Connection, K: Connect<Connection = C>> Client<C, K> {
    /// Attach the body reader matching the classified transfer encoding.
    pub(crate) fn attach_body(&mut self, encoding: TransferEncoding, content_length: usize) {
        self.body = Some(match encoding {
            TransferEncoding::Identity => BodyState::ToClose,
            TransferEncoding::ContentLength => BodyState::Fixed {
                remaining: content_length,
            },
            TransferEncoding::Chunked => BodyState::Chunked(ChunkState::Size),
        });
    }

    /// Read response body bytes into `buf`. Returns the number of payload
    /// bytes produced; 0 means the body is complete (or no body reader is
    /// attached). Any error also marks the connection not reusable.
    pub fn read_body(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let result = self.read_body_inner(buf);
        if result.is_err() {
            self.session.flags.keep_connection = false;
        }
        result
    }

    fn read_body_inner(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.body {
            None => Ok(0),
            Some(BodyState::Fixed { remaining }) => {
                if remaining == 0 {
                    return Ok(0);
                }
                let want = buf.len().min(remaining);
                let got = self.read_some(&mut buf[..want])?;
                if got == 0 {
                    // The peer closed before delivering the declared length.
                    return Err(Error::ConnectionClosed);
                }
                self.body = Some(BodyState::Fixed {
                    remaining: remaining - got,
                });
                Ok(got)
            }
            Some(BodyState::ToClose) => {
                let got = self.read_some(buf)?;
                if got == 0 {
                    // End of input ends the body; the connection is spent.
                    self.session.flags.keep_connection = false;
                }
                Ok(got)
            }
            Some(BodyState::Chunked(state)) => self.read_chunked(buf, state),
        }
    }

    /// Read and discard the rest of the body, then tear the reader down.
    pub(crate) fn drain_body(&mut self) -> Result<(), Error> {
        let mut scratch = [0u8; 64];
        loop {
            if self.read_body(&mut scratch)? == 0 {
                self.body = None;
                return Ok(());
            }
        }
    }

    /// Take staged bytes first, then read from the transport directly.
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if !self.rx.is_empty() {
            let n = buf.len().min(self.rx.len());
            buf[..n].copy_from_slice(&self.rx.peek()[..n]);
            self.rx.consume(n)?;
            return Ok(n);
        }
        self.conn.read(buf).map_err(|_| Error::ReadError)
    }

    fn read_chunked(&mut self, buf: &mut [u8], mut state: ChunkState) -> Result<usize, Error> {
        loop {
            match state {
                ChunkState::Size => {
                    let mut size_line: Vec<u8, MAX_HEADER_LINE_LEN> = Vec::new();
                    match self.read_line(&mut size_line) {
                        Ok(Line::Complete) => {}
                        Ok(Line::Overflow) => return Err(Error::InvalidChunk),
                        Err(Error::ConnectionClosed) => return Err(Error::InvalidChunk),
                        Err(e) => return Err(e),
                    }
                    let size = parse_chunk_size(&size_line)?;
                    state = if size == 0 {
                        ChunkState::Trailers
                    } else {
                        ChunkState::Data { remaining: size }
                    };
                }
                ChunkState::Data { remaining } => {
                    let want = buf.len().min(remaining);
                    let got = self.read_some(&mut buf[..want])?;
                    if got == 0 {
                        // Declared payload truncated by stream end.
                        return Err(Error::InvalidChunk);
                    }
                    let left = remaining - got;
                    state = if left == 0 {
                        ChunkState::DataEnd
                    } else {
                        ChunkState::Data { remaining: left }
                    };
                    self.body = Some(BodyState::Chunked(state));
                    return Ok(got);
                }
                ChunkState::DataEnd => {
                    if self.getch()? != Some(b'\r') || self.getch()? != Some(b'\n') {
                        return Err(Error::InvalidChunk);
                    }
                    state = ChunkState::Size;
                }
                ChunkState::Trailers => {
                    let mut trailer: Vec<u8, MAX_HEADER_LINE_LEN> = Vec::new();
                    match self.read_line(&mut trailer) {
                        Ok(Line::Complete) => {
                            if trailer.is_empty() {
                                state = ChunkState::Done;
                            }
                        }
                        Ok(Line::Overflow) => match self.discard_line() {
                            Ok(()) => {}
                            Err(_) => return Err(Error::InvalidChunk),
                        },
                        Err(Error::ConnectionClosed) => return Err(Error::InvalidChunk),
                        Err(e) => return Err(e),
                    }
                }
                ChunkState::Done => {
                    self.body = Some(BodyState::Chunked(ChunkState::Done));
                    return Ok(0);
                }
            }
        }
    }
}

/// Parse a chunk-size line: unsigned hexadecimal, optional `;extensions`
/// ignored, no sign.
fn parse_chunk_size(line: &[u8]) -> Result<usize, Error> {
    let text = core::str::from_utf8(line).map_err(|_| Error::InvalidChunk)?;
    let token = text.split(';').next().unwrap_or("").trim();
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidChunk);
    }
    usize::from_str_radix(token, 16).map_err(|_| Error::InvalidChunk)
}
