//! Header-line scanner.
//!
//! Reads CRLF-terminated lines through the staging buffer. Over-length
//! physical lines are a recoverable condition: the fitting prefix is
//! reported as `Overflow`, the remainder is discarded up to the next
//! terminator, and parsing continues with the following line. End of input
//! before a terminator is a transport fault.

use heapless::Vec;

use crate::client::{Client, MAX_HEADER_LINE_LEN};
use crate::error::Error;
use crate::transport::{Connect, Connection, Read as _};

/// Result of one line read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line {
    /// A full line, terminator stripped, is in the output buffer.
    Complete,
    /// The line exceeds the buffer; the remainder of the physical line has
    /// not been consumed yet.
    Overflow,
}

impl<C: Connection, K: Connect<Connection = C>> Client<C, K> {
    /// Refill the staging buffer with one transport read. `Ok(0)` means end
    /// of input.
    pub(crate) fn fill_rx(&mut self) -> Result<usize, Error> {
        let free = self.rx.free_space_mut();
        if free.is_empty() {
            return Ok(0);
        }
        let n = self.conn.read(free).map_err(|_| Error::ReadError)?;
        self.rx.commit(n);
        Ok(n)
    }

    /// One byte from the staged stream; `None` at end of input.
    pub(crate) fn getch(&mut self) -> Result<Option<u8>, Error> {
        if self.rx.is_empty() && self.fill_rx()? == 0 {
            return Ok(None);
        }
        let byte = self.rx.peek()[0];
        self.rx.consume(1)?;
        Ok(Some(byte))
    }

    /// Read one LF-terminated line into `out`, stripping the terminator and
    /// a trailing CR.
    pub(crate) fn read_line(
        &mut self,
        out: &mut Vec<u8, MAX_HEADER_LINE_LEN>,
    ) -> Result<Line, Error> {
        out.clear();
        loop {
            let byte = match self.getch()? {
                Some(b) => b,
                None => return Err(Error::ConnectionClosed),
            };
            if byte == b'\n' {
                if out.last() == Some(&b'\r') {
                    out.pop();
                }
                return Ok(Line::Complete);
            }
            if out.push(byte).is_err() {
                return Ok(Line::Overflow);
            }
        }
    }

    /// Discard the remainder of an over-length physical line.
    pub(crate) fn discard_line(&mut self) -> Result<(), Error> {
        loop {
            match self.getch()? {
                Some(b'\n') => return Ok(()),
                Some(_) => continue,
                None => return Err(Error::ConnectionClosed),
            }
        }
    }

    /// Next header line that fits the line buffer. Over-length lines are
    /// discarded and skipped rather than failing the parse.
    pub(crate) fn read_header_line(
        &mut self,
        out: &mut Vec<u8, MAX_HEADER_LINE_LEN>,
    ) -> Result<(), Error> {
        loop {
            match self.read_line(out)? {
                Line::Complete => return Ok(()),
                Line::Overflow => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("header line too long, discarding");
                    self.discard_line()?;
                }
            }
        }
    }
}
