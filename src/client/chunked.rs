//! Outgoing chunked framing.
//!
//! Each non-empty write becomes one frame: the payload size in hexadecimal,
//! CRLF, the payload, CRLF. Empty writes emit nothing, so the only
//! zero-size frame on the wire is the terminator emitted by the finishing
//! call.

use core::fmt::Write as _;

use heapless::String;

use crate::error::Error;
use crate::transport::Write;

/// Emit one chunk frame for `data`; with `finished`, additionally emit the
/// zero-size terminating chunk and flush.
pub(crate) fn send_chunk<W: Write>(conn: &mut W, data: &[u8], finished: bool) -> Result<(), Error> {
    if !data.is_empty() {
        // usize in hex plus CRLF always fits.
        let mut size_line: String<18> = String::new();
        let _ = write!(size_line, "{:x}\r\n", data.len());
        write_all(conn, size_line.as_bytes())?;
        write_all(conn, data)?;
        write_all(conn, b"\r\n")?;
    }
    if finished {
        write_all(conn, b"0\r\n\r\n")?;
        conn.flush().map_err(|_| Error::WriteError)?;
    }
    Ok(())
}

/// Write the whole of `bytes`, looping over short writes.
pub(crate) fn write_all<W: Write>(conn: &mut W, mut bytes: &[u8]) -> Result<(), Error> {
    while !bytes.is_empty() {
        let n = conn.write(bytes).map_err(|_| Error::WriteError)?;
        if n == 0 {
            return Err(Error::WriteError);
        }
        bytes = &bytes[n..];
    }
    Ok(())
}
