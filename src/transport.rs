//! Transport abstraction for embedded systems.
//!
//! The engine consumes the transport through these traits only. Any byte
//! stream with blocking read semantics can back it: a TCP socket, a TLS
//! session, or an in-memory mock in tests. Reads may block until bytes are
//! available, a timeout elapses, or the peer closes; a read returning
//! `Ok(0)` means end of input.

#![allow(missing_docs)]

/// Re-exports of common traits.
pub mod prelude {
    pub use super::{Close, Connect, Connection, Read, Write};
}

pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// A synchronous connector (client).
///
/// The engine also uses this as its redirect collaborator: when a 3xx
/// response names a new location, the connector is asked to open a
/// connection to it and the old connection is replaced.
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to `remote`, given as `host:port`
    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error>;
}
