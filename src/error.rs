//! Common error type for the response-processing engine.

/// Errors surfaced by the client engine.
///
/// Variants fall into three groups with different connection-reuse
/// consequences:
///
/// - Transport faults (`ReadError`, `WriteError`, `ConnectionClosed`) are fatal to the current response and always leave
///   the connection marked not reusable.
/// - Framing and semantic faults (`InvalidStatusLine`, `InvalidHeader`,
///   `InvalidChunk`, `EncodingConflict`, `BufferFull`) likewise clear
///   reusability.
/// - Policy outcomes (`Redirected`, `RedirectFailed`, `TooManyRedirects`,
///   `MissingLocation`, `ErrorStatus`) report a failed exchange without
///   necessarily indicating a connection fault; `Redirected` in particular
///   means a new connection is already active.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An error occurred during a read operation.
    ReadError,
    /// An error occurred during a write operation.
    WriteError,
    /// The peer closed the connection before the response was complete.
    ConnectionClosed,
    /// The status line did not match `HTTP/<version> <3-digit-status>`.
    InvalidStatusLine,
    /// A header line was malformed or rejected by a collaborator.
    InvalidHeader,
    /// A chunk frame was malformed (bad size token, truncated payload or
    /// missing CRLF).
    InvalidChunk,
    /// Contradictory transfer or content encoding headers were received.
    EncodingConflict,
    /// A staging buffer could not hold the data it was asked to stage.
    BufferFull,
    /// A 3xx response carried no usable `Location` header.
    MissingLocation,
    /// The response was a redirect and a connection to the new target is
    /// already established; headers for *this* response did not produce a
    /// readable body.
    Redirected,
    /// A redirect target could not be connected to.
    RedirectFailed,
    /// The redirect chain exceeded the per-exchange limit.
    TooManyRedirects,
    /// The server answered with a 4xx/5xx status; the error body has been
    /// drained and discarded.
    ErrorStatus,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::InvalidStatusLine => defmt::write!(f, "InvalidStatusLine"),
            Error::InvalidHeader => defmt::write!(f, "InvalidHeader"),
            Error::InvalidChunk => defmt::write!(f, "InvalidChunk"),
            Error::EncodingConflict => defmt::write!(f, "EncodingConflict"),
            Error::BufferFull => defmt::write!(f, "BufferFull"),
            Error::MissingLocation => defmt::write!(f, "MissingLocation"),
            Error::Redirected => defmt::write!(f, "Redirected"),
            Error::RedirectFailed => defmt::write!(f, "RedirectFailed"),
            Error::TooManyRedirects => defmt::write!(f, "TooManyRedirects"),
            Error::ErrorStatus => defmt::write!(f, "ErrorStatus"),
        }
    }
}
