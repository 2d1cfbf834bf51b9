//! # embhttp - Embedded HTTP/1.1 Client Engine
//!
//! A transport-agnostic HTTP/1.1 client library for embedded systems. The
//! heart of the crate is the response-processing engine: a state machine that
//! reads a response from a byte stream, classifies its transfer encoding,
//! decides whether the exchange must be retried or redirected, and hands the
//! message body to an encoding-aware reader. The engine never leaves a
//! connection in an ambiguous state; it is marked reusable only when the full
//! response is known to have been consumed.
//!
//! ## Features
//!
//! - HTTP/1.1 response parsing with chunked, length-delimited and
//!   read-to-close bodies
//! - Redirect following through a caller-supplied connector
//! - Basic authentication with a single bounded retry per exchange
//! - `Expect: 100-continue` handling for streamed (chunked) request bodies
//! - Cookie capture and replay within one client
//! - Fixed-size buffers for predictable memory usage, no heap allocation
//! - Connection agnostic: works with any transport implementing the crate's
//!   [`Connection`](transport::Connection) trait
//!
//! ## Usage
//!
//! ```rust,no_run
//! use embhttp::client::{Client, Method, Request};
//! # use embhttp::transport::Connection;
//! # struct MockConnection;
//! # impl Connection for MockConnection {}
//! # impl embhttp::transport::Read for MockConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl embhttp::transport::Write for MockConnection {
//! #     type Error = ();
//! #     fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> { Ok(0) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl embhttp::transport::Close for MockConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! let connection = MockConnection;
//! let mut client = Client::new(connection);
//!
//! let request = Request {
//!     method: Method::Get,
//!     host: "device.example.com",
//!     path: "/api/data",
//!     headers: heapless::Vec::new(),
//!     body: None,
//! };
//!
//! // let response = client.request(&request)?;
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based IoT devices
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Staging byte buffer with explicit defragmentation.
///
/// Holds bytes read from the transport until a full header line or chunk
/// token is available.
pub mod buffer;

/// The HTTP client and its response-processing engine.
pub mod client;

/// Common error type for the engine.
pub mod error;

/// Transport abstraction traits.
///
/// The engine works against these traits rather than any concrete socket
/// type, so the same code runs over raw TCP, TLS sessions or test mocks.
pub mod transport;

pub use error::Error;
