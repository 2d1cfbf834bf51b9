//! HTTP/1.1 client built around a transfer-encoding aware response engine.
//!
//! The client owns a [`Connection`], a staging [`ByteBuffer`] and the
//! per-exchange [`session`](self) state. A request flows through three
//! layers:
//!
//! 1. The request sender builds the request head (and optionally streams a
//!    chunked body).
//! 2. The response engine reads the status line and headers, classifies the
//!    transfer encoding, and runs the per-status-class policy: success,
//!    redirect, error-body drain, or bounded retry.
//! 3. A body reader matching the classified encoding (fixed-length, chunked
//!    or read-to-close) hands the payload out.
//!
//! The engine reuses a connection only when it is certain the previous
//! response was consumed in full; every fatal parse or transport fault
//! marks the connection not reusable.
//!
//! # Usage
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
//!     path: "/api/status",
//!     headers: heapless::Vec::new(),
//!     body: None,
//! };
//!
//! // let response = client.request(&request)?;
//! ```

/// Authentication collaborator: credentials, challenge handling, the
/// bounded 401 retry.
pub mod auth;

/// Cookie collaborator: capture and replay within one client.
pub mod cookie;

/// Minimal URL handling for redirect targets.
pub mod url;

mod body;
mod chunked;
mod headers;
mod line;
mod receive;
mod request;
mod session;

pub use headers::{ContentEncoding, TransferEncoding};
pub use request::{Header, Method, Request, Response};

use core::marker::PhantomData;

use crate::buffer::ByteBuffer;
use crate::client::auth::Credentials;
use crate::client::body::BodyState;
use crate::client::cookie::CookieJar;
use crate::client::session::Session;
use crate::error::Error;
use crate::transport::{Connect, Connection};

/// Capacity of the staging buffer between the transport and the parser.
const RX_BUFFER_SIZE: usize = 512;
/// Longest header (or chunk-size) line the parser keeps; longer physical
/// lines are discarded and skipped.
pub(crate) const MAX_HEADER_LINE_LEN: usize = 256;
/// Maximum number of caller-supplied request headers.
pub const MAX_HEADERS: usize = 16;
/// Maximum length of a request header name.
pub const MAX_HEADER_NAME_LEN: usize = 64;
/// Maximum length of a request header value.
pub const MAX_HEADER_VALUE_LEN: usize = 256;
/// Capacity of a collected response body.
pub const MAX_BODY_LEN: usize = 2048;
/// Capacity of the outgoing request head (and inline body).
const REQUEST_BUFFER_LEN: usize = 2048;
/// Redirects followed per exchange before giving up.
const MAX_REDIRECTS: u8 = 5;
/// Upper bound on resends per exchange: the redirect limit plus one
/// authentication retry and one Expect retry.
const MAX_ATTEMPTS: usize = MAX_REDIRECTS as usize + 2;

/// Placeholder connector for clients that do not follow redirects.
///
/// Used as the default connector type parameter of [`Client`]; its
/// `connect` always fails, so a 3xx response surfaces as
/// [`Error::RedirectFailed`].
pub struct NoConnector<C>(PhantomData<C>);

impl<C> core::fmt::Debug for NoConnector<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("NoConnector")
    }
}

impl<C: Connection> Connect for NoConnector<C> {
    type Connection = C;
    type Error = Error;

    fn connect(&mut self, _remote: &str) -> Result<C, Error> {
        Err(Error::RedirectFailed)
    }
}

/// An HTTP/1.1 client over any [`Connection`].
///
/// `K` is the connector used to open connections to redirect targets; a
/// client built with [`Client::new`] has no connector and reports redirects
/// as failures instead of following them.
pub struct Client<C: Connection, K: Connect<Connection = C> = NoConnector<C>> {
    conn: C,
    connector: Option<K>,
    rx: ByteBuffer<RX_BUFFER_SIZE>,
    session: Session,
    body: Option<BodyState>,
    content_encoding: ContentEncoding,
    cookies: CookieJar,
}

impl<C: Connection> Client<C> {
    /// Wrap an established connection. Redirect responses will not be
    /// followed.
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            connector: None,
            rx: ByteBuffer::new(),
            session: Session::new(),
            body: None,
            content_encoding: ContentEncoding::Identity,
            cookies: CookieJar::new(),
        }
    }
}

impl<C: Connection, K: Connect<Connection = C>> Client<C, K> {
    /// Wrap an established connection together with a connector used to
    /// follow redirects.
    pub fn with_connector(conn: C, connector: K) -> Self {
        Self {
            conn,
            connector: Some(connector),
            rx: ByteBuffer::new(),
            session: Session::new(),
            body: None,
            content_encoding: ContentEncoding::Identity,
            cookies: CookieJar::new(),
        }
    }

    /// Status code of the most recently parsed response.
    pub fn status(&self) -> u16 {
        self.session.status
    }

    /// Whether the connection may be reused for another request.
    pub fn keep_alive(&self) -> bool {
        self.session.flags.keep_connection
    }

    /// Whether the engine asks for the request to be resent (authentication
    /// retry, Expect retry, or a followed redirect).
    pub fn should_retry(&self) -> bool {
        self.session.flags.should_retry
    }

    /// Content encoding the server declared for the current response body.
    pub fn content_encoding(&self) -> ContentEncoding {
        self.content_encoding
    }

    /// Supply credentials for authenticated requests. They are sent once a
    /// `WWW-Authenticate` challenge has named a supported scheme.
    pub fn set_credentials(&mut self, username: &str, password: Option<&str>) -> Result<(), Error> {
        let username = heapless::String::try_from(username).map_err(|_| Error::BufferFull)?;
        let password = match password {
            Some(p) => Some(heapless::String::try_from(p).map_err(|_| Error::BufferFull)?),
            None => None,
        };
        self.session.auth.credentials = Some(Credentials { username, password });
        Ok(())
    }

    /// The client's cookie jar.
    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Mutable access to the cookie jar.
    pub fn cookies_mut(&mut self) -> &mut CookieJar {
        &mut self.cookies
    }

    /// Give back the underlying connection, discarding client state.
    pub fn into_inner(self) -> C {
        self.conn
    }
}
