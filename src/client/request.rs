//! Request building, sending, and the top-level exchange loop.

use heapless::{String, Vec};

use crate::client::chunked::{self, write_all};
use crate::client::url::Url;
use crate::client::{
    Client, ContentEncoding, MAX_ATTEMPTS, MAX_BODY_LEN, MAX_HEADER_NAME_LEN,
    MAX_HEADER_VALUE_LEN, MAX_HEADERS, REQUEST_BUFFER_LEN,
};
use crate::error::Error;
use crate::transport::{Connect, Connection, Write as _};

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A request header.
#[derive(Debug, Clone)]
pub struct Header {
    /// Header name.
    pub name: String<MAX_HEADER_NAME_LEN>,
    /// Header value.
    pub value: String<MAX_HEADER_VALUE_LEN>,
}

/// An outgoing request.
pub struct Request<'a> {
    /// Request method.
    pub method: Method,
    /// Value for the `Host` header, e.g. `device.example.com` or
    /// `device.example.com:8080`.
    pub host: &'a str,
    /// Absolute request path.
    pub path: &'a str,
    /// Additional headers.
    pub headers: Vec<Header, MAX_HEADERS>,
    /// Inline body, sent with a `Content-Length` header. Use the chunked
    /// sending API for streamed bodies.
    pub body: Option<&'a [u8]>,
}

impl core::fmt::Debug for Request<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("host", &self.host)
            .field("path", &self.path)
            .field("body_len", &self.body.map(<[u8]>::len))
            .finish()
    }
}

/// A completed response.
#[derive(Debug)]
pub struct Response {
    /// The status code.
    pub status_code: u16,
    /// Compression the server declared for the body; the payload is
    /// returned as received.
    pub content_encoding: ContentEncoding,
    /// The collected body.
    pub body: Vec<u8, MAX_BODY_LEN>,
}

impl<C: Connection, K: Connect<Connection = C>> Client<C, K> {
    /// Perform one logical exchange: send the request, process the
    /// response, and resend as long as the engine asks for it (followed
    /// redirects, one authentication retry, one Expect retry).
    ///
    /// A 4xx/5xx answer surfaces as [`Error::ErrorStatus`] after its body
    /// has been drained; [`Client::status`] then tells the caller which.
    pub fn request(&mut self, request: &Request<'_>) -> Result<Response, Error> {
        self.session.begin_exchange();
        let mut target: Option<Url> = None;

        for _ in 0..MAX_ATTEMPTS {
            self.send_head(request, target.as_ref(), request.body)?;
            match self.receive_headers() {
                Ok(()) => return self.collect_response(),
                Err(Error::Redirected) if self.session.flags.should_retry => {
                    target = self.session.redirect.take();
                }
                Err(_) if self.session.flags.should_retry => {}
                Err(e) => return Err(e),
            }
        }
        Err(Error::TooManyRedirects)
    }

    /// Send the head of a chunked-body request and wait for the interim
    /// response. On success the caller streams the body with
    /// [`Client::send_chunk`] and completes the exchange with
    /// [`Client::finish_chunked`].
    ///
    /// Unless the server has previously rejected it, the head carries
    /// `Expect: 100-continue`; informational responses are *not* skipped
    /// here, so control returns to the caller on the `100 Continue`.
    pub fn start_chunked(&mut self, request: &Request<'_>) -> Result<(), Error> {
        self.session.begin_exchange();
        self.session.flags.chunked_sending = true;
        if let Err(e) = self.send_chunked_head(request) {
            self.session.flags.chunked_sending = false;
            return Err(e);
        }
        if !self.session.flags.no_expect {
            if let Err(e) = self.receive_headers() {
                self.session.flags.chunked_sending = false;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Send one chunk of a streamed request body. Empty chunks emit
    /// nothing.
    pub fn send_chunk(&mut self, data: &[u8]) -> Result<(), Error> {
        chunked::send_chunk(&mut self.conn, data, false)?;
        self.conn.flush().map_err(|_| Error::WriteError)
    }

    /// Terminate a streamed request body and receive the final response.
    pub fn finish_chunked(&mut self) -> Result<Response, Error> {
        chunked::send_chunk(&mut self.conn, &[], true)?;
        self.session.flags.chunked_sending = false;
        self.receive_headers()?;
        self.collect_response()
    }

    fn send_chunked_head(&mut self, request: &Request<'_>) -> Result<(), Error> {
        let mut out: Vec<u8, REQUEST_BUFFER_LEN> = Vec::new();
        self.build_head(&mut out, request, None)?;
        push(&mut out, b"Transfer-Encoding: chunked\r\n")?;
        if !self.session.flags.no_expect {
            push(&mut out, b"Expect: 100-continue\r\n")?;
        }
        push(&mut out, b"\r\n")?;
        write_all(&mut self.conn, &out)?;
        self.conn.flush().map_err(|_| Error::WriteError)
    }

    fn send_head(
        &mut self,
        request: &Request<'_>,
        target: Option<&Url>,
        body: Option<&[u8]>,
    ) -> Result<(), Error> {
        let mut out: Vec<u8, REQUEST_BUFFER_LEN> = Vec::new();
        self.build_head(&mut out, request, target)?;
        if let Some(body) = body {
            let mut length: String<20> = String::new();
            let _ = core::fmt::write(&mut length, format_args!("{}", body.len()));
            push(&mut out, b"Content-Length: ")?;
            push(&mut out, length.as_bytes())?;
            push(&mut out, b"\r\n\r\n")?;
            push(&mut out, body)?;
        } else {
            push(&mut out, b"\r\n")?;
        }
        write_all(&mut self.conn, &out)?;
        self.conn.flush().map_err(|_| Error::WriteError)
    }

    /// Request line and common headers, without the terminating empty
    /// line. `target` overrides the request's host and path after a
    /// followed redirect.
    fn build_head(
        &mut self,
        out: &mut Vec<u8, REQUEST_BUFFER_LEN>,
        request: &Request<'_>,
        target: Option<&Url>,
    ) -> Result<(), Error> {
        push(out, request.method.as_str().as_bytes())?;
        push(out, b" ")?;
        match target {
            Some(url) => push(out, url.path.as_bytes())?,
            None => push(out, request.path.as_bytes())?,
        }
        push(out, b" HTTP/1.1\r\n")?;

        push(out, b"Host: ")?;
        match target {
            Some(url) => push(out, url.host_header().as_bytes())?,
            None => push(out, request.host.as_bytes())?,
        }
        push(out, b"\r\n")?;

        let mut has_user_agent = false;
        for header in &request.headers {
            if header.name.eq_ignore_ascii_case("User-Agent") {
                has_user_agent = true;
            }
            push(out, header.name.as_bytes())?;
            push(out, b": ")?;
            push(out, header.value.as_bytes())?;
            push(out, b"\r\n")?;
        }
        if !has_user_agent {
            push(out, b"User-Agent: embhttp/0.1\r\n")?;
        }

        if self.session.auth.credentials.is_some()
            && self.session.auth.scheme != crate::client::auth::Scheme::None
        {
            let value = self.session.auth.authorization_value()?;
            push(out, b"Authorization: ")?;
            push(out, value.as_bytes())?;
            push(out, b"\r\n")?;
        }

        if !self.cookies.is_empty() {
            let mut value: String<MAX_HEADER_VALUE_LEN> = String::new();
            self.cookies.header_value(&mut value)?;
            push(out, b"Cookie: ")?;
            push(out, value.as_bytes())?;
            push(out, b"\r\n")?;
        }
        Ok(())
    }

    /// Collect the attached body into a fixed-capacity vector.
    pub(crate) fn collect_response(&mut self) -> Result<Response, Error> {
        let mut body: Vec<u8, MAX_BODY_LEN> = Vec::new();
        let mut scratch = [0u8; 256];
        loop {
            let got = self.read_body(&mut scratch)?;
            if got == 0 {
                break;
            }
            body.extend_from_slice(&scratch[..got])
                .map_err(|_| Error::BufferFull)?;
        }
        self.body = None;
        Ok(Response {
            status_code: self.session.status,
            content_encoding: self.content_encoding,
            body,
        })
    }
}

fn push(out: &mut Vec<u8, REQUEST_BUFFER_LEN>, bytes: &[u8]) -> Result<(), Error> {
    out.extend_from_slice(bytes).map_err(|_| Error::BufferFull)
}
