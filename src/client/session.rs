//! Per-exchange session state.
//!
//! All retry and reuse decisions flow through this record. It is owned by
//! the client and mutated only by the dispatcher and the retry
//! orchestrator; header-parsing code never touches `should_retry`.

use crate::client::auth::Auth;
use crate::client::url::Url;

/// Engine flags, one set per logical exchange.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Flags {
    /// The connection may be reused for a subsequent request. Cleared on
    /// every fatal parse or transport fault.
    pub keep_connection: bool,
    /// Recomputed exactly once per completed response by the orchestrator.
    pub should_retry: bool,
    /// A chunked request body is pending; informational responses must be
    /// surfaced to the caller instead of skipped.
    pub chunked_sending: bool,
    /// The server rejected `Expect: 100-continue`; do not send it again.
    pub no_expect: bool,
}

/// State that persists across the redirects and retries of one logical
/// HTTP exchange.
#[derive(Debug)]
pub(crate) struct Session {
    /// Status code of the most recently parsed response. 100 when nothing
    /// was received at all.
    pub status: u16,
    pub flags: Flags,
    /// Redirects followed so far in this exchange.
    pub redirect_count: u8,
    /// Authentication context, including the retried-once flag.
    pub auth: Auth,
    /// Target of a successfully followed redirect, pending a resend.
    pub redirect: Option<Url>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            status: 0,
            flags: Flags {
                keep_connection: true,
                should_retry: false,
                chunked_sending: false,
                no_expect: false,
            },
            redirect_count: 0,
            auth: Auth::new(),
            redirect: None,
        }
    }

    /// Reset the parts of the session scoped to a single exchange.
    ///
    /// `no_expect` is sticky: once a server has rejected the Expect
    /// precondition there is no point offering it again on this connection.
    pub fn begin_exchange(&mut self) {
        self.flags.should_retry = false;
        self.flags.chunked_sending = false;
        self.redirect_count = 0;
        self.auth.retried = false;
        self.redirect = None;
    }
}
