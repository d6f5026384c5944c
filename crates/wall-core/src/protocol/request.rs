//! Request descriptor for one command round trip.
//!
//! An [`ApiRequest`] names everything a transport needs to perform a single
//! request/response cycle except the host: the verb, the resource path, and
//! the optional JSON body.  Keeping the host out of the descriptor lets the
//! same value be dispatched to the appliance and to the diagnostic mirror.

use std::fmt;

/// The four command verbs of the appliance API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Read a resource (`GET`).
    Fetch,
    /// Overwrite a resource (`PUT`).
    Replace,
    /// Create a resource or trigger an action (`POST`).
    Create,
    /// Delete a resource (`DELETE`).
    Remove,
}

impl Verb {
    /// HTTP method name for this verb.
    pub fn method(self) -> &'static str {
        match self {
            Verb::Fetch => "GET",
            Verb::Replace => "PUT",
            Verb::Create => "POST",
            Verb::Remove => "DELETE",
        }
    }

    /// Whether requests with this verb carry a body.
    pub fn carries_body(self) -> bool {
        matches!(self, Verb::Replace | Verb::Create)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// One command request, independent of the host it is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub verb: Verb,
    /// Path relative to `http://{host}/`.
    pub path: String,
    /// JSON body; `None` for fetch and remove.
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn fetch(path: impl Into<String>) -> Self {
        Self {
            verb: Verb::Fetch,
            path: path.into(),
            body: None,
        }
    }

    pub fn replace(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            verb: Verb::Replace,
            path: path.into(),
            body: Some(body.into()),
        }
    }

    pub fn create(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            verb: Verb::Create,
            path: path.into(),
            body: Some(body.into()),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            verb: Verb::Remove,
            path: path.into(),
            body: None,
        }
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Some(body) => write!(f, "{} {} {}", self.verb, self.path, body),
            None => write!(f, "{} {}", self.verb, self.path),
        }
    }
}
