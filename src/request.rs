use crate::params::Params;
use http::Method;
use serde_json::Value;

/// A lightweight description of a route table entry, attached to the request
/// before the entry's handlers run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// Position in the route table.
    pub index: usize,
    /// The pattern as registered, `None` for middleware.
    pub pattern: Option<String>,
    /// The method the entry is restricted to, `None` for any method.
    pub method: Option<Method>,
    /// Whether the entry runs on every dispatch regardless of path.
    pub middleware: bool,
    /// The alias last recorded on the entry, see [`Request::alias`].
    pub alias: Option<String>,
}

/// The mutable record passed through a dispatch.
///
/// `url` is rewritten in place as the router strips its base path, and
/// `params`, `route` and `pattern` are filled in as entries match.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// The URL to dispatch. Leave empty in browser modes to dispatch the
    /// current location.
    pub url: String,
    pub params: Params,
    pub route: Option<RouteInfo>,
    pub pattern: Option<String>,
    /// History state carried by client-side navigations.
    pub state: Value,
    /// A name for the page being dispatched, usually set by an
    /// [`aliased`](crate::aliased) handler. Once set, every entry scanned
    /// afterwards records it.
    pub alias: Option<String>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Request {
            method,
            url: url.into(),
            ..Request::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Request::new(Method::GET, url)
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = state;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Shorthand for `self.params.get(key)`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }
}

impl Default for Request {
    fn default() -> Self {
        Request {
            method: Method::GET,
            url: String::new(),
            params: Params::new(),
            route: None,
            pattern: None,
            state: Value::Null,
            alias: None,
        }
    }
}

impl From<&str> for Request {
    fn from(url: &str) -> Self {
        Request::get(url)
    }
}

impl From<String> for Request {
    fn from(url: String) -> Self {
        Request::get(url)
    }
}

impl<B> From<&http::Request<B>> for Request {
    fn from(req: &http::Request<B>) -> Self {
        Request::new(req.method().clone(), req.uri().path())
    }
}
