//! The host a router runs in.
//!
//! Instead of probing globals, a router is handed an [`Environment`] that
//! describes what the host can do and performs the few browser side effects
//! the router needs: reading the location, writing history entries,
//! registering event listeners and replacing the entrypoint's content.
//!
//! [`ServerEnvironment`] is the request-driven host. [`MemoryEnvironment`] is
//! an in-memory browser that records every side effect, for headless use and
//! tests.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What the host provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// A history API is available.
    pub history: bool,
    /// A document is available for event listeners and content.
    pub document: bool,
    /// Every dispatch is fed an explicit request by the host.
    pub request_driven: bool,
}

impl Capabilities {
    pub const BROWSER: Capabilities = Capabilities {
        history: true,
        document: true,
        request_driven: false,
    };

    pub const SERVER: Capabilities = Capabilities {
        history: false,
        document: false,
        request_driven: true,
    };

    pub fn is_browser(&self) -> bool {
        self.history && self.document && !self.request_driven
    }
}

/// Events a router subscribes to while listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    PopState,
    HashChange,
    Click,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PopState => "popstate",
            EventKind::HashChange => "hashchange",
            EventKind::Click => "click",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of the current location a router reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub pathname: String,
    /// Includes the leading `#`, or is empty.
    pub hash: String,
    pub host: String,
}

impl Location {
    /// Splits `path#hash` into a location on the given host.
    pub fn parse(host: impl Into<String>, url: &str) -> Location {
        let (pathname, hash) = match url.find('#') {
            Some(i) => url.split_at(i),
            None => (url, ""),
        };

        Location {
            pathname: if pathname.is_empty() { "/" } else { pathname }.to_owned(),
            hash: hash.to_owned(),
            host: host.into(),
        }
    }
}

/// Host side effects. Everything but [`capabilities`](Environment::capabilities)
/// defaults to a no-op, which is all a request-driven host needs.
pub trait Environment: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    fn location(&self) -> Location {
        Location::default()
    }

    fn history_state(&self) -> Value {
        Value::Null
    }

    fn push_state(&self, _state: &Value, _url: &str) {}

    fn replace_state(&self, _state: &Value, _url: &str) {}

    fn add_event_listener(&self, _event: EventKind) {}

    fn remove_event_listener(&self, _event: EventKind) {}

    /// Replaces the content of the element identified by `entrypoint`.
    fn set_content(&self, _entrypoint: &str, _html: &str) {}

    /// Moves `links.active_class` from every link matching
    /// `links.nav_selector` to the link for `alias`.
    fn activate_nav_link(&self, _alias: &str, _links: &NavLinks) {}
}

/// Selectors that locate navigation links in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLinks {
    pub active_class: String,
    /// Links that currently carry the active class.
    pub nav_selector: String,
    /// The link for the current page. Defaults to `[data-alias=ALIAS]`.
    pub current_selector: Option<String>,
}

impl NavLinks {
    pub fn current_selector(&self, alias: &str) -> String {
        match &self.current_selector {
            Some(selector) => selector.clone(),
            None => format!("[data-alias={}]", alias),
        }
    }
}

impl Default for NavLinks {
    fn default() -> Self {
        NavLinks {
            active_class: "active".to_owned(),
            nav_selector: "aside nav a.active".to_owned(),
            current_selector: None,
        }
    }
}

/// A request-driven host such as an HTTP server.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerEnvironment;

impl Environment for ServerEnvironment {
    fn capabilities(&self) -> Capabilities {
        Capabilities::SERVER
    }
}

/// How a history entry was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOp {
    Push,
    Replace,
}

/// A recorded history write.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub op: HistoryOp,
    pub url: String,
    pub state: Value,
}

#[derive(Debug, Default)]
struct MemoryState {
    location: Location,
    state: Value,
    history: Vec<HistoryEntry>,
    listeners: BTreeSet<EventKind>,
    content: HashMap<String, String>,
    // Class lists of the navigation links, keyed by `data-alias`.
    nav_links: BTreeMap<String, BTreeSet<String>>,
}

/// An in-memory browser.
///
/// History writes update the location the same way a browser would for
/// same-origin URLs, so a later dispatch without a URL sees the new path.
#[derive(Debug, Default)]
pub struct MemoryEnvironment {
    state: Mutex<MemoryState>,
}

impl MemoryEnvironment {
    /// A browser on `host`, currently showing `url`.
    pub fn new(host: &str, url: &str) -> Self {
        MemoryEnvironment {
            state: Mutex::new(MemoryState {
                location: Location::parse(host, url),
                ..MemoryState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves to `url` without writing history, as when the user presses back.
    pub fn visit(&self, url: &str) {
        let mut state = self.lock();
        let host = state.location.host.clone();
        state.location = Location::parse(host, url);
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.lock().history.clone()
    }

    pub fn listeners(&self) -> Vec<EventKind> {
        self.lock().listeners.iter().copied().collect()
    }

    pub fn content(&self, entrypoint: &str) -> Option<String> {
        self.lock().content.get(entrypoint).cloned()
    }

    /// Adds a navigation link with a `data-alias` attribute and no classes.
    pub fn add_nav_link(&self, alias: &str) {
        self.lock().nav_links.entry(alias.to_owned()).or_default();
    }

    /// The classes of the navigation link for `alias`.
    pub fn nav_link_classes(&self, alias: &str) -> Option<Vec<String>> {
        let state = self.lock();
        let classes = state.nav_links.get(alias)?;
        Some(classes.iter().cloned().collect())
    }

    fn write(&self, op: HistoryOp, state: &Value, url: &str) {
        let mut inner = self.lock();

        if let Some(hash) = url.strip_prefix('#') {
            inner.location.hash = format!("#{}", hash);
        } else {
            let host = inner.location.host.clone();
            inner.location = Location::parse(host, url);
        }

        inner.state = state.clone();
        inner.history.push(HistoryEntry {
            op,
            url: url.to_owned(),
            state: state.clone(),
        });
    }
}

impl Environment for MemoryEnvironment {
    fn capabilities(&self) -> Capabilities {
        Capabilities::BROWSER
    }

    fn location(&self) -> Location {
        self.lock().location.clone()
    }

    fn history_state(&self) -> Value {
        self.lock().state.clone()
    }

    fn push_state(&self, state: &Value, url: &str) {
        self.write(HistoryOp::Push, state, url);
    }

    fn replace_state(&self, state: &Value, url: &str) {
        self.write(HistoryOp::Replace, state, url);
    }

    fn add_event_listener(&self, event: EventKind) {
        self.lock().listeners.insert(event);
    }

    fn remove_event_listener(&self, event: EventKind) {
        self.lock().listeners.remove(&event);
    }

    fn set_content(&self, entrypoint: &str, html: &str) {
        self.lock()
            .content
            .insert(entrypoint.to_owned(), html.to_owned());
    }

    // Selectors are not interpreted: links are matched on their alias alone.
    fn activate_nav_link(&self, alias: &str, links: &NavLinks) {
        let mut state = self.lock();
        for classes in state.nav_links.values_mut() {
            classes.remove(&links.active_class);
        }
        if let Some(classes) = state.nav_links.get_mut(alias) {
            classes.insert(links.active_class.clone());
        }
    }
}
