//! `Router` matches paths against registered patterns and runs their handler
//! chains, in browsers and on servers alike.
//!
//! Routes are kept in registration order. A dispatch walks every entry:
//! middleware always runs, and every path route whose pattern and method
//! match runs too, so a catch-all and a specific route registered for the
//! same URL both execute. A middleware handler that finishes the response
//! stops the walk. When nothing matched, the error handler runs.
//!
//! ```rust
//! use pathway::{handler_fn, Response, Router};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::server("/")?;
//!
//! router
//!     .get("/", handler_fn(|_, res| Box::pin(async move {
//!         res.send("<h1>Home</h1>");
//!         Ok(())
//!     })))?
//!     .get("/user/:id", handler_fn(|req, res| Box::pin(async move {
//!         let id = req.param("id").unwrap_or_default().to_owned();
//!         res.send(format!("<h1>User {}</h1>", id));
//!         Ok(())
//!     })))?;
//!
//! let mut res = Response::new();
//! let dispatched = router.route("/user/42", &mut res).await;
//!
//! assert_eq!(dispatched.found, 1);
//! assert_eq!(res.body(), "<h1>User 42</h1>");
//! # Ok(())
//! # }
//! ```
//!
//! The patterns a route can use:
//! ```ignore
//!  Syntax    Type
//!  name      literal segment
//!  :name     named parameter
//!  :name?    optional parameter
//!  *         the rest of the path, possibly empty
//!  *name     the rest of the path, captured as `name`
//! ```
//!
//! Named parameters match one segment. A parameter can carry a literal
//! suffix that the segment must end with:
//! ```ignore
//!  Path: /files/:name.js
//!
//!  /files/app.js        match: name="app"
//!  /files/app.css       no match
//!  /files/app.js/       match: name="app"
//! ```
use crate::config::Config;
use crate::dispatch::{resolve_url, Dispatched};
use crate::environment::{Capabilities, Environment, EventKind, NavLinks, ServerEnvironment};
use crate::error::PatternError;
use crate::handler::{BoxedHandler, Handler, IntoHandlers};
use crate::intercept::{intercept, ClickEvent};
use crate::pattern::{BasePattern, Pattern};
use crate::request::{Request, RouteInfo};
use crate::response::Response;
use crate::signal::{Signal, Subscription};
use crate::table::{Route, RouteTable};
use arc_swap::ArcSwapOption;
use http::Method;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Where navigations come from. Chosen once, when the router is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterType {
    /// Browser history API, driven by `popstate`.
    History,
    /// The location hash, driven by `hashchange`. Selected by a base starting with `#`.
    Hash,
    /// No browser: every dispatch is fed an explicit request.
    Request,
}

impl RouterType {
    pub fn select(base: &str, capabilities: Capabilities) -> RouterType {
        if !capabilities.is_browser() {
            RouterType::Request
        } else if base.starts_with('#') {
            RouterType::Hash
        } else {
            RouterType::History
        }
    }

    /// The navigation event listened for, `None` for request routers.
    pub fn event(&self) -> Option<EventKind> {
        match self {
            RouterType::History => Some(EventKind::PopState),
            RouterType::Hash => Some(EventKind::HashChange),
            RouterType::Request => None,
        }
    }

    pub fn is_browser(&self) -> bool {
        *self != RouterType::Request
    }
}

/// An event forwarded by the host while the router is listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    PopState,
    HashChange,
    Click(ClickEvent),
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::PopState => EventKind::PopState,
            HostEvent::HashChange => EventKind::HashChange,
            HostEvent::Click(_) => EventKind::Click,
        }
    }
}

/// An ordered route table with middleware, base path handling and
/// client-side navigation.
pub struct Router {
    pub(crate) base: String,
    pub(crate) base_pattern: BasePattern,
    pub(crate) kind: RouterType,
    pub(crate) env: Arc<dyn Environment>,
    pub(crate) routes: RouteTable,
    pub(crate) config: Config,
    pub(crate) error_handler: Option<BoxedHandler>,
    pub(crate) current_route: Arc<ArcSwapOption<String>>,
    reroute: Option<Signal<Request>>,
    reroute_off: ArcSwapOption<Subscription>,
    listening: AtomicBool,
}

impl Router {
    /// Creates a router mounted at `base` in the given host.
    ///
    /// The router type is derived from the host's capabilities and the base:
    /// request-driven hosts get [`RouterType::Request`], browsers get
    /// [`RouterType::Hash`] for a base starting with `#` and
    /// [`RouterType::History`] otherwise.
    pub fn new(base: &str, env: Arc<dyn Environment>) -> Result<Router, PatternError> {
        let kind = RouterType::select(base, env.capabilities());
        let base_pattern = BasePattern::new(base)?;

        let reroute = kind.is_browser().then(|| {
            Signal::new(Request {
                url: base.to_owned(),
                state: env.history_state(),
                ..Request::default()
            })
        });

        debug!("created {:?} router at '{}'", kind, base);

        Ok(Router {
            base: base.to_owned(),
            base_pattern,
            kind,
            env,
            routes: RouteTable::new(),
            config: Config::new(),
            error_handler: None,
            current_route: Arc::new(ArcSwapOption::empty()),
            reroute,
            reroute_off: ArcSwapOption::empty(),
            listening: AtomicBool::new(false),
        })
    }

    /// Creates a request-driven router for use behind an HTTP server.
    pub fn server(base: &str) -> Result<Router, PatternError> {
        Router::new(base, Arc::new(ServerEnvironment))
    }

    /// Replaces the configuration with a shared handle.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Overrides the handler run when no route matches.
    pub fn error_handler(&mut self, handler: impl Handler) -> &mut Self {
        self.error_handler = Some(handler.boxed());
        self
    }

    pub fn router_type(&self) -> RouterType {
        self.kind
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn environment(&self) -> &Arc<dyn Environment> {
        &self.env
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.routes
    }

    /// Describes every registered entry in order.
    pub fn routes(&self) -> impl Iterator<Item = RouteInfo> + '_ {
        self.routes
            .iter()
            .enumerate()
            .map(|(index, route)| route.info(index))
    }

    /// The URL of the last dispatch, after base stripping.
    pub fn current_route(&self) -> Option<String> {
        self.current_route.load_full().map(|url| url.to_string())
    }

    /// Registers handlers that run on every dispatch, regardless of path
    /// and method.
    pub fn middleware(&mut self, handlers: impl IntoHandlers) -> &mut Self {
        let handlers = handlers.into_handlers();
        debug!("registered middleware with {} handler(s)", handlers.len());
        self.routes.push(Route::middleware(handlers));
        self
    }

    /// Registers a path route. A `None` method accepts every method.
    pub fn register_route(
        &mut self,
        method: Option<Method>,
        pattern: &str,
        handlers: impl IntoHandlers,
    ) -> Result<&mut Self, PatternError> {
        let pattern = Pattern::compile(pattern)?;
        Ok(self.push_path(pattern, method, handlers))
    }

    fn push_path(
        &mut self,
        pattern: Pattern,
        method: Option<Method>,
        handlers: impl IntoHandlers,
    ) -> &mut Self {
        debug!(
            "registered {} {}",
            method.as_ref().map_or("*", Method::as_str),
            pattern
        );
        self.routes
            .push(Route::path(pattern, method, handlers.into_handlers()));
        self
    }

    /// Registers a path route for `GET`.
    pub fn use_path(
        &mut self,
        pattern: &str,
        handlers: impl IntoHandlers,
    ) -> Result<&mut Self, PatternError> {
        self.register_route(Some(Method::GET), pattern, handlers)
    }

    /// Registers a path route for every method.
    pub fn any(
        &mut self,
        pattern: &str,
        handlers: impl IntoHandlers,
    ) -> Result<&mut Self, PatternError> {
        self.register_route(None, pattern, handlers)
    }

    /// Registers a route for every method that matches any path starting
    /// with `pattern`'s segments.
    pub fn mount(
        &mut self,
        pattern: &str,
        handlers: impl IntoHandlers,
    ) -> Result<&mut Self, PatternError> {
        let pattern = Pattern::compile_loose(pattern)?;
        Ok(self.push_path(pattern, None, handlers))
    }

    /// Register a handler for GET requests
    pub fn get(
        &mut self,
        pattern: &str,
        handlers: impl IntoHandlers,
    ) -> Result<&mut Self, PatternError> {
        self.register_route(Some(Method::GET), pattern, handlers)
    }

    /// Register a handler for POST requests
    pub fn post(
        &mut self,
        pattern: &str,
        handlers: impl IntoHandlers,
    ) -> Result<&mut Self, PatternError> {
        self.register_route(Some(Method::POST), pattern, handlers)
    }

    /// Register a handler for PUT requests
    pub fn put(
        &mut self,
        pattern: &str,
        handlers: impl IntoHandlers,
    ) -> Result<&mut Self, PatternError> {
        self.register_route(Some(Method::PUT), pattern, handlers)
    }

    /// Register a handler for PATCH requests
    pub fn patch(
        &mut self,
        pattern: &str,
        handlers: impl IntoHandlers,
    ) -> Result<&mut Self, PatternError> {
        self.register_route(Some(Method::PATCH), pattern, handlers)
    }

    /// Register a handler for DELETE requests
    pub fn delete(
        &mut self,
        pattern: &str,
        handlers: impl IntoHandlers,
    ) -> Result<&mut Self, PatternError> {
        self.register_route(Some(Method::DELETE), pattern, handlers)
    }

    /// The router's configuration. Clone it to share with handlers.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stores a configuration value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.config.set(key, value);
        self
    }

    /// Reads a configuration value.
    pub fn get_config(&self, key: &str) -> Option<Value> {
        self.config.get(key)
    }

    /// Marks the navigation link for `alias` as active, typically with the
    /// [`alias`](Dispatched::alias) of the last dispatch. Does nothing
    /// outside a browser.
    pub fn activate_nav_link(&self, alias: &str, links: &NavLinks) {
        if !self.kind.is_browser() {
            trace!("no document to activate '{}' in", alias);
            return;
        }

        self.env.activate_nav_link(alias, links);
    }

    /// Routes a URL or request.
    ///
    /// Request routers dispatch immediately. Browser routers publish the
    /// navigation on their reroute signal, which writes history while the
    /// router is listening, then dispatch. A browser router that is not
    /// listening does nothing.
    pub async fn route(&self, target: impl Into<Request>, res: &mut Response) -> Dispatched {
        let mut req = target.into();

        let reroute = match &self.reroute {
            Some(reroute) => reroute,
            None => return self.navigate(&mut req, res).await,
        };

        reroute.set(req.clone());

        if !self.is_listening() {
            debug!("router is not listening, ignoring navigation to '{}'", req.url);
            return Dispatched::skipped();
        }

        self.navigate(&mut req, res).await
    }

    /// Starts handling navigation and dispatches `initial`.
    ///
    /// Browser routers register their navigation event and document clicks
    /// with the host and start writing history. Request routers simply
    /// dispatch, so `listen` can serve as the per-request entry point.
    pub async fn listen(&self, initial: impl Into<Request>, res: &mut Response) -> Dispatched {
        if let (Some(event), Some(reroute)) = (self.kind.event(), &self.reroute) {
            if !self.listening.swap(true, Ordering::SeqCst) {
                self.env.add_event_listener(event);
                self.env.add_event_listener(EventKind::Click);

                let env = self.env.clone();
                let current = self.current_route.clone();
                let (kind, base, base_pattern) =
                    (self.kind, self.base.clone(), self.base_pattern.clone());
                let subscription = reroute.on(move |req: &Request, _| {
                    if req.url.is_empty() {
                        return;
                    }

                    // `current` holds the url with the base stripped.
                    let target = resolve_url(kind, &base, &base_pattern, env.as_ref(), &req.url);
                    let last = current.load();
                    let same = last.as_deref().map(String::as_str);
                    if target.is_some() && target.as_deref() == same {
                        env.replace_state(&req.state, &req.url);
                    } else {
                        env.push_state(&req.state, &req.url);
                    }
                });

                self.reroute_off.store(Some(Arc::new(subscription)));
                debug!("listening for {} and click", event);
            }
        }

        self.route(initial, res).await
    }

    /// Stops handling navigation. Calling it again has no effect.
    pub fn unlisten(&self) -> &Self {
        if let (Some(event), Some(reroute)) = (self.kind.event(), &self.reroute) {
            if self.listening.swap(false, Ordering::SeqCst) {
                self.env.remove_event_listener(event);
                self.env.remove_event_listener(EventKind::Click);

                if let Some(subscription) = self.reroute_off.swap(None) {
                    reroute.off(*subscription);
                }
                debug!("stopped listening for {} and click", event);
            }
        }

        self
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Handles an event forwarded by the host.
    ///
    /// Returns `None` when the event was not for this router. For clicks,
    /// `Some` means the link was intercepted and the host must prevent the
    /// browser's default navigation.
    pub async fn handle_event(&self, event: &HostEvent, res: &mut Response) -> Option<Dispatched> {
        if !self.is_listening() {
            return None;
        }

        match event {
            HostEvent::PopState | HostEvent::HashChange => {
                if self.kind.event() != Some(event.kind()) {
                    return None;
                }

                let mut req = Request::default();
                Some(self.navigate(&mut req, res).await)
            }
            HostEvent::Click(click) => {
                let host = self.env.location().host;
                let href = intercept(click, &self.base, &self.base_pattern, &host)?.to_owned();

                trace!("intercepted click on '{}'", href);
                Some(self.route(href, res).await)
            }
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("base", &self.base)
            .field("type", &self.kind)
            .field("routes", &self.routes)
            .field("listening", &self.is_listening())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_type_selection() {
        let browser = Capabilities::BROWSER;
        assert_eq!(RouterType::select("/", browser), RouterType::History);
        assert_eq!(RouterType::select("#", browser), RouterType::Hash);
        assert_eq!(RouterType::select("#", Capabilities::SERVER), RouterType::Request);

        let headless = Capabilities {
            history: true,
            document: false,
            request_driven: false,
        };
        assert_eq!(RouterType::select("/", headless), RouterType::Request);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let mut router = Router::server("/").unwrap();
        let noop = crate::handler_fn(|_, _| Box::pin(async { Ok(()) }));

        assert!(router.get("/users/{id}", noop).is_err());
        assert_eq!(router.route_table().len(), 0);
    }

    #[test]
    fn introspection() {
        let mut router = Router::server("/").unwrap();
        let noop = crate::handler_fn(|_, _| Box::pin(async { Ok(()) }));

        router.middleware(noop.clone());
        router.post("/tasks", noop).unwrap();

        let routes: Vec<_> = router.routes().collect();
        assert!(routes[0].middleware);
        assert_eq!(routes[1].pattern.as_deref(), Some("/tasks"));
        assert_eq!(routes[1].method, Some(Method::POST));
    }
}
