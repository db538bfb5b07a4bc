use crate::handler::BoxedHandler;
use crate::pattern::Pattern;
use crate::request::RouteInfo;
use arc_swap::ArcSwapOption;
use http::Method;
use std::fmt;
use std::sync::Arc;

/// A registered entry: middleware, or a compiled path route.
pub struct Route {
    pub(crate) pattern: Option<Pattern>,
    pub(crate) method: Option<Method>,
    pub(crate) handlers: Vec<BoxedHandler>,
    pub(crate) middleware: bool,
    // Written during dispatches, which only hold a shared reference.
    alias: ArcSwapOption<String>,
}

impl Route {
    pub(crate) fn middleware(handlers: Vec<BoxedHandler>) -> Self {
        Route {
            pattern: None,
            method: None,
            handlers,
            middleware: true,
            alias: ArcSwapOption::empty(),
        }
    }

    pub(crate) fn path(
        pattern: Pattern,
        method: Option<Method>,
        handlers: Vec<BoxedHandler>,
    ) -> Self {
        Route {
            pattern: Some(pattern),
            method,
            handlers,
            middleware: false,
            alias: ArcSwapOption::empty(),
        }
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    pub fn is_middleware(&self) -> bool {
        self.middleware
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// The alias of the last request that reached this entry with one set.
    pub fn alias(&self) -> Option<String> {
        self.alias.load_full().map(|alias| alias.to_string())
    }

    pub(crate) fn set_alias(&self, alias: &str) {
        if self.alias.load().as_deref().map(String::as_str) != Some(alias) {
            self.alias.store(Some(Arc::new(alias.to_owned())));
        }
    }

    /// `true` if the entry accepts the method: unrestricted entries accept all.
    pub(crate) fn allows(&self, method: &Method) -> bool {
        match &self.method {
            Some(allowed) => allowed == method,
            None => true,
        }
    }

    pub(crate) fn info(&self, index: usize) -> RouteInfo {
        RouteInfo {
            index,
            pattern: self.pattern.as_ref().map(|p| p.as_str().to_owned()),
            method: self.method.clone(),
            middleware: self.middleware,
            alias: self.alias(),
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_ref().map(Pattern::as_str))
            .field("method", &self.method)
            .field("handlers", &self.handlers.len())
            .field("middleware", &self.middleware)
            .field("alias", &self.alias())
            .finish()
    }
}

/// Registered routes in insertion order.
///
/// The order is both the middleware execution order and the path route
/// evaluation order; nothing is reordered by specificity.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }
}
