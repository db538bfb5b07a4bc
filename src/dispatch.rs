use crate::environment::Environment;
use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::params::Params;
use crate::pattern::BasePattern;
use crate::request::Request;
use crate::response::Response;
use crate::router::{Router, RouterType};
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use std::sync::Arc;

const NOT_FOUND_HTML: &str = "<h1>404 Not Found</h1>";

/// The outcome of a single dispatch.
#[derive(Debug, Default)]
pub struct Dispatched {
    /// The URL that was dispatched, after base stripping and normalization.
    /// `None` when there was nothing to dispatch.
    pub url: Option<String>,
    /// Number of path routes that matched and ran.
    pub found: usize,
    /// A middleware handler finished the response and stopped the scan.
    pub halted: bool,
    /// Errors returned by handlers, or produced by the default error handler.
    pub errors: Vec<Error>,
    /// The request's alias when the dispatch ended.
    pub alias: Option<String>,
}

impl Dispatched {
    fn new(url: String) -> Self {
        Dispatched {
            url: Some(url),
            ..Dispatched::default()
        }
    }

    /// A dispatch that never started.
    pub(crate) fn skipped() -> Self {
        Dispatched::default()
    }

    pub fn is_skipped(&self) -> bool {
        self.url.is_none()
    }

    /// `true` if a route matched or a middleware finished the response.
    pub fn is_handled(&self) -> bool {
        self.found > 0 || self.halted
    }
}

/// Per-handler completion of one chain.
#[derive(Debug, Default)]
pub(crate) struct Settled {
    /// Whether each handler that ran made a terminal call on the response.
    pub(crate) finished: Vec<bool>,
    pub(crate) error: Option<Error>,
}

impl Settled {
    pub(crate) fn any_finished(&self) -> bool {
        self.finished.iter().any(|finished| *finished)
    }
}

/// Runs a handler chain in order, awaiting each handler before the next.
///
/// A handler that returns `Err` ends the chain.
pub(crate) async fn settled(
    handlers: &[BoxedHandler],
    req: &mut Request,
    res: &mut Response,
) -> Settled {
    let mut settled = Settled {
        finished: Vec::with_capacity(handlers.len()),
        error: None,
    };

    for handler in handlers {
        let before = res.terminal_calls();
        let result = handler.call(req, res).await;
        settled.finished.push(res.terminal_calls() > before);

        if let Err(err) = result {
            warn!("handler for '{}' failed: {}", req.url, err);
            settled.error = Some(err);
            break;
        }
    }

    settled
}

/// Resolves the URL a dispatch operates on, or `None` if there is nothing
/// to dispatch.
///
/// An empty `url` reads the host location in browser modes. The base must
/// prefix the URL; in hash mode it prefixes the fragment.
pub(crate) fn resolve_url(
    kind: RouterType,
    base: &str,
    base_pattern: &BasePattern,
    env: &dyn Environment,
    url: &str,
) -> Option<String> {
    let raw = if url.is_empty() {
        match kind {
            RouterType::Request => return None,
            RouterType::History => env.location().pathname,
            RouterType::Hash => {
                let location = env.location();
                let hash = if location.hash.is_empty() {
                    base
                } else {
                    location.hash.as_str()
                };
                format!("{}{}/", location.pathname, hash)
            }
        }
    } else {
        url.to_owned()
    };

    let stripped = if base == "/" || base == "#" {
        raw
    } else {
        let scoped = match kind {
            RouterType::Hash => raw.find('#').map_or(raw.as_str(), |i| &raw[i..]),
            _ => raw.as_str(),
        };

        match scoped.strip_prefix(base) {
            Some("") => "/".to_owned(),
            Some(rest) if rest.starts_with(|c: char| matches!(c, '/' | '#' | '?')) => {
                rest.to_owned()
            }
            _ => {
                trace!("'{}' is outside of base '{}'", raw, base);
                return None;
            }
        }
    };

    let mut url = base_pattern.normalize(&stripped).unwrap_or(stripped);
    if url == base {
        url = "/".to_owned();
    }

    if url.is_empty() {
        None
    } else {
        Some(url)
    }
}

impl Router {
    pub(crate) fn effective_url(&self, url: &str) -> Option<String> {
        resolve_url(
            self.kind,
            &self.base,
            &self.base_pattern,
            self.env.as_ref(),
            url,
        )
    }

    /// Dispatches a request through the route table.
    ///
    /// An empty `req.url` dispatches the current location in browser modes
    /// and does nothing in request mode. On return `req.url` holds the
    /// normalized URL, and `req.params` the parameters of the last matching
    /// route, accumulated over every match.
    pub async fn navigate(&self, req: &mut Request, res: &mut Response) -> Dispatched {
        let url = match self.effective_url(&req.url) {
            Some(url) => url,
            None => {
                trace!("nothing to dispatch for '{}'", req.url);
                return Dispatched::skipped();
            }
        };

        req.url = url.clone();
        self.current_route.store(Some(Arc::new(url.clone())));

        let mut outcome = Dispatched::new(url.clone());
        let mut params = Params::new();

        for (index, route) in self.routes.iter().enumerate() {
            if let Some(alias) = &req.alias {
                route.set_alias(alias);
            }

            if route.is_middleware() {
                if route.handlers.is_empty() {
                    continue;
                }

                req.route = Some(route.info(index));
                req.pattern = None;

                let chain = settled(&route.handlers, req, res).await;
                let finished = chain.any_finished();
                outcome.errors.extend(chain.error);
                if let Some(alias) = &req.alias {
                    route.set_alias(alias);
                }

                if finished {
                    debug!("{} {} finished by middleware #{}", req.method, url, index);
                    outcome.halted = true;
                    outcome.alias = req.alias.clone();
                    return outcome;
                }

                continue;
            }

            let pattern = match route.pattern() {
                Some(pattern) if route.allows(&req.method) => pattern,
                _ => continue,
            };

            let values = match pattern.find(&url) {
                Some(values) => values,
                None => continue,
            };

            trace!("{} {} matched '{}'", req.method, url, pattern);

            for (key, value) in pattern.keys().iter().zip(values) {
                params.insert(key.as_str(), value);
            }

            req.params = params.clone();
            req.route = Some(route.info(index));
            req.pattern = Some(pattern.as_str().to_owned());

            let chain = settled(&route.handlers, req, res).await;
            outcome.errors.extend(chain.error);
            outcome.found += 1;

            if let Some(alias) = &req.alias {
                route.set_alias(alias);
            }
        }

        if outcome.found == 0 {
            self.not_found(req, res, &mut outcome).await;
        }

        outcome.alias = req.alias.clone();

        debug!(
            "{} {} dispatched to {} route(s)",
            req.method, url, outcome.found
        );

        outcome
    }

    async fn not_found(&self, req: &mut Request, res: &mut Response, outcome: &mut Dispatched) {
        if let Some(handler) = &self.error_handler {
            if let Err(err) = handler.call(req, res).await {
                warn!("error handler for '{}' failed: {}", req.url, err);
                outcome.errors.push(err);
            }
            return;
        }

        error!("routing error: no route for {} {}", req.method, req.url);

        if self.kind.is_browser() {
            if let Some(entrypoint) = self.config.entrypoint() {
                self.env.set_content(&entrypoint, NOT_FOUND_HTML);
            }

            outcome.errors.push(Error::NotFound {
                url: req.url.clone(),
            });
            return;
        }

        if !res.headers_sent() {
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
            res.write_head(StatusCode::NOT_FOUND, headers);
        }

        if !res.is_ended() {
            res.end(NOT_FOUND_HTML);
        }
    }
}
