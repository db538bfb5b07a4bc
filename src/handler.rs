use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// What a handler resolves to. `Err` is the equivalent of calling `next(err)`.
pub type HandlerResult = Result<(), Error>;

/// An asynchronous request handler.
///
/// A handler finishes the request by calling a terminal method on the
/// response, or simply resolves to let the chain continue.
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
    ) -> BoxFuture<'a, HandlerResult>;

    /// Type-erases this handler so it can be stored in a chain.
    fn boxed(self) -> BoxedHandler
    where
        Self: Sized,
    {
        Arc::new(self)
    }
}

/// A shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

impl Handler for BoxedHandler {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
    ) -> BoxFuture<'a, HandlerResult> {
        (**self).call(req, res)
    }

    fn boxed(self) -> BoxedHandler {
        self
    }
}

/// A handler created from a closure with [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

/// Creates a handler from a closure returning a boxed future.
///
/// ```rust
/// use pathway::handler_fn;
///
/// let hello = handler_fn(|req, res| {
///     Box::pin(async move {
///         let name = req.param("name").unwrap_or("world").to_owned();
///         res.send(format!("<h1>Hello, {}</h1>", name));
///         Ok(())
///     })
/// });
/// # let _ = hello;
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
    ) -> BoxFuture<'a, HandlerResult> {
        (self.f)(req, res)
    }
}

/// A handler that names the page it renders, created with [`aliased`].
#[derive(Clone)]
pub struct Aliased<H> {
    alias: String,
    handler: H,
}

impl<H> fmt::Debug for Aliased<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aliased")
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

/// Wraps `handler` so that it sets [`Request::alias`] before running.
///
/// The alias is reported back in [`Dispatched::alias`](crate::Dispatched::alias),
/// which is what [`Router::activate_nav_link`](crate::Router::activate_nav_link)
/// expects.
pub fn aliased<H: Handler>(alias: impl Into<String>, handler: H) -> Aliased<H> {
    Aliased {
        alias: alias.into(),
        handler,
    }
}

impl<H: Handler> Handler for Aliased<H> {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
    ) -> BoxFuture<'a, HandlerResult> {
        req.alias = Some(self.alias.clone());
        self.handler.call(req, res)
    }
}

/// Types that can be registered as a route's handler chain: a single handler
/// or a `Vec` of boxed handlers run in order.
pub trait IntoHandlers {
    fn into_handlers(self) -> Vec<BoxedHandler>;
}

impl<H: Handler> IntoHandlers for H {
    fn into_handlers(self) -> Vec<BoxedHandler> {
        vec![self.boxed()]
    }
}

impl IntoHandlers for Vec<BoxedHandler> {
    fn into_handlers(self) -> Vec<BoxedHandler> {
        self
    }
}
