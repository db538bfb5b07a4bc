//! An isomorphic URL router.
//!
//! The same route table serves browser navigation (history or hash based)
//! and server requests. Routes are matched in registration order, and
//! unlike most routers every matching route runs, not just the first.
//!
//! ```rust
//! use pathway::{handler_fn, Request, Response, Router};
//! use http::Method;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::server("/")?;
//!
//! router.middleware(handler_fn(|req, _| Box::pin(async move {
//!     log::info!("{} {}", req.method, req.url);
//!     Ok(())
//! })));
//!
//! router.post("/tasks/:id?", handler_fn(|req, res| Box::pin(async move {
//!     let id = req.param("id").map(str::to_owned);
//!     res.json(&serde_json::json!({ "id": id }))?;
//!     Ok(())
//! })))?;
//!
//! let mut res = Response::new();
//! router
//!     .route(Request::new(Method::POST, "/tasks/7"), &mut res)
//!     .await;
//!
//! assert_eq!(res.body(), r#"{"id":"7"}"#);
//! # Ok(())
//! # }
//! ```
//!
//! In a browser, the host forwards navigation events and document clicks
//! through [`Router::handle_event`] once [`Router::listen`] has been called.
//! [`MemoryEnvironment`] stands in for a browser in headless code and tests.
#![deny(clippy::all)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

mod config;
mod dispatch;
mod environment;
mod error;
mod handler;
mod intercept;
mod params;
mod pattern;
mod request;
mod response;
mod router;
mod signal;
mod table;

pub use config::{Config, ENTRYPOINT, LAYOUT};
pub use dispatch::Dispatched;
pub use environment::{
    Capabilities, Environment, EventKind, HistoryEntry, HistoryOp, Location, MemoryEnvironment,
    NavLinks, ServerEnvironment,
};
pub use error::{Error, PatternError};
pub use handler::{
    aliased, handler_fn, Aliased, BoxedHandler, Handler, HandlerFn, HandlerResult, IntoHandlers,
};
pub use intercept::{intercept, Anchor, ClickEvent};
pub use params::{Params, ParamsIter};
pub use pattern::{tokenize, BasePattern, Pattern, Token};
pub use request::{Request, RouteInfo};
pub use response::Response;
pub use router::{HostEvent, Router, RouterType};
pub use signal::{Signal, Subscription};
pub use table::{Route, RouteTable};
