use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1::Builder as ConnectionBuilder;
use hyper_util::rt::TokioIo;
use pathway::{handler_fn, Request, Response, Router};
use tokio::net::TcpListener;

async fn serve(
    router: Arc<Router>,
    req: hyper::Request<Incoming>,
) -> Result<hyper::Response<Full<Bytes>>, hyper::Error> {
    let mut res = Response::new();
    router.listen(Request::from(&req), &mut res).await;

    let (parts, body) = res.into_http().into_parts();
    Ok(hyper::Response::from_parts(parts, Full::new(Bytes::from(body))))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut router = Router::server("/")?;

    // every request
    router.middleware(handler_fn(|req, _| {
        Box::pin(async move {
            println!("{} {}", req.method, req.url);
            Ok(())
        })
    }));

    // GET /
    router.get(
        "/",
        handler_fn(|_, res| {
            Box::pin(async move {
                res.send("<h1>Hello, world!</h1>");
                Ok(())
            })
        }),
    )?;

    // GET /tasks/:id?
    router.get(
        "/tasks/:id?",
        handler_fn(|req, res| {
            Box::pin(async move {
                let body = serde_json::json!({ "id": req.param("id") });
                res.json(&body)?;
                Ok(())
            })
        }),
    )?;

    let listener = TcpListener::bind(("127.0.0.1", 3000)).await?;
    let router = Arc::new(router);

    loop {
        let router = router.clone();
        let (tcp, _) = listener.accept().await?;
        tokio::task::spawn(async move {
            if let Err(err) = ConnectionBuilder::new()
                .serve_connection(
                    TokioIo::new(tcp),
                    hyper::service::service_fn(|request| serve(router.clone(), request)),
                )
                .await
            {
                println!("Error serving connection: {:?}", err);
            }
        });
    }
}
