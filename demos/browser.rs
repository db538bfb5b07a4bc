use std::sync::Arc;

use pathway::{
    handler_fn, Anchor, ClickEvent, Environment, HostEvent, MemoryEnvironment, Request, Response,
    Router,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = Arc::new(MemoryEnvironment::new("localhost", "/"));
    let mut router = Router::new("/", env.clone())?;
    router.set("entrypoint", "app");

    router.get(
        "/",
        handler_fn(|_, res| {
            Box::pin(async move {
                res.send("<h1>Home</h1>");
                Ok(())
            })
        }),
    )?;

    router.get(
        "/docs/*page",
        handler_fn(|req, res| {
            Box::pin(async move {
                let page = req.param("page").unwrap_or("index").to_owned();
                res.send(format!("<h1>Docs: {}</h1>", page));
                Ok(())
            })
        }),
    )?;

    let mut res = Response::new();
    router.listen(Request::default(), &mut res).await;
    println!("{} -> {}", env.location().pathname, res.body());

    // clicking a same-origin link navigates without leaving the page
    let click = ClickEvent::on(Anchor::new("/docs/guide/routing", "localhost"));
    let mut res = Response::new();
    if router.handle_event(&HostEvent::Click(click), &mut res).await.is_some() {
        println!("{} -> {}", env.location().pathname, res.body());
    }

    // back button
    env.visit("/");
    let mut res = Response::new();
    router.handle_event(&HostEvent::PopState, &mut res).await;
    println!("{} -> {}", env.location().pathname, res.body());

    // nothing matches, so the default error content lands in the entrypoint
    let mut res = Response::new();
    let dispatched = router.route("/missing", &mut res).await;
    for err in &dispatched.errors {
        println!("{}", err);
    }
    println!("#app: {:?}", env.content("app"));

    for entry in env.history() {
        println!("{:?} {}", entry.op, entry.url);
    }

    router.unlisten();
    Ok(())
}
