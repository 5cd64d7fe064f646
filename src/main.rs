use anyhow::Context;
use hyper::{Body, Method, Request};
use log::info;
use rbind::controller::ENDPOINTS;
use rbind_core::response::body_to_string;

const DEFAULT_QUERY: &str = "username=hello&age=20";

/// Runs every handler against `GET <path>?<query>`, query is taken from
/// the first argument.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_QUERY.to_string());

    for (path, handler) in ENDPOINTS {
        let req = Request::builder()
            .method(Method::GET)
            .uri(format!("{}?{}", path, query))
            .body(Body::empty())
            .with_context(|| format!("could not build request for {}", path))?;

        let res = handler(req, log::logger());
        let status = res.status();
        info!("{} - {} {}", path, status, body_to_string(res)?);
    }

    Ok(())
}
