use anyhow::Context;
use hyper::{header::CONTENT_TYPE, Body, StatusCode};
use log::error;
use serde::Serialize;

use crate::error::BindingError;

pub type Response = hyper::Response<Body>;

/// Types that can be turned into an HTTP response by a handler.
pub trait Responder {
    fn into_response(self) -> anyhow::Result<Response>;
}

/// Responder implementation for '()', returns default Response (200, empty body).
impl Responder for () {
    fn into_response(self) -> anyhow::Result<Response> {
        Ok(Response::default())
    }
}

impl Responder for Response {
    fn into_response(self) -> anyhow::Result<Response> {
        Ok(self)
    }
}

/// Returns Response with self as a plain text body.
///
/// ```rust
/// fn handler() -> &'static str {
///     "ok"
/// }
/// ```
impl<'a> Responder for &'a str {
    fn into_response(self) -> anyhow::Result<Response> {
        text(StatusCode::OK, self.to_string())
    }
}

impl Responder for String {
    fn into_response(self) -> anyhow::Result<Response> {
        text(StatusCode::OK, self)
    }
}

/// Binding errors are the client's fault, body carries the reason.
impl Responder for BindingError {
    fn into_response(self) -> anyhow::Result<Response> {
        text(self.status(), self.to_string())
    }
}

/// Serializes wrapped value as a JSON body.
pub struct Json<T>(pub T);

impl<T> Responder for Json<T>
where
    T: Serialize,
{
    fn into_response(self) -> anyhow::Result<Response> {
        let body = serde_json::to_string(&self.0).context("could not serialize to string")?;

        Ok(hyper::Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))?)
    }
}

/// `BindingError` anywhere in the error gives 400, anything else gives 500.
impl<T> Responder for anyhow::Result<T>
where
    T: Responder,
{
    fn into_response(self) -> anyhow::Result<Response> {
        match self {
            Ok(r) => r.into_response(),
            Err(e) => match e.downcast::<BindingError>() {
                Ok(binding_error) => binding_error.into_response(),
                Err(e) => {
                    error!("handler failed: {:#}", e);
                    text(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
        }
    }
}

/// Turns responder into a response, failures while building one end up as
/// an empty 500.
pub fn respond<R: Responder>(responder: R) -> Response {
    match responder.into_response() {
        Ok(response) => response,
        Err(e) => {
            error!("could not build response: {:#}", e);
            let mut response = Response::default();
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

/// Reads whole body of a response.
pub fn body_to_string(response: Response) -> anyhow::Result<String> {
    let bytes = futures_executor::block_on(hyper::body::to_bytes(response.into_body()))?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

fn text(status: StatusCode, body: String) -> anyhow::Result<Response> {
    Ok(hyper::Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(body))?)
}
