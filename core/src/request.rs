use anyhow::Context;
use bytes::Bytes;
use hyper::{
    header::CONTENT_TYPE,
    http::request::Parts,
    Body, Request,
};
use indexmap::IndexMap;

use crate::{
    binder::{bind_map, bind_multi_map, FromParams},
    source::ParameterSource,
};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Allows various types to be created from Request.
pub trait FromRequest<B>: Sized {
    fn from_request(req: Request<B>) -> anyhow::Result<Self>;
}

/// Splits request into its head and all of its parameters.
///
/// Query parameters come first, url-encoded form body parameters are
/// appended after them. Bodies with any other content type are ignored.
pub fn split_request(req: Request<Body>) -> anyhow::Result<(Parts, ParameterSource)> {
    let (parts, body) = req.into_parts();
    let mut source = ParameterSource::from_uri(&parts.uri)?;

    if is_form(&parts) {
        let bytes: Bytes = futures_executor::block_on(hyper::body::to_bytes(body))?;
        let form = std::str::from_utf8(&bytes).context("form body is not valid utf-8")?;
        source.extend_from_urlencoded(form)?;
    }

    Ok((parts, source))
}

fn is_form(parts: &Parts) -> bool {
    parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case(FORM_URLENCODED))
        .unwrap_or(false)
}

/// Raw access to request's parameters.
///
/// ```rust
/// use rbind_core::source::ParameterSource;
///
/// fn handler(source: ParameterSource) {}
/// ```
impl FromRequest<Body> for ParameterSource {
    fn from_request(req: Request<Body>) -> anyhow::Result<Self> {
        let (_, source) = split_request(req)?;
        Ok(source)
    }
}

/// Placeholder for value populated from request's parameters.
/// Binding errors are returned as `BindingError` inside `anyhow::Error`,
/// so the response layer can answer with 400.
///
/// ```rust
/// use rbind_core::BindParams;
/// use rbind_core::request::Params;
///
/// #[derive(BindParams)]
/// struct HelloData {
///     username: String,
///     age: i32,
/// }
///
/// fn handler(Params(data): Params<HelloData>) {}
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params<T>(pub T);

impl<T> FromRequest<Body> for Params<T>
where
    T: FromParams,
{
    fn from_request(req: Request<Body>) -> anyhow::Result<Self> {
        let source = ParameterSource::from_request(req)?;
        Ok(Params(T::bind_from(&source)?))
    }
}

/// Every parameter with its first value in arrival order, nothing validated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParamMap(pub IndexMap<String, String>);

impl FromRequest<Body> for ParamMap {
    fn from_request(req: Request<Body>) -> anyhow::Result<Self> {
        let source = ParameterSource::from_request(req)?;
        Ok(ParamMap(bind_map(&source)))
    }
}

/// Every parameter with all of its values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MultiParamMap(pub IndexMap<String, Vec<String>>);

impl FromRequest<Body> for MultiParamMap {
    fn from_request(req: Request<Body>) -> anyhow::Result<Self> {
        let source = ParameterSource::from_request(req)?;
        Ok(MultiParamMap(bind_multi_map(&source)))
    }
}
