use std::fmt::Arguments;

use hyper::{Body, Request};
use indexmap::IndexMap;
use log::{Level, Log, Record};
use rbind_core::{
    binder::{bind_map, bind_object, BindField, FromParams},
    error::BindingError,
    field::{FieldSpec, FieldType},
    request::{split_request, FromRequest, Params},
    response::{respond, Json, Response},
    source::ParameterSource,
    BindParams,
};

use crate::hello::HelloData;

/// Signature shared by every handler. Logger is passed in by the caller.
pub type Handler = fn(Request<Body>, &dyn Log) -> Response;

/// Every handler with the path it is usually mounted on.
pub const ENDPOINTS: &[(&str, Handler)] = &[
    ("/request-param-v1", request_param_v1),
    ("/request-param-v2", request_param_v2),
    ("/request-param-v3", request_param_v3),
    ("/request-param-required", request_param_required),
    ("/request-param-default", request_param_default),
    ("/request-param-map", request_param_map),
    ("/model-attribute-v1", model_attribute_v1),
    ("/model-attribute-v2", model_attribute_v2),
];

const MEMBER_FIELDS: &[FieldSpec] = &[FieldSpec::string("username"), FieldSpec::integer("age")];

const REQUIRED_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("username"),
    FieldSpec::integer("age").optional(),
];

const DEFAULT_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("username").with_default("guest"),
    FieldSpec::integer("age").optional().with_default("-1"),
];

#[derive(Debug, BindParams)]
pub struct MemberParams {
    pub username: String,
    pub age: i32,
}

fn info(logger: &dyn Log, args: Arguments) {
    logger.log(
        &Record::builder()
            .args(args)
            .level(Level::Info)
            .target(module_path!())
            .build(),
    );
}

/// Parameters looked up and parsed by hand.
pub fn request_param_v1(req: Request<Body>, logger: &dyn Log) -> Response {
    respond(parse_by_hand(req, logger))
}

fn parse_by_hand(req: Request<Body>, logger: &dyn Log) -> anyhow::Result<String> {
    let (parts, source) = split_request(req)?;

    let username = source.first("username").unwrap_or("null");
    let raw_age = source
        .first("age")
        .ok_or_else(|| BindingError::MissingParameter {
            field: "age".into(),
        })?;
    let age: i32 = raw_age
        .parse()
        .map_err(|_| BindingError::TypeConversion {
            field: "age".into(),
            raw: raw_age.into(),
            expected: FieldType::Integer,
        })?;

    info(
        logger,
        format_args!("username={}, age={}, method={}", username, age, parts.method),
    );
    Ok(format!("ok ; {}{}  {}", username, age, parts.method))
}

/// Explicit field table, values land in differently named locals.
pub fn request_param_v2(req: Request<Body>, logger: &dyn Log) -> Response {
    respond(bind_by_table(req, logger))
}

fn bind_by_table(req: Request<Body>, logger: &dyn Log) -> anyhow::Result<&'static str> {
    let (parts, source) = split_request(req)?;
    let mut object = bind_object(&source, MEMBER_FIELDS)?;

    let member_name = String::from_value("username", object.take("username"))?;
    let member_age = i32::from_value("age", object.take("age"))?;

    info(
        logger,
        format_args!(
            "username={}, age={}, method={}",
            member_name, member_age, parts.method
        ),
    );
    Ok("ok")
}

/// Derived table, parameter names follow field names.
pub fn request_param_v3(req: Request<Body>, logger: &dyn Log) -> Response {
    respond(bind_by_derive(req, logger))
}

fn bind_by_derive(req: Request<Body>, logger: &dyn Log) -> anyhow::Result<&'static str> {
    let (parts, source) = split_request(req)?;
    let MemberParams { username, age } = MemberParams::bind_from(&source)?;

    info(
        logger,
        format_args!("username={}, age={}, method={}", username, age, parts.method),
    );
    Ok("ok")
}

/// `username` must be present, missing `age` is logged as null.
pub fn request_param_required(req: Request<Body>, logger: &dyn Log) -> Response {
    respond(bind_required(req, logger))
}

fn bind_required(req: Request<Body>, logger: &dyn Log) -> anyhow::Result<&'static str> {
    let (parts, source) = split_request(req)?;
    let mut object = bind_object(&source, REQUIRED_FIELDS)?;

    info(
        logger,
        format_args!(
            "username={}, age={}, method={}, uri={}",
            object.take("username"),
            object.take("age"),
            parts.method,
            parts.uri.path()
        ),
    );
    Ok("ok")
}

/// Absent or blank parameters fall back to `guest` and `-1`.
pub fn request_param_default(req: Request<Body>, logger: &dyn Log) -> Response {
    respond(bind_with_defaults(req, logger))
}

fn bind_with_defaults(req: Request<Body>, logger: &dyn Log) -> anyhow::Result<&'static str> {
    let (parts, source) = split_request(req)?;
    let mut object = bind_object(&source, DEFAULT_FIELDS)?;

    info(
        logger,
        format_args!(
            "username={}, age={}, method={}, uri={}",
            object.take("username"),
            object.take("age"),
            parts.method,
            parts.uri.path()
        ),
    );
    Ok("ok")
}

/// Whole parameter map, echoed back as JSON.
pub fn request_param_map(req: Request<Body>, logger: &dyn Log) -> Response {
    respond(bind_as_map(req, logger))
}

fn bind_as_map(
    req: Request<Body>,
    logger: &dyn Log,
) -> anyhow::Result<Json<IndexMap<String, String>>> {
    let (parts, source) = split_request(req)?;
    let map = bind_map(&source);

    info(
        logger,
        format_args!(
            "username={:?}, age={:?}, map={:?}, uri={}",
            map.get("username"),
            map.get("age"),
            map,
            parts.uri.path()
        ),
    );
    Ok(Json(map))
}

/// `HelloData` populated through its own field table and builder.
pub fn model_attribute_v1(req: Request<Body>, logger: &dyn Log) -> Response {
    respond(populate(req, logger))
}

fn populate(req: Request<Body>, logger: &dyn Log) -> anyhow::Result<&'static str> {
    let source = ParameterSource::from_request(req)?;
    let hello_data = HelloData::bind_from(&source)?;

    log_hello_data(logger, &hello_data);
    Ok("ok")
}

/// Same as `model_attribute_v1`, through the `Params` extractor.
pub fn model_attribute_v2(req: Request<Body>, logger: &dyn Log) -> Response {
    respond(extract(req, logger))
}

fn extract(req: Request<Body>, logger: &dyn Log) -> anyhow::Result<&'static str> {
    let Params(hello_data) = Params::<HelloData>::from_request(req)?;

    log_hello_data(logger, &hello_data);
    Ok("ok")
}

fn log_hello_data(logger: &dyn Log, hello_data: &HelloData) {
    info(
        logger,
        format_args!(
            "username={}, age={}",
            hello_data.username, hello_data.age
        ),
    );
}
