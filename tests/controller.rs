use hyper::{header::CONTENT_TYPE, Body, Method, Request, StatusCode};
use rbind::controller::{
    model_attribute_v1, model_attribute_v2, request_param_default, request_param_map,
    request_param_required, request_param_v1, request_param_v2, request_param_v3, ENDPOINTS,
};
use tools::{CapturingLogger, TestCaseBuilder};


#[test]
fn test_request_param_v1() -> anyhow::Result<()> {
    TestCaseBuilder::new(
        "/request-param-v1?username=hello&age=20",
        Method::GET,
        request_param_v1,
    )
    .name("manual parsing")
    .result("ok ; hello20  GET")
    .log("username=hello, age=20, method=GET")
    .run()?;

    TestCaseBuilder::new("/request-param-v1?age=20", Method::GET, request_param_v1)
        .name("manual parsing, missing username")
        .result("ok ; null20  GET")
        .log("username=null, age=20, method=GET")
        .run()?;

    TestCaseBuilder::new("/request-param-v1?username=hello", Method::GET, request_param_v1)
        .name("manual parsing, missing age")
        .status(StatusCode::BAD_REQUEST)
        .result("required parameter 'age' is not present")
        .run()?;

    TestCaseBuilder::new(
        "/request-param-v1?username=hello&age=twenty",
        Method::GET,
        request_param_v1,
    )
    .name("manual parsing, invalid age")
    .status(StatusCode::BAD_REQUEST)
    .result(r#"parameter 'age' could not be converted to integer: "twenty""#)
    .run()?;

    Ok(())
}

#[test]
fn test_request_param_v2_and_v3() -> anyhow::Result<()> {
    for handler in [request_param_v2, request_param_v3] {
        TestCaseBuilder::new(
            "/request-param?username=hello&age=20",
            Method::POST,
            handler,
        )
        .name("field table")
        .result("ok")
        .log("username=hello, age=20, method=POST")
        .run()?;

        TestCaseBuilder::new("/request-param?age=20", Method::GET, handler)
            .name("field table, missing username")
            .status(StatusCode::BAD_REQUEST)
            .result("required parameter 'username' is not present")
            .run()?;
    }

    Ok(())
}

#[test]
fn test_request_param_from_form_body() -> anyhow::Result<()> {
    TestCaseBuilder::new("/request-param-v2", Method::POST, request_param_v2)
        .name("form body")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=kim&age=31"))
        .result("ok")
        .log("username=kim, age=31, method=POST")
        .run()?;

    Ok(())
}

#[test]
fn test_request_param_required() -> anyhow::Result<()> {
    TestCaseBuilder::new(
        "/request-param-required?username=kim",
        Method::GET,
        request_param_required,
    )
    .name("optional age")
    .result("ok")
    .log("username=kim, age=null, method=GET, uri=/request-param-required")
    .run()?;

    TestCaseBuilder::new(
        "/request-param-required?username=&age=",
        Method::GET,
        request_param_required,
    )
    .name("blank values")
    .result("ok")
    .log("username=, age=null, method=GET, uri=/request-param-required")
    .run()?;

    TestCaseBuilder::new(
        "/request-param-required?age=20",
        Method::GET,
        request_param_required,
    )
    .name("missing username")
    .status(StatusCode::BAD_REQUEST)
    .result("required parameter 'username' is not present")
    .run()?;

    Ok(())
}

#[test]
fn test_request_param_default() -> anyhow::Result<()> {
    for url in [
        "/request-param-default",
        "/request-param-default?username=&age=",
    ] {
        TestCaseBuilder::new(url, Method::GET, request_param_default)
            .name(url)
            .result("ok")
            .log("username=guest, age=-1, method=GET, uri=/request-param-default")
            .run()?;
    }

    TestCaseBuilder::new(
        "/request-param-default?username=kim&age=20",
        Method::GET,
        request_param_default,
    )
    .name("supplied values")
    .result("ok")
    .log("username=kim, age=20, method=GET, uri=/request-param-default")
    .run()?;

    TestCaseBuilder::new(
        "/request-param-default?age=abc",
        Method::GET,
        request_param_default,
    )
    .name("invalid age")
    .status(StatusCode::BAD_REQUEST)
    .result(r#"parameter 'age' could not be converted to integer: "abc""#)
    .run()?;

    Ok(())
}

#[test]
fn test_request_param_map() -> anyhow::Result<()> {
    TestCaseBuilder::new(
        "/request-param-map?username=a&age=1",
        Method::GET,
        request_param_map,
    )
    .name("map")
    .result(r#"{"username":"a","age":"1"}"#)
    .log(r#"username=Some("a"), age=Some("1"), map={"username": "a", "age": "1"}, uri=/request-param-map"#)
    .run()?;

    TestCaseBuilder::new(
        "/request-param-map?age=not-a-number",
        Method::GET,
        request_param_map,
    )
    .name("map does not validate")
    .result(r#"{"age":"not-a-number"}"#)
    .log(r#"username=None, age=Some("not-a-number"), map={"age": "not-a-number"}, uri=/request-param-map"#)
    .run()?;

    Ok(())
}

#[test]
fn test_model_attribute() -> anyhow::Result<()> {
    for handler in [model_attribute_v1, model_attribute_v2] {
        TestCaseBuilder::new("/model-attribute", Method::POST, handler)
            .name("form body")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=kim&age=31"))
            .result("ok")
            .log("username=kim, age=31")
            .run()?;

        TestCaseBuilder::new("/model-attribute", Method::GET, handler)
            .name("empty object")
            .result("ok")
            .log("username=, age=0")
            .run()?;

        TestCaseBuilder::new("/model-attribute?age=abc", Method::GET, handler)
            .name("invalid age")
            .status(StatusCode::BAD_REQUEST)
            .result(r#"parameter 'age' could not be converted to integer: "abc""#)
            .run()?;
    }

    Ok(())
}

#[test]
fn test_every_endpoint_accepts_default_query() -> anyhow::Result<()> {
    for (path, handler) in ENDPOINTS {
        let req = Request::builder()
            .uri(format!("{}?username=hello&age=20", path))
            .body(Body::empty())?;

        let logger = CapturingLogger::default();
        let res = handler(req, &logger);

        assert_eq!(res.status(), StatusCode::OK, "endpoint {}", path);
        assert_eq!(logger.records().len(), 1, "endpoint {}", path);
    }

    Ok(())
}
