//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every encoding
//! through `Request::send` using the real default transport. The `/echo`
//! route reflects what the server actually received, so these tests
//! validate the bytes on the wire rather than the structuring step alone.

use courier_core::{Encoding, File, Method, Request, RequestError};
use mock_server::Echo;

/// Start the mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn echo_of(body: &[u8]) -> Echo {
    serde_json::from_slice(body).expect("echo response was not valid JSON")
}

#[test]
fn json_body_arrives_as_sent() {
    let base = start_server();
    let response = Request::new(format!("{base}/echo"))
        .method(Method::Post)
        .body_field("a", 1_i64)
        .body_field("b", "x")
        .send()
        .unwrap();
    assert_eq!(response.status, 200);

    let echo = echo_of(&response.body);
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(&echo.body).unwrap();
    assert_eq!(body, serde_json::json!({"a": 1, "b": "x"}));
}

#[test]
fn urlencoded_body_arrives_escaped() {
    let base = start_server();
    let response = Request::new(format!("{base}/echo"))
        .method(Method::Post)
        .encoding(Encoding::UrlEncoded)
        .body_field("a", "1")
        .body_field("b", "x y")
        .send()
        .unwrap();

    let echo = echo_of(&response.body);
    assert_eq!(
        echo.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    let pairs: Vec<&str> = echo.body.split('&').collect();
    assert!(pairs.contains(&"a=1"));
    assert!(pairs.contains(&"b=x+y"));
}

#[test]
fn multipart_upload_arrives_with_matching_boundary() {
    let base = start_server();
    let response = Request::new(format!("{base}/echo"))
        .method(Method::Post)
        .encoding(Encoding::Multipart)
        .body_field("f", File::new("test.txt", b"hi".to_vec()))
        .body_field("note", "inline text")
        .send()
        .unwrap();

    let echo = echo_of(&response.body);
    let content_type = echo.content_type.expect("no content type received");
    let boundary = content_type
        .split("boundary=")
        .nth(1)
        .expect("no boundary parameter");

    assert!(echo.body.contains(
        "Content-Disposition: form-data; name=\"f\"; filename=\"test.txt\""
    ));
    assert!(echo.body.contains("\r\n\r\nhi\r\n"));
    assert!(echo.body.contains("name=\"note\"\r\n\r\ninline text\r\n"));
    assert!(echo.body.starts_with(&format!("--{boundary}\r\n")));
    assert!(echo.body.ends_with(&format!("--{boundary}--\r\n")));
}

#[test]
fn get_sends_no_body_but_sets_content_type() {
    let base = start_server();
    let response = Request::new(format!("{base}/echo"))
        .encoding(Encoding::UrlEncoded)
        .body_field("ignored", "yes")
        .send()
        .unwrap();

    let echo = echo_of(&response.body);
    assert_eq!(echo.method, "GET");
    assert_eq!(
        echo.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert!(echo.body.is_empty());
}

#[test]
fn query_params_reach_the_server() {
    let base = start_server();
    let response = Request::new(format!("{base}/echo?fixed=1"))
        .query_param("tag", "a b")
        .query_param("tag", "c")
        .send()
        .unwrap();

    let echo = echo_of(&response.body);
    assert_eq!(echo.uri, "/echo?fixed=1&tag=a+b&tag=c");
}

#[test]
fn response_cap_truncates_oversized_bodies() {
    let base = start_server();
    let response = Request::new(format!("{base}/large/65536"))
        .response_cap(1024)
        .send()
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body.len(), 1024);
}

#[test]
fn must_succeed_maps_server_errors() {
    let base = start_server();
    let err = Request::new(format!("{base}/status/500"))
        .send_must_succeed()
        .unwrap_err();
    assert!(matches!(err, RequestError::HttpStatus { status: 500, .. }));
}

#[test]
fn plain_send_reports_server_errors_as_data() {
    let base = start_server();
    let response = Request::new(format!("{base}/status/503")).send().unwrap();
    assert_eq!(response.status, 503);
    assert!(!response.is_success());
}
