//! Integration tests for the account client.
//!
//! These tests use a mock transport that replays canned XML-RPC responses
//! and records every request body, so no network access is needed.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::VecDeque;
use std::sync::{Mutex, Once};

use gravatar_account::{AccountClient, Credentials, EmailHash, Error, Image, Rating};
use gravatar_xmlrpc::{MethodCall, Transport, Value};
use url::Url;

const ENDPOINT: &str = "https://secure.gravatar.com/xmlrpc";

/// Mock transport that returns predefined responses.
struct MockTransport {
    /// Responses to return (in order).
    responses: Mutex<VecDeque<String>>,
    /// Captured request bodies.
    sent: Mutex<Vec<String>>,
}

impl MockTransport {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| (*r).to_string()).collect()),
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn post(&self, _url: &Url, body: String) -> gravatar_xmlrpc::Result<String> {
        self.sent.lock().unwrap().push(body);
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no canned response left"))
    }
}

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn client(credentials: Credentials, responses: &[&str]) -> AccountClient<MockTransport> {
    init_tracing();
    AccountClient::with_transport(
        "Owner@Example.com",
        credentials,
        ENDPOINT,
        MockTransport::new(responses),
    )
    .unwrap()
}

fn success(value: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodResponse>\n<params>\n<param>\n<value>{value}</value>\n</param>\n</params>\n</methodResponse>\n"
    )
}

fn fault(code: i64, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodResponse><fault><value><struct>\
         <member><name>faultCode</name><value><int>{code}</int></value></member>\
         <member><name>faultString</name><value><string>{message}</string></value></member>\
         </struct></value></fault></methodResponse>"
    )
}

fn member(name: &str, value: &str) -> String {
    format!("<member><name>{name}</name><value>{value}</value></member>")
}

fn structure(members: &[String]) -> String {
    format!("<struct>{}</struct>", members.concat())
}

/// Decodes the single struct parameter of a recorded request.
fn request_params(body: &str) -> gravatar_xmlrpc::Members {
    let start = body.find("<param>").unwrap() + "<param>".len();
    let end = body.rfind("</param>").unwrap();
    match gravatar_xmlrpc::parser::parse_value(&body[start..end]).unwrap() {
        Value::Struct(members) => members,
        other => panic!("expected struct param, got {other:?}"),
    }
}

fn method_name(body: &str) -> &str {
    let start = body.find("<methodName>").unwrap() + "<methodName>".len();
    let end = body.find("</methodName>").unwrap();
    &body[start..end]
}

#[test]
fn test_endpoint_uses_account_hash() {
    let client = client(Credentials::password("pw"), &[]);
    assert_eq!(client.account(), &EmailHash::new("owner@example.com"));
    assert_eq!(
        client.endpoint().as_str(),
        format!("{ENDPOINT}?user={}", EmailHash::new("owner@example.com"))
    );
}

#[test]
fn test_request_shape_matches_method_call() {
    // Guards the helper parsers above against drift in the serializer.
    let body = MethodCall::new("grav.test")
        .arg(gravatar_xmlrpc::Members::new())
        .to_xml();
    assert_eq!(method_name(&body), "grav.test");
    assert!(request_params(&body).is_empty());
}

#[tokio::test]
async fn test_every_call_carries_configured_credentials() {
    let empty = success("<struct></struct>");
    let saved = success("<string>img1</string>");
    let done = success(&structure(&[member("a@x.com", "<int>1</int>")]));
    let deleted = success("<boolean>1</boolean>");
    let pong = success(&structure(&[member("response", "<int>1</int>")]));
    let client = client(
        Credentials::password("pw").with_apikey("key"),
        &[
            empty.as_str(),
            empty.as_str(),
            empty.as_str(),
            saved.as_str(),
            saved.as_str(),
            done.as_str(),
            done.as_str(),
            deleted.as_str(),
            pong.as_str(),
        ],
    );

    client.check_assigned(&["a@x.com"]).await.unwrap();
    client.list_addresses().await.unwrap();
    client.list_images().await.unwrap();
    client.save_data(b"img", Rating::G).await.unwrap();
    client.save_url("http://x/me.png", Rating::G).await.unwrap();
    client.assign_image("img1", &["a@x.com"]).await.unwrap();
    client.unassign_image(&["a@x.com"]).await.unwrap();
    client.delete_image("img1").await.unwrap();
    client.ping().await.unwrap();

    let sent = client.transport().sent();
    let methods: Vec<&str> = sent.iter().map(|body| method_name(body)).collect();
    assert_eq!(
        methods,
        vec![
            "grav.exists",
            "grav.addresses",
            "grav.userimages",
            "grav.saveData",
            "grav.saveUrl",
            "grav.useUserimage",
            "grav.removeImage",
            "grav.deleteUserimage",
            "grav.test",
        ]
    );
    for body in &sent {
        let params = request_params(body);
        assert_eq!(params["password"], Value::from("pw"), "{}", method_name(body));
        assert_eq!(params["apikey"], Value::from("key"), "{}", method_name(body));
    }
}

#[tokio::test]
async fn test_apikey_only_sends_no_password() {
    let response = success(&structure(&[member("response", "<int>1</int>")]));
    let client = client(Credentials::apikey("key"), &[response.as_str()]);

    client.ping().await.unwrap();

    let params = request_params(&client.transport().sent()[0]);
    assert_eq!(params["apikey"], Value::from("key"));
    assert!(!params.contains_key("password"));
}

#[tokio::test]
async fn test_check_assigned() {
    let response = success(&structure(&[
        member(EmailHash::new("a@x.com").as_str(), "<int>1</int>"),
        member(EmailHash::new("b@x.com").as_str(), "<int>0</int>"),
    ]));
    let client = client(Credentials::password("pw"), &[response.as_str()]);

    let result = client.check_assigned(&[" A@x.com", "b@x.com"]).await.unwrap();

    assert_eq!(result.len(), 2);
    assert!(result[" A@x.com"]);
    assert!(!result["b@x.com"]);

    let sent = client.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(method_name(&sent[0]), "grav.exists");
    let params = request_params(&sent[0]);
    assert_eq!(
        params["hashes"],
        Value::from(vec![
            EmailHash::new("a@x.com").to_string(),
            EmailHash::new("b@x.com").to_string(),
        ])
    );
}

#[tokio::test]
async fn test_check_assigned_queries_each_hash_once() {
    let hash = EmailHash::new("a@x.com");
    let response = success(&structure(&[member(hash.as_str(), "<int>1</int>")]));
    let client = client(Credentials::password("pw"), &[response.as_str()]);

    let result = client
        .check_assigned(&["a@x.com", " A@X.com", "b@x.com", "a@x.com"])
        .await
        .unwrap();

    assert_eq!(result.len(), 3);
    assert!(result["a@x.com"]);
    assert!(result[" A@X.com"]);
    assert!(!result["b@x.com"]);

    let params = request_params(&client.transport().sent()[0]);
    assert_eq!(
        params["hashes"],
        Value::from(vec![hash.to_string(), EmailHash::new("b@x.com").to_string()])
    );
}

#[tokio::test]
async fn test_list_addresses() {
    let response = success(&structure(&[
        member(
            "a@x.com",
            &structure(&[
                member("userimage", "<string></string>"),
                member("userimage_url", "<string></string>"),
                member("rating", "<int>0</int>"),
            ]),
        ),
        member(
            "b@x.com",
            &structure(&[
                member("userimage", "<string>img2</string>"),
                member("userimage_url", "<string>http://en.gravatar.com/userimage/1/img2.jpg</string>"),
                member("rating", "<int>1</int>"),
            ]),
        ),
    ]));
    let client = client(Credentials::password("pw"), &[response.as_str()]);

    let addresses = client.list_addresses().await.unwrap();

    assert_eq!(addresses.len(), 2);
    assert_eq!(addresses["a@x.com"], None);
    assert_eq!(
        addresses["b@x.com"],
        Some(Image::new(
            "img2",
            "http://en.gravatar.com/userimage/1/img2.jpg",
            Rating::PG
        ))
    );
    assert_eq!(method_name(&client.transport().sent()[0]), "grav.addresses");
}

#[tokio::test]
async fn test_list_images() {
    let pair = |rating: &str, url: &str| {
        format!(
            "<array><data><value><string>{rating}</string></value>\
             <value><string>{url}</string></value></data></array>"
        )
    };
    let response = success(&structure(&[
        member("img1", &pair("0", "http://x/img1.jpg")),
        member("img2", &pair("3", "http://x/img2.jpg")),
    ]));
    let client = client(Credentials::password("pw"), &[response.as_str()]);

    let mut images = client.list_images().await.unwrap();
    images.sort_by(|a, b| a.id.cmp(&b.id));

    assert_eq!(
        images,
        vec![
            Image::new("img1", "http://x/img1.jpg", Rating::G),
            Image::new("img2", "http://x/img2.jpg", Rating::X),
        ]
    );
    assert_eq!(method_name(&client.transport().sent()[0]), "grav.userimages");
}

#[tokio::test]
async fn test_save_data_encodes_base64() {
    let response = success("<string>newimg</string>");
    let client = client(Credentials::password("pw"), &[response.as_str()]);

    let id = client.save_data(b"\x89PNG", Rating::R).await.unwrap();
    assert_eq!(id, "newimg");

    let sent = client.transport().sent();
    assert_eq!(method_name(&sent[0]), "grav.saveData");
    let params = request_params(&sent[0]);
    assert_eq!(params["data"], Value::from("iVBORw=="));
    assert_eq!(params["rating"], Value::Int(2));
}

#[tokio::test]
async fn test_save_data_empty_id_is_invalid_data() {
    let response = success("<string></string>");
    let client = client(Credentials::password("pw"), &[response.as_str()]);

    let err = client.save_data(b"junk", Rating::G).await.unwrap_err();
    assert!(matches!(err, Error::InvalidData));
}

#[tokio::test]
async fn test_save_url() {
    let ok = success("<string>urlimg</string>");
    let rejected = success("<boolean>0</boolean>");
    let client = client(Credentials::password("pw"), &[ok.as_str(), rejected.as_str()]);

    let id = client.save_url("http://x/me.png", Rating::G).await.unwrap();
    assert_eq!(id, "urlimg");

    let err = client.save_url("http://x/missing.png", Rating::G).await.unwrap_err();
    match err {
        Error::InvalidUrl(url) => assert_eq!(url, "http://x/missing.png"),
        other => panic!("unexpected error: {other:?}"),
    }

    let params = request_params(&client.transport().sent()[0]);
    assert_eq!(params["url"], Value::from("http://x/me.png"));
    assert_eq!(params["rating"], Value::Int(0));
}

#[tokio::test]
async fn test_assign_image_reports_failing_address() {
    let response = success(&structure(&[
        member(EmailHash::new("a@x.com").as_str(), "<int>1</int>"),
        member(EmailHash::new("b@x.com").as_str(), "<int>0</int>"),
    ]));
    let client = client(Credentials::password("pw"), &[response.as_str()]);

    let err = client
        .assign_image("img1", &["a@x.com", "b@x.com"])
        .await
        .unwrap_err();
    match err {
        Error::InvalidEmail(address) => assert_eq!(address, "b@x.com"),
        other => panic!("unexpected error: {other:?}"),
    }

    let sent = client.transport().sent();
    assert_eq!(method_name(&sent[0]), "grav.useUserimage");
    let params = request_params(&sent[0]);
    assert_eq!(params["userimage"], Value::from("img1"));
    assert_eq!(params["addresses"], Value::from(vec!["a@x.com", "b@x.com"]));
}

#[tokio::test]
async fn test_assign_image_success() {
    let response = success(&structure(&[
        member("a@x.com", "<boolean>1</boolean>"),
        member("b@x.com", "<boolean>1</boolean>"),
    ]));
    let client = client(Credentials::password("pw"), &[response.as_str()]);

    client
        .assign_image("img1", &["a@x.com".to_string(), "b@x.com".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unassign_image() {
    let ok = success(&structure(&[member("a@x.com", "<int>1</int>")]));
    let rejected = success(&structure(&[member("c@x.com", "<int>0</int>")]));
    let client = client(Credentials::password("pw"), &[ok.as_str(), rejected.as_str()]);

    client.unassign_image(&["a@x.com"]).await.unwrap();
    let err = client.unassign_image(&["c@x.com"]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidEmail(ref a) if a == "c@x.com"));

    let sent = client.transport().sent();
    assert_eq!(method_name(&sent[0]), "grav.removeImage");
    assert_eq!(request_params(&sent[0])["addresses"], Value::from(vec!["a@x.com"]));
}

#[tokio::test]
async fn test_delete_image() {
    let ok = success("<boolean>1</boolean>");
    let rejected = success("<boolean>0</boolean>");
    let client = client(Credentials::password("pw"), &[ok.as_str(), rejected.as_str()]);

    client.delete_image("img1").await.unwrap();
    let err = client.delete_image("nope").await.unwrap_err();
    match err {
        Error::InvalidImageId(id) => assert_eq!(id, "nope"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        request_params(&client.transport().sent()[1])["userimage"],
        Value::from("nope")
    );
}

#[tokio::test]
async fn test_ping_and_server_time() {
    let response = success(&structure(&[member("response", "<int>1300000000</int>")]));
    let client = client(Credentials::password("pw"), &[response.as_str(), response.as_str()]);

    assert_eq!(client.ping().await.unwrap(), 1_300_000_000);
    let time = client.server_time().await.unwrap();
    assert_eq!(time.timestamp(), 1_300_000_000);
    assert_eq!(method_name(&client.transport().sent()[0]), "grav.test");
}

#[tokio::test]
async fn test_authentication_fault() {
    let response = fault(-9, "Authentication error");
    let client = client(Credentials::password("wrong"), &[response.as_str()]);

    let err = client.list_images().await.unwrap_err();
    match err {
        Error::Authentication(message) => assert_eq!(message, "Authentication error"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_fault() {
    let response = fault(-999, "Something odd");
    let client = client(Credentials::password("pw"), &[response.as_str()]);

    let err = client.ping().await.unwrap_err();
    match err {
        Error::Unknown { code, message } => {
            assert_eq!(code, -999);
            assert_eq!(message, "Something odd");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_each_fault_code_maps_to_kind() {
    let cases: [(i64, fn(&Error) -> bool); 6] = [
        (-7, |e| matches!(e, Error::Secure(_))),
        (-8, |e| matches!(e, Error::Internal(_))),
        (-9, |e| matches!(e, Error::Authentication(_))),
        (-10, |e| matches!(e, Error::ParameterMissing(_))),
        (-11, |e| matches!(e, Error::ParameterIncorrect(_))),
        (-100, |e| matches!(e, Error::Misc(_))),
    ];

    for (code, is_kind) in cases {
        let response = fault(code, "boom");
        let client = client(Credentials::password("pw"), &[response.as_str()]);
        let err = client.delete_image("img").await.unwrap_err();
        assert!(is_kind(&err), "code {code} mapped to {err:?}");
        assert_eq!(err.fault_code(), Some(code));
    }
}

#[tokio::test]
async fn test_malformed_response_is_rpc_error() {
    let client = client(Credentials::password("pw"), &["<html>Bad Gateway</html>"]);

    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, Error::Rpc(gravatar_xmlrpc::Error::Parse { .. })));
}

#[tokio::test]
async fn test_wrong_shape_is_unexpected_response() {
    let response = success("<string>not a struct</string>");
    let client = client(Credentials::password("pw"), &[response.as_str()]);

    let err = client.list_addresses().await.unwrap_err();
    assert!(matches!(
        err,
        Error::UnexpectedResponse {
            procedure: "addresses",
            ..
        }
    ));
}
