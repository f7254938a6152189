//! XML-RPC client bound to a single endpoint.

use url::Url;

use crate::parser::{Response, parse_response};
use crate::request::MethodCall;
use crate::transport::Transport;
use crate::{Error, Result, Value};

/// Issues method calls against one endpoint URL.
#[derive(Debug, Clone)]
pub struct Client<T> {
    url: Url,
    transport: T,
}

impl<T: Transport> Client<T> {
    /// Creates a client for `url` using `transport`.
    #[must_use]
    pub const fn new(url: Url, transport: T) -> Self {
        Self { url, transport }
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Performs one round trip and returns the decoded return value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fault`] if the server reports a fault, or a
    /// transport/parse error otherwise.
    pub async fn call(&self, call: &MethodCall) -> Result<Value> {
        let body = call.to_xml();
        tracing::debug!(method = %call.method, "XML-RPC call");
        tracing::trace!(bytes = body.len(), "request body");

        let text = self.transport.post(&self.url, body).await?;
        tracing::trace!(bytes = text.len(), "response body");

        match parse_response(&text)? {
            Response::Success(value) => Ok(value),
            Response::Fault(fault) => {
                tracing::warn!(method = %call.method, code = fault.code, message = %fault.message, "XML-RPC fault");
                Err(Error::fault(fault.code, fault.message))
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Replays one canned body and records what was posted.
    struct CannedTransport {
        reply: String,
        sent: Mutex<Vec<(Url, String)>>,
    }

    impl CannedTransport {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for CannedTransport {
        async fn post(&self, url: &Url, body: String) -> Result<String> {
            self.sent.lock().unwrap().push((url.clone(), body));
            Ok(self.reply.clone())
        }
    }

    fn endpoint() -> Url {
        Url::parse("https://rpc.example.com/xmlrpc?user=abc").unwrap()
    }

    #[tokio::test]
    async fn test_call_success() {
        let transport = CannedTransport::new(
            "<methodResponse><params><param><value><int>42</int></value></param></params></methodResponse>",
        );
        let client = Client::new(endpoint(), transport);

        let value = client.call(&MethodCall::new("grav.test")).await.unwrap();
        assert_eq!(value, Value::Int(42));

        let sent = client.transport().sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.as_str(), "https://rpc.example.com/xmlrpc?user=abc");
        assert!(sent[0].1.contains("<methodName>grav.test</methodName>"));
    }

    #[tokio::test]
    async fn test_call_fault() {
        let transport = CannedTransport::new(
            "<methodResponse><fault><value><struct>\
             <member><name>faultCode</name><value><int>-11</int></value></member>\
             <member><name>faultString</name><value>bad rating</value></member>\
             </struct></value></fault></methodResponse>",
        );
        let client = Client::new(endpoint(), transport);

        let err = client.call(&MethodCall::new("grav.saveUrl")).await.unwrap_err();
        match err {
            Error::Fault { code, message } => {
                assert_eq!(code, -11);
                assert_eq!(message, "bad rating");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_malformed() {
        let client = Client::new(endpoint(), CannedTransport::new("not xml at all"));
        let err = client.call(&MethodCall::new("grav.test")).await.unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
