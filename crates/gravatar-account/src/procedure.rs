//! Remote procedures exposed by the account endpoint.

use gravatar_xmlrpc::{Members, MethodCall, Value};

use crate::credentials::Credentials;

/// Namespace shared by every account procedure.
pub const NAMESPACE: &str = "grav";

/// Account procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    /// Checks whether hashed addresses have an image assigned.
    Exists,
    /// Lists the account's addresses with their assigned images.
    Addresses,
    /// Lists every image in the account.
    UserImages,
    /// Uploads base64 image data.
    SaveData,
    /// Uploads an image fetched from a URL.
    SaveUrl,
    /// Assigns an image to addresses.
    UseUserImage,
    /// Unassigns the image from addresses.
    RemoveImage,
    /// Deletes an image.
    DeleteUserImage,
    /// Returns the server time.
    Test,
}

impl Procedure {
    /// Returns the unqualified procedure name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::Addresses => "addresses",
            Self::UserImages => "userimages",
            Self::SaveData => "saveData",
            Self::SaveUrl => "saveUrl",
            Self::UseUserImage => "useUserimage",
            Self::RemoveImage => "removeImage",
            Self::DeleteUserImage => "deleteUserimage",
            Self::Test => "test",
        }
    }

    /// Returns the fully qualified method name, e.g. `grav.exists`.
    #[must_use]
    pub fn method_name(self) -> String {
        format!("{NAMESPACE}.{}", self.name())
    }
}

impl std::fmt::Display for Procedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{NAMESPACE}.{}", self.name())
    }
}

/// Builds the single struct parameter of a call.
#[derive(Debug, Clone)]
pub struct Request {
    procedure: Procedure,
    params: Members,
}

impl Request {
    /// Starts a request for `procedure`.
    #[must_use]
    pub fn new(procedure: Procedure) -> Self {
        Self {
            procedure,
            params: Members::new(),
        }
    }

    /// Adds a call-specific member.
    #[must_use]
    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Returns the procedure.
    #[must_use]
    pub const fn procedure(&self) -> Procedure {
        self.procedure
    }

    /// Adds the credentials and produces the method call.
    #[must_use]
    pub fn into_call(mut self, credentials: &Credentials) -> MethodCall {
        credentials.apply(&mut self.params);
        MethodCall::new(self.procedure.method_name()).arg(self.params)
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
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(Procedure::Exists.method_name(), "grav.exists");
        assert_eq!(Procedure::UseUserImage.method_name(), "grav.useUserimage");
        assert_eq!(Procedure::DeleteUserImage.to_string(), "grav.deleteUserimage");
        assert_eq!(Procedure::Test.method_name(), "grav.test");
    }

    #[test]
    fn test_request_carries_credentials() {
        let call = Request::new(Procedure::SaveUrl)
            .param("url", "http://x/y.png")
            .param("rating", 2)
            .into_call(&Credentials::apikey("key"));

        assert_eq!(call.method, "grav.saveUrl");
        assert_eq!(call.params.len(), 1);
        let params = call.params[0].as_struct().unwrap();
        assert_eq!(params["url"], Value::from("http://x/y.png"));
        assert_eq!(params["rating"], Value::Int(2));
        assert_eq!(params["apikey"], Value::from("key"));
        assert!(!params.contains_key("password"));
    }
}
