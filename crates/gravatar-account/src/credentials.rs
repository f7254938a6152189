//! Account credentials.

use gravatar_xmlrpc::{Members, Value};

use crate::error::{Error, Result};

/// Password and/or API key sent with every call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    password: Option<String>,
    apikey: Option<String>,
}

impl Credentials {
    /// Creates credentials from an optional password and API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] if both are `None`.
    pub fn new(password: Option<String>, apikey: Option<String>) -> Result<Self> {
        if password.is_none() && apikey.is_none() {
            return Err(Error::MissingCredentials);
        }
        Ok(Self { password, apikey })
    }

    /// Password-only credentials.
    #[must_use]
    pub fn password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            apikey: None,
        }
    }

    /// API-key-only credentials.
    #[must_use]
    pub fn apikey(apikey: impl Into<String>) -> Self {
        Self {
            password: None,
            apikey: Some(apikey.into()),
        }
    }

    /// Adds an API key alongside the password.
    #[must_use]
    pub fn with_apikey(mut self, apikey: impl Into<String>) -> Self {
        self.apikey = Some(apikey.into());
        self
    }

    /// Adds a password alongside the API key.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Returns true if a password is set.
    #[must_use]
    pub const fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Returns true if an API key is set.
    #[must_use]
    pub const fn has_apikey(&self) -> bool {
        self.apikey.is_some()
    }

    /// Inserts `password` and/or `apikey` into a request struct.
    pub(crate) fn apply(&self, params: &mut Members) {
        if let Some(password) = &self.password {
            params.insert("password".to_string(), Value::from(password.as_str()));
        }
        if let Some(apikey) = &self.apikey {
            params.insert("apikey".to_string(), Value::from(apikey.as_str()));
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("apikey", &self.apikey.as_ref().map(|_| "<redacted>"))
            .finish()
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
    fn test_requires_one_credential() {
        assert!(matches!(
            Credentials::new(None, None),
            Err(Error::MissingCredentials)
        ));
        assert!(Credentials::new(Some("pw".into()), None).is_ok());
        assert!(Credentials::new(None, Some("key".into())).is_ok());
        assert!(Credentials::new(Some("pw".into()), Some("key".into())).is_ok());
    }

    #[test]
    fn test_apply_password_only() {
        let mut params = Members::new();
        Credentials::password("pw").apply(&mut params);
        assert_eq!(params.get("password"), Some(&Value::from("pw")));
        assert!(!params.contains_key("apikey"));
    }

    #[test]
    fn test_apply_both() {
        let creds = Credentials::apikey("key").with_password("pw");
        assert!(creds.has_password());
        assert!(creds.has_apikey());

        let mut params = Members::new();
        creds.apply(&mut params);
        assert_eq!(params.get("password"), Some(&Value::from("pw")));
        assert_eq!(params.get("apikey"), Some(&Value::from("key")));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", Credentials::password("hunter2").with_apikey("k3y"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("k3y"));
        assert!(debug.contains("<redacted>"));
    }
}
