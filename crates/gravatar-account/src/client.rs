//! Account client.

use std::collections::{HashMap, HashSet};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use gravatar_xmlrpc::{Client, HttpTransport, Transport, Value};
use url::Url;

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::hash::EmailHash;
use crate::procedure::{Procedure, Request};
use crate::response;
use crate::types::{Image, Rating};

/// Manages the images of one Gravatar account.
///
/// Each method performs exactly one XML-RPC round trip. Faults surface as
/// the matching [`Error`] variant; nothing is retried.
#[derive(Debug)]
pub struct AccountClient<T = HttpTransport> {
    account: EmailHash,
    credentials: Credentials,
    rpc: Client<T>,
}

impl AccountClient<HttpTransport> {
    /// Creates a client for the account owning `email` with the default
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(email: &str, credentials: Credentials) -> Result<Self> {
        Self::with_config(email, credentials, &ClientConfig::default())
    }

    /// Creates a client from an optional password and API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] if both are `None`.
    pub fn from_parts(
        email: &str,
        password: Option<String>,
        apikey: Option<String>,
    ) -> Result<Self> {
        Self::new(email, Credentials::new(password, apikey)?)
    }

    /// Creates a client with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the HTTP client cannot
    /// be initialized.
    pub fn with_config(email: &str, credentials: Credentials, config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout, &config.user_agent)?;
        Self::with_transport(email, credentials, &config.endpoint, transport)
    }
}

impl<T: Transport> AccountClient<T> {
    /// Creates a client that sends requests through `transport`.
    ///
    /// # Errors
    ///
    /// Returns an error if `endpoint` is not a valid URL.
    pub fn with_transport(
        email: &str,
        credentials: Credentials,
        endpoint: &str,
        transport: T,
    ) -> Result<Self> {
        let account = EmailHash::new(email);
        let mut url = Url::parse(endpoint)?;
        url.query_pairs_mut().append_pair("user", account.as_str());

        tracing::debug!(account = %account, endpoint = %url, "Created account client");

        Ok(Self {
            account,
            credentials,
            rpc: Client::new(url, transport),
        })
    }

    /// Returns the hash identifying this account.
    #[must_use]
    pub const fn account(&self) -> &EmailHash {
        &self.account
    }

    /// Returns the endpoint URL, including the `user` query parameter.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        self.rpc.url()
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        self.rpc.transport()
    }

    async fn call(&self, request: Request) -> Result<Value> {
        let procedure = request.procedure();
        tracing::debug!(%procedure, "Calling account procedure");
        let call = request.into_call(&self.credentials);
        Ok(self.rpc.call(&call).await?)
    }

    /// Reports which addresses have an image assigned.
    ///
    /// The result is keyed by the addresses exactly as given. Addresses that
    /// normalize to the same hash are queried once.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, remote fault, or malformed
    /// response.
    pub async fn check_assigned<S: AsRef<str>>(&self, addresses: &[S]) -> Result<HashMap<String, bool>> {
        let addresses: Vec<String> = addresses.iter().map(|a| a.as_ref().to_string()).collect();
        let mut seen = HashSet::new();
        let hashes: Vec<String> = addresses
            .iter()
            .map(|address| EmailHash::new(address).as_str().to_string())
            .filter(|hash| seen.insert(hash.clone()))
            .collect();

        let value = self
            .call(Request::new(Procedure::Exists).param("hashes", hashes))
            .await?;
        response::exists(value, &addresses)
    }

    /// Lists the account's addresses with their assigned image, if any.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, remote fault, or malformed
    /// response.
    pub async fn list_addresses(&self) -> Result<HashMap<String, Option<Image>>> {
        let value = self.call(Request::new(Procedure::Addresses)).await?;
        response::addresses(value)
    }

    /// Lists every image in the account, assigned or not.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, remote fault, or malformed
    /// response.
    pub async fn list_images(&self) -> Result<Vec<Image>> {
        let value = self.call(Request::new(Procedure::UserImages)).await?;
        response::user_images(value)
    }

    /// Uploads raw image bytes and returns the new image id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the server rejects the data.
    pub async fn save_data(&self, data: &[u8], rating: Rating) -> Result<String> {
        tracing::trace!(bytes = data.len(), "Encoding image data");
        let request = Request::new(Procedure::SaveData)
            .param("data", STANDARD.encode(data))
            .param("rating", rating);

        let value = self.call(request).await?;
        response::saved_id(Procedure::SaveData, &value)?.ok_or(Error::InvalidData)
    }

    /// Stores the image found at `url` and returns the new image id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the server could not use the URL.
    pub async fn save_url(&self, url: &str, rating: Rating) -> Result<String> {
        let request = Request::new(Procedure::SaveUrl)
            .param("url", url)
            .param("rating", rating);

        let value = self.call(request).await?;
        response::saved_id(Procedure::SaveUrl, &value)?
            .ok_or_else(|| Error::InvalidUrl(url.to_string()))
    }

    /// Assigns an image to every given address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmail`] naming the first address the server
    /// rejected. Other rejected addresses in the same batch are not reported.
    pub async fn assign_image<S: AsRef<str>>(&self, image_id: &str, addresses: &[S]) -> Result<()> {
        let addresses: Vec<String> = addresses.iter().map(|a| a.as_ref().to_string()).collect();
        let request = Request::new(Procedure::UseUserImage)
            .param("userimage", image_id)
            .param("addresses", addresses.clone());

        let value = self.call(request).await?;
        response::check_addresses(Procedure::UseUserImage, value, &addresses)
    }

    /// Unassigns the image from every given address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmail`] naming the first address the server
    /// rejected.
    pub async fn unassign_image<S: AsRef<str>>(&self, addresses: &[S]) -> Result<()> {
        let addresses: Vec<String> = addresses.iter().map(|a| a.as_ref().to_string()).collect();
        let request = Request::new(Procedure::RemoveImage).param("addresses", addresses.clone());

        let value = self.call(request).await?;
        response::check_addresses(Procedure::RemoveImage, value, &addresses)
    }

    /// Deletes an image and unassigns it from all addresses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidImageId`] if the server reports failure.
    pub async fn delete_image(&self, image_id: &str) -> Result<()> {
        let request = Request::new(Procedure::DeleteUserImage).param("userimage", image_id);

        let value = self.call(request).await?;
        if value.is_truthy() {
            Ok(())
        } else {
            Err(Error::InvalidImageId(image_id.to_string()))
        }
    }

    /// Returns the server clock in seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, remote fault, or malformed
    /// response.
    pub async fn ping(&self) -> Result<i64> {
        let value = self.call(Request::new(Procedure::Test)).await?;
        response::server_time(value)
    }

    /// Returns the server clock as a timestamp.
    ///
    /// # Errors
    ///
    /// Same as [`ping`](Self::ping), plus an unexpected-response error if the
    /// value is out of range.
    pub async fn server_time(&self) -> Result<DateTime<Utc>> {
        let seconds = self.ping().await?;
        DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
            Error::unexpected(
                Procedure::Test.name(),
                format!("timestamp {seconds} out of range"),
            )
        })
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
    fn test_endpoint_scoped_to_account() {
        let client = AccountClient::new(" Foo@Bar.com ", Credentials::password("pw")).unwrap();
        let hash = EmailHash::new("foo@bar.com");
        assert_eq!(client.account(), &hash);
        assert_eq!(
            client.endpoint().as_str(),
            format!("https://secure.gravatar.com/xmlrpc?user={hash}")
        );
    }

    #[test]
    fn test_missing_credentials() {
        let result = AccountClient::from_parts("a@x.com", None, None);
        assert!(matches!(result, Err(Error::MissingCredentials)));
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = ClientConfig::builder().endpoint("not a url").build();
        let result = AccountClient::with_config("a@x.com", Credentials::apikey("k"), &config);
        assert!(matches!(result, Err(Error::Endpoint(_))));
    }
}
