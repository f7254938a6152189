//! # gravatar-account
//!
//! Client library for the Gravatar XML-RPC account API.
//!
//! An [`AccountClient`] is bound to one account, identified by the MD5 hash
//! of one of its email addresses, and authenticated by a password and/or an
//! API key. It can check which addresses have images, list addresses and
//! images, upload images from bytes or a URL, assign and unassign images,
//! and delete them.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gravatar_account::{AccountClient, Credentials, Rating};
//!
//! #[tokio::main]
//! async fn main() -> gravatar_account::Result<()> {
//!     let client = AccountClient::new("me@example.com", Credentials::password("secret"))?;
//!
//!     let id = client.save_url("https://example.com/me.png", Rating::G).await?;
//!     client.assign_image(&id, &["me@example.com"]).await?;
//!
//!     for (address, image) in client.list_addresses().await? {
//!         println!("{address}: {image:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Remote faults are mapped to dedicated [`Error`] variants:
//!
//! | Code | Variant |
//! |------|---------|
//! | -7   | [`Error::Secure`] |
//! | -8   | [`Error::Internal`] |
//! | -9   | [`Error::Authentication`] |
//! | -10  | [`Error::ParameterMissing`] |
//! | -11  | [`Error::ParameterIncorrect`] |
//! | -100 | [`Error::Misc`] |
//! | other | [`Error::Unknown`] |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
pub mod config;
mod credentials;
mod error;
pub mod hash;
pub mod procedure;
mod response;
pub mod types;

pub use client::AccountClient;
pub use config::{API_ENDPOINT, ClientConfig, ClientConfigBuilder};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use hash::{EmailHash, hash_email};
pub use procedure::Procedure;
pub use types::{Image, ParseRatingError, Rating};
