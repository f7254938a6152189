//! # gravatar-xmlrpc
//!
//! A small XML-RPC client: value model, request serializer, response parser
//! and a pluggable HTTP transport.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gravatar_xmlrpc::{Client, HttpTransport, MethodCall, DEFAULT_TIMEOUT};
//!
//! #[tokio::main]
//! async fn main() -> gravatar_xmlrpc::Result<()> {
//!     let transport = HttpTransport::new(DEFAULT_TIMEOUT, "example/1.0")?;
//!     let client = Client::new("https://rpc.example.com/xmlrpc".parse()?, transport);
//!
//!     let value = client.call(&MethodCall::new("system.ping")).await?;
//!     println!("{value:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: `<methodResponse>` lexer and parser
//! - [`request`]: `<methodCall>` serialization
//! - [`transport`]: HTTP transport abstraction
//! - [`value`]: XML-RPC value model

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
pub mod parser;
pub mod request;
pub mod transport;
pub mod value;

pub use client::Client;
pub use error::{Error, Result};
pub use parser::{Fault, Response, parse_response};
pub use request::MethodCall;
pub use transport::{DEFAULT_TIMEOUT, HttpTransport, Transport};
pub use value::{Members, Value};
