//! HTTP transport for the Rain Bird LNK module.
//!
//! The controller accepts exactly one kind of exchange: a POST of an opaque
//! encrypted body to `http://<address>/stick`, answered with another opaque
//! body. This is the lowest layer of the workspace; everything else builds on
//! the [`Transport`] trait (or [`AsyncTransport`] with the `async` feature).

pub mod error;
pub mod http;
pub mod traits;

pub use error::{Result, TransportError};
pub use http::{stick_url, HttpTransport, TransportConfig, DEFAULT_USER_AGENT, STICK_PATH};
pub use traits::Transport;

#[cfg(feature = "async")]
pub use http::AsyncHttpTransport;
#[cfg(feature = "async")]
pub use traits::AsyncTransport;
