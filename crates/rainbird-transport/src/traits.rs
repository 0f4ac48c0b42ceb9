use bytes::Bytes;

use crate::error::Result;

/// A single blocking request/response exchange with a controller.
///
/// Implementations POST `body` to the controller at `address` and return the
/// raw reply body. They must not retry: a failed exchange is reported once.
pub trait Transport {
    /// Send `body` to the controller and wait for its reply.
    fn exchange(&self, address: &str, body: Bytes) -> Result<Bytes>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn exchange(&self, address: &str, body: Bytes) -> Result<Bytes> {
        (**self).exchange(address, body)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn exchange(&self, address: &str, body: Bytes) -> Result<Bytes> {
        (**self).exchange(address, body)
    }
}

/// Asynchronous counterpart of [`Transport`].
///
/// The exchange is the only suspension point of a controller request.
#[cfg(feature = "async")]
pub trait AsyncTransport {
    /// Send `body` to the controller and await its reply.
    fn exchange(
        &self,
        address: &str,
        body: Bytes,
    ) -> impl std::future::Future<Output = Result<Bytes>> + Send;
}
