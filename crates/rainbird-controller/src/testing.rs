//! In-process controller double for orchestrator tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use bytes::Bytes;
use rainbird_envelope::{seal, unseal, RpcRequest};
use rainbird_transport::{stick_url, Transport, TransportError};
use serde_json::{json, Value};

pub(crate) const PASSWORD: &str = "lawn-secret";
pub(crate) const ADDRESS: &str = "192.0.2.10";

/// What the mock answers with for one exchange.
pub(crate) enum Reply {
    /// A `result` carrying this SIP payload and its byte length.
    Payload(&'static str),
    /// An arbitrary JSON reply, sealed.
    Json(Value),
    /// Bytes returned as-is.
    Raw(&'static [u8]),
    /// A non-200 HTTP answer.
    Status(u16),
}

/// Unseals each request and answers with the next scripted reply.
pub(crate) struct MockDevice {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RpcRequest>>,
    bodies: Mutex<Vec<Bytes>>,
}

impl MockDevice {
    pub(crate) fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            bodies: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<RpcRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn bodies(&self) -> Vec<Bytes> {
        self.bodies.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.bodies.lock().unwrap().len()
    }

    fn respond(&self, address: &str, body: Bytes) -> Result<Bytes, TransportError> {
        assert_eq!(address, ADDRESS);
        let request: RpcRequest = unseal(&body, PASSWORD).expect("request should unseal");
        self.requests.lock().unwrap().push(request);
        self.bodies.lock().unwrap().push(body);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("a reply should be scripted");
        match reply {
            Reply::Payload(data) => Ok(seal(
                &json!({"id": 9, "jsonrpc": "2.0", "result": {"data": data, "length": data.len() / 2}}),
                PASSWORD,
            )
            .unwrap()),
            Reply::Json(value) => Ok(seal(&value, PASSWORD).unwrap()),
            Reply::Raw(bytes) => Ok(Bytes::from_static(bytes)),
            Reply::Status(status) => Err(TransportError::Status {
                url: stick_url(address),
                status,
                reason: "scripted".to_string(),
            }),
        }
    }
}

impl Transport for MockDevice {
    fn exchange(&self, address: &str, body: Bytes) -> rainbird_transport::Result<Bytes> {
        self.respond(address, body)
    }
}

#[cfg(feature = "async")]
impl rainbird_transport::AsyncTransport for MockDevice {
    fn exchange(
        &self,
        address: &str,
        body: Bytes,
    ) -> impl std::future::Future<Output = rainbird_transport::Result<Bytes>> + Send {
        std::future::ready(self.respond(address, body))
    }
}
