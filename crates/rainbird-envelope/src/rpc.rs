//! JSON-RPC bodies carried inside the envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request id the stock app always sends.
pub const RPC_ID: u64 = 9;

pub const JSONRPC_VERSION: &str = "2.0";

/// The only method the LNK module exposes for SIP traffic.
pub const TUNNEL_METHOD: &str = "tunnelSip";

/// A SIP frame as carried in `params` and `result`.
///
/// `length` counts bytes, i.e. half the number of hex digits in `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipPayload {
    pub data: String,
    pub length: usize,
}

/// Outbound `tunnelSip` call.
///
/// Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub id: u64,
    pub jsonrpc: String,
    pub method: String,
    pub params: SipPayload,
}

impl RpcRequest {
    pub fn tunnel_sip(data: impl Into<String>, length: usize) -> Self {
        Self {
            id: RPC_ID,
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: TUNNEL_METHOD.to_string(),
            params: SipPayload {
                data: data.into(),
                length,
            },
        }
    }
}

/// Device-reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Decrypted reply. Unknown members (`id`, `jsonrpc`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<SipPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcReply {
    /// Interpret an already-parsed JSON value as a reply.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
