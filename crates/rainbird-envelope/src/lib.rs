//! Encrypted envelope around the LNK module's JSON-RPC tunnel.
//!
//! Every request body is wrapped as:
//! - a 32-byte SHA-256 of the plaintext JSON (carried, never verified)
//! - a fresh 16-byte random IV
//! - the AES-256-CBC ciphertext of the JSON plus a fixed-value pad
//!
//! The key is the SHA-256 of the controller password.

pub mod envelope;
pub mod error;
pub mod rpc;

pub use envelope::{
    derive_key, open, seal, seal_with_iv, unseal, EncryptedEnvelope, BLOCK_SIZE, HASH_LEN,
    HEADER_LEN, IV_LEN, PAD_BYTE, SENTINEL,
};
pub use error::{EnvelopeError, Result};
pub use rpc::{RpcError, RpcReply, RpcRequest, SipPayload, JSONRPC_VERSION, RPC_ID, TUNNEL_METHOD};
