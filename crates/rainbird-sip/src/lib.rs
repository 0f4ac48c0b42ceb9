//! Table-driven codec for the Rain Bird SIP protocol.
//!
//! SIP is the controller's binary command set. Every command and reply is a
//! short hex string:
//! - 1 opcode byte selecting the command or response variant
//! - fixed-width, zero-padded parameters or fields
//! - a declared total length in bytes, checked on both directions
//!
//! The layouts live in [`registry`]; [`build_frame`] and [`decode_response`]
//! are the only code that touches them.

pub mod codec;
pub mod error;
pub mod hex;
pub mod registry;
pub mod response;

pub use codec::{active_zone, build_frame, decode_response, ACK_FIELD, ACTIVE_ZONES_FIELD};
pub use error::{Result, SipError};
pub use hex::{from_hex, to_hex};
pub use registry::{
    CommandSpec, FieldSpec, ParamSpec, ResponseSpec, SipRegistry, Transform, ACKNOWLEDGE,
    COMMANDS, NOT_ACKNOWLEDGE, RESPONSES,
};
pub use response::{DecodedResponse, FieldValue};
