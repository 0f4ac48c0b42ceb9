//! The request pipeline shared by the blocking and async controllers.
//!
//! ```text
//! Resolving → Building → Sealing → AwaitingTransport → Unsealing
//!           → ValidatingEnvelope → Decoding → Done
//! ```
//!
//! [`prepare`] runs everything before the transport call and [`complete`]
//! everything after it. Any stage may fail; the error reports its stage via
//! [`ControllerError::stage`].

use std::fmt;

use bytes::Bytes;
use rainbird_envelope::{RpcReply, RpcRequest};
use rainbird_sip::{build_frame, decode_response, from_hex, CommandSpec, DecodedResponse, SipRegistry};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ControllerConfig;
use crate::error::{ControllerError, Result};

/// Fields of a negative-acknowledge reply.
const NAK_CODE_FIELD: &str = "nak_code";
const NAK_ECHO_FIELD: &str = "command_echo";

/// Position of a request in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Resolving,
    Building,
    Sealing,
    AwaitingTransport,
    Unsealing,
    ValidatingEnvelope,
    Decoding,
    Done,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Resolving => "resolving",
            Stage::Building => "building",
            Stage::Sealing => "sealing",
            Stage::AwaitingTransport => "awaiting_transport",
            Stage::Unsealing => "unsealing",
            Stage::ValidatingEnvelope => "validating_envelope",
            Stage::Decoding => "decoding",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sealed request ready for the transport.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub command: &'static CommandSpec,
    /// Command payload as hex.
    pub frame: String,
    /// Encrypted body to POST.
    pub body: Bytes,
}

/// Resolve, build and seal a command.
///
/// Fails before any network traffic when the command is unknown or the
/// parameters do not fit its declared length.
pub fn prepare(
    config: &ControllerConfig,
    registry: &SipRegistry,
    name: &str,
    params: &[u64],
) -> Result<PreparedRequest> {
    debug!(stage = %Stage::Resolving, command = name, address = %config.address, "starting request");
    let command = registry.command(name)?;

    let frame = build_frame(command, params)?;
    if config.debug {
        debug!(stage = %Stage::Building, command = name, %frame, "built frame");
    }

    let request = RpcRequest::tunnel_sip(frame.clone(), command.length);
    if config.debug {
        if let Ok(json) = serde_json::to_string(&request) {
            debug!(stage = %Stage::Sealing, %json, "sealing request");
        }
    }
    let body = rainbird_envelope::seal(&request, &config.password).map_err(ControllerError::Sealing)?;
    debug!(stage = %Stage::AwaitingTransport, command = name, size = body.len(), "request sealed");

    Ok(PreparedRequest {
        command,
        frame,
        body,
    })
}

/// Unseal, validate and decode the reply to `command`.
pub fn complete(
    config: &ControllerConfig,
    registry: &SipRegistry,
    command: &CommandSpec,
    reply: &[u8],
) -> Result<DecodedResponse> {
    debug!(stage = %Stage::Unsealing, command = command.name, size = reply.len(), "unsealing reply");
    let value: Value =
        rainbird_envelope::unseal(reply, &config.password).map_err(ControllerError::MalformedEnvelope)?;
    if config.debug {
        debug!(stage = %Stage::Unsealing, json = %value, "decrypted reply");
    }

    let reply =
        RpcReply::from_value(value).map_err(|err| ControllerError::InvalidEnvelopeShape(err.to_string()))?;
    if let Some(error) = reply.error {
        return Err(ControllerError::DeviceProtocol {
            code: error.code,
            message: error.message,
        });
    }
    let result = reply.result.ok_or_else(|| {
        ControllerError::InvalidEnvelopeShape("reply carries neither result nor error".to_string())
    })?;

    debug!(stage = %Stage::Decoding, command = command.name, data = %result.data, "decoding reply");
    let code = result
        .data
        .get(..2)
        .ok_or_else(|| ControllerError::MalformedHex(result.data.clone()))?;
    let spec = registry.response_for_code(code)?;
    if result.length != spec.length {
        return Err(ControllerError::ResponseLengthMismatch {
            response: spec.name.to_string(),
            expected: spec.length,
            actual: result.length.saturating_mul(2),
        });
    }

    let decoded = decode_response(&result.data, registry)?;
    if decoded.is_not_acknowledge() {
        let echo = decoded.hex(NAK_ECHO_FIELD).unwrap_or("00");
        let code = decoded.hex(NAK_CODE_FIELD).unwrap_or("00");
        return Err(ControllerError::NotAcknowledged {
            command: command.name.to_string(),
            echo: from_hex(echo)? as u8,
            code: from_hex(code)? as u8,
        });
    }
    if decoded.opcode != command.response {
        return Err(ControllerError::UnexpectedResponse {
            expected: command.response,
            actual: decoded.opcode,
        });
    }

    debug!(stage = %Stage::Done, command = command.name, response = decoded.response_type, "request complete");
    Ok(decoded)
}

/// Log a failed request once, with the stage it failed in.
pub(crate) fn report<T>(name: &str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        warn!(command = name, stage = %err.stage(), status = ?err.status(), error = %err, "request failed");
    }
    result
}
