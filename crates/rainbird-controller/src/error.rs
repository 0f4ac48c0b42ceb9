use rainbird_envelope::EnvelopeError;
use rainbird_sip::SipError;
use rainbird_transport::TransportError;

use crate::exchange::Stage;

/// Errors that can occur while running a controller request.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// No command with this name exists.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The assembled frame does not match the command's declared length.
    #[error("parameter length mismatch for {command} (expected {expected} bytes, got {actual} hex digits)")]
    ParameterLengthMismatch {
        command: String,
        expected: usize,
        actual: usize,
    },

    /// The request body could not be encrypted.
    #[error("failed to seal request: {0}")]
    Sealing(#[source] EnvelopeError),

    /// The HTTP exchange failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The reply could not be decrypted or is not JSON.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[source] EnvelopeError),

    /// The decrypted reply is JSON but not a usable JSON-RPC reply.
    #[error("invalid envelope shape: {0}")]
    InvalidEnvelopeShape(String),

    /// The controller answered with a JSON-RPC error object.
    #[error("controller reported error {code}: {message}")]
    DeviceProtocol { code: i64, message: String },

    /// The reply opcode is not in the registry.
    #[error("unknown response code: {0}")]
    UnknownResponseCode(String),

    /// The reply does not match its declared length.
    ///
    /// `actual` is the observed length in hex digits.
    #[error("response length mismatch for {response} (expected {expected} bytes, got {actual} hex digits)")]
    ResponseLengthMismatch {
        response: String,
        expected: usize,
        actual: usize,
    },

    /// Text that should be hexadecimal is not.
    #[error("malformed hex: {0:?}")]
    MalformedHex(String),

    /// The controller refused the command.
    ///
    /// `echo` is the command opcode echoed back in the refusal.
    #[error("{command} rejected by controller (echo {echo:02X}, NAK code {code:#04X})")]
    NotAcknowledged { command: String, echo: u8, code: u8 },

    /// The reply is valid but answers a different command.
    #[error("expected response {expected:02X}, got {actual:02X}")]
    UnexpectedResponse { expected: u8, actual: u8 },
}

impl ControllerError {
    /// Stage of the request pipeline that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            ControllerError::UnknownCommand(_) => Stage::Resolving,
            ControllerError::ParameterLengthMismatch { .. } => Stage::Building,
            ControllerError::Sealing(_) => Stage::Sealing,
            ControllerError::Transport(_) => Stage::AwaitingTransport,
            ControllerError::MalformedEnvelope(_) => Stage::Unsealing,
            ControllerError::InvalidEnvelopeShape(_) | ControllerError::DeviceProtocol { .. } => {
                Stage::ValidatingEnvelope
            }
            ControllerError::UnknownResponseCode(_)
            | ControllerError::ResponseLengthMismatch { .. }
            | ControllerError::MalformedHex(_)
            | ControllerError::NotAcknowledged { .. }
            | ControllerError::UnexpectedResponse { .. } => Stage::Decoding,
        }
    }

    /// HTTP status of a transport failure, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ControllerError::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// True when the transport gave up waiting for the controller.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ControllerError::Transport(err) if err.is_timeout())
    }
}

impl From<SipError> for ControllerError {
    fn from(err: SipError) -> Self {
        match err {
            SipError::UnknownCommand(name) => ControllerError::UnknownCommand(name),
            SipError::ParameterLengthMismatch {
                command,
                expected,
                actual,
            } => ControllerError::ParameterLengthMismatch {
                command,
                expected,
                actual,
            },
            SipError::UnknownResponseCode(code) => ControllerError::UnknownResponseCode(code),
            SipError::ResponseLengthMismatch {
                response,
                expected,
                actual,
            } => ControllerError::ResponseLengthMismatch {
                response,
                expected,
                actual,
            },
            SipError::MalformedHex(text) => ControllerError::MalformedHex(text),
        }
    }
}

pub type Result<T> = std::result::Result<T, ControllerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sip_errors_keep_their_kind() {
        let err: ControllerError = SipError::UnknownCommand("Nope".to_string()).into();
        assert!(matches!(err, ControllerError::UnknownCommand(ref n) if n == "Nope"));
        assert_eq!(err.stage(), Stage::Resolving);

        let err: ControllerError = SipError::ParameterLengthMismatch {
            command: "RainDelaySetRequest".to_string(),
            expected: 3,
            actual: 8,
        }
        .into();
        assert_eq!(err.stage(), Stage::Building);

        let err: ControllerError = SipError::UnknownResponseCode("7F".to_string()).into();
        assert_eq!(err.stage(), Stage::Decoding);
        assert_eq!(err.status(), None);
        assert!(!err.is_timeout());
    }

    #[test]
    fn messages_render_opcodes_as_hex() {
        let err = ControllerError::UnexpectedResponse {
            expected: 0x90,
            actual: 0xB6,
        };
        assert_eq!(err.to_string(), "expected response 90, got B6");

        let err = ControllerError::NotAcknowledged {
            command: "StopIrrigationRequest".to_string(),
            echo: 0x40,
            code: 2,
        };
        assert_eq!(
            err.to_string(),
            "StopIrrigationRequest rejected by controller (echo 40, NAK code 0x02)"
        );
    }
}
