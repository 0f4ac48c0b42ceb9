/// Errors that can occur while building or decoding SIP payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SipError {
    /// No command with this name exists in the registry.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The assembled frame does not match the command's declared length.
    #[error("parameter length mismatch for {command} (expected {expected} bytes, got {actual} hex digits)")]
    ParameterLengthMismatch {
        command: String,
        expected: usize,
        actual: usize,
    },

    /// The reply opcode has no registry entry.
    #[error("unknown response code: {0}")]
    UnknownResponseCode(String),

    /// The reply payload does not match the response's declared length.
    #[error("response length mismatch for {response} (expected {expected} bytes, got {actual} hex digits)")]
    ResponseLengthMismatch {
        response: String,
        expected: usize,
        actual: usize,
    },

    /// Text that should be hexadecimal is not.
    #[error("malformed hex: {0:?}")]
    MalformedHex(String),
}

pub type Result<T> = std::result::Result<T, SipError>;
