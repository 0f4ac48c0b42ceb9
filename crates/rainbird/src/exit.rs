use std::fmt;

use rainbird_controller::ControllerError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Map a controller failure onto an exit code class.
///
/// Usage errors never reached the network; device errors mean the controller
/// answered and said no; data errors mean the answer could not be trusted.
pub fn controller_error(context: &str, err: ControllerError) -> CliError {
    let code = match &err {
        ControllerError::UnknownCommand(_) | ControllerError::ParameterLengthMismatch { .. } => {
            USAGE
        }
        ControllerError::Sealing(_) => INTERNAL,
        ControllerError::Transport(_) if err.is_timeout() => TIMEOUT,
        ControllerError::Transport(_) if matches!(err.status(), Some(401 | 403)) => {
            PERMISSION_DENIED
        }
        ControllerError::Transport(_) => TRANSPORT_ERROR,
        ControllerError::DeviceProtocol { .. } | ControllerError::NotAcknowledged { .. } => FAILURE,
        ControllerError::MalformedEnvelope(_)
        | ControllerError::InvalidEnvelopeShape(_)
        | ControllerError::UnknownResponseCode(_)
        | ControllerError::ResponseLengthMismatch { .. }
        | ControllerError::MalformedHex(_)
        | ControllerError::UnexpectedResponse { .. } => DATA_INVALID,
    };
    CliError::new(code, format!("{context}: {err}"))
}
