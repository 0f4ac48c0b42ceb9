use std::fmt;

/// Connection settings for one controller.
#[derive(Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Host or `host:port` of the LNK module.
    pub address: String,
    /// Controller password. The envelope key is derived from it and it is
    /// redacted in debug output.
    pub password: String,
    /// Log frame hex and decrypted JSON bodies at debug level.
    pub debug: bool,
}

impl ControllerConfig {
    pub fn new(address: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            password: password.into(),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("address", &self.address)
            .field(
                "password",
                &format_args!("<redacted:{} bytes>", self.password.len()),
            )
            .field("debug", &self.debug)
            .finish()
    }
}
