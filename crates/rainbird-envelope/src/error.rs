/// Errors that can occur while sealing or unsealing an envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The request body could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The envelope is shorter than its fixed header.
    #[error("envelope too short ({len} bytes, need at least {min})")]
    TooShort { len: usize, min: usize },

    /// The ciphertext does not split into whole AES blocks.
    #[error("ciphertext length {0} is not a multiple of the AES block size")]
    UnalignedCiphertext(usize),

    /// The decrypted body is not UTF-8 (usually a wrong password).
    #[error("decrypted body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The decrypted body is not JSON.
    #[error("decrypted body is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EnvelopeError>;
