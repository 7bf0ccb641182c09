use derive_more::Display;

/// Failures of the bot service API.
///
/// `Display` is the exact text surfaced in the dashboard error slot.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ApiError {
    /// Request never produced a response (network down, CORS, aborted)
    #[display(fmt = "{}", _0)]
    Transport(String),
    /// Non-success status on an operation with a fixed failure message
    #[display(fmt = "{} failed", operation)]
    Status { operation: &'static str, code: u16 },
    /// Non-success status whose response body is the message
    #[display(fmt = "{}", _0)]
    Rejected(String),
    /// Success status with a body that could not be read
    #[display(fmt = "{}", _0)]
    Decode(String),
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(operation: &'static str, code: u16) -> Self {
        Self::Status { operation, code }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
