use crate::status::ReturnCode;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UcanError {
    #[error("SYSTEC - `{func}` failed with library error {:#04X}: {}, args: {args}", .code.0, .code.message())]
    Library { code: ReturnCode, func: &'static str, args: String },
    #[error("SYSTEC - `{func}` failed with firmware error {:#04X}: {}, args: {args}", .code.0, .code.message())]
    Command { code: ReturnCode, func: &'static str, args: String },

    #[error("SYSTEC - can't open library: {0}")]
    LibraryLoad(String),

    #[error("SYSTEC - hardware is not initialized")]
    HardwareNotInitialized,
    #[error("SYSTEC - channel: {0} is not initialized")]
    ChannelNotInitialized(u8),
    #[error("SYSTEC - channel: {0} is not supported")]
    ChannelNotSupported(u8),
    #[error("SYSTEC - parameter: {0} not supported")]
    ParameterNotSupported(String),

    #[error("SYSTEC - data length: {0} is too large")]
    DataOutOfRange(usize),

    #[error("SYSTEC - configuration error: {0}")]
    ConfigError(String),
}

impl UcanError {
    #[inline]
    pub fn config_error<T: Into<String>>(msg: T) -> Self {
        Self::ConfigError(msg.into())
    }
    #[inline]
    pub fn parameter_not_supported<T: std::fmt::Display>(value: T) -> Self {
        Self::ParameterNotSupported(value.to_string())
    }
    /// The raw return code when the error came from a native call.
    #[inline]
    pub fn code(&self) -> Option<ReturnCode> {
        match self {
            Self::Library { code, .. } | Self::Command { code, .. } => Some(*code),
            _ => None,
        }
    }
}
