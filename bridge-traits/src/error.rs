use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SdkError {
    /// The capability does not exist on this platform or build.
    #[error("player services capability not available: {0}")]
    NotSupported(String),

    /// A failure reported by the native SDK, preserved verbatim.
    #[error("{description} (native code {code})")]
    Native { code: i64, description: String },

    /// An adapter-level failure with no native code attached.
    #[error("platform operation failed: {0}")]
    OperationFailed(String),
}

pub type Result<T> = std::result::Result<T, SdkError>;
