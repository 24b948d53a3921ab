//! Error handling for Echoline
//!
//! Configuration errors fail fast at `prepare` time; the audio path itself
//! is infallible once prepared. Everything else (file I/O, presets) wraps
//! the underlying error with enough context to act on.

use thiserror::Error;

/// Result type alias for Echoline operations
pub type Result<T> = std::result::Result<T, EcholineError>;

/// Main error type for Echoline operations
#[derive(Error, Debug)]
pub enum EcholineError {
    // Configuration errors (prepare-time, non-recoverable within the call)
    #[error("Invalid sample rate: {sample_rate} Hz (must be positive and finite)")]
    InvalidSampleRate { sample_rate: f64 },

    #[error("Invalid block size: {block_size} (must be > 0 and fit the {capacity}-sample delay line)")]
    InvalidBlockSize { block_size: usize, capacity: usize },

    #[error("Invalid channel count: {channels} (at least one channel required)")]
    InvalidChannelCount { channels: usize },

    // File errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // Preset errors
    #[error("Invalid preset: {reason}")]
    InvalidPreset { reason: String },

    #[error("Unsupported preset version: {version} (current: {current})")]
    UnsupportedPresetVersion { version: String, current: String },

    // Parameter errors
    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    #[error("Invalid value for parameter {name}: {value}")]
    InvalidParameterValue { name: String, value: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EcholineError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            EcholineError::InvalidSampleRate { .. } => "INVALID_SAMPLE_RATE",
            EcholineError::InvalidBlockSize { .. } => "INVALID_BLOCK_SIZE",
            EcholineError::InvalidChannelCount { .. } => "INVALID_CHANNEL_COUNT",
            EcholineError::FileNotFound { .. } => "FILE_NOT_FOUND",
            EcholineError::InvalidAudio { .. } => "INVALID_AUDIO",
            EcholineError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            EcholineError::EmptyAudio => "EMPTY_AUDIO",
            EcholineError::InvalidPreset { .. } => "INVALID_PRESET",
            EcholineError::UnsupportedPresetVersion { .. } => "UNSUPPORTED_PRESET_VERSION",
            EcholineError::UnknownParameter { .. } => "UNKNOWN_PARAMETER",
            EcholineError::InvalidParameterValue { .. } => "INVALID_PARAMETER_VALUE",
            EcholineError::Io(_) => "IO_ERROR",
            EcholineError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether the caller can reasonably retry after fixing the input
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            EcholineError::Io(_) | EcholineError::Serialization(_)
        )
    }
}
