use std::thread::ThreadId;

/// Errors produced by the pixel store, the GPU texture and their setup path
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    /// A writer or reader was handed a buffer of the wrong length
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Dimensions are zero, overflow the byte count, or exceed device limits
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The GPU texture could not be created or configured
    #[error("failed to allocate GPU texture: {0}")]
    ResourceAllocation(String),

    /// Upload/bind issued from a thread that does not own the graphics context
    #[error("texture upload issued from {actual:?}, but the graphics context belongs to {owner:?}")]
    ContextAffinity { owner: ThreadId, actual: ThreadId },

    /// Adapter or device acquisition failed
    #[error("GPU initialization failed: {0}")]
    GpuInit(String),

    /// Surface creation or frame acquisition failed
    #[error("surface error: {0}")]
    Surface(String),

    /// Texture read-back failed
    #[error("texture readback failed: {0}")]
    Readback(String),

    /// The producer thread terminated abnormally
    #[error("producer failed: {0}")]
    Producer(String),

    /// Configuration values were rejected
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RendererError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_mismatch_message_names_both_lengths() {
        let err = RendererError::SizeMismatch { expected: 8, actual: 3 };
        let msg = err.to_string();
        assert!(msg.contains('8'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn json_errors_convert() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: RendererError = parse.unwrap_err().into();
        assert!(matches!(err, RendererError::Json(_)));
    }
}
