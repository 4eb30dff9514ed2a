use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContrastError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a binary PNM file (missing P5/P6 magic)")]
    BadMagic,

    #[error("Unsupported PNM type: P{0} (only P5 and P6)")]
    UnsupportedType(u32),

    #[error("Malformed PNM header: {0}")]
    MalformedHeader(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Truncated sample data: expected {expected} bytes, got {actual}")]
    TruncatedData { expected: usize, actual: usize },

    #[error("Ignore rate {0} outside [0.0, 0.5)")]
    InvalidIgnoreRate(f32),

    #[error("Unable to correct contrast: thresholds resolved to [{min}, {max}]")]
    CorrectionImpossible { min: u8, max: u8 },

    #[error("Worker pool error: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, ContrastError>;
