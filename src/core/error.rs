use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("Unsupported fill value: handle-like cells only accept the empty value")]
    UnsupportedDefault,

    #[error("Cell ({x}, {y}) is outside the grid")]
    OutOfRange { x: i32, y: i32 },

    #[error("Data length {actual} does not match grid capacity {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Record carries no cell data")]
    MissingData,

    #[error("Invalid pool configuration: {0}")]
    Config(String),

    #[error("Failed to parse pool configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;
