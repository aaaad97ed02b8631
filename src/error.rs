#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown layout strategy: {0}")]
    UnknownStrategy(String),
    #[error("invalid value for {field}: {value}")]
    InvalidConfig { field: &'static str, value: f32 },
    #[error("failed to parse config file: {0}")]
    ConfigSyntax(#[from] json5::Error),
    #[error("failed to parse graph document: {0}")]
    Document(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
