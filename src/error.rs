use std::path::PathBuf;

/// Errors raised while building a counter session.
///
/// Counter operations themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("no tokio runtime is running on this thread")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("minimum interval must be at least 1 second")]
    ZeroMinInterval,

    #[error("interval bounds are inverted: min {min}s > max {max}s")]
    InvertedBounds { min: u32, max: u32 },

    #[error("initial interval {initial}s is outside [{min}s, {max}s]")]
    InitialIntervalOutOfRange { initial: u32, min: u32, max: u32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
