use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failures surfaced while loading a [`GameConfig`](crate::config::GameConfig).
///
/// The simulation itself never fails; configuration is the only fallible input.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, message: String },
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "read config {}: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "parse RON in {}: {message}", path.display())
            }
            Self::Invalid { field, reason } => write!(f, "invalid config `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
