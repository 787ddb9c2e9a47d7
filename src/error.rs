use std::path::PathBuf;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    /// Missing or invalid `pyproject.toml` fields, unknown style names
    ConfigurationError(String),
    ParseError { file: PathBuf, message: String },
    SerializationError(String),
}

impl Error {
    /// Shorthand for building a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Error::ConfigurationError(message.into())
    }

    /// Whether this error came from the project manifest or settings
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::ConfigurationError(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO 错误: {}", e),
            Error::ConfigurationError(msg) => write!(f, "配置错误: {}", msg),
            Error::ParseError { file, message } => {
                write!(f, "解析错误 {}: {}", file.display(), message)
            }
            Error::SerializationError(msg) => write!(f, "序列化错误: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        match err.into_io_error() {
            Some(io) => Error::IoError(io),
            None => Error::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                "filesystem loop detected",
            )),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigurationError(format!("pyproject.toml: {}", err.message()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON 序列化错误: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML 序列化错误: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = Error::config("missing [project] version");
        assert!(err.is_configuration());
        assert!(err.to_string().contains("missing [project] version"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(!err.is_configuration());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_toml_error_is_configuration() {
        let err: Error = toml::from_str::<toml::Value>("name = ").unwrap_err().into();
        assert!(err.is_configuration());
    }
}
