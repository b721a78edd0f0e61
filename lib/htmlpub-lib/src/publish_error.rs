use core::fmt;
use std::{error, io};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishErrorKind {
    /// Invalid or inconsistent configuration
    Config,
    Io,
    /// Catalog could not be reconciled with its previous content
    Catalog,
    /// Malformed configuration or order file
    Parse,
}

#[derive(Debug)]
pub struct PublishError {
    message: String,
    context: Option<String>,
    kind: PublishErrorKind,
}
impl PublishError {
    pub fn new<S: Into<String>>(message: S, kind: PublishErrorKind) -> PublishError {
        PublishError {
            message: message.into(),
            kind,
            context: None,
        }
    }

    pub fn config<S: Into<String>>(message: S) -> PublishError {
        Self::new(message, PublishErrorKind::Config)
    }

    pub fn io<S: Into<String>>(message: S) -> PublishError {
        Self::new(message, PublishErrorKind::Io)
    }

    pub fn catalog<S: Into<String>>(message: S) -> PublishError {
        Self::new(message, PublishErrorKind::Catalog)
    }

    pub fn parse<S: Into<String>>(message: S) -> PublishError {
        Self::new(message, PublishErrorKind::Parse)
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn kind(&self) -> PublishErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
impl From<io::Error> for PublishError {
    fn from(error: io::Error) -> Self {
        Self::io(error.to_string())
    }
}
impl From<toml::de::Error> for PublishError {
    fn from(error: toml::de::Error) -> Self {
        Self::parse(error.to_string())
    }
}
impl From<serde_yaml::Error> for PublishError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::parse(error.to_string())
    }
}
impl From<glob::PatternError> for PublishError {
    fn from(error: glob::PatternError) -> Self {
        Self::config(error.to_string())
    }
}
impl From<glob::GlobError> for PublishError {
    fn from(error: glob::GlobError) -> Self {
        Self::io(error.to_string())
    }
}

impl error::Error for PublishError {}
impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let context = if let Some(context) = &self.context {
            format!(" with context '{context}'")
        } else {
            "".into()
        };
        write!(f, "Error when publishing: {}{context}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_context() {
        let error = PublishError::config("output root is not set").with_context("site.toml");
        assert_eq!(error.kind(), PublishErrorKind::Config);
        assert_eq!(
            error.to_string(),
            "Error when publishing: output root is not set with context 'site.toml'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let error: PublishError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(error.kind(), PublishErrorKind::Io);
        assert_eq!(error.message(), "gone");
    }
}
