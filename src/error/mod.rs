use std::path::PathBuf;
use thiserror::Error;

use crate::env::DotenvError;
use crate::expand::SyntaxError;

pub mod codes;
pub mod helpers;

pub use codes::ErrorCode;
pub use helpers::{common, ErrorExt};

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// The unified error type for boilr
#[derive(Error, Debug)]
pub enum BoilrError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Template error: {message}")]
    Template {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        position: Option<usize>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Storage error: {message}")]
    Storage {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Validation error: {message}")]
    Validation {
        code: u16,
        message: String,
        field: Option<String>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] {message}")]
    Other {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl BoilrError {
    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::config_with_code(ErrorCode::CONFIG_GENERIC, message)
    }

    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a template error with specific code
    pub fn template_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Template {
            code,
            message: message.into(),
            path: None,
            position: None,
            source: None,
        }
    }

    /// Create a storage error with default code
    pub fn storage(message: impl Into<String>) -> Self {
        Self::storage_with_code(ErrorCode::STORAGE_GENERIC, message, None)
    }

    /// Create a storage error with specific code and path
    pub fn storage_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Storage {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a validation error with specific code and field
    pub fn validation_with_code(
        code: u16,
        message: impl Into<String>,
        field: Option<String>,
    ) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            field,
            source: None,
        }
    }

    /// Create a generic other error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            code: ErrorCode::OTHER_GENERIC,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(mut self, source: impl Into<BoxedSource>) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Template { source: src, .. }
            | Self::Storage { source: src, .. }
            | Self::Validation { source: src, .. }
            | Self::Other { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Attach the file a template or storage error concerns
    pub fn with_path(mut self, new_path: impl Into<PathBuf>) -> Self {
        match &mut self {
            Self::Template { path, .. } | Self::Storage { path, .. } => {
                *path = Some(new_path.into());
            }
            _ => {}
        }
        self
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Template { .. } => 3,
            Self::Storage { .. } => 4,
            Self::Validation { .. } => 8,
            Self::Other { .. } => 1,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Template { code, .. }
            | Self::Storage { code, .. }
            | Self::Validation { code, .. }
            | Self::Other { code, .. } => *code,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, .. } => format!("Configuration problem: {}", message),
            Self::Template { message, path, .. } => match path {
                Some(p) => format!("Template error in {}: {}", p.display(), message),
                None => format!("Template error: {}", message),
            },
            Self::Storage { message, path, .. } => match path {
                Some(p) => format!("Storage error at {}: {}", p.display(), message),
                None => format!("Storage error: {}", message),
            },
            Self::Validation { message, field, .. } => match field {
                Some(f) => format!("Validation error for '{}': {}", f, message),
                None => format!("Validation error: {}", message),
            },
            Self::Other { message, .. } => message.clone(),
        }
    }

    /// Get a developer-friendly error message with full chain
    pub fn developer_message(&self) -> String {
        let mut msg = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            msg.push_str(&format!("\n  caused by: {}", cause));
            source = cause.source();
        }
        msg
    }
}

/// Type alias for Results using BoilrError
pub type Result<T> = std::result::Result<T, BoilrError>;

// Conversion from common error types

impl From<std::io::Error> for BoilrError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let (code, message) = match err.kind() {
            ErrorKind::NotFound => (ErrorCode::STORAGE_NOT_FOUND, "File or directory not found"),
            ErrorKind::PermissionDenied => {
                (ErrorCode::STORAGE_PERMISSION_DENIED, "Permission denied")
            }
            ErrorKind::AlreadyExists => (ErrorCode::STORAGE_ALREADY_EXISTS, "Already exists"),
            ErrorKind::InvalidInput => (ErrorCode::VALIDATION_INVALID_INPUT, "Invalid input"),
            ErrorKind::InvalidData => (ErrorCode::VALIDATION_INVALID_DATA, "Invalid data"),
            _ => (ErrorCode::STORAGE_IO_ERROR, "IO operation failed"),
        };

        BoilrError::storage_with_code(code, message, None).with_source(err)
    }
}

impl From<SyntaxError> for BoilrError {
    fn from(err: SyntaxError) -> Self {
        BoilrError::Template {
            code: ErrorCode::TEMPLATE_SYNTAX,
            message: err.to_string(),
            path: None,
            position: Some(err.position),
            source: None,
        }
    }
}

impl From<DotenvError> for BoilrError {
    fn from(err: DotenvError) -> Self {
        let code = match &err {
            DotenvError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ErrorCode::CONFIG_ENV_FILE_NOT_FOUND
            }
            _ => ErrorCode::CONFIG_ENV_FILE_INVALID,
        };
        BoilrError::config_with_code(code, err.to_string()).with_source(err)
    }
}

impl From<walkdir::Error> for BoilrError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf());
        BoilrError::storage_with_code(ErrorCode::STORAGE_WALK_FAILED, "Directory traversal failed", path)
            .with_source(err)
    }
}
