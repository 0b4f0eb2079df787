use super::{BoilrError, ErrorCode};

/// Extension trait for convenient error conversion
pub trait ErrorExt<T> {
    /// Convert to BoilrError with context
    fn to_boilr(self, context: impl Into<String>) -> Result<T, BoilrError>;

    /// Convert to BoilrError with specific error type
    fn to_config_error(self, message: impl Into<String>) -> Result<T, BoilrError>;
    fn to_storage_error(self, message: impl Into<String>) -> Result<T, BoilrError>;
}

impl<T, E> ErrorExt<T> for Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn to_boilr(self, context: impl Into<String>) -> Result<T, BoilrError> {
        self.map_err(|e| BoilrError::other(context).with_source(e))
    }

    fn to_config_error(self, message: impl Into<String>) -> Result<T, BoilrError> {
        self.map_err(|e| BoilrError::config(message).with_source(e))
    }

    fn to_storage_error(self, message: impl Into<String>) -> Result<T, BoilrError> {
        self.map_err(|e| BoilrError::storage(message).with_source(e))
    }
}

/// Helper functions for common error scenarios
pub mod common {
    use super::*;
    use crate::env::DotenvError;
    use std::path::Path;

    /// The `-f` template does not exist
    pub fn file_not_found(path: impl AsRef<Path>) -> BoilrError {
        BoilrError::validation_with_code(
            ErrorCode::VALIDATION_FILE_NOT_FOUND,
            format!("file '{}' does not exist", path.as_ref().display()),
            Some("file".to_string()),
        )
    }

    /// The `-d` template directory does not exist
    pub fn directory_not_found(path: impl AsRef<Path>) -> BoilrError {
        BoilrError::validation_with_code(
            ErrorCode::VALIDATION_DIR_NOT_FOUND,
            format!("directory '{}' does not exist", path.as_ref().display()),
            Some("dir".to_string()),
        )
    }

    /// Rendering a directory onto itself would overwrite the templates
    pub fn same_input_output(path: impl AsRef<Path>) -> BoilrError {
        BoilrError::validation_with_code(
            ErrorCode::VALIDATION_SAME_INPUT_OUTPUT,
            format!(
                "output directory '{}' must differ from the input directory",
                path.as_ref().display()
            ),
            Some("output".to_string()),
        )
    }

    /// An env file given with `--env-file` does not exist
    pub fn env_file_not_found(path: impl AsRef<Path>) -> BoilrError {
        BoilrError::config_with_code(
            ErrorCode::CONFIG_ENV_FILE_NOT_FOUND,
            format!("env file '{}' does not exist", path.as_ref().display()),
        )
    }

    /// A `-e` argument that is not a `KEY=VALUE` pair
    pub fn invalid_pair(source: DotenvError) -> BoilrError {
        BoilrError::config_with_code(
            ErrorCode::CONFIG_INVALID_PAIR,
            format!("invalid -e variable ({})", source),
        )
        .with_source(source)
    }

    /// A path that cannot be expanded as text
    pub fn invalid_path(path: impl AsRef<Path>) -> BoilrError {
        BoilrError::template_with_code(
            ErrorCode::TEMPLATE_INVALID_PATH,
            format!("path is not valid UTF-8: {}", path.as_ref().display()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_ext_wraps_source() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk on fire",
        ));
        let err = result.to_storage_error("Failed to write output").unwrap_err();
        assert_eq!(err.code(), ErrorCode::STORAGE_GENERIC);
        assert!(err.developer_message().contains("caused by: disk on fire"));
    }

    #[test]
    fn test_common_messages() {
        assert_eq!(
            common::file_not_found("a.tpl").to_string(),
            "[E7001] Validation error: file 'a.tpl' does not exist"
        );
        assert_eq!(
            common::directory_not_found("tpl").to_string(),
            "[E7002] Validation error: directory 'tpl' does not exist"
        );
        assert_eq!(common::same_input_output("x").exit_code(), 8);
        assert_eq!(common::env_file_not_found("vars.env").exit_code(), 2);
    }

    #[test]
    fn test_error_ext_categories() {
        let missing: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = missing.to_config_error("Failed to get current directory").unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_GENERIC);
        assert_eq!(err.exit_code(), 2);

        let closed: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        let err = closed.to_boilr("Failed to flush output").unwrap_err();
        assert_eq!(err.code(), ErrorCode::OTHER_GENERIC);
        assert_eq!(err.exit_code(), 1);
    }
}
