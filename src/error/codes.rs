/// Error code registry for boilr
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Template errors
/// - 3000-3999: Storage errors
/// - 7000-7999: Validation errors
/// - 9000-9999: Other errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_ENV_FILE_NOT_FOUND: u16 = 1001;
    pub const CONFIG_ENV_FILE_INVALID: u16 = 1002;
    pub const CONFIG_INVALID_PAIR: u16 = 1003;

    // Template errors (2000-2999)
    pub const TEMPLATE_SYNTAX: u16 = 2001;
    pub const TEMPLATE_INVALID_PATH: u16 = 2002;

    // Storage errors (3000-3999)
    pub const STORAGE_GENERIC: u16 = 3000;
    pub const STORAGE_IO_ERROR: u16 = 3001;
    pub const STORAGE_PERMISSION_DENIED: u16 = 3002;
    pub const STORAGE_NOT_FOUND: u16 = 3004;
    pub const STORAGE_ALREADY_EXISTS: u16 = 3005;
    pub const STORAGE_WALK_FAILED: u16 = 3006;

    // Validation errors (7000-7999)
    pub const VALIDATION_FILE_NOT_FOUND: u16 = 7001;
    pub const VALIDATION_DIR_NOT_FOUND: u16 = 7002;
    pub const VALIDATION_SAME_INPUT_OUTPUT: u16 = 7003;
    pub const VALIDATION_INVALID_INPUT: u16 = 7008;
    pub const VALIDATION_INVALID_DATA: u16 = 7009;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
}
