/// Error code registry for hdctl
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 4000-4999: Execution errors
/// - 7000-7999: Validation errors
/// - 9000-9999: Other errors
#[allow(dead_code)]
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_PARSE_ERROR: u16 = 1002;
    pub const CONFIG_INVALID_VALUE: u16 = 1003;
    pub const CONFIG_VALIDATION_FAILED: u16 = 1004;

    // Execution errors (4000-4999)
    pub const EXEC_GENERIC: u16 = 4000;
    pub const EXEC_COMMAND_NOT_FOUND: u16 = 4001;
    pub const EXEC_TIMEOUT: u16 = 4002;
    pub const EXEC_SUBPROCESS_FAILED: u16 = 4003;
    pub const EXEC_SIGNAL_RECEIVED: u16 = 4004;
    pub const EXEC_SPAWN_FAILED: u16 = 4005;
    pub const EXEC_MISSING_INPUT: u16 = 4006;
    pub const EXEC_STEPS_FAILED: u16 = 4007;

    // Validation errors (7000-7999)
    pub const VALIDATION_GENERIC: u16 = 7000;
    pub const VALIDATION_INVALID_PATH: u16 = 7001;
    pub const VALIDATION_INVALID_IDENT: u16 = 7002;
    pub const VALIDATION_INVALID_COMMAND: u16 = 7004;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::CONFIG_GENERIC => "General configuration error",
        ErrorCode::CONFIG_NOT_FOUND => "Configuration file not found",
        ErrorCode::CONFIG_PARSE_ERROR => "Configuration file could not be parsed",
        ErrorCode::CONFIG_INVALID_VALUE => "Invalid configuration value",
        ErrorCode::CONFIG_VALIDATION_FAILED => "Configuration validation failed",

        ErrorCode::EXEC_GENERIC => "General execution error",
        ErrorCode::EXEC_COMMAND_NOT_FOUND => "Command not found",
        ErrorCode::EXEC_TIMEOUT => "Command timed out",
        ErrorCode::EXEC_SUBPROCESS_FAILED => "Subprocess exited with a failure status",
        ErrorCode::EXEC_SIGNAL_RECEIVED => "Subprocess terminated by signal",
        ErrorCode::EXEC_SPAWN_FAILED => "Failed to spawn subprocess",
        ErrorCode::EXEC_MISSING_INPUT => "Required local input file is missing",
        ErrorCode::EXEC_STEPS_FAILED => "One or more steps failed",

        ErrorCode::VALIDATION_GENERIC => "General validation error",
        ErrorCode::VALIDATION_INVALID_PATH => "Invalid HDFS path",
        ErrorCode::VALIDATION_INVALID_IDENT => "Invalid daemon identity string",
        ErrorCode::VALIDATION_INVALID_COMMAND => "Invalid command line",

        _ => "Unknown error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_described() {
        for code in [
            ErrorCode::CONFIG_PARSE_ERROR,
            ErrorCode::EXEC_MISSING_INPUT,
            ErrorCode::VALIDATION_INVALID_IDENT,
        ] {
            assert_ne!(describe_error_code(code), "Unknown error");
        }
        assert_eq!(describe_error_code(1234), "Unknown error");
    }
}
