/// Stable error codes surfaced as process exit statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    Success = 0,
    GeneralError = 1,
    ValidationError = 3,
    ConfigError = 11,
    BackendError = 20,
    JobFailed = 21,
    Timeout = 30,
    Cancelled = 31,
    NetworkError = 40,
    AuthError = 41,
    FileAccessDenied = 61,
}

impl ErrorCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn exit_code(self) -> i32 {
        self.as_u16() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(ErrorCode::Success.exit_code(), 0);
        assert_eq!(ErrorCode::ValidationError.exit_code(), 3);
        assert_eq!(ErrorCode::ConfigError.exit_code(), 11);
        assert_eq!(ErrorCode::JobFailed.exit_code(), 21);
        assert_eq!(ErrorCode::Timeout.exit_code(), 30);
        assert_eq!(ErrorCode::AuthError.exit_code(), 41);
    }
}
