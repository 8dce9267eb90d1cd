//! 핵심 에러 타입.

use thiserror::Error;

/// 코어 에러.
#[derive(Debug, Error)]
pub enum MoversError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

impl From<config::ConfigError> for MoversError {
    fn from(err: config::ConfigError) -> Self {
        MoversError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MoversError::InvalidInput("sort=price".to_string());
        assert_eq!(err.to_string(), "잘못된 입력: sort=price");
    }
}
