//! 에러 타입 정의.

use std::fmt;

use movers_data::{DataError, FetchError, MappingError, ParseError};

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 설정 에러
    Config(String),
    /// 데이터 소스 에러 (테마 목록 없음 등)
    DataSource(String),
    /// 가져오기/파싱/매핑 파일 에러
    Data(DataError),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::DataSource(msg) => write!(f, "Data source error: {}", msg),
            Self::Data(e) => write!(f, "Data error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Data(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DataError> for CollectorError {
    fn from(err: DataError) -> Self {
        Self::Data(err)
    }
}

impl From<FetchError> for CollectorError {
    fn from(err: FetchError) -> Self {
        Self::Data(err.into())
    }
}

impl From<ParseError> for CollectorError {
    fn from(err: ParseError) -> Self {
        Self::Data(err.into())
    }
}

impl From<MappingError> for CollectorError {
    fn from(err: MappingError) -> Self {
        Self::Data(err.into())
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
