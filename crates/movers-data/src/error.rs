//! 데이터 모듈 오류 타입.
//!
//! 계층별로 오류를 나눕니다. 어떤 오류도 한 번의 갱신 전체를 중단시키지 않으며,
//! 호출자가 소스/행/항목 단위로 건너뛸지 결정합니다.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// 페이지 가져오기 실패 (네트워크, 시간 초과, 비정상 상태 코드).
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP 클라이언트 생성 실패
    #[error("HTTP 클라이언트 생성 실패: {0}")]
    Client(#[source] reqwest::Error),

    /// 연결/전송 오류
    #[error("HTTP 요청 실패 ({url}): {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 요청 시간 초과
    #[error("요청 시간 초과: {url}")]
    Timeout { url: String },

    /// 2xx가 아닌 응답
    #[error("비정상 응답 {status}: {url}")]
    Status { url: String, status: StatusCode },
}

impl FetchError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Http {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// 실패한 요청 URL
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Client(_) => None,
            Self::Http { url, .. } | Self::Timeout { url } | Self::Status { url, .. } => Some(url),
        }
    }
}

/// 문서 구조 오류.
#[derive(Debug, Error)]
pub enum ParseError {
    /// 셀렉터 문자열이 올바르지 않음
    #[error("잘못된 CSS 셀렉터 '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    /// 기대한 요소가 문서에 없음
    #[error("요소 없음: {0}")]
    MissingElement(String),
}

/// 한 행의 필드 정규화 실패. 해당 행만 버립니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// 필수 필드가 비어 있음
    #[error("필수 필드 없음: {field}")]
    Missing { field: &'static str },

    /// 숫자로 해석할 수 없는 텍스트
    #[error("필드 형식 오류: {field}={raw:?}")]
    Malformed { field: &'static str, raw: String },

    /// 레이아웃이 요구하는 셀 수보다 적음
    #[error("셀 부족: {found}/{expected}")]
    TooFewCells { expected: usize, found: usize },
}

/// 테마 매핑 누락. 해당 항목만 건너뜁니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingGap {
    /// 매핑에 없는 종목
    #[error("테마 매핑 없는 종목: {0}")]
    UnmappedStock(String),

    /// 번호가 없는 테마
    #[error("테마 번호 없음: {0}")]
    MissingThemeId(String),
}

/// 매핑 파일 입출력 오류.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("매핑 파일 I/O 실패 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("매핑 파일 형식 오류 ({path}): {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 데이터 crate 통합 오류.
#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

pub type Result<T> = std::result::Result<T, DataError>;
