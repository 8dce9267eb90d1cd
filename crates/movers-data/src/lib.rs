//! 시세 리포트 수집 및 가공.
//!
//! 이 crate는 다음을 제공합니다:
//! - 리포트 페이지 가져오기 (인코딩 처리 포함)
//! - HTML 표 추출 및 셀 정규화
//! - 다중 소스 집계 (중복 제거, 정렬, 순위)
//! - 등락률/상품 필터 뷰와 활성 테마 묶음
//! - 테마 매핑 파일 및 런타임 테마 조회

pub mod aggregate;
pub mod error;
pub mod parse;
pub mod provider;
pub mod theme;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregate::{aggregate, merge_ranked, Source, SourceFailure, TopStocks};
pub use error::{DataError, FetchError, FieldError, MappingError, MappingGap, ParseError, Result};
pub use provider::{Endpoints, HttpFetcher, NaverClient, PageFetcher, SourceEncoding};
pub use theme::{ThemeMapping, ThemeResolver};
pub use view::{active_themes, ActiveTheme, ViewFilter, ViewRow, EXCLUDED_INSTRUMENT_KEYWORDS};
