//! 데이터 Provider 모듈.
//!
//! ## 페이지 가져오기
//! - `PageFetcher`: URL → 바이트 경계 (테스트에서 교체 가능)
//! - `HttpFetcher`: reqwest 기반 구현, 경로별 EUC-KR/UTF-8 디코딩
//!
//! ## 네이버 금융
//! - `Endpoints`: 리포트 페이지 URL
//! - `NaverClient`: 상위 종목, 지수, 종목 상세, 테마 구성 종목, 일별 지수 조회

pub mod endpoints;
pub mod fetcher;
pub mod naver;

pub use endpoints::Endpoints;
pub use fetcher::{HttpFetcher, PageFetcher, SourceEncoding};
pub use naver::{NaverClient, MAX_HISTORY_PAGES};
