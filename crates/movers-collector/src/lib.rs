//! Offline theme mapping builder for the market movers pipeline.
//!
//! 이 crate는 런타임 조회 경로와 독립적으로 실행되는 바이너리를 제공합니다:
//! - 테마 목록 및 테마별 구성 종목 크롤링
//! - 종목 → 테마, 테마 → 번호 매핑 파일 생성

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::{CollectorConfig, ThemeCrawlConfig};
pub use error::{CollectorError, Result};
pub use stats::CollectionStats;
