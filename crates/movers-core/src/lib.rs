//! # Movers Core
//!
//! 시세 집계 파이프라인의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 종목 레코드 및 테마 구성 종목
//! - 지수 스냅샷
//! - 리포트 페이지 레이아웃(소스 변형)별 컬럼 맵
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
