//! `movers` CLI 명령 구현.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 거래대금/거래량 상위 종목 뷰와 활성 테마
//! - 코스피/코스닥 지수 스냅샷과 일별 추이
//! - 개별 종목 및 테마 구성 종목 조회

pub mod commands;
