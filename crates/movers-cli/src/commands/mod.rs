//! CLI 명령어 구현 모듈.

pub mod market;
pub mod output;
pub mod theme;
pub mod top;

// 각 서브모듈 직접 사용 권장 (ambiguous re-export 방지)
