//! 데이터 수집 모듈.

pub mod theme_sync;

pub use theme_sync::{build_and_save, crawl_themes, sync_themes};
