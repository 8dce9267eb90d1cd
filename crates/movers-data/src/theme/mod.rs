//! 테마 매핑.
//!
//! - `mapping`: 매핑 파일 읽기/쓰기와 조회
//! - `pages`: 테마 목록/구성 종목 페이지 파싱 (오프라인 크롤러용)
//! - `resolver`: 런타임 테마 조회

pub mod mapping;
pub mod pages;
pub mod resolver;

pub use mapping::ThemeMapping;
pub use pages::{parse_theme_list, parse_theme_members, ThemeLink, ThemeListPage, ThemeMembersPage};
pub use resolver::ThemeResolver;
