//! 테마 목록/구성 종목 페이지 파싱 (크롤러용).

use scraper::Html;

use crate::error::ParseError;
use crate::parse::{clean_name, element_text, extract_linked_rows, has_next_page, selector, ITEM_LINK};

/// 테마 목록의 한 항목.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeLink {
    pub name: String,
    pub id: String,
}

/// 테마 목록 한 페이지.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeListPage {
    pub themes: Vec<ThemeLink>,
    pub has_next: bool,
}

/// 테마 구성 종목 한 페이지.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeMembersPage {
    /// 페이지에 나온 종목명 (`*` 제거)
    pub names: Vec<String>,
    pub has_next: bool,
}

/// 테마 목록 페이지에서 `no=` 링크를 가진 항목을 수집합니다.
pub fn parse_theme_list(html: &str) -> Result<ThemeListPage, ParseError> {
    let document = Html::parse_document(html);
    let link_sel = selector("table.type_1 td a[href]")?;

    let mut themes = Vec::new();
    for a in document.select(&link_sel) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let Some((_, rest)) = href.split_once("no=") else {
            continue;
        };
        let id = rest.split('&').next().unwrap_or(rest).trim();
        let name = element_text(&a);
        if id.is_empty() || name.is_empty() {
            continue;
        }
        themes.push(ThemeLink {
            name,
            id: id.to_string(),
        });
    }

    Ok(ThemeListPage {
        themes,
        has_next: has_next_page(&document),
    })
}

/// 테마 구성 종목 페이지에서 종목명을 수집합니다.
pub fn parse_theme_members(html: &str) -> Result<ThemeMembersPage, ParseError> {
    let document = Html::parse_document(html);
    let rows = extract_linked_rows(&document, "table.type_5", ITEM_LINK)?;

    let names = rows
        .iter()
        .filter_map(|row| row.cell(0))
        .map(|cell| clean_name(&cell.text))
        .filter(|name| !name.is_empty())
        .collect();

    Ok(ThemeMembersPage {
        names,
        has_next: has_next_page(&document),
    })
}
