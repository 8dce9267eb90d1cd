//! HTML 표 추출.
//!
//! 리포트 표는 데이터 행 사이에 구분선/빈 행/헤더 행이 섞여 있습니다.
//! 순위 리포트는 첫 셀이 양의 정수(순위)인 행만, 테마 리포트는 첫 셀에
//! 종목 링크가 있는 행만 데이터 행으로 인정합니다.

use movers_core::ColumnMap;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::ParseError;

/// 종목 상세 링크 경로 조각
pub const ITEM_LINK: &str = "/item/main";

/// 표의 한 셀.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// 공백을 정리한 텍스트
    pub text: String,
    /// 셀 안의 링크 href 목록 (문서 순서)
    pub links: Vec<String>,
}

impl Cell {
    /// 주어진 경로 조각을 포함하는 첫 링크
    pub fn link_containing(&self, fragment: &str) -> Option<&str> {
        self.links
            .iter()
            .map(String::as_str)
            .find(|href| href.contains(fragment))
    }
}

/// 표의 한 행.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// 첫 셀의 순위 번호 (숫자로만 된 양의 정수일 때만)
    pub fn rank_marker(&self) -> Option<u32> {
        self.cells
            .first()
            .filter(|c| !c.text.is_empty() && c.text.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|c| c.text.parse::<u32>().ok())
            .filter(|rank| *rank > 0)
    }
}

/// 셀렉터를 파싱합니다.
pub fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// 순위 번호로 시작하는 데이터 행을 추출합니다. 표가 없으면 빈 목록.
pub fn extract_rows(document: &Html, table_selector: &str) -> Result<Vec<Row>, ParseError> {
    let rows = table_rows(document, table_selector)?;
    Ok(rows
        .into_iter()
        .filter(|row| row.rank_marker().is_some())
        .collect())
}

/// 첫 셀에 `link_fragment`를 포함하는 링크가 있는 데이터 행을 추출합니다.
pub fn extract_linked_rows(
    document: &Html,
    table_selector: &str,
    link_fragment: &str,
) -> Result<Vec<Row>, ParseError> {
    let rows = table_rows(document, table_selector)?;
    Ok(rows
        .into_iter()
        .filter(|row| {
            row.cells
                .first()
                .is_some_and(|c| c.link_containing(link_fragment).is_some())
        })
        .collect())
}

/// 레이아웃에 맞는 방식으로 데이터 행을 추출합니다.
pub fn extract_for(document: &Html, columns: &ColumnMap) -> Result<Vec<Row>, ParseError> {
    if columns.ranked {
        extract_rows(document, columns.table)
    } else {
        extract_linked_rows(document, columns.table, ITEM_LINK)
    }
}

/// 페이지 하단에 "맨뒤/다음" 페이지 링크가 있는지 여부
pub fn has_next_page(document: &Html) -> bool {
    match selector("td.pgRR a") {
        Ok(sel) => document.select(&sel).next().is_some(),
        Err(_) => false,
    }
}

/// 요소 텍스트를 공백 하나로 정리합니다.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn table_rows(document: &Html, table_selector: &str) -> Result<Vec<Row>, ParseError> {
    let table_sel = selector(table_selector)?;
    let tr_sel = selector("tr")?;
    let td_sel = selector("td")?;
    let link_sel = selector("a[href]")?;

    let Some(table) = document.select(&table_sel).next() else {
        debug!(table = table_selector, "표 없음");
        return Ok(Vec::new());
    };

    let rows = table
        .select(&tr_sel)
        .map(|tr| Row {
            cells: tr
                .select(&td_sel)
                .map(|td| Cell {
                    text: element_text(&td),
                    links: td
                        .select(&link_sel)
                        .filter_map(|a| a.value().attr("href"))
                        .map(str::to_string)
                        .collect(),
                })
                .collect(),
        })
        .filter(|row: &Row| !row.cells.is_empty())
        .collect();

    Ok(rows)
}
