//! 리포트 페이지 파싱.
//!
//! - `table`: 표에서 데이터 행 추출
//! - `normalize`: 셀 텍스트를 타입 있는 필드로 변환

pub mod normalize;
pub mod table;

pub use normalize::*;
pub use table::*;

use movers_core::{ColumnMap, StockRecord};
use scraper::Html;
use tracing::debug;

use crate::error::ParseError;

/// 리포트 문서 하나를 레코드 목록으로 변환합니다.
///
/// 정규화에 실패한 행은 로그만 남기고 건너뜁니다. 순위는 매기지 않습니다.
pub fn parse_report(html: &str, columns: &ColumnMap) -> Result<Vec<StockRecord>, ParseError> {
    let document = Html::parse_document(html);
    let rows = extract_for(&document, columns)?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        match normalize_row(row, columns) {
            Ok(record) => records.push(record),
            Err(e) => debug!(variant = %columns.variant, error = %e, "행 건너뜀"),
        }
    }
    Ok(records)
}
