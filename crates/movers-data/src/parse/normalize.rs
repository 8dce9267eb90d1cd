//! 셀 텍스트 정규화.
//!
//! 리포트의 숫자는 천 단위 쉼표, 퍼센트 기호, 부호 접두사가 붙은 문자열입니다.
//!
//! - 선택 필드: 빈 문자열이나 `-` 자리표시는 0
//! - 필수 필드(종목명, 현재가, 거래량): 비어 있으면 [`FieldError::Missing`],
//!   해석 불가면 [`FieldError::Malformed`]. 행을 버리고 기본값으로 채우지 않습니다.

use std::str::FromStr;

use movers_core::{derive_amount, ColumnMap, StockRecord};
use rust_decimal::Decimal;

use super::table::{Row, ITEM_LINK};
use crate::error::FieldError;

/// 빈 값으로 취급하는 자리표시 문자열
const PLACEHOLDERS: [&str; 3] = ["", "-", "N/A"];

/// 쉼표와 공백을 제거합니다.
fn strip_separators(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect()
}

fn is_placeholder(cleaned: &str) -> bool {
    PLACEHOLDERS.contains(&cleaned)
}

/// 필수 정수 필드. 음수는 형식 오류로 봅니다.
pub fn parse_required_int(field: &'static str, raw: &str) -> Result<i64, FieldError> {
    let cleaned = strip_separators(raw);
    if is_placeholder(&cleaned) {
        return Err(FieldError::Missing { field });
    }
    match cleaned.parse::<i64>() {
        Ok(value) if value >= 0 => Ok(value),
        _ => Err(FieldError::Malformed {
            field,
            raw: raw.to_string(),
        }),
    }
}

/// 선택 정수 필드. 비어 있으면 0.
pub fn parse_optional_int(field: &'static str, raw: &str) -> Result<i64, FieldError> {
    let cleaned = strip_separators(raw);
    if is_placeholder(&cleaned) {
        return Ok(0);
    }
    cleaned.parse::<i64>().map_err(|_| FieldError::Malformed {
        field,
        raw: raw.to_string(),
    })
}

/// 등락률. `%`와 앞의 `+`를 제거하고 `-`는 유지합니다. 비어 있으면 0.
///
/// `"+1.54%"` -> 1.54, `"-2.30%"` -> -2.30
pub fn parse_rate(raw: &str) -> Result<Decimal, FieldError> {
    let cleaned: String = strip_separators(raw).replace('%', "");
    if is_placeholder(&cleaned) {
        return Ok(Decimal::ZERO);
    }
    let unsigned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    Decimal::from_str(unsigned).map_err(|_| FieldError::Malformed {
        field: "rate",
        raw: raw.to_string(),
    })
}

/// 부호 있는 소수 (지수 값 등). 쉼표 제거.
pub fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal, FieldError> {
    let cleaned = strip_separators(raw);
    if is_placeholder(&cleaned) {
        return Err(FieldError::Missing { field });
    }
    let unsigned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    Decimal::from_str(unsigned).map_err(|_| FieldError::Malformed {
        field,
        raw: raw.to_string(),
    })
}

/// 테마 페이지가 종목명에 붙이는 `*` 표시를 제거합니다.
pub fn clean_name(raw: &str) -> String {
    raw.replace('*', "").trim().to_string()
}

/// 종목 링크의 `code=` 값을 꺼냅니다.
///
/// `/item/main.naver?code=005930&x=1` -> `005930`
pub fn code_from_href(href: &str) -> Option<&str> {
    let (_, rest) = href.split_once("code=")?;
    let code = rest.split('&').next().unwrap_or(rest);
    (!code.is_empty()).then_some(code)
}

/// 한 행을 레이아웃의 컬럼 맵에 따라 레코드로 변환합니다.
///
/// 레이아웃이 거래대금을 제공하지 않으면 가격×거래량으로 산출합니다.
pub fn normalize_row(row: &Row, columns: &ColumnMap) -> Result<StockRecord, FieldError> {
    if row.cells.len() < columns.min_cells {
        return Err(FieldError::TooFewCells {
            expected: columns.min_cells,
            found: row.cells.len(),
        });
    }
    let text = |index: usize| row.cell(index).map(|c| c.text.as_str()).unwrap_or("");

    let name_cell = row
        .cell(columns.name)
        .ok_or(FieldError::Missing { field: "name" })?;
    let name = clean_name(&name_cell.text);
    if name.is_empty() {
        return Err(FieldError::Missing { field: "name" });
    }
    let code = name_cell
        .link_containing(ITEM_LINK)
        .and_then(code_from_href)
        .ok_or(FieldError::Missing { field: "code" })?
        .to_string();

    let price = parse_required_int("price", text(columns.price))?;
    let rate = parse_rate(text(columns.rate))?;
    let volume = parse_required_int("volume", text(columns.volume))?;

    let amount = match columns.amount {
        Some(index) => parse_optional_int("amount", text(index))?.max(0),
        None => derive_amount(price, volume),
    };
    // 시가총액 열은 레이아웃에 따라 행 끝에서 빠지기도 합니다
    let market_cap = match columns.market_cap.and_then(|index| row.cell(index)) {
        Some(cell) => parse_optional_int("market_cap", &cell.text)?,
        None => 0,
    };

    Ok(StockRecord {
        code,
        name,
        price,
        rate,
        volume,
        amount,
        market_cap,
        rank: 0,
        source_variant: columns.variant,
    })
}
