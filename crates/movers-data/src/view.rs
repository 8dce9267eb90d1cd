//! 표시용 뷰 구성.
//!
//! 집계 결과에 등락률 하한과 상품(ETF/ETN 등) 제외 필터를 적용하고,
//! 순서를 바꾸지 않은 채 표시 순위를 다시 매깁니다. 남은 종목들의
//! 테마를 묶어 "활성 테마" 목록도 만듭니다.

use std::collections::HashMap;

use movers_core::{StockRecord, TopConfig};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use crate::theme::ThemeMapping;

/// 상품 제외 키워드 (대소문자 구분 부분 문자열).
pub const EXCLUDED_INSTRUMENT_KEYWORDS: [&str; 15] = [
    "KODEX", "TIGER", "KBSTAR", "ARIRANG", "HANARO", "KOSEF", "KINDEX", "ACE ", "SOL ", "RISE ",
    "PLUS ", "ETN", "레버리지", "인버스", "선물",
];

/// 뷰 필터. 두 필터는 독립적으로 켜고 끌 수 있습니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewFilter {
    /// 등락률 하한 (%). 미만은 제외
    pub min_rate: Option<Decimal>,
    /// 종목명에 포함되면 제외할 키워드. 비어 있으면 비활성
    pub excluded_keywords: Vec<String>,
}

impl ViewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_rate(mut self, min_rate: Decimal) -> Self {
        self.min_rate = Some(min_rate);
        self
    }

    /// 기본 상품 키워드 집합으로 제외 필터를 켭니다.
    pub fn excluding_instruments(mut self) -> Self {
        self.excluded_keywords = EXCLUDED_INSTRUMENT_KEYWORDS
            .iter()
            .map(|k| k.to_string())
            .collect();
        self
    }

    /// 런타임 설정으로 생성
    pub fn from_config(config: &TopConfig) -> Self {
        let filter = Self {
            min_rate: config.min_rate,
            ..Self::default()
        };
        if config.exclude_instruments {
            filter.excluding_instruments()
        } else {
            filter
        }
    }

    pub fn passes(&self, record: &StockRecord) -> bool {
        if self.min_rate.is_some_and(|min| record.rate < min) {
            return false;
        }
        !self
            .excluded_keywords
            .iter()
            .any(|keyword| record.name.contains(keyword.as_str()))
    }

    /// 필터를 적용하고 표시 순위를 매깁니다.
    pub fn apply(&self, records: &[StockRecord]) -> Vec<ViewRow> {
        let rows: Vec<ViewRow> = records
            .iter()
            .filter(|record| self.passes(record))
            .enumerate()
            .map(|(i, record)| ViewRow {
                original_rank: record.rank,
                display_rank: i as u32 + 1,
                record: record.clone(),
            })
            .collect();
        debug!(input = records.len(), output = rows.len(), "뷰 필터 적용");
        rows
    }
}

/// 뷰의 한 행.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    /// 집계 순위
    pub original_rank: u32,
    /// 필터 후 표시 순위 (1..M)
    pub display_rank: u32,
    pub record: StockRecord,
}

/// 뷰 종목들이 속한 테마.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveTheme {
    pub name: String,
    pub id: String,
    /// 뷰에 나온 구성 종목명 (뷰 순서)
    pub members: Vec<String>,
}

/// 활성 테마 목록.
///
/// 번호가 있는 테마만 포함하며, 구성 종목 수 내림차순(동률은 처음 나온 순)으로 정렬합니다.
pub fn active_themes(rows: &[ViewRow], mapping: &ThemeMapping) -> Vec<ActiveTheme> {
    let mut themes: Vec<ActiveTheme> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let name = &row.record.name;
        let theme_names = match mapping.themes_of(name) {
            Ok(found) => found,
            Err(gap) => {
                trace!(%gap, "활성 테마 계산에서 제외");
                continue;
            }
        };
        for theme in theme_names {
            let id = match mapping.theme_id(theme) {
                Ok(id) => id,
                Err(gap) => {
                    debug!(%gap, "테마 건너뜀");
                    continue;
                }
            };
            let slot = *index.entry(theme.clone()).or_insert_with(|| {
                themes.push(ActiveTheme {
                    name: theme.clone(),
                    id: id.to_string(),
                    members: Vec::new(),
                });
                themes.len() - 1
            });
            themes[slot].members.push(name.clone());
        }
    }

    themes.sort_by(|a, b| b.members.len().cmp(&a.members.len()));
    themes
}
