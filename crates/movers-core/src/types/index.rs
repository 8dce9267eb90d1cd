//! 시장 지수 타입.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MoversError;

/// 지원하는 시장 지수.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexCode {
    /// 유가증권시장 (코스피)
    Kospi,
    /// 코스닥
    Kosdaq,
}

impl IndexCode {
    pub const ALL: [IndexCode; 2] = [IndexCode::Kospi, IndexCode::Kosdaq];

    /// 시세 개요 페이지의 요소 ID 접두사 (`KOSPI_now` 등)
    pub fn element_prefix(self) -> &'static str {
        match self {
            Self::Kospi => "KOSPI",
            Self::Kosdaq => "KOSDAQ",
        }
    }

    /// 시세 개요 페이지의 영역 클래스
    pub fn area_class(self) -> &'static str {
        match self {
            Self::Kospi => "kospi_area",
            Self::Kosdaq => "kosdaq_area",
        }
    }

    /// 일별 지수 페이지의 코드 파라미터
    pub fn history_code(self) -> &'static str {
        match self {
            Self::Kospi => "0001",
            Self::Kosdaq => "1001",
        }
    }
}

impl fmt::Display for IndexCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.element_prefix())
    }
}

impl FromStr for IndexCode {
    type Err = MoversError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_uppercase();
        if s.contains("KOSPI") || s.contains("코스피") {
            Ok(Self::Kospi)
        } else if s.contains("KOSDAQ") || s.contains("코스닥") {
            Ok(Self::Kosdaq)
        } else {
            Err(MoversError::InvalidInput(format!("알 수 없는 지수: {}", s)))
        }
    }
}

/// 표시 극성. 소스는 등락 방향을 숫자 부호가 아닌 별도 클래스로 표시하므로
/// 전일비 부호와 일치한다고 가정하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// 지수 스냅샷.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub code: IndexCode,
    /// 현재 지수
    pub value: Decimal,
    /// 전일 대비 (포인트)
    pub change_amount: Option<Decimal>,
    /// 전일 대비 등락률 (%)
    pub change_rate: Option<Decimal>,
    pub direction: Direction,
}

/// 코스피/코스닥 스냅샷 묶음. 각 지수는 독립적으로 없을 수 있습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketIndices {
    pub kospi: Option<IndexSnapshot>,
    pub kosdaq: Option<IndexSnapshot>,
}

impl MarketIndices {
    pub fn get(&self, code: IndexCode) -> Option<&IndexSnapshot> {
        match code {
            IndexCode::Kospi => self.kospi.as_ref(),
            IndexCode::Kosdaq => self.kosdaq.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kospi.is_none() && self.kosdaq.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_code_parse() {
        assert_eq!("kospi".parse::<IndexCode>().unwrap(), IndexCode::Kospi);
        assert_eq!("코스닥".parse::<IndexCode>().unwrap(), IndexCode::Kosdaq);
        assert!("NIKKEI".parse::<IndexCode>().is_err());
        assert_eq!(IndexCode::Kosdaq.to_string(), "KOSDAQ");
        assert_eq!(IndexCode::Kosdaq.history_code(), "1001");
    }

    #[test]
    fn test_market_indices_get() {
        let indices = MarketIndices {
            kospi: Some(IndexSnapshot {
                code: IndexCode::Kospi,
                value: Decimal::new(265012, 2),
                change_amount: None,
                change_rate: None,
                direction: Direction::Down,
            }),
            kosdaq: None,
        };
        assert!(!indices.is_empty());
        assert!(indices.get(IndexCode::Kospi).is_some());
        assert!(indices.get(IndexCode::Kosdaq).is_none());
        assert!(MarketIndices::default().is_empty());
    }
}
