//! 종목 레코드 타입.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::SourceVariant;
use crate::error::MoversError;

/// 거래대금 단위 (백만원).
pub const AMOUNT_UNIT: i64 = 1_000_000;

/// 가격×거래량으로 거래대금(백만원)을 산출합니다. 나머지는 버립니다.
pub fn derive_amount(price: i64, volume: i64) -> i64 {
    (price.saturating_mul(volume) / AMOUNT_UNIT).max(0)
}

/// 한 번의 갱신 주기 동안만 유지되는 종목 시세 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    /// 종목 코드 (예: "005930")
    pub code: String,
    /// 종목명. 소스 간 중복 제거 키
    pub name: String,
    /// 현재가 (원)
    pub price: i64,
    /// 등락률 (%)
    pub rate: Decimal,
    /// 거래량 (주)
    pub volume: i64,
    /// 거래대금 (백만원)
    pub amount: i64,
    /// 시가총액 (억원), 없으면 0
    pub market_cap: i64,
    /// 정렬 후 1부터 시작하는 순위. 순위 매김을 거치지 않은 레코드는 0
    pub rank: u32,
    /// 레코드를 만든 리포트 레이아웃
    pub source_variant: SourceVariant,
}

/// 테마 구성 종목 (순위/시가총액 없음).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConstituent {
    pub code: String,
    pub name: String,
    pub price: i64,
    pub rate: Decimal,
    pub volume: i64,
    pub amount: i64,
    pub source_variant: SourceVariant,
}

impl From<StockRecord> for ThemeConstituent {
    fn from(record: StockRecord) -> Self {
        Self {
            code: record.code,
            name: record.name,
            price: record.price,
            rate: record.rate,
            volume: record.volume,
            amount: record.amount,
            source_variant: record.source_variant,
        }
    }
}

/// 상위 종목 정렬 기준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// 거래대금 순 (시가총액 상위 + 거래량 상위 병합)
    #[default]
    Amount,
    /// 거래량 순 (거래량 상위 리포트 단독)
    Volume,
}

impl SortMode {
    /// 내림차순 정렬 키
    pub fn key(self, record: &StockRecord) -> i64 {
        match self {
            Self::Amount => record.amount,
            Self::Volume => record.volume,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount => write!(f, "amount"),
            Self::Volume => write!(f, "volume"),
        }
    }
}

impl FromStr for SortMode {
    type Err = MoversError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "amount" | "value" => Ok(Self::Amount),
            "volume" => Ok(Self::Volume),
            _ => Err(MoversError::InvalidInput(format!(
                "정렬 기준은 amount 또는 volume: {}",
                s
            ))),
        }
    }
}
