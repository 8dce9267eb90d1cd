//! 리포트 페이지 레이아웃(소스 변형) 정의.
//!
//! 같은 사이트의 리포트라도 페이지마다 컬럼 위치가 다릅니다.
//! 변형별 컬럼 위치는 [`ColumnMap`] 상수로 선언하고, 정규화 코드는
//! 이 맵을 인자로 받습니다. 새 레이아웃은 상수 하나를 추가하면 됩니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 레코드를 만든 리포트 레이아웃.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceVariant {
    /// 시가총액 순위 리포트 (`sise_market_sum`)
    MarketSum,
    /// 거래량 순위 리포트 (`sise_quant`)
    Quant,
    /// 테마 구성 종목 리포트 (`sise_group_detail`)
    ThemeDetail,
    /// 개별 종목 상세 페이지 (`item/main`). 표 레이아웃이 아님
    ItemMain,
}

impl SourceVariant {
    /// 이 변형의 컬럼 맵. 표가 아닌 페이지는 None.
    pub fn columns(self) -> Option<ColumnMap> {
        match self {
            Self::MarketSum => Some(ColumnMap::MARKET_SUM),
            Self::Quant => Some(ColumnMap::QUANT),
            Self::ThemeDetail => Some(ColumnMap::THEME_DETAIL),
            Self::ItemMain => None,
        }
    }
}

impl fmt::Display for SourceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarketSum => write!(f, "market_sum"),
            Self::Quant => write!(f, "quant"),
            Self::ThemeDetail => write!(f, "theme_detail"),
            Self::ItemMain => write!(f, "item_main"),
        }
    }
}

/// 한 리포트 레이아웃의 컬럼 위치 (0부터 시작하는 td 인덱스).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    /// 레이아웃 식별자
    pub variant: SourceVariant,
    /// 데이터 표 CSS 셀렉터
    pub table: &'static str,
    /// 첫 셀이 순위 번호인 레이아웃인지 여부. 아니면 첫 셀의 종목 링크로 데이터 행을 판별
    pub ranked: bool,
    /// 종목명 (종목 링크 포함)
    pub name: usize,
    /// 현재가
    pub price: usize,
    /// 등락률
    pub rate: usize,
    /// 거래량
    pub volume: usize,
    /// 거래대금 (백만원). None이면 가격×거래량으로 산출
    pub amount: Option<usize>,
    /// 시가총액 (억원). None이면 0
    pub market_cap: Option<usize>,
    /// 데이터 행으로 인정할 최소 셀 수
    pub min_cells: usize,
}

impl ColumnMap {
    /// `N | 종목명 | 현재가 | 전일비 | 등락률 | 액면가 | 시가총액 | 상장주식수 | 외국인비율 | 거래량 | PER | ROE`
    pub const MARKET_SUM: Self = Self {
        variant: SourceVariant::MarketSum,
        table: "table.type_2",
        ranked: true,
        name: 1,
        price: 2,
        rate: 4,
        volume: 9,
        amount: None,
        market_cap: Some(6),
        min_cells: 10,
    };

    /// `N | 종목명 | 현재가 | 전일비 | 등락률 | 거래량 | 거래대금 | 매수호가 | 매도호가 | 시가총액 | PER | ROE`
    pub const QUANT: Self = Self {
        variant: SourceVariant::Quant,
        table: "table.type_2",
        ranked: true,
        name: 1,
        price: 2,
        rate: 4,
        volume: 5,
        amount: Some(6),
        market_cap: Some(9),
        min_cells: 7,
    };

    /// `종목명 | 설명 | 현재가 | 전일비 | 등락률 | 매수호가 | 매도호가 | 거래량 | 거래대금 | 전일거래량`
    pub const THEME_DETAIL: Self = Self {
        variant: SourceVariant::ThemeDetail,
        table: "table.type_5",
        ranked: false,
        name: 0,
        price: 2,
        rate: 4,
        volume: 7,
        amount: Some(8),
        market_cap: None,
        min_cells: 9,
    };

    /// 소스가 거래대금을 직접 제공하는지 여부
    pub fn reports_amount(&self) -> bool {
        self.amount.is_some()
    }
}
