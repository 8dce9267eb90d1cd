//! 리포트 페이지 URL.

use movers_core::{IndexCode, DEFAULT_BASE_URL};

/// 소스 엔드포인트 URL 생성기.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 시가총액 순위 (코스피 `sosok=0`, 코스닥 `sosok=1`)
    pub fn market_sum(&self, market: IndexCode) -> String {
        let sosok = match market {
            IndexCode::Kospi => 0,
            IndexCode::Kosdaq => 1,
        };
        format!("{}/sise/sise_market_sum.naver?sosok={}", self.base_url, sosok)
    }

    /// 거래량 순위
    pub fn quant(&self) -> String {
        format!("{}/sise/sise_quant.naver", self.base_url)
    }

    /// 테마 구성 종목 (첫 페이지)
    pub fn theme_detail(&self, theme_id: &str) -> String {
        format!(
            "{}/sise/sise_group_detail.naver?type=theme&no={}",
            self.base_url, theme_id
        )
    }

    /// 테마 구성 종목 (페이지 지정)
    pub fn theme_detail_page(&self, theme_id: &str, page: u32) -> String {
        format!("{}&page={}", self.theme_detail(theme_id), page)
    }

    /// 테마 목록
    pub fn theme_list(&self, page: u32) -> String {
        format!("{}/sise/theme.naver?&page={}", self.base_url, page)
    }

    /// 시세 개요 (지수 스냅샷)
    pub fn sise_overview(&self) -> String {
        format!("{}/sise/", self.base_url)
    }

    /// 종목 상세
    pub fn item_main(&self, code: &str) -> String {
        format!("{}/item/main.naver?code={}", self.base_url, code)
    }

    /// 일별 지수
    pub fn index_day(&self, index: IndexCode, page: u32) -> String {
        format!(
            "{}/sise/sise_index_day.naver?code={}&page={}",
            self.base_url,
            index.history_code(),
            page
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
