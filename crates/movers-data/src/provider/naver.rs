//! 네이버 금융 시세 클라이언트.
//!
//! 런타임 조회 경로의 공개 호출을 모아 둔 façade입니다.
//!
//! ## 데이터 소스
//! - `/sise/sise_market_sum.naver`: 시가총액 순위 (코스피/코스닥)
//! - `/sise/sise_quant.naver`: 거래량 순위
//! - `/sise/sise_group_detail.naver`: 테마 구성 종목
//! - `/sise/`: 코스피/코스닥 지수 스냅샷
//! - `/item/main.naver`: 종목 상세
//! - `/sise/sise_index_day.naver`: 일별 지수
//!
//! ## 사용 예시
//! ```rust,ignore
//! let client = NaverClient::from_config(&config.http)?;
//! let top = client.get_top_stocks(30, SortMode::Amount).await;
//! for record in &top.records {
//!     println!("{} {} {}", record.rank, record.name, record.amount);
//! }
//! ```

use std::collections::HashSet;

use chrono::NaiveDate;
use movers_core::{
    derive_amount, ColumnMap, Direction, HttpConfig, IndexCode, IndexSnapshot, MarketIndices,
    SortMode, SourceVariant, StockRecord, ThemeConstituent,
};
use rust_decimal::Decimal;
use scraper::{ElementRef, Html};
use tracing::{debug, info, instrument, warn};

use super::{Endpoints, HttpFetcher, PageFetcher};
use crate::aggregate::{aggregate, Source, TopStocks};
use crate::error::{FetchError, Result};
use crate::parse::{
    element_text, parse_decimal, parse_optional_int, parse_rate, parse_report, parse_required_int,
    selector,
};

/// 일별 지수 조회 최대 페이지 수
pub const MAX_HISTORY_PAGES: u32 = 10;

/// 네이버 금융 클라이언트
pub struct NaverClient<F = HttpFetcher> {
    fetcher: F,
    endpoints: Endpoints,
}

impl NaverClient<HttpFetcher> {
    /// HTTP 설정으로 생성
    pub fn from_config(config: &HttpConfig) -> std::result::Result<Self, FetchError> {
        Ok(Self::new(
            HttpFetcher::new(config)?,
            Endpoints::new(&config.base_url),
        ))
    }
}

impl<F: PageFetcher> NaverClient<F> {
    pub fn new(fetcher: F, endpoints: Endpoints) -> Self {
        Self { fetcher, endpoints }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// 정렬 기준별 집계 소스.
    ///
    /// 거래대금 순은 코스피/코스닥 시가총액 상위와 거래량 상위를 이 순서로 병합하고,
    /// 거래량 순은 거래량 상위 리포트만 사용합니다.
    pub fn sources_for(&self, sort: SortMode) -> Vec<Source> {
        match sort {
            SortMode::Amount => vec![
                Source::new(self.endpoints.market_sum(IndexCode::Kospi), ColumnMap::MARKET_SUM),
                Source::new(self.endpoints.market_sum(IndexCode::Kosdaq), ColumnMap::MARKET_SUM),
                Source::new(self.endpoints.quant(), ColumnMap::QUANT),
            ],
            SortMode::Volume => vec![Source::new(self.endpoints.quant(), ColumnMap::QUANT)],
        }
    }

    /// 상위 종목 조회.
    ///
    /// 일부 소스가 실패해도 나머지로 결과를 만들며, 실패 목록을 함께 돌려줍니다.
    #[instrument(skip(self))]
    pub async fn get_top_stocks(&self, limit: usize, sort: SortMode) -> TopStocks {
        let sources = self.sources_for(sort);
        aggregate(&self.fetcher, &sources, limit, sort).await
    }

    /// 종목 상세 조회.
    ///
    /// `Err`는 페이지를 가져오지 못한 경우, `Ok(None)`은 페이지에 종목 정보가 없는 경우.
    #[instrument(skip(self))]
    pub async fn get_stock_info(&self, code: &str) -> Result<Option<StockRecord>> {
        let html = self.fetcher.fetch_document(&self.endpoints.item_main(code)).await?;
        let record = parse_item_main(&html, code);
        if record.is_none() {
            debug!(code, "종목 정보 없음");
        }
        Ok(record)
    }

    /// 코스피/코스닥 지수 스냅샷.
    ///
    /// 지수별로 독립적으로 없을 수 있습니다. `Err`는 페이지를 가져오지 못한 경우.
    #[instrument(skip(self))]
    pub async fn get_market_indices(&self) -> Result<MarketIndices> {
        let html = self.fetcher.fetch_document(&self.endpoints.sise_overview()).await?;
        let indices = parse_market_indices(&html);
        if indices.is_empty() {
            warn!("지수 스냅샷 없음");
        }
        Ok(indices)
    }

    /// 테마 구성 종목 (첫 페이지만).
    #[instrument(skip(self))]
    pub async fn get_theme_details(&self, theme_id: &str) -> Result<Vec<ThemeConstituent>> {
        let html = self
            .fetcher
            .fetch_document(&self.endpoints.theme_detail(theme_id))
            .await?;
        let records = parse_report(&html, &ColumnMap::THEME_DETAIL)?;
        debug!(theme_id, count = records.len(), "테마 구성 종목 조회");
        Ok(records.into_iter().map(ThemeConstituent::from).collect())
    }

    /// 일별 종가 (오래된 순, 최대 `days`개).
    ///
    /// 첫 페이지 실패는 오류이고, 이후 페이지 실패는 그때까지 모은 값을 돌려줍니다.
    #[instrument(skip(self))]
    pub async fn get_index_history(&self, index: IndexCode, days: usize) -> Result<Vec<Decimal>> {
        let mut closes: Vec<Decimal> = Vec::with_capacity(days);
        let mut seen_dates = HashSet::new();

        for page in 1..=MAX_HISTORY_PAGES {
            if closes.len() >= days {
                break;
            }

            let url = self.endpoints.index_day(index, page);
            let html = match self.fetcher.fetch_document(&url).await {
                Ok(html) => html,
                Err(e) if page == 1 => return Err(e.into()),
                Err(e) => {
                    warn!(page, error = %e, "일별 지수 페이지 실패, 수집 중단");
                    break;
                }
            };

            let before = closes.len();
            for (date, close) in parse_index_day_page(&html) {
                if closes.len() >= days {
                    break;
                }
                if seen_dates.insert(date) {
                    closes.push(close);
                }
            }
            if closes.len() == before {
                break;
            }
        }

        closes.reverse();
        info!(%index, count = closes.len(), "일별 지수 조회");
        Ok(closes)
    }
}

// ==================== 페이지 파싱 ====================

fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css).ok()?;
    document.select(&sel).next()
}

fn select_text(document: &Html, css: &str) -> Option<String> {
    select_first(document, css).map(|el| element_text(&el))
}

/// 종목 상세 페이지 파싱. 종목명이나 현재가가 없으면 None.
fn parse_item_main(html: &str, code: &str) -> Option<StockRecord> {
    let document = Html::parse_document(html);

    let name = select_text(&document, "div.wrap_company h2 a").filter(|n| !n.is_empty())?;
    let price = select_text(&document, "p.no_today span.blind")
        .and_then(|t| parse_required_int("price", &t).ok())?;

    // 두 번째 blind 값이 등락률. 부호는 하락 표시 클래스로만 알 수 있음
    let rate = selector("p.no_exday span.blind")
        .ok()
        .and_then(|sel| document.select(&sel).nth(1).map(|el| element_text(&el)))
        .and_then(|t| parse_rate(&t).ok())
        .unwrap_or_default();
    let rate = if select_first(&document, "p.no_exday em.no_down").is_some() {
        -rate.abs()
    } else {
        rate
    };

    let volume = extract_item_volume(&document).unwrap_or(0);
    let market_cap = select_text(&document, "em#_market_sum")
        .and_then(|t| parse_market_cap_eok(&t))
        .unwrap_or(0);

    Some(StockRecord {
        code: code.to_string(),
        name,
        price,
        rate,
        volume,
        amount: derive_amount(price, volume),
        market_cap,
        rank: 0,
        source_variant: SourceVariant::ItemMain,
    })
}

/// `table.no_info` 첫 행의 세 번째 칸이 거래량
fn extract_item_volume(document: &Html) -> Option<i64> {
    let tr_sel = selector("table.no_info tr").ok()?;
    let td_sel = selector("td").ok()?;
    let blind_sel = selector("span.blind").ok()?;

    let row = document.select(&tr_sel).next()?;
    let td = row.select(&td_sel).nth(2)?;
    let text = td
        .select(&blind_sel)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_else(|| element_text(&td));
    parse_optional_int("volume", &text).ok()
}

/// 시가총액 (억원). `"412조 3,456"` -> 4123456, `"3,456"` -> 3456
fn parse_market_cap_eok(text: &str) -> Option<i64> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace() && *c != ',').collect();
    let cleaned = cleaned.trim_end_matches("억원");
    let (jo, eok) = match cleaned.split_once('조') {
        Some((jo, eok)) => (jo.parse::<i64>().ok()?, eok),
        None => (0, cleaned),
    };
    let eok = if eok.is_empty() { 0 } else { eok.parse::<i64>().ok()? };
    jo.checked_mul(10_000)?.checked_add(eok)
}

/// 시세 개요 페이지의 지수 스냅샷
fn parse_market_indices(html: &str) -> MarketIndices {
    let document = Html::parse_document(html);
    MarketIndices {
        kospi: parse_index_snapshot(&document, IndexCode::Kospi),
        kosdaq: parse_index_snapshot(&document, IndexCode::Kosdaq),
    }
}

fn parse_index_snapshot(document: &Html, code: IndexCode) -> Option<IndexSnapshot> {
    let prefix = code.element_prefix();
    let value_text = select_text(document, &format!("#{}_now", prefix))?;
    let value = match parse_decimal("value", &value_text) {
        Ok(value) => value,
        Err(e) => {
            debug!(%code, error = %e, "지수 값 해석 실패");
            return None;
        }
    };

    let (change_amount, change_rate) = select_text(document, &format!("#{}_change", prefix))
        .map(|t| parse_change_text(&t))
        .unwrap_or((None, None));

    Some(IndexSnapshot {
        code,
        value,
        change_amount,
        change_rate,
        direction: index_direction(document, code),
    })
}

/// `"15.89 +0.63%상승"` -> (15.89, 0.63)
fn parse_change_text(text: &str) -> (Option<Decimal>, Option<Decimal>) {
    let mut tokens = text.split_whitespace();
    let amount = tokens.next().and_then(|t| parse_decimal("change_amount", t).ok());
    let rate = tokens
        .find(|t| t.contains('%'))
        .map(|t| {
            t.chars()
                .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
                .collect::<String>()
        })
        .and_then(|t| parse_rate(&t).ok());
    (amount, rate)
}

/// 등락 방향은 숫자 부호가 아니라 `.num` 요소(또는 영역)의 클래스로 표시됩니다.
fn index_direction(document: &Html, code: IndexCode) -> Direction {
    let area = code.area_class();
    let has_up = |css: String| {
        select_first(document, &css)
            .map(|el| el.value().classes().any(|c| c == "up" || c.ends_with("_up")))
            .unwrap_or(false)
    };
    if has_up(format!(".{} .num", area)) || has_up(format!(".{}", area)) {
        Direction::Up
    } else {
        Direction::Down
    }
}

/// 일별 지수 행의 날짜 형식 (`2024.05.03`)
const INDEX_DAY_DATE_FORMAT: &str = "%Y.%m.%d";

/// 일별 지수 한 페이지의 (날짜, 종가) 목록. 빈 날짜/비정상 값은 건너뜁니다.
fn parse_index_day_page(html: &str) -> Vec<(NaiveDate, Decimal)> {
    let document = Html::parse_document(html);
    let (Ok(tr_sel), Ok(td_sel)) = (selector("table.type_1 tr"), selector("td")) else {
        return Vec::new();
    };

    document
        .select(&tr_sel)
        .filter_map(|tr| {
            let cells: Vec<String> = tr.select(&td_sel).map(|td| element_text(&td)).collect();
            let date = NaiveDate::parse_from_str(cells.first()?.trim(), INDEX_DAY_DATE_FORMAT).ok()?;
            let close = parse_decimal("close", cells.get(1)?).ok()?;
            (close > Decimal::ZERO).then_some((date, close))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ranked_page, StaticFetcher};
    use rust_decimal_macros::dec;

    const BASE: &str = "http://naver.test";

    fn client(fetcher: StaticFetcher) -> NaverClient<StaticFetcher> {
        NaverClient::new(fetcher, Endpoints::new(BASE))
    }

    const ITEM_MAIN: &str = r##"
        <div class="wrap_company"><h2><a href="#">삼성전자</a></h2></div>
        <p class="no_today"><em class="no_down"><span class="blind">70,000</span></em></p>
        <p class="no_exday">
          <em class="no_down"><span class="ico down">하락</span><span class="blind">1,050</span></em>
          <em class="no_down"><span class="blind">1.48</span><span class="per">%</span></em>
        </p>
        <table class="no_info">
          <tr>
            <td class="first"><span class="sptxt sp_txt2">전일</span><em><span class="blind">71,050</span></em></td>
            <td><span class="sptxt sp_txt3">고가</span><em><span class="blind">71,200</span></em></td>
            <td><span class="sptxt sp_txt9">거래량</span><em><span class="blind">15,000,000</span></em></td>
          </tr>
        </table>
        <em id="_market_sum">
            417조 8,912
        </em>억원
    "##;

    #[test]
    fn test_parse_item_main() {
        let record = parse_item_main(ITEM_MAIN, "005930").unwrap();

        assert_eq!(record.name, "삼성전자");
        assert_eq!(record.price, 70_000);
        assert_eq!(record.rate, dec!(-1.48));
        assert_eq!(record.volume, 15_000_000);
        assert_eq!(record.amount, 1_050_000);
        assert_eq!(record.market_cap, 4_178_912);
        assert_eq!(record.rank, 0);
        assert_eq!(record.source_variant, SourceVariant::ItemMain);
    }

    #[test]
    fn test_parse_item_main_rising_keeps_sign() {
        let html = ITEM_MAIN.replace("no_down", "no_up");
        assert_eq!(parse_item_main(&html, "005930").unwrap().rate, dec!(1.48));
    }

    #[test]
    fn test_parse_item_main_without_company_is_none() {
        assert!(parse_item_main("<html><body>없는 종목</body></html>", "999999").is_none());
    }

    #[test]
    fn test_parse_market_cap_eok() {
        assert_eq!(parse_market_cap_eok("417조 8,912"), Some(4_178_912));
        assert_eq!(parse_market_cap_eok("3,456억원"), Some(3_456));
        assert_eq!(parse_market_cap_eok("2조"), Some(20_000));
        assert_eq!(parse_market_cap_eok("?"), None);
        assert_eq!(parse_market_cap_eok("9223372036854775807조 1"), None);
        assert_eq!(parse_market_cap_eok("922337203685477조 9,999"), None);
    }

    #[test]
    fn test_parse_market_indices() {
        let html = r#"
            <div class="kospi_area group_quot quot_opn">
              <span class="num num_s" id="KOSPI_now">2,650.12</span>
              <span class="num_s" id="KOSPI_change">15.89 +0.60%<span class="blind">상승</span></span>
            </div>
            <div class="kosdaq_area group_quot">
              <span class="num num_dn" id="KOSDAQ_now">870.50</span>
              <span id="KOSDAQ_change">3.10 -0.35%하락</span>
            </div>
        "#;
        let html = html.replace("num num_s", "num num_up");
        let indices = parse_market_indices(&html);

        let kospi = indices.kospi.unwrap();
        assert_eq!(kospi.value, dec!(2650.12));
        assert_eq!(kospi.change_amount, Some(dec!(15.89)));
        assert_eq!(kospi.change_rate, Some(dec!(0.60)));
        assert_eq!(kospi.direction, Direction::Up);

        let kosdaq = indices.kosdaq.unwrap();
        assert_eq!(kosdaq.value, dec!(870.50));
        assert_eq!(kosdaq.change_rate, Some(dec!(-0.35)));
        assert_eq!(kosdaq.direction, Direction::Down);
    }

    #[test]
    fn test_parse_market_indices_partial() {
        let html = r#"<div class="kospi_area"><span class="num" id="KOSPI_now">2,650.12</span></div>"#;
        let indices = parse_market_indices(html);

        let kospi = indices.kospi.unwrap();
        assert_eq!(kospi.change_amount, None);
        assert_eq!(kospi.change_rate, None);
        assert!(indices.kosdaq.is_none());
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn index_day_page(rows: &[(&str, &str)]) -> String {
        let mut html = String::from(r#"<table class="type_1"><tr><th>날짜</th><th>체결가</th></tr><tr><td colspan="6"></td></tr>"#);
        for (date, close) in rows {
            html.push_str(&format!(
                r#"<tr><td class="date">{date}</td><td class="number_1">{close}</td><td class="rate_down">1.00</td></tr>"#
            ));
        }
        html.push_str("</table>");
        html
    }

    #[test]
    fn test_parse_index_day_page_skips_bad_rows() {
        let html = index_day_page(&[
            ("2024.05.03", "2,676.63"),
            ("", "1.00"),
            ("2024.05.02", "-"),
            ("2024.05.01", "0"),
            ("2024.04.30", "2,692.06"),
        ]);
        let rows = parse_index_day_page(&html);
        assert_eq!(
            rows,
            vec![
                (date(2024, 5, 3), dec!(2676.63)),
                (date(2024, 4, 30), dec!(2692.06)),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_index_history_oldest_first() {
        let endpoints = Endpoints::new(BASE);
        let fetcher = StaticFetcher::default()
            .with_page(
                &endpoints.index_day(IndexCode::Kospi, 1),
                index_day_page(&[("2024.05.03", "3.0"), ("2024.05.02", "2.0")]),
            )
            .with_page(
                &endpoints.index_day(IndexCode::Kospi, 2),
                index_day_page(&[("2024.05.02", "2.0"), ("2024.05.01", "1.0"), ("2024.04.30", "0.5")]),
            );
        let client = client(fetcher);

        let history = client.get_index_history(IndexCode::Kospi, 3).await.unwrap();

        assert_eq!(history, vec![dec!(1.0), dec!(2.0), dec!(3.0)]);
        assert_eq!(client.fetcher().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_get_index_history_stops_on_empty_page() {
        let endpoints = Endpoints::new(BASE);
        let fetcher = StaticFetcher::default()
            .with_page(
                &endpoints.index_day(IndexCode::Kosdaq, 1),
                index_day_page(&[("2024.05.03", "870.5")]),
            )
            .with_page(&endpoints.index_day(IndexCode::Kosdaq, 2), index_day_page(&[]));
        let client = client(fetcher);

        let history = client.get_index_history(IndexCode::Kosdaq, 20).await.unwrap();

        assert_eq!(history, vec![dec!(870.5)]);
        assert_eq!(client.fetcher().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_get_index_history_first_page_failure_is_error() {
        let client = client(StaticFetcher::default());
        assert!(client.get_index_history(IndexCode::Kospi, 5).await.is_err());
        assert!(client.get_index_history(IndexCode::Kospi, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_top_stocks_amount_merges_three_sources() {
        let endpoints = Endpoints::new(BASE);
        let fetcher = StaticFetcher::default()
            .with_page(
                &endpoints.market_sum(IndexCode::Kospi),
                ranked_page(&[("삼성전자", "005930", "70,000", "15,000,000")]),
            )
            .with_page(
                &endpoints.market_sum(IndexCode::Kosdaq),
                ranked_page(&[("에코프로", "086520", "600,000", "1,000,000")]),
            )
            .with_page(
                &endpoints.quant(),
                r#"<table class="type_2">
                    <tr><td class="no">1</td><td><a href="/item/main.naver?code=005930">삼성전자</a></td><td>70,000</td><td>0</td><td>+1.00%</td><td>15,000,000</td><td>9</td></tr>
                    <tr><td class="no">2</td><td><a href="/item/main.naver?code=123456">거래왕</a></td><td>1,000</td><td>0</td><td>+29.90%</td><td>90,000,000</td><td>90,000</td></tr>
                </table>"#,
            );
        let client = client(fetcher);

        let top = client.get_top_stocks(30, SortMode::Amount).await;

        assert!(top.failed_sources.is_empty());
        let names: Vec<&str> = top.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["삼성전자", "에코프로", "거래왕"]);
        // 시가총액 리포트가 먼저 나오므로 산출 거래대금 유지
        assert_eq!(top.records[0].amount, 1_050_000);
        assert_eq!(top.records[0].source_variant, SourceVariant::MarketSum);
        assert_eq!(top.records[2].amount, 90_000);
    }

    #[tokio::test]
    async fn test_get_theme_details() {
        let endpoints = Endpoints::new(BASE);
        let html = r#"<table class="type_5">
            <tr><th>종목명</th></tr>
            <tr>
              <td class="name"><div class="name_area"><a href="/item/main.naver?code=042700">한미반도체</a> *</div></td>
              <td>설명</td><td>120,000</td><td>5,000</td><td>+4.35%</td><td>119,900</td><td>120,000</td><td>2,000,000</td><td>240,000</td><td>1,500,000</td>
            </tr>
        </table>"#;
        let fetcher = StaticFetcher::default().with_page(&endpoints.theme_detail("136"), html);
        let client = client(fetcher);

        let details = client.get_theme_details("136").await.unwrap();

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].name, "한미반도체");
        assert_eq!(details[0].code, "042700");
        assert_eq!(details[0].amount, 240_000);
        assert_eq!(details[0].source_variant, SourceVariant::ThemeDetail);
    }

    #[tokio::test]
    async fn test_get_stock_info_fetch_failure_is_error() {
        let client = client(StaticFetcher::default());
        assert!(client.get_stock_info("005930").await.is_err());
    }
}
