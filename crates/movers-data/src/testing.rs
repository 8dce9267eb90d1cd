//! 테스트용 메모리 fetcher와 페이지 생성기.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::FetchError;
use crate::provider::PageFetcher;

/// URL별로 고정된 본문을 돌려주는 fetcher. 없는 URL은 404.
#[derive(Default)]
pub(crate) struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub(crate) fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.fetch_document(url).await.map(String::into_bytes)
    }

    async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: StatusCode::NOT_FOUND,
        })
    }
}

/// 시가총액 순위 레이아웃의 페이지. 항목은 (종목명, 코드, 현재가, 거래량).
pub(crate) fn ranked_page(rows: &[(&str, &str, &str, &str)]) -> String {
    let mut body = String::from(
        r#"<html><body><table class="type_2"><tr><th>N</th><th>종목명</th></tr><tr><td class="blank_06" colspan="12"></td></tr>"#,
    );
    for (i, (name, code, price, volume)) in rows.iter().enumerate() {
        body.push_str(&format!(
            r#"<tr><td class="no">{rank}</td><td><a href="/item/main.naver?code={code}" class="tltle">{name}</a></td><td class="number">{price}</td><td class="number">0</td><td class="number"><span class="tah p11 red01">+1.00%</span></td><td class="number">100</td><td class="number">1,000</td><td class="number">1,000</td><td class="number">10.00</td><td class="number">{volume}</td><td class="number">10.0</td><td class="number">5.0</td></tr>"#,
            rank = i + 1,
        ));
    }
    body.push_str("</table></body></html>");
    body
}
