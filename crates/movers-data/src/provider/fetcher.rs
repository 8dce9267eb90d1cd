//! 페이지 가져오기.
//!
//! [`PageFetcher`]는 URL 하나를 받아 원본 바이트를 돌려주는 경계입니다.
//! 실제 구현은 [`HttpFetcher`]이고, 테스트는 메모리 기반 구현으로 대체합니다.
//! 재시도는 하지 않습니다.

use async_trait::async_trait;
use movers_core::HttpConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::error::FetchError;

/// 레거시 인코딩(EUC-KR)으로 제공되는 리포트 경로.
const LEGACY_ENCODED_PAGES: [&str; 5] = [
    "sise_market_sum",
    "sise_quant",
    "sise_group_detail",
    "/sise/theme.naver",
    "sise_index_day",
];

/// 페이지 문자 인코딩.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    EucKr,
    Utf8,
}

impl SourceEncoding {
    /// URL 경로로 인코딩을 결정합니다.
    ///
    /// 순위/테마/일별 지수 리포트는 EUC-KR, 종목 상세와 시세 개요 페이지는 UTF-8.
    pub fn for_url(url: &str) -> Self {
        if LEGACY_ENCODED_PAGES.iter().any(|page| url.contains(page)) {
            Self::EucKr
        } else {
            Self::Utf8
        }
    }

    /// 바이트를 문자열로 디코딩합니다. 실패하지 않으며, 해석할 수 없는 바이트는
    /// U+FFFD로 대체하고 경고를 남깁니다.
    pub fn decode(self, bytes: &[u8]) -> String {
        let encoding = match self {
            Self::EucKr => encoding_rs::EUC_KR,
            Self::Utf8 => encoding_rs::UTF_8,
        };
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            warn!(encoding = encoding.name(), "디코딩할 수 없는 바이트를 대체 문자로 치환");
        }
        text.into_owned()
    }
}

/// 페이지 가져오기 trait.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// URL의 원본 바이트를 가져옵니다.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    /// URL을 가져와 경로별 인코딩으로 디코딩합니다.
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        let bytes = self.fetch(url).await?;
        Ok(SourceEncoding::for_url(url).decode(&bytes))
    }
}

/// reqwest 기반 fetcher.
///
/// 모든 요청에 같은 헤더 집합(브라우저 User-Agent, 한국어 우선)을 사용하고,
/// 클라이언트 타임아웃으로 요청 시간을 제한합니다.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// 설정으로 생성
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7"),
        );

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        debug!(bytes = bytes.len(), "페이지 수신");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: &str) -> HttpConfig {
        HttpConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_encoding_for_url() {
        let base = "https://finance.naver.com";
        for path in [
            "/sise/sise_market_sum.naver?sosok=0",
            "/sise/sise_quant.naver",
            "/sise/sise_group_detail.naver?type=theme&no=42",
            "/sise/theme.naver?&page=2",
            "/sise/sise_index_day.naver?code=0001&page=1",
        ] {
            assert_eq!(SourceEncoding::for_url(&format!("{base}{path}")), SourceEncoding::EucKr, "{path}");
        }
        assert_eq!(SourceEncoding::for_url(&format!("{base}/sise/")), SourceEncoding::Utf8);
        assert_eq!(
            SourceEncoding::for_url(&format!("{base}/item/main.naver?code=005930")),
            SourceEncoding::Utf8
        );
    }

    #[test]
    fn test_decode_euc_kr() {
        let (bytes, _, _) = encoding_rs::EUC_KR.encode("삼성전자");
        assert_eq!(SourceEncoding::EucKr.decode(&bytes), "삼성전자");
    }

    #[test]
    fn test_decode_replaces_invalid_bytes() {
        let text = SourceEncoding::Utf8.decode(&[b'a', 0xFF, b'b']);
        assert_eq!(text, "a\u{FFFD}b");
    }

    #[tokio::test]
    async fn test_http_fetcher_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sise/")
            .match_header("accept-language", mockito::Matcher::Regex("ko-KR".to_string()))
            .with_status(200)
            .with_body("<html>ok</html>")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&test_config(&server.url())).unwrap();
        let body = fetcher
            .fetch_document(&format!("{}/sise/", server.url()))
            .await
            .unwrap();

        assert_eq!(body, "<html>ok</html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_fetcher_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/sise/sise_quant.naver")
            .with_status(503)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&test_config(&server.url())).unwrap();
        let err = fetcher
            .fetch(&format!("{}/sise/sise_quant.naver", server.url()))
            .await
            .unwrap_err();

        match err {
            FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 503),
            other => panic!("unexpected error: {other}"),
        }
    }
}
