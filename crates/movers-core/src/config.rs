//! 설정 관리.
//!
//! 런타임(조회) 경로의 설정을 정의합니다. 오프라인 테마 크롤러는
//! 자체 환경변수 설정(`movers-collector`)을 사용합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 브라우저 User-Agent. 일부 리포트 페이지는 기본 클라이언트 식별자를 거부합니다.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 시세 소스 기본 URL.
pub const DEFAULT_BASE_URL: &str = "https://finance.naver.com";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 요청 설정
    pub http: HttpConfig,
    /// 상위 종목 뷰 설정
    pub top: TopConfig,
    /// 테마 매핑 파일 설정
    pub themes: ThemeFilesConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// HTTP 요청 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 소스 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 상위 종목 뷰 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TopConfig {
    /// 순위 제한
    pub limit: usize,
    /// 등락률 하한 (%). None이면 필터 비활성
    pub min_rate: Option<Decimal>,
    /// ETF/ETN 등 상품 제외 여부
    pub exclude_instruments: bool,
}

impl Default for TopConfig {
    fn default() -> Self {
        Self {
            limit: 30,
            min_rate: None,
            exclude_instruments: true,
        }
    }
}

/// 테마 매핑 산출물 경로.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeFilesConfig {
    /// 종목명 → 테마 목록
    pub stock_themes_path: PathBuf,
    /// 테마명 → 테마 번호
    pub theme_ids_path: PathBuf,
}

impl Default for ThemeFilesConfig {
    fn default() -> Self {
        Self {
            stock_themes_path: PathBuf::from("data/stock_themes.json"),
            theme_ids_path: PathBuf::from("data/theme_map.json"),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값을 사용하고, `MOVERS__HTTP__TIMEOUT_SECS`처럼
    /// `MOVERS` 접두사 환경 변수로 덮어씁니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("MOVERS")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}
