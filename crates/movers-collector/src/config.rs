//! 환경변수 기반 설정 모듈.

use std::path::PathBuf;
use std::time::Duration;

use movers_core::{HttpConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};

use crate::error::CollectorError;
use crate::Result;

/// 종목 → 테마 매핑 파일명
pub const STOCK_THEMES_FILE: &str = "stock_themes.json";
/// 테마 → 번호 매핑 파일명
pub const THEME_MAP_FILE: &str = "theme_map.json";

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// HTTP 요청 설정
    pub http: HttpConfig,
    /// 테마 크롤링 설정
    pub theme_crawl: ThemeCrawlConfig,
}

/// 테마 크롤링 설정
#[derive(Debug, Clone)]
pub struct ThemeCrawlConfig {
    /// 요청 간 딜레이 (밀리초)
    pub request_delay_ms: u64,
    /// 테마별 구성 종목 최대 페이지 수
    pub max_pages_per_theme: u32,
    /// 테마 목록 최대 페이지 수
    pub max_list_pages: u32,
    /// 매핑 파일 출력 디렉터리
    pub output_dir: PathBuf,
}

impl Default for ThemeCrawlConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 300,
            max_pages_per_theme: 10,
            max_list_pages: 10,
            output_dir: PathBuf::from("data"),
        }
    }
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = ThemeCrawlConfig::default();
        let config = Self {
            http: HttpConfig {
                base_url: std::env::var("THEME_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
                timeout_secs: env_var_parse("THEME_HTTP_TIMEOUT_SECS", 10),
                user_agent: std::env::var("THEME_USER_AGENT")
                    .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            },
            theme_crawl: ThemeCrawlConfig {
                request_delay_ms: env_var_parse("THEME_REQUEST_DELAY_MS", defaults.request_delay_ms),
                max_pages_per_theme: env_var_parse("THEME_MAX_PAGES", defaults.max_pages_per_theme),
                max_list_pages: env_var_parse("THEME_MAX_LIST_PAGES", defaults.max_list_pages),
                output_dir: std::env::var("THEME_OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.output_dir),
            },
        };
        config.theme_crawl.validate()?;
        Ok(config)
    }
}

impl ThemeCrawlConfig {
    /// 요청 간 딜레이를 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn stock_themes_path(&self) -> PathBuf {
        self.output_dir.join(STOCK_THEMES_FILE)
    }

    pub fn theme_map_path(&self) -> PathBuf {
        self.output_dir.join(THEME_MAP_FILE)
    }

    /// 페이지 상한은 1 이상이어야 합니다.
    pub fn validate(&self) -> Result<()> {
        if self.max_pages_per_theme == 0 || self.max_list_pages == 0 {
            return Err(CollectorError::Config(
                "THEME_MAX_PAGES, THEME_MAX_LIST_PAGES는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
