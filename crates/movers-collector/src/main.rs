//! Offline theme mapping builder CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use movers_collector::{modules, CollectorConfig};
use movers_data::ThemeMapping;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "movers-collector")]
#[command(about = "Market movers theme mapping builder", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 테마 목록과 구성 종목을 크롤링해 매핑 파일을 덮어씀
    BuildThemes {
        /// 출력 디렉터리 (기본: THEME_OUTPUT_DIR 또는 data)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// 테마별 최대 페이지 수
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// 기존 매핑 파일 요약 출력
    ThemeStats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("movers_collector={0},movers_data={0}", cli.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Market Movers Collector 시작");

    // 설정 로드
    let mut config = CollectorConfig::from_env()?;
    tracing::debug!(base_url = %config.http.base_url, "설정 로드 완료");

    match cli.command {
        Commands::BuildThemes {
            output_dir,
            max_pages,
        } => {
            if let Some(dir) = output_dir {
                config.theme_crawl.output_dir = dir;
            }
            if let Some(pages) = max_pages {
                config.theme_crawl.max_pages_per_theme = pages;
            }
            config.theme_crawl.validate()?;

            let stats = modules::sync_themes(&config).await?;
            stats.log_summary("테마 매핑 빌드");
        }
        Commands::ThemeStats => {
            let crawl = &config.theme_crawl;
            let mapping = ThemeMapping::load(&crawl.stock_themes_path(), &crawl.theme_map_path())?;
            tracing::info!(
                stocks = mapping.stock_count(),
                themes = mapping.theme_count(),
                avg_themes = format!("{:.1}", mapping.average_themes_per_stock()),
                "테마 매핑 요약"
            );
            for (name, themes) in mapping.stock_themes.iter().take(5) {
                tracing::info!(
                    stock = %name,
                    themes = %themes.iter().take(3).cloned().collect::<Vec<_>>().join(", "),
                    "샘플"
                );
            }
        }
    }

    tracing::info!("Market Movers Collector 종료");

    Ok(())
}
