//! 시장 상위 종목 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 거래대금 상위 30종목 (ETF/ETN 제외)
//! movers top
//!
//! # 등락률 4% 이상, 거래량 순, 활성 테마와 상위 3개 테마 구성 종목
//! movers top --sort volume --min-rate 4 --themes --theme-details 3
//!
//! # 지수 스냅샷 / 코스닥 20일 추이
//! movers indices
//! movers history kosdaq --days 20
//!
//! # 개별 종목, 테마 구성 종목
//! movers stock 005930
//! movers theme 반도체 --format json
//! ```

use clap::{Parser, Subcommand};
use movers_core::{init_logging, AppConfig, IndexCode, LogConfig, SortMode};
use rust_decimal::Decimal;
use tracing::{error, info};

mod commands;

use commands::output::OutputFormat;
use commands::top::TopCommandConfig;

#[derive(Parser)]
#[command(name = "movers")]
#[command(about = "Market movers - 거래대금 상위 종목과 테마 조회", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    /// 출력 형식 (table, json)
    #[arg(short, long, global = true, default_value = "table")]
    format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 거래대금/거래량 상위 종목
    Top {
        /// 순위 제한 (기본: 설정 파일 top.limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// 정렬 기준 (amount: 거래대금, volume: 거래량)
        #[arg(short, long, default_value = "amount")]
        sort: String,

        /// 등락률 하한 (%)
        #[arg(long)]
        min_rate: Option<Decimal>,

        /// ETF/ETN/레버리지 상품 포함
        #[arg(long, default_value = "false")]
        include_etf: bool,

        /// 활성 테마 표시 (테마 매핑 파일 필요)
        #[arg(long, default_value = "false")]
        themes: bool,

        /// 구성 종목을 조회할 상위 테마 수
        #[arg(long, default_value = "0")]
        theme_details: usize,
    },

    /// 코스피/코스닥 지수 스냅샷
    Indices,

    /// 개별 종목 조회
    Stock {
        /// 종목 코드 (예: 005930)
        code: String,
    },

    /// 테마 구성 종목 조회
    Theme {
        /// 테마명 또는 테마 번호
        query: String,
    },

    /// 지수 일별 종가 추이
    History {
        /// 지수 (kospi, kosdaq)
        index: String,

        /// 조회 일수
        #[arg(short, long, default_value = "20")]
        days: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app = AppConfig::load(&cli.config)?;
    init_logging(LogConfig::from_settings(&app.logging).with_env_overrides())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let format = OutputFormat::parse(&cli.format)?;

    match cli.command {
        Commands::Top {
            limit,
            sort,
            min_rate,
            include_etf,
            themes,
            theme_details,
        } => {
            let sort: SortMode = sort.parse()?;
            let config = TopCommandConfig {
                limit,
                sort,
                min_rate,
                include_instruments: include_etf,
                show_themes: themes || theme_details > 0,
                theme_details,
                format,
            };

            match commands::top::show_top(&app, config).await {
                Ok(count) => info!("✅ Listed {} stocks", count),
                Err(e) => {
                    error!("Top stocks failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Indices => {
            if let Err(e) = commands::market::show_indices(&app, format).await {
                error!("Indices failed: {:#}", e);
                return Err(e);
            }
        }

        Commands::Stock { code } => match commands::market::show_stock(&app, &code, format).await {
            Ok(count) => info!(code = %code, found = count > 0, "종목 조회 완료"),
            Err(e) => {
                error!("Stock lookup failed: {:#}", e);
                return Err(e);
            }
        },

        Commands::Theme { query } => {
            use commands::theme::{show_theme, ThemeCommandConfig};

            match show_theme(&app, ThemeCommandConfig { query, format }).await {
                Ok(count) => info!("✅ Listed {} theme constituents", count),
                Err(e) => {
                    error!("Theme lookup failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::History { index, days } => {
            let index: IndexCode = index.parse()?;

            match commands::market::show_history(&app, index, days, format).await {
                Ok(count) => info!("✅ Fetched {} daily closes", count),
                Err(e) => {
                    error!("History failed: {:#}", e);
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
