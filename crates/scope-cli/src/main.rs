//! 다중 타임프레임 지표 스냅샷 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 기본 설정(config/default.toml)으로 BTCUSDT 분석
//! scope analyze
//!
//! # ETHUSDT를 동시 조회로 분석하고 JSON으로 출력
//! scope analyze -s ETHUSDT --concurrent --format json
//!
//! # 분석 후 언어 모델 요약 요청 (OPENAI_API_KEY 또는 --api-key)
//! scope analyze --summary
//!
//! # 네트워크 없이 합성 데이터로 실행
//! scope analyze --demo
//!
//! # 설정된 타임프레임 확인
//! scope timeframes
//!
//! # 요약에 보낼 프롬프트만 출력
//! scope prompt --demo
//! ```

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use scope_core::{init_logging, AppConfig, LogConfig, DEFAULT_CONFIG_PATH};
use tracing::debug;

use scope_cli::commands::analyze::{run_analyze, AnalyzeConfig, OutputFormat};
use scope_cli::commands::prompt::{run_prompt, PromptConfig};
use scope_cli::commands::timeframes::run_timeframes;

#[derive(Parser)]
#[command(name = "scope")]
#[command(about = "Multi-timeframe indicator snapshot - RSI/EMA/StochRSI 다중 타임프레임 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 설정된 타임프레임을 분석하고 지표를 출력
    Analyze {
        /// 심볼 (예: BTCUSDT, 설정 파일 값 대체)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 타임프레임 동시 조회
        #[arg(long, default_value = "false")]
        concurrent: bool,

        /// 분석 후 언어 모델 요약 요청
        #[arg(long, default_value = "false")]
        summary: bool,

        /// 언어 모델 API 키 (기본: OPENAI_API_KEY 환경변수)
        #[arg(long)]
        api_key: Option<String>,

        /// 네트워크 없이 합성 데이터 사용
        #[arg(long, default_value = "false")]
        demo: bool,
    },

    /// 설정된 타임프레임 목록 보기
    Timeframes,

    /// 요약에 사용할 프롬프트 출력 (언어 모델 호출 없음)
    Prompt {
        /// 심볼 (예: BTCUSDT)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 타임프레임 동시 조회
        #[arg(long, default_value = "false")]
        concurrent: bool,

        /// 네트워크 없이 합성 데이터 사용
        #[arg(long, default_value = "false")]
        demo: bool,
    },
}

/// 설정 파일의 로깅 설정으로 트레이싱을 초기화합니다.
///
/// 설정을 읽을 수 없으면 환경 변수 기반 기본값을 사용합니다.
fn setup_logging(config_path: &Path) -> Result<()> {
    let log_config = match AppConfig::load(config_path) {
        Ok(config) => LogConfig::from_settings(&config.logging),
        Err(_) => LogConfig::from_env(),
    };
    init_logging(log_config).map_err(|e| anyhow!("로깅 초기화 실패: {}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    setup_logging(&cli.config)?;
    debug!(config = %cli.config.display(), "scope started");

    match cli.command {
        Commands::Analyze {
            symbol,
            format,
            concurrent,
            summary,
            api_key,
            demo,
        } => {
            let config = AnalyzeConfig {
                config_path: cli.config,
                symbol,
                format: OutputFormat::parse(&format)?,
                concurrent,
                summary,
                api_key,
                demo,
            };
            run_analyze(config).await?;
        }

        Commands::Timeframes => {
            run_timeframes(&cli.config)?;
        }

        Commands::Prompt {
            symbol,
            concurrent,
            demo,
        } => {
            let config = PromptConfig {
                config_path: cli.config,
                symbol,
                concurrent,
                demo,
            };
            run_prompt(config).await?;
        }
    }

    Ok(())
}
