//! 다중 타임프레임 분석 명령.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use scope_analytics::{summarize_alignment, RsiZone, TrendDirection};
use scope_core::{AppConfig, ReportRun, TimeframeSnapshot};
use scope_summary::{OpenAiConfig, OpenAiSummarizer, SummaryError, SummaryRequester};
use secrecy::SecretString;
use serde::Serialize;
use tracing::{info, warn};

use super::setup::{build_report, load_config, market_source};

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!("Invalid format: {}. Use: table, json", s)),
        }
    }
}

/// 분석 명령 설정.
#[derive(Debug)]
pub struct AnalyzeConfig {
    /// 설정 파일 경로
    pub config_path: PathBuf,
    /// 심볼 오버라이드
    pub symbol: Option<String>,
    /// 출력 형식
    pub format: OutputFormat,
    /// 동시 조회 여부
    pub concurrent: bool,
    /// 언어 모델 요약 요청 여부
    pub summary: bool,
    /// 명령줄로 받은 API 키
    pub api_key: Option<String>,
    /// 합성 데이터 사용 여부
    pub demo: bool,
}

/// 분석을 실행하고 결과를 출력합니다.
///
/// 요약 실패는 경고로만 출력하며 명령 자체는 성공합니다.
pub async fn run_analyze(cfg: AnalyzeConfig) -> Result<()> {
    let config = load_config(&cfg.config_path, cfg.symbol.as_deref())?;
    let source = market_source(&config, cfg.demo)?;

    info!(symbol = %config.symbol, timeframes = config.timeframes.len(), "starting analysis");
    let run = build_report(&config, source, cfg.concurrent).await;

    match cfg.format {
        OutputFormat::Table => print!("{}", render_table(&run)),
        OutputFormat::Json => println!("{}", render_json(&run)?),
    }

    if cfg.summary {
        match summarizer_for(&config, cfg.api_key) {
            Some(Ok(summarizer)) => {
                info!(model = summarizer.model(), "requesting summary");
                let result = request_summary(&summarizer, &run, &config.summary.instructions).await;
                print_summary(result);
            }
            Some(Err(e)) => eprintln!("⚠️ 요약 요청기 생성 실패: {}", e),
            None => eprintln!("⚠️ API 키가 없어 요약을 건너뜁니다 (--api-key 또는 OPENAI_API_KEY)"),
        }
    }

    Ok(())
}

/// 명령줄 키 또는 환경 변수로 요약기를 만듭니다. 키가 없으면 `None`.
fn summarizer_for(config: &AppConfig, api_key: Option<String>) -> Option<Result<OpenAiSummarizer, SummaryError>> {
    let openai = match api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => OpenAiConfig::from_settings(&config.summary, SecretString::from(key)),
        None => OpenAiConfig::from_env(&config.summary)?,
    };
    Some(OpenAiSummarizer::new(openai))
}

async fn request_summary(
    summarizer: &dyn SummaryRequester,
    run: &ReportRun,
    instructions: &str,
) -> Result<String, SummaryError> {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("{}에 요약 요청 중...", summarizer.name()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = summarizer.summarize(&run.report, instructions).await;
    pb.finish_and_clear();
    result
}

fn print_summary(result: Result<String, SummaryError>) {
    match result {
        Ok(summary) => println!("\n📈 요약\n\n{}", summary),
        Err(e) => {
            warn!(error = %e, "summary failed");
            eprintln!("❌ 요약 실패: {}", e);
        }
    }
}

fn rsi_line(rsi: f64) -> String {
    let zone = RsiZone::from_rsi(rsi);
    match zone {
        RsiZone::Neutral => format!("{:.2}", rsi),
        _ => format!("{:.2} ({})", rsi, zone.label()),
    }
}

fn format_snapshot(s: &TimeframeSnapshot) -> String {
    let mut output = format!(
        "✅ {} 분석 ({}, {})\n",
        s.label,
        s.interval,
        s.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    output.push_str(&format!("  현재가:   {:.2}\n", s.close));
    output.push_str(&format!("  RSI:      {}\n", rsi_line(s.rsi)));
    output.push_str(&format!("  거래량:   {:.2}\n", s.volume));
    output.push_str(&format!("  EMA20:    {:.2}\n", s.ema20));
    output.push_str(&format!("  EMA50:    {:.2}\n", s.ema50));
    output.push_str(&format!("  EMA200:   {:.2}\n", s.ema200));
    if let Some(stoch) = s.stoch_rsi {
        output.push_str(&format!("  StochRSI: {:.2}\n", stoch));
    }
    output.push_str(&format!("  추세:     {}\n\n", TrendDirection::from_snapshot(s).label()));
    output
}

/// 리포트를 사람이 읽는 블록 형식으로 렌더링합니다.
pub fn render_table(run: &ReportRun) -> String {
    let report = &run.report;
    let mut output = format!(
        "📊 {} 다중 타임프레임 지표 ({})\n\n",
        report.symbol(),
        report.generated_at().format("%Y-%m-%d %H:%M:%S UTC")
    );

    for snapshot in report.iter() {
        output.push_str(&format_snapshot(snapshot));
    }

    for failure in &run.failures {
        output.push_str(&format!(
            "⚠️ {} 데이터가 부족하거나 오류가 발생했습니다: {}\n",
            failure.label, failure.error
        ));
    }

    if report.is_empty() {
        output.push_str("표시할 타임프레임이 없습니다.\n");
    } else {
        let alignment = summarize_alignment(report);
        output.push_str(&format!(
            "추세 정렬: 상승 {} / 하락 {} / 중립 {} (우세: {}{})\n",
            alignment.bullish,
            alignment.bearish,
            alignment.neutral,
            alignment.dominant.label(),
            if alignment.is_aligned { ", 전 구간 일치" } else { "" }
        ));
    }

    output
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a scope_core::AggregationReport,
    failures: Vec<JsonFailure<'a>>,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    label: &'a str,
    error: String,
}

/// 리포트와 실패 목록을 JSON으로 렌더링합니다.
pub fn render_json(run: &ReportRun) -> Result<String> {
    let output = JsonOutput {
        report: &run.report,
        failures: run
            .failures
            .iter()
            .map(|f| JsonFailure {
                label: &f.label,
                error: f.error.to_string(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output).context("리포트 직렬화 실패")
}
