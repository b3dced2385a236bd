//! 요약 프롬프트 미리보기.
//!
//! 언어 모델을 호출하지 않고 전송될 프롬프트만 출력합니다.

use std::path::PathBuf;

use anyhow::Result;
use scope_summary::build_prompt;

use super::setup::{build_report, load_config, market_source};

/// 프롬프트 명령 설정.
#[derive(Debug)]
pub struct PromptConfig {
    /// 설정 파일 경로
    pub config_path: PathBuf,
    /// 심볼 오버라이드
    pub symbol: Option<String>,
    /// 동시 조회 여부
    pub concurrent: bool,
    /// 합성 데이터 사용 여부
    pub demo: bool,
}

/// 리포트를 만들고 요약 프롬프트를 출력합니다.
///
/// 리포트가 비어 있으면 안내 문구만 출력합니다.
pub async fn run_prompt(cfg: PromptConfig) -> Result<()> {
    let config = load_config(&cfg.config_path, cfg.symbol.as_deref())?;
    let source = market_source(&config, cfg.demo)?;
    let run = build_report(&config, source, cfg.concurrent).await;

    for failure in &run.failures {
        eprintln!("⚠️ {} 제외: {}", failure.label, failure.error);
    }

    match build_prompt(&run.report, &config.summary.instructions) {
        Ok(prompt) => println!("{}", prompt),
        Err(e) => eprintln!("⚠️ {}", e),
    }
    Ok(())
}
