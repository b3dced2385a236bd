//! 명령어 공통 준비 작업: 설정 로드, 데이터 소스 구성, 리포트 생성.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use scope_analytics::{FetchMode, ReportBuilder, TimeframeAnalyzer};
use scope_core::{AppConfig, ReportRun};
use scope_exchange::simulated::synthetic::zigzag_series;
use scope_exchange::{BinanceClient, BinanceConfig, MarketDataSource, RetryConfig, StaticMarketData};
use tracing::info;

/// 설정 파일을 로드하고 명령줄 오버라이드를 적용한 뒤 검증합니다.
pub fn load_config(path: &Path, symbol: Option<&str>) -> Result<AppConfig> {
    let mut config = AppConfig::load(path)
        .with_context(|| format!("설정 로드 실패: {}", path.display()))?;

    if let Some(symbol) = symbol {
        config.symbol = symbol.to_uppercase();
    }

    config.validate().context("설정 검증 실패")?;
    Ok(config)
}

/// 데모용 합성 데이터 소스.
///
/// 설정된 타임프레임마다 `limit`개의 지그재그 시계열을 등록합니다.
pub fn demo_source(config: &AppConfig) -> StaticMarketData {
    config
        .timeframes
        .iter()
        .enumerate()
        .filter_map(|(i, tf)| tf.timeframe().ok().map(|timeframe| (i, tf, timeframe)))
        .fold(StaticMarketData::new(), |source, (i, tf, timeframe)| {
            let base = 40_000.0 + 500.0 * i as f64;
            let amplitude = 50.0 * (i + 1) as f64;
            source.with_series(timeframe, zigzag_series(tf.limit as usize, base, amplitude))
        })
}

/// 설정에 맞는 시장 데이터 소스를 만듭니다.
pub fn market_source(config: &AppConfig, demo: bool) -> Result<Arc<dyn MarketDataSource>> {
    if demo {
        info!("using synthetic demo data");
        return Ok(Arc::new(demo_source(config)));
    }

    let client = BinanceClient::new(BinanceConfig::from_settings(&config.market_data))
        .context("Binance 클라이언트 생성 실패")?;
    Ok(Arc::new(client))
}

/// 설정된 모든 타임프레임의 리포트를 생성합니다.
pub async fn build_report(config: &AppConfig, source: Arc<dyn MarketDataSource>, concurrent: bool) -> ReportRun {
    let market = &config.market_data;
    let retry = RetryConfig::new(market.max_retries, market.retry_delay_ms);
    let analyzer =
        TimeframeAnalyzer::new(source, config.symbol.clone(), config.indicators.clone()).with_retry(retry);

    let mode = FetchMode::from_flag(concurrent || market.concurrent);
    ReportBuilder::new(analyzer)
        .with_mode(mode)
        .build(&config.timeframes)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_report_is_complete() {
        let config = AppConfig::default();
        let source: Arc<dyn MarketDataSource> = Arc::new(demo_source(&config));
        let run = build_report(&config, source, false).await;

        assert!(run.is_complete());
        assert_eq!(
            run.report.labels(),
            vec!["1분봉", "5분봉", "15분봉", "1시간봉", "4시간봉"]
        );
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = load_config(Path::new("does/not/exist.toml"), Some("ethusdt")).unwrap();
        assert_eq!(config.symbol, "ETHUSDT");
        assert_eq!(config.timeframes.len(), 5);
    }
}
