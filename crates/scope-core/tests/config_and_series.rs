//! 설정 파일 및 캔들 시계열 통합 테스트.
//!
//! ## 테스트 목적
//! 1. 저장소에 포함된 `config/default.toml`이 로드·검증되는지
//! 2. 캔들 시계열이 시간 순서가 엄격히 증가할 때만 생성되는지

use std::path::PathBuf;

use chrono::{DateTime, Duration};
use proptest::prelude::*;
use scope_core::{AppConfig, Candle, CandleSeries, ScopeError, Timeframe};

fn shipped_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/default.toml")
}

fn candle_at(offset_secs: i64) -> Candle {
    let base = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
    Candle::new(base + Duration::seconds(offset_secs), 1.0, 1.0, 1.0, 1.0, 1.0)
}

#[test]
fn test_shipped_config_loads_and_validates() {
    let config = AppConfig::load(shipped_config_path()).expect("기본 설정 파일 로드 실패");
    config.validate().expect("기본 설정 검증 실패");

    let labels: Vec<&str> = config.timeframes.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["1분봉", "5분봉", "15분봉", "1시간봉", "4시간봉"]);

    let intervals: Vec<Timeframe> = config
        .timeframes
        .iter()
        .map(|t| t.timeframe().unwrap())
        .collect();
    assert_eq!(
        intervals,
        vec![Timeframe::M1, Timeframe::M5, Timeframe::M15, Timeframe::H1, Timeframe::H4]
    );
    assert_eq!(config.indicators.ema_spans, [20, 50, 200]);
    assert!(!config.indicators.stoch_rsi.enabled);
    assert_eq!(config.summary.max_tokens, 200);
}

#[test]
fn test_duplicate_timestamp_rejected() {
    let result = CandleSeries::new(vec![candle_at(0), candle_at(60), candle_at(60)]);
    assert!(matches!(result, Err(ScopeError::DataFetch(_))));
}

proptest! {
    #[test]
    fn series_accepts_only_strictly_increasing(offsets in prop::collection::vec(0i64..10_000, 0..50)) {
        let candles: Vec<Candle> = offsets.iter().map(|&o| candle_at(o)).collect();
        let increasing = offsets.windows(2).all(|w| w[0] < w[1]);

        let result = CandleSeries::new(candles);
        prop_assert_eq!(result.is_ok(), increasing);
    }

    #[test]
    fn sorted_unique_offsets_build_series(offsets in prop::collection::btree_set(0i64..100_000, 1..80)) {
        let candles: Vec<Candle> = offsets.into_iter().map(candle_at).collect();
        let len = candles.len();

        let series = CandleSeries::new(candles).unwrap();
        prop_assert_eq!(series.len(), len);
        prop_assert_eq!(series.closes().len(), len);
    }
}
