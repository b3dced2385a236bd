//! 결정적인 합성 캔들 시계열 생성기.

use chrono::{DateTime, Duration, Utc};
use scope_core::{Candle, CandleSeries};

/// 합성 시계열의 시작 시각 (2024-01-01T00:00:00Z).
const EPOCH_SECS: i64 = 1_704_067_200;

fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(EPOCH_SECS, 0).unwrap_or_default()
}

/// 종가 목록으로 1분 간격 시계열을 만듭니다.
///
/// 시가는 직전 종가, 고가/저가는 시가·종가의 최대/최소, 거래량은 1부터 증가합니다.
pub fn series_from_closes(closes: &[f64]) -> CandleSeries {
    let start = start_time();
    let candles: Vec<Candle> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle::new(
                start + Duration::minutes(i as i64),
                open,
                open.max(close),
                open.min(close),
                close,
                (i + 1) as f64,
            )
        })
        .collect();

    // 타임스탬프가 1분씩 증가하므로 항상 유효합니다.
    CandleSeries::new(candles).unwrap_or_default()
}

/// `start`에서 시작해 매 캔들 `step`씩 변하는 시계열.
pub fn linear_series(len: usize, start: f64, step: f64) -> CandleSeries {
    let closes: Vec<f64> = (0..len).map(|i| start + step * i as f64).collect();
    series_from_closes(&closes)
}

/// `base` 주변을 `amplitude`만큼 오르내리는 지그재그 시계열.
///
/// 상승 폭과 하락 폭이 번갈아 나타나 RSI가 양 끝에 붙지 않습니다.
pub fn zigzag_series(len: usize, base: f64, amplitude: f64) -> CandleSeries {
    let closes: Vec<f64> = (0..len)
        .map(|i| {
            let phase = (i % 8) as f64;
            let wave = if phase < 4.0 { phase } else { 8.0 - phase };
            base + amplitude * (wave - 2.0) / 2.0 + 0.01 * i as f64
        })
        .collect();
    series_from_closes(&closes)
}
