//! 요약 프롬프트 생성.

use scope_core::AggregationReport;

use crate::types::{SummaryError, SummaryResult};

/// 리포트를 언어 모델 프롬프트로 변환합니다.
///
/// 리포트 순서대로 타임프레임마다 한 줄씩 지표를 나열하고 마지막에
/// 분석 관점 지시문을 붙입니다. 수치는 소수점 둘째 자리까지 표시합니다.
pub fn build_prompt(report: &AggregationReport, instructions: &str) -> SummaryResult<String> {
    if report.is_empty() {
        return Err(SummaryError::EmptyReport);
    }

    let mut prompt = format!("{}의 각 시간봉 지표 상태는 다음과 같아:\n\n", report.symbol());
    for snapshot in report.iter() {
        prompt.push_str(&format!(
            "[{}] 가격: {:.2}, RSI: {:.2}, 거래량: {:.2}, EMA20: {:.2}, EMA50: {:.2}, EMA200: {:.2}",
            snapshot.label,
            snapshot.close,
            snapshot.rsi,
            snapshot.volume,
            snapshot.ema20,
            snapshot.ema50,
            snapshot.ema200,
        ));
        if let Some(stoch) = snapshot.stoch_rsi {
            prompt.push_str(&format!(", StochRSI: {:.2}", stoch));
        }
        prompt.push('\n');
    }

    let instructions = instructions.trim();
    if !instructions.is_empty() {
        prompt.push('\n');
        prompt.push_str(instructions);
    }

    Ok(prompt)
}
