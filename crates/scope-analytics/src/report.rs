//! 타임프레임별 집계 리포트 생성.
//!
//! 설정된 타임프레임을 모두 분석해 하나의 [`AggregationReport`]로 모읍니다.
//! 한 타임프레임의 실패는 그 타임프레임만 리포트에서 빠지게 하며, 사유는
//! [`ReportRun::failures`]에 남습니다.

use futures::future::join_all;
use scope_core::{
    timeframe_span, AggregationReport, ReportRun, ScopeResult, TimeframeConfig, TimeframeFailure,
    TimeframeSnapshot,
};
use tracing::{info, warn, Instrument};

use crate::analyzer::TimeframeAnalyzer;

/// 타임프레임 조회 방식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMode {
    /// 설정 순서대로 하나씩 조회
    #[default]
    Sequential,
    /// 동시에 조회 (결과는 설정 순서로 정렬)
    Concurrent,
}

impl FetchMode {
    /// `concurrent` 플래그에서 조회 방식을 결정합니다.
    pub fn from_flag(concurrent: bool) -> Self {
        if concurrent {
            FetchMode::Concurrent
        } else {
            FetchMode::Sequential
        }
    }
}

/// 집계 리포트 빌더.
pub struct ReportBuilder {
    analyzer: TimeframeAnalyzer,
    mode: FetchMode,
}

impl ReportBuilder {
    /// 새 빌더 생성 (순차 조회).
    pub fn new(analyzer: TimeframeAnalyzer) -> Self {
        Self {
            analyzer,
            mode: FetchMode::Sequential,
        }
    }

    /// 조회 방식 지정.
    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    /// 모든 타임프레임을 분석해 리포트를 만듭니다.
    ///
    /// 리포트 항목과 실패 목록 모두 `timeframes`의 순서를 따릅니다.
    /// 모든 타임프레임이 실패해도 빈 리포트를 반환합니다.
    pub async fn build(&self, timeframes: &[TimeframeConfig]) -> ReportRun {
        let span = timeframe_span!("build_report", self.analyzer.symbol());
        self.build_inner(timeframes).instrument(span).await
    }

    async fn build_inner(&self, timeframes: &[TimeframeConfig]) -> ReportRun {
        let results: Vec<ScopeResult<TimeframeSnapshot>> = match self.mode {
            FetchMode::Sequential => {
                let mut results = Vec::with_capacity(timeframes.len());
                for config in timeframes {
                    results.push(self.analyzer.analyze(config).await);
                }
                results
            }
            FetchMode::Concurrent => join_all(timeframes.iter().map(|config| self.analyzer.analyze(config))).await,
        };

        let mut report = AggregationReport::new(self.analyzer.symbol());
        let mut failures = Vec::new();

        for (config, result) in timeframes.iter().zip(results) {
            match result {
                Ok(snapshot) => report.insert(snapshot),
                Err(error) => {
                    warn!(timeframe = %config.label, error = %error, "timeframe excluded from report");
                    failures.push(TimeframeFailure {
                        label: config.label.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            included = report.len(),
            excluded = failures.len(),
            mode = ?self.mode,
            "report built"
        );

        ReportRun { report, failures }
    }
}
