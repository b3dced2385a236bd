//! 설정된 타임프레임 목록 출력.

use std::path::Path;

use anyhow::Result;
use scope_core::AppConfig;

use super::setup::load_config;

/// 설정된 타임프레임을 표 형식으로 렌더링합니다.
pub fn render_timeframes(config: &AppConfig) -> String {
    let mut output = String::new();
    output.push_str(&format!("심볼: {}\n", config.symbol));
    output.push_str(&format!("{:<10} {:<8} {:>6}\n", "라벨", "간격", "개수"));
    for tf in &config.timeframes {
        output.push_str(&format!("{:<10} {:<8} {:>6}\n", tf.label, tf.interval, tf.limit));
    }
    if config.timeframes.is_empty() {
        output.push_str("(설정된 타임프레임 없음)\n");
    }
    output
}

/// 설정 파일의 타임프레임을 출력합니다.
pub fn run_timeframes(config_path: &Path) -> Result<()> {
    let config = load_config(config_path, None)?;
    print!("{}", render_timeframes(&config));
    Ok(())
}
