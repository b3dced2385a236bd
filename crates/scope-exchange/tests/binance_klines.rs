//! Binance 클라인 커넥터 HTTP 경계 테스트.
//!
//! mockito 서버로 응답을 고정해 네트워크 없이 검증합니다.

use mockito::Matcher;
use scope_core::Timeframe;
use scope_exchange::{BinanceClient, BinanceConfig, ExchangeError, MarketDataSource};

fn client_for(server: &mockito::Server) -> BinanceClient {
    BinanceClient::new(BinanceConfig::new(server.url()).with_timeout_secs(5))
        .expect("테스트용 클라이언트 생성 실패")
}

fn kline_rows(count: usize) -> String {
    let rows: Vec<String> = (0..count)
        .map(|i| {
            let t = 1_704_067_200_000i64 + (i as i64) * 60_000;
            let close = 100.0 + i as f64;
            format!(
                r#"[{t},"{o}","{h}","{l}","{c}","1.5",{ct},"0",1,"0","0","0"]"#,
                t = t,
                o = close - 0.5,
                h = close + 1.0,
                l = close - 1.0,
                c = close,
                ct = t + 59_999
            )
        })
        .collect();
    format!("[{}]", rows.join(","))
}

#[tokio::test]
async fn test_fetch_candles_sends_query_and_parses() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "BTCUSDT".into()),
            Matcher::UrlEncoded("interval".into(), "15m".into()),
            Matcher::UrlEncoded("limit".into(), "3".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(kline_rows(3))
        .create_async()
        .await;

    let client = client_for(&server);
    let series = client
        .fetch_candles("btcusdt", Timeframe::M15, 3)
        .await
        .expect("정상 응답이어야 함");

    mock.assert_async().await;
    assert_eq!(series.len(), 3);
    assert_eq!(series.closes(), vec![100.0, 101.0, 102.0]);
}

#[tokio::test]
async fn test_empty_array_is_empty_series() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let series = client_for(&server)
        .fetch_candles("BTCUSDT", Timeframe::M1, 100)
        .await
        .unwrap();
    assert!(series.is_empty());
}

#[tokio::test]
async fn test_non_array_body_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"unexpected":"object"}"#)
        .create_async()
        .await;

    let result = client_for(&server)
        .fetch_candles("BTCUSDT", Timeframe::M1, 100)
        .await;
    assert!(matches!(result, Err(ExchangeError::ParseError(_))));
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let result = client_for(&server)
        .fetch_candles("BTCUSDT", Timeframe::M1, 100)
        .await;
    assert!(matches!(result, Err(ExchangeError::ParseError(_))));
}

#[tokio::test]
async fn test_binance_error_code_is_mapped() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"code":-1121,"msg":"Invalid symbol."}"#)
        .create_async()
        .await;

    let result = client_for(&server)
        .fetch_candles("NOPE", Timeframe::H1, 100)
        .await;
    assert!(matches!(result, Err(ExchangeError::SymbolNotFound(_))));
}

#[tokio::test]
async fn test_http_error_without_body_code() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let result = client_for(&server)
        .fetch_candles("BTCUSDT", Timeframe::H4, 100)
        .await;
    match result {
        Err(err @ ExchangeError::ApiError { code: 503, .. }) => assert!(err.is_retryable()),
        other => panic!("예상치 못한 결과: {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(429)
        .create_async()
        .await;

    let result = client_for(&server)
        .fetch_candles("BTCUSDT", Timeframe::M5, 100)
        .await;
    assert_eq!(result, Err(ExchangeError::RateLimited));
}
