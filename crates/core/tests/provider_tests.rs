// ═══════════════════════════════════════════════════════════════════
// Provider Tests — CoinGecko request shape, parsing, HTTP failures
// ═══════════════════════════════════════════════════════════════════

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use sector_tracker_core::errors::CoreError;
use sector_tracker_core::models::currency::Currency;
use sector_tracker_core::providers::coingecko::CoinGeckoProvider;
use sector_tracker_core::providers::traits::MarketDataProvider;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — one-shot HTTP server
// ═══════════════════════════════════════════════════════════════════

/// Accept a single connection, answer it with `status` and `body`, and hand
/// back the request line the client sent.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    (format!("http://{addr}"), handle)
}

fn provider(base_url: &str) -> CoinGeckoProvider {
    CoinGeckoProvider::with_base_url(base_url, Duration::from_secs(5))
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ═══════════════════════════════════════════════════════════════════
// Construction
// ═══════════════════════════════════════════════════════════════════

mod construction {
    use super::*;

    #[test]
    fn name() {
        assert_eq!(CoinGeckoProvider::new().name(), "CoinGecko");
    }

    #[test]
    fn default_points_at_public_api() {
        let p = CoinGeckoProvider::default();
        assert_eq!(p.base_url(), "https://api.coingecko.com/api/v3");
    }

    #[test]
    fn trailing_slash_trimmed() {
        let p = provider("http://localhost:9000/api/v3/");
        assert_eq!(p.base_url(), "http://localhost:9000/api/v3");
    }

    #[test]
    fn usable_as_trait_object() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoinGeckoProvider>();
        let boxed: Box<dyn MarketDataProvider> = Box::new(CoinGeckoProvider::new());
        assert_eq!(boxed.name(), "CoinGecko");
    }
}

// ═══════════════════════════════════════════════════════════════════
// /simple/price
// ═══════════════════════════════════════════════════════════════════

mod simple_price {
    use super::*;

    #[tokio::test]
    async fn sends_batched_request_and_parses_table() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"aave": {"usd": 80.5}, "uniswap": {"usd": 120.0}}"#,
        )
        .await;

        let table = provider(&url)
            .simple_price(&ids(&["aave", "uniswap"]), Currency::Usd)
            .await
            .unwrap();

        assert_eq!(table["aave"]["usd"], 80.5);
        assert_eq!(table["uniswap"]["usd"], 120.0);

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /simple/price?"));
        assert!(request_line.contains("ids=aave%2Cuniswap"));
        assert!(request_line.contains("vs_currencies=usd"));
    }

    #[tokio::test]
    async fn uses_lowercase_currency() {
        let (url, server) = serve_once("200 OK", r#"{"aave": {"ars": 95000}}"#).await;
        let table = provider(&url)
            .simple_price(&ids(&["aave"]), Currency::Ars)
            .await
            .unwrap();
        assert_eq!(table["aave"]["ars"], 95000.0);
        assert!(server.await.unwrap().contains("vs_currencies=ars"));
    }

    #[tokio::test]
    async fn unknown_coins_are_absent() {
        let (url, _server) = serve_once("200 OK", r#"{"aave": {"usd": 80.0}}"#).await;
        let table = provider(&url)
            .simple_price(&ids(&["aave", "not-a-coin"]), Currency::Usd)
            .await
            .unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.contains_key("not-a-coin"));
    }

    #[tokio::test]
    async fn null_quotes_are_dropped() {
        let (url, _server) = serve_once("200 OK", r#"{"aave": {"usd": null}}"#).await;
        let table = provider(&url)
            .simple_price(&ids(&["aave"]), Currency::Usd)
            .await
            .unwrap();
        assert!(table["aave"].is_empty());
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let (url, _server) = serve_once("500 Internal Server Error", "{}").await;
        let err = provider(&url)
            .simple_price(&ids(&["aave"]), Currency::Usd)
            .await
            .unwrap_err();
        match err {
            CoreError::Api { provider, message } => {
                assert_eq!(provider, "CoinGecko");
                assert!(message.contains("500"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limit_is_called_out() {
        let (url, _server) = serve_once("429 Too Many Requests", "{}").await;
        let err = provider(&url)
            .simple_price(&ids(&["aave"]), Currency::Usd)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Rate limited"));
    }

    #[tokio::test]
    async fn malformed_body_is_api_error() {
        let (url, _server) = serve_once("200 OK", r#"["not", "a", "map"]"#).await;
        let err = provider(&url)
            .simple_price(&ids(&["aave"]), Currency::Usd)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(&format!("http://{addr}"))
            .simple_price(&ids(&["aave"]), Currency::Usd)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// /search
// ═══════════════════════════════════════════════════════════════════

mod search {
    use super::*;

    const SEARCH_BODY: &str = r#"{
        "coins": [
            {"id": "the-sandbox", "name": "The Sandbox", "api_symbol": "the-sandbox", "symbol": "SAND", "market_cap_rank": 70},
            {"id": "sandbox-token", "name": "Sandbox Token", "symbol": "SBT"}
        ],
        "exchanges": [],
        "nfts": []
    }"#;

    #[tokio::test]
    async fn parses_coins_and_ignores_extra_fields() {
        let (url, server) = serve_once("200 OK", SEARCH_BODY).await;
        let results = provider(&url).search("sandbox").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "the-sandbox");
        assert_eq!(results[0].name, "The Sandbox");
        assert_eq!(results[0].symbol, "SAND");
        assert_eq!(results[0].label(), "The Sandbox (SAND)");

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /search?query=sandbox"));
    }

    #[tokio::test]
    async fn missing_coins_key_is_empty() {
        let (url, _server) = serve_once("200 OK", r#"{"exchanges": []}"#).await;
        let results = provider(&url).search("nothing").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn http_failure_is_api_error() {
        let (url, _server) = serve_once("503 Service Unavailable", "{}").await;
        let err = provider(&url).search("btc").await.unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }
}
