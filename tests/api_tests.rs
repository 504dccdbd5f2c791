/// Pipeline tests for the Upbit SDK against a local mock server.
///
/// These tests are deterministic and do not require network access.
use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use sha2::{Digest, Sha512};
use wiremock::matchers::{any, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use upbit_sdk::*;

fn public_api(server: &MockServer) -> UpbitApi {
    UpbitApi::with_config(ApiConfig::with_base_url(server.uri())).unwrap()
}

fn signed_api(server: &MockServer) -> UpbitApi {
    public_api(server).with_credentials(Credentials::new("test-access-key", "test-secret-key"))
}

fn claim_of(request: &Request) -> AuthClaim {
    let value = request
        .headers
        .get("authorization")
        .expect("authorization header")
        .to_str()
        .unwrap();
    assert!(value.starts_with("Bearer "));
    AuthClaim::from_authorization(value).unwrap()
}

fn sha512_hex(input: &str) -> String {
    hex::encode(Sha512::digest(input.as_bytes()))
}

async fn refuse_everything(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/market/all"))
        .and(query_param("isDetails", "true"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"market": "KRW-BTC", "korean_name": "비트코인", "english_name": "Bitcoin", "market_warning": "NONE"},
            {"market": "KRW-ETH", "korean_name": "이더리움", "english_name": "Ethereum", "market_warning": "CAUTION"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let env = public_api(&server).market_all(true).await;
    assert!(env.error().is_none());
    assert_eq!(env.status_code(), Some(200));
    let markets = env.into_result().unwrap();
    assert_eq!(markets.len(), 2);
    assert_eq!(markets[0].market, "KRW-BTC");
    assert!(markets[1].is_caution());
}

#[tokio::test]
async fn test_public_call_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/market/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"market": "KRW-BTC"}])))
        .mount(&server)
        .await;

    let env = signed_api(&server).market_all(false).await;
    assert!(env.is_ok());
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_empty_list_is_anomaly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/candles/weeks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let env = public_api(&server)
        .candles_weeks(&CandleQuery::new("KRW-BTC"))
        .await;
    assert!(env.response().is_none());
    assert_eq!(env.status_code(), Some(200));
    assert_eq!(
        env.error().unwrap().to_string(),
        "HTTP STATUS IS 200 BUT RESULT IS EMPTY"
    );
}

#[tokio::test]
async fn test_accounts_without_assets_is_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let env = signed_api(&server).accounts().await;
    assert_eq!(env.status_code(), Some(200));
    assert!(env.error().unwrap().is_empty_result());
}

#[tokio::test]
async fn test_null_field_keeps_rest_of_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/candles/weeks"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"market":"KRW-BTC","trade_price":100.0},{"market":"KRW-BTC","trade_price":null}]"#,
        ))
        .mount(&server)
        .await;

    let env = public_api(&server)
        .candles_weeks(&CandleQuery::new("KRW-BTC"))
        .await;
    assert_eq!(env.status_code(), Some(200));
    let candles = env.into_result().unwrap();
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].trade_price, 100.0);
    assert_eq!(candles[1].trade_price, 0.0);
    assert_eq!(candles[1].market, "KRW-BTC");
}

#[tokio::test]
async fn test_null_field_keeps_rest_of_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/chance"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"bid_fee":"0.0005","ask_fee":null,"market":{"id":"KRW-BTC"}}"#,
        ))
        .mount(&server)
        .await;

    let chance = signed_api(&server)
        .orders_chance("KRW", "BTC")
        .await
        .into_result()
        .unwrap();
    assert_eq!(chance.bid_fee, "0.0005");
    assert_eq!(chance.ask_fee, "");
    assert_eq!(chance.market.id, "KRW-BTC");
}

#[tokio::test]
async fn test_exchange_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/candles/minutes/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"name": "invalid_query_payload", "message": "bad"}
        })))
        .mount(&server)
        .await;

    let env = public_api(&server)
        .candles_minutes(1, &CandleQuery::new("KRW-NOPE"))
        .await;
    assert_eq!(env.status_code(), Some(404));
    assert!(env.response().is_none());
    let err = env.error().unwrap();
    assert_eq!(err.to_string(), "invalid_query_payload (bad)");
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_exchange_error_with_unexpected_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/market/all"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let env = public_api(&server).market_all(false).await;
    assert_eq!(env.status_code(), Some(503));
    assert_eq!(
        env.into_result().unwrap_err(),
        UpbitError::Exchange {
            status: 503,
            name: String::new(),
            message: String::new(),
        }
    );
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = UpbitApi::with_config(ApiConfig::with_base_url(format!("http://{addr}"))).unwrap();
    let env = api.market_all(true).await;
    assert!(env.response().is_none());
    assert_eq!(env.status_code(), None);
    assert!(env.error().unwrap().is_transport());
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"market": "KRW-BTC"}]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ApiConfig::with_base_url(server.uri()).timeout(Duration::from_millis(100));
    let env = UpbitApi::with_config(config).unwrap().market_all(false).await;
    assert_eq!(env.status_code(), None);
    assert!(env.error().unwrap().is_transport());
}

#[tokio::test]
async fn test_truncated_body_is_transport_error() {
    // Promise 500 bytes, send a few, then close the connection.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await.unwrap();
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 500\r\n\r\n[{\"market\":",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let api = UpbitApi::with_config(ApiConfig::with_base_url(format!("http://{addr}"))).unwrap();
    let env = api.market_all(true).await;
    assert!(env.response().is_none());
    assert_eq!(env.status_code(), None);
    assert!(env.error().unwrap().is_transport());
    server.await.unwrap();
}

#[tokio::test]
async fn test_day_candles_return_first_element() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/candles/days"))
        .and(query_param("market", "BTC-ETH"))
        .and(query_param("convertingPriceUnit", "KRW"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"market": "BTC-ETH", "trade_price": 0.05, "converted_trade_price": 4200000.0},
            {"market": "BTC-ETH", "trade_price": 0.04}
        ])))
        .mount(&server)
        .await;

    let query = CandleQuery::new("BTC-ETH").count(2).converting_price_unit("KRW");
    let candle = public_api(&server)
        .candles_days(&query)
        .await
        .into_result()
        .unwrap();
    assert_eq!(candle.trade_price, 0.05);
    assert_eq!(candle.converted_trade_price, Some(4200000.0));
}

#[tokio::test]
async fn test_day_candles_empty_is_guarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/candles/days"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let env = public_api(&server)
        .candles_days(&CandleQuery::new("KRW-BTC"))
        .await;
    assert!(env.error().unwrap().is_empty_result());
}

#[tokio::test]
async fn test_minute_candles_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/candles/minutes/240"))
        .and(query_param("market", "KRW-BTC"))
        .and(query_param("count", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"market": "KRW-BTC", "opening_price": 1.0, "trade_price": 2.0, "unit": 240},
            {"market": "KRW-BTC", "opening_price": 3.0, "trade_price": 4.0, "unit": 240}
        ])))
        .mount(&server)
        .await;

    let candles = public_api(&server)
        .candles_minutes(240, &CandleQuery::new("KRW-BTC").count(2))
        .await
        .into_result()
        .unwrap();
    assert_eq!(candles.len(), 2);
    assert!(candles.iter().all(|c| c.unit == 240));
}

// ---------------------------------------------------------------------------
// Rejection before dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_count_over_cap_never_reaches_network() {
    let server = MockServer::start().await;
    refuse_everything(&server).await;

    let query = CandleQuery::new("KRW-BTC").count(201);
    let env = public_api(&server).candles_minutes(1, &query).await;
    assert!(matches!(env.error(), Some(UpbitError::InvalidParameter(_))));
    assert_eq!(env.status_code(), None);

    let env = public_api(&server).candles_days(&query).await;
    assert!(matches!(env.error(), Some(UpbitError::InvalidParameter(_))));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_disallowed_unit_never_reaches_network() {
    let server = MockServer::start().await;
    refuse_everything(&server).await;

    let env = public_api(&server)
        .candles_minutes(7, &CandleQuery::new("KRW-BTC"))
        .await;
    assert!(matches!(env.error(), Some(UpbitError::InvalidParameter(_))));
    assert!(env.response().is_none());
}

#[tokio::test]
async fn test_missing_credentials_is_precondition_error() {
    let server = MockServer::start().await;
    refuse_everything(&server).await;

    let env = public_api(&server).accounts().await;
    assert!(matches!(env.error(), Some(UpbitError::Precondition(_))));
    assert_eq!(env.status_code(), None);
}

#[tokio::test]
async fn test_empty_secret_aborts_before_dispatch() {
    let server = MockServer::start().await;
    refuse_everything(&server).await;

    let api = public_api(&server).with_credentials(Credentials::new("test-access-key", ""));
    let env = api.orders_chance("KRW", "BTC").await;
    assert!(matches!(env.error(), Some(UpbitError::Signing(_))));
}

// ---------------------------------------------------------------------------
// Signing on the wire
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_accounts_sends_token_without_query_hash() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"currency": "KRW", "balance": "1000.0", "locked": "0.0", "avg_buy_price": "0", "unit_currency": "KRW"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let accounts = signed_api(&server).accounts().await.into_result().unwrap();
    assert_eq!(accounts[0].currency, "KRW");

    let requests = server.received_requests().await.unwrap();
    let claim = claim_of(&requests[0]);
    assert_eq!(claim.access_key, "test-access-key");
    assert!(claim.query_hash.is_none());
    assert!(claim.query_hash_alg.is_none());
}

#[tokio::test]
async fn test_query_hash_matches_wire_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/chance"))
        .and(query_param("market", "KRW-BTC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bid_fee": "0.0005",
            "ask_fee": "0.0005",
            "market": {"id": "KRW-BTC", "bid": {"currency": "KRW", "min_total": 5000}}
        })))
        .mount(&server)
        .await;

    let chance = signed_api(&server)
        .orders_chance("KRW", "BTC")
        .await
        .into_result()
        .unwrap();
    assert_eq!(chance.market.id, "KRW-BTC");
    assert_eq!(chance.market.bid.min_total, "5000");

    let requests = server.received_requests().await.unwrap();
    let wire_query = requests[0].url.query().unwrap();
    assert_eq!(wire_query, "market=KRW-BTC");

    let claim = claim_of(&requests[0]);
    assert_eq!(claim.query_hash_alg.as_deref(), Some("SHA512"));
    assert_eq!(claim.query_hash, Some(sha512_hex(wire_query)));
}

#[tokio::test]
async fn test_escaped_query_is_hashed_as_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let api = signed_api(&server);
    let descriptor = EndpointDescriptor::get(api.config().url("/v1/orders/chance"))
        .query(
            QueryParams::new()
                .with("market", "KRW-BTC")
                .with("to", "2024-01-01 09:00:00")
                .with("note", "a&b=c/ü"),
        )
        .authenticated();
    let expected_query = descriptor.query.encode();

    let env = api.call::<upbit_sdk::decoder::Object<OrdersChance>>(&descriptor).await;
    assert!(env.is_ok());

    let requests = server.received_requests().await.unwrap();
    let wire_query = requests[0].url.query().unwrap();
    assert_eq!(wire_query, expected_query);
    assert_eq!(claim_of(&requests[0]).query_hash, Some(sha512_hex(wire_query)));
}

#[tokio::test]
async fn test_unparsable_object_decodes_to_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/chance"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .mount(&server)
        .await;

    let env = signed_api(&server).orders_chance("KRW", "BTC").await;
    assert!(env.is_ok());
    assert_eq!(env.response(), Some(&OrdersChance::default()));
}

#[tokio::test]
async fn test_concurrent_calls_carry_their_own_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/chance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"market": {"id": "any"}}))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let api = signed_api(&server);
    let other = api.clone();
    let (a, b) = tokio::join!(
        api.orders_chance("KRW", "BTC"),
        other.orders_chance("BTC", "ETH")
    );
    assert!(a.is_ok());
    assert!(b.is_ok());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let claims: Vec<AuthClaim> = requests.iter().map(claim_of).collect();
    for (request, claim) in requests.iter().zip(&claims) {
        let wire_query = request.url.query().unwrap();
        assert_eq!(claim.query_hash, Some(sha512_hex(wire_query)));
    }
    assert_ne!(claims[0].nonce, claims[1].nonce);
    assert_ne!(claims[0].query_hash, claims[1].query_hash);
}

#[tokio::test]
async fn test_concurrent_calls_across_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/chance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let api = signed_api(&server);
    let markets = [("KRW", "BTC"), ("KRW", "ETH"), ("BTC", "XRP"), ("USDT", "SOL")];
    let handles: Vec<_> = markets
        .iter()
        .map(|(bid, ask)| {
            let api = api.clone();
            let (bid, ask) = (bid.to_string(), ask.to_string());
            tokio::spawn(async move { api.orders_chance(&bid, &ask).await })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), markets.len());
    for request in &requests {
        let wire_query = request.url.query().unwrap();
        assert_eq!(claim_of(request).query_hash, Some(sha512_hex(wire_query)));
    }
}
