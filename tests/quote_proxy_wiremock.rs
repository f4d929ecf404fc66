use anyhow::Result;
use folioledger::market_data::{ProxyQuoteSource, QuoteSource};
use rust_decimal_macros::dec;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn proxy_fetch_quote_hits_mock_server() -> Result<()> {
    let server = MockServer::start().await;
    let source = ProxyQuoteSource::new("http://unused").with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path("/quote"))
        .and(query_param("symbol", "AAPL"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"price": "197.50"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let quote = source.fetch_quote("AAPL").await?.expect("expected quote");
    assert_eq!(quote.price, dec!(197.50));
    Ok(())
}

#[tokio::test]
async fn proxy_returns_none_for_unknown_symbol() -> Result<()> {
    let server = MockServer::start().await;
    let source = ProxyQuoteSource::new("http://unused").with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path("/quote"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let quote = source.fetch_quote("ZZZZ").await?;
    assert!(quote.is_none());
    Ok(())
}

#[tokio::test]
async fn proxy_surfaces_server_errors() -> Result<()> {
    let server = MockServer::start().await;
    let source = ProxyQuoteSource::new("http://unused").with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path("/quote"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = source.fetch_quote("AAPL").await.unwrap_err();
    assert!(err.to_string().contains("AAPL"));
    Ok(())
}

#[tokio::test]
async fn proxy_treats_null_price_as_no_quote() -> Result<()> {
    let server = MockServer::start().await;
    let source = ProxyQuoteSource::new("http://unused").with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path("/quote"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"price": null}"#, "application/json"),
        )
        .mount(&server)
        .await;

    assert!(source.fetch_quote("AAPL").await?.is_none());
    Ok(())
}
