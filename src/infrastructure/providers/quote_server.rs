//! # Quote Server Provider
//!
//! Client side of this crate's own `GET /cotacao` endpoint.
//!
//! The server answers `{"bid": "5.1234"}`; the pair is whatever the server
//! is configured to quote, so the query key is only used to label the
//! resulting [`ExchangeQuote`].

use crate::domain::entities::ExchangeQuote;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::awesome_api::parse_bid;
use crate::infrastructure::providers::context::QueryContext;
use crate::infrastructure::providers::error::ProviderResult;
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::ProviderQuery;
use async_trait::async_trait;
use serde::Deserialize;

/// Provider name used as the `source` tag.
pub const QUOTE_SERVER_PROVIDER: &str = "QuoteServer";

#[derive(Debug, Deserialize)]
struct BidResponse {
    #[serde(default)]
    bid: String,
}

/// Provider backed by a running `lookup-race serve` instance.
#[derive(Debug, Clone)]
pub struct QuoteServerProvider {
    id: ProviderId,
    base_url: String,
    client: HttpClient,
}

impl QuoteServerProvider {
    /// Creates a provider against the server at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            id: ProviderId::new(QUOTE_SERVER_PROVIDER),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl ProviderQuery<ExchangeQuote> for QuoteServerProvider {
    fn provider_id(&self) -> &ProviderId {
        &self.id
    }

    async fn query(&self, key: &str, ctx: &QueryContext) -> ProviderResult<ExchangeQuote> {
        let url = format!("{}/cotacao", self.base_url);
        let response: BidResponse = self.client.get(&url, ctx).await?;
        Ok(ExchangeQuote::new(key, parse_bid(&response.bid)?, self.id.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::providers::error::ProviderError;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn decodes_bid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cotacao"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"bid": "5.01"})))
            .mount(&server)
            .await;

        let provider = QuoteServerProvider::new(server.uri(), HttpClient::new(5000).unwrap());
        let ctx = QueryContext::with_timeout(Duration::from_secs(2));
        let quote = provider.query("USD-BRL", &ctx).await.unwrap();
        assert_eq!(quote.bid(), Decimal::from_str("5.01").unwrap());
        assert_eq!(quote.source().as_str(), QUOTE_SERVER_PROVIDER);
    }

    #[tokio::test]
    async fn server_error_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Failed to fetch cotacao"))
            .mount(&server)
            .await;

        let provider = QuoteServerProvider::new(server.uri(), HttpClient::new(5000).unwrap());
        let ctx = QueryContext::with_timeout(Duration::from_secs(2));
        let result = provider.query("USD-BRL", &ctx).await;
        assert!(matches!(result, Err(ProviderError::Status { status: 500, .. })));
    }
}
