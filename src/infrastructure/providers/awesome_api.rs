//! # AwesomeAPI Provider
//!
//! Exchange quotes from `GET {base}/json/last/{pair}`.
//!
//! The response is keyed by the pair with the hyphen removed:
//!
//! ```text
//! {"USDBRL":{"code":"USD","codein":"BRL","bid":"5.1234","ask":"5.1244", ...}}
//! ```

use crate::domain::entities::ExchangeQuote;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::context::QueryContext;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::ProviderQuery;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Public AwesomeAPI endpoint.
pub const AWESOME_API_BASE_URL: &str = "https://economia.awesomeapi.com.br";

/// Provider name used as the `source` tag.
pub const AWESOME_API_PROVIDER: &str = "AwesomeAPI";

#[derive(Debug, Deserialize)]
struct PairQuote {
    #[serde(default)]
    bid: String,
}

/// AwesomeAPI exchange-quote provider. The query key is a pair such as
/// `USD-BRL`.
#[derive(Debug, Clone)]
pub struct AwesomeApiProvider {
    id: ProviderId,
    base_url: String,
    client: HttpClient,
}

impl AwesomeApiProvider {
    /// Creates a provider against `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            id: ProviderId::new(AWESOME_API_PROVIDER),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, pair: &str) -> String {
        format!("{}/json/last/{}", self.base_url, pair)
    }
}

/// Parses a decimal bid, rejecting blanks and non-positive values.
pub(crate) fn parse_bid(raw: &str) -> ProviderResult<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ProviderError::empty_response("quote has no bid"));
    }
    let bid = Decimal::from_str(raw)
        .map_err(|e| ProviderError::decode(format!("invalid bid '{}': {}", raw, e)))?;
    if bid <= Decimal::ZERO {
        return Err(ProviderError::decode(format!("non-positive bid {}", bid)));
    }
    Ok(bid)
}

#[async_trait]
impl ProviderQuery<ExchangeQuote> for AwesomeApiProvider {
    fn provider_id(&self) -> &ProviderId {
        &self.id
    }

    async fn query(&self, key: &str, ctx: &QueryContext) -> ProviderResult<ExchangeQuote> {
        let mut response: HashMap<String, PairQuote> = self.client.get(&self.url(key), ctx).await?;
        let field = key.replace('-', "");
        let quote = response
            .remove(&field)
            .ok_or_else(|| ProviderError::empty_response(format!("no {} entry in response", field)))?;

        Ok(ExchangeQuote::new(key, parse_bid(&quote.bid)?, self.id.clone()))
    }
}
