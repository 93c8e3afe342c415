//! # BrasilAPI Provider
//!
//! CEP lookup against `GET {base}/api/cep/v1/{cep}`.
//!
//! BrasilAPI answers with English field names:
//!
//! ```text
//! {"cep":"01001000","state":"SP","city":"São Paulo",
//!  "neighborhood":"Sé","street":"Praça da Sé","service":"viacep"}
//! ```

use crate::domain::entities::Address;
use crate::domain::value_objects::{Cep, ProviderId};
use crate::infrastructure::providers::context::QueryContext;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::ProviderQuery;
use async_trait::async_trait;
use serde::Deserialize;

/// Public BrasilAPI endpoint.
pub const BRASIL_API_BASE_URL: &str = "https://brasilapi.com.br";

/// Provider name used as the `source` tag.
pub const BRASIL_API_PROVIDER: &str = "BrasilAPI";

#[derive(Debug, Deserialize)]
struct BrasilApiResponse {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    neighborhood: Option<String>,
    #[serde(default)]
    street: Option<String>,
}

/// BrasilAPI CEP provider.
#[derive(Debug, Clone)]
pub struct BrasilApiProvider {
    id: ProviderId,
    base_url: String,
    client: HttpClient,
}

impl BrasilApiProvider {
    /// Creates a provider against `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            id: ProviderId::new(BRASIL_API_PROVIDER),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, cep: &str) -> String {
        format!("{}/api/cep/v1/{}", self.base_url, cep)
    }

    fn normalize(&self, response: BrasilApiResponse) -> ProviderResult<Address> {
        if response.city.is_empty() || response.state.is_empty() {
            return Err(ProviderError::empty_response("BrasilAPI returned no city/state"));
        }
        let cep = Cep::parse(&response.cep)
            .map_err(|e| ProviderError::decode(format!("BrasilAPI returned {}", e)))?;

        Ok(Address::new(
            cep,
            response.street.unwrap_or_default(),
            response.neighborhood.unwrap_or_default(),
            response.city,
            response.state,
            self.id.clone(),
        ))
    }
}

#[async_trait]
impl ProviderQuery<Address> for BrasilApiProvider {
    fn provider_id(&self) -> &ProviderId {
        &self.id
    }

    async fn query(&self, key: &str, ctx: &QueryContext) -> ProviderResult<Address> {
        let response: BrasilApiResponse = self.client.get(&self.url(key), ctx).await?;
        self.normalize(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> BrasilApiProvider {
        BrasilApiProvider::new(format!("{}/", server.uri()), HttpClient::new(5000).unwrap())
    }

    fn ctx() -> QueryContext {
        QueryContext::with_timeout(Duration::from_secs(2))
    }

    #[tokio::test]
    async fn decodes_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cep/v1/01001000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cep": "01001000",
                "state": "SP",
                "city": "São Paulo",
                "neighborhood": "Sé",
                "street": "Praça da Sé",
                "service": "viacep"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let address = provider(&server).query("01001000", &ctx()).await.unwrap();
        assert_eq!(address.city(), "São Paulo");
        assert_eq!(address.street(), "Praça da Sé");
        assert_eq!(address.district(), "Sé");
        assert_eq!(address.state(), "SP");
        assert_eq!(address.source().as_str(), BRASIL_API_PROVIDER);
    }

    #[tokio::test]
    async fn city_wide_cep_has_empty_street() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cep": "69945000",
                "state": "AC",
                "city": "Acrelândia",
                "neighborhood": null,
                "street": null
            })))
            .mount(&server)
            .await;

        let address = provider(&server).query("69945000", &ctx()).await.unwrap();
        assert_eq!(address.street(), "");
        assert_eq!(address.district(), "");
    }

    #[tokio::test]
    async fn unknown_cep_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "name": "CepPromiseError",
                "message": "Todos os serviços de CEP retornaram erro."
            })))
            .mount(&server)
            .await;

        let result = provider(&server).query("99999999", &ctx()).await;
        assert!(matches!(result, Err(ProviderError::NotFound { .. })));
    }

    #[tokio::test]
    async fn empty_object_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let result = provider(&server).query("01001000", &ctx()).await;
        assert!(matches!(result, Err(ProviderError::EmptyResponse { .. })));
    }
}
