//! # ViaCEP Provider
//!
//! CEP lookup against `GET {base}/ws/{cep}/json/`.
//!
//! ViaCEP answers with Portuguese field names and signals an unknown CEP
//! with a 200 response whose body is `{"erro": true}` (older deployments
//! send the string `"true"`).

use crate::domain::entities::Address;
use crate::domain::value_objects::{Cep, ProviderId};
use crate::infrastructure::providers::context::QueryContext;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::ProviderQuery;
use async_trait::async_trait;
use serde::Deserialize;

/// Public ViaCEP endpoint.
pub const VIA_CEP_BASE_URL: &str = "https://viacep.com.br";

/// Provider name used as the `source` tag.
pub const VIA_CEP_PROVIDER: &str = "ViaCEP";

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        }
    }
}

/// ViaCEP CEP provider.
#[derive(Debug, Clone)]
pub struct ViaCepProvider {
    id: ProviderId,
    base_url: String,
    client: HttpClient,
}

impl ViaCepProvider {
    /// Creates a provider against `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, client: HttpClient) -> Self {
        Self {
            id: ProviderId::new(VIA_CEP_PROVIDER),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, cep: &str) -> String {
        format!("{}/ws/{}/json/", self.base_url, cep)
    }

    fn normalize(&self, key: &str, response: ViaCepResponse) -> ProviderResult<Address> {
        if response.is_error() {
            return Err(ProviderError::not_found(format!("ViaCEP has no entry for {}", key)));
        }
        if response.localidade.is_empty() || response.uf.is_empty() {
            return Err(ProviderError::empty_response("ViaCEP returned no city/state"));
        }
        let cep = Cep::parse(&response.cep)
            .map_err(|e| ProviderError::decode(format!("ViaCEP returned {}", e)))?;

        Ok(Address::new(
            cep,
            response.logradouro,
            response.bairro,
            response.localidade,
            response.uf,
            self.id.clone(),
        ))
    }
}

#[async_trait]
impl ProviderQuery<Address> for ViaCepProvider {
    fn provider_id(&self) -> &ProviderId {
        &self.id
    }

    async fn query(&self, key: &str, ctx: &QueryContext) -> ProviderResult<Address> {
        let response: ViaCepResponse = self.client.get(&self.url(key), ctx).await?;
        self.normalize(key, response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> ViaCepProvider {
        ViaCepProvider::new(server.uri(), HttpClient::new(5000).unwrap())
    }

    fn ctx() -> QueryContext {
        QueryContext::with_timeout(Duration::from_secs(2))
    }

    #[tokio::test]
    async fn decodes_hyphenated_cep() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ws/13010111/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cep": "13010-111",
                "logradouro": "Rua Barão de Jaguara",
                "complemento": "até 1000 - lado par",
                "bairro": "Centro",
                "localidade": "Campinas",
                "uf": "SP",
                "ibge": "3509502"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let address = provider(&server).query("13010111", &ctx()).await.unwrap();
        assert_eq!(address.cep().as_str(), "13010111");
        assert_eq!(address.city(), "Campinas");
        assert_eq!(address.district(), "Centro");
        assert_eq!(address.source().as_str(), VIA_CEP_PROVIDER);
    }

    #[tokio::test]
    async fn erro_flag_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"erro": true}"#))
            .mount(&server)
            .await;

        let result = provider(&server).query("99999999", &ctx()).await;
        assert!(matches!(result, Err(ProviderError::NotFound { .. })));
    }

    #[tokio::test]
    async fn legacy_string_erro_flag_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"erro": "true"}"#))
            .mount(&server)
            .await;

        let result = provider(&server).query("99999999", &ctx()).await;
        assert!(matches!(result, Err(ProviderError::NotFound { .. })));
    }

    #[tokio::test]
    async fn bad_request_is_status_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Http 400"))
            .mount(&server)
            .await;

        let result = provider(&server).query("123", &ctx()).await;
        assert_eq!(result.unwrap_err().status_code(), Some(400));
    }
}
