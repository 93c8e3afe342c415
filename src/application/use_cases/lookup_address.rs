//! # Lookup Address Use Case
//!
//! Resolves a CEP by racing every configured address provider.
//!
//! The input is validated before any provider is contacted; the first
//! provider to answer successfully within the race deadline wins.

use crate::application::error::ApplicationResult;
use crate::application::services::{RaceConfig, RaceResolver, RaceWinner};
use crate::domain::entities::Address;
use crate::domain::value_objects::Cep;
use crate::infrastructure::config::CepConfig;
use crate::infrastructure::providers::{
    BrasilApiProvider, HttpClient, ProviderQuery, ViaCepProvider,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Use case for resolving a CEP into an [`Address`].
#[derive(Debug, Clone)]
pub struct LookupAddressUseCase {
    resolver: RaceResolver<Address>,
}

impl LookupAddressUseCase {
    /// Creates the use case over an existing resolver.
    #[must_use]
    pub fn new(resolver: RaceResolver<Address>) -> Self {
        Self { resolver }
    }

    /// Creates the use case racing BrasilAPI against ViaCEP.
    #[must_use]
    pub fn from_config(config: &CepConfig, client: HttpClient) -> Self {
        let providers: Vec<Arc<dyn ProviderQuery<Address>>> = vec![
            Arc::new(BrasilApiProvider::new(&config.brasil_api_url, client.clone())),
            Arc::new(ViaCepProvider::new(&config.via_cep_url, client)),
        ];
        Self::new(RaceResolver::new(
            providers,
            RaceConfig::with_timeout(config.timeout_ms),
        ))
    }

    /// Returns the underlying resolver.
    #[must_use]
    pub fn resolver(&self) -> &RaceResolver<Address> {
        &self.resolver
    }

    /// Looks up `input`, which may be `01001000` or `01001-000`.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Validation` if `input` is not a CEP
    /// - `ApplicationError::NoAnswer` if no provider answered in time
    pub async fn execute(&self, input: &str) -> ApplicationResult<RaceWinner<Address>> {
        self.execute_with_cancellation(input, &CancellationToken::new())
            .await
    }

    /// Like [`execute`](Self::execute), abandoning the race when `cancel`
    /// fires.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute); additionally
    /// `ApplicationError::Race` if `cancel` fires first.
    #[instrument(skip(self, cancel), fields(cep = %input))]
    pub async fn execute_with_cancellation(
        &self,
        input: &str,
        cancel: &CancellationToken,
    ) -> ApplicationResult<RaceWinner<Address>> {
        let cep = Cep::parse(input).inspect_err(|e| warn!(error = %e, "Rejected CEP"))?;

        let winner = self
            .resolver
            .resolve_with_cancellation(cep.as_str(), cancel)
            .await?;

        info!(
            provider = %winner.provider(),
            elapsed_ms = winner.elapsed().as_millis() as u64,
            city = winner.value().city(),
            "Address resolved"
        );
        Ok(winner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;
    use crate::domain::value_objects::ProviderId;
    use crate::infrastructure::providers::{ProviderError, ProviderResult, QueryContext};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Debug)]
    struct FixedProvider {
        id: ProviderId,
        delay: Duration,
        city: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedProvider {
        fn new(id: &str, delay_ms: u64, city: Option<&'static str>) -> Self {
            Self {
                id: ProviderId::new(id),
                delay: Duration::from_millis(delay_ms),
                city,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl ProviderQuery<Address> for FixedProvider {
        fn provider_id(&self) -> &ProviderId {
            &self.id
        }

        async fn query(&self, key: &str, _ctx: &QueryContext) -> ProviderResult<Address> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            match self.city {
                Some(city) => Ok(Address::new(
                    Cep::parse(key).unwrap(),
                    "Praça da Sé",
                    "Sé",
                    city,
                    "SP",
                    self.id.clone(),
                )),
                None => Err(ProviderError::not_found("CEP not found")),
            }
        }
    }

    fn use_case(list: Vec<FixedProvider>, timeout_ms: u64) -> LookupAddressUseCase {
        let providers = list
            .into_iter()
            .map(|p| Arc::new(p) as Arc<dyn ProviderQuery<Address>>)
            .collect();
        LookupAddressUseCase::new(RaceResolver::new(
            providers,
            RaceConfig::with_timeout(timeout_ms),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn faster_provider_wins() {
        let use_case = use_case(
            vec![
                FixedProvider::new("A", 50, Some("São Paulo")),
                FixedProvider::new("B", 200, Some("Campinas")),
            ],
            1000,
        );

        let started = Instant::now();
        let winner = use_case.execute("01001-000").await.unwrap();

        assert_eq!(winner.value().city(), "São Paulo");
        assert_eq!(winner.provider().as_str(), "A");
        assert_eq!(winner.value().cep().as_str(), "01001000");
        assert!(started.elapsed() < Duration::from_millis(60));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_cep_never_queries_providers() {
        let provider = FixedProvider::new("A", 0, Some("São Paulo"));
        let calls = Arc::clone(&provider.calls);
        let use_case = use_case(vec![provider], 1000);

        let err = use_case.execute("0100-100").await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_cep_is_no_answer() {
        let use_case = use_case(
            vec![
                FixedProvider::new("A", 10, None),
                FixedProvider::new("B", 20, None),
            ],
            1000,
        );

        let err = use_case.execute("99999999").await.unwrap_err();
        assert!(matches!(err, ApplicationError::NoAnswer { failed: 2, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_providers_time_out() {
        let use_case = use_case(vec![FixedProvider::new("A", 5000, Some("Santos"))], 1000);

        let err = use_case.execute("11010000").await.unwrap_err();
        assert!(err.is_no_answer());
        assert!(err.is_timeout());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_ends_lookup() {
        let use_case = use_case(vec![FixedProvider::new("A", 5000, Some("Santos"))], 1000);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = use_case
            .execute_with_cancellation("11010000", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Race(_)));
    }

    #[test]
    fn from_config_races_both_providers() {
        let use_case =
            LookupAddressUseCase::from_config(&CepConfig::default(), HttpClient::new(5000).unwrap());
        let ids: Vec<String> = use_case
            .resolver()
            .provider_ids()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["BrasilAPI", "ViaCEP"]);
        assert_eq!(use_case.resolver().config().timeout(), Duration::from_millis(1000));
    }
}
