//! Pricing tool client for KICAI.
//!
//! The client wraps the external pricing tool behind a policy layer:
//!
//! - **Demo short-circuit.** In demo mode (forced, or no credential) no
//!   network is touched at all; offers come from [`demo::synthesize`].
//! - **Retry.** A transient failure (transport, timeout) earns exactly one
//!   retry. Protocol and authorization failures do not.
//! - **Degrade, never fail the turn.** When a live fetch ultimately fails,
//!   [`PricingClient::quote`] falls back to demo-tagged synthetic data and
//!   logs the cause. Pricing trouble must never make a chat turn error out.
//! - **Supersession.** Each quote carries a generation number; a newer quote
//!   makes every older in-flight quote stale, so a slow lookup can never
//!   attach its results to a later turn.

pub mod demo;
pub mod select;
pub mod transport;

use kicai_config::AssistantConfig;
use kicai_core::error::PricingError;
use kicai_core::pricing::{Offer, PricingQuery, PricingResult, PricingSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

use transport::{HttpToolTransport, ToolTransport, WirePart};

/// Outcome of one synchronous fetch.
#[derive(Debug)]
pub enum QuoteOutcome {
    /// The live service answered.
    Live(Vec<PricingResult>),
    /// Demo mode: synthesized data, no network touched.
    Demo(Vec<PricingResult>),
    /// The live call failed after retry. [`PricingClient::quote`] converts
    /// this to demo data; it is only visible to direct `fetch` callers such
    /// as diagnostics.
    Failed(PricingError),
}

/// A handle to an in-flight quote.
pub struct QuoteHandle {
    generation: u64,
    rx: oneshot::Receiver<Vec<PricingResult>>,
}

impl QuoteHandle {
    /// The generation this quote was issued under. A handle whose generation
    /// is older than [`PricingClient::current_generation`] is stale and its
    /// results must be discarded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait up to `bound` for the results. `None` on timeout or if the
    /// worker was dropped.
    pub async fn wait(self, bound: Duration) -> Option<Vec<PricingResult>> {
        match tokio::time::timeout(bound, self.rx).await {
            Ok(Ok(results)) => Some(results),
            Ok(Err(_)) | Err(_) => None,
        }
    }
}

/// The fetch policy and its collaborators, detachable into a background task.
#[derive(Clone)]
struct FetchState {
    transport: Option<Arc<dyn ToolTransport>>,
    demo: bool,
    priority: Vec<String>,
}

/// The pricing tool client. Cheap to share via `Arc`; all state is interior.
pub struct PricingClient {
    state: FetchState,
    generation: AtomicU64,
}

impl PricingClient {
    /// Build a client from resolved configuration. In demo mode no transport
    /// is constructed at all.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, PricingError> {
        let demo = config.is_demo();
        let transport: Option<Arc<dyn ToolTransport>> = if demo {
            None
        } else {
            let token = config.api_key.clone().ok_or_else(|| {
                PricingError::Unauthorized("live mode requires a credential".into())
            })?;
            Some(Arc::new(HttpToolTransport::new(
                config.pricing_endpoint.clone(),
                token,
                config.pricing_timeout_secs,
            )?))
        };
        Ok(Self {
            state: FetchState {
                transport,
                demo,
                priority: config.distributor_priority.clone(),
            },
            generation: AtomicU64::new(0),
        })
    }

    /// Replace the transport. Tests substitute stubs here.
    pub fn with_transport(mut self, transport: Arc<dyn ToolTransport>) -> Self {
        self.state.transport = Some(transport);
        self
    }

    /// The newest generation issued so far.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether this client synthesizes data instead of calling the service.
    pub fn is_demo(&self) -> bool {
        self.state.demo
    }

    /// One synchronous fetch, explicit about its outcome.
    pub async fn fetch(&self, queries: &[PricingQuery]) -> QuoteOutcome {
        self.state.fetch(queries).await
    }

    /// Issue a quote in the background, superseding all older quotes.
    ///
    /// The worker converts `Failed` into demo-tagged data, so a handle's
    /// results are always usable; the caller only decides how long to wait
    /// and whether the handle has gone stale.
    pub fn quote(&self, queries: Vec<PricingQuery>) -> QuoteHandle {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (tx, rx) = oneshot::channel();
        let state = self.state.clone();

        tokio::spawn(async move {
            let results = match state.fetch(&queries).await {
                QuoteOutcome::Live(results) | QuoteOutcome::Demo(results) => results,
                QuoteOutcome::Failed(error) => {
                    tracing::warn!(%error, "Pricing lookup failed, degrading to demo data");
                    demo::synthesize(&queries, &state.priority)
                }
            };
            // Receiver may have been dropped (caller moved on); that is fine.
            let _ = tx.send(results);
        });

        QuoteHandle { generation, rx }
    }
}

impl FetchState {
    async fn fetch(&self, queries: &[PricingQuery]) -> QuoteOutcome {
        if queries.is_empty() {
            return QuoteOutcome::Demo(Vec::new());
        }
        if self.demo {
            tracing::debug!(parts = queries.len(), "Synthesizing demo pricing");
            return QuoteOutcome::Demo(demo::synthesize(queries, &self.priority));
        }
        let Some(transport) = self.transport.as_deref() else {
            return QuoteOutcome::Demo(demo::synthesize(queries, &self.priority));
        };

        match call_with_retry(transport, queries).await {
            Ok(parts) => QuoteOutcome::Live(self.assemble(queries, parts)),
            Err(e) => QuoteOutcome::Failed(e),
        }
    }

    /// Pair wire parts back up with their queries, preserving query order.
    /// A query the service did not answer gets an empty live-tagged result.
    fn assemble(&self, queries: &[PricingQuery], parts: Vec<WirePart>) -> Vec<PricingResult> {
        let now = chrono::Utc::now();
        queries
            .iter()
            .map(|query| {
                let offers: Vec<Offer> = parts
                    .iter()
                    .filter(|part| part.reference == query.component_ref)
                    .flat_map(|part| part.offers.iter())
                    .map(|wire| Offer {
                        distributor: wire.distributor.clone(),
                        unit_price: wire.unit_price,
                        currency: wire.currency.clone(),
                        stock_quantity: wire.stock,
                        fetched_at: now,
                    })
                    .collect();
                let best_offer = select::select_best(&offers, &self.priority);
                PricingResult {
                    component_ref: query.component_ref.clone(),
                    offers,
                    best_offer,
                    source: PricingSource::Live,
                }
            })
            .collect()
    }
}

/// One call, plus one retry for transient failures only.
async fn call_with_retry(
    transport: &dyn ToolTransport,
    queries: &[PricingQuery],
) -> Result<Vec<WirePart>, PricingError> {
    match transport.call(queries).await {
        Ok(parts) => Ok(parts),
        Err(error) if error.is_transient() => {
            tracing::warn!(%error, "Transient pricing failure, retrying once");
            transport.call(queries).await
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::transport::WireOffer;
    use std::sync::atomic::AtomicUsize;

    fn demo_config() -> AssistantConfig {
        AssistantConfig::default()
    }

    fn live_config() -> AssistantConfig {
        let mut config = AssistantConfig::default();
        config.set_api_key("nx-test-token");
        config
    }

    fn queries() -> Vec<PricingQuery> {
        vec![PricingQuery {
            component_ref: "R1".into(),
            value: "10k".into(),
            footprint: "R_0603_1608Metric".into(),
        }]
    }

    struct CountingTransport {
        calls: AtomicUsize,
        response: Result<Vec<WirePart>, PricingError>,
    }

    impl CountingTransport {
        fn ok(parts: Vec<WirePart>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                response: Ok(parts),
            })
        }

        fn failing(error: PricingError) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                response: Err(error),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ToolTransport for CountingTransport {
        async fn call(&self, _queries: &[PricingQuery]) -> Result<Vec<WirePart>, PricingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    fn wire_part() -> WirePart {
        WirePart {
            reference: "R1".into(),
            offers: vec![WireOffer {
                distributor: "Mouser".into(),
                unit_price: 0.011,
                currency: "USD".into(),
                stock: 42_000,
            }],
        }
    }

    #[tokio::test]
    async fn demo_mode_never_touches_the_transport() {
        let transport = CountingTransport::ok(vec![wire_part()]);
        let client = PricingClient::from_config(&demo_config())
            .unwrap()
            .with_transport(transport.clone());

        let outcome = client.fetch(&queries()).await;
        let QuoteOutcome::Demo(results) = outcome else {
            panic!("expected demo outcome");
        };
        assert_eq!(results[0].source, PricingSource::Demo);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn live_fetch_assembles_and_tags_live() {
        let transport = CountingTransport::ok(vec![wire_part()]);
        let client = PricingClient::from_config(&live_config())
            .unwrap()
            .with_transport(transport.clone());

        let QuoteOutcome::Live(results) = client.fetch(&queries()).await else {
            panic!("expected live outcome");
        };
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, PricingSource::Live);
        assert_eq!(results[0].best_offer.as_ref().unwrap().distributor, "Mouser");
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn transient_failure_is_retried_exactly_once() {
        let transport = CountingTransport::failing(PricingError::Transport("reset".into()));
        let client = PricingClient::from_config(&live_config())
            .unwrap()
            .with_transport(transport.clone());

        let outcome = client.fetch(&queries()).await;
        assert!(matches!(outcome, QuoteOutcome::Failed(_)));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn unauthorized_failure_is_not_retried() {
        let transport = CountingTransport::failing(PricingError::Unauthorized("expired".into()));
        let client = PricingClient::from_config(&live_config())
            .unwrap()
            .with_transport(transport.clone());

        let outcome = client.fetch(&queries()).await;
        assert!(matches!(outcome, QuoteOutcome::Failed(PricingError::Unauthorized(_))));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn quote_degrades_failure_to_demo_results() {
        let transport = CountingTransport::failing(PricingError::Transport("refused".into()));
        let client = PricingClient::from_config(&live_config())
            .unwrap()
            .with_transport(transport.clone());

        let handle = client.quote(queries());
        let results = handle
            .wait(Duration::from_secs(2))
            .await
            .expect("degraded results");
        assert_eq!(results[0].source, PricingSource::Demo);
        assert!(results[0].best_offer.is_some());
    }

    /// Answers slowly, with a sentinel price, for any batch containing R2;
    /// everything else is answered immediately at a different price.
    struct KeyedTransport;

    #[async_trait]
    impl ToolTransport for KeyedTransport {
        async fn call(&self, queries: &[PricingQuery]) -> Result<Vec<WirePart>, PricingError> {
            let slow = queries.iter().any(|q| q.component_ref == "R2");
            let unit_price = if slow {
                tokio::time::sleep(Duration::from_millis(300)).await;
                99.0
            } else {
                0.01
            };
            Ok(queries
                .iter()
                .map(|q| WirePart {
                    reference: q.component_ref.clone(),
                    offers: vec![WireOffer {
                        distributor: "Mouser".into(),
                        unit_price,
                        currency: "USD".into(),
                        stock: 10_000,
                    }],
                })
                .collect())
        }
    }

    fn query(reference: &str) -> PricingQuery {
        PricingQuery {
            component_ref: reference.into(),
            value: "10k".into(),
            footprint: "R_0603_1608Metric".into(),
        }
    }

    #[tokio::test]
    async fn late_result_from_superseded_quote_is_stale() {
        let client = PricingClient::from_config(&live_config())
            .unwrap()
            .with_transport(Arc::new(KeyedTransport));

        let first = client.quote(vec![query("R1"), query("R2")]);
        let second = client.quote(vec![query("R1"), query("R3")]);
        let first_generation = first.generation();

        // The fresh quote answers immediately with the current price for R1.
        let fresh = second.wait(Duration::from_secs(2)).await.unwrap();
        assert_eq!(fresh[0].component_ref, "R1");
        assert_eq!(fresh[0].offers[0].unit_price, 0.01);

        // The slow first lookup still completes, carrying the outdated
        // sentinel price, but its generation marks it stale so no caller may
        // attach it over the fresh result.
        assert!(first_generation < client.current_generation());
        let late = first.wait(Duration::from_secs(2)).await.unwrap();
        assert_eq!(late[0].offers[0].unit_price, 99.0);
    }

    #[tokio::test]
    async fn newer_quote_supersedes_older_one() {
        let client = PricingClient::from_config(&demo_config()).unwrap();

        let first = client.quote(queries());
        let second = client.quote(queries());

        assert!(first.generation() < second.generation());
        assert!(first.generation() < client.current_generation());
        assert_eq!(second.generation(), client.current_generation());

        let results = second.wait(Duration::from_secs(2)).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn empty_query_batch_short_circuits() {
        let client = PricingClient::from_config(&demo_config()).unwrap();
        let QuoteOutcome::Demo(results) = client.fetch(&[]).await else {
            panic!("expected demo outcome");
        };
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn unanswered_query_gets_empty_live_result() {
        let transport = CountingTransport::ok(vec![]);
        let client = PricingClient::from_config(&live_config())
            .unwrap()
            .with_transport(transport);

        let QuoteOutcome::Live(results) = client.fetch(&queries()).await else {
            panic!("expected live outcome");
        };
        assert!(results[0].offers.is_empty());
        assert!(results[0].best_offer.is_none());
    }
}
