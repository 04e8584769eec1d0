//! Fan a postal code out to every registered source and join the results.

use std::time::Duration;

use buscacep_core::{LookupError, LookupOutcome};
use futures::future::join_all;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info};

use crate::source::http_client;
use crate::{ClientError, LookupContext, SourceClient, SourceSpec, default_sources};

/// Runs every registered source concurrently and reports one outcome per
/// source, in registration order.
#[derive(Debug, Clone)]
pub struct Coordinator {
    clients: Vec<SourceClient>,
}

impl Coordinator {
    /// Register `clients` in reporting order.
    pub fn new(clients: impl IntoIterator<Item = SourceClient>) -> Self {
        Self {
            clients: clients.into_iter().collect(),
        }
    }

    /// Build a coordinator whose sources share one HTTP connection pool.
    pub fn with_sources(specs: impl IntoIterator<Item = SourceSpec>) -> Result<Self, ClientError> {
        let http = http_client()?;
        Ok(Self::new(
            specs
                .into_iter()
                .map(|spec| SourceClient::new(http.clone(), spec)),
        ))
    }

    /// BrasilAPI then ViaCEP, over one shared HTTP client.
    pub fn with_default_sources() -> Result<Self, ClientError> {
        Self::with_sources(default_sources())
    }

    /// Override the per-call timeout of every source.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.clients = self
            .clients
            .into_iter()
            .map(|c| c.with_timeout(timeout))
            .collect();
        self
    }

    /// Source labels in registration order.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.clients.iter().map(SourceClient::name).collect()
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Look `cep` up on every source at once and wait for all of them.
    ///
    /// Each source runs as its own task and settles independently: a slow
    /// or failing source never cancels or delays the others. The returned
    /// vector holds exactly one outcome per source, indexed like
    /// [`Coordinator::source_names`]. Canceling `ctx` settles every
    /// in-flight call as a transport failure.
    pub async fn lookup(&self, cep: &str, ctx: &LookupContext) -> Vec<LookupOutcome> {
        info!(cep, sources = self.clients.len(), "looking up CEP");

        // Slot i belongs to source i; join order is registration order, not
        // completion order.
        let slots: Vec<JoinHandle<LookupOutcome>> = self
            .clients
            .iter()
            .map(|client| {
                let client = client.clone();
                let cep = cep.to_owned();
                let ctx = ctx.clone();
                tokio::spawn(async move { client.lookup(&cep, &ctx).await })
            })
            .collect();
        let _abort = AbortOnDrop(slots.iter().map(JoinHandle::abort_handle).collect());

        let settled: Vec<LookupOutcome> = join_all(slots)
            .await
            .into_iter()
            .zip(&self.clients)
            .map(|(joined, client)| {
                joined.unwrap_or_else(|e| {
                    Err(LookupError::transport(
                        client.name(),
                        format!("lookup task failed: {e}"),
                    ))
                })
            })
            .collect();

        let succeeded = settled.iter().filter(|o| o.is_ok()).count();
        debug!(
            cep,
            succeeded,
            failed = settled.len() - succeeded,
            "all sources settled"
        );
        settled
    }
}

/// Aborts the source tasks if the caller stops waiting on the join.
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}
