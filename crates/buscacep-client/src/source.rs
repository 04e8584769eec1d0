//! One upstream source: endpoint template, decoder, and the HTTP client
//! that performs a single bounded-time lookup against it.

use std::error::Error as StdError;
use std::time::Duration;

use buscacep_core::{Decoder, LookupError, LookupOutcome, brasil_api, via_cep};
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::LookupContext;

/// Upper bound on a single source call, applied on top of the caller's
/// own deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

const CEP_PLACEHOLDER: &str = "{cep}";
const USER_AGENT: &str = concat!("buscacep/", env!("CARGO_PKG_VERSION"));

/// Failure to set up the shared HTTP client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Everything that distinguishes one upstream from another.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub name: &'static str,
    /// URL template; `{cep}` is replaced by the postal code.
    pub endpoint: String,
    pub decode: Decoder,
}

impl SourceSpec {
    /// Describe a source by its label, `{cep}` endpoint template and decoder.
    pub fn new(name: &'static str, endpoint: impl Into<String>, decode: Decoder) -> Self {
        Self {
            name,
            endpoint: endpoint.into(),
            decode,
        }
    }

    /// BrasilAPI's production CEP endpoint.
    pub fn brasil_api() -> Self {
        Self::new(
            brasil_api::NAME,
            "https://brasilapi.com.br/api/cep/v1/{cep}",
            brasil_api::decode,
        )
    }

    /// ViaCEP's production endpoint.
    pub fn via_cep() -> Self {
        Self::new(
            via_cep::NAME,
            "https://viacep.com.br/ws/{cep}/json",
            via_cep::decode,
        )
    }

    /// Replace the endpoint template, e.g. to point at a local server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Interpolate `cep` into the endpoint template. The postal code is
    /// passed through untouched.
    pub fn url_for(&self, cep: &str) -> Result<Url, LookupError> {
        if !self.endpoint.contains(CEP_PLACEHOLDER) {
            return Err(LookupError::build(
                self.name,
                format!("endpoint {:?} has no {CEP_PLACEHOLDER} placeholder", self.endpoint),
            ));
        }
        let raw = self.endpoint.replace(CEP_PLACEHOLDER, cep);
        Url::parse(&raw)
            .map_err(|e| LookupError::build(self.name, format!("invalid URL {raw:?}: {e}")))
    }
}

/// The registered sources, in reporting order.
pub fn default_sources() -> Vec<SourceSpec> {
    vec![SourceSpec::brasil_api(), SourceSpec::via_cep()]
}

/// Build the HTTP client shared by every source.
pub(crate) fn http_client() -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
}

/// Performs lookups against one source. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct SourceClient {
    http: reqwest::Client,
    spec: SourceSpec,
    timeout: Duration,
}

impl SourceClient {
    /// Create a client over a shared HTTP client, with [`DEFAULT_TIMEOUT`].
    pub fn new(http: reqwest::Client, spec: SourceSpec) -> Self {
        Self {
            http,
            spec,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a client with its own HTTP connection pool.
    pub fn standalone(spec: SourceSpec) -> Result<Self, ClientError> {
        Ok(Self::new(http_client()?, spec))
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fixed label of this source.
    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Per-call timeout applied on top of the parent context.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Look `cep` up on this source.
    ///
    /// Never outlives the earlier of the parent's deadline and this
    /// client's timeout. Every failure, including deadline expiry and
    /// cancellation of `parent`, comes back as an `Err` outcome.
    pub async fn lookup(&self, cep: &str, parent: &LookupContext) -> LookupOutcome {
        let source = self.spec.name;
        info!(source, cep, "getting CEP information");

        let outcome = self.lookup_within(cep, parent).await;
        match &outcome {
            Ok(address) => info!(
                source,
                cep,
                %address,
                "CEP information retrieved successfully"
            ),
            Err(err) => warn!(
                source,
                cep,
                kind = %err.kind,
                error = %err.detail,
                "getting CEP information failed"
            ),
        }
        outcome
    }

    async fn lookup_within(&self, cep: &str, parent: &LookupContext) -> LookupOutcome {
        let url = self.spec.url_for(cep)?;
        let ctx = parent.with_timeout(self.timeout);
        debug!(
            source = self.spec.name,
            url = %url,
            remaining = ?ctx.remaining(),
            "sending request"
        );

        tokio::select! {
            biased;
            reason = ctx.done() => Err(LookupError::transport(self.spec.name, reason)),
            outcome = self.fetch(url) => outcome,
        }
    }

    async fn fetch(&self, url: Url) -> LookupOutcome {
        let source = self.spec.name;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(source, &e))?;

        // Status is not checked: both upstreams answer unknown CEPs with a
        // JSON body that normalizes to an empty record.
        debug!(source, status = resp.status().as_u16(), "response received");

        let body = resp
            .bytes()
            .await
            .map_err(|e| LookupError::transport(source, describe(&e)))?;
        (self.spec.decode)(&body).map_err(|e| LookupError::decode(source, e))
    }
}

fn request_error(source: &str, err: &reqwest::Error) -> LookupError {
    if err.is_builder() {
        LookupError::build(source, describe(err))
    } else {
        LookupError::transport(source, describe(err))
    }
}

/// Render an error with its full `source()` chain; reqwest's top-level
/// message alone omits the cause.
fn describe(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        out.push_str(": ");
        out.push_str(&e.to_string());
        cause = e.source();
    }
    out
}
