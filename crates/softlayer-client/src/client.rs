//! SoftLayer REST client
//!
//! Basic-auth HTTP transport for the SoftLayer REST endpoint. Object masks and
//! filters travel as the `objectMask` / `objectFilter` query parameters.

use crate::error::Result;
use crate::services::{
    DatacenterService, DnsRecordService, LoadBalancerService, ProductService,
    ProvisioningHookService, ScaleGroupService, ScalePolicyService,
};
use async_trait::async_trait;
use softlayer_config::{Credentials, PollSettings, SoftLayerConfig};
use softlayer_core::{
    ApiRequest, LookupKey, Method, PollConfig, RawResponse, ResourceKind, SoftLayerError,
    Transport,
};
use std::time::Duration;

/// Retry policy for server errors on read requests
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first one included
    pub max_attempts: u32,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Delay before retry number `attempt` (0-based), capped at `max_delay`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt as i32);
        self.initial_delay.mul_f64(factor).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

/// SoftLayer API client
pub struct SoftLayerClient {
    http: reqwest::Client,
    credentials: Credentials,
    retry: Option<RetryConfig>,
    poll: PollConfig,
}

impl SoftLayerClient {
    /// Create a client without retries, using the default poll timing
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            retry: None,
            poll: PollConfig::default(),
        }
    }

    /// Create a client from resolved settings
    pub fn from_config(config: SoftLayerConfig) -> Result<Self> {
        let poll = poll_config(&config.poll)?;
        Ok(Self::new(config.credentials).with_poll_config(poll))
    }

    /// Create a client from the environment / credentials file
    pub fn from_env() -> Result<Self> {
        Self::from_config(SoftLayerConfig::load()?)
    }

    /// Retry 5xx answers to GET requests with exponential backoff
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Poll timing configured for this client
    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    pub fn endpoint(&self) -> &str {
        &self.credentials.endpoint
    }

    /// Absolute URL of a service-relative path
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.credentials.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Translate a name into an id or an id into a name
    pub async fn resolve(&self, kind: &ResourceKind, key: &LookupKey) -> Result<LookupKey> {
        Ok(softlayer_core::resolve(self, kind, key).await?)
    }

    pub fn datacenters(&self) -> DatacenterService<'_, Self> {
        DatacenterService::new(self)
    }

    pub fn products(&self) -> ProductService<'_, Self> {
        ProductService::new(self)
    }

    pub fn load_balancers(&self) -> LoadBalancerService<'_, Self> {
        LoadBalancerService::new(self)
    }

    pub fn scale_groups(&self) -> ScaleGroupService<'_, Self> {
        ScaleGroupService::new(self)
    }

    pub fn scale_policies(&self) -> ScalePolicyService<'_, Self> {
        ScalePolicyService::new(self)
    }

    pub fn dns_records(&self) -> DnsRecordService<'_, Self> {
        DnsRecordService::new(self)
    }

    pub fn provisioning_hooks(&self) -> ProvisioningHookService<'_, Self> {
        ProvisioningHookService::new(self)
    }

    async fn send_once(&self, request: &ApiRequest) -> reqwest::Result<RawResponse> {
        let url = self.url_for(&request.path);

        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        }
        .basic_auth(&self.credentials.username, Some(&self.credentials.api_key));

        let mut query = Vec::new();
        if let Some(mask) = request.mask.as_ref().filter(|m| !m.is_empty()) {
            query.push(("objectMask", mask.to_query_value()));
        }
        if let Some(filter) = &request.filter {
            query.push(("objectFilter", filter.to_query_value()));
        }
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl Transport for SoftLayerClient {
    async fn send(&self, request: ApiRequest) -> softlayer_core::Result<RawResponse> {
        let max_attempts = match (&self.retry, request.method) {
            (Some(retry), Method::Get) => retry.max_attempts.max(1),
            _ => 1,
        };

        let mut attempt = 0;
        loop {
            let response = self.send_once(&request).await.map_err(|e| {
                SoftLayerError::Transport {
                    resource: request.resource().to_string(),
                    message: e.to_string(),
                }
            })?;

            attempt += 1;
            let retryable = (500..=599).contains(&response.status);
            if !retryable || attempt >= max_attempts {
                return Ok(response);
            }

            if let Some(retry) = &self.retry {
                let delay = retry.delay_for_attempt(attempt - 1);
                tracing::warn!(
                    "{} answered HTTP {}, retrying in {:?} ({}/{})",
                    request.path,
                    response.status,
                    delay,
                    attempt,
                    max_attempts
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Poll timing from configured overrides, falling back to the defaults
pub fn poll_config(settings: &PollSettings) -> softlayer_core::Result<PollConfig> {
    let timeout = settings
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(PollConfig::DEFAULT_TIMEOUT);
    let interval = settings
        .interval_secs
        .map(Duration::from_secs)
        .unwrap_or(PollConfig::DEFAULT_INTERVAL);
    let initial_delay = settings
        .initial_delay_secs
        .map(Duration::from_secs)
        .unwrap_or(PollConfig::DEFAULT_INITIAL_DELAY);

    Ok(PollConfig::new(timeout, interval)?.with_initial_delay(initial_delay))
}
