/// Single-shot HTTP execution of an endpoint descriptor.
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;

use crate::auth::AuthToken;
use crate::config::ApiConfig;
use crate::endpoint::EndpointDescriptor;
use crate::errors::UpbitError;

/// What came back from the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOutcome {
    /// No usable HTTP response: DNS, connect, TLS, timeout or body read failed.
    Transport(UpbitError),
    /// A complete response, body fully read.
    Response { status: u16, body: Vec<u8> },
}

impl RawOutcome {
    pub fn status(&self) -> Option<u16> {
        match self {
            RawOutcome::Response { status, .. } => Some(*status),
            RawOutcome::Transport(_) => None,
        }
    }
}

/// Performs exactly one HTTP round trip per call. No retries.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: Client,
}

impl RequestExecutor {
    pub fn new(config: &ApiConfig) -> Result<Self, UpbitError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let client = builder
            .build()
            .map_err(|e| UpbitError::Config(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest::Client` (shared pools, custom TLS).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Send the request described by `descriptor`.
    ///
    /// `authorization` is used verbatim as the `Authorization` header.
    pub async fn execute(
        &self,
        descriptor: &EndpointDescriptor,
        authorization: Option<&AuthToken>,
    ) -> RawOutcome {
        let url = descriptor.url();
        debug!(
            "executor.execute method={} url={} authorized={}",
            descriptor.method.as_str(),
            url,
            authorization.is_some()
        );

        let mut request = self
            .client
            .request(descriptor.method.into(), &url)
            .header(ACCEPT, "application/json");
        if let Some(token) = authorization {
            request = request.header(AUTHORIZATION, token.as_str());
        }

        let response = match request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!("executor.execute transport_failed url={} error={}", url, e);
                return RawOutcome::Transport(e.into());
            }
        };

        let status = response.status().as_u16();
        // `bytes()` consumes the response; the connection is released on both arms.
        match response.bytes().await {
            Ok(body) => {
                debug!(
                    "executor.execute status={} body_len={}",
                    status,
                    body.len()
                );
                RawOutcome::Response {
                    status,
                    body: body.to_vec(),
                }
            }
            Err(e) => {
                debug!("executor.execute body_read_failed status={} error={}", status, e);
                RawOutcome::Transport(e.into())
            }
        }
    }
}
