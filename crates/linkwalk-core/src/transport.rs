//! Query submission to the remote endpoint.
//!
//! The endpoint evaluates a query for a bounded time quantum and answers
//! with a page of solutions, a page of control signals, and an optional
//! `next` token to resume a preempted evaluation. `execute` follows the
//! `next` tokens until the evaluation completes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::results::Solution;
use crate::signal::ControlSignal;
use crate::task::ExpandTask;

/// Everything one task produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOutcome {
    pub solutions: Vec<Solution>,
    pub signals: Vec<ControlSignal>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Push execution parameters to the endpoint before the first query.
    async fn configure(&self, quantum: u64, max_depth: u32) -> Result<(), TransportError>;

    /// Evaluate `task.query` against `graph` to completion.
    async fn execute(&self, task: &ExpandTask, graph: &str)
        -> Result<TransportOutcome, TransportError>;
}

// ============================================================================
// HTTP transport
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    query: &'a str,
    default_graph: &'a str,
    next: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigRequest {
    quantum: u64,
    max_depth: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryPage {
    #[serde(default)]
    bindings: Vec<Solution>,
    #[serde(default)]
    controls: Vec<ControlSignal>,
    #[serde(default)]
    next: Option<String>,
}

pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, TransportError> {
        let url = format!("{}{}", self.endpoint, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Http { status, body });
        }
        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn configure(&self, quantum: u64, max_depth: u32) -> Result<(), TransportError> {
        self.post(
            "/backdoor/overwrite-config",
            &ConfigRequest { quantum, max_depth },
        )
        .await?;
        Ok(())
    }

    async fn execute(
        &self,
        task: &ExpandTask,
        graph: &str,
    ) -> Result<TransportOutcome, TransportError> {
        let mut outcome = TransportOutcome::default();
        let mut next: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let request = QueryRequest {
                query: &task.query,
                default_graph: graph,
                next: next.as_deref(),
            };
            let page: QueryPage = self
                .post("/sparql", &request)
                .await?
                .json()
                .await
                .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

            pages += 1;
            outcome.solutions.extend(page.bindings);
            outcome.signals.extend(page.controls);

            match page.next {
                Some(token) if !token.is_empty() => next = Some(token),
                _ => break,
            }
        }

        debug!(
            task = %task.id,
            pages,
            solutions = outcome.solutions.len(),
            signals = outcome.signals.len(),
            "query evaluation complete"
        );
        Ok(outcome)
    }
}
