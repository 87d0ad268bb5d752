//! Workflow Backend Client
//!
//! Submits checkout runs and forwards run-scoped calls to the
//! workflow-automation backend, authenticated by a shared API key header.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

use crate::checkout::types::InterruptRequest;
use crate::config::Config;

/// API key header expected by the workflow backend.
const API_KEY_HEADER: &str = "x-api-key";

/// Session header for run-scoped failure reports.
const SESSION_HEADER: &str = "x-session-id";

/// Errors from outbound workflow backend calls.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to workflow backend failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Response to a run submission: the session identifier the browser uses to
/// open its event stream, and that later webhook events embed.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunSession {
    pub session_id: String,
}

/// Run submission payload: a workflow to execute and its named inputs.
#[derive(Serialize)]
struct RunRequest<'a> {
    workflow_id: &'a str,
    run_input_variables: &'a serde_json::Map<String, Value>,
}

/// Client for the workflow-automation backend.
#[derive(Clone)]
pub struct WorkflowClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl WorkflowClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.workflow_endpoint.trim_end_matches('/').to_owned(),
            api_key: config.workflow_api_key.clone(),
        })
    }

    /// HTTP client shared with other outbound lookups.
    #[must_use]
    pub const fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Submit a workflow run and return its session identifier.
    #[instrument(skip(self, variables))]
    pub async fn submit_run(
        &self,
        workflow_id: &str,
        variables: &serde_json::Map<String, Value>,
    ) -> Result<RunSession, UpstreamError> {
        let session = self
            .http
            .post(format!("{}/run", self.endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&RunRequest {
                workflow_id,
                run_input_variables: variables,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(session)
    }

    /// Report a failed run item back to the backend.
    #[instrument(skip(self, payload))]
    pub async fn report_failure(
        &self,
        session_id: &str,
        payload: &InterruptRequest,
    ) -> Result<Value, UpstreamError> {
        let body = self
            .http
            .post(format!("{}/failed_item", self.endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .header(SESSION_HEADER, session_id)
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body)
    }

    /// Forward user-supplied input to a running session.
    #[instrument(skip(self, user_input))]
    pub async fn relay_user_interaction(
        &self,
        session_id: &str,
        user_input: &Value,
    ) -> Result<Value, UpstreamError> {
        let body = self
            .http
            .post(format!(
                "{}/run/{session_id}/user_interaction",
                self.endpoint
            ))
            .header(API_KEY_HEADER, &self.api_key)
            .json(user_input)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body)
    }
}
