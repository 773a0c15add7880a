//! HTTP client for the v1 dashboard endpoints.

use std::time::Duration;

use async_trait::async_trait;
use dashform_model::{BoardPayload, Dashboard};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::BoardApi;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

const API_KEY_HEADER: &str = "DD-API-KEY";
const APP_KEY_HEADER: &str = "DD-APPLICATION-KEY";

/// Boards API client backed by `reqwest`.
///
/// Requests are sent once. Retrying is left to the caller.
pub struct DatadogClient {
    client: Client,
    dashboards_url: String,
    api_key: SecretString,
    app_key: SecretString,
}

impl std::fmt::Debug for DatadogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatadogClient")
            .field("dashboards_url", &self.dashboards_url)
            .finish_non_exhaustive()
    }
}

/// Error body returned by the API.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

impl DatadogClient {
    /// Builds a client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the TLS backend cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let dashboards_url = config.dashboards_url();
        let client = Client::builder()
            .user_agent(concat!("dashform/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            dashboards_url,
            api_key: config.api_key,
            app_key: config.app_key,
        })
    }

    /// Builds a client from `DD_*` / `DATADOG_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when credentials are missing.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    fn board_url(&self, id: &str) -> String {
        format!("{}/{id}", self.dashboards_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .header(APP_KEY_HEADER, self.app_key.expose_secret())
    }

    async fn send(&self, request: RequestBuilder, id: Option<&str>) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND
            && let Some(id) = id
        {
            return Err(ApiError::NotFound { id: id.to_string() });
        }

        let body = match response.bytes().await {
            Ok(body) => body.to_vec(),
            Err(err) => {
                debug!(status = status.as_u16(), error = %err, "Failed to read error body");
                Vec::new()
            }
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }

    async fn read_board(response: Response) -> Result<Dashboard> {
        let bytes = response.bytes().await?;
        let payload = BoardPayload::from_slice(&bytes)?;
        Ok(Dashboard::try_from(payload)?)
    }
}

/// Joins the `errors` array of an error body, falling back to the raw text.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body)
        && !parsed.errors.is_empty()
    {
        return parsed.errors.join("; ");
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        text.to_string()
    }
}

#[async_trait]
impl BoardApi for DatadogClient {
    #[instrument(name = "create_board", skip_all, fields(title = %dashboard.title))]
    async fn create_board(&self, dashboard: &Dashboard) -> Result<Dashboard> {
        let payload = BoardPayload::try_from(dashboard)?;
        debug!(url = %self.dashboards_url, widgets = payload.widgets.len(), "Creating dashboard");

        let request = self.client.post(&self.dashboards_url).json(&payload);
        let response = self.send(request, None).await?;
        let created = Self::read_board(response).await?;
        debug!(id = ?created.id, "Dashboard created");
        Ok(created)
    }

    #[instrument(name = "update_board", skip_all, fields(id = ?dashboard.id))]
    async fn update_board(&self, dashboard: &Dashboard) -> Result<()> {
        let id = dashboard.id.as_deref().ok_or(ApiError::MissingId)?;
        let payload = BoardPayload::try_from(dashboard)?;
        let url = self.board_url(id);
        debug!(%url, "Updating dashboard");

        let request = self.client.put(&url).json(&payload);
        self.send(request, Some(id)).await?;
        Ok(())
    }

    #[instrument(name = "get_board", skip(self))]
    async fn get_board(&self, id: &str) -> Result<Dashboard> {
        let url = self.board_url(id);
        debug!(%url, "Fetching dashboard");

        let response = self.send(self.client.get(&url), Some(id)).await?;
        Self::read_board(response).await
    }

    #[instrument(name = "delete_board", skip(self))]
    async fn delete_board(&self, id: &str) -> Result<()> {
        let url = self.board_url(id);
        debug!(%url, "Deleting dashboard");

        self.send(self.client.delete(&url), Some(id)).await?;
        Ok(())
    }

    fn api_name(&self) -> &'static str {
        "datadog"
    }
}
