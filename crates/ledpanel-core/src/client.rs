//! HTTP client for the LED service REST API.
//!
//! # Example
//!
//! ```no_run
//! use ledpanel_core::{ClientConfig, LedClient, LedService};
//! use ledpanel_types::LedId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = LedClient::new(ClientConfig::new("http://localhost:3000"))?;
//!
//! let history = client.history(LedId::new(1)?).await?;
//! println!("{} events", history.len());
//!
//! client.set_state(LedId::new(1)?, true).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use ledpanel_types::{
    HistoryRecord, LedId, ParseResult, SessionReport, StateSample, TimeTotal,
};

use crate::config::{ClientConfig, HistoryOrder, WriteMethod};
use crate::error::{Error, Result};
use crate::schema;
use crate::traits::LedService;

/// HTTP client for the LED service.
#[derive(Debug, Clone)]
pub struct LedClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim().trim_end_matches('/').to_string();

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(Error::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }

    Ok(base_url)
}

impl LedClient {
    /// Create a client from connection settings.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::invalid_config(format!("cannot build HTTP client: {}", e)))?;
        Self::with_client(config, client)
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(config: ClientConfig, client: Client) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        config.endpoints.validate()?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The connection settings in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn get_json(&self, path: &str, id: Option<LedId>) -> Result<(String, Value)> {
        let url = self.url(path);
        let mut request = self.client.get(&url);
        if let Some(id) = id {
            request = request.query(&[("led_id", id.get())]);
        }
        debug!(%url, led_id = ?id.map(LedId::get), "GET");

        let response = request.send().await.map_err(|e| Error::NotReachable {
            url: url.clone(),
            source: e,
        })?;
        let response = Self::check_status(&url, response).await?;
        let value = response
            .json::<Value>()
            .await
            .map_err(|e| Error::malformed(&url, format!("body is not JSON: {}", e)))?;
        Ok((url, value))
    }

    async fn fetch<T>(
        &self,
        path: &str,
        id: Option<LedId>,
        parse: impl FnOnce(&Value) -> ParseResult<T>,
    ) -> Result<T> {
        let (url, value) = self.get_json(path, id).await?;
        parse(&value).map_err(|e| Error::malformed(url, e.to_string()))
    }

    async fn check_status(url: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| status.to_string());

        Err(Error::Status {
            url: url.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl LedService for LedClient {
    async fn history(&self, id: LedId) -> Result<Vec<HistoryRecord>> {
        let mut records = self
            .fetch(&self.config.endpoints.history, Some(id), schema::parse_history)
            .await?;
        if self.config.history_order == HistoryOrder::OldestFirst {
            records.reverse();
        }
        debug!(led_id = id.get(), count = records.len(), "Fetched history");
        Ok(records)
    }

    async fn latest_record(&self, id: LedId) -> Result<Option<HistoryRecord>> {
        let oldest_first = self.config.history_order == HistoryOrder::OldestFirst;
        self.fetch(&self.config.endpoints.history, Some(id), |value| {
            schema::parse_latest_history(value, oldest_first)
        })
        .await
    }

    async fn set_state(&self, id: LedId, on: bool) -> Result<()> {
        let url = self.url(&self.config.endpoints.write_path(id));
        let body = self.config.state_encoding.body(on);
        let request = match self.config.write_method {
            WriteMethod::Put => self.client.put(&url),
            WriteMethod::Post => self.client.post(&url),
        };
        debug!(%url, led_id = id.get(), on, "Writing LED state");

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::NotReachable {
                url: url.clone(),
                source: e,
            })?;
        Self::check_status(&url, response).await?;
        Ok(())
    }

    async fn time_totals(&self) -> Result<Vec<TimeTotal>> {
        self.fetch(
            &self.config.endpoints.time_totals,
            None,
            schema::parse_time_totals,
        )
        .await
    }

    async fn state_samples(&self, id: LedId) -> Result<Vec<StateSample>> {
        self.fetch(
            &self.config.endpoints.state_line,
            Some(id),
            schema::parse_state_samples,
        )
        .await
    }

    async fn session_reports(&self, id: LedId) -> Result<Vec<SessionReport>> {
        self.fetch(
            &self.config.endpoints.reports,
            Some(id),
            schema::parse_session_reports,
        )
        .await
    }
}
