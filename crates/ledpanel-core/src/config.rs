//! Connection settings for [`LedClient`](crate::LedClient).
//!
//! Endpoint paths, write method and body encoding vary between deployments
//! of the LED service, so they are carried here instead of being hard-coded
//! in the client.

use std::time::Duration;

use ledpanel_types::LedId;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default base URL of the LED service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Placeholder replaced by the LED id in endpoint paths.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Endpoint paths relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// History log, queried with `?led_id={id}`.
    pub history: String,
    /// State write; `{id}` is replaced with the LED id.
    pub write: String,
    /// Per-session reports, queried with `?led_id={id}`.
    pub reports: String,
    /// On/off hour totals for every LED.
    pub time_totals: String,
    /// Binary state samples, queried with `?led_id={id}`.
    pub state_line: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            history: "/historial".to_string(),
            write: "/led/{id}".to_string(),
            reports: "/reportes".to_string(),
            time_totals: "/estadisticas/tiempos".to_string(),
            state_line: "/estadisticas/linea".to_string(),
        }
    }
}

impl Endpoints {
    /// Write path for one LED.
    pub fn write_path(&self, id: LedId) -> String {
        if self.write.contains(ID_PLACEHOLDER) {
            self.write.replace(ID_PLACEHOLDER, &id.to_string())
        } else {
            format!("{}/{}", self.write.trim_end_matches('/'), id)
        }
    }

    fn all(&self) -> [(&'static str, &str); 5] {
        [
            ("history", &self.history),
            ("write", &self.write),
            ("reports", &self.reports),
            ("time_totals", &self.time_totals),
            ("state_line", &self.state_line),
        ]
    }

    /// Check that every path is absolute.
    pub fn validate(&self) -> Result<()> {
        for (name, path) in self.all() {
            if !path.starts_with('/') {
                return Err(Error::invalid_config(format!(
                    "endpoint '{}' must start with '/', got: {}",
                    name, path
                )));
            }
        }
        Ok(())
    }
}

/// HTTP method used for state writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMethod {
    /// `PUT /led/{id}`.
    #[default]
    Put,
    /// `POST /led/{id}`.
    Post,
}

/// Encoding of the `estado` field in write bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateEncoding {
    /// `{"estado": true}`.
    #[default]
    Bool,
    /// `{"estado": 1}`.
    Int,
}

impl StateEncoding {
    /// Encode a target state as a write body.
    pub fn body(self, on: bool) -> serde_json::Value {
        match self {
            Self::Bool => serde_json::json!({ "estado": on }),
            Self::Int => serde_json::json!({ "estado": u8::from(on) }),
        }
    }
}

/// Order in which the service returns history records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryOrder {
    /// Most recent record first.
    #[default]
    NewestFirst,
    /// Oldest record first; the client reverses it.
    OldestFirst,
}

/// Settings for [`LedClient`](crate::LedClient).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL, `http://` or `https://`.
    pub base_url: String,
    /// Endpoint paths.
    pub endpoints: Endpoints,
    /// Method for state writes.
    pub write_method: WriteMethod,
    /// Body encoding for state writes.
    pub state_encoding: StateEncoding,
    /// Order of history payloads.
    pub history_order: HistoryOrder,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    /// Settings with default endpoints for a base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoints: Endpoints::default(),
            write_method: WriteMethod::default(),
            state_encoding: StateEncoding::default(),
            history_order: HistoryOrder::default(),
            timeout: None,
        }
    }

    /// Replace the endpoint paths.
    #[must_use]
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the write method.
    #[must_use]
    pub fn write_method(mut self, method: WriteMethod) -> Self {
        self.write_method = method;
        self
    }

    /// Set the write body encoding.
    #[must_use]
    pub fn state_encoding(mut self, encoding: StateEncoding) -> Self {
        self.state_encoding = encoding;
        self
    }

    /// Set the history order of the service.
    #[must_use]
    pub fn history_order(mut self, order: HistoryOrder) -> Self {
        self.history_order = order;
        self
    }

    /// Set a per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
