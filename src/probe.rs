//! Backend connectivity probe.

use records::{Article, Resource};
use serde_json::Value;
use tracing::{info, warn};

use crate::http::HttpClient;

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeReport {
    /// The article list answered; `records` is its length.
    Reachable { records: usize },
    Unreachable { reason: String },
}

impl ProbeReport {
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable { .. })
    }
}

impl std::fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reachable { records } => write!(f, "connected: {records} articles"),
            Self::Unreachable { reason } => write!(f, "error: {reason}"),
        }
    }
}

/// Fetch the article list once, without credentials, and report whether
/// the backend answered with a list. The session is never touched.
pub async fn probe_backend(client: &HttpClient) -> ProbeReport {
    let endpoint = Article::list_endpoint();
    let report = match client.get_anonymous(&endpoint).await {
        Ok(Value::Array(items)) => ProbeReport::Reachable { records: items.len() },
        Ok(_) => ProbeReport::Unreachable { reason: format!("{endpoint} did not return a list") },
        Err(e) => ProbeReport::Unreachable { reason: e.to_string() },
    };
    match &report {
        ProbeReport::Reachable { records } => info!(base_url = %client.config().base_url, records, "backend reachable"),
        ProbeReport::Unreachable { reason } => warn!(base_url = %client.config().base_url, %reason, "backend probe failed"),
    }
    report
}

#[cfg(test)]
#[path = "probe_test.rs"]
mod tests;
