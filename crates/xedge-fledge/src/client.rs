use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use xedge_workflow::Graph;

use crate::adapter::AdapterChain;
use crate::error::FledgeError;

/// Paths tried, in order, when none are configured.
pub const DEFAULT_PATHS: &[&str] = &[
  "/fledge/workflow",
  "/fledge/pipeline",
  "/fledge/filter",
  "/fledge/schedule",
];

/// Per-candidate request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Probe settings.
#[derive(Debug, Clone)]
pub struct FledgeConfig {
  /// Timeout applied to each candidate request separately.
  pub timeout: Duration,
  /// Candidate paths, tried in order.
  pub paths: Vec<String>,
}

impl Default for FledgeConfig {
  fn default() -> Self {
    Self {
      timeout: DEFAULT_TIMEOUT,
      paths: DEFAULT_PATHS.iter().map(|p| p.to_string()).collect(),
    }
  }
}

/// Fetches a workflow from a Fledge host by probing candidate paths in
/// sequence and keeping the first answer an adapter recognizes.
#[derive(Clone)]
pub struct FledgeClient {
  http: Client,
  config: FledgeConfig,
  chain: Arc<AdapterChain>,
}

impl FledgeClient {
  pub fn new(config: FledgeConfig) -> Result<Self, FledgeError> {
    Self::with_chain(config, AdapterChain::default())
  }

  pub fn with_chain(config: FledgeConfig, chain: AdapterChain) -> Result<Self, FledgeError> {
    let http = Client::builder().timeout(config.timeout).build()?;
    Ok(Self {
      http,
      config,
      chain: Arc::new(chain),
    })
  }

  pub fn config(&self) -> &FledgeConfig {
    &self.config
  }

  /// Base URL of a deployment. A host that already carries a scheme is kept
  /// as is; a bare host is reached over plain http.
  pub fn base_url(host: &str, port: &str) -> Result<Url, FledgeError> {
    let base = if host.contains("://") {
      format!("{host}:{port}")
    } else {
      format!("http://{host}:{port}")
    };
    Ok(Url::parse(&base)?)
  }

  /// Probe every candidate path of `host:port` and normalize the first
  /// recognizable body.
  pub async fn fetch_graph(&self, host: &str, port: &str) -> Result<Graph, FledgeError> {
    let base = Self::base_url(host, port)?;

    for path in &self.config.paths {
      let url = base.join(path)?;
      match self.fetch_candidate(&url).await {
        Ok(graph) => {
          info!(
            url = %url,
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            "workflow imported from fledge"
          );
          return Ok(graph);
        }
        Err(e) => warn!(url = %url, error = %e, "fledge candidate failed"),
      }
    }

    Err(FledgeError::Exhausted {
      base: base.to_string(),
      attempts: self.config.paths.len(),
    })
  }

  async fn fetch_candidate(&self, url: &Url) -> Result<Graph, FledgeError> {
    debug!(url = %url, "probing fledge");
    let response = self.http.get(url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(FledgeError::Status {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }

    let body: Value = response.json().await?;
    self.chain.adapt(&body).ok_or_else(|| FledgeError::Unrecognized {
      url: url.to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config() {
    let config = FledgeConfig::default();
    assert_eq!(config.timeout, Duration::from_millis(3000));
    assert_eq!(config.paths[0], "/fledge/workflow");
    assert_eq!(config.paths.len(), 4);
  }

  #[test]
  fn test_base_url() {
    let url = FledgeClient::base_url("10.0.0.5", "8081").unwrap();
    assert_eq!(url.as_str(), "http://10.0.0.5:8081/");
    assert_eq!(url.join("/fledge/pipeline").unwrap().as_str(), "http://10.0.0.5:8081/fledge/pipeline");

    let url = FledgeClient::base_url("https://edge.local", "443").unwrap();
    assert_eq!(url.scheme(), "https");
  }

  #[test]
  fn test_base_url_rejects_bad_port() {
    assert!(matches!(
      FledgeClient::base_url("localhost", "not-a-port"),
      Err(FledgeError::InvalidEndpoint(_))
    ));
  }
}
