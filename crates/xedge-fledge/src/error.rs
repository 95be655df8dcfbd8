/// Errors raised while probing a Fledge host.
///
/// None of these reach an API caller; the server falls back to the stored
/// workflow instead.
#[derive(Debug, thiserror::Error)]
pub enum FledgeError {
  #[error("invalid fledge endpoint: {0}")]
  InvalidEndpoint(#[from] url::ParseError),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{url} answered with status {status}")]
  Status { url: String, status: u16 },

  #[error("{url} answered with a body no adapter recognizes")]
  Unrecognized { url: String },

  #[error("no candidate path on {base} produced a workflow ({attempts} tried)")]
  Exhausted { base: String, attempts: usize },
}
