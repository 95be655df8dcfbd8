use serde::{Deserialize, Serialize};

use crate::element::Element;

/// A workflow as stored and exchanged over HTTP: `{"elements": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
  pub elements: Vec<Element>,
}

impl WorkflowDocument {
  /// The document served for a deployment that has never been saved.
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn new(elements: Vec<Element>) -> Self {
    Self { elements }
  }

  pub fn is_empty(&self) -> bool {
    self.elements.is_empty()
  }
}
