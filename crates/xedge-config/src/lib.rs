//! XEdge Config
//!
//! This crate contains the serializable types that cross the wire or land in
//! storage. A workflow travels as a flat `elements` array in which every entry
//! is either a node or an edge (`"type": "edge"`); these types describe that
//! shape loosely so that malformed submissions can still be parsed and then
//! rejected with a useful message by the validator.
//!
//! The canonical graph built from these types lives in `xedge-workflow`.

mod document;
mod element;
mod plugin;
mod value;

pub use document::WorkflowDocument;
pub use element::{DEFAULT_NODE_TYPE, EDGE_TYPE, Element, NodeData, Position, node_type_or_default};
pub use plugin::{PluginDef, PluginSetting, PluginSettings, SettingType};
pub use value::{ConfigMap, ConfigValue, TypedValue};
