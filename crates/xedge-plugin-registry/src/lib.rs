mod builtin;
mod error;
mod fs_catalog;
mod registry;

pub use builtin::BuiltinCatalog;
pub use error::RegistryError;
pub use fs_catalog::FsPluginCatalog;
pub use registry::PluginCatalog;
pub use xedge_config::{PluginDef, PluginSetting, PluginSettings, SettingType};
