pub mod registry;
pub mod stub;

pub use registry::{load_plugin_library, PluginLibrary, PluginRegistry, RealtimeModelInstance};
