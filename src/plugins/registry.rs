use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value as J;

use crate::core::error::PluginError;
use crate::core::model::{ModelTrainer, RealtimeModel};

pub const RT_FACTORY_NAME: &str = "KronosXPredict_create_realtime_model";
pub const TR_FACTORY_NAME: &str = "KronosXPredict_create_trainer";

const NAME_PREFIXES: [&str; 2] = ["KronosXPredict_", "KronosPredict_"];

pub type RealtimeFactoryFn = fn(&J) -> Result<Box<dyn RealtimeModel>, PluginError>;
pub type TrainerFactoryFn = fn(&J) -> Result<Box<dyn ModelTrainer>, PluginError>;

#[derive(Clone, Copy)]
pub enum Export {
    Realtime(RealtimeFactoryFn),
    Trainer(TrainerFactoryFn),
}

/// Symbol table a plugin publishes.
#[derive(Clone, Default)]
pub struct PluginExports {
    symbols: HashMap<&'static str, Export>,
}

impl PluginExports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn realtime(mut self, factory: RealtimeFactoryFn) -> Self {
        self.symbols.insert(RT_FACTORY_NAME, Export::Realtime(factory));
        self
    }

    pub fn trainer(mut self, factory: TrainerFactoryFn) -> Self {
        self.symbols.insert(TR_FACTORY_NAME, Export::Trainer(factory));
        self
    }

    pub fn symbol(&self, name: &str) -> Option<Export> {
        self.symbols.get(name).copied()
    }
}

/// A resolved plugin with whichever factories it exports.
pub struct PluginLibrary {
    name: String,
    rt_factory: Option<RealtimeFactoryFn>,
    tr_factory: Option<TrainerFactoryFn>,
}

impl PluginLibrary {
    pub fn from_exports(
        name: impl Into<String>,
        exports: &PluginExports,
    ) -> Result<Self, PluginError> {
        let name = name.into();
        let rt_factory = match exports.symbol(RT_FACTORY_NAME) {
            Some(Export::Realtime(f)) => Some(f),
            _ => None,
        };
        let tr_factory = match exports.symbol(TR_FACTORY_NAME) {
            Some(Export::Trainer(f)) => Some(f),
            _ => None,
        };
        if rt_factory.is_none() && tr_factory.is_none() {
            return Err(PluginError::NoFactories);
        }
        tracing::debug!(
            plugin = %name,
            realtime = rt_factory.is_some(),
            trainer = tr_factory.is_some(),
            "plugin factories resolved"
        );
        Ok(Self {
            name,
            rt_factory,
            tr_factory,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_realtime(&self) -> bool {
        self.rt_factory.is_some()
    }

    pub fn has_trainer(&self) -> bool {
        self.tr_factory.is_some()
    }

    pub fn create_realtime(&self, cfg: &J) -> Result<Box<dyn RealtimeModel>, PluginError> {
        let factory = self.rt_factory.ok_or(PluginError::RealtimeUnavailable)?;
        factory(cfg)
    }

    pub fn create_trainer(&self, cfg: &J) -> Result<Box<dyn ModelTrainer>, PluginError> {
        let factory = self.tr_factory.ok_or(PluginError::TrainerUnavailable)?;
        factory(cfg)
    }
}

/// Realtime model bundled with the library that produced it.
pub struct RealtimeModelInstance {
    lib: Arc<PluginLibrary>,
    model: Box<dyn RealtimeModel>,
}

impl RealtimeModelInstance {
    pub fn create(lib: Arc<PluginLibrary>, cfg: &J) -> Result<Self, PluginError> {
        let model = lib.create_realtime(cfg)?;
        Ok(Self { lib, model })
    }

    pub fn library(&self) -> &PluginLibrary {
        &self.lib
    }

    pub fn model(&self) -> &dyn RealtimeModel {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> &mut dyn RealtimeModel {
        self.model.as_mut()
    }
}

#[derive(Clone)]
pub struct PluginRegistry {
    by_name: Arc<HashMap<String, PluginExports>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            by_name: Arc::new(HashMap::new()),
        }
    }

    /// Registry holding every plugin compiled into this crate.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        reg.register("stub", super::stub::exports());
        reg
    }

    pub fn register(&mut self, name: impl Into<String>, exports: PluginExports) {
        Arc::make_mut(&mut self.by_name).insert(name.into(), exports);
    }

    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve `path` (a bare name or a library file path) to a plugin.
    pub fn load(&self, path: &str) -> Result<Arc<PluginLibrary>, PluginError> {
        let name = plugin_name_from_path(path);
        let exports = self.by_name.get(&name).ok_or_else(|| {
            tracing::warn!(path = %path, name = %name, "plugin not found");
            PluginError::NotFound(path.to_string())
        })?;
        let lib = PluginLibrary::from_exports(name, exports)?;
        tracing::info!(plugin = %lib.name(), "plugin loaded");
        Ok(Arc::new(lib))
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn load_plugin_library(path: &str) -> Result<Arc<PluginLibrary>, PluginError> {
    PluginRegistry::builtin().load(path)
}

/// `plugins/stub/libKronosPredict_stub.so` -> `stub`.
pub fn plugin_name_from_path(path: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path);
    let stem = stem.strip_prefix("lib").unwrap_or(stem);
    let stem = NAME_PREFIXES
        .iter()
        .find_map(|p| stem.strip_prefix(p))
        .unwrap_or(stem);
    stem.to_string()
}
