//! Name → plugin lookup.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{HarnessError, HarnessResult};
use crate::monitors::{RangeMonitor, StateMonitor, TimingMonitor};
use crate::plugin::MonitorPlugin;
use crate::timing::TimingSource;

/// Registered monitor plugins, keyed by [`MonitorPlugin::name`].
///
/// Filled at startup and read-only while cases execute.
#[derive(Default, Clone)]
pub struct MonitorRegistry {
    plugins: HashMap<String, Arc<dyn MonitorPlugin>>,
}

impl MonitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `range`, `state` and `timing` reference plugins.
    pub fn builtin(timing_source: Arc<dyn TimingSource>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RangeMonitor));
        registry.register(Arc::new(StateMonitor));
        registry.register(Arc::new(TimingMonitor::new(timing_source)));
        registry
    }

    /// Register `plugin` under its name, replacing any previous entry.
    pub fn register(&mut self, plugin: Arc<dyn MonitorPlugin>) {
        let name = plugin.name().to_string();
        debug!(plugin = %name, "registering monitor plugin");
        self.plugins.insert(name, plugin);
    }

    pub fn get(&self, name: &str) -> HarnessResult<&Arc<dyn MonitorPlugin>> {
        self.plugins.get(name).ok_or_else(|| HarnessError::UnknownPlugin {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for MonitorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}
