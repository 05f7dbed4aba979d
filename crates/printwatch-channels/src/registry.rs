//! Channel registry -- the startup manifest of notification plugins.
//!
//! Channels are registered through an ordered list of
//! [`RegistryEntry`] values (factory + config blob) assembled by the
//! application at startup. [`Registry::load`] builds every channel once;
//! a duplicate name keeps the first registration, and an entry whose
//! factory fails to build is recorded and skipped so one bad plugin
//! never takes down the rest.
//!
//! [`LazyRegistry`] wraps the manifest so the load runs at most once per
//! process, safely under concurrent first access; all reads after the
//! load are lock-free.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use printwatch_types::{ChannelError, Feature};

use crate::traits::{Channel, ChannelFactory};

/// One manifest entry: a factory paired with its config blob.
#[derive(Clone)]
pub struct RegistryEntry {
    /// The factory that builds the channel instance.
    pub factory: Arc<dyn ChannelFactory>,
    /// Opaque configuration handed to [`ChannelFactory::build`].
    pub config: serde_json::Value,
}

impl RegistryEntry {
    /// Convenience constructor.
    pub fn new(factory: Arc<dyn ChannelFactory>, config: serde_json::Value) -> Self {
        Self { factory, config }
    }
}

/// A loaded notification plugin. Immutable after load.
pub struct Plugin {
    /// Registry key, unique.
    pub name: String,
    /// Capability set, cached from the instance at load time.
    pub features: HashSet<Feature>,
    /// The channel implementation.
    pub instance: Arc<dyn Channel>,
}

impl Plugin {
    /// Whether this plugin declares support for `feature`.
    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }
}

/// Immutable collection of loaded plugins, keyed by name.
pub struct Registry {
    /// Plugin names in registration order.
    order: Vec<String>,
    plugins: HashMap<String, Plugin>,
    /// Entries that failed to build: (channel name, error).
    load_errors: Vec<(String, ChannelError)>,
}

impl Registry {
    /// Build every entry in `entries`, in order.
    ///
    /// First-registered wins on a duplicate name; the later entry is
    /// discarded with a warning. A failing build is recorded in
    /// [`load_errors`](Registry::load_errors) and skipped -- loading
    /// never aborts on a single bad plugin.
    pub fn load(entries: &[RegistryEntry]) -> Self {
        let mut order = Vec::new();
        let mut plugins: HashMap<String, Plugin> = HashMap::new();
        let mut load_errors = Vec::new();

        for entry in entries {
            let name = entry.factory.channel_name().to_owned();
            if plugins.contains_key(&name) {
                warn!(plugin = %name, "duplicate channel name, keeping first registration");
                continue;
            }

            match entry.factory.build(&entry.config) {
                Ok(instance) => {
                    let features = instance.supported_features();
                    info!(plugin = %name, features = features.len(), "channel loaded");
                    order.push(name.clone());
                    plugins.insert(
                        name.clone(),
                        Plugin {
                            name,
                            features,
                            instance,
                        },
                    );
                }
                Err(err) => {
                    warn!(plugin = %name, error = %err, "channel failed to load, skipping");
                    load_errors.push((name, err));
                }
            }
        }

        Self {
            order,
            plugins,
            load_errors,
        }
    }

    /// Loaded plugin names, in registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Look up a plugin by name.
    pub fn get(&self, name: &str) -> Option<&Plugin> {
        self.plugins.get(name)
    }

    /// All loaded plugins, in registration order.
    pub fn all(&self) -> impl Iterator<Item = &Plugin> {
        self.order.iter().filter_map(|name| self.plugins.get(name))
    }

    /// Entries that failed to build during [`load`](Registry::load).
    pub fn load_errors(&self) -> &[(String, ChannelError)] {
        &self.load_errors
    }
}

/// A registry manifest whose load is deferred to first access.
///
/// The dispatch engine holds one of these; the scan-and-build runs at
/// most once per process lifetime, and concurrent first accesses race
/// safely (one load wins, the others reuse its result).
pub struct LazyRegistry {
    entries: Vec<RegistryEntry>,
    loaded: OnceLock<Registry>,
}

impl LazyRegistry {
    /// Wrap a manifest without loading it.
    pub fn new(entries: Vec<RegistryEntry>) -> Self {
        Self {
            entries,
            loaded: OnceLock::new(),
        }
    }

    /// The loaded registry, building it on first access.
    pub fn get(&self) -> &Registry {
        self.loaded.get_or_init(|| Registry::load(&self.entries))
    }
}
