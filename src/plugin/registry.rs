//! Plugin registry for managing plugin lifecycles.
//!
//! Keeps two independent orderings over the registered plugins:
//! registration order, which drives [`PluginRegistry::activate_all`], and
//! activation order, which [`PluginRegistry::deactivate_all`] unwinds in
//! reverse. Each ordering is a sequence-keyed `BTreeMap` with a name index
//! beside it, so removal never scans.
//!
//! Every public operation holds one exclusive lock for its entire body,
//! including while plugin hooks run. A slow hook blocks every other caller
//! until it returns.

use crate::core::{now, Error, Result, Timestamp};
use crate::plugin::config::RegistryConfig;
use crate::plugin::interface::Plugin;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};
use uuid::Uuid;

/// Plugin status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginStatus {
    /// Registered but not running
    Off,
    /// Activated successfully and not yet deactivated
    On,
}

impl fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginStatus::Off => write!(f, "off"),
            PluginStatus::On => write!(f, "on"),
        }
    }
}

/// Point-in-time view of a registered plugin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    /// Registration ID, unique per `register` call
    pub id: Uuid,
    /// Plugin name
    pub name: String,
    /// Current status
    pub status: PluginStatus,
    /// Registration time
    pub registered_at: Timestamp,
    /// Time of the most recent activation, while on
    pub activated_at: Option<Timestamp>,
    /// Number of successful activations since registration
    pub activation_count: u64,
}

/// Registry-owned record pairing a plugin with its name and status.
struct Entry {
    id: Uuid,
    name: String,
    plugin: Arc<dyn Plugin>,
    status: PluginStatus,
    registered_at: Timestamp,
    activated_at: Option<Timestamp>,
    activation_count: u64,
}

impl Entry {
    fn new(name: &str, plugin: Arc<dyn Plugin>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            plugin,
            status: PluginStatus::Off,
            registered_at: now(),
            activated_at: None,
            activation_count: 0,
        }
    }

    fn is_on(&self) -> bool {
        self.status == PluginStatus::On
    }

    /// Run the activation hook; bookkeeping changes only if it succeeds.
    fn activate(
        &mut self,
        key: u64,
        activation: &mut ActivationOrder,
        label: &str,
    ) -> Result<()> {
        self.plugin
            .activate()
            .map_err(|source| Error::ActivationFailed {
                name: self.name.clone(),
                source,
            })?;

        self.status = PluginStatus::On;
        self.activated_at = Some(now());
        self.activation_count += 1;
        activation.push(&self.name, key);

        debug!(registry = label, plugin = %self.name, "plugin activated");
        Ok(())
    }

    /// Mark the entry off, then run the deactivation hook.
    fn deactivate(&mut self, activation: &mut ActivationOrder, label: &str) {
        activation.remove(&self.name);
        self.status = PluginStatus::Off;
        self.activated_at = None;

        debug!(registry = label, plugin = %self.name, "plugin deactivated");
        self.plugin.deactivate();
    }

    fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            id: self.id,
            name: self.name.clone(),
            status: self.status,
            registered_at: self.registered_at,
            activated_at: self.activated_at,
            activation_count: self.activation_count,
        }
    }
}

/// Activation list: entry keys in the order they most recently turned on.
#[derive(Default)]
struct ActivationOrder {
    next_seq: u64,
    order: BTreeMap<u64, u64>,
    index: HashMap<String, u64>,
}

impl ActivationOrder {
    fn push(&mut self, name: &str, key: u64) {
        self.next_seq += 1;
        self.order.insert(self.next_seq, key);
        self.index.insert(name.to_string(), self.next_seq);
    }

    fn remove(&mut self, name: &str) -> Option<u64> {
        let seq = self.index.remove(name)?;
        self.order.remove(&seq)
    }

    /// Entry keys, most recently activated first.
    fn keys_rev(&self) -> Vec<u64> {
        self.order.values().rev().copied().collect()
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

/// State guarded by the registry lock.
struct RegistryState {
    label: String,
    next_key: u64,
    /// Registration list, keyed by registration sequence
    entries: BTreeMap<u64, Entry>,
    /// Registration index
    index: HashMap<String, u64>,
    activation: ActivationOrder,
}

impl RegistryState {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            next_key: 0,
            entries: BTreeMap::new(),
            index: HashMap::new(),
            activation: ActivationOrder::default(),
        }
    }

    fn key_of(&self, name: &str) -> Result<u64> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn entry(&self, name: &str) -> Result<&Entry> {
        let key = self.key_of(name)?;
        self.entries
            .get(&key)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn insert(&mut self, name: &str, plugin: Arc<dyn Plugin>) -> u64 {
        self.next_key += 1;
        let key = self.next_key;
        self.entries.insert(key, Entry::new(name, plugin));
        self.index.insert(name.to_string(), key);
        key
    }

    fn activate(&mut self, key: u64) -> Result<()> {
        match self.entries.get_mut(&key) {
            Some(entry) if !entry.is_on() => {
                entry.activate(key, &mut self.activation, &self.label)
            }
            _ => Ok(()),
        }
    }

    fn deactivate(&mut self, key: u64) {
        if let Some(entry) = self.entries.get_mut(&key) {
            if entry.is_on() {
                entry.deactivate(&mut self.activation, &self.label);
            }
        }
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        let key = self.key_of(name)?;
        self.deactivate(key);
        self.entries.remove(&key);
        self.index.remove(name);
        Ok(())
    }

    fn activate_all(&mut self) -> Result<()> {
        for (key, entry) in self.entries.iter_mut() {
            if !entry.is_on() {
                entry.activate(*key, &mut self.activation, &self.label)?;
            }
        }
        Ok(())
    }

    fn deactivate_all(&mut self) {
        for key in self.activation.keys_rev() {
            self.deactivate(key);
        }
    }
}

/// Plugin registry.
///
/// Share it between threads behind an `Arc`; all methods take `&self`.
pub struct PluginRegistry {
    config: RegistryConfig,
    state: Mutex<RegistryState>,
}

impl PluginRegistry {
    /// Create a new registry.
    pub fn new(config: RegistryConfig) -> Self {
        let state = RegistryState::new(&config.label);
        Self {
            config,
            state: Mutex::new(state),
        }
    }

    /// Registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // A hook that panics poisons the mutex. Bookkeeping is never left
    // half-updated across a hook call, so the guard is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a plugin under `name`, appending it to the registration order.
    ///
    /// With `activate_now`, the plugin is activated immediately. If that
    /// activation fails the error is returned but the plugin stays
    /// registered and off.
    pub fn register(
        &self,
        name: &str,
        plugin: Arc<dyn Plugin>,
        activate_now: bool,
    ) -> Result<()> {
        let mut state = self.lock();

        if state.index.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        if let Some(max) = self.config.max_plugins {
            if state.entries.len() >= max {
                return Err(Error::CapacityExceeded(max));
            }
        }

        let key = state.insert(name, plugin);
        info!(registry = %self.config.label, plugin = name, "plugin registered");

        if activate_now {
            state.activate(key)?;
        }
        Ok(())
    }

    /// Unregister a plugin, deactivating it first if it is on.
    pub fn unregister(&self, name: &str) -> Result<()> {
        self.lock().remove(name)?;
        info!(registry = %self.config.label, plugin = name, "plugin unregistered");
        Ok(())
    }

    /// Activate a single plugin. Already-active plugins are left alone.
    pub fn activate(&self, name: &str) -> Result<()> {
        let mut state = self.lock();
        let key = state.key_of(name)?;
        state.activate(key)
    }

    /// Deactivate a single plugin. Inactive plugins are left alone.
    pub fn deactivate(&self, name: &str) -> Result<()> {
        let mut state = self.lock();
        let key = state.key_of(name)?;
        state.deactivate(key);
        Ok(())
    }

    /// Activate every inactive plugin in registration order.
    ///
    /// Stops at the first failure. Plugins activated earlier in the walk
    /// stay on; [`is_active`](Self::is_active) reports the partial state.
    pub fn activate_all(&self) -> Result<()> {
        let mut state = self.lock();
        state.activate_all()?;
        info!(
            registry = %self.config.label,
            active = state.activation.len(),
            "all plugins activated"
        );
        Ok(())
    }

    /// Deactivate every active plugin, most recently activated first.
    pub fn deactivate_all(&self) {
        let mut state = self.lock();
        state.deactivate_all();
        info!(registry = %self.config.label, "all plugins deactivated");
    }

    /// Get a plugin by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Plugin>> {
        let state = self.lock();
        state.entry(name).map(|entry| Arc::clone(&entry.plugin))
    }

    /// Whether a plugin is currently on.
    pub fn is_active(&self, name: &str) -> Result<bool> {
        let state = self.lock();
        state.entry(name).map(Entry::is_on)
    }

    /// Get plugin status.
    pub fn status(&self, name: &str) -> Result<PluginStatus> {
        let state = self.lock();
        state.entry(name).map(|entry| entry.status)
    }

    /// Whether a plugin is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().index.contains_key(name)
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Number of active plugins.
    pub fn active_count(&self) -> usize {
        self.lock().activation.len()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.lock()
            .entries
            .values()
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Active names, in activation order.
    pub fn active_names(&self) -> Vec<String> {
        let state = self.lock();
        state
            .activation
            .order
            .values()
            .filter_map(|key| state.entries.get(key))
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Snapshot of every entry, in registration order.
    pub fn snapshot(&self) -> Vec<EntrySnapshot> {
        self.lock().entries.values().map(Entry::snapshot).collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("PluginRegistry")
            .field("label", &self.config.label)
            .field("registered", &state.entries.len())
            .field("active", &state.activation.len())
            .finish()
    }
}
