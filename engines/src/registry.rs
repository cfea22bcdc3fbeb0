//! Engine registry for automatic front-end discovery.
//!
//! Each engine self-registers via [`inventory::submit!`] with an
//! [`EngineEntry`] containing its CLI name and a factory function. The
//! front-end discovers available engines at runtime without any central
//! list.

use lantern_core::engine::Engine;

/// Describes a front-end-selectable engine.
pub struct EngineEntry {
    /// CLI name used to select this engine (e.g., "bands").
    pub name: &'static str,
    /// Factory: construct the engine, ready to power on.
    pub create: fn() -> Box<dyn Engine>,
}

impl EngineEntry {
    pub const fn new(name: &'static str, create: fn() -> Box<dyn Engine>) -> Self {
        Self { name, create }
    }
}

inventory::collect!(EngineEntry);

/// Return all registered engines, sorted by name.
pub fn all() -> Vec<&'static EngineEntry> {
    let mut entries: Vec<_> = inventory::iter::<EngineEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up an engine by its CLI name.
pub fn find(name: &str) -> Option<&'static EngineEntry> {
    inventory::iter::<EngineEntry>
        .into_iter()
        .find(|e| e.name == name)
}
