//! Storage-backed script module resolution.
//!
//! The scripting host hands its import machinery a search hook; this
//! resolver implements it against the boot medium. A requested name maps
//! to a storage path by appending the configured extension when absent,
//! and the host's own compiler turns the source into a module.

use thiserror::Error;
use tracing::debug;

use crate::config::ModuleConfig;
use crate::device::Storage;

/// Module resolution failures the host's import machinery distinguishes.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// No file for the module on storage (or storage is not ready).
    /// Hosts typically let their next searcher try.
    #[error("module '{0}' not found")]
    NotFound(String),

    /// The module's source was found but failed to compile. The message
    /// is the host compiler's own.
    #[error("module '{name}' failed to compile: {message}")]
    Compile { name: String, message: String },

    /// The module's source exists but could not be read.
    #[error("module '{name}' unreadable: {message}")]
    Unreadable { name: String, message: String },
}

/// Compiles module source into the host's chunk representation.
pub trait ScriptHost {
    type Module;

    /// Compile `source`, using `name` in diagnostics.
    fn compile(&mut self, name: &str, source: &str) -> Result<Self::Module, String>;
}

/// Resolves module names against storage.
pub struct ModuleResolver {
    extension: String,
}

impl ModuleResolver {
    pub fn new(config: &ModuleConfig) -> Self {
        Self {
            extension: config.extension.clone(),
        }
    }

    /// The storage path for a module name: the configured extension is
    /// appended unless the name already carries it.
    pub fn path_for(&self, name: &str) -> String {
        if !self.extension.is_empty() && !name.ends_with(self.extension.as_str()) {
            format!("{name}{}", self.extension)
        } else {
            name.to_string()
        }
    }

    /// Find, read, and compile the named module.
    ///
    /// The resolved storage path is what the host sees as the chunk name,
    /// so compiler diagnostics point at the real file.
    pub fn resolve<H: ScriptHost>(
        &self,
        storage: &dyn Storage,
        host: &mut H,
        name: &str,
    ) -> Result<H::Module, ModuleError> {
        let path = self.path_for(name);
        if !storage.is_ready() || !storage.exists(&path) {
            return Err(ModuleError::NotFound(name.to_string()));
        }
        let source = storage
            .read_text(&path)
            .map_err(|e| ModuleError::Unreadable {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        debug!(name, path, bytes = source.len(), "module source resolved");
        host.compile(&path, &source)
            .map_err(|message| ModuleError::Compile {
                name: name.to_string(),
                message,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(extension: &str) -> ModuleResolver {
        ModuleResolver::new(&ModuleConfig {
            extension: extension.to_string(),
        })
    }

    #[test]
    fn path_appends_extension() {
        assert_eq!(resolver(".lua").path_for("boot"), "boot.lua");
        assert_eq!(resolver(".lua").path_for("dir/boot"), "dir/boot.lua");
    }

    #[test]
    fn path_keeps_existing_extension() {
        assert_eq!(resolver(".lua").path_for("boot.lua"), "boot.lua");
    }

    #[test]
    fn empty_extension_leaves_name_alone() {
        assert_eq!(resolver("").path_for("boot"), "boot");
    }
}
