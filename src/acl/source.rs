//! ACL sources answering describe filters

use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::binding::{AclBinding, AclBindingFilter};

/// Provider of stored ACL bindings
pub trait AclSource: Send + Sync {
    /// Return every stored binding the filter matches
    fn describe(&self, filter: &AclBindingFilter) -> Result<Vec<AclBinding>>;

    /// Source name for logging
    fn name(&self) -> &str;
}

/// In-memory, non-persistent ACL source
pub struct MemoryAclSource {
    bindings: Arc<RwLock<Vec<AclBinding>>>,
}

impl MemoryAclSource {
    pub fn new(bindings: Vec<AclBinding>) -> Self {
        Self {
            bindings: Arc::new(RwLock::new(bindings)),
        }
    }

    /// Load bindings from a JSON array file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ACL file {}", path.display()))?;
        let bindings: Vec<AclBinding> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse ACL file {}", path.display()))?;

        debug!(path = %path.display(), count = bindings.len(), "Loaded ACL bindings");
        Ok(Self::new(bindings))
    }

    /// Replace every stored binding
    pub fn replace(&self, bindings: Vec<AclBinding>) {
        *self.bindings.write() = bindings;
    }

    /// Add bindings, skipping ones already stored
    pub fn add_bindings(&self, bindings: &[AclBinding]) {
        let mut current = self.bindings.write();

        for binding in bindings {
            if !current.contains(binding) {
                current.push(binding.clone());
            }
        }
    }

    /// Get the number of stored bindings
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }
}

impl Default for MemoryAclSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl AclSource for MemoryAclSource {
    fn describe(&self, filter: &AclBindingFilter) -> Result<Vec<AclBinding>> {
        let bindings = self.bindings.read();
        Ok(bindings.iter().filter(|b| filter.matches(b)).cloned().collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
