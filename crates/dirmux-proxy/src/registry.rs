//! Ordered registry of configured backends

use std::sync::Arc;

use dirmux_core::config::{ProxyConfig, ServerProfile};
use once_cell::sync::OnceCell;
use tracing::info;

use crate::backend::{BackendEntry, DirectoryAccess, DirectoryBackend};

/// Creates the backend pair for one server profile.
pub trait BackendFactory: Send + Sync {
    fn create(&self, profile: &ServerProfile)
        -> (Arc<dyn DirectoryBackend>, Arc<dyn DirectoryAccess>);
}

/// Holds one backend entry per configured prefix, in configuration
/// order. Backends are instantiated on first use and live for the
/// lifetime of the registry.
pub struct BackendRegistry {
    profiles: Vec<ServerProfile>,
    factory: Box<dyn BackendFactory>,
    entries: OnceCell<Vec<BackendEntry>>,
}

impl BackendRegistry {
    pub fn new(config: &ProxyConfig, factory: Box<dyn BackendFactory>) -> Self {
        Self {
            profiles: config.servers.clone(),
            factory,
            entries: OnceCell::new(),
        }
    }

    /// Lazily instantiate all backends.
    pub fn setup(&self) -> &[BackendEntry] {
        self.entries.get_or_init(|| {
            info!(backends = self.profiles.len(), "initializing directory backends");
            self.profiles
                .iter()
                .map(|profile| {
                    let (backend, access) = self.factory.create(profile);
                    BackendEntry::new(&profile.prefix, backend, access)
                })
                .collect()
        })
    }

    pub fn active_backends(&self) -> usize {
        self.setup().len()
    }

    /// With one backend, routing is trivially that backend and the
    /// affinity cache stays untouched.
    pub fn is_single_backend(&self) -> bool {
        self.active_backends() == 1
    }

    pub fn entry(&self, prefix: &str) -> Option<&BackendEntry> {
        self.setup().iter().find(|e| e.prefix() == prefix)
    }

    /// First configured backend; uniform metadata is read from it.
    pub fn reference(&self) -> Option<&BackendEntry> {
        self.setup().first()
    }
}
