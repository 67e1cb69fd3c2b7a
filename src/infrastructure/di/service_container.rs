//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::TocService;
use crate::config::Settings;
use crate::domain::IdGenerator;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding shared dependencies; services are built on demand.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Node id source, chosen by `ids.strategy`
    pub ids: Arc<dyn IdGenerator>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let ids = settings.ids.strategy.generator(&settings.ids.prefix);
        Self::with_deps(settings, Arc::new(RealFileSystem), ids)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs, ids }
    }

    pub fn toc_service(&self) -> TocService {
        TocService::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.settings),
            Arc::clone(&self.ids),
        )
    }
}
