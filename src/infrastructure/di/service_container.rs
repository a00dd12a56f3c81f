//! Service container for dependency injection
//!
//! Wires up the control service with its transport.

use std::sync::Arc;

use crate::application::services::ControlService;
use crate::config::Settings;
use crate::infrastructure::securityfs::SecurityFsControl;
use crate::infrastructure::traits::ProvenanceControl;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    pub control_service: ControlService,
}

impl ServiceContainer {
    /// Create a new service container talking to securityfs at `settings.control_dir`.
    pub fn new(settings: Settings) -> Self {
        let control = Arc::new(SecurityFsControl::new(settings.control_dir.clone()));
        Self::with_deps(settings, control)
    }

    /// Create a service container with a custom transport (for testing).
    pub fn with_deps(settings: Settings, control: Arc<dyn ProvenanceControl>) -> Self {
        let settings = Arc::new(settings);
        Self {
            settings,
            control_service: ControlService::new(control),
        }
    }
}
