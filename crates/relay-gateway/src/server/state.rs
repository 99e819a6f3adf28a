//! Gateway state
//!
//! Application state for the gateway server.

use crate::connection::SessionRegistry;
use relay_common::RelayConfig;
use relay_core::IdentityService;
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Live relay sessions, keyed by connection
    registry: Arc<SessionRegistry>,
    /// Identity provider used for JoinIdentity
    identity: Arc<dyn IdentityService>,
    /// Application configuration
    config: Arc<RelayConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        registry: Arc<SessionRegistry>,
        identity: Arc<dyn IdentityService>,
        config: RelayConfig,
    ) -> Self {
        Self {
            registry,
            identity,
            config: Arc::new(config),
        }
    }

    /// Get the session registry
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Get the identity provider
    pub fn identity(&self) -> &dyn IdentityService {
        self.identity.as_ref()
    }

    /// Get the application configuration
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("config", &"RelayConfig")
            .finish()
    }
}
