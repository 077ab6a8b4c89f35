//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::repository::AddressRepository;

/// Application state shared across handlers
///
/// Holds the immutable configuration and the address store. Cloning is
/// cheap: the configuration sits behind an `Arc` and repositories are
/// handles over a pool.
#[derive(Clone)]
pub struct AppState<R> {
    config: Arc<Config>,
    repository: R,
}

impl<R> AppState<R>
where
    R: AddressRepository,
{
    pub fn new(config: Config, repository: R) -> Self {
        Self {
            config: Arc::new(config),
            repository,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the address store
    pub fn repository(&self) -> &R {
        &self.repository
    }
}

impl<R> std::fmt::Debug for AppState<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.config.service.name)
            .finish_non_exhaustive()
    }
}
