#![doc(test(attr(deny(warnings))))]

//! Moneta offers the aggregation, reporting, and entity-lifecycle services
//! of a personal budget-management backend. Persistence and authentication
//! are external collaborators: storage is reached through the
//! [`moneta_core::storage::Store`] trait and every operation takes the
//! verified user id as a plain argument.

pub mod api;
pub mod utils;

pub use moneta_config::{Config, ConfigError, ConfigManager};
pub use moneta_core::*;
pub use moneta_domain::*;
pub use moneta_storage_mem::MemoryStore;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Moneta tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
