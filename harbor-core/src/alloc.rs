//! Resource allocation: next free port and Redis DB index.
//!
//! Both functions are pure over the current registry state and return the
//! *smallest* unused value, so repeated calls without a registry mutation
//! return the same answer and tests can assert exact values. Callers commit
//! the result under the service's scoped lock.

use crate::config::Config;
use crate::error::{RegistryError, ResourceKind};
use crate::types::Registry;

/// Smallest port ≥ `config.port_base` not assigned to any project.
pub fn next_port(registry: &Registry, config: &Config) -> Result<u16, RegistryError> {
    let used = registry.used_ports();
    (config.port_base..=config.port_max)
        .find(|port| !used.contains(port))
        .ok_or(RegistryError::ResourceExhausted {
            resource: ResourceKind::Port,
            bound: u32::from(config.port_max) + 1,
        })
}

/// Smallest Redis DB index ≥ 0 not assigned to any project.
pub fn next_redis_db(registry: &Registry, config: &Config) -> Result<u32, RegistryError> {
    let used = registry.used_redis_dbs();
    (0..=config.redis_db_max)
        .find(|db| !used.contains(db))
        .ok_or(RegistryError::ResourceExhausted {
            resource: ResourceKind::RedisDb,
            bound: config.redis_db_max + 1,
        })
}
