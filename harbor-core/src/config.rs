//! Harbor configuration: projects root, resource bounds, script location.
//!
//! Every path-dependent API in this workspace takes an explicit root (the
//! `_at` discipline), so tests never touch the real home directory.
//! [`Config::from_home`] is the one place the home directory is resolved.

use std::path::{Path, PathBuf};

use crate::error::RegistryError;

/// File name of the persisted registry document, under the projects root.
pub const REGISTRY_FILE_NAME: &str = ".projects.json";

/// First port the allocator hands out.
pub const DEFAULT_PORT_BASE: u16 = 3000;

/// Highest port the allocator will hand out (inclusive).
pub const DEFAULT_PORT_MAX: u16 = 3999;

/// Highest Redis DB index the allocator will hand out (inclusive).
pub const DEFAULT_REDIS_DB_MAX: u32 = 999;

/// Resolved configuration for a Harbor instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory whose immediate subdirectories are the managed projects.
    pub projects_root: PathBuf,
    /// Lowest port the allocator considers.
    pub port_base: u16,
    /// Highest port the allocator considers (inclusive).
    pub port_max: u16,
    /// Highest Redis DB index the allocator considers (inclusive).
    pub redis_db_max: u32,
    /// The external boilerplate-creation script.
    pub new_project_script: PathBuf,
}

impl Config {
    /// Configuration rooted at an explicit directory. Used by tests and by
    /// the CLI's `--root` override.
    pub fn at_root(projects_root: impl Into<PathBuf>) -> Self {
        let projects_root = projects_root.into();
        let new_project_script = projects_root.join("scripts").join("start-new-project.sh");
        Self {
            projects_root,
            port_base: DEFAULT_PORT_BASE,
            port_max: DEFAULT_PORT_MAX,
            redis_db_max: DEFAULT_REDIS_DB_MAX,
            new_project_script,
        }
    }

    /// Default configuration: `~/projects/personal` as the root,
    /// `~/projects/scripts/start-new-project.sh` as the boilerplate script.
    pub fn from_home() -> Result<Self, RegistryError> {
        let home = dirs::home_dir().ok_or(RegistryError::HomeNotFound)?;
        let projects = home.join("projects");
        Ok(Self {
            projects_root: projects.join("personal"),
            port_base: DEFAULT_PORT_BASE,
            port_max: DEFAULT_PORT_MAX,
            redis_db_max: DEFAULT_REDIS_DB_MAX,
            new_project_script: projects.join("scripts").join("start-new-project.sh"),
        })
    }

    /// `<projects_root>/.projects.json` — pure, no I/O.
    pub fn registry_path(&self) -> PathBuf {
        registry_path_at(&self.projects_root)
    }
}

/// `<root>/.projects.json` — pure, no I/O.
pub fn registry_path_at(root: &Path) -> PathBuf {
    root.join(REGISTRY_FILE_NAME)
}
