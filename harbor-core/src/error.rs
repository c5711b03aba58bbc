//! Error types for harbor-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::ProjectName;

/// Which allocatable resource an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Port,
    RedisDb,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Port => write!(f, "port"),
            ResourceKind::RedisDb => write!(f, "Redis DB"),
        }
    }
}

/// All errors that can arise from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted registry document is unreadable or malformed.
    /// The caller decides recovery policy; the data is never silently dropped.
    #[error("corrupt registry at {path}: {source}")]
    CorruptRegistry {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (save path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Name collision on create.
    #[error("project '{name}' already exists")]
    DuplicateProject { name: ProjectName },

    /// The project name is empty or otherwise unusable as an identifier.
    #[error("project name must be a non-empty identifier")]
    InvalidProjectName,

    /// A port or Redis DB is already assigned to another project.
    #[error("{resource} {value} is already assigned to '{holder}'")]
    ResourceConflict {
        resource: ResourceKind,
        value: u32,
        holder: ProjectName,
    },

    /// The allocator found no free value within the configured bound.
    #[error("no free {resource} available below {bound}")]
    ResourceExhausted { resource: ResourceKind, bound: u32 },

    /// The named project is not in the registry.
    #[error("project '{name}' not found")]
    ProjectNotFound { name: ProjectName },

    /// The boilerplate-creation collaborator reported non-zero completion.
    #[error("boilerplate script failed for '{name}'")]
    ScriptExecutionFailed { name: ProjectName },

    /// `dirs::home_dir()` returned `None` — cannot locate the projects root.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Convenience constructor for [`RegistryError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.into(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_holder() {
        let err = RegistryError::ResourceConflict {
            resource: ResourceKind::Port,
            value: 3000,
            holder: ProjectName::from("alpha"),
        };
        assert_eq!(err.to_string(), "port 3000 is already assigned to 'alpha'");
    }

    #[test]
    fn exhausted_message_names_bound() {
        let err = RegistryError::ResourceExhausted {
            resource: ResourceKind::RedisDb,
            bound: 999,
        };
        assert!(err.to_string().contains("Redis DB"));
        assert!(err.to_string().contains("999"));
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(RegistryError::HomeNotFound.to_string().contains("home directory"));
    }
}
