//! Registry persistence: a single JSON document under the projects root.
//!
//! # On-disk format
//!
//! ```text
//! <projects_root>/.projects.json
//! {
//!   "alpha": { "pretty_name": "Alpha", "port": 3000, "redis_db": 0,
//!              "created_at": "...", "frontend_path": "www", "backend_path": "api" },
//!   ...
//! }
//! ```
//!
//! Entry order in the document is registry insertion order and is preserved
//! across a load/save cycle, as are per-entry fields this version doesn't
//! know about. Write flow: serialize → `.tmp` sibling → `rename`, so an
//! interrupted save never corrupts the document.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::registry_path_at;
use crate::error::{io_err, RegistryError};
use crate::types::{Project, ProjectName, Registry};

/// One persisted registry entry. The project name is the document key and
/// the directory is derived from the projects root, so neither is a field.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedProject {
    pretty_name: String,
    port: u16,
    redis_db: u32,
    created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frontend_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backend_path: Option<PathBuf>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl PersistedProject {
    fn into_project(self, root: &Path, name: ProjectName) -> Project {
        let directory = root.join(&name.0);
        Project {
            name,
            pretty_name: self.pretty_name,
            directory,
            port: self.port,
            redis_db: self.redis_db,
            frontend_path: self.frontend_path,
            backend_path: self.backend_path,
            created_at: self.created_at,
            extra: self.extra,
        }
    }

    fn from_project(project: &Project) -> Self {
        Self {
            pretty_name: project.pretty_name.clone(),
            port: project.port,
            redis_db: project.redis_db,
            created_at: project.created_at,
            frontend_path: project.frontend_path.clone(),
            backend_path: project.backend_path.clone(),
            extra: project.extra.clone(),
        }
    }
}

/// Load the registry document under `root`.
///
/// Returns an empty registry if the file does not exist (first run).
/// Returns [`RegistryError::CorruptRegistry`] if the content is unreadable
/// as a name → entry mapping.
pub fn load_at(root: &Path) -> Result<Registry, RegistryError> {
    let path = registry_path_at(root);
    if !path.exists() {
        return Ok(Registry::new());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;

    let document: Map<String, Value> =
        serde_json::from_str(&contents).map_err(|e| RegistryError::CorruptRegistry {
            path: path.clone(),
            source: e,
        })?;

    let mut registry = Registry::new();
    for (name, value) in document {
        let entry: PersistedProject =
            serde_json::from_value(value).map_err(|e| RegistryError::CorruptRegistry {
                path: path.clone(),
                source: e,
            })?;
        registry.insert(entry.into_project(root, ProjectName::from(name)));
    }
    Ok(registry)
}

/// Atomically save the full registry state under `root`.
///
/// Write flow: serialize → `.projects.json.tmp` sibling → `rename`.
/// The `.tmp` lives in the same directory as the target (same filesystem).
pub fn save_at(root: &Path, registry: &Registry) -> Result<(), RegistryError> {
    if !root.exists() {
        std::fs::create_dir_all(root).map_err(|e| io_err(root, e))?;
    }

    let mut document = Map::new();
    for project in registry.iter() {
        document.insert(
            project.name.0.clone(),
            serde_json::to_value(PersistedProject::from_project(project))?,
        );
    }

    let path = registry_path_at(root);
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(&Value::Object(document))?;
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pretty_name_from;
    use chrono::Utc;
    use tempfile::TempDir;

    fn project(root: &Path, name: &str, port: u16, redis_db: u32) -> Project {
        Project {
            name: ProjectName::from(name),
            pretty_name: pretty_name_from(name),
            directory: root.join(name),
            port,
            redis_db,
            frontend_path: None,
            backend_path: None,
            created_at: Utc::now(),
            extra: Map::new(),
        }
    }

    #[test]
    fn missing_file_is_empty_registry() {
        let root = TempDir::new().expect("tempdir");
        let registry = load_at(root.path()).expect("load");
        assert!(registry.is_empty());
    }

    #[test]
    fn roundtrip_preserves_entries_and_order() {
        let root = TempDir::new().expect("tempdir");
        let mut registry = Registry::new();
        registry.insert(project(root.path(), "beta", 3001, 1));
        registry.insert(project(root.path(), "alpha", 3000, 0));

        save_at(root.path(), &registry).expect("save");
        let loaded = load_at(root.path()).expect("load");

        let names: Vec<_> = loaded.iter().map(|p| p.name.0.clone()).collect();
        assert_eq!(names, vec!["beta", "alpha"], "document order is insertion order");
        assert_eq!(loaded.get(&ProjectName::from("alpha")).expect("alpha").port, 3000);
    }

    #[test]
    fn directory_derived_from_root_and_name() {
        let root = TempDir::new().expect("tempdir");
        let mut registry = Registry::new();
        registry.insert(project(root.path(), "alpha", 3000, 0));
        save_at(root.path(), &registry).expect("save");

        let loaded = load_at(root.path()).expect("load");
        let alpha = loaded.get(&ProjectName::from("alpha")).expect("alpha");
        assert_eq!(alpha.directory, root.path().join("alpha"));
    }

    #[test]
    fn null_layout_fields_survive_roundtrip() {
        let root = TempDir::new().expect("tempdir");
        let mut registry = Registry::new();
        registry.insert(project(root.path(), "bare", 3000, 0));
        save_at(root.path(), &registry).expect("save");

        let raw = std::fs::read_to_string(registry_path_at(root.path())).expect("read");
        assert!(
            !raw.contains("frontend_path"),
            "absent layout must be omitted, not serialized as null or empty string"
        );

        let loaded = load_at(root.path()).expect("load");
        let bare = loaded.get(&ProjectName::from("bare")).expect("bare");
        assert_eq!(bare.frontend_path, None);
        assert_eq!(bare.backend_path, None);
    }

    #[test]
    fn unknown_fields_preserved_across_roundtrip() {
        let root = TempDir::new().expect("tempdir");
        let path = registry_path_at(root.path());
        std::fs::write(
            &path,
            r#"{"alpha":{"pretty_name":"Alpha","port":3000,"redis_db":0,
                "created_at":"2024-01-01T00:00:00Z","editor_theme":"solarized"}}"#,
        )
        .expect("write");

        let loaded = load_at(root.path()).expect("load");
        save_at(root.path(), &loaded).expect("save");

        let raw = std::fs::read_to_string(&path).expect("read");
        assert!(raw.contains("editor_theme"), "unknown field dropped: {raw}");
        assert!(raw.contains("solarized"));
    }

    #[test]
    fn corrupt_document_reports_path() {
        let root = TempDir::new().expect("tempdir");
        let path = registry_path_at(root.path());
        std::fs::write(&path, b"{ not json").expect("write");

        let err = load_at(root.path()).unwrap_err();
        assert!(matches!(err, RegistryError::CorruptRegistry { .. }), "got: {err}");
        assert!(err.to_string().contains(".projects.json"));
    }

    #[test]
    fn wrong_shape_document_is_corrupt() {
        let root = TempDir::new().expect("tempdir");
        std::fs::write(registry_path_at(root.path()), b"[1, 2, 3]").expect("write");
        let err = load_at(root.path()).unwrap_err();
        assert!(matches!(err, RegistryError::CorruptRegistry { .. }));
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let root = TempDir::new().expect("tempdir");
        save_at(root.path(), &Registry::new()).expect("save");
        let tmp = registry_path_at(root.path()).with_extension("json.tmp");
        assert!(!tmp.exists(), ".tmp must be gone after successful save");
    }
}
