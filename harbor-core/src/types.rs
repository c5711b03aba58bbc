//! Domain types for the Harbor registry.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Persisted types are serializable/deserializable via serde + serde_json.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a project in the registry.
///
/// Derived from the project's directory name under the projects root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectName(pub String);

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A local development project managed by Harbor.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: ProjectName,
    /// Human-readable display name.
    pub pretty_name: String,
    /// Absolute path to the project's top-level directory. Derived from the
    /// projects root at load time; the filesystem owns it, not the registry.
    pub directory: PathBuf,
    /// Dev-server port. Unique across the registry.
    pub port: u16,
    /// Redis database index. Unique across the registry.
    pub redis_db: u32,
    /// Frontend sub-path relative to `directory`, if a layout was detected.
    pub frontend_path: Option<PathBuf>,
    /// Backend sub-path relative to `directory`, if a layout was detected.
    pub backend_path: Option<PathBuf>,
    /// Set once when the project first enters the registry.
    pub created_at: DateTime<Utc>,
    /// Persisted fields this version doesn't know about. Carried through a
    /// load/save cycle untouched.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Project {
    /// `https://app.<name>.test`
    pub fn frontend_url(&self) -> String {
        format!("https://app.{}.test", self.name)
    }

    /// `https://api.<name>.test`
    pub fn backend_url(&self) -> String {
        format!("https://api.{}.test", self.name)
    }
}

/// Derive a display name from a directory name: `-`/`_` become spaces,
/// words are title-cased. `"cop-now"` → `"Cop Now"`.
pub fn pretty_name_from(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The in-memory registry: an insertion-ordered collection of projects,
/// keyed by name. Insertion order is the persisted document order, so
/// listing yields most-recently-created last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    projects: Vec<Project>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn contains(&self, name: &ProjectName) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &ProjectName) -> Option<&Project> {
        self.projects.iter().find(|p| &p.name == name)
    }

    pub fn get_mut(&mut self, name: &ProjectName) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| &p.name == name)
    }

    /// Append a project. Callers are responsible for the uniqueness checks;
    /// the registry itself only preserves order.
    pub fn insert(&mut self, project: Project) {
        self.projects.push(project);
    }

    pub fn remove(&mut self, name: &ProjectName) -> Option<Project> {
        let idx = self.projects.iter().position(|p| &p.name == name)?;
        Some(self.projects.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    pub fn used_ports(&self) -> BTreeSet<u16> {
        self.projects.iter().map(|p| p.port).collect()
    }

    pub fn used_redis_dbs(&self) -> BTreeSet<u32> {
        self.projects.iter().map(|p| p.redis_db).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, port: u16, redis_db: u32) -> Project {
        Project {
            name: ProjectName::from(name),
            pretty_name: pretty_name_from(name),
            directory: PathBuf::from("/projects").join(name),
            port,
            redis_db,
            frontend_path: None,
            backend_path: None,
            created_at: Utc::now(),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn newtype_display() {
        assert_eq!(ProjectName::from("copnow").to_string(), "copnow");
    }

    #[test]
    fn newtype_equality() {
        assert_eq!(ProjectName::from("x"), ProjectName::from(String::from("x")));
    }

    #[test]
    fn pretty_name_title_cases_separators() {
        assert_eq!(pretty_name_from("cop-now"), "Cop Now");
        assert_eq!(pretty_name_from("my_app"), "My App");
        assert_eq!(pretty_name_from("solo"), "Solo");
    }

    #[test]
    fn derived_urls() {
        let p = project("copnow", 3000, 0);
        assert_eq!(p.frontend_url(), "https://app.copnow.test");
        assert_eq!(p.backend_url(), "https://api.copnow.test");
    }

    #[test]
    fn registry_preserves_insertion_order() {
        let mut reg = Registry::new();
        reg.insert(project("beta", 3000, 0));
        reg.insert(project("alpha", 3001, 1));
        let names: Vec<_> = reg.iter().map(|p| p.name.0.clone()).collect();
        assert_eq!(names, vec!["beta", "alpha"]);
    }

    #[test]
    fn registry_remove_returns_entry() {
        let mut reg = Registry::new();
        reg.insert(project("alpha", 3000, 0));
        let removed = reg.remove(&ProjectName::from("alpha")).expect("removed");
        assert_eq!(removed.port, 3000);
        assert!(reg.is_empty());
        assert!(reg.remove(&ProjectName::from("alpha")).is_none());
    }

    #[test]
    fn used_sets_collect_all_assignments() {
        let mut reg = Registry::new();
        reg.insert(project("a", 3000, 0));
        reg.insert(project("b", 3002, 5));
        assert_eq!(reg.used_ports(), BTreeSet::from([3000, 3002]));
        assert_eq!(reg.used_redis_dbs(), BTreeSet::from([0, 5]));
    }
}
