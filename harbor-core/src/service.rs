//! Project registry service — scan, reconcile, allocate, persist.
//!
//! [`ProjectService`] is the single writer of the registry. All mutating
//! operations take the internal lock for their whole read-modify-write, so
//! the allocator's "smallest unused" computation can never interleave with
//! another mutation. Commits are staged: the next registry state is built,
//! saved to disk, and only then swapped into memory — a failed operation
//! leaves both memory and disk exactly as they were.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;

use crate::alloc;
use crate::config::Config;
use crate::error::{RegistryError, ResourceKind};
use crate::layout::{self, Layout};
use crate::store;
use crate::types::{pretty_name_from, Project, ProjectName, Registry};

// ---------------------------------------------------------------------------
// Collaborator capabilities
// ---------------------------------------------------------------------------

/// Ordered one-way text sink for streamed script output.
///
/// The service guarantees delivery is serialized (never invoked
/// concurrently with itself) and in arrival order.
pub trait LineSink {
    fn line(&mut self, line: &str);
}

impl<F: FnMut(&str)> LineSink for F {
    fn line(&mut self, line: &str) {
        self(line)
    }
}

/// The script-execution collaborator: materializes a new project on disk
/// from the boilerplate template and reports whether the external process
/// exited successfully.
pub trait ScriptRunner {
    fn execute(&self, request: &NewProjectRequest, sink: &mut dyn LineSink) -> bool;
}

/// Parameters handed to the boilerplate-creation collaborator.
#[derive(Debug, Clone)]
pub struct NewProjectRequest {
    pub name: ProjectName,
    pub pretty_name: String,
    pub port: u16,
    pub redis_db: u32,
}

// ---------------------------------------------------------------------------
// Operation inputs / outputs
// ---------------------------------------------------------------------------

/// Partial update for [`ProjectService::update_project`]. `None` fields are
/// left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub pretty_name: Option<String>,
    pub port: Option<u16>,
    pub redis_db: Option<u32>,
}

/// Outcome summary of a [`ProjectService::scan_and_reconcile`] pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Directories that entered the registry this pass.
    pub added: Vec<ProjectName>,
    /// Known projects whose layout fields changed.
    pub refreshed: Vec<ProjectName>,
    /// Registry entries whose directory no longer exists. Retained —
    /// deletion is an explicit user action, never implicit.
    pub missing: Vec<ProjectName>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Owns the registry and its scoped lock. The UI layer holds one instance
/// and issues one operation at a time; the lock makes the mutating
/// operations mutually exclusive regardless.
pub struct ProjectService {
    config: Config,
    registry: Mutex<Registry>,
}

impl ProjectService {
    /// Load (or initialize empty) the registry under the configured root.
    pub fn open(config: Config) -> Result<Self, RegistryError> {
        let registry = store::load_at(&config.projects_root)?;
        tracing::debug!(
            root = %config.projects_root.display(),
            projects = registry.len(),
            "registry loaded",
        );
        Ok(Self {
            config,
            registry: Mutex::new(registry),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current registry contents in insertion order, most-recently-created last.
    pub fn list_projects(&self) -> Vec<Project> {
        self.lock().iter().cloned().collect()
    }

    pub fn get_project(&self, name: &ProjectName) -> Option<Project> {
        self.lock().get(name).cloned()
    }

    /// Read-only allocator probe for the UI's new-project form.
    pub fn next_free_port(&self) -> Result<u16, RegistryError> {
        alloc::next_port(&self.lock(), &self.config)
    }

    /// Read-only allocator probe for the UI's new-project form.
    pub fn next_free_redis_db(&self) -> Result<u32, RegistryError> {
        alloc::next_redis_db(&self.lock(), &self.config)
    }

    /// Reconcile the registry with the projects root.
    ///
    /// New directories get a fresh port/Redis DB and a detected layout.
    /// Known entries only have their layout refreshed — `port`, `redis_db`,
    /// and `created_at` are sticky and never change on rescan. Entries whose
    /// directory is gone are retained and reported as missing.
    pub fn scan_and_reconcile(&self) -> Result<ScanReport, RegistryError> {
        let mut registry = self.lock();
        let root = &self.config.projects_root;
        if !root.exists() {
            std::fs::create_dir_all(root).map_err(|e| crate::error::io_err(root, e))?;
        }

        let mut report = ScanReport::default();
        let mut next = registry.clone();
        let mut changed = false;

        for name in list_project_dirs(root)? {
            let dir = root.join(&name.0);
            let detected = layout::detect_layout(&dir, &name)?;

            match next.get_mut(&name) {
                Some(existing) => {
                    if existing.frontend_path != detected.frontend
                        || existing.backend_path != detected.backend
                    {
                        existing.frontend_path = detected.frontend;
                        existing.backend_path = detected.backend;
                        report.refreshed.push(name.clone());
                        changed = true;
                    }
                }
                None => {
                    let port = alloc::next_port(&next, &self.config)?;
                    let redis_db = alloc::next_redis_db(&next, &self.config)?;
                    tracing::info!(%name, port, redis_db, "discovered project");
                    next.insert(Project {
                        pretty_name: pretty_name_from(&name.0),
                        directory: dir,
                        port,
                        redis_db,
                        frontend_path: detected.frontend,
                        backend_path: detected.backend,
                        created_at: Utc::now(),
                        extra: serde_json::Map::new(),
                        name: name.clone(),
                    });
                    report.added.push(name);
                    changed = true;
                }
            }
        }

        for project in next.iter() {
            if !project.directory.exists() {
                report.missing.push(project.name.clone());
            }
        }

        if changed {
            store::save_at(root, &next)?;
            *registry = next;
        }
        tracing::debug!(
            added = report.added.len(),
            refreshed = report.refreshed.len(),
            missing = report.missing.len(),
            "scan complete",
        );
        Ok(report)
    }

    /// Create a new project via the boilerplate collaborator.
    ///
    /// Validates name and resource uniqueness first, then runs the script,
    /// streaming its output lines to `sink` as they arrive. Only on script
    /// success is the entry inserted and persisted; any failure leaves the
    /// registry untouched. Runs to completion or failure — no cancellation.
    pub fn create_project(
        &self,
        request: NewProjectRequest,
        runner: &dyn ScriptRunner,
        sink: &mut dyn LineSink,
    ) -> Result<Project, RegistryError> {
        if request.name.0.trim().is_empty() {
            return Err(RegistryError::InvalidProjectName);
        }

        let mut registry = self.lock();
        if registry.contains(&request.name) {
            return Err(RegistryError::DuplicateProject {
                name: request.name.clone(),
            });
        }
        check_resource_free(&registry, None, ResourceKind::Port, u32::from(request.port))?;
        check_resource_free(&registry, None, ResourceKind::RedisDb, request.redis_db)?;

        tracing::info!(name = %request.name, port = request.port, redis_db = request.redis_db,
            "running boilerplate script");
        if !runner.execute(&request, sink) {
            tracing::warn!(name = %request.name, "boilerplate script reported failure");
            return Err(RegistryError::ScriptExecutionFailed {
                name: request.name.clone(),
            });
        }

        let directory = self.config.projects_root.join(&request.name.0);
        let detected = if directory.exists() {
            layout::detect_layout(&directory, &request.name).unwrap_or_default()
        } else {
            Layout::default()
        };

        let project = Project {
            name: request.name,
            pretty_name: request.pretty_name,
            directory,
            port: request.port,
            redis_db: request.redis_db,
            frontend_path: detected.frontend,
            backend_path: detected.backend,
            created_at: Utc::now(),
            extra: serde_json::Map::new(),
        };

        let mut next = registry.clone();
        next.insert(project.clone());
        store::save_at(&self.config.projects_root, &next)?;
        *registry = next;
        Ok(project)
    }

    /// Remove a project from the registry and persist.
    ///
    /// Registry metadata only — the project directory, databases, and
    /// remotes are never touched here.
    pub fn delete_project(&self, name: &ProjectName) -> Result<Project, RegistryError> {
        let mut registry = self.lock();
        let mut next = registry.clone();
        let removed = next
            .remove(name)
            .ok_or_else(|| RegistryError::ProjectNotFound { name: name.clone() })?;

        store::save_at(&self.config.projects_root, &next)?;
        *registry = next;
        tracing::info!(%name, "project removed from registry");
        Ok(removed)
    }

    /// Apply a partial update to an existing entry and persist.
    ///
    /// Port/Redis DB uniqueness is re-validated against all *other* entries
    /// before anything is committed.
    pub fn update_project(
        &self,
        name: &ProjectName,
        update: ProjectUpdate,
    ) -> Result<Project, RegistryError> {
        let mut registry = self.lock();
        if !registry.contains(name) {
            return Err(RegistryError::ProjectNotFound { name: name.clone() });
        }
        if let Some(port) = update.port {
            check_resource_free(&registry, Some(name), ResourceKind::Port, u32::from(port))?;
        }
        if let Some(redis_db) = update.redis_db {
            check_resource_free(&registry, Some(name), ResourceKind::RedisDb, redis_db)?;
        }

        let mut next = registry.clone();
        // contains() checked above; the entry is present in the clone too.
        if let Some(project) = next.get_mut(name) {
            if let Some(pretty_name) = update.pretty_name {
                project.pretty_name = pretty_name;
            }
            if let Some(port) = update.port {
                project.port = port;
            }
            if let Some(redis_db) = update.redis_db {
                project.redis_db = redis_db;
            }
        }

        store::save_at(&self.config.projects_root, &next)?;
        *registry = next;
        let updated = registry.get(name).cloned();
        updated.ok_or_else(|| RegistryError::ProjectNotFound { name: name.clone() })
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        // Every commit happens after validation and a successful save, so a
        // poisoned lock still guards a consistent registry.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fail with [`RegistryError::ResourceConflict`] if `value` is held by any
/// project other than `exclude`.
fn check_resource_free(
    registry: &Registry,
    exclude: Option<&ProjectName>,
    resource: ResourceKind,
    value: u32,
) -> Result<(), RegistryError> {
    let holder = registry.iter().find(|p| {
        let held = match resource {
            ResourceKind::Port => u32::from(p.port),
            ResourceKind::RedisDb => p.redis_db,
        };
        held == value && Some(&p.name) != exclude
    });
    match holder {
        Some(p) => Err(RegistryError::ResourceConflict {
            resource,
            value,
            holder: p.name.clone(),
        }),
        None => Ok(()),
    }
}

/// Immediate subdirectories of the projects root, sorted by name so
/// allocation order is deterministic. Hidden directories are skipped.
fn list_project_dirs(root: &Path) -> Result<Vec<ProjectName>, RegistryError> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(root).map_err(|e| crate::error::io_err(root, e))? {
        let entry = entry.map_err(|e| crate::error::io_err(root, e))?;
        let is_dir = entry
            .file_type()
            .map_err(|e| crate::error::io_err(entry.path(), e))?
            .is_dir();
        if !is_dir {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        names.push(ProjectName::from(name));
    }
    names.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Script collaborator stub: records invocations, emits canned lines.
    struct StubRunner {
        pub succeed: bool,
        pub lines: Vec<String>,
    }

    impl ScriptRunner for StubRunner {
        fn execute(&self, request: &NewProjectRequest, sink: &mut dyn LineSink) -> bool {
            for line in &self.lines {
                sink.line(line);
            }
            sink.line(&format!("created {}", request.name));
            self.succeed
        }
    }

    fn service(root: &TempDir) -> ProjectService {
        ProjectService::open(Config::at_root(root.path())).expect("open")
    }

    #[test]
    fn open_on_empty_root_is_empty() {
        let root = TempDir::new().expect("tempdir");
        let svc = service(&root);
        assert!(svc.list_projects().is_empty());
    }

    #[test]
    fn create_streams_lines_in_order() {
        let root = TempDir::new().expect("tempdir");
        let svc = service(&root);
        let runner = StubRunner {
            succeed: true,
            lines: vec!["one".into(), "two".into()],
        };

        let mut seen = Vec::new();
        let mut sink = |line: &str| seen.push(line.to_string());
        svc.create_project(
            NewProjectRequest {
                name: ProjectName::from("alpha"),
                pretty_name: "Alpha".into(),
                port: 3000,
                redis_db: 0,
            },
            &runner,
            &mut sink,
        )
        .expect("create");

        assert_eq!(seen, vec!["one", "two", "created alpha"]);
    }

    #[test]
    fn empty_name_rejected() {
        let root = TempDir::new().expect("tempdir");
        let svc = service(&root);
        let runner = StubRunner {
            succeed: true,
            lines: vec![],
        };
        let err = svc
            .create_project(
                NewProjectRequest {
                    name: ProjectName::from("  "),
                    pretty_name: "X".into(),
                    port: 3000,
                    redis_db: 0,
                },
                &runner,
                &mut |_: &str| {},
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidProjectName));
    }
}
