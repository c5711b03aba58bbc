//! Frontend/backend layout detection for a project directory.
//!
//! [`classify`] is a pure function over the names of a directory's immediate
//! child directories, so it is testable with synthetic listings.
//! [`detect_layout`] is the thin I/O wrapper that feeds it real contents.
//!
//! Two naming conventions are accepted, fixed names taking precedence over
//! the name-prefixed pattern. Each side resolves independently; a project
//! with no detectable layout is still a valid project.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{io_err, RegistryError};
use crate::types::ProjectName;

/// The detected frontend/backend sub-paths of a project, relative to its
/// top-level directory. `None` on a side means no convention matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub frontend: Option<PathBuf>,
    pub backend: Option<PathBuf>,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.frontend.is_none() && self.backend.is_none()
    }
}

/// Classify a project's layout from the names of its immediate child
/// directories. Pure function; no filesystem access.
///
/// Frontend candidates, in precedence order: `www`, `app`, `{name}-app`.
/// Backend candidates, in precedence order: `api`, `{name}-api`.
pub fn classify(name: &ProjectName, children: &[String]) -> Layout {
    let has = |candidate: &str| children.iter().any(|c| c == candidate);

    let prefixed_app = format!("{name}-app");
    let prefixed_api = format!("{name}-api");

    let frontend = ["www", "app", prefixed_app.as_str()]
        .into_iter()
        .find(|candidate| has(candidate))
        .map(PathBuf::from);

    let backend = ["api", prefixed_api.as_str()]
        .into_iter()
        .find(|candidate| has(candidate))
        .map(PathBuf::from);

    Layout { frontend, backend }
}

/// Detect the layout of the project at `dir` by listing its immediate child
/// directories and delegating to [`classify`].
pub fn detect_layout(dir: &Path, name: &ProjectName) -> Result<Layout, RegistryError> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let is_dir = entry
            .file_type()
            .map_err(|e| io_err(entry.path(), e))?
            .is_dir();
        if is_dir {
            children.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(classify(name, &children))
}
