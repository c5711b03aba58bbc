//! Harbor core library — project discovery and registry.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`error`] — [`RegistryError`]
//! - [`config`] — projects root and resource bounds
//! - [`layout`] — frontend/backend layout detection
//! - [`alloc`] — next free port / Redis DB
//! - [`store`] — registry document load / save
//! - [`service`] — [`ProjectService`], the orchestrating API

pub mod alloc;
pub mod config;
pub mod error;
pub mod layout;
pub mod service;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{RegistryError, ResourceKind};
pub use layout::Layout;
pub use service::{
    LineSink, NewProjectRequest, ProjectService, ProjectUpdate, ScanReport, ScriptRunner,
};
pub use types::{pretty_name_from, Project, ProjectName, Registry};
