// src/project/mod.rs
pub mod error;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use error::{ProjectError, ProjectResult};
pub use service::ProjectService;
pub use store::{ProjectRepository, SqliteProjectStore};
pub use types::{
    NewProject, Project, ProjectCounts, ProjectDetails, ProjectId, ProjectOwner, ProjectState,
    ProjectWithCounts, ProjectWithOwners, ProjectsResponse,
};
