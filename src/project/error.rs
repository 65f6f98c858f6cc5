// src/project/error.rs

use thiserror::Error;

use super::types::ProjectId;

pub const LOOKUP_PROJECT: &str = "Error looking up project.";
pub const LOOKUP_PROJECTS: &str = "Error looking up projects.";
pub const LOOKUP_COUNTS: &str = "Error looking up project counts.";

/// Failures surfaced by the project service. Every variant aborts the
/// request; none carries a partial result.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("{message}")]
    Lookup {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Project {0} not found.")]
    NotFound(ProjectId),

    #[error("Error creating project.")]
    Creation(#[source] anyhow::Error),

    #[error("Error storing project owner.")]
    OwnerAssociation(#[source] anyhow::Error),

    #[error("Error storing project like.")]
    Like(#[source] anyhow::Error),

    #[error("Unsupported operation.")]
    UnsupportedOperation,
}

impl ProjectError {
    pub fn lookup(message: &'static str, source: anyhow::Error) -> Self {
        ProjectError::Lookup { message, source }
    }
}

pub type ProjectResult<T> = Result<T, ProjectError>;
