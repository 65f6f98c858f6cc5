// src/project/service.rs
// Visibility rules, aggregate counts and owner-bound creation for projects

use futures::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::error::{
    LOOKUP_COUNTS, LOOKUP_PROJECT, LOOKUP_PROJECTS, ProjectError, ProjectResult,
};
use super::store::ProjectRepository;
use super::types::{
    NewProject, Project, ProjectCounts, ProjectDetails, ProjectId, ProjectState,
    ProjectWithCounts, ProjectWithOwners,
};
use crate::auth::Caller;

pub struct ProjectService {
    store: Arc<dyn ProjectRepository>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn ProjectRepository>) -> Self {
        Self { store }
    }

    /// Fetch one project with its owners and like metadata for `caller`.
    ///
    /// Drafts are reported as missing to anyone outside their owner set.
    pub async fn get_project(
        &self,
        id: ProjectId,
        caller: Option<&Caller>,
    ) -> ProjectResult<ProjectDetails> {
        let project = self
            .store
            .find_project(id)
            .await
            .map_err(|e| ProjectError::lookup(LOOKUP_PROJECT, e))?
            .ok_or(ProjectError::NotFound(id))?;

        self.with_metadata(project, caller).await
    }

    /// List the projects in `state`, followed by the caller's own drafts that
    /// the state query did not already return.
    ///
    /// `draft` is never enumerated publicly: with that state only the
    /// caller's drafts come back, and an anonymous caller gets nothing.
    pub async fn list_projects(
        &self,
        state: &ProjectState,
        caller: Option<&Caller>,
    ) -> ProjectResult<Vec<ProjectWithCounts>> {
        let mut projects = if state.is_draft() {
            Vec::new()
        } else {
            let found = self
                .store
                .find_projects_by_state(state)
                .await
                .map_err(|e| ProjectError::lookup(LOOKUP_PROJECTS, e))?;
            self.add_counts(found).await?
        };

        let Some(caller) = caller else {
            return Ok(projects);
        };

        let owned = self
            .store
            .find_owners_by_user(&caller.id)
            .await
            .map_err(|e| ProjectError::lookup(LOOKUP_PROJECTS, e))?;

        let listed: HashSet<ProjectId> = projects.iter().map(|p| p.project.id).collect();
        let mut seen = HashSet::new();
        let unlisted: Vec<ProjectId> = owned
            .iter()
            .map(|owner| owner.project_id)
            .filter(|id| !listed.contains(id) && seen.insert(*id))
            .collect();

        if unlisted.is_empty() {
            return Ok(projects);
        }

        let drafts = self
            .store
            .find_projects_in_state(&unlisted, &ProjectState::Draft)
            .await
            .map_err(|e| ProjectError::lookup(LOOKUP_PROJECTS, e))?;

        debug!(
            user_id = %caller.id,
            listed = projects.len(),
            drafts = drafts.len(),
            "Merging caller-owned drafts"
        );

        projects.extend(self.add_counts(drafts).await?);
        Ok(projects)
    }

    /// Create a project and make `caller` its owner.
    ///
    /// If the owner link cannot be stored the new project is deleted again
    /// before the error is returned.
    pub async fn create_project(
        &self,
        new_project: NewProject,
        caller: &Caller,
    ) -> ProjectResult<ProjectWithOwners> {
        let project = self
            .store
            .create_project(&new_project)
            .await
            .map_err(ProjectError::Creation)?;

        let owner = match self.store.create_owner(project.id, &caller.id).await {
            Ok(owner) => owner,
            Err(e) => {
                self.discard_orphan(project.id).await;
                return Err(ProjectError::OwnerAssociation(e));
            }
        };

        info!(
            project_id = project.id,
            user_id = %caller.id,
            state = %project.state,
            "Created project: {}",
            project.title
        );

        Ok(ProjectWithOwners {
            project,
            owners: vec![owner],
        })
    }

    pub async fn like_project(
        &self,
        id: ProjectId,
        caller: &Caller,
    ) -> ProjectResult<ProjectDetails> {
        self.get_project(id, Some(caller)).await?;
        self.store
            .add_like(id, &caller.id)
            .await
            .map_err(ProjectError::Like)?;
        self.get_project(id, Some(caller)).await
    }

    pub async fn unlike_project(
        &self,
        id: ProjectId,
        caller: &Caller,
    ) -> ProjectResult<ProjectDetails> {
        self.get_project(id, Some(caller)).await?;
        self.store
            .remove_like(id, &caller.id)
            .await
            .map_err(ProjectError::Like)?;
        self.get_project(id, Some(caller)).await
    }

    async fn with_metadata(
        &self,
        project: Project,
        caller: Option<&Caller>,
    ) -> ProjectResult<ProjectDetails> {
        let caller_id = caller.map(|c| c.id.as_str());

        let (owners, like_count, like) = tokio::try_join!(
            self.store.find_owners_by_project(project.id),
            self.store.count_likes(project.id),
            async {
                match caller_id {
                    Some(user_id) => self.store.has_liked(project.id, user_id).await,
                    None => Ok(false),
                }
            },
        )
        .map_err(|e| ProjectError::lookup(LOOKUP_PROJECT, e))?;

        let is_owner = caller_id.is_some_and(|id| owners.iter().any(|o| o.user_id == id));
        if project.state.is_draft() && !is_owner {
            return Err(ProjectError::NotFound(project.id));
        }

        Ok(ProjectDetails {
            project,
            owners,
            is_owner,
            like_count,
            like,
        })
    }

    async fn add_counts(&self, projects: Vec<Project>) -> ProjectResult<Vec<ProjectWithCounts>> {
        try_join_all(projects.into_iter().map(|project| self.with_counts(project))).await
    }

    async fn with_counts(&self, project: Project) -> ProjectResult<ProjectWithCounts> {
        let (comment_count, owner_count, task_count) = tokio::try_join!(
            self.store.count_comments(project.id),
            self.store.count_owners(project.id),
            self.store.count_tasks(project.id),
        )
        .map_err(|e| ProjectError::lookup(LOOKUP_COUNTS, e))?;

        Ok(ProjectWithCounts {
            project,
            counts: ProjectCounts {
                comment_count,
                owner_count,
                task_count,
            },
        })
    }

    async fn discard_orphan(&self, id: ProjectId) {
        match self.store.delete_project(id).await {
            Ok(_) => warn!(project_id = id, "Removed project left without an owner"),
            Err(e) => error!(
                project_id = id,
                "Failed to remove project left without an owner: {:?}", e
            ),
        }
    }
}
