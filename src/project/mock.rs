// src/project/mock.rs
//
// In-memory ProjectRepository for service tests, with per-call failure
// injection. Compiled only under #[cfg(test)].

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::store::ProjectRepository;
use super::types::{NewProject, Project, ProjectId, ProjectOwner, ProjectState};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailPoint {
    FindProject,
    FindProjectsByState,
    FindProjectsInState,
    FindOwnersByUser,
    CommentCount(ProjectId),
    CreateProject,
    CreateOwner,
    DeleteProject,
}

#[derive(Default)]
pub struct MockProjectStore {
    pub projects: RwLock<Vec<Project>>,
    pub owners: RwLock<Vec<ProjectOwner>>,
    pub comments: RwLock<HashMap<ProjectId, i64>>,
    pub tasks: RwLock<HashMap<ProjectId, i64>>,
    pub likes: RwLock<HashSet<(ProjectId, String)>>,
    failures: RwLock<HashSet<FailPoint>>,
    mutations: AtomicUsize,
}

impl MockProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_on(&self, point: FailPoint) {
        self.failures.write().await.insert(point);
    }

    /// Number of writes that reached the store.
    pub fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    pub async fn seed_project(&self, title: &str, state: ProjectState) -> ProjectId {
        let mut projects = self.projects.write().await;
        let id = projects.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let now = Utc::now();
        projects.push(Project {
            id,
            title: title.to_string(),
            description: None,
            state,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub async fn seed_owner(&self, project_id: ProjectId, user_id: &str) {
        let mut owners = self.owners.write().await;
        let id = owners.len() as i64 + 1;
        owners.push(ProjectOwner {
            id,
            project_id,
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        });
    }

    pub async fn seed_counts(&self, project_id: ProjectId, comments: i64, tasks: i64) {
        self.comments.write().await.insert(project_id, comments);
        self.tasks.write().await.insert(project_id, tasks);
    }

    async fn check(&self, point: FailPoint) -> Result<()> {
        if self.failures.read().await.contains(&point) {
            return Err(anyhow!("injected failure at {:?}", point));
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for MockProjectStore {
    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>> {
        self.check(FailPoint::FindProject).await?;
        Ok(self.projects.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn find_projects_by_state(&self, state: &ProjectState) -> Result<Vec<Project>> {
        self.check(FailPoint::FindProjectsByState).await?;
        Ok(self
            .projects
            .read()
            .await
            .iter()
            .filter(|p| &p.state == state)
            .cloned()
            .collect())
    }

    async fn find_projects_in_state(
        &self,
        ids: &[ProjectId],
        state: &ProjectState,
    ) -> Result<Vec<Project>> {
        self.check(FailPoint::FindProjectsInState).await?;
        Ok(self
            .projects
            .read()
            .await
            .iter()
            .filter(|p| &p.state == state && ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create_project(&self, new_project: &NewProject) -> Result<Project> {
        self.check(FailPoint::CreateProject).await?;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let id = self
            .seed_project(&new_project.title, new_project.state.clone())
            .await;
        let mut projects = self.projects.write().await;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| anyhow!("project {} vanished", id))?;
        project.description = new_project.description.clone();
        Ok(project.clone())
    }

    async fn delete_project(&self, id: ProjectId) -> Result<bool> {
        self.check(FailPoint::DeleteProject).await?;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut projects = self.projects.write().await;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        Ok(projects.len() < before)
    }

    async fn count_comments(&self, project_id: ProjectId) -> Result<i64> {
        self.check(FailPoint::CommentCount(project_id)).await?;
        Ok(self.comments.read().await.get(&project_id).copied().unwrap_or(0))
    }

    async fn count_owners(&self, project_id: ProjectId) -> Result<i64> {
        Ok(self
            .owners
            .read()
            .await
            .iter()
            .filter(|o| o.project_id == project_id)
            .count() as i64)
    }

    async fn count_tasks(&self, project_id: ProjectId) -> Result<i64> {
        Ok(self.tasks.read().await.get(&project_id).copied().unwrap_or(0))
    }

    async fn find_owners_by_project(&self, project_id: ProjectId) -> Result<Vec<ProjectOwner>> {
        Ok(self
            .owners
            .read()
            .await
            .iter()
            .filter(|o| o.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn find_owners_by_user(&self, user_id: &str) -> Result<Vec<ProjectOwner>> {
        self.check(FailPoint::FindOwnersByUser).await?;
        Ok(self
            .owners
            .read()
            .await
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_owner(&self, project_id: ProjectId, user_id: &str) -> Result<ProjectOwner> {
        self.check(FailPoint::CreateOwner).await?;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.seed_owner(project_id, user_id).await;
        self.owners
            .read()
            .await
            .last()
            .cloned()
            .ok_or_else(|| anyhow!("owner for project {} vanished", project_id))
    }

    async fn count_likes(&self, project_id: ProjectId) -> Result<i64> {
        Ok(self
            .likes
            .read()
            .await
            .iter()
            .filter(|(id, _)| *id == project_id)
            .count() as i64)
    }

    async fn has_liked(&self, project_id: ProjectId, user_id: &str) -> Result<bool> {
        Ok(self
            .likes
            .read()
            .await
            .contains(&(project_id, user_id.to_string())))
    }

    async fn add_like(&self, project_id: ProjectId, user_id: &str) -> Result<()> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.likes
            .write()
            .await
            .insert((project_id, user_id.to_string()));
        Ok(())
    }

    async fn remove_like(&self, project_id: ProjectId, user_id: &str) -> Result<bool> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .likes
            .write()
            .await
            .remove(&(project_id, user_id.to_string())))
    }
}
