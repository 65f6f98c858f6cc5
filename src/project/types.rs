// src/project/types.rs

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::convert::Infallible;

pub type ProjectId = i64;

/// Visibility tier of a project. `open` is publicly listable, `draft` is
/// restricted to owners; anything else is kept as a trimmed, lowercased name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectState {
    Draft,
    Open,
    Closed,
    Other(String),
}

impl ProjectState {
    pub fn as_str(&self) -> &str {
        match self {
            ProjectState::Draft => "draft",
            ProjectState::Open => "open",
            ProjectState::Closed => "closed",
            ProjectState::Other(s) => s,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, ProjectState::Draft)
    }
}

impl std::fmt::Display for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ProjectState {
    fn from(s: &str) -> Self {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "draft" => ProjectState::Draft,
            "open" => ProjectState::Open,
            "closed" => ProjectState::Closed,
            _ => ProjectState::Other(name),
        }
    }
}

impl From<String> for ProjectState {
    fn from(s: String) -> Self {
        ProjectState::from(s.as_str())
    }
}

impl From<ProjectState> for String {
    fn from(state: ProjectState) -> Self {
        state.as_str().to_string()
    }
}

impl std::str::FromStr for ProjectState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ProjectState::from(s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub state: ProjectState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOwner {
    pub id: i64,
    pub project_id: ProjectId,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCounts {
    pub comment_count: i64,
    pub owner_count: i64,
    pub task_count: i64,
}

/// A listed project, decorated with its aggregate counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWithCounts {
    #[serde(flatten)]
    pub project: Project,
    #[serde(flatten)]
    pub counts: ProjectCounts,
}

/// A freshly created project together with the owner link made for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWithOwners {
    #[serde(flatten)]
    pub project: Project,
    pub owners: Vec<ProjectOwner>,
}

/// A single project with ownership and like metadata relative to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub owners: Vec<ProjectOwner>,
    pub is_owner: bool,
    pub like_count: i64,
    pub like: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectWithCounts>,
}

// Request types

#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub state: ProjectState,
}

#[derive(Debug, Deserialize)]
struct ProjectPayload {
    title: String,
    description: Option<String>,
    state: Option<ProjectState>,
}

impl NewProject {
    /// Build a project from the request body merged with the query/path
    /// parameters. Parameters overwrite body fields of the same name.
    pub fn from_payload(
        body: Map<String, Value>,
        params: HashMap<String, String>,
    ) -> anyhow::Result<Self> {
        let mut merged = body;
        for (key, value) in params {
            merged.insert(key, Value::String(value));
        }

        let payload: ProjectPayload = serde_json::from_value(Value::Object(merged))?;
        if payload.state.as_ref().is_some_and(|state| state.as_str().is_empty()) {
            bail!("Project state must not be empty");
        }

        Ok(Self {
            title: payload.title,
            description: payload.description,
            state: payload.state.unwrap_or(ProjectState::Draft),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_round_trips_through_strings() {
        assert_eq!(ProjectState::from("open"), ProjectState::Open);
        assert_eq!(ProjectState::from("DRAFT"), ProjectState::Draft);
        assert_eq!(
            ProjectState::from("in-review"),
            ProjectState::Other("in-review".to_string())
        );
        assert_eq!(ProjectState::Other("in-review".into()).to_string(), "in-review");
    }

    #[test]
    fn test_custom_states_are_normalized() {
        assert_eq!(
            ProjectState::from(" Review "),
            ProjectState::Other("review".to_string())
        );
        assert_eq!(ProjectState::from("REVIEW"), ProjectState::from("review"));
    }

    #[test]
    fn test_counts_serialize_flat_and_camel_case() {
        let project = Project {
            id: 7,
            title: "Bridge".to_string(),
            description: None,
            state: ProjectState::Open,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let listed = ProjectWithCounts {
            project,
            counts: ProjectCounts {
                comment_count: 2,
                owner_count: 1,
                task_count: 3,
            },
        };

        let value = serde_json::to_value(&listed).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["state"], "open");
        assert_eq!(value["commentCount"], 2);
        assert_eq!(value["ownerCount"], 1);
        assert_eq!(value["taskCount"], 3);
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_payload_params_override_body() {
        let body = json!({ "title": "From body", "state": "open" })
            .as_object()
            .cloned()
            .unwrap();
        let mut params = HashMap::new();
        params.insert("title".to_string(), "From params".to_string());

        let new_project = NewProject::from_payload(body, params).unwrap();
        assert_eq!(new_project.title, "From params");
        assert_eq!(new_project.state, ProjectState::Open);
        assert_eq!(new_project.description, None);
    }

    #[test]
    fn test_payload_defaults_to_draft_and_ignores_unknown_fields() {
        let body = json!({ "title": "Quiet", "publicity": "internal" })
            .as_object()
            .cloned()
            .unwrap();

        let new_project = NewProject::from_payload(body, HashMap::new()).unwrap();
        assert_eq!(new_project.state, ProjectState::Draft);
    }

    #[test]
    fn test_payload_with_blank_state_is_rejected() {
        let body = json!({ "title": "Nowhere", "state": "  " }).as_object().cloned().unwrap();
        assert!(NewProject::from_payload(body, HashMap::new()).is_err());

        let mut params = HashMap::new();
        params.insert("state".to_string(), String::new());
        let body = json!({ "title": "Nowhere" }).as_object().cloned().unwrap();
        assert!(NewProject::from_payload(body, params).is_err());
    }

    #[test]
    fn test_payload_without_title_is_rejected() {
        let body = json!({ "description": "no title" }).as_object().cloned().unwrap();
        assert!(NewProject::from_payload(body, HashMap::new()).is_err());
    }
}
