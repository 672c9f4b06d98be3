//! Organizational structure: departments, positions and users.

use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::domain::ports::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
}

impl Department {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Department name cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Resource for Department {
    const COLLECTION: &'static str = "departments";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub department_id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_role: Option<String>,
}

impl Position {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Position title cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Resource for Position {
    const COLLECTION: &'static str = "positions";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<RecordId>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl Resource for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}
