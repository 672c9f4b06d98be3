//! Departments, positions and users.

use std::sync::Arc;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Department, Position, RecordId, User};
use crate::domain::ports::{RecordQuery, RecordStore, Repository};

pub struct OrganizationService {
    departments: Repository<Department>,
    positions: Repository<Position>,
    users: Repository<User>,
}

impl OrganizationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            departments: Repository::new(Arc::clone(&store)),
            positions: Repository::new(Arc::clone(&store)),
            users: Repository::new(store),
        }
    }

    pub async fn create_department(&self, department: Department) -> DomainResult<Department> {
        department.validate().map_err(DomainError::ValidationFailed)?;
        let department = self.departments.create(&department).await?;
        info!(id = ?department.id, name = %department.name, "department created");
        Ok(department)
    }

    pub async fn departments(&self, client_id: Option<&RecordId>) -> DomainResult<Vec<Department>> {
        let mut departments = self
            .departments
            .list(&RecordQuery::new().eq_opt("clientId", client_id))
            .await?;
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    pub async fn get_department(&self, id: &RecordId) -> DomainResult<Option<Department>> {
        self.departments.get(id).await
    }

    pub async fn update_department(&self, department: Department) -> DomainResult<Department> {
        department.validate().map_err(DomainError::ValidationFailed)?;
        self.departments.update(&department).await
    }

    /// Delete a department that no longer has positions.
    pub async fn delete_department(&self, id: &RecordId) -> DomainResult<()> {
        let positions = self.positions(id).await?;
        if !positions.is_empty() {
            return Err(DomainError::ValidationFailed(format!(
                "Department {id} still has {} position(s)",
                positions.len()
            )));
        }
        self.departments.delete(id).await?;
        info!(id = %id, "department deleted");
        Ok(())
    }

    /// Positions of one department.
    pub async fn positions(&self, department_id: &RecordId) -> DomainResult<Vec<Position>> {
        let mut positions = self
            .positions
            .list(&RecordQuery::new().eq("departmentId", department_id))
            .await?;
        positions.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(positions)
    }

    pub async fn create_position(&self, position: Position) -> DomainResult<Position> {
        position.validate().map_err(DomainError::ValidationFailed)?;
        self.departments.require(&position.department_id).await?;
        let position = self.positions.create(&position).await?;
        info!(id = ?position.id, title = %position.title, "position created");
        Ok(position)
    }

    pub async fn delete_position(&self, id: &RecordId) -> DomainResult<()> {
        self.positions.delete(id).await
    }

    pub async fn users(&self, client_id: Option<&RecordId>) -> DomainResult<Vec<User>> {
        self.users
            .list(&RecordQuery::new().eq_opt("clientId", client_id))
            .await
    }
}
