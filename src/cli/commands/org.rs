//! Organization structure CLI commands.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use comfy_table::Cell;

use crate::cli::context::AppContext;
use crate::cli::output::{
    detail, list_table, or_dash, output, render_list, truncate, ActionOutput, CommandOutput,
};
use crate::domain::models::{Department, Position, RecordId, User};
use crate::services::OrganizationService;

#[derive(Args, Debug)]
pub struct OrgArgs {
    #[command(subcommand)]
    pub command: OrgCommands,
}

#[derive(Subcommand, Debug)]
pub enum OrgCommands {
    /// List departments
    Departments {
        #[arg(short, long)]
        client: Option<String>,
    },
    /// Create a department
    DeptAdd {
        /// Department name
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Department manager
        #[arg(long)]
        manager: Option<String>,
        #[arg(short, long)]
        client: Option<String>,
    },
    /// Show a department with its positions
    Dept {
        /// Department ID
        id: String,
    },
    /// Change a department's name, description or manager
    DeptUpdate {
        /// Department ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        manager: Option<String>,
    },
    /// Delete a department without positions
    DeptDelete {
        /// Department ID
        id: String,
    },
    /// List positions of a department
    Positions {
        /// Department ID
        department_id: String,
    },
    /// Create a position in a department
    PositionAdd {
        /// Department ID
        department_id: String,
        /// Position title
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Security role held by the position, e.g. ISSO
        #[arg(long)]
        security_role: Option<String>,
    },
    /// Delete a position
    PositionDelete {
        /// Position ID
        id: String,
    },
    /// List users
    Users {
        #[arg(short, long)]
        client: Option<String>,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct DepartmentListOutput {
    pub departments: Vec<Department>,
}

impl CommandOutput for DepartmentListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "manager", "description"]);
        for d in &self.departments {
            table.add_row(vec![
                Cell::new(or_dash(d.id.as_ref())),
                Cell::new(&d.name),
                Cell::new(or_dash(d.manager.as_ref())),
                Cell::new(truncate(&d.description, 40)),
            ]);
        }
        render_list("department", &table, self.departments.len())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct DepartmentDetailOutput {
    pub department: Department,
    pub positions: Vec<Position>,
}

impl CommandOutput for DepartmentDetailOutput {
    fn to_human(&self) -> String {
        let d = &self.department;
        let mut text = detail(
            &format!("Department {}: {}", or_dash(d.id.as_ref()), d.name),
            &[
                ("Client", d.client_id.as_ref().map(ToString::to_string).unwrap_or_default()),
                ("Manager", d.manager.clone().unwrap_or_default()),
                ("Description", d.description.clone()),
            ],
        );
        for p in &self.positions {
            let role = p.security_role.as_deref().map(|r| format!(" ({r})")).unwrap_or_default();
            text.push_str(&format!("\n  - {}{role}", p.title));
        }
        text
    }
}

#[derive(Debug, serde::Serialize)]
pub struct PositionListOutput {
    pub positions: Vec<Position>,
}

impl CommandOutput for PositionListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "title", "security role", "description"]);
        for p in &self.positions {
            table.add_row(vec![
                Cell::new(or_dash(p.id.as_ref())),
                Cell::new(&p.title),
                Cell::new(or_dash(p.security_role.as_ref())),
                Cell::new(truncate(&p.description, 40)),
            ]);
        }
        render_list("position", &table, self.positions.len())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct UserListOutput {
    pub users: Vec<User>,
}

impl CommandOutput for UserListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "email", "role"]);
        for u in &self.users {
            table.add_row(vec![
                Cell::new(or_dash(u.id.as_ref())),
                Cell::new(&u.name),
                Cell::new(&u.email),
                Cell::new(&u.role),
            ]);
        }
        render_list("user", &table, self.users.len())
    }
}

pub async fn execute(args: OrgArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = OrganizationService::new(ctx.store.clone());

    match args.command {
        OrgCommands::Departments { client } => {
            let client_id = ctx.client_filter(client);
            let departments = service.departments(client_id.as_ref()).await?;
            output(&DepartmentListOutput { departments }, json_mode);
        }

        OrgCommands::DeptAdd { name, description, manager, client } => {
            let department = Department {
                id: None,
                client_id: ctx.client_filter(client),
                name,
                description: description.unwrap_or_default(),
                manager,
            };
            let department = service.create_department(department).await?;
            let message = format!("Department created: {}", or_dash(department.id.as_ref()));
            output(&ActionOutput::new(message, department), json_mode);
        }

        OrgCommands::Dept { id } => {
            let id = RecordId::from(id);
            let department = service
                .get_department(&id)
                .await?
                .ok_or_else(|| anyhow!("Department not found: {id}"))?;
            let positions = service.positions(&id).await?;
            output(&DepartmentDetailOutput { department, positions }, json_mode);
        }

        OrgCommands::DeptUpdate { id, name, description, manager } => {
            let mut department = service
                .get_department(&RecordId::from(id.as_str()))
                .await?
                .ok_or_else(|| anyhow!("Department not found: {id}"))?;
            if let Some(name) = name {
                department.name = name;
            }
            if let Some(description) = description {
                department.description = description;
            }
            if manager.is_some() {
                department.manager = manager;
            }
            let department = service.update_department(department).await?;
            output(&ActionOutput::new(format!("Department {id} updated"), department), json_mode);
        }

        OrgCommands::DeptDelete { id } => {
            service.delete_department(&RecordId::from(id.as_str())).await?;
            output(&ActionOutput::done(format!("Department deleted: {id}")), json_mode);
        }

        OrgCommands::Positions { department_id } => {
            let positions = service
                .positions(&RecordId::from(department_id.as_str()))
                .await?;
            output(&PositionListOutput { positions }, json_mode);
        }

        OrgCommands::PositionAdd { department_id, title, description, security_role } => {
            let position = Position {
                id: None,
                department_id: RecordId::from(department_id),
                title,
                description: description.unwrap_or_default(),
                security_role,
            };
            let position = service.create_position(position).await?;
            let message = format!("Position created: {}", or_dash(position.id.as_ref()));
            output(&ActionOutput::new(message, position), json_mode);
        }

        OrgCommands::PositionDelete { id } => {
            service.delete_position(&RecordId::from(id.as_str())).await?;
            output(&ActionOutput::done(format!("Position deleted: {id}")), json_mode);
        }

        OrgCommands::Users { client } => {
            let client_id = ctx.client_filter(client);
            let users = service.users(client_id.as_ref()).await?;
            output(&UserListOutput { users }, json_mode);
        }
    }

    Ok(())
}
