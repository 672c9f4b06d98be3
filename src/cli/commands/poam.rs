//! POA&M CLI commands.

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use comfy_table::Cell;

use crate::cli::context::{parse_date, parse_label, AppContext};
use crate::cli::output::{
    detail, list_table, or_dash, output, render_list, severity_cell, status_cell, truncate,
    ActionOutput, CommandOutput,
};
use crate::domain::models::{Milestone, PoamItem, PoamStatus, RecordId, Severity};
use crate::services::PoamService;

#[derive(Args, Debug)]
pub struct PoamArgs {
    #[command(subcommand)]
    pub command: PoamCommands,
}

#[derive(Subcommand, Debug)]
pub enum PoamCommands {
    /// Create a POA&M item
    Add {
        /// Weakness being remediated
        weakness: String,
        /// Severity (low, medium, high, critical)
        #[arg(short, long, default_value = "medium")]
        severity: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Related control ID, e.g. AC-2
        #[arg(long)]
        control: Option<String>,
        /// Affected system ID
        #[arg(long)]
        system: Option<String>,
        /// Scheduled completion (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Point of contact
        #[arg(long)]
        contact: Option<String>,
        #[arg(short, long)]
        client: Option<String>,
    },
    /// List POA&M items by scheduled completion
    List {
        #[arg(short, long)]
        client: Option<String>,
        /// Filter by status (open, in_progress, completed, risk_accepted)
        #[arg(short, long)]
        status: Option<String>,
        /// Only items past their scheduled completion
        #[arg(long)]
        overdue: bool,
    },
    /// Show a POA&M item with its milestones
    Show {
        /// POA&M item ID
        id: String,
    },
    /// Move a POA&M item to a new status
    Status {
        /// POA&M item ID
        id: String,
        /// New status
        status: String,
    },
    /// Add a milestone to a POA&M item
    Milestone {
        /// POA&M item ID
        id: String,
        /// Milestone description
        description: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,
    },
    /// Mark a milestone complete
    Complete {
        /// POA&M item ID
        id: String,
        /// Milestone number as shown by `poam show`
        number: usize,
    },
    /// Delete a POA&M item
    Delete {
        /// POA&M item ID
        id: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct PoamListOutput {
    #[serde(skip)]
    pub today: NaiveDate,
    pub items: Vec<PoamItem>,
}

impl CommandOutput for PoamListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "severity", "status", "due", "milestones", "weakness"]);
        for item in &self.items {
            let due = match item.scheduled_completion {
                Some(date) if item.is_overdue(self.today) => format!("{date} (overdue)"),
                Some(date) => date.to_string(),
                None => "-".to_string(),
            };
            let done = item.milestones.iter().filter(|m| m.completed).count();
            table.add_row(vec![
                Cell::new(or_dash(item.id.as_ref())),
                severity_cell(item.severity),
                status_cell(item.status.as_str()),
                Cell::new(due),
                Cell::new(format!("{done}/{}", item.milestones.len())),
                Cell::new(truncate(&item.weakness, 45)),
            ]);
        }
        render_list("POA&M item", &table, self.items.len())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct PoamDetailOutput {
    pub item: PoamItem,
}

impl CommandOutput for PoamDetailOutput {
    fn to_human(&self) -> String {
        let item = &self.item;
        let mut text = detail(
            &format!("POA&M {}: {}", or_dash(item.id.as_ref()), item.weakness),
            &[
                ("Client", item.client_id.to_string()),
                ("Severity", item.severity.to_string()),
                ("Status", item.status.to_string()),
                ("Control", item.control_id.clone().unwrap_or_default()),
                ("System", item.system_id.as_ref().map(ToString::to_string).unwrap_or_default()),
                ("Contact", item.point_of_contact.clone().unwrap_or_default()),
                (
                    "Due",
                    item.scheduled_completion.map(|d| d.to_string()).unwrap_or_default(),
                ),
                (
                    "From finding",
                    item.source_finding.as_ref().map(ToString::to_string).unwrap_or_default(),
                ),
                ("Description", item.description.clone()),
            ],
        );

        if !item.milestones.is_empty() {
            text.push_str("\n\nMilestones:");
            for (n, m) in item.milestones.iter().enumerate() {
                let mark = if m.completed { "x" } else { " " };
                text.push_str(&format!("\n  {}. [{mark}] {} (due {})", n + 1, m.description, m.due_date));
            }
        }
        text
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.item).unwrap_or_default()
    }
}

fn parse_status(value: &str) -> Result<PoamStatus> {
    parse_label("POA&M status", value, PoamStatus::ALL, PoamStatus::from_str)
}

pub async fn execute(args: PoamArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = PoamService::new(ctx.store.clone());
    let today = Utc::now().date_naive();

    match args.command {
        PoamCommands::Add {
            weakness,
            severity,
            description,
            control,
            system,
            due,
            contact,
            client,
        } => {
            let severity = parse_label("severity", &severity, Severity::ALL, Severity::from_str)?;
            let mut item = PoamItem::new(ctx.client_id(client)?, weakness, severity)
                .with_scheduled_completion(due.as_deref().map(parse_date).transpose()?);
            item.description = description.unwrap_or_default();
            item.control_id = control;
            item.system_id = system.map(RecordId::from);
            item.point_of_contact = contact;

            let item = service.create(item).await?;
            let message = format!("POA&M item created: {}", or_dash(item.id.as_ref()));
            output(&ActionOutput::new(message, item), json_mode);
        }

        PoamCommands::List { client, status, overdue } => {
            let client_id = ctx.client_filter(client);
            let status = status.as_deref().map(parse_status).transpose()?;
            let items = if overdue {
                let mut items = service.overdue(client_id.as_ref(), today).await?;
                if let Some(status) = status {
                    items.retain(|item| item.status == status);
                }
                items
            } else {
                service.list(client_id.as_ref(), status).await?
            };
            output(&PoamListOutput { today, items }, json_mode);
        }

        PoamCommands::Show { id } => {
            let item = service
                .get(&RecordId::from(id.as_str()))
                .await?
                .ok_or_else(|| anyhow!("POA&M item not found: {id}"))?;
            output(&PoamDetailOutput { item }, json_mode);
        }

        PoamCommands::Status { id, status } => {
            let status = parse_status(&status)?;
            let item = service.update_status(&RecordId::from(id.as_str()), status).await?;
            output(&ActionOutput::new(format!("POA&M item {id} is now {status}"), item), json_mode);
        }

        PoamCommands::Milestone { id, description, due } => {
            let milestone = Milestone {
                description,
                due_date: parse_date(&due)?,
                completed: false,
            };
            let item = service
                .add_milestone(&RecordId::from(id.as_str()), milestone)
                .await?;
            let message = format!(
                "Milestone {} added to POA&M item {id}",
                item.milestones.len()
            );
            output(&ActionOutput::new(message, item), json_mode);
        }

        PoamCommands::Complete { id, number } => {
            let index = number
                .checked_sub(1)
                .ok_or_else(|| anyhow!("Milestone numbers start at 1"))?;
            let item = service
                .complete_milestone(&RecordId::from(id.as_str()), index)
                .await?;
            output(
                &ActionOutput::new(format!("Milestone {number} of POA&M item {id} completed"), item),
                json_mode,
            );
        }

        PoamCommands::Delete { id } => {
            service.delete(&RecordId::from(id.as_str())).await?;
            output(&ActionOutput::done(format!("POA&M item deleted: {id}")), json_mode);
        }
    }

    Ok(())
}
