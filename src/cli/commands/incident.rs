//! Incident CLI commands.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use comfy_table::Cell;

use crate::cli::context::{parse_label, parse_label_opt, AppContext};
use crate::cli::output::{
    detail, list_table, or_dash, output, render_list, severity_cell, status_cell, truncate,
    ActionOutput, CommandOutput,
};
use crate::domain::models::{Incident, IncidentStatus, RecordId, Severity};
use crate::services::{IncidentFilter, IncidentService};

#[derive(Args, Debug)]
pub struct IncidentArgs {
    #[command(subcommand)]
    pub command: IncidentCommands,
}

#[derive(Subcommand, Debug)]
pub enum IncidentCommands {
    /// Report a new incident
    Report {
        /// Incident title
        title: String,
        /// Severity (low, medium, high, critical)
        #[arg(short, long, default_value = "medium")]
        severity: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Category such as phishing or malware
        #[arg(long)]
        category: Option<String>,
        /// Person reporting the incident
        #[arg(long)]
        reported_by: Option<String>,
        #[arg(short, long)]
        client: Option<String>,
    },
    /// List incidents, most severe first
    List {
        #[arg(short, long)]
        client: Option<String>,
        /// Filter by status (open, investigating, contained, resolved, closed)
        #[arg(long)]
        status: Option<String>,
        /// Filter by severity
        #[arg(short, long)]
        severity: Option<String>,
        /// Hide resolved and closed incidents
        #[arg(long)]
        open: bool,
    },
    /// Show incident details
    Show {
        /// Incident ID
        id: String,
    },
    /// Move an incident to a new status
    Status {
        /// Incident ID
        id: String,
        /// New status
        status: String,
    },
    /// Delete an incident
    Delete {
        /// Incident ID
        id: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct IncidentListOutput {
    pub incidents: Vec<Incident>,
}

impl CommandOutput for IncidentListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "severity", "status", "reported", "title"]);
        for i in &self.incidents {
            table.add_row(vec![
                Cell::new(or_dash(i.id.as_ref())),
                severity_cell(i.severity),
                status_cell(i.status.as_str()),
                Cell::new(i.reported_date.format("%Y-%m-%d")),
                Cell::new(truncate(&i.title, 50)),
            ]);
        }
        render_list("incident", &table, self.incidents.len())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct IncidentDetailOutput {
    pub incident: Incident,
}

impl CommandOutput for IncidentDetailOutput {
    fn to_human(&self) -> String {
        let i = &self.incident;
        detail(
            &format!("Incident {}: {}", or_dash(i.id.as_ref()), i.title),
            &[
                ("Client", i.client_id.to_string()),
                ("Severity", i.severity.to_string()),
                ("Status", i.status.to_string()),
                ("Category", i.category.clone()),
                ("Reported by", i.reported_by.clone()),
                ("Reported", i.reported_date.format("%Y-%m-%d %H:%M UTC").to_string()),
                (
                    "Resolved",
                    i.resolved_date
                        .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
                        .unwrap_or_default(),
                ),
                ("Description", i.description.clone()),
            ],
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.incident).unwrap_or_default()
    }
}

fn parse_status(value: &str) -> Result<IncidentStatus> {
    parse_label("incident status", value, IncidentStatus::ALL, IncidentStatus::from_str)
}

pub async fn execute(args: IncidentArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = IncidentService::new(ctx.store.clone());

    match args.command {
        IncidentCommands::Report { title, severity, description, category, reported_by, client } => {
            let severity = parse_label("severity", &severity, Severity::ALL, Severity::from_str)?;
            let mut incident = Incident::new(ctx.client_id(client)?, title, severity);
            if let Some(description) = description {
                incident = incident.with_description(description);
            }
            if let Some(category) = category {
                incident = incident.with_category(category);
            }
            if let Some(reported_by) = reported_by {
                incident = incident.with_reporter(reported_by);
            }

            let incident = service.report(incident).await?;
            let message = format!("Incident reported: {}", or_dash(incident.id.as_ref()));
            output(&ActionOutput::new(message, incident), json_mode);
        }

        IncidentCommands::List { client, status, severity, open } => {
            let filter = IncidentFilter {
                client_id: ctx.client_filter(client),
                status: status.as_deref().map(parse_status).transpose()?,
                severity: parse_label_opt("severity", severity.as_deref(), Severity::ALL, Severity::from_str)?,
                open_only: open,
            };
            let incidents = service.list(&filter).await?;
            output(&IncidentListOutput { incidents }, json_mode);
        }

        IncidentCommands::Show { id } => {
            let incident = service
                .get(&RecordId::from(id.as_str()))
                .await?
                .ok_or_else(|| anyhow!("Incident not found: {id}"))?;
            output(&IncidentDetailOutput { incident }, json_mode);
        }

        IncidentCommands::Status { id, status } => {
            let status = parse_status(&status)?;
            let incident = service.update_status(&RecordId::from(id.as_str()), status).await?;
            output(
                &ActionOutput::new(format!("Incident {id} is now {status}"), incident),
                json_mode,
            );
        }

        IncidentCommands::Delete { id } => {
            service.delete(&RecordId::from(id.as_str())).await?;
            output(&ActionOutput::done(format!("Incident deleted: {id}")), json_mode);
        }
    }

    Ok(())
}
