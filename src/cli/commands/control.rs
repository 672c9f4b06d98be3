//! Security control CLI commands.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use comfy_table::Cell;

use crate::cli::context::{parse_label, AppContext};
use crate::cli::output::{
    detail, list_table, or_dash, output, render_list, status_cell, truncate, ActionOutput,
    CommandOutput,
};
use crate::domain::models::{Control, ImplementationStatus, RecordId};
use crate::services::{ComplianceSummary, ControlFilter, ControlService};

#[derive(Args, Debug)]
pub struct ControlArgs {
    #[command(subcommand)]
    pub command: ControlCommands,
}

#[derive(Subcommand, Debug)]
pub enum ControlCommands {
    /// List controls in catalog order
    List {
        /// Control family, e.g. AC
        #[arg(short, long)]
        family: Option<String>,
        /// Filter by implementation status
        #[arg(short, long)]
        status: Option<String>,
        /// Filter by system ID
        #[arg(long)]
        system: Option<String>,
    },
    /// Show control details
    Show {
        /// Control ID, e.g. AC-2
        id: String,
    },
    /// Set the implementation status of a control
    Status {
        /// Control ID
        id: String,
        /// not_implemented, planned, partially_implemented, implemented, not_applicable
        status: String,
    },
    /// Implementation summary and compliance percentage
    Compliance {
        #[arg(short, long)]
        family: Option<String>,
        #[arg(long)]
        system: Option<String>,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct ControlListOutput {
    pub controls: Vec<Control>,
}

impl CommandOutput for ControlListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "family", "status", "title"]);
        for c in &self.controls {
            table.add_row(vec![
                Cell::new(or_dash(c.id.as_ref())),
                Cell::new(c.family_code()),
                status_cell(c.implementation_status.as_str()),
                Cell::new(truncate(&c.title, 50)),
            ]);
        }
        render_list("control", &table, self.controls.len())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ControlDetailOutput {
    pub control: Control,
}

impl CommandOutput for ControlDetailOutput {
    fn to_human(&self) -> String {
        let c = &self.control;
        detail(
            &format!("Control {}: {}", or_dash(c.id.as_ref()), c.title),
            &[
                ("Family", c.family_code()),
                ("Status", c.implementation_status.to_string()),
                ("System", c.system_id.as_ref().map(ToString::to_string).unwrap_or_default()),
                ("Responsible", c.responsible_role.clone().unwrap_or_default()),
                ("Description", c.description.clone()),
            ],
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.control).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ComplianceOutput {
    #[serde(flatten)]
    pub summary: ComplianceSummary,
}

impl CommandOutput for ComplianceOutput {
    fn to_human(&self) -> String {
        let s = &self.summary;
        detail(
            &format!("Compliance: {}%", s.percentage),
            &[
                ("Controls", s.total.to_string()),
                ("Implemented", s.implemented.to_string()),
                ("Partial", s.partially_implemented.to_string()),
                ("Planned", s.planned.to_string()),
                ("Not implemented", s.not_implemented.to_string()),
                ("Not applicable", s.not_applicable.to_string()),
            ],
        )
    }
}

fn parse_status(value: &str) -> Result<ImplementationStatus> {
    parse_label(
        "implementation status",
        value,
        ImplementationStatus::ALL,
        ImplementationStatus::from_str,
    )
}

pub async fn execute(args: ControlArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = ControlService::new(ctx.store.clone());

    match args.command {
        ControlCommands::List { family, status, system } => {
            let filter = ControlFilter {
                family,
                status: status.as_deref().map(parse_status).transpose()?,
                system_id: system.map(RecordId::from),
            };
            let controls = service.list(&filter).await?;
            output(&ControlListOutput { controls }, json_mode);
        }

        ControlCommands::Show { id } => {
            let control = service
                .get(&RecordId::from(id.as_str()))
                .await?
                .ok_or_else(|| anyhow!("Control not found: {id}"))?;
            output(&ControlDetailOutput { control }, json_mode);
        }

        ControlCommands::Status { id, status } => {
            let status = parse_status(&status)?;
            let control = service.update_status(&RecordId::from(id.as_str()), status).await?;
            output(&ActionOutput::new(format!("Control {id} is now {status}"), control), json_mode);
        }

        ControlCommands::Compliance { family, system } => {
            let filter = ControlFilter {
                family,
                status: None,
                system_id: system.map(RecordId::from),
            };
            let summary = service.compliance(&filter).await?;
            output(&ComplianceOutput { summary }, json_mode);
        }
    }

    Ok(())
}
