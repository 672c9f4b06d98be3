//! Risk register CLI commands.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use comfy_table::Cell;

use crate::cli::context::{parse_label, AppContext};
use crate::cli::output::{
    detail, list_table, or_dash, output, render_list, status_cell, truncate, ActionOutput,
    CommandOutput,
};
use crate::domain::models::{RecordId, Risk, RiskLevel, RiskStatus};
use crate::services::RiskService;

#[derive(Args, Debug)]
pub struct RiskArgs {
    #[command(subcommand)]
    pub command: RiskCommands,
}

#[derive(Subcommand, Debug)]
pub enum RiskCommands {
    /// Register a new risk
    Add {
        /// Risk title
        title: String,
        /// Likelihood (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        likelihood: String,
        /// Impact (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        impact: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Risk owner
        #[arg(long)]
        owner: Option<String>,
        /// Affected system ID
        #[arg(long)]
        system: Option<String>,
        #[arg(short, long)]
        client: Option<String>,
    },
    /// List risks, highest rating first
    List {
        #[arg(short, long)]
        client: Option<String>,
        /// Filter by status (open, mitigating, accepted, closed)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show risk details
    Show {
        /// Risk ID
        id: String,
    },
    /// Move a risk to a new status
    Status {
        /// Risk ID
        id: String,
        /// New status
        status: String,
    },
    /// Delete a risk
    Delete {
        /// Risk ID
        id: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct RiskListOutput {
    pub risks: Vec<Risk>,
}

impl CommandOutput for RiskListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "rating", "likelihood", "impact", "status", "title"]);
        for r in &self.risks {
            table.add_row(vec![
                Cell::new(or_dash(r.id.as_ref())),
                Cell::new(r.rating()),
                Cell::new(r.likelihood),
                Cell::new(r.impact),
                status_cell(r.status.as_str()),
                Cell::new(truncate(&r.title, 50)),
            ]);
        }
        render_list("risk", &table, self.risks.len())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct RiskDetailOutput {
    pub risk: Risk,
}

impl CommandOutput for RiskDetailOutput {
    fn to_human(&self) -> String {
        let r = &self.risk;
        detail(
            &format!("Risk {}: {}", or_dash(r.id.as_ref()), r.title),
            &[
                ("Client", r.client_id.to_string()),
                ("Rating", format!("{} ({} x {})", r.rating(), r.likelihood, r.impact)),
                ("Status", r.status.to_string()),
                ("Category", r.category.clone()),
                ("Owner", r.owner.clone().unwrap_or_default()),
                ("System", r.system_id.as_ref().map(ToString::to_string).unwrap_or_default()),
                (
                    "From finding",
                    r.source_finding.as_ref().map(ToString::to_string).unwrap_or_default(),
                ),
                ("Created", r.created_date.format("%Y-%m-%d").to_string()),
                ("Description", r.description.clone()),
            ],
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.risk).unwrap_or_default()
    }
}

fn parse_level(what: &str, value: &str) -> Result<RiskLevel> {
    parse_label(what, value, RiskLevel::ALL, RiskLevel::from_str)
}

fn parse_status(value: &str) -> Result<RiskStatus> {
    parse_label("risk status", value, RiskStatus::ALL, RiskStatus::from_str)
}

pub async fn execute(args: RiskArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = RiskService::new(ctx.store.clone());

    match args.command {
        RiskCommands::Add {
            title,
            likelihood,
            impact,
            description,
            category,
            owner,
            system,
            client,
        } => {
            let mut risk = Risk::new(ctx.client_id(client)?, title);
            risk.likelihood = parse_level("likelihood", &likelihood)?;
            risk.impact = parse_level("impact", &impact)?;
            risk.description = description.unwrap_or_default();
            if let Some(category) = category {
                risk.category = category;
            }
            risk.owner = owner;
            risk.system_id = system.map(RecordId::from);

            let risk = service.create(risk).await?;
            let message = format!(
                "Risk registered: {} (rating {})",
                or_dash(risk.id.as_ref()),
                risk.rating()
            );
            output(&ActionOutput::new(message, risk), json_mode);
        }

        RiskCommands::List { client, status } => {
            let client_id = ctx.client_filter(client);
            let status = status.as_deref().map(parse_status).transpose()?;
            let risks = service.list(client_id.as_ref(), status).await?;
            output(&RiskListOutput { risks }, json_mode);
        }

        RiskCommands::Show { id } => {
            let risk = service
                .get(&RecordId::from(id.as_str()))
                .await?
                .ok_or_else(|| anyhow!("Risk not found: {id}"))?;
            output(&RiskDetailOutput { risk }, json_mode);
        }

        RiskCommands::Status { id, status } => {
            let status = parse_status(&status)?;
            let risk = service.update_status(&RecordId::from(id.as_str()), status).await?;
            output(&ActionOutput::new(format!("Risk {id} is now {status}"), risk), json_mode);
        }

        RiskCommands::Delete { id } => {
            service.delete(&RecordId::from(id.as_str())).await?;
            output(&ActionOutput::done(format!("Risk deleted: {id}")), json_mode);
        }
    }

    Ok(())
}
