//! Information system and ATO CLI commands.

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use comfy_table::Cell;

use crate::cli::context::{parse_date, parse_label, AppContext};
use crate::cli::output::{
    detail, list_table, or_dash, output, render_list, status_cell, truncate, ActionOutput,
    CommandOutput,
};
use crate::domain::models::{AtoStatus, Categorization, RecordId, System};
use crate::services::SystemService;

#[derive(Args, Debug)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommands,
}

#[derive(Subcommand, Debug)]
pub enum SystemCommands {
    /// Register an information system
    Add {
        /// System name
        name: String,
        /// FIPS 199 categorization (low, moderate, high)
        #[arg(long, default_value = "moderate")]
        categorization: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        client: Option<String>,
    },
    /// List systems by name
    List {
        #[arg(short, long)]
        client: Option<String>,
        /// Filter by ATO status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show system details
    Show {
        /// System ID
        id: String,
    },
    /// Move a system to the next RMF step
    Advance {
        /// System ID
        id: String,
    },
    /// Grant authorization to operate
    Authorize {
        /// System ID
        id: String,
        /// Authorizing official
        #[arg(long)]
        official: String,
        /// Decision date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Deny authorization to operate
    Deny {
        /// System ID
        id: String,
    },
    /// List authorized systems whose ATO has expired
    Expired {
        #[arg(short, long)]
        client: Option<String>,
    },
    /// Delete a system
    Delete {
        /// System ID
        id: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct SystemListOutput {
    #[serde(skip)]
    pub today: NaiveDate,
    pub systems: Vec<System>,
}

impl CommandOutput for SystemListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "categorization", "ato status", "expires", "name"]);
        for s in &self.systems {
            let expires = match s.expiration_date {
                Some(date) if s.is_ato_expired(self.today) => format!("{date} (expired)"),
                Some(date) => date.to_string(),
                None => "-".to_string(),
            };
            table.add_row(vec![
                Cell::new(or_dash(s.id.as_ref())),
                Cell::new(s.categorization),
                status_cell(s.ato_status.as_str()),
                Cell::new(expires),
                Cell::new(truncate(&s.name, 45)),
            ]);
        }
        render_list("system", &table, self.systems.len())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SystemDetailOutput {
    pub system: System,
}

impl CommandOutput for SystemDetailOutput {
    fn to_human(&self) -> String {
        let s = &self.system;
        let next = s
            .ato_status
            .next()
            .map(|step| step.to_string())
            .unwrap_or_default();
        detail(
            &format!("System {}: {}", or_dash(s.id.as_ref()), s.name),
            &[
                ("Client", s.client_id.to_string()),
                ("Categorization", s.categorization.to_string()),
                ("ATO status", s.ato_status.to_string()),
                ("Next step", next),
                ("Official", s.authorizing_official.clone().unwrap_or_default()),
                (
                    "Authorized",
                    s.authorization_date.map(|d| d.to_string()).unwrap_or_default(),
                ),
                ("Expires", s.expiration_date.map(|d| d.to_string()).unwrap_or_default()),
                ("Description", s.description.clone()),
            ],
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.system).unwrap_or_default()
    }
}

fn parse_status(value: &str) -> Result<AtoStatus> {
    parse_label("ATO status", value, AtoStatus::ALL, AtoStatus::from_str)
}

pub async fn execute(args: SystemArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = SystemService::new(ctx.store.clone());
    let today = Utc::now().date_naive();

    match args.command {
        SystemCommands::Add { name, categorization, description, client } => {
            let mut system = System::new(ctx.client_id(client)?, name);
            system.categorization = parse_label(
                "categorization",
                &categorization,
                Categorization::ALL,
                Categorization::from_str,
            )?;
            system.description = description.unwrap_or_default();

            let system = service.create(system).await?;
            let message = format!("System registered: {}", or_dash(system.id.as_ref()));
            output(&ActionOutput::new(message, system), json_mode);
        }

        SystemCommands::List { client, status } => {
            let client_id = ctx.client_filter(client);
            let status = status.as_deref().map(parse_status).transpose()?;
            let systems = service.list(client_id.as_ref(), status).await?;
            output(&SystemListOutput { today, systems }, json_mode);
        }

        SystemCommands::Show { id } => {
            let system = service
                .get(&RecordId::from(id.as_str()))
                .await?
                .ok_or_else(|| anyhow!("System not found: {id}"))?;
            output(&SystemDetailOutput { system }, json_mode);
        }

        SystemCommands::Advance { id } => {
            let system = service.advance(&RecordId::from(id.as_str())).await?;
            let message = format!("System {id} moved to {}", system.ato_status);
            output(&ActionOutput::new(message, system), json_mode);
        }

        SystemCommands::Authorize { id, official, date } => {
            let on = date.as_deref().map(parse_date).transpose()?.unwrap_or(today);
            let system = service
                .authorize(&RecordId::from(id.as_str()), &official, on)
                .await?;
            let message = format!(
                "System {id} authorized until {}",
                or_dash(system.expiration_date)
            );
            output(&ActionOutput::new(message, system), json_mode);
        }

        SystemCommands::Deny { id } => {
            let system = service.deny(&RecordId::from(id.as_str())).await?;
            output(&ActionOutput::new(format!("System {id} denied"), system), json_mode);
        }

        SystemCommands::Expired { client } => {
            let client_id = ctx.client_filter(client);
            let systems = service.expired(client_id.as_ref(), today).await?;
            output(&SystemListOutput { today, systems }, json_mode);
        }

        SystemCommands::Delete { id } => {
            service.delete(&RecordId::from(id.as_str())).await?;
            output(&ActionOutput::done(format!("System deleted: {id}")), json_mode);
        }
    }

    Ok(())
}
