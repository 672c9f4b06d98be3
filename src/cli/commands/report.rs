//! Dashboard report CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::context::AppContext;
use crate::cli::output::{detail, or_dash, output, CommandOutput};
use crate::domain::models::Severity;
use crate::services::{DashboardSummary, ReportService};

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(subcommand)]
    pub command: ReportCommands,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Headline numbers for a client
    Summary {
        #[arg(short, long)]
        client: Option<String>,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct SummaryOutput {
    #[serde(flatten)]
    pub summary: DashboardSummary,
}

impl CommandOutput for SummaryOutput {
    fn to_human(&self) -> String {
        let s = &self.summary;
        let score = |value: Option<u8>| value.map_or_else(|| "-".to_string(), |v| format!("{v}%"));

        let findings = Severity::ALL
            .iter()
            .rev()
            .filter_map(|sev| s.open_findings.get(sev).map(|n| format!("{n} {sev}")))
            .collect::<Vec<_>>()
            .join(", ");

        let systems = s
            .systems_by_status
            .iter()
            .map(|(status, n)| format!("{n} {status}"))
            .collect::<Vec<_>>()
            .join(", ");

        detail(
            &format!("Dashboard for client {} as of {}", s.client_id, s.as_of),
            &[
                ("Basic score", score(s.basic_score)),
                ("Advanced score", score(s.advanced_score)),
                ("Assessments", s.assessments.to_string()),
                ("Open findings", if findings.is_empty() { "0".to_string() } else { findings }),
                ("Open incidents", s.open_incidents.to_string()),
                ("Open risks", format!("{} ({} high)", s.open_risks, s.high_risks)),
                ("Open POA&Ms", format!("{} ({} overdue)", s.open_poams, s.overdue_poams)),
                (
                    "Compliance",
                    format!("{}% of {} controls", s.compliance.percentage, s.compliance.total),
                ),
                ("Systems", or_dash((!systems.is_empty()).then_some(systems))),
                ("Expired ATOs", s.expired_atos.to_string()),
            ],
        )
    }
}

pub async fn execute(args: ReportArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = ReportService::new(ctx.store.clone());

    match args.command {
        ReportCommands::Summary { client } => {
            let summary = service.summary(&ctx.client_id(client)?).await?;
            output(&SummaryOutput { summary }, json_mode);
        }
    }

    Ok(())
}
