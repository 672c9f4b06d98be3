//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use super::commands::{
    assess::AssessArgs, control::ControlArgs, incident::IncidentArgs, init::InitArgs,
    org::OrgArgs, poam::PoamArgs, report::ReportArgs, risk::RiskArgs, system::SystemArgs,
};

#[derive(Parser, Debug)]
#[command(name = "grcboard")]
#[command(
    about = "grcboard - security assessments, findings, risks, POA&M and ATO tracking",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize grcboard configuration in the current directory
    Init(InitArgs),

    /// Security assessments and their generated findings
    Assess(AssessArgs),

    /// Security incident tracking
    Incident(IncidentArgs),

    /// Risk register
    Risk(RiskArgs),

    /// Plan of Action and Milestones
    Poam(PoamArgs),

    /// NIST SP 800-53 controls
    Control(ControlArgs),

    /// Information systems and ATO workflow
    System(SystemArgs),

    /// Departments, positions and users
    Org(OrgArgs),

    /// Dashboard reports
    Report(ReportArgs),
}
