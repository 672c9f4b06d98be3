//! Assessment CLI commands.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use comfy_table::{Cell, ColumnConstraint, Table};
use std::path::{Path, PathBuf};

use crate::cli::context::{parse_date, parse_label, parse_label_opt, AppContext};
use crate::cli::output::{
    detail, list_table, output, render_list, severity_cell, status_cell, truncate, CommandOutput,
};
use crate::domain::models::{
    Answer, AnswerMap, Assessment, AssessmentKind, Finding, FindingStatus, QuestionKind,
    QuestionSet, RecordId, Severity,
};
use crate::services::{
    question_set, AssessmentService, ClientFinding, FindingFilter, FindingService,
};

#[derive(Args, Debug)]
pub struct AssessArgs {
    #[command(subcommand)]
    pub command: AssessCommands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PromoteTarget {
    Risk,
    Poam,
}

#[derive(Subcommand, Debug)]
pub enum AssessCommands {
    /// List the questions of an assessment
    Questions {
        /// Assessment kind (basic, advanced)
        #[arg(default_value = "basic")]
        kind: String,
    },
    /// Score answers and store the assessment
    Submit {
        /// Assessment kind (basic, advanced)
        kind: String,
        /// Client the assessment belongs to
        #[arg(short, long)]
        client: Option<String>,
        /// JSON or YAML file mapping question ids to answers (yes/no answers
        /// are case insensitive, option names must match exactly)
        #[arg(short, long)]
        answers: Option<PathBuf>,
        /// Single answer as QUESTION=VALUE, overriding the file
        #[arg(long = "answer", value_name = "QUESTION=VALUE")]
        answer: Vec<String>,
        /// Score without storing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// List a client's assessments, newest first
    History {
        #[arg(short, long)]
        client: Option<String>,
    },
    /// Show an assessment with its answers and findings
    Show {
        /// Assessment ID
        id: String,
    },
    /// List findings generated for a client
    Findings {
        #[arg(short, long)]
        client: Option<String>,
        /// Filter by severity (low, medium, high, critical)
        #[arg(short, long)]
        severity: Option<String>,
        /// Filter by status (open, in_progress, resolved, accepted)
        #[arg(long)]
        status: Option<String>,
    },
    /// Copy a finding into the risk register or the POA&M
    Promote {
        /// Assessment ID
        assessment_id: String,
        /// Finding ID within the assessment
        finding_id: String,
        /// Record to create
        #[arg(long, value_enum, default_value = "risk")]
        to: PromoteTarget,
        /// Scheduled completion for a POA&M item (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct QuestionView {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub prompt: String,
    pub options: Vec<String>,
}

impl From<&crate::domain::models::Question> for QuestionView {
    fn from(question: &crate::domain::models::Question) -> Self {
        let options = match &question.kind {
            QuestionKind::YesNo { .. } => vec!["yes".to_string(), "no".to_string()],
            QuestionKind::Radio { options, .. } | QuestionKind::MultiSelect { options, .. } => {
                options.clone()
            }
            QuestionKind::Text { min_length } => vec![format!("free text, {min_length}+ chars")],
            QuestionKind::Slider { .. } => vec!["0-10".to_string()],
        };
        Self {
            id: question.id.clone(),
            kind: question.kind.type_name().to_string(),
            prompt: question.prompt.clone(),
            options,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct QuestionListOutput {
    pub kind: AssessmentKind,
    pub questions: Vec<QuestionView>,
}

impl CommandOutput for QuestionListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "type", "question", "answers"]);
        for q in &self.questions {
            table.add_row(vec![
                Cell::new(&q.id),
                Cell::new(&q.kind),
                Cell::new(truncate(&q.prompt, 60)),
                Cell::new(q.options.join(" | ")),
            ]);
        }
        render_list(&format!("{} question", self.kind), &table, self.questions.len())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SubmitOutput {
    pub dry_run: bool,
    pub id: Option<RecordId>,
    pub kind: AssessmentKind,
    pub score: u8,
    pub findings: Vec<Finding>,
}

impl CommandOutput for SubmitOutput {
    fn to_human(&self) -> String {
        let head = match (&self.id, self.dry_run) {
            (Some(id), false) => format!("Assessment {id} stored"),
            _ => "Dry run, nothing stored".to_string(),
        };
        let mut lines = vec![format!(
            "{head}: {} score {}/100, {} finding(s)",
            self.kind,
            self.score,
            self.findings.len()
        )];
        if !self.findings.is_empty() {
            lines.push(String::new());
            lines.push(findings_table(self.findings.iter()));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryOutput {
    pub client_id: RecordId,
    pub assessments: Vec<Assessment>,
}

impl CommandOutput for HistoryOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "type", "date", "score", "findings"]);
        for a in &self.assessments {
            table.add_row(vec![
                Cell::new(a.id.as_ref().map(ToString::to_string).unwrap_or_default()),
                Cell::new(a.kind),
                Cell::new(a.date.format("%Y-%m-%d %H:%M")),
                Cell::new(format!("{}/100", a.score)),
                Cell::new(a.generated_findings.len()),
            ]);
        }
        render_list("assessment", &table, self.assessments.len())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AssessmentDetailOutput {
    pub assessment: Assessment,
}

impl CommandOutput for AssessmentDetailOutput {
    fn to_human(&self) -> String {
        let a = &self.assessment;
        let mut lines = vec![detail(
            &format!("Assessment {}", a.id.as_ref().map(ToString::to_string).unwrap_or_default()),
            &[
                ("Client", a.client_id.to_string()),
                ("Type", a.kind.to_string()),
                ("Date", a.date.format("%Y-%m-%d %H:%M UTC").to_string()),
                ("Score", format!("{}/100", a.score)),
            ],
        )];

        lines.push("\nAnswers:".to_string());
        for (question, answer) in &a.answers {
            lines.push(format!("  {question}: {}", truncate(&answer.to_string(), 70)));
        }

        if !a.generated_findings.is_empty() {
            lines.push(String::new());
            lines.push(findings_table(a.generated_findings.iter()));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.assessment).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct FindingListOutput {
    pub findings: Vec<ClientFinding>,
}

impl CommandOutput for FindingListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["assessment", "finding", "severity", "status", "category", "title"]);
        for cf in &self.findings {
            table.add_row(vec![
                Cell::new(cf.assessment_id.as_ref().map(ToString::to_string).unwrap_or_default()),
                Cell::new(cf.finding.id.as_str()),
                severity_cell(cf.finding.severity),
                status_cell(cf.finding.status.as_str()),
                Cell::new(&cf.finding.category),
                Cell::new(truncate(&cf.finding.title, 50)),
            ]);
        }
        keep_whole(&mut table, 1);
        render_list("finding", &table, self.findings.len())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct PromoteOutput {
    pub success: bool,
    pub message: String,
    pub record: serde_json::Value,
}

impl CommandOutput for PromoteOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

fn findings_table<'a>(findings: impl Iterator<Item = &'a Finding>) -> String {
    let mut table = list_table(&["finding", "severity", "category", "title"]);
    for finding in findings {
        table.add_row(vec![
            Cell::new(finding.id.as_str()),
            severity_cell(finding.severity),
            Cell::new(&finding.category),
            Cell::new(truncate(&finding.title, 60)),
        ]);
    }
    keep_whole(&mut table, 0);
    table.to_string()
}

/// Keep a column at its content width. Finding ids must print whole.
fn keep_whole(table: &mut Table, column: usize) {
    if let Some(column) = table.column_mut(column) {
        column.set_constraint(ColumnConstraint::ContentWidth);
    }
}

fn parse_kind(kind: &str) -> Result<AssessmentKind> {
    parse_label("assessment kind", kind, AssessmentKind::ALL, AssessmentKind::from_str)
}

/// Read an answers file, JSON by `.json` extension and YAML otherwise.
fn read_answers_file(path: &Path) -> Result<AnswerMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as JSON answers", path.display()))
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {} as YAML answers", path.display()))
    }
}

/// Merge `QUESTION=VALUE` pairs into `answers`, reading each value in the
/// shape its question expects.
pub fn apply_answer_flags(set: &QuestionSet, answers: &mut AnswerMap, flags: &[String]) -> Result<()> {
    for flag in flags {
        let (question_id, raw) = flag
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid answer '{flag}'. Expected QUESTION=VALUE"))?;
        let question_id = question_id.trim();
        let answer = set
            .get(question_id)
            .map_or_else(|| Answer::parse_loose(raw), |q| q.kind.parse_answer(raw));
        answers.insert(question_id.to_string(), answer);
    }
    Ok(())
}

pub async fn execute(args: AssessArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = AssessmentService::new(ctx.store.clone());

    match args.command {
        AssessCommands::Questions { kind } => {
            let kind = parse_kind(&kind)?;
            let out = QuestionListOutput {
                kind,
                questions: AssessmentService::questions(kind).questions.iter().map(QuestionView::from).collect(),
            };
            output(&out, json_mode);
        }

        AssessCommands::Submit { kind, client, answers, answer, dry_run } => {
            let kind = parse_kind(&kind)?;
            let set = question_set(kind);

            let mut answer_map = match answers {
                Some(path) => read_answers_file(&path)?,
                None => AnswerMap::new(),
            };
            set.normalize(&mut answer_map);
            apply_answer_flags(set, &mut answer_map, &answer)?;

            let out = if dry_run {
                let outcome = AssessmentService::preview(kind, &answer_map)?;
                SubmitOutput {
                    dry_run: true,
                    id: None,
                    kind,
                    score: outcome.score,
                    findings: outcome.findings,
                }
            } else {
                let client_id = ctx.client_id(client)?;
                let stored = service.submit(client_id, kind, answer_map).await?;
                SubmitOutput {
                    dry_run: false,
                    id: stored.id,
                    kind,
                    score: stored.score,
                    findings: stored.generated_findings,
                }
            };
            output(&out, json_mode);
        }

        AssessCommands::History { client } => {
            let client_id = ctx.client_id(client)?;
            let assessments = service.history(&client_id).await?;
            output(&HistoryOutput { client_id, assessments }, json_mode);
        }

        AssessCommands::Show { id } => {
            let assessment = service
                .get(&RecordId::from(id.as_str()))
                .await?
                .ok_or_else(|| anyhow!("Assessment not found: {id}"))?;
            output(&AssessmentDetailOutput { assessment }, json_mode);
        }

        AssessCommands::Findings { client, severity, status } => {
            let client_id = ctx.client_id(client)?;
            let filter = FindingFilter {
                severity: parse_label_opt("severity", severity.as_deref(), Severity::ALL, Severity::from_str)?,
                status: parse_label_opt("status", status.as_deref(), FindingStatus::ALL, FindingStatus::from_str)?,
            };
            let findings = service.findings(&client_id, &filter).await?;
            output(&FindingListOutput { findings }, json_mode);
        }

        AssessCommands::Promote { assessment_id, finding_id, to, due } => {
            let promoter = FindingService::new(ctx.store.clone());
            let assessment_id = RecordId::from(assessment_id.as_str());

            let out = match to {
                PromoteTarget::Risk => {
                    if due.is_some() {
                        bail!("--due only applies when promoting to a POA&M item");
                    }
                    let risk = promoter.promote_to_risk(&assessment_id, &finding_id).await?;
                    PromoteOutput {
                        success: true,
                        message: format!(
                            "Finding {finding_id} promoted to risk {}",
                            risk.id.as_ref().map(ToString::to_string).unwrap_or_default()
                        ),
                        record: serde_json::to_value(&risk)?,
                    }
                }
                PromoteTarget::Poam => {
                    let due = due.as_deref().map(parse_date).transpose()?;
                    let item = promoter
                        .promote_to_poam(&assessment_id, &finding_id, due)
                        .await?;
                    PromoteOutput {
                        success: true,
                        message: format!(
                            "Finding {finding_id} promoted to POA&M item {}",
                            item.id.as_ref().map(ToString::to_string).unwrap_or_default()
                        ),
                        record: serde_json::to_value(&item)?,
                    }
                }
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
