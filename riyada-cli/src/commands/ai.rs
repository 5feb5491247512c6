//! Assistant-backed subcommands.
//!
//! Structured inputs (canvas, SWOT grid, competitor profiles, identity
//! statement) are read from small TOML files whose keys match the form
//! fields. Missing keys are treated as empty.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::info;

use riyada_ai::tasks::analysis::{BmcCanvas, CompetitorProfile, PestleInput, SwotInput};
use riyada_ai::tasks::identity::{IdentityBrief, IdentityStatement};
use riyada_ai::tasks::plans::{PlanPrompt, ProjectIdea};
use riyada_ai::tasks::{clamp_score, clean_list};
use riyada_ai::{AiError, Assistant, CompletionService};
use riyada_core::export::{document_file_name, render_document, render_exam};
use riyada_core::{BusinessPlanSection, ExamSession, MarketingPlanSection, PlanWorkbook};

use crate::commands::exercise;

#[derive(Debug, Subcommand)]
pub enum AiCommand {
    /// Draft a full business plan and export it as a Word document.
    BusinessPlan(PlanArgs),
    /// Draft a full marketing plan and export it as a Word document.
    MarketingPlan(PlanArgs),
    /// Ask for a refined version of one plan section.
    Refine(RefineArgs),
    /// Analyse a Business Model Canvas (TOML file).
    Bmc(FormArgs),
    /// Analyse a SWOT grid (TOML file).
    Swot(FormArgs),
    /// Analyse a PESTLE grid (TOML file).
    Pestle(FormArgs),
    /// Compare your project with a competitor (TOML file with [mine] and [theirs]).
    Competitor(FormArgs),
    /// Generate or review vision, mission and values.
    Identity(IdentityArgs),
    /// Look up the useful life and depreciation rate of an asset.
    AssetRate(AssetRateArgs),
    /// Generate and take a practice exam, then export the results.
    Exam(ExamArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    /// Project name.
    #[arg(long)]
    pub name: String,

    /// What the project does.
    #[arg(long)]
    pub description: String,

    /// Where to write the document [default: derived from the title]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanKind {
    Business,
    Marketing,
}

#[derive(Debug, Clone, Args)]
pub struct RefineArgs {
    #[arg(long, value_enum, default_value = "business")]
    pub plan: PlanKind,

    /// Section key, e.g. `executive_summary` or `pricing_strategy`.
    #[arg(long)]
    pub section: String,

    /// Current draft of the section.
    #[arg(long)]
    pub text: String,
}

#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// TOML file with the form fields.
    pub input: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct IdentityArgs {
    #[command(subcommand)]
    pub action: IdentityAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum IdentityAction {
    /// Draft a statement from the project name and field.
    Generate {
        #[arg(long)]
        name: String,
        #[arg(long)]
        field: String,
    },
    /// Score an existing statement (TOML with vision, mission, values).
    Review(FormArgs),
}

#[derive(Debug, Clone, Args)]
pub struct AssetRateArgs {
    /// Asset to look up, e.g. "delivery van".
    pub term: String,
}

#[derive(Debug, Clone, Args)]
pub struct ExamArgs {
    /// Where to write the results [default: practice_exam.doc]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Competitor comparison input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompetitorForm {
    pub mine: CompetitorProfile,
    pub theirs: CompetitorProfile,
}

/// Keeps the learner-facing message on top and the details underneath.
fn explain(error: AiError) -> anyhow::Error {
    let message = error.user_message();
    anyhow::Error::new(error).context(message)
}

pub fn load_form<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read form: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse form: {}", path.display()))
}

fn write_text<W: Write>(
    out: &mut W,
    label: &str,
    value: Option<&str>,
) -> Result<()> {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        writeln!(out, "{label}:\n{value}\n")?;
    }
    Ok(())
}

fn write_list<W: Write>(
    out: &mut W,
    label: &str,
    items: Option<Vec<String>>,
) -> Result<()> {
    let items = clean_list(items);
    if !items.is_empty() {
        writeln!(out, "{label}:")?;
        for item in items {
            writeln!(out, "  - {item}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_score<W: Write>(
    out: &mut W,
    label: &str,
    score: Option<u8>,
) -> Result<()> {
    if let Some(score) = score {
        writeln!(out, "{label}: {score}/100\n")?;
    }
    Ok(())
}

fn export(
    path: Option<PathBuf>,
    title: &str,
    html: String,
) -> Result<PathBuf> {
    let path = path.unwrap_or_else(|| PathBuf::from(document_file_name(title)));
    fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "document exported");
    Ok(path)
}

async fn draft_plan<K, S, W>(
    assistant: &Assistant<S>,
    args: PlanArgs,
    heading: &str,
    out: &mut W,
) -> Result<()>
where
    K: PlanPrompt,
    S: CompletionService,
    W: Write,
{
    let idea = ProjectIdea {
        name: args.name,
        description: args.description,
    };
    let mut workbook = PlanWorkbook::<K>::new();
    let applied = assistant
        .draft_plan(&idea, &mut workbook)
        .await
        .map_err(explain)?;

    let title = match idea.name.trim() {
        "" => heading.to_string(),
        name => format!("{heading}: {name}"),
    };
    let path = export(args.output, &title, render_document(&title, &workbook.sections()))?;
    writeln!(
        out,
        "{applied} of {} sections drafted. Saved to {}",
        K::all().len(),
        path.display()
    )?;
    Ok(())
}

async fn refine<K, S, W>(
    assistant: &Assistant<S>,
    args: RefineArgs,
    out: &mut W,
) -> Result<()>
where
    K: PlanPrompt,
    S: CompletionService,
    W: Write,
{
    let section = K::from_key(&args.section)?;
    let mut workbook = PlanWorkbook::<K>::new();
    workbook.set_text(section, args.text);
    assistant
        .refine_section(&mut workbook, section)
        .await
        .map_err(explain)?;

    if let Some(suggestion) = workbook.suggestion(section) {
        writeln!(out, "{}\n", section.title())?;
        write_text(out, "Refined", Some(suggestion.refined.as_str()))?;
        write_text(out, "Advice", Some(suggestion.advice.as_str()))?;
    }
    Ok(())
}

/// Runs one assistant subcommand. `input` feeds the interactive exam.
pub async fn run<S, R, W>(
    assistant: &Assistant<S>,
    command: AiCommand,
    input: R,
    out: &mut W,
) -> Result<()>
where
    S: CompletionService,
    R: BufRead,
    W: Write,
{
    match command {
        AiCommand::BusinessPlan(args) => {
            draft_plan::<BusinessPlanSection, _, _>(assistant, args, "Business plan", out).await
        }
        AiCommand::MarketingPlan(args) => {
            draft_plan::<MarketingPlanSection, _, _>(assistant, args, "Marketing plan", out).await
        }
        AiCommand::Refine(args) => match args.plan {
            PlanKind::Business => refine::<BusinessPlanSection, _, _>(assistant, args, out).await,
            PlanKind::Marketing => refine::<MarketingPlanSection, _, _>(assistant, args, out).await,
        },
        AiCommand::Bmc(args) => {
            let canvas: BmcCanvas = load_form(&args.input)?;
            let analysis = assistant.analyze_bmc(&canvas).await.map_err(explain)?;
            write_score(out, "Success score", analysis.score())?;
            write_list(out, "Strengths", analysis.positives)?;
            write_list(out, "Development tips", analysis.development_tips)?;
            write_text(out, "Overall", analysis.overall_feedback.as_deref())
        }
        AiCommand::Swot(args) => {
            let grid: SwotInput = load_form(&args.input)?;
            let analysis = assistant.analyze_swot(&grid).await.map_err(explain)?;
            write_score(out, "Viability score", clamp_score(analysis.score))?;
            write_text(out, "Strategic advice", analysis.strategic_advice.as_deref())?;
            write_list(out, "Action points", analysis.action_points)
        }
        AiCommand::Pestle(args) => {
            let grid: PestleInput = load_form(&args.input)?;
            let analysis = assistant.analyze_pestle(&grid).await.map_err(explain)?;
            write_text(out, "Summary", analysis.summary.as_deref())?;
            write_list(out, "Key risks", analysis.key_risks)
        }
        AiCommand::Competitor(args) => {
            let form: CompetitorForm = load_form(&args.input)?;
            let analysis = assistant
                .compare_competitor(&form.mine, &form.theirs)
                .await
                .map_err(explain)?;
            write_text(out, "Competitive advantage", analysis.advantage.as_deref())?;
            write_text(out, "Positioning", analysis.positioning.as_deref())
        }
        AiCommand::Identity(IdentityArgs { action }) => match action {
            IdentityAction::Generate { name, field } => {
                let brief = IdentityBrief {
                    project_name: name,
                    field,
                };
                let mut statement = IdentityStatement::default();
                assistant
                    .generate_identity(&brief, &mut statement)
                    .await
                    .map_err(explain)?;
                write_text(out, "Vision", Some(statement.vision.as_str()))?;
                write_text(out, "Mission", Some(statement.mission.as_str()))?;
                write_text(out, "Values", Some(statement.values.as_str()))
            }
            IdentityAction::Review(args) => {
                let statement: IdentityStatement = load_form(&args.input)?;
                let review = assistant
                    .review_identity(&statement)
                    .await
                    .map_err(explain)?;
                write_score(out, "Score", review.score())?;
                write_text(out, "Feedback", review.feedback.as_deref())?;
                write_text(out, "Refined vision", review.refined_vision.as_deref())?;
                write_text(out, "Refined mission", review.refined_mission.as_deref())
            }
        },
        AiCommand::AssetRate(args) => {
            let suggestion = assistant
                .lookup_asset_rate(&args.term)
                .await
                .map_err(explain)?;
            let row = suggestion.to_asset_input(&args.term);
            write_text(out, "Asset", Some(row.name.as_str()))?;
            write_text(out, "Estimated life", suggestion.estimated_life.as_deref())?;
            writeln!(out, "Annual rate: {}%\n", row.rate)?;
            write_text(out, "Reasoning", suggestion.reasoning.as_deref())
        }
        AiCommand::Exam(args) => {
            let mut session = ExamSession::new();
            let count = assistant
                .generate_exam(&mut session)
                .await
                .map_err(explain)?;
            writeln!(
                out,
                "{count} questions ready. Answer with the option number, 'q' to stop."
            )?;
            exercise::take_exam(&mut session, input, out)?;

            let title = "Practice exam";
            let path = export(args.output, title, render_exam(title, &session))?;
            writeln!(out, "Results saved to {}", path.display())?;
            Ok(())
        }
    }
}
