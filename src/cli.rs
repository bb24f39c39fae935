use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "redflag",
    version,
    about = "Flowing red flag class evaluation tally CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default settings.json into the workspace
    Init(InitCommand),
    /// Set one period score
    Score(ScoreCommand),
    /// Manage bonus and penalty adjustments
    #[command(subcommand)]
    Adjust(AdjustCommands),
    /// Ranked totals
    Totals(ViewCommand),
    /// Per-category breakdown for every class
    Table(ViewCommand),
    /// Flag winners
    #[command(name = "result")]
    Outcome(ViewCommand),
    Undo(WorkspaceCommand),
    Redo(WorkspaceCommand),
    /// List recorded snapshots
    History(ViewCommand),
    /// Load a recorded snapshot by index
    Restore(RestoreCommand),
    /// Reset all scores to max and clear adjustments
    Reset(ResetCommand),
    /// Save the current data document
    Save(SaveCommand),
    /// Load a saved data document
    Load(LoadCommand),
    /// List saved data documents in the root directory
    Files(WorkspaceCommand),
    /// Manage the class roster
    #[command(subcommand)]
    Class(ClassCommands),
    /// Change a category's max score
    MaxScore(MaxScoreCommand),
    /// Show or change the root directory for data files
    Root(RootCommand),
}

#[derive(Clone, Debug, ValueEnum)]
pub enum HalfDayArg {
    Am,
    Pm,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Args)]
pub struct WorkspaceCommand {
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ViewCommand {
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct InitCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ScoreCommand {
    pub path: PathBuf,
    #[arg(long)]
    pub category: String,
    #[arg(long = "class")]
    pub class_id: String,
    /// Weekday, 1 (Monday) to 5 (Friday)
    #[arg(long)]
    pub period: u8,
    /// Session for dual-period categories
    #[arg(long, value_enum)]
    pub half: Option<HalfDayArg>,
    #[arg(allow_negative_numbers = true)]
    pub value: f64,
}

#[derive(Subcommand)]
pub enum AdjustCommands {
    Add(AdjustAddCommand),
    Remove(AdjustRemoveCommand),
    List(ViewCommand),
}

#[derive(Args)]
pub struct AdjustAddCommand {
    pub path: PathBuf,
    #[arg(long = "class")]
    pub class_id: String,
    /// add or subtract
    #[arg(long)]
    pub kind: String,
    #[arg(long, allow_negative_numbers = true)]
    pub amount: f64,
    #[arg(long)]
    pub note: String,
}

#[derive(Args)]
pub struct AdjustRemoveCommand {
    pub path: PathBuf,

    #[arg(long, required_unless_present = "class_id", conflicts_with = "class_id")]
    pub id: Option<u64>,

    #[arg(long = "class", requires_all = ["kind", "amount", "note"])]
    pub class_id: Option<String>,
    #[arg(long)]
    pub kind: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub amount: Option<f64>,
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Args)]
pub struct RestoreCommand {
    pub path: PathBuf,
    pub index: usize,
}

#[derive(Args)]
pub struct ResetCommand {
    pub path: PathBuf,
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args)]
pub struct SaveCommand {
    pub path: PathBuf,
    /// Target file; defaults to a timestamped file in the root directory
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct LoadCommand {
    pub path: PathBuf,
    pub file: PathBuf,
}

#[derive(Subcommand)]
pub enum ClassCommands {
    List(ViewCommand),
    Add(ClassAddCommand),
    Remove(ClassNameCommand),
    Up(ClassNameCommand),
    Down(ClassNameCommand),
    Weight(ClassWeightCommand),
    /// Write class_config.json into the root directory
    Export(WorkspaceCommand),
    /// Replace the roster from class_config.json in the root directory
    Import(WorkspaceCommand),
}

#[derive(Args)]
pub struct ClassAddCommand {
    pub path: PathBuf,
    pub name: String,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub weight: f64,
}

#[derive(Args)]
pub struct ClassNameCommand {
    pub path: PathBuf,
    pub name: String,
}

#[derive(Args)]
pub struct ClassWeightCommand {
    pub path: PathBuf,
    pub name: String,
    #[arg(allow_negative_numbers = true)]
    pub value: f64,
}

#[derive(Args)]
pub struct MaxScoreCommand {
    pub path: PathBuf,
    pub category: String,
    #[arg(allow_negative_numbers = true)]
    pub value: f64,
}

#[derive(Args)]
pub struct RootCommand {
    pub path: PathBuf,
    pub directory: Option<PathBuf>,
}
