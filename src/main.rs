mod cli;
mod config;
mod error;
mod history;
mod report;
mod session;
mod storage;
mod tally;
mod telemetry;
mod types;

use crate::error::TallyError;
use crate::report::View;
use crate::session::{Evaluation, MoveDirection};
use crate::types::category::HalfDay;
use crate::types::settings::Settings;
use clap::Parser;
use std::io::{self, Write};
use std::path::Path;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const NO_CHANGE: i32 = 1;
    pub const INVALID_INPUT: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn run() -> Result<i32, TallyError> {
    let cli = cli::Cli::parse();
    telemetry::init(cli.verbose, cli.quiet);

    match cli.command {
        cli::Commands::Init(cmd) => {
            let settings_path = cmd.path.join(config::DEFAULT_SETTINGS_FILE);
            if settings_path.exists() && !cmd.force {
                return Err(TallyError::Validation(format!(
                    "{} already exists (use --force to overwrite)",
                    settings_path.display()
                )));
            }
            std::fs::create_dir_all(&cmd.path)?;
            let path = config::save_settings(&cmd.path, &Settings::default())?;
            println!("settings file: {}", path.display());
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Score(cmd) => {
            let mut evaluation = Evaluation::open(&cmd.path)?;
            let half = cmd.half.map(|half| match half {
                cli::HalfDayArg::Am => HalfDay::Am,
                cli::HalfDayArg::Pm => HalfDay::Pm,
            });
            let average =
                evaluation.set_score(&cmd.category, &cmd.class_id, cmd.period, cmd.value, half)?;
            evaluation.persist()?;
            let session = half.map(|half| format!(" {}", half.label())).unwrap_or_default();
            println!(
                "{} {}{} period {} set to {}, average: {:.2}",
                cmd.class_id, cmd.category, session, cmd.period, cmd.value, average
            );
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Adjust(command) => match command {
            cli::AdjustCommands::Add(cmd) => {
                let mut evaluation = Evaluation::open(&cmd.path)?;
                let id =
                    evaluation.add_adjustment(&cmd.class_id, &cmd.kind, cmd.amount, &cmd.note)?;
                evaluation.persist()?;
                println!("adjustment #{id} added for {}", cmd.class_id);
                Ok(exit_code::SUCCESS)
            }
            cli::AdjustCommands::Remove(cmd) => {
                let mut evaluation = Evaluation::open(&cmd.path)?;
                let removed = match (cmd.id, cmd.class_id, cmd.kind, cmd.amount, cmd.note) {
                    (Some(id), ..) => Some(evaluation.remove_adjustment(id)?),
                    (None, Some(class_id), Some(kind), Some(amount), Some(note)) => {
                        evaluation.remove_matching_adjustment(&class_id, &kind, amount, &note)?
                    }
                    _ => {
                        return Err(TallyError::Validation(
                            "either --id or --class, --kind, --amount and --note are required"
                                .to_string(),
                        ))
                    }
                };
                match removed {
                    Some(entry) => {
                        evaluation.persist()?;
                        println!("adjustment #{} removed", entry.id);
                        Ok(exit_code::SUCCESS)
                    }
                    None => {
                        println!("adjust: no matching adjustment");
                        Ok(exit_code::NO_CHANGE)
                    }
                }
            }
            cli::AdjustCommands::List(cmd) => {
                let evaluation = Evaluation::open(&cmd.path)?;
                let lines = evaluation.adjustment_lines();
                print_view(View::Adjustments(&lines), &cmd.format)
            }
        },
        cli::Commands::Totals(cmd) => {
            let evaluation = Evaluation::open(&cmd.path)?;
            let standings = evaluation.totals();
            print_view(View::Standings(&standings), &cmd.format)
        }
        cli::Commands::Table(cmd) => {
            let evaluation = Evaluation::open(&cmd.path)?;
            let table = evaluation.table();
            print_view(View::Table(&table), &cmd.format)
        }
        cli::Commands::Outcome(cmd) => {
            let evaluation = Evaluation::open(&cmd.path)?;
            let result = evaluation.result();
            print_view(View::Result(&result), &cmd.format)
        }
        cli::Commands::Undo(cmd) => {
            let mut evaluation = Evaluation::open(&cmd.path)?;
            if !evaluation.undo()? {
                println!("undo: nothing to undo");
                return Ok(exit_code::NO_CHANGE);
            }
            evaluation.persist()?;
            println!("undo: at entry {}", evaluation.history().current_index());
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Redo(cmd) => {
            let mut evaluation = Evaluation::open(&cmd.path)?;
            if !evaluation.redo()? {
                println!("redo: nothing to redo");
                return Ok(exit_code::NO_CHANGE);
            }
            evaluation.persist()?;
            println!("redo: at entry {}", evaluation.history().current_index());
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::History(cmd) => {
            let evaluation = Evaluation::open(&cmd.path)?;
            let lines = evaluation.history_lines();
            print_view(View::History(&lines), &cmd.format)
        }
        cli::Commands::Restore(cmd) => {
            let mut evaluation = Evaluation::open(&cmd.path)?;
            let recorded_at = evaluation.restore(cmd.index)?;
            evaluation.persist()?;
            println!("restored entry {} recorded at {recorded_at}", cmd.index);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Reset(cmd) => {
            let mut evaluation = Evaluation::open(&cmd.path)?;
            if !cmd.yes && !confirm("Reset all scores and clear adjustments? [y/N]: ")? {
                println!("reset cancelled");
                return Ok(exit_code::NO_CHANGE);
            }
            evaluation.reset();
            evaluation.persist()?;
            println!("reset complete");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Save(cmd) => {
            let evaluation = Evaluation::open(&cmd.path)?;
            let path = evaluation.save_data(cmd.output.as_deref())?;
            println!("data file: {}", path.display());
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Load(cmd) => {
            let mut evaluation = Evaluation::open(&cmd.path)?;
            evaluation.load_data(&cmd.file)?;
            evaluation.persist()?;
            println!(
                "loaded {} ({} classes)",
                cmd.file.display(),
                evaluation.classes().len()
            );
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Files(cmd) => {
            let evaluation = Evaluation::open(&cmd.path)?;
            let files = evaluation.data_files();
            if files.is_empty() {
                println!("files: no data files in {}", evaluation.root_dir().display());
            }
            for file in &files {
                println!("{}", file.display());
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Class(command) => run_class(command),
        cli::Commands::MaxScore(cmd) => {
            let mut evaluation = Evaluation::open(&cmd.path)?;
            evaluation.set_max_score(&cmd.category, cmd.value)?;
            evaluation.persist()?;
            println!("{} max score: {}", cmd.category, cmd.value);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Root(cmd) => {
            let mut evaluation = Evaluation::open(&cmd.path)?;
            let root = match &cmd.directory {
                Some(directory) => evaluation.set_root_directory(directory)?,
                None => evaluation.root_dir(),
            };
            println!("root directory: {}", root.display());
            Ok(exit_code::SUCCESS)
        }
    }
}

fn run_class(command: cli::ClassCommands) -> Result<i32, TallyError> {
    match command {
        cli::ClassCommands::List(cmd) => {
            let evaluation = Evaluation::open(&cmd.path)?;
            let lines = evaluation.class_lines();
            print_view(View::Classes(&lines), &cmd.format)
        }
        cli::ClassCommands::Add(cmd) => {
            let mut evaluation = Evaluation::open(&cmd.path)?;
            evaluation.add_class(&cmd.name, cmd.weight)?;
            evaluation.persist()?;
            println!("class added: {}", cmd.name.trim());
            Ok(exit_code::SUCCESS)
        }
        cli::ClassCommands::Remove(cmd) => {
            let mut evaluation = Evaluation::open(&cmd.path)?;
            evaluation.remove_class(&cmd.name)?;
            evaluation.persist()?;
            println!("class removed: {}", cmd.name);
            Ok(exit_code::SUCCESS)
        }
        cli::ClassCommands::Up(cmd) => move_class(&cmd.path, &cmd.name, MoveDirection::Up),
        cli::ClassCommands::Down(cmd) => move_class(&cmd.path, &cmd.name, MoveDirection::Down),
        cli::ClassCommands::Weight(cmd) => {
            let mut evaluation = Evaluation::open(&cmd.path)?;
            evaluation.set_weight(&cmd.name, cmd.value)?;
            evaluation.persist()?;
            println!("{} weighted addition: {}", cmd.name, cmd.value);
            Ok(exit_code::SUCCESS)
        }
        cli::ClassCommands::Export(cmd) => {
            let evaluation = Evaluation::open(&cmd.path)?;
            let path = evaluation.export_class_config()?;
            println!("class config: {}", path.display());
            Ok(exit_code::SUCCESS)
        }
        cli::ClassCommands::Import(cmd) => {
            let mut evaluation = Evaluation::open(&cmd.path)?;
            if !evaluation.import_class_config()? {
                println!("class: no {} in root directory", config::CLASS_CONFIG_FILE);
                return Ok(exit_code::NO_CHANGE);
            }
            evaluation.persist()?;
            println!("class config imported: {} classes", evaluation.classes().len());
            Ok(exit_code::SUCCESS)
        }
    }
}

fn move_class(workspace: &Path, name: &str, direction: MoveDirection) -> Result<i32, TallyError> {
    let mut evaluation = Evaluation::open(workspace)?;
    if !evaluation.move_class(name, direction)? {
        println!("class: {name} is already at the end of the roster");
        return Ok(exit_code::NO_CHANGE);
    }
    evaluation.persist()?;
    let lines = evaluation.class_lines();
    print_view(View::Classes(&lines), &cli::ReportFormat::Md)
}

fn print_view(view: View<'_>, format: &cli::ReportFormat) -> Result<i32, TallyError> {
    let output_format = match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    };
    let rendered = report::render(view, output_format)?;
    println!("{rendered}");
    Ok(exit_code::SUCCESS)
}

fn confirm(prompt: &str) -> Result<bool, TallyError> {
    print!("{prompt}");
    io::stdout().flush().map_err(TallyError::Io)?;
    let mut input = String::new();
    io::stdin().read_line(&mut input).map_err(TallyError::Io)?;
    let normalized = input.trim().to_ascii_lowercase();
    Ok(normalized == "y" || normalized == "yes")
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = if e.is_user_input() {
                exit_code::INVALID_INPUT
            } else {
                exit_code::RUNTIME_FAILURE
            };
            std::process::exit(code);
        }
    }
}
