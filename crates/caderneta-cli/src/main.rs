mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{
    backup, completions, contacts, dedup, groups, phone, stats, transfer, Context,
};
use crate::error::{exit_code_for, report_error};
use caderneta_config as config;
use caderneta_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "caderneta", version, about = "caderneta CLI")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
    #[command(name = "add-contact")]
    AddContact(contacts::AddContactArgs),
    #[command(name = "edit-contact")]
    EditContact(contacts::EditContactArgs),
    Show(contacts::ShowArgs),
    List(contacts::ListArgs),
    Delete(contacts::DeleteArgs),
    #[command(subcommand)]
    Group(groups::GroupCommand),
    #[command(subcommand)]
    Dedup(dedup::DedupCommand),
    #[command(subcommand)]
    Phone(phone::PhoneCommand),
    #[command(subcommand)]
    Import(transfer::ImportCommand),
    #[command(subcommand)]
    Export(transfer::ExportCommand),
    Stats(stats::StatsArgs),
    Backup(backup::BackupArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let command = match command {
        // Completions never need the store or config.
        Command::Completions(args) => return completions::emit(args),
        other => other,
    };

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    if verbose {
        debug!(path = %db_path.display(), "database path resolved");
    }

    let store = Store::open(&db_path)
        .with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;

    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
    };

    match command {
        Command::AddContact(args) => contacts::add_contact(&ctx, args),
        Command::EditContact(args) => contacts::edit_contact(&ctx, args),
        Command::Show(args) => contacts::show_contact(&ctx, args),
        Command::List(args) => contacts::list_contacts(&ctx, args),
        Command::Delete(args) => contacts::delete_contact(&ctx, args),
        Command::Group(cmd) => match cmd {
            groups::GroupCommand::Add(args) => groups::add_group(&ctx, args),
            groups::GroupCommand::Rm(args) => groups::remove_group(&ctx, args),
            groups::GroupCommand::Ls(args) => groups::list_groups(&ctx, args),
            groups::GroupCommand::Rename(args) => groups::rename_group(&ctx, args),
        },
        Command::Dedup(cmd) => match cmd {
            dedup::DedupCommand::Scan(args) => dedup::scan(&ctx, args),
        },
        Command::Phone(cmd) => match cmd {
            phone::PhoneCommand::Check(args) => phone::check(&ctx, args),
            phone::PhoneCommand::Format(args) => phone::format(&ctx, args),
        },
        Command::Import(cmd) => match cmd {
            transfer::ImportCommand::Csv(args) => transfer::import_csv(&ctx, args),
        },
        Command::Export(cmd) => match cmd {
            transfer::ExportCommand::Csv(args) => transfer::export_csv(&ctx, args),
            transfer::ExportCommand::Json(args) => transfer::export_json(&ctx, args),
        },
        Command::Stats(args) => stats::stats(&ctx, args),
        Command::Backup(args) => backup::backup(&ctx, args),
        Command::Completions(_) => unreachable!("completions handled before store initialization"),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
