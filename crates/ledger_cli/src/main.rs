//! Command line front end for the creation ledger.
//!
//! # Responsibility
//! - Map subcommands onto `ledger_core` use-cases.
//! - Print outcomes; exit non-zero on rejections and failures.

use clap::{Parser, Subcommand};
use ledger_core::{
    ensure_layout, ensure_registries, init_logging, load_settings, AppendOutcome,
    BuiltinTemplates, CaptureError, CaptureObserver, CaptureOutcome, CaptureService,
    EntryDraft, FsEntryRepository, FsRegistryRepository, LedgerPaths, LedgerSettings,
    LoggingConfig, RegistryStore, StatusService, VocabularyCategory,
};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const SETTINGS_FILE_NAME: &str = ".ledger.json";

#[derive(Parser, Debug)]
#[command(name = "ledger")]
#[command(about = "Capture timestamped creation entries into a notes vault")]
#[command(version)]
struct Cli {
    /// Vault root folder
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    vault: PathBuf,

    /// Settings file (defaults to `<vault>/.ledger.json`)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write rolling log files into this folder
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the ledger folders and any missing registries
    Init,
    /// Create a new entry
    Capture {
        #[arg(long)]
        title: String,
        #[arg(long)]
        status: String,
        #[arg(long, default_value = "")]
        project: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        action: String,
        #[arg(long, default_value = "")]
        deliverable: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Print the values of one registry
    List {
        /// projects|statuses|tags|actions|deliverables
        category: String,
    },
    /// Change the header status of an existing entry
    SetStatus { file: PathBuf, status: String },
    /// Print the effective settings
    Config,
}

/// Prints registry additions and the created entry.
struct PrintObserver;

impl CaptureObserver for PrintObserver {
    fn values_registered(&self, outcome: &AppendOutcome) {
        println!(
            "added to {}: {}",
            outcome.category.registry_name(),
            outcome.added.join(", ")
        );
    }

    fn entry_created(&self, outcome: &CaptureOutcome) {
        println!("created {}", outcome.path.display());
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| ledger_core::default_log_level().to_string());
        let config = LoggingConfig::new(level, absolute(log_dir)?).with_echo_warnings(true);
        init_logging(&config).map_err(|err| err.to_string())?;
    }

    let settings_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.vault.join(SETTINGS_FILE_NAME));
    let settings = load_settings(&settings_path).map_err(|err| err.to_string())?;
    let paths = LedgerPaths::resolve(&cli.vault, &settings);
    let store =
        RegistryStore::new(FsRegistryRepository::new(&paths)).with_templates(BuiltinTemplates);

    match cli.command {
        Command::Init => init(&store, &paths),
        Command::Capture {
            title,
            status,
            project,
            category,
            action,
            deliverable,
            tags,
            notes,
        } => {
            let draft = EntryDraft::new(title, status)
                .with_project(project)
                .with_category(category)
                .with_action(action)
                .with_deliverable(deliverable)
                .with_tags(tags)
                .with_notes(notes);
            capture(&store, &paths, &settings, &draft)
        }
        Command::List { category } => {
            let category = VocabularyCategory::parse(&category)
                .ok_or_else(|| format!("unknown registry `{category}`"))?;
            for item in store.suggestions(category) {
                println!("{item}");
            }
            Ok(())
        }
        Command::SetStatus { file, status } => {
            let applied = StatusService::new(&store, FsEntryRepository)
                .set_status(&file, &status)
                .map_err(|err| err.to_string())?;
            println!("status: {applied}");
            Ok(())
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings).map_err(|err| err.to_string())?;
            println!("{rendered}");
            Ok(())
        }
    }
}

fn init(store: &RegistryStore<FsRegistryRepository>, paths: &LedgerPaths) -> Result<(), String> {
    ensure_layout(&FsEntryRepository, paths).map_err(|err| err.to_string())?;
    let report = ensure_registries(store);
    for category in &report.created {
        println!("created {}", store.location(*category).display());
    }
    for (category, message) in &report.failed {
        eprintln!("warning: {} registry: {message}", category.registry_name());
    }
    if report.is_ok() {
        Ok(())
    } else {
        Err(format!("{} registries could not be created", report.failed.len()))
    }
}

fn capture(
    store: &RegistryStore<FsRegistryRepository>,
    paths: &LedgerPaths,
    settings: &LedgerSettings,
    draft: &EntryDraft,
) -> Result<(), String> {
    let service = CaptureService::new(
        store,
        FsEntryRepository,
        paths.root(),
        settings.frontmatter_type.as_str(),
    )
    .with_observer(PrintObserver);

    match service.capture_now(draft) {
        Ok(outcome) => {
            for failure in &outcome.registration_failures {
                eprintln!(
                    "warning: could not update {} registry: {}",
                    failure.category.registry_name(),
                    failure.message
                );
            }
            info!("event=cli_capture module=cli status=ok");
            Ok(())
        }
        Err(CaptureError::Rejected(rejection)) => {
            Err(format!("rejected: {rejection}"))
        }
        Err(err) => Err(format!("{err} (stage: {})", err.stage())),
    }
}

fn absolute(path: &Path) -> Result<PathBuf, String> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|err| format!("cannot resolve `{}`: {err}", path.display()))
}
