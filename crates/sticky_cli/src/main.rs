//! CLI probe for the sticky-notes core.
//!
//! # Responsibility
//! - Verify `sticky_core` linkage with a deterministic version line.
//! - Inspect the configured notes directory without the desktop shell.

use clap::{Parser, Subcommand};
use log::error;
use sticky_core::{
    init_logging, theme::theme_names, AppConfig, DocumentBuffer, EmbeddedObject, FsNoteStore,
    NoteStore, ThemeStore, OBJECT_PLACEHOLDER,
};
use std::error::Error;
use std::process::ExitCode;

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(name = "sticky_cli", version, about = "Inspect sticky notes from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the core crate version.
    Version,
    /// List notes in the notes directory.
    List,
    /// Render one note with placeholders for embedded objects.
    Show {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Show the active theme, or switch to a built-in one.
    Theme {
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = AppConfig::from_env();
    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let result = match cli.command.unwrap_or(Command::Version) {
        Command::Version => {
            println!("sticky_core version={}", sticky_core::core_version());
            Ok(())
        }
        Command::List => list_notes(&config),
        Command::Show { name } => show_note(&config, &name),
        Command::Theme { name } => switch_theme(&config, name.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn list_notes(config: &AppConfig) -> CliResult {
    let store = FsNoteStore::open(&config.notes_dir)?;
    for name in store.list_notes()? {
        println!("{name}");
    }
    Ok(())
}

fn show_note(config: &AppConfig, name: &str) -> CliResult {
    let store = FsNoteStore::open(&config.notes_dir)?;
    let document = DocumentBuffer::from_records(store.load_note(name)?);

    println!("{}", document.render(OBJECT_PLACEHOLDER));
    for (index, id) in document.embedded_ids().enumerate() {
        match document.object(id) {
            Some(EmbeddedObject::Card(card)) => {
                println!(
                    "[{index}] card title={:?} bg={}",
                    card.title(),
                    card.frame().background()
                );
            }
            Some(EmbeddedObject::Table(table)) => {
                println!(
                    "[{index}] table {}x{} widths={} align={}",
                    table.rows(),
                    table.cols(),
                    table.column_widths(),
                    table.alignment().as_str()
                );
            }
            None => {}
        }
    }
    Ok(())
}

fn switch_theme(config: &AppConfig, name: Option<&str>) -> CliResult {
    let mut theme = ThemeStore::load(&config.theme_file);
    if let Some(name) = name {
        if !theme.set_theme(name)? {
            return Err(format!(
                "unknown theme `{name}`; expected {}",
                theme_names().join("|")
            )
            .into());
        }
    }
    println!(
        "theme={} bg={} fg={}",
        theme.name(),
        theme.color("bg"),
        theme.color("fg")
    );
    Ok(())
}
