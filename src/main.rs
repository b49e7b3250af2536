use std::path::PathBuf;

use ambient::catalog;
use ambient::config::{AppConfig, ConfigError};
use ambient::export::{self, ExportError};
use ambient::session::{Headless, Session};
use ambient::storage::{FileStore, StorageError};
use canvas::camera::Point;
use canvas::doc::{NoteColor, NoteId, NotePatch};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no note with id `{0}`")]
    UnknownNote(String),
    #[error("no wallpaper with id `{0}`")]
    UnknownBackground(String),
    #[error("no track with id `{0}`")]
    UnknownTrack(String),
    #[error("unknown color `{0}` (expected default, blue, purple, amber or emerald)")]
    InvalidColor(String),
    #[error("nothing to edit; pass --content or --color")]
    NothingToEdit,
}

#[derive(Parser, Debug)]
#[command(name = "ambient", about = "Headless driver for an ambient sticky-note board")]
struct Cli {
    /// Storage file holding notes, wallpaper and track.
    #[arg(long, global = true, env = "AMBIENT_DATA_FILE")]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every note as JSON.
    List,
    /// Create a note, centered in the viewport unless a position is given.
    New {
        #[arg(long, requires = "y")]
        x: Option<f64>,
        #[arg(long, requires = "x")]
        y: Option<f64>,
        #[arg(long)]
        content: Option<String>,
    },
    Edit {
        id: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    Move {
        id: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    Resize {
        id: String,
        width: f64,
        height: f64,
    },
    Delete {
        id: String,
    },
    /// Write a dated JSON export of every note.
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Replace every note with the contents of an export file.
    Import {
        file: PathBuf,
    },
    Backgrounds,
    Background {
        id: String,
    },
    Tracks,
    /// Select a track by id, or `none` to stop playback.
    Track {
        id: String,
    },
}

type HeadlessSession = Session<FileStore, Headless, Headless>;

fn main() -> Result<(), CliError> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("warning: failed to read .env: {e}");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(path) = cli.data_file {
        config.data_file = path;
    }

    let store = FileStore::open(&config.data_file)?;
    let mut session = Session::open(store, Headless::default(), Headless::default(), &config);
    run(&mut session, cli.command)
}

fn run(session: &mut HeadlessSession, command: Command) -> Result<(), CliError> {
    match command {
        Command::List => print_json(&session.notes()),
        Command::New { x, y, content } => {
            let position = x.zip(y).map(|(x, y)| Point::new(x, y));
            session.create_note(position)?;
            let Some(note) = session.notes().last().cloned() else {
                return Ok(());
            };
            if let Some(text) = content {
                session.update_note(&note.id, &NotePatch::content(text))?;
            }
            println!("{}", note.id);
            Ok(())
        }
        Command::Edit { id, content, color } => {
            let color = color
                .map(|name| NoteColor::parse(&name.to_ascii_lowercase()).ok_or(CliError::InvalidColor(name)))
                .transpose()?;
            if content.is_none() && color.is_none() {
                return Err(CliError::NothingToEdit);
            }
            edit_note(session, &id, &NotePatch { content, color, ..Default::default() })
        }
        Command::Move { id, x, y } => edit_note(session, &id, &NotePatch::position(Point::new(x, y))),
        Command::Resize { id, width, height } => edit_note(session, &id, &NotePatch::size(width, height)),
        Command::Delete { id } => {
            let id = existing_note(session, &id)?;
            session.delete_note(&id)?;
            Ok(())
        }
        Command::Export { dir } => {
            let date = time::OffsetDateTime::now_utc().date();
            let path = session.export_to(&dir, date)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Import { file } => {
            let notes = export::read_import(&file)?;
            session.import_notes(notes)?;
            println!("imported {} notes", session.notes().len());
            Ok(())
        }
        Command::Backgrounds => {
            let current = &session.background().id;
            for bg in catalog::backgrounds() {
                let marker = if &bg.id == current { '*' } else { ' ' };
                println!("{marker} {:>2}  {}", bg.id, bg.name);
            }
            Ok(())
        }
        Command::Background { id } => {
            if !session.select_background(&id)? {
                return Err(CliError::UnknownBackground(id));
            }
            println!("{}", session.background().name);
            Ok(())
        }
        Command::Tracks => {
            let current = session.audio().track.as_ref().map(|t| t.id.clone());
            for track in catalog::tracks() {
                let marker = if current.as_ref() == Some(&track.id) { '*' } else { ' ' };
                println!("{marker} {:>2}  {}", track.id, track.name);
            }
            Ok(())
        }
        Command::Track { id } => {
            let selection = if id.eq_ignore_ascii_case("none") { None } else { Some(id.as_str()) };
            if !session.select_track(selection)? {
                return Err(CliError::UnknownTrack(id));
            }
            match &session.audio().track {
                Some(track) => println!("{}", track.name),
                None => println!("no track"),
            }
            Ok(())
        }
    }
}

fn existing_note(session: &HeadlessSession, id: &str) -> Result<NoteId, CliError> {
    let id = NoteId::from(id);
    if session.engine().note(&id).is_none() {
        return Err(CliError::UnknownNote(id.to_string()));
    }
    Ok(id)
}

/// Apply `patch` and print the note as stored, after clamping.
fn edit_note(session: &mut HeadlessSession, id: &str, patch: &NotePatch) -> Result<(), CliError> {
    let id = existing_note(session, id)?;
    session.update_note(&id, patch)?;
    print_json(&session.engine().note(&id))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
