//! Native terminal driver.
//!
//! Each stdin line is typed into the writing editor; lines starting with
//! `:` are commands. A reader thread forwards lines over a channel and the
//! main loop ticks the application between them.

use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError};

use thiserror::Error;
use web_time::{Duration, Instant};

use crate::app::JadeScrollApp;
use crate::config::AppConfig;
use crate::constants::{CHAPTER_UPDATED_EVENT, CHARACTER_UPDATED_EVENT, TICK_INTERVAL_MS};
use crate::message::{FieldId, Message, RawEvent};
use crate::model::{ModuleId, StateError};
use crate::save::{
    ConnectionState, FileStore, InactiveRemote, StatusDisplay, StatusView, StatusViewError,
    StorageError,
};

/// Errors that end the terminal session before it starts.
#[derive(Error, Debug)]
pub enum NativeError {
    #[error("No data directory available for local storage")]
    NoDataDir,

    #[error("Local storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors in a command line.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing argument for :{0}")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Module(#[from] StateError),
}

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append a line to the editor
    Type(String),
    /// Replace the chapter title
    Title(String),
    Blur,
    Focus,
    Character,
    Chapter,
    Module(ModuleId),
    Status,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Type(line.to_string()));
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest.trim(), ""),
        };

        match name {
            "blur" => Ok(Command::Blur),
            "focus" => Ok(Command::Focus),
            "character" => Ok(Command::Character),
            "chapter" => Ok(Command::Chapter),
            "status" => Ok(Command::Status),
            "quit" | "q" => Ok(Command::Quit),
            "title" => Ok(Command::Title(arg.to_string())),
            "module" if arg.is_empty() => Err(CommandError::MissingArgument("module")),
            "module" => Ok(Command::Module(arg.parse()?)),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Prints statuses to stdout.
#[derive(Debug, Default)]
pub struct TerminalView;

impl StatusView for TerminalView {
    fn render_status(&mut self, display: &StatusDisplay) -> Result<(), StatusViewError> {
        println!("{} {}", display.dot, display.label);
        Ok(())
    }

    fn render_connection(&mut self, connection: ConnectionState) -> Result<(), StatusViewError> {
        println!("[{}]", connection.label());
        Ok(())
    }
}

/// Run an interactive session until `:quit` or end of input.
pub fn run(config: AppConfig) -> Result<(), NativeError> {
    let path = FileStore::default_path().ok_or(NativeError::NoDataDir)?;
    let store = FileStore::open(path.clone())?;
    log::info!("💾 Local storage: {:?}", path);

    let mut app = JadeScrollApp::new(
        config,
        Box::new(InactiveRemote),
        Box::new(store),
        Box::new(TerminalView),
        Instant::now(),
    );
    pollster::block_on(app.initialize(Instant::now(), true));

    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("Type to write. Commands: :blur :focus :character :chapter :title <text> :module <name> :status :quit");
    let tick = Duration::from_millis(TICK_INTERVAL_MS);
    loop {
        match rx.recv_timeout(tick) {
            Ok(line) => match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => handle(&mut app, command, Instant::now()),
                Err(e) => eprintln!("{}", e),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        app.tick(Instant::now());
    }

    let outcome = app.flush(Instant::now());
    log::info!("👋 Session ended ({:?})", outcome);
    Ok(())
}

fn handle(app: &mut JadeScrollApp, command: Command, now: Instant) {
    let editor = FieldId::WritingEditor;
    match command {
        Command::Type(line) => {
            let mut value = app.fields().content.clone();
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(&line);
            app.dispatch(RawEvent::Input { field: editor, value }, now);
        }
        Command::Title(title) => app.dispatch(
            RawEvent::Input {
                field: FieldId::ChapterTitle,
                value: title,
            },
            now,
        ),
        Command::Blur => app.dispatch(RawEvent::Blur { field: editor }, now),
        Command::Focus => {
            let value = app.fields().content.clone();
            app.dispatch(RawEvent::Focus { field: editor, value }, now);
        }
        Command::Character => app.dispatch(
            RawEvent::Custom {
                name: CHARACTER_UPDATED_EVENT.to_string(),
            },
            now,
        ),
        Command::Chapter => app.dispatch(
            RawEvent::Custom {
                name: CHAPTER_UPDATED_EVENT.to_string(),
            },
            now,
        ),
        Command::Module(module) => app.update(Message::SwitchModule(module), now),
        Command::Status => {
            let coordinator = app.coordinator();
            println!(
                "status: {} | {} | module: {} | {} chars | last save: {}",
                app.status().current(),
                coordinator.connection().label(),
                app.state().current_module,
                app.fields().content.chars().count(),
                match coordinator.time_since_last_save(now) {
                    Some(age) => format!("{}s ago", age.as_secs()),
                    None => "never".to_string(),
                }
            );
        }
        Command::Quit => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_are_typed() {
        assert_eq!(
            Command::parse("It was a dark night").unwrap(),
            Command::Type("It was a dark night".to_string())
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(":blur").unwrap(), Command::Blur);
        assert_eq!(Command::parse(":q").unwrap(), Command::Quit);
        assert_eq!(
            Command::parse(":module timeline").unwrap(),
            Command::Module(ModuleId::Timeline)
        );
        assert_eq!(
            Command::parse(":title The Jade Gate").unwrap(),
            Command::Title("The Jade Gate".to_string())
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Command::parse(":module"),
            Err(CommandError::MissingArgument("module"))
        ));
        assert!(matches!(
            Command::parse(":module dungeon"),
            Err(CommandError::Module(StateError::UnknownModule(_)))
        ));
        assert!(matches!(
            Command::parse(":save"),
            Err(CommandError::Unknown(name)) if name == "save"
        ));
    }
}
