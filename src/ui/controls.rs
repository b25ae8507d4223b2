//! Terminal controls
//!
//! One command per stdin line, standing in for the page's buttons:
//!
//! | Command    | Button                         |
//! |------------|--------------------------------|
//! | `start`    | overlay "New Game"             |
//! | `new`      | reset                          |
//! | `flip`     | flip board                     |
//! | `resize N` | window resize (square width N) |
//! | `quit`     | close the page                 |
//!
//! Commands are case-insensitive; `help` lists them.

/// A parsed control command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    New,
    Flip,
    Resize(usize),
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("Unknown command '{0}'. Type 'help' for a list.")]
    Unknown(String),

    #[error("Usage: resize <width 1-5>")]
    BadWidth,
}

pub const HELP: &str = "Commands: start, new, flip, resize <1-5>, help, quit";

/// Parse one input line; blank lines yield `None`
pub fn parse_command(line: &str) -> Option<Result<Command, ControlError>> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_ascii_lowercase();

    let command = match verb.as_str() {
        "start" => Ok(Command::Start),
        "new" | "reset" => Ok(Command::New),
        "flip" => Ok(Command::Flip),
        "resize" => match (words.next().map(str::parse::<usize>), words.next()) {
            (Some(Ok(width)), None) => Ok(Command::Resize(width)),
            _ => Err(ControlError::BadWidth),
        },
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => Err(ControlError::Unknown(line.trim().to_string())),
    };
    Some(command)
}
