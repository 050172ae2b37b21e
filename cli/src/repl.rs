//! Line-oriented front end. Each line is split like a shell command and parsed
//! with clap.

use crate::worker::Request;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::mpsc::{Receiver, Sender};

#[derive(Parser, Debug)]
#[command(
    name = "unitrack",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Line {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Start timing an issue, or the one recalled with prev/next.
    Start { issue: Option<String> },
    /// Start a timer that submits itself after MINUTES.
    Limit {
        issue: String,
        #[arg(allow_hyphen_values = true)]
        minutes: Option<String>,
    },
    /// Answer the limit prompt.
    Minutes {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    Pause,
    Resume,
    /// Book the elapsed time, rounded up to 15 minutes.
    Submit,
    /// Discard the timer (asks for confirmation).
    Cancel,
    Yes,
    No,
    Status,
    /// List previously used issues.
    History,
    /// Recall an older issue.
    Prev,
    /// Recall a newer issue.
    Next,
    #[command(alias = "exit")]
    Quit,
}

impl Command {
    /// `None` for `quit`.
    fn into_request(self) -> Option<Request> {
        let request = match self {
            Command::Start { issue } => Request::Start { issue },
            Command::Limit { issue, minutes } => Request::Limit { issue, minutes },
            Command::Minutes { value } => Request::Minutes { input: value },
            Command::Pause => Request::Pause,
            Command::Resume => Request::Resume,
            Command::Submit => Request::Submit,
            Command::Cancel => Request::Cancel,
            Command::Yes => Request::Yes,
            Command::No => Request::No,
            Command::Status => Request::Status,
            Command::History => Request::History,
            Command::Prev => Request::Prev,
            Command::Next => Request::Next,
            Command::Quit => return None,
        };
        Some(request)
    }
}

pub fn readline() -> Result<Option<String>, String> {
    write!(std::io::stdout(), "> ").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())?;
    let mut buffer = String::new();
    let read = std::io::stdin()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(buffer))
}

fn parse(line: &str) -> Result<Option<Command>, String> {
    let args = shlex::split(line).ok_or("error: Invalid quoting")?;
    let line = Line::try_parse_from(args).map_err(|e| e.to_string())?;
    Ok(line.command)
}

/// Runs until `quit` or end of input.
pub fn run(requests: &Sender<Request>, replies: &Receiver<String>) -> Result<(), String> {
    while let Some(line) = readline()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, requests, replies) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{}", err.trim_end()).map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

fn respond(
    line: &str,
    requests: &Sender<Request>,
    replies: &Receiver<String>,
) -> Result<bool, String> {
    let Some(command) = parse(line)? else {
        return Ok(false);
    };
    let Some(request) = command.into_request() else {
        return Ok(true);
    };

    requests
        .send(request)
        .map_err(|_| "error: timer worker stopped".to_string())?;
    let reply = replies
        .recv()
        .map_err(|_| "error: timer worker stopped".to_string())?;
    writeln!(std::io::stdout(), "{reply}").map_err(|e| e.to_string())?;
    Ok(false)
}
