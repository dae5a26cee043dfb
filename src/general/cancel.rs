use std::io::{stdin, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::{debug, info};

use crate::error::Interrupted;

/// Shared stop flag, checked between units of work.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), Interrupted> {
        if self.is_cancelled() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}

/// What a line typed on stdin asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Stop,
    Help,
    Unknown,
    Empty,
}

pub fn parse_command(line: &str) -> Command {
    let cmd = line.trim();
    if cmd.is_empty() {
        Command::Empty
    } else if cmd.eq_ignore_ascii_case("exit") || cmd.eq_ignore_ascii_case("quit") || cmd.eq_ignore_ascii_case("q") {
        Command::Stop
    } else if cmd.eq_ignore_ascii_case("help") || cmd.eq_ignore_ascii_case("h") {
        Command::Help
    } else {
        Command::Unknown
    }
}

/// Spawn a thread that reads lines from an interactive stdin. `exit`, `quit`
/// or `q` cancels `token`. End of input stops listening without cancelling.
///
/// Returns `None` when stdin is not a terminal.
pub fn spawn_stdin_handler(token: CancelToken) -> Option<thread::JoinHandle<()>> {
    if !stdin().is_terminal() {
        debug!("stdin is not a terminal, cancellation commands disabled");
        return None;
    }
    Some(thread::spawn(move || {
        let stdin = stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            match parse_command(&line) {
                Command::Stop => {
                    info!("Stop requested, finishing current step");
                    token.cancel();
                    break;
                }
                Command::Help => {
                    eprintln!("Commands:");
                    eprintln!("  help/h           - Show this help");
                    eprintln!("  exit/quit/q      - Stop transposing");
                }
                Command::Unknown => {
                    eprintln!("Unrecognized command: '{}'. Type 'help' for available commands.", line.trim());
                }
                Command::Empty => {}
            }
        }
    }))
}
