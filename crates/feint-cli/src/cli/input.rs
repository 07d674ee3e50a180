//! Terminal input for the host loop.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use feint_core::feint_session::{Slot, Zone};

/// One line of host input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// `<slot> <zone>`, e.g. `1 head`.
    Choice(Slot, Zone),
    /// `new`: start a rematch.
    Rematch,
    /// `quit`: stop hosting.
    Quit,
}

/// Parses one input line.
pub(crate) fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Err("empty input".to_owned());
    };

    match first.to_ascii_lowercase().as_str() {
        "quit" | "q" | "exit" => return Ok(Command::Quit),
        "new" | "rematch" => return Ok(Command::Rematch),
        _ => {}
    }

    let slot: Slot = first.parse().map_err(|e| format!("{e}"))?;
    let zone: Zone = words
        .next()
        .ok_or_else(|| format!("missing zone after player {slot}"))?
        .parse()
        .map_err(|e| format!("{e}"))?;
    if words.next().is_some() {
        return Err("expected `<player> <zone>`".to_owned());
    }
    Ok(Command::Choice(slot, zone))
}

/// Forwards stdin lines to the frame loop; the channel closes at EOF.
pub(crate) fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
