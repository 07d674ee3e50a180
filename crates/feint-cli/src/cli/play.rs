//! Play command: the authoritative host loop.

use std::sync::mpsc::TryRecvError;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use feint_core::feint_session::{SessionError, Slot};
use feint_core::{DuelConfig, MatchHost, Resolution, Role, TurnError};

use super::input::{parse_command, spawn_stdin_reader, Command};

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the session store cannot be opened or fails
/// mid-match for any reason other than a busy lock.
pub(crate) fn execute(config: &DuelConfig) -> Result<()> {
    let store = Arc::new(
        config
            .open_file_store()
            .with_context(|| format!("opening session store {}", config.session_dir.display()))?,
    );
    let seed = config.resolve_seed();
    let mut host = MatchHost::start(config.build_controller(seed), store)
        .context("creating session")?;

    println!("Session code: {} (seed {seed})", host.session_id());
    println!("Enter `<player> <zone>` (e.g. `1 head`), `new` for a rematch, `quit` to stop.");
    println!("{}", host.controller().last_log());
    print_prompt(&host);

    let input = spawn_stdin_reader();
    let mut input_open = true;

    loop {
        thread::sleep(config.frame_interval());

        while input_open {
            match input.try_recv() {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match parse_command(&line) {
                        Ok(Command::Quit) => return Ok(()),
                        Ok(Command::Rematch) => rematch(&mut host)?,
                        Ok(Command::Choice(slot, zone)) => match host.submit_local(slot, zone) {
                            Ok(true) => println!("Player {slot} is ready."),
                            Ok(false) => println!("Player {slot} has already chosen."),
                            Err(TurnError::MatchOver) => {
                                println!("The match is over. Type `new` for a rematch.");
                            }
                            Err(e) if is_busy(&e) => tracing::warn!("{e}"),
                            Err(e) => return Err(e.into()),
                        },
                        Err(msg) => println!("{msg}"),
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::debug!("stdin closed, hosting remote input only");
                    input_open = false;
                }
            }
        }

        match host.tick() {
            Ok(Some(resolution)) => report(&host, &resolution),
            Ok(None) => {}
            Err(e) if is_busy(&e) => tracing::warn!("{e}"),
            Err(e) => return Err(e.into()),
        }

        if !input_open && host.controller().is_over() {
            return Ok(());
        }
    }
}

fn rematch(host: &mut MatchHost) -> Result<()> {
    if let Err(e) = host.reset_match() {
        if !is_busy(&e) {
            return Err(e.into());
        }
        tracing::warn!("{e}");
    }
    println!("{}", host.controller().last_log());
    print_prompt(host);
    Ok(())
}

fn report(host: &MatchHost, resolution: &Resolution) {
    let controller = host.controller();
    let attacker = controller.fighter(resolution.attacker);
    let defender = controller.fighter(resolution.defender);

    println!(
        "Turn {}: {} -> {}: {}",
        resolution.turn,
        attacker.name(),
        defender.name(),
        resolution.outcome
    );
    println!(
        "  {} {:.1}/{:.1} HP | {} {:.1}/{:.1} HP",
        controller.fighter(Slot::One).name(),
        controller.fighter(Slot::One).display_health(),
        controller.fighter(Slot::One).max_health(),
        controller.fighter(Slot::Two).name(),
        controller.fighter(Slot::Two).display_health(),
        controller.fighter(Slot::Two).max_health(),
    );

    if let Some(summary) = host.summary() {
        println!();
        println!("{summary}");
        println!();
        println!("Type `new` for a rematch or `quit` to stop.");
    } else {
        print_prompt(host);
    }
}

fn print_prompt(host: &MatchHost) {
    let controller = host.controller();
    let attacker = controller.slot_for(Role::Attacker);
    println!(
        "Player {} picks {}, player {} picks {}.",
        attacker,
        Role::Attacker,
        attacker.other(),
        Role::Defender
    );
}

fn is_busy(e: &TurnError) -> bool {
    matches!(e, TurnError::Session(SessionError::Busy { .. }))
}
