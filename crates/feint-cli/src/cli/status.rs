//! Status command: what a remote player needs before choosing.

use anyhow::{bail, Context, Result};
use feint_core::feint_session::{SessionId, SessionStore, Slot};
use feint_core::{DuelConfig, Role};

/// Execute the status command.
///
/// # Errors
///
/// Returns an error if the store cannot be read or no session has `code`.
pub(crate) fn execute(config: &DuelConfig, code: &SessionId, slot: Slot) -> Result<()> {
    let store = config
        .open_file_store()
        .with_context(|| format!("opening session store {}", config.session_dir.display()))?;

    if !store.exists(code)? {
        bail!("no session with code {code}");
    }
    let record = store
        .snapshot(code)
        .with_context(|| format!("reading session {code}"))?;

    let role = if record.holds_attack(slot) {
        Role::Attacker
    } else {
        Role::Defender
    };
    let mine = record
        .choice(slot)
        .map_or_else(|| "not chosen".to_owned(), |zone| zone.to_string());
    let theirs = if record.choice(slot.other()).is_some() {
        "ready"
    } else {
        "choosing"
    };

    println!("session {code}: player {slot} picks {role}");
    println!("your choice: {mine}");
    println!("opponent: {theirs}");
    Ok(())
}
