//! Submit command: one remote write.

use anyhow::{Context, Result};
use feint_core::feint_session::{ParticipantId, SessionId, SessionStore, Slot, Zone};
use feint_core::DuelConfig;

/// Execute the submit command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the session does not
/// exist, or the session lock stays busy.
pub(crate) fn execute(
    config: &DuelConfig,
    code: &SessionId,
    slot: Slot,
    zone: Zone,
    participant: Option<i64>,
) -> Result<()> {
    let store = config
        .open_file_store()
        .with_context(|| format!("opening session store {}", config.session_dir.display()))?;

    if let Some(participant) = participant {
        store
            .bind_participant(code, slot, ParticipantId::new(participant))
            .with_context(|| format!("binding participant to session {code}"))?;
    }

    let accepted = store
        .try_set_choice(code, slot, zone)
        .with_context(|| format!("submitting to session {code}"))?;

    if accepted {
        println!("choice accepted");
    } else {
        println!("choice already made");
    }
    Ok(())
}
