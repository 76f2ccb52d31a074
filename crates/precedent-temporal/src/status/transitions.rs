//! Status state machine.
//!
//! `Active -> {Overruled, Superseded, Deprecated}` by an ordinary transition.
//! `Overruled | Superseded -> Active` only by reinstatement on the authority
//! of another entity. Everything else is refused.

use precedent_core::errors::{PrecedentResult, TemporalError};
use precedent_core::models::{PrecedentStatus, StatusChangeKind};

pub fn check_transition(
    entity_id: &str,
    from: PrecedentStatus,
    to: PrecedentStatus,
    kind: StatusChangeKind,
    triggering_entity_id: Option<&str>,
) -> PrecedentResult<()> {
    use PrecedentStatus::*;

    let allowed = match kind {
        StatusChangeKind::Transition => {
            from == Active && matches!(to, Overruled | Superseded | Deprecated)
        }
        StatusChangeKind::Reinstated => {
            if triggering_entity_id.map_or(true, str::is_empty) {
                return Err(TemporalError::MissingReinstatingAuthority {
                    entity_id: entity_id.to_string(),
                }
                .into());
            }
            from.is_reinstatable() && to == Active
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(TemporalError::InvalidStatusTransition {
            entity_id: entity_id.to_string(),
            from,
            to,
        }
        .into())
    }
}
