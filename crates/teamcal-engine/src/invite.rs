//! Invitation lifecycle for fan-out copies.
//!
//! Each invitee owns an independent copy of the organizer's event. The
//! copy starts `pending` and moves exactly once to `accepted` or
//! `declined`; both are terminal. The organizer's canonical record carries
//! no invitation state and never participates in this machine.
//!
//! The same module also answers the visibility question the UI needs: may
//! this user edit or delete this record at all? A still-pending invite may
//! not be rewritten under the invitee's feet.

use chrono::NaiveDateTime;
use tracing::debug;

use teamcal_core::{
    Event, EventId, InviteStatus, Recurrence, ScheduleError, ScheduleResult, UserId,
};
use teamcal_store::Principal;

/// An invitee's answer to a pending invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteResponse {
    /// Accept the invitation.
    Accept,
    /// Decline the invitation.
    Decline,
}

impl InviteResponse {
    /// The terminal status this response resolves to.
    pub fn status(self) -> InviteStatus {
        match self {
            Self::Accept => InviteStatus::Accepted,
            Self::Decline => InviteStatus::Declined,
        }
    }
}

/// Returns true if `user` may currently respond to this record.
///
/// Responding requires an invite copy owned by the user, still pending,
/// and not daily-recurring. Daily copies do not exist under the current
/// fan-out policy; the guard covers them anyway.
pub fn can_respond(event: &Event, user: &UserId) -> bool {
    event.owner_id == *user
        && event.is_pending_invite()
        && event.recurrence != Recurrence::Daily
}

/// Returns true if `user` may edit or delete this record.
///
/// Ownership is required, and a still-pending invite copy is locked: the
/// invitee responds first, then may modify their copy. Records that were
/// never fan-out copies, answered copies, and daily-recurring copies are
/// all modifiable by their owner.
pub fn can_modify(event: &Event, user: &UserId) -> bool {
    if event.owner_id != *user {
        return false;
    }
    !(event.is_pending_invite() && event.recurrence != Recurrence::Daily)
}

/// Applies an invitee's response to their copy in the snapshot.
///
/// Guards, in order: the event must exist, must be a fan-out copy, must be
/// owned by the responder, must not be daily-recurring, and must still be
/// pending. A terminal status rejects the transition and leaves the record
/// unchanged.
pub fn respond(
    events: &mut [Event],
    id: &EventId,
    responder: &Principal,
    response: InviteResponse,
    now: NaiveDateTime,
) -> ScheduleResult<Event> {
    let event = events
        .iter_mut()
        .find(|e| e.id == *id)
        .ok_or_else(|| ScheduleError::not_found(id.clone()))?;

    let Some(status) = event.invite_status else {
        return Err(ScheduleError::unauthorized(
            "an organizer record has no invitation to respond to",
        ));
    };
    if event.owner_id != responder.id {
        return Err(ScheduleError::unauthorized(
            "only the invited user may respond to this invitation",
        ));
    }
    if event.recurrence == Recurrence::Daily {
        return Err(ScheduleError::unauthorized(
            "daily recurring invitations do not take responses",
        ));
    }
    if status.is_terminal() {
        return Err(ScheduleError::unauthorized(format!(
            "invitation is already {status}; no further transition is allowed"
        )));
    }

    event.invite_status = Some(response.status());
    event.updated_at = now;
    debug!(
        event_id = %event.id,
        user = %responder.id,
        status = %response.status(),
        "Invitation answered"
    );
    Ok(event.clone())
}
