//! Event record creation, editing, deletion, and invitee fan-out.
//!
//! Creation validates the draft, mints identifiers, and duplicates the
//! organizer's record once per attendee with an independent pending
//! invitation. Daily-recurring events are the exception: they never fan out.
//! Edits re-validate against the original record so that an event already
//! in the past can still be edited, as long as it is not moved further
//! into the past. Deletes remove exactly one record; sibling copies are
//! independently owned and are never cascaded.
//!
//! All operations take the snapshot as an explicit argument; the engine
//! holds no ambient state, and persisting the modified snapshot is the
//! caller's read-modify-write against the store.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use teamcal_core::{
    Event, EventId, EventKind, InviteStatus, Recurrence, RoomId, ScheduleError, ScheduleResult,
    TimeOfDay, TimeSlot, UserId, ValidationError, Visibility,
};
use teamcal_store::{Directory, Principal};

use crate::invite::can_modify;

/// Host of auto-generated meeting links for online events.
const MEETING_LINK_HOST: &str = "https://meet.teamcal.dev";

/// Organizer input for a new event.
#[derive(Debug, Clone)]
pub struct EventDraft {
    /// Event title; must not be blank.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Calendar day of the event.
    pub date: NaiveDate,
    /// Start time; must be strictly before `end`.
    pub start: TimeOfDay,
    /// End time.
    pub end: TimeOfDay,
    /// Physical location, if any.
    pub location: Option<String>,
    /// Free/busy visibility flag.
    pub visibility: Visibility,
    /// Display color tag.
    pub color_tag: String,
    /// Whether the event happens online.
    pub is_online: bool,
    /// Join link; auto-generated when `is_online` and absent.
    pub meeting_link: Option<String>,
    /// Room whose members were invited as a group, if any.
    pub invited_group_id: Option<RoomId>,
    /// Recurrence flag.
    pub recurrence: Recurrence,
    /// Presentational kind.
    pub kind: EventKind,
}

/// Partial update of an existing event.
///
/// `None` fields are left unchanged. There is deliberately no `kind`
/// field: the kind of a record is stable across edits.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New calendar day.
    pub date: Option<NaiveDate>,
    /// New start time.
    pub start: Option<TimeOfDay>,
    /// New end time.
    pub end: Option<TimeOfDay>,
    /// New location.
    pub location: Option<String>,
    /// New visibility flag.
    pub visibility: Option<Visibility>,
    /// New color tag.
    pub color_tag: Option<String>,
    /// New online flag.
    pub is_online: Option<bool>,
    /// New meeting link.
    pub meeting_link: Option<String>,
    /// New invited group.
    pub invited_group_id: Option<RoomId>,
    /// New recurrence flag.
    pub recurrence: Option<Recurrence>,
}

/// The records produced by one create operation.
///
/// The organizer record and its copies are separate records with distinct
/// ids; the caller persists them together in one snapshot write, but no
/// cross-record atomicity is guaranteed beyond that.
#[derive(Debug, Clone)]
pub struct FanOut {
    /// The organizer's canonical record.
    pub organizer_event: Event,
    /// One independently-owned copy per attendee, each pending.
    pub invitee_copies: Vec<Event>,
}

impl FanOut {
    /// Flattens into the records to append to the snapshot.
    pub fn into_records(self) -> Vec<Event> {
        let mut records = vec![self.organizer_event];
        records.extend(self.invitee_copies);
        records
    }

    /// Total number of records produced.
    pub fn record_count(&self) -> usize {
        1 + self.invitee_copies.len()
    }
}

/// Creates an event and fans it out to each attendee.
///
/// Requires an event-managing role. Validates the draft (non-blank title,
/// `start < end`, not in the past, well-formed meeting link), mints a
/// meeting link for online events without one, and produces one pending
/// copy per attendee (none at all when the event recurs daily).
pub fn create_event(
    draft: EventDraft,
    actor: &Principal,
    attendees: &BTreeSet<UserId>,
    directory: &dyn Directory,
    now: NaiveDateTime,
) -> ScheduleResult<FanOut> {
    if !actor.role.can_manage_events() {
        return Err(ScheduleError::unauthorized(
            "only an event-managing role may create events",
        ));
    }

    validate_title(&draft.title)?;
    validate_window(draft.start, draft.end)?;
    let starts_at = draft.date.and_time(draft.start.to_naive_time());
    if starts_at < now {
        return Err(ValidationError::PastDateTime.into());
    }
    for attendee in attendees {
        if *attendee != actor.id && !directory.user_exists(attendee) {
            return Err(ValidationError::UnknownAttendee {
                id: attendee.clone(),
            }
            .into());
        }
    }

    let meeting_link = resolve_meeting_link(draft.is_online, draft.meeting_link)?;
    let attendee_ids: BTreeSet<UserId> = attendees
        .iter()
        .filter(|a| **a != actor.id)
        .cloned()
        .collect();

    let organizer_event = Event {
        id: mint_id(),
        title: draft.title,
        description: draft.description,
        date: draft.date,
        slot: TimeSlot::new(draft.start, draft.end),
        location: draft.location,
        visibility: draft.visibility,
        color_tag: draft.color_tag,
        is_online: draft.is_online,
        meeting_link,
        invited_group_id: draft.invited_group_id,
        recurrence: draft.recurrence,
        kind: draft.kind,
        organizer_id: actor.id.clone(),
        owner_id: actor.id.clone(),
        attendee_ids: attendee_ids.clone(),
        invite_status: None,
        created_at: now,
        updated_at: now,
    };

    // Daily events never fan out; invitees see no copy and get no RSVP.
    let invitee_copies: Vec<Event> = if draft.recurrence == Recurrence::Daily {
        Vec::new()
    } else {
        attendee_ids
            .iter()
            .map(|attendee| {
                let mut copy = organizer_event.clone();
                copy.id = mint_id();
                copy.owner_id = attendee.clone();
                copy.invite_status = Some(InviteStatus::Pending);
                copy
            })
            .collect()
    };

    debug!(
        event_id = %organizer_event.id,
        organizer = %actor.id,
        copies = invitee_copies.len(),
        recurrence = ?organizer_event.recurrence,
        "Created event"
    );

    Ok(FanOut {
        organizer_event,
        invitee_copies,
    })
}

/// Applies a patch to one record in the snapshot.
///
/// The actor must hold an event-managing role and own the record, and the
/// record must not be a still-pending invite copy. The past-date check is
/// floored at the original start: an event already in the past may be
/// edited, but not moved further into the past. `kind` is preserved and
/// existing fan-out copies are never touched.
pub fn update_event(
    events: &mut [Event],
    id: &EventId,
    patch: EventPatch,
    actor: &Principal,
    now: NaiveDateTime,
) -> ScheduleResult<Event> {
    let event = events
        .iter_mut()
        .find(|e| e.id == *id)
        .ok_or_else(|| ScheduleError::not_found(id.clone()))?;

    authorize_modification(event, actor)?;

    let title = patch.title.unwrap_or_else(|| event.title.clone());
    validate_title(&title)?;

    let start = patch.start.unwrap_or(event.slot.start);
    let end = patch.end.unwrap_or(event.slot.end);
    validate_window(start, end)?;

    let date = patch.date.unwrap_or(event.date);
    let new_start = date.and_time(start.to_naive_time());
    // An already-past event stays editable; moving any event to an
    // earlier past instant is rejected.
    if new_start < now && new_start < event.starts_at() {
        return Err(ValidationError::PastDateTime.into());
    }

    if let Some(ref link) = patch.meeting_link {
        validate_meeting_link(link)?;
    }

    event.title = title;
    if let Some(description) = patch.description {
        event.description = description;
    }
    event.date = date;
    event.slot = TimeSlot::new(start, end);
    if let Some(location) = patch.location {
        event.location = Some(location);
    }
    if let Some(visibility) = patch.visibility {
        event.visibility = visibility;
    }
    if let Some(color_tag) = patch.color_tag {
        event.color_tag = color_tag;
    }
    if let Some(is_online) = patch.is_online {
        event.is_online = is_online;
    }
    if let Some(link) = patch.meeting_link {
        event.meeting_link = Some(link);
    }
    if let Some(group) = patch.invited_group_id {
        event.invited_group_id = Some(group);
    }
    if let Some(recurrence) = patch.recurrence {
        event.recurrence = recurrence;
    }
    if event.is_online && event.meeting_link.is_none() {
        event.meeting_link = Some(format!("{MEETING_LINK_HOST}/{}", Uuid::new_v4().simple()));
    }
    event.updated_at = now;

    debug!(event_id = %event.id, actor = %actor.id, "Updated event");
    Ok(event.clone())
}

/// Removes exactly one record from the snapshot.
///
/// Same authorization as [`update_event`]. Sibling invitee copies are
/// independently owned and are not cascaded.
pub fn delete_event(
    events: &mut Vec<Event>,
    id: &EventId,
    actor: &Principal,
) -> ScheduleResult<Event> {
    let position = events
        .iter()
        .position(|e| e.id == *id)
        .ok_or_else(|| ScheduleError::not_found(id.clone()))?;

    authorize_modification(&events[position], actor)?;

    let removed = events.remove(position);
    debug!(event_id = %removed.id, actor = %actor.id, "Deleted event");
    Ok(removed)
}

fn authorize_modification(event: &Event, actor: &Principal) -> ScheduleResult<()> {
    if !actor.role.can_manage_events() {
        return Err(ScheduleError::unauthorized(
            "only an event-managing role may edit or delete events",
        ));
    }
    if event.owner_id != actor.id {
        return Err(ScheduleError::unauthorized(
            "only the record's owner may edit or delete it",
        ));
    }
    if !can_modify(event, &actor.id) {
        return Err(ScheduleError::unauthorized(
            "a pending invitation cannot be edited or deleted before it is answered",
        ));
    }
    Ok(())
}

fn validate_title(title: &str) -> ScheduleResult<()> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankTitle.into());
    }
    Ok(())
}

fn validate_window(start: TimeOfDay, end: TimeOfDay) -> ScheduleResult<()> {
    if start >= end {
        return Err(ValidationError::InvalidTimeWindow.into());
    }
    Ok(())
}

fn validate_meeting_link(link: &str) -> ScheduleResult<()> {
    Url::parse(link).map_err(|_| ValidationError::InvalidMeetingLink {
        link: link.to_owned(),
    })?;
    Ok(())
}

fn resolve_meeting_link(
    is_online: bool,
    supplied: Option<String>,
) -> ScheduleResult<Option<String>> {
    match supplied {
        Some(link) => {
            validate_meeting_link(&link)?;
            Ok(Some(link))
        }
        None if is_online => Ok(Some(format!(
            "{MEETING_LINK_HOST}/{}",
            Uuid::new_v4().simple()
        ))),
        None => Ok(None),
    }
}

fn mint_id() -> EventId {
    EventId::new(Uuid::new_v4().to_string())
}
