//! Event types for the scheduling engine.
//!
//! This module provides the persisted calendar record and its satellite
//! enums:
//! - [`Event`]: a scheduled item, either the organizer's own record or a
//!   per-invitee fan-out copy
//! - [`InviteStatus`]: the lifecycle state of a fan-out copy
//! - [`Recurrence`], [`EventKind`], [`Visibility`]: flag-level attributes
//!
//! Invitation state is carried as `Option<InviteStatus>`: `None` marks the
//! organizer's canonical record, `Some(_)` marks a fan-out copy. The
//! organizer record therefore cannot carry an invite status by
//! construction.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time::TimeSlot;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an opaque identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Opaque unique identifier of an [`Event`] record.
    EventId
);
string_id!(
    /// Opaque identifier of a user in the directory.
    UserId
);
string_id!(
    /// Opaque identifier of a room in the directory.
    RoomId
);

/// Recurrence flag of an event.
///
/// Recurring events are recorded at flag level only; occurrences are never
/// expanded into individual instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    /// One-off event.
    #[default]
    None,
    /// Repeats every day. Daily events never fan out invitee copies.
    Daily,
    /// Repeats every week.
    Weekly,
    /// Repeats every month.
    Monthly,
}

/// Presentational classification of a record.
///
/// Purely cosmetic, but stable: an edit must never change the kind of an
/// existing record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A meeting with attendees.
    #[default]
    Meeting,
    /// A generic calendar event.
    Event,
}

/// How the event appears on free/busy lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// The event blocks the owner's time.
    #[default]
    Busy,
    /// The event does not block the owner's time.
    Free,
}

/// Lifecycle state of a fan-out copy.
///
/// `Pending` is the only initial state; `Accepted` and `Declined` are
/// terminal; no further transition is defined from either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    /// The invitee has not responded yet.
    #[default]
    Pending,
    /// The invitee accepted. Terminal.
    Accepted,
    /// The invitee declined. Terminal.
    Declined,
}

impl InviteStatus {
    /// Returns true if no further transition is allowed from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Declined)
    }

    /// Returns a human-readable name for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled calendar record.
///
/// One organizer action produces one canonical record plus, for each
/// attendee, an independently-owned fan-out copy carrying its own
/// [`InviteStatus`]. All records live side by side in the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier of this record (copies get their own ids).
    pub id: EventId,
    /// The event title.
    pub title: String,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Calendar day of the event (local wall-clock).
    pub date: NaiveDate,
    /// Start/end window, same day, half-open.
    pub slot: TimeSlot,
    /// Physical location, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free/busy visibility flag.
    #[serde(default)]
    pub visibility: Visibility,
    /// Display color tag.
    #[serde(default)]
    pub color_tag: String,
    /// Whether the event happens online.
    #[serde(default)]
    pub is_online: bool,
    /// Join link for online events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    /// Room whose members were invited as a group, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invited_group_id: Option<RoomId>,
    /// Recurrence flag.
    #[serde(default)]
    pub recurrence: Recurrence,
    /// Presentational kind, stable across edits.
    #[serde(default)]
    pub kind: EventKind,
    /// The user who created the event; preserved on every copy.
    pub organizer_id: UserId,
    /// The user this record belongs to: the organizer for the canonical
    /// record, the invitee for a fan-out copy.
    pub owner_id: UserId,
    /// All invited users (organizer excluded).
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub attendee_ids: BTreeSet<UserId>,
    /// Invitation state. `None` for the organizer's record, `Some` for a
    /// fan-out copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_status: Option<InviteStatus>,
    /// Creation timestamp (local wall-clock).
    pub created_at: NaiveDateTime,
    /// Last-modified timestamp (local wall-clock).
    pub updated_at: NaiveDateTime,
}

impl Event {
    /// Returns true if this record is a per-invitee fan-out copy.
    pub fn is_invite_copy(&self) -> bool {
        self.invite_status.is_some()
    }

    /// Returns true if this is a fan-out copy still awaiting a response.
    pub fn is_pending_invite(&self) -> bool {
        self.invite_status == Some(InviteStatus::Pending)
    }

    /// Returns true if the given user is committed to this event, either
    /// as its organizer or as an invited attendee.
    ///
    /// A pending invite still counts as a commitment: the slot finder errs
    /// toward showing fewer false "free" slots.
    pub fn involves(&self, user: &UserId) -> bool {
        self.organizer_id == *user || self.attendee_ids.contains(user)
    }

    /// Returns the event start as a local date-time.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.slot.start.to_naive_time())
    }

    /// Returns the event end as a local date-time.
    pub fn ends_at(&self) -> NaiveDateTime {
        self.date.and_time(self.slot.end.to_naive_time())
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the meeting link.
    pub fn with_meeting_link(mut self, link: impl Into<String>) -> Self {
        self.meeting_link = Some(link.into());
        self
    }

    /// Builder method to set the invited group.
    pub fn with_invited_group(mut self, room: RoomId) -> Self {
        self.invited_group_id = Some(room);
        self
    }
}
