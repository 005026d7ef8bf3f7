//! Error taxonomy for scheduling operations.
//!
//! Every engine failure surfaces synchronously as a typed error; nothing is
//! silently swallowed. An empty slot-proposal result is a valid value, not
//! an error.

use thiserror::Error;

use crate::event::{EventId, UserId};
use crate::time::MalformedTimeError;

/// A specialized Result type for scheduling operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Errors that can occur during scheduling operations.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A temporal or structural constraint was violated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A time string could not be parsed.
    #[error(transparent)]
    MalformedTime(#[from] MalformedTimeError),

    /// The targeted event id is absent from the snapshot.
    #[error("no event with id {id} in the snapshot")]
    NotFound {
        /// The missing event id.
        id: EventId,
    },

    /// A role or ownership check failed on edit, delete, or an invitation
    /// transition.
    #[error("not authorized: {reason}")]
    Unauthorized {
        /// Which check failed.
        reason: String,
    },
}

impl ScheduleError {
    /// Creates a not-found error for the given event id.
    pub fn not_found(id: EventId) -> Self {
        Self::NotFound { id }
    }

    /// Creates an authorization error with the given reason.
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }
}

/// A violated validation constraint.
///
/// Each variant's message names the specific constraint so callers can
/// surface it verbatim instead of a generic failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The title was empty or whitespace-only.
    #[error("title must not be blank")]
    BlankTitle,

    /// The start time was not strictly before the end time.
    #[error("end time must be after start time")]
    InvalidTimeWindow,

    /// The combined date and start time lie in the past.
    #[error("event date and start time must not be in the past")]
    PastDateTime,

    /// A caller-supplied meeting link is not an absolute URL.
    #[error("meeting link is not a valid URL: {link}")]
    InvalidMeetingLink {
        /// The rejected link.
        link: String,
    },

    /// An invited user id does not exist in the directory.
    #[error("attendee {id} is not a known user")]
    UnknownAttendee {
        /// The unknown user id.
        id: UserId,
    },
}
