//! Core types: time-of-day intervals, events, invitation state, errors

pub mod error;
pub mod event;
pub mod time;
pub mod tracing;

pub use error::{ScheduleError, ScheduleResult, ValidationError};
pub use event::{
    Event, EventId, EventKind, InviteStatus, Recurrence, RoomId, UserId, Visibility,
};
pub use time::{MalformedTimeError, TimeOfDay, TimeSlot, MINUTES_PER_DAY};
pub use tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
