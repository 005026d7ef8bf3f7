//! Scheduling engine: conflict index, slot proposer, event records, invitations
//!
//! Every operation takes the event snapshot as an explicit argument and
//! returns its results as values; the engine holds no ambient state and
//! never mutates anything as a side effect of a read. Persisting changed
//! snapshots is the caller's job, through the `teamcal-store` contracts.

pub mod conflict;
pub mod invite;
pub mod manager;
pub mod propose;

pub use conflict::ConflictIndex;
pub use invite::{can_modify, can_respond, respond, InviteResponse};
pub use manager::{create_event, delete_event, update_event, EventDraft, EventPatch, FanOut};
pub use propose::{propose_slots, CandidateSlot, ProposalConfig, LOOKAHEAD_BUFFER_MINUTES};
