//! Per-user, per-day busy intervals derived from an event snapshot.
//!
//! The index collects every commitment of one user, events they organize
//! plus events they are invited to, into ordered interval lists keyed by
//! date. A pending invitation still blocks a slot: the slot finder errs
//! toward showing fewer false "free" slots.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use teamcal_core::{Event, TimeSlot, UserId};

/// Busy intervals for one user over a date range.
///
/// Built once from an immutable snapshot; a pure read with no side
/// effects on the events it indexes.
#[derive(Debug, Clone)]
pub struct ConflictIndex {
    user: UserId,
    busy: BTreeMap<NaiveDate, Vec<TimeSlot>>,
}

impl ConflictIndex {
    /// Builds the index for `user` over the inclusive `[from, to]` range.
    ///
    /// Every event where the user is the organizer or appears in the
    /// attendee set contributes its interval, regardless of invitation
    /// state. Per-day interval lists are sorted by start time.
    pub fn build(snapshot: &[Event], user: &UserId, from: NaiveDate, to: NaiveDate) -> Self {
        let mut busy: BTreeMap<NaiveDate, Vec<TimeSlot>> = BTreeMap::new();

        for event in snapshot {
            if event.date < from || event.date > to || !event.involves(user) {
                continue;
            }
            busy.entry(event.date).or_default().push(event.slot);
        }

        for slots in busy.values_mut() {
            slots.sort();
            // Fan-out copies duplicate the organizer record's interval.
            slots.dedup();
        }

        debug!(
            user = %user,
            days = busy.len(),
            intervals = busy.values().map(Vec::len).sum::<usize>(),
            "Built conflict index"
        );

        Self {
            user: user.clone(),
            busy,
        }
    }

    /// Returns the user this index was built for.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Returns the busy intervals on a given date, ordered by start.
    pub fn busy_on(&self, date: NaiveDate) -> &[TimeSlot] {
        self.busy.get(&date).map_or(&[], Vec::as_slice)
    }

    /// Checks whether a candidate slot is free of conflicts on a date.
    pub fn is_free(&self, date: NaiveDate, slot: &TimeSlot) -> bool {
        !self.busy_on(date).iter().any(|busy| busy.overlaps(slot))
    }

    /// Returns the number of days that have at least one busy interval.
    pub fn busy_day_count(&self) -> usize {
        self.busy.len()
    }

    /// Returns true if the user has no commitments in the range.
    pub fn is_empty(&self) -> bool {
        self.busy.is_empty()
    }
}
