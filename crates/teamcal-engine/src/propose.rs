//! Free/busy slot proposal.
//!
//! Walks a multi-day horizon at a fixed granularity inside a working-hour
//! window, drops candidates that conflict with the user's existing
//! commitments or lie in the (near) past, scores the survivors, and
//! returns a ranked top-N.
//!
//! The whole computation is pure: identical `(snapshot, user, now)` inputs
//! always produce the identical ordered list. An empty result is a valid
//! answer ("no availability"), never an error.

use chrono::{Days, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use teamcal_core::{Event, TimeOfDay, TimeSlot, UserId};

use crate::conflict::ConflictIndex;

/// No proposed slot may start within this many minutes from now.
pub const LOOKAHEAD_BUFFER_MINUTES: i64 = 15;

/// Scoring and enumeration parameters for slot proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalConfig {
    /// How many days ahead to search, including today.
    pub horizon_days: u32,
    /// Start of the daily working-hour window.
    pub work_start: TimeOfDay,
    /// End of the daily working-hour window (exclusive bound for slot ends).
    pub work_end: TimeOfDay,
    /// Step size at which candidate start times are enumerated.
    pub granularity_minutes: u16,
    /// Length of the meeting being placed.
    pub duration_minutes: u16,
    /// Maximum number of proposals to return.
    pub top_n: usize,
}

impl Default for ProposalConfig {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            work_start: TimeOfDay::from_hm(9, 0).expect("valid time"),
            work_end: TimeOfDay::from_hm(17, 0).expect("valid time"),
            granularity_minutes: 30,
            duration_minutes: 60,
            top_n: 5,
        }
    }
}

impl ProposalConfig {
    /// Set the search horizon in days.
    #[must_use]
    pub fn with_horizon_days(mut self, days: u32) -> Self {
        self.horizon_days = days;
        self
    }

    /// Set the working-hour window.
    #[must_use]
    pub fn with_work_hours(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.work_start = start;
        self.work_end = end;
        self
    }

    /// Set the enumeration granularity in minutes.
    #[must_use]
    pub fn with_granularity_minutes(mut self, minutes: u16) -> Self {
        self.granularity_minutes = minutes;
        self
    }

    /// Set the meeting duration in minutes.
    #[must_use]
    pub fn with_duration_minutes(mut self, minutes: u16) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Set the maximum number of proposals returned.
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

/// A proposed meeting window with its preference score.
///
/// Ephemeral: produced and consumed within one proposal request, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSlot {
    /// Day of the proposed slot.
    pub date: NaiveDate,
    /// Proposed start/end window.
    pub slot: TimeSlot,
    /// Preference score; higher is better.
    pub score: i32,
}

/// Proposes up to `top_n` conflict-free meeting slots for a user.
///
/// Candidates are enumerated per day of the horizon at the configured
/// granularity inside the working-hour window, rejected when they overlap
/// an existing commitment or start within [`LOOKAHEAD_BUFFER_MINUTES`] of
/// `now` on day zero, then scored and ordered by date ascending with ties
/// broken by score descending.
pub fn propose_slots(
    snapshot: &[Event],
    user: &UserId,
    now: NaiveDateTime,
    config: &ProposalConfig,
) -> Vec<CandidateSlot> {
    if config.horizon_days == 0
        || config.granularity_minutes == 0
        || config.duration_minutes == 0
        || config.top_n == 0
    {
        return Vec::new();
    }

    let today = now.date();
    let Some(horizon_end) = today.checked_add_days(Days::new(u64::from(config.horizon_days) - 1))
    else {
        return Vec::new();
    };
    let index = ConflictIndex::build(snapshot, user, today, horizon_end);
    let earliest_start = now + Duration::minutes(LOOKAHEAD_BUFFER_MINUTES);

    let mut candidates = Vec::new();
    for day in 0..config.horizon_days {
        let Some(check_date) = today.checked_add_days(Days::new(u64::from(day))) else {
            break;
        };
        let busy = index.busy_on(check_date);

        for hour in config.work_start.hour()..config.work_end.hour() {
            for minute in (0..60u16).step_by(usize::from(config.granularity_minutes)) {
                let Some(start) = TimeOfDay::from_hm(hour, minute) else {
                    continue;
                };
                let end_minute = start.minute_of_day() + config.duration_minutes;
                if end_minute > config.work_end.minute_of_day() {
                    continue;
                }
                let Some(end) = TimeOfDay::from_minute_of_day(end_minute) else {
                    continue;
                };
                let slot = TimeSlot::new(start, end);

                // Slots today must clear the look-ahead buffer.
                if check_date == today
                    && check_date.and_time(start.to_naive_time()) <= earliest_start
                {
                    continue;
                }

                if busy.iter().any(|b| b.overlaps(&slot)) {
                    continue;
                }

                candidates.push(CandidateSlot {
                    date: check_date,
                    slot,
                    score: score_slot(hour, day),
                });
            }
        }
    }

    candidates.sort_by(|a, b| a.date.cmp(&b.date).then(b.score.cmp(&a.score)));
    candidates.truncate(config.top_n);

    debug!(
        user = %user,
        proposals = candidates.len(),
        horizon_days = config.horizon_days,
        "Proposed meeting slots"
    );
    candidates
}

/// Scores a surviving candidate.
///
/// Base 100, with a morning preference, a mild early-afternoon bonus, a
/// late-day penalty, and a bias toward sooner availability.
fn score_slot(hour: u16, day: u32) -> i32 {
    let mut score = 100;
    if hour < 11 {
        score += 20;
    }
    if (14..16).contains(&hour) {
        score += 10;
    }
    if hour >= 16 {
        score -= 10;
    }
    if day == 0 {
        score += 10;
    }
    if day == 1 {
        score += 5;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use teamcal_core::{EventId, EventKind, Recurrence, Visibility};

    fn tod(h: u16, m: u16) -> TimeOfDay {
        TimeOfDay::from_hm(h, m).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn busy_event(id: &str, day: u32, start: TimeOfDay, end: TimeOfDay, user: &str) -> Event {
        let created = date(1).and_hms_opt(7, 0, 0).unwrap();
        Event {
            id: EventId::from(id),
            title: format!("busy {id}"),
            description: String::new(),
            date: date(day),
            slot: TimeSlot::new(start, end),
            location: None,
            visibility: Visibility::Busy,
            color_tag: String::new(),
            is_online: false,
            meeting_link: None,
            invited_group_id: None,
            recurrence: Recurrence::None,
            kind: EventKind::Meeting,
            organizer_id: UserId::from(user),
            owner_id: UserId::from(user),
            attendee_ids: BTreeSet::new(),
            invite_status: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn alice() -> UserId {
        UserId::from("alice")
    }

    #[test]
    fn deterministic_for_fixed_inputs() {
        let snapshot = vec![
            busy_event("e1", 2, tod(9, 0), tod(10, 0), "alice"),
            busy_event("e2", 3, tod(14, 0), tod(16, 0), "alice"),
        ];
        let now = date(2).and_hms_opt(8, 0, 0).unwrap();
        let config = ProposalConfig::default().with_top_n(20);

        let first = propose_slots(&snapshot, &alice(), now, &config);
        let second = propose_slots(&snapshot, &alice(), now, &config);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn no_proposal_overlaps_a_commitment() {
        let snapshot = vec![
            busy_event("e1", 2, tod(9, 0), tod(12, 0), "alice"),
            busy_event("e2", 2, tod(13, 0), tod(15, 30), "alice"),
            busy_event("e3", 3, tod(10, 0), tod(11, 0), "alice"),
        ];
        let now = date(2).and_hms_opt(7, 0, 0).unwrap();
        let config = ProposalConfig::default().with_top_n(50);
        let index = ConflictIndex::build(&snapshot, &alice(), date(2), date(8));

        let proposals = propose_slots(&snapshot, &alice(), now, &config);
        assert!(!proposals.is_empty());
        for candidate in &proposals {
            assert!(
                index.is_free(candidate.date, &candidate.slot),
                "proposal {candidate:?} overlaps a busy interval"
            );
        }
    }

    #[test]
    fn no_proposal_in_the_past_or_buffer() {
        let now = date(2).and_hms_opt(10, 20, 0).unwrap();
        let proposals =
            propose_slots(&[], &alice(), now, &ProposalConfig::default().with_top_n(100));

        for candidate in &proposals {
            assert!(candidate.date >= now.date());
            if candidate.date == now.date() {
                let start = candidate.date.and_time(candidate.slot.start.to_naive_time());
                assert!(start > now + Duration::minutes(LOOKAHEAD_BUFFER_MINUTES));
            }
        }
        // The buffer runs to 10:35, so 10:30 is out and the earliest slot
        // today is 11:00.
        let earliest_today = proposals
            .iter()
            .filter(|c| c.date == now.date())
            .map(|c| c.slot.start)
            .min()
            .unwrap();
        assert_eq!(earliest_today, tod(11, 0));
    }

    #[test]
    fn buffer_boundary_is_exclusive() {
        // now + 15min == 10:00 exactly; a slot starting at 10:00 is
        // rejected ("<= now + 15min"), 10:30 survives.
        let now = date(2).and_hms_opt(9, 45, 0).unwrap();
        let proposals =
            propose_slots(&[], &alice(), now, &ProposalConfig::default().with_top_n(50));
        let today: Vec<_> = proposals.iter().filter(|c| c.date == now.date()).collect();
        assert!(today.iter().all(|c| c.slot.start != tod(10, 0)));
        assert!(today.iter().any(|c| c.slot.start == tod(10, 30)));
    }

    #[test]
    fn ordered_by_date_then_score() {
        let now = date(2).and_hms_opt(7, 0, 0).unwrap();
        let config = ProposalConfig::default().with_top_n(40);
        let proposals = propose_slots(&[], &alice(), now, &config);

        for pair in proposals.windows(2) {
            assert!(
                pair[0].date < pair[1].date
                    || (pair[0].date == pair[1].date && pair[0].score >= pair[1].score)
            );
        }
    }

    #[test]
    fn morning_conflict_scenario() {
        // One 09:00-10:00 commitment today, now = 08:00: 09:00 must not
        // be proposed, 10:00-11:00 must be, carrying the day-0 bonus.
        let snapshot = vec![busy_event("e1", 2, tod(9, 0), tod(10, 0), "alice")];
        let now = date(2).and_hms_opt(8, 0, 0).unwrap();
        let config = ProposalConfig::default().with_top_n(50);

        let proposals = propose_slots(&snapshot, &alice(), now, &config);
        assert!(
            !proposals
                .iter()
                .any(|c| c.date == date(2) && c.slot.start == tod(9, 0))
        );

        let ten = proposals
            .iter()
            .find(|c| c.date == date(2) && c.slot == TimeSlot::new(tod(10, 0), tod(11, 0)))
            .expect("10:00-11:00 must be proposed");
        // base 100 + morning 20 + day-0 10
        assert_eq!(ten.score, 130);
    }

    #[test]
    fn scoring_bands() {
        let now = date(2).and_hms_opt(7, 0, 0).unwrap();
        let config = ProposalConfig::default().with_top_n(200).with_horizon_days(3);
        let proposals = propose_slots(&[], &alice(), now, &config);

        let score_of = |d: u32, h: u16| {
            proposals
                .iter()
                .find(|c| c.date == date(d) && c.slot.start == tod(h, 0))
                .map(|c| c.score)
                .unwrap()
        };

        assert_eq!(score_of(2, 9), 130); // morning + day 0
        assert_eq!(score_of(2, 12), 110); // midday + day 0
        assert_eq!(score_of(2, 14), 120); // early afternoon + day 0
        assert_eq!(score_of(2, 16), 100); // late penalty + day 0
        assert_eq!(score_of(3, 9), 125); // morning + day 1
        assert_eq!(score_of(4, 9), 120); // morning, no day bias
    }

    #[test]
    fn slot_must_fit_inside_work_hours() {
        let now = date(2).and_hms_opt(7, 0, 0).unwrap();
        let config = ProposalConfig::default()
            .with_duration_minutes(90)
            .with_top_n(200);
        let proposals = propose_slots(&[], &alice(), now, &config);

        for candidate in &proposals {
            assert!(candidate.slot.end <= config.work_end);
        }
        // 16:00 + 90min would end 17:30; the latest viable start is 15:30.
        assert!(proposals.iter().all(|c| c.slot.start <= tod(15, 30)));
    }

    #[test]
    fn granularity_steps_need_not_divide_the_hour() {
        let now = date(2).and_hms_opt(7, 0, 0).unwrap();
        let config = ProposalConfig::default()
            .with_granularity_minutes(45)
            .with_top_n(200);
        let proposals = propose_slots(&[], &alice(), now, &config);

        let minutes: BTreeSet<u16> =
            proposals.iter().map(|c| c.slot.start.minute()).collect();
        assert_eq!(minutes, BTreeSet::from([0, 45]));
    }

    #[test]
    fn fully_booked_horizon_yields_empty_result() {
        let snapshot: Vec<Event> = (0..7)
            .map(|d| busy_event(&format!("e{d}"), 2 + d, tod(9, 0), tod(17, 0), "alice"))
            .collect();
        let now = date(2).and_hms_opt(7, 0, 0).unwrap();

        let proposals = propose_slots(&snapshot, &alice(), now, &ProposalConfig::default());
        assert!(proposals.is_empty());
    }

    #[test]
    fn truncates_to_top_n() {
        let now = date(2).and_hms_opt(7, 0, 0).unwrap();
        let proposals = propose_slots(&[], &alice(), now, &ProposalConfig::default());
        assert_eq!(proposals.len(), 5);
    }

    #[test]
    fn degenerate_configs_yield_empty() {
        let now = date(2).and_hms_opt(7, 0, 0).unwrap();
        for config in [
            ProposalConfig::default().with_horizon_days(0),
            ProposalConfig::default().with_granularity_minutes(0),
            ProposalConfig::default().with_duration_minutes(0),
            ProposalConfig::default().with_top_n(0),
        ] {
            assert!(propose_slots(&[], &alice(), now, &config).is_empty());
        }
    }

    #[test]
    fn candidate_serializes_for_display() {
        let now = date(2).and_hms_opt(7, 0, 0).unwrap();
        let proposals = propose_slots(&[], &alice(), now, &ProposalConfig::default());
        let json = serde_json::to_value(&proposals[0]).unwrap();
        assert_eq!(json["date"], "2026-03-02");
        assert_eq!(json["slot"]["start"], "09:00");
        assert_eq!(json["score"], 130);
    }

    #[test]
    fn other_users_events_do_not_block() {
        let snapshot = vec![busy_event("e1", 2, tod(9, 0), tod(17, 0), "bob")];
        let now = date(2).and_hms_opt(7, 0, 0).unwrap();
        let proposals = propose_slots(&snapshot, &alice(), now, &ProposalConfig::default());
        assert!(!proposals.is_empty());
    }
}
