//! Availability engine - pure slot computation.
//!
//! Candidate slots are generated on a fixed grid inside the daily operating
//! window and checked against the day's existing non-canceled appointments.
//! The computation is a point-in-time snapshot: it takes no locks, and the
//! final word on double booking belongs to the persistence constraint on
//! `(tenant_id, professional_id, date)`.

use serde::{Deserialize, Serialize};

/// Daily operating window and slot grid, in minutes from midnight.
///
/// The defaults encode the fixed 09:00-18:00 window on a 30-minute grid.
/// `default_duration_minutes` applies when a booking carries no services.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduleGrid {
    pub open_minutes: u32,
    pub close_minutes: u32,
    pub step_minutes: u32,
    pub default_duration_minutes: u32,
}

impl Default for ScheduleGrid {
    fn default() -> Self {
        Self {
            open_minutes: 9 * 60,
            close_minutes: 18 * 60,
            step_minutes: 30,
            default_duration_minutes: 60,
        }
    }
}

/// An occupied interval on the day under consideration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedInterval {
    /// Start, in minutes from midnight.
    pub start_minutes: u32,

    /// Occupied length in minutes.
    pub duration_minutes: u32,
}

impl BookedInterval {
    pub fn new(start_minutes: u32, duration_minutes: u32) -> Self {
        Self {
            start_minutes,
            duration_minutes,
        }
    }

    fn end_minutes(&self) -> u32 {
        self.start_minutes + self.duration_minutes
    }
}

/// Computes the open slots for one day.
///
/// A candidate `[start, start + duration)` is kept when it ends inside the
/// operating window and does not overlap any booked interval. Overlap is
/// half-open: `slot_start < booked_end && slot_end > booked_start`, so
/// touching boundaries do not collide.
///
/// Returns ordered `HH:MM` strings; empty when the day is fully booked.
pub fn available_slots(
    grid: &ScheduleGrid,
    duration_minutes: u32,
    booked: &[BookedInterval],
) -> Vec<String> {
    let mut slots = Vec::new();
    if grid.step_minutes == 0 || duration_minutes == 0 {
        return slots;
    }

    let mut start = grid.open_minutes;
    while start + duration_minutes <= grid.close_minutes {
        let end = start + duration_minutes;
        let collides = booked
            .iter()
            .any(|b| start < b.end_minutes() && end > b.start_minutes);
        if !collides {
            slots.push(format_minutes(start));
        }
        start += grid.step_minutes;
    }
    slots
}

fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid() -> ScheduleGrid {
        ScheduleGrid::default()
    }

    #[test]
    fn empty_day_yields_full_grid() {
        let slots = available_slots(&grid(), 30, &[]);
        assert_eq!(slots.first().map(String::as_str), Some("09:00"));
        assert_eq!(slots.last().map(String::as_str), Some("17:30"));
        assert_eq!(slots.len(), 18);
    }

    #[test]
    fn last_slot_accounts_for_duration() {
        // A 60-minute booking cannot start at 17:30.
        let slots = available_slots(&grid(), 60, &[]);
        assert_eq!(slots.last().map(String::as_str), Some("17:00"));
    }

    #[test]
    fn touching_boundaries_do_not_collide() {
        // Existing 30-minute appointment at 10:00. A 30-minute candidate at
        // 09:30 ends exactly at 10:00 and must be kept; 10:00 itself is
        // taken; 10:30 starts exactly at the booked end and must be kept.
        let booked = [BookedInterval::new(10 * 60, 30)];
        let slots = available_slots(&grid(), 30, &booked);

        assert!(slots.contains(&"09:30".to_string()));
        assert!(!slots.contains(&"10:00".to_string()));
        assert!(slots.contains(&"10:30".to_string()));
    }

    #[test]
    fn long_booking_shadows_preceding_grid_points() {
        // 10:00-12:00 booked; a 60-minute candidate at 09:30 would overlap.
        let booked = [BookedInterval::new(10 * 60, 120)];
        let slots = available_slots(&grid(), 60, &booked);

        assert!(slots.contains(&"09:00".to_string()));
        assert!(!slots.contains(&"09:30".to_string()));
        assert!(!slots.contains(&"11:30".to_string()));
        assert!(slots.contains(&"12:00".to_string()));
    }

    #[test]
    fn fully_booked_day_is_empty() {
        let booked = [BookedInterval::new(9 * 60, 9 * 60)];
        assert!(available_slots(&grid(), 30, &booked).is_empty());
    }

    #[test]
    fn zero_duration_yields_nothing() {
        assert!(available_slots(&grid(), 0, &[]).is_empty());
    }

    fn parse_minutes(slot: &str) -> u32 {
        let (h, m) = slot.split_once(':').unwrap();
        h.parse::<u32>().unwrap() * 60 + m.parse::<u32>().unwrap()
    }

    proptest! {
        #[test]
        fn slots_never_exceed_window(
            duration in 1u32..240,
            starts in proptest::collection::vec(0u32..1440, 0..8),
        ) {
            let booked: Vec<_> = starts
                .iter()
                .map(|&s| BookedInterval::new(s, 30))
                .collect();
            let g = grid();
            for slot in available_slots(&g, duration, &booked) {
                let start = parse_minutes(&slot);
                prop_assert!(start >= g.open_minutes);
                prop_assert!(start + duration <= g.close_minutes);
            }
        }

        #[test]
        fn slots_never_overlap_bookings(
            duration in 1u32..240,
            bookings in proptest::collection::vec((540u32..1080, 15u32..120), 0..8),
        ) {
            let booked: Vec<_> = bookings
                .iter()
                .map(|&(s, d)| BookedInterval::new(s, d))
                .collect();
            for slot in available_slots(&grid(), duration, &booked) {
                let start = parse_minutes(&slot);
                let end = start + duration;
                for b in &booked {
                    prop_assert!(
                        end <= b.start_minutes || start >= b.end_minutes(),
                        "slot {}..{} overlaps booking {}..{}",
                        start, end, b.start_minutes, b.end_minutes()
                    );
                }
            }
        }

        #[test]
        fn slots_are_ordered_and_grid_aligned(duration in 1u32..240) {
            let g = grid();
            let slots = available_slots(&g, duration, &[]);
            let minutes: Vec<u32> = slots.iter().map(|s| parse_minutes(s)).collect();
            let mut sorted = minutes.clone();
            sorted.sort_unstable();
            prop_assert_eq!(&minutes, &sorted);
            for m in minutes {
                prop_assert_eq!((m - g.open_minutes) % g.step_minutes, 0);
            }
        }
    }
}
