use std::ops::Range;

use crate::data::{Day, DepartmentId, ShiftSlot, SlotIndex};

pub const DAYS_PER_WEEK: Day = 7;
pub const WEEKDAYS: Range<Day> = 0..5;
pub const WEEKEND: Range<Day> = 5..7;

const DAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Length of the rest window that follows a worked day, in days.
pub const REST_DAYS: Day = 2;

/// Week structure: how many shift slots each day is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    weekday_slots: SlotIndex,
    weekend_slots: SlotIndex,
}

impl Calendar {
    pub fn new(weekday_slots: SlotIndex, weekend_slots: SlotIndex) -> Self {
        Self {
            weekday_slots,
            weekend_slots,
        }
    }

    /// Slot count for `day`; zero outside the 7-day horizon.
    pub fn slots_for_day(&self, day: Day) -> SlotIndex {
        if WEEKDAYS.contains(&day) {
            self.weekday_slots
        } else if WEEKEND.contains(&day) {
            self.weekend_slots
        } else {
            0
        }
    }

    pub fn days(&self) -> Range<Day> {
        0..DAYS_PER_WEEK
    }

    pub fn weekdays(&self) -> Range<Day> {
        WEEKDAYS
    }

    pub fn is_weekend(&self, day: Day) -> bool {
        WEEKEND.contains(&day)
    }

    pub fn slots_per_week(&self) -> usize {
        self.days().map(|day| self.slots_for_day(day)).sum()
    }

    pub fn day_name(&self, day: Day) -> Option<&'static str> {
        DAY_NAMES.get(day).copied()
    }

    /// Days a nurse must rest after working `day`, clamped to the horizon.
    pub fn rest_window(&self, day: Day) -> Range<Day> {
        let start = (day + 1).min(DAYS_PER_WEEK);
        start..(day + 1 + REST_DAYS).min(DAYS_PER_WEEK)
    }

    /// Every shift slot of the week for `departments` departments, department-major.
    pub fn shift_slots(&self, departments: DepartmentId) -> impl Iterator<Item = ShiftSlot> + '_ {
        (0..departments).flat_map(move |department| {
            self.days().flat_map(move |day| {
                (0..self.slots_for_day(day)).map(move |slot| ShiftSlot {
                    department,
                    day,
                    slot,
                })
            })
        })
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(2, 1)
    }
}
