use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::calendar::Calendar;
use crate::error::{Result, RosterError};

// Type aliases for clarity
pub type DepartmentId = usize;
pub type NurseId = usize;
pub type Day = usize;
pub type SlotIndex = usize;

/// One unit of required coverage: a department's slot on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ShiftSlot {
    pub department: DepartmentId,
    pub day: Day,
    pub slot: SlotIndex,
}

/// Key of one decision variable: nurse `nurse` covers `slot` of `day` in `department`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentKey {
    pub department: DepartmentId,
    pub nurse: NurseId,
    pub day: Day,
    pub slot: SlotIndex,
}

impl AssignmentKey {
    pub fn new(department: DepartmentId, nurse: NurseId, day: Day, slot: SlotIndex) -> Self {
        Self {
            department,
            nurse,
            day,
            slot,
        }
    }
}

impl fmt::Display for AssignmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shift_d{}_n{}_day{}_s{}",
            self.department, self.nurse, self.day, self.slot
        )
    }
}

/// The complete input of a roster request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RosterConfig {
    pub departments: usize,
    pub nurses: usize,
    pub weekday_slots: SlotIndex,
    pub weekend_slots: SlotIndex,
    /// How many distinct rosters to enumerate before stopping the search.
    pub solution_limit: usize,
    /// Wall-clock bound on the whole search, in seconds.
    pub time_limit_secs: Option<f64>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            departments: 15,
            nurses: 100,
            weekday_slots: 2,
            weekend_slots: 1,
            solution_limit: 1,
            time_limit_secs: Some(60.0),
        }
    }
}

impl RosterConfig {
    pub fn new(departments: usize, nurses: usize) -> Self {
        Self {
            departments,
            nurses,
            ..Self::default()
        }
    }

    pub fn calendar(&self) -> Calendar {
        Calendar::new(self.weekday_slots, self.weekend_slots)
    }

    pub fn validate(&self) -> Result<()> {
        if self.departments == 0 {
            return Err(RosterError::InvalidConfig(
                "at least one department is required".to_string(),
            ));
        }
        if self.nurses == 0 {
            return Err(RosterError::InvalidConfig(
                "at least one nurse is required".to_string(),
            ));
        }
        if self.weekday_slots == 0 || self.weekend_slots == 0 {
            return Err(RosterError::InvalidConfig(format!(
                "every day needs at least one slot (weekday: {}, weekend: {})",
                self.weekday_slots, self.weekend_slots
            )));
        }
        if self.solution_limit == 0 {
            return Err(RosterError::InvalidConfig(
                "solution limit must be positive".to_string(),
            ));
        }
        self.time_limit()?;
        Ok(())
    }

    /// The search deadline as a `Duration`; rejects values it cannot represent.
    pub fn time_limit(&self) -> Result<Option<Duration>> {
        let Some(secs) = self.time_limit_secs else {
            return Ok(None);
        };
        match Duration::try_from_secs_f64(secs) {
            Ok(limit) if !limit.is_zero() => Ok(Some(limit)),
            _ => Err(RosterError::InvalidConfig(format!(
                "time limit must be a positive, representable number of seconds, got {secs}"
            ))),
        }
    }
}

/// Read-only view of one department's week: `days[day][slot]` is the covering nurse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSchedule {
    pub department: DepartmentId,
    pub days: Vec<Vec<Option<NurseId>>>,
}

/// One extracted solution: every department's schedule plus per-nurse slot counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub departments: Vec<DepartmentSchedule>,
    pub nurse_loads: Vec<usize>,
}

/// Inclusive bounds on the number of slots each nurse works in a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessBand {
    pub total_shifts: usize,
    pub min_per_nurse: usize,
    pub max_per_nurse: usize,
}

impl fmt::Display for FairnessBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} shifts, [{}, {}] per nurse",
            self.total_shifts, self.min_per_nurse, self.max_per_nurse
        )
    }
}

/// Size of the encoded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStats {
    pub variables: usize,
    pub constraints: usize,
}

/// The final output of the solver.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterOutput {
    /// Labels for the day index of every `DepartmentSchedule::days`.
    pub day_names: Vec<&'static str>,
    pub solutions: Vec<Roster>,
    /// True when the search proved there are no further rosters.
    pub exhausted: bool,
    pub fairness: FairnessBand,
    pub model: ModelStats,
    pub solve_time_ms: u128,
}
