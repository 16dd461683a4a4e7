use log::{debug, trace};

use crate::data::{DepartmentSchedule, Roster};
use crate::error::{Result, RosterError};
use crate::model::Assignment;
use crate::solver::SearchControl;
use crate::variables::VariableSpace;

/// Reads one department schedule per department out of a solved assignment.
///
/// Trusts the solver: when several nurses are true for a cell (which the
/// coverage rule rules out) the highest nurse id wins.
pub fn extract(assignment: &Assignment, space: &VariableSpace) -> Result<Roster> {
    let calendar = space.calendar();
    let mut departments = Vec::with_capacity(space.departments());
    for department in 0..space.departments() {
        let mut days = Vec::with_capacity(calendar.days().len());
        for day in calendar.days() {
            let mut slots = vec![None; calendar.slots_for_day(day)];
            for (slot, cell) in slots.iter_mut().enumerate() {
                for nurse in 0..space.nurses() {
                    if assignment.value(space.var(department, nurse, day, slot)?) {
                        *cell = Some(nurse);
                    }
                }
            }
            days.push(slots);
        }
        departments.push(DepartmentSchedule { department, days });
    }

    Ok(Roster {
        departments,
        nurse_loads: nurse_loads(assignment, space),
    })
}

/// Number of slots each nurse works over the week, across departments.
pub fn nurse_loads(assignment: &Assignment, space: &VariableSpace) -> Vec<usize> {
    let mut loads = vec![0; space.nurses()];
    for key in space.keys() {
        if space.get(key).is_ok_and(|var| assignment.value(var)) {
            loads[key.nurse] += 1;
        }
    }
    loads
}

/// Accumulates extracted rosters while the solver enumerates solutions.
///
/// The solver borrows the collector only for the duration of a solve call.
#[derive(Debug)]
pub struct ScheduleCollector<'a> {
    space: &'a VariableSpace,
    limit: usize,
    rosters: Vec<Roster>,
    error: Option<RosterError>,
}

impl<'a> ScheduleCollector<'a> {
    pub fn new(space: &'a VariableSpace, limit: usize) -> Self {
        Self {
            space,
            limit,
            rosters: Vec::new(),
            error: None,
        }
    }

    pub fn solution_count(&self) -> usize {
        self.rosters.len()
    }

    /// Callback body: extract the solution and decide whether to keep searching.
    pub fn on_solution(&mut self, assignment: &Assignment) -> SearchControl {
        match extract(assignment, self.space) {
            Ok(roster) => {
                self.rosters.push(roster);
                trace!("Collected solution {}.", self.rosters.len());
            }
            Err(e) => {
                self.error = Some(e);
                return SearchControl::Stop;
            }
        }
        if self.rosters.len() >= self.limit {
            debug!("Solution limit of {} reached; stopping search.", self.limit);
            SearchControl::Stop
        } else {
            SearchControl::Continue
        }
    }

    pub fn into_rosters(self) -> Result<Vec<Roster>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.rosters),
        }
    }
}
