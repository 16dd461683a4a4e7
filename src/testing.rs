//! Shared fixtures for unit tests.

use crate::data::{AssignmentKey, Day, DepartmentSchedule, NurseId, SlotIndex};
use crate::model::Assignment;
use crate::variables::VariableSpace;

/// Assignment over a space that starts at variable 0, true exactly at `keys`.
pub fn assignment_of(space: &VariableSpace, keys: &[AssignmentKey]) -> Assignment {
    let mut values = vec![false; space.len()];
    for key in keys {
        values[space.get(*key).unwrap().index()] = true;
    }
    Assignment::new(values)
}

/// A valid week for 1 department and 6 nurses on the 2/1 calendar.
///
/// Nurses 0-1 work Monday and Thursday, 2-3 Tuesday and Friday, 4-5 Wednesday
/// and then one weekend day each. Every nurse works exactly 2 slots.
pub fn one_department_week() -> Vec<AssignmentKey> {
    let cells = [
        (0, 0, 0),
        (1, 0, 1),
        (2, 1, 0),
        (3, 1, 1),
        (4, 2, 0),
        (5, 2, 1),
        (0, 3, 0),
        (1, 3, 1),
        (2, 4, 0),
        (3, 4, 1),
        (4, 5, 0),
        (5, 6, 0),
    ];
    cells
        .iter()
        .map(|&(nurse, day, slot)| AssignmentKey::new(0, nurse, day, slot))
        .collect()
}

impl DepartmentSchedule {
    pub fn nurse_at(&self, day: Day, slot: SlotIndex) -> Option<NurseId> {
        self.days.get(day)?.get(slot).copied().flatten()
    }

    /// Cells with nobody assigned.
    pub fn uncovered(&self) -> Vec<(Day, SlotIndex)> {
        let mut cells = Vec::new();
        for (day, slots) in self.days.iter().enumerate() {
            for (slot, nurse) in slots.iter().enumerate() {
                if nurse.is_none() {
                    cells.push((day, slot));
                }
            }
        }
        cells
    }
}
