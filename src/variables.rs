use crate::calendar::{Calendar, DAYS_PER_WEEK};
use crate::data::{AssignmentKey, Day, DepartmentId, NurseId, SlotIndex};
use crate::error::{Result, RosterError};
use crate::model::{BoolVar, Model};
use log::trace;

/// Decision variables for every legal (department, nurse, day, slot).
///
/// The variables are created as one contiguous block of the model, laid out
/// department-major, then nurse, then the week's slots in day order, so a key
/// resolves to its variable by offset arithmetic.
#[derive(Debug, Clone)]
pub struct VariableSpace {
    calendar: Calendar,
    departments: usize,
    nurses: usize,
    first: usize,
    // day_offsets[day] = slots before `day` within one nurse's week
    day_offsets: [usize; DAYS_PER_WEEK + 1],
}

impl VariableSpace {
    pub fn create(model: &mut Model, departments: usize, nurses: usize, calendar: Calendar) -> Self {
        let mut day_offsets = [0; DAYS_PER_WEEK + 1];
        for day in calendar.days() {
            day_offsets[day + 1] = day_offsets[day] + calendar.slots_for_day(day);
        }

        let first = model.variable_count();
        for department in 0..departments {
            for nurse in 0..nurses {
                for day in calendar.days() {
                    for slot in 0..calendar.slots_for_day(day) {
                        let key = AssignmentKey::new(department, nurse, day, slot);
                        model.new_bool_var(key.to_string());
                    }
                }
            }
        }

        let space = Self {
            calendar,
            departments,
            nurses,
            first,
            day_offsets,
        };
        trace!(
            "Created {} assignment variables ({} departments x {} nurses x {} slots/week).",
            space.len(),
            departments,
            nurses,
            calendar.slots_per_week()
        );
        space
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn departments(&self) -> usize {
        self.departments
    }

    pub fn nurses(&self) -> usize {
        self.nurses
    }

    pub fn len(&self) -> usize {
        self.departments * self.nurses * self.slots_per_week()
    }

    fn slots_per_week(&self) -> usize {
        self.day_offsets[DAYS_PER_WEEK]
    }

    /// Variable for `key`, or a construction error if the key is outside the space.
    pub fn get(&self, key: AssignmentKey) -> Result<BoolVar> {
        if key.department >= self.departments
            || key.nurse >= self.nurses
            || key.day >= DAYS_PER_WEEK
            || key.slot >= self.calendar.slots_for_day(key.day)
        {
            return Err(RosterError::ModelConstruction(format!(
                "no assignment variable for {key} ({} departments, {} nurses, {} slots on day {})",
                self.departments,
                self.nurses,
                self.calendar.slots_for_day(key.day),
                key.day
            )));
        }
        let offset = (key.department * self.nurses + key.nurse) * self.slots_per_week()
            + self.day_offsets[key.day]
            + key.slot;
        Ok(BoolVar::from_index(self.first + offset))
    }

    pub fn var(&self, department: DepartmentId, nurse: NurseId, day: Day, slot: SlotIndex) -> Result<BoolVar> {
        self.get(AssignmentKey::new(department, nurse, day, slot))
    }

    /// The nurse's variable for (day, slot) in every department.
    pub fn occupancy(&self, nurse: NurseId, day: Day, slot: SlotIndex) -> Result<Vec<BoolVar>> {
        (0..self.departments)
            .map(|department| self.var(department, nurse, day, slot))
            .collect()
    }

    /// All of the nurse's variables on `day`, across departments and slots.
    pub fn nurse_day(&self, nurse: NurseId, day: Day) -> Result<Vec<BoolVar>> {
        let mut vars = Vec::new();
        for department in 0..self.departments {
            for slot in 0..self.calendar.slots_for_day(day) {
                vars.push(self.var(department, nurse, day, slot)?);
            }
        }
        Ok(vars)
    }

    /// Every legal key, in variable order.
    pub fn keys(&self) -> impl Iterator<Item = AssignmentKey> + '_ {
        let calendar = self.calendar;
        (0..self.departments).flat_map(move |department| {
            (0..self.nurses).flat_map(move |nurse| {
                calendar.days().flat_map(move |day| {
                    (0..calendar.slots_for_day(day))
                        .map(move |slot| AssignmentKey::new(department, nurse, day, slot))
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_variable_count() {
        let mut model = Model::new();
        let space = VariableSpace::create(&mut model, 2, 3, Calendar::default());
        assert_eq!(space.len(), 2 * 3 * 12);
        assert_eq!(model.variable_count(), space.len());
    }

    #[test]
    fn test_keys_resolve_to_distinct_variables_in_order() {
        let mut model = Model::new();
        let space = VariableSpace::create(&mut model, 2, 3, Calendar::new(3, 2));
        let vars: Vec<BoolVar> = space.keys().map(|key| space.get(key).unwrap()).collect();
        assert_eq!(vars.len(), space.len());
        for (index, var) in vars.iter().enumerate() {
            assert_eq!(var.index(), index);
        }
        let distinct: HashSet<BoolVar> = vars.into_iter().collect();
        assert_eq!(distinct.len(), space.len());
    }

    #[test]
    fn test_labels_follow_keys() {
        let mut model = Model::new();
        let space = VariableSpace::create(&mut model, 2, 2, Calendar::default());
        let var = space.var(1, 0, 5, 0).unwrap();
        assert_eq!(model.label(var), "shift_d1_n0_day5_s0");
    }

    #[test]
    fn test_space_offset_within_shared_model() {
        let mut model = Model::new();
        model.new_bool_var("unrelated");
        let space = VariableSpace::create(&mut model, 1, 1, Calendar::default());
        assert_eq!(space.var(0, 0, 0, 0).unwrap().index(), 1);
        assert_eq!(model.label(space.var(0, 0, 6, 0).unwrap()), "shift_d0_n0_day6_s0");
    }

    #[test]
    fn test_illegal_keys_fail_fast() {
        let mut model = Model::new();
        let space = VariableSpace::create(&mut model, 2, 3, Calendar::default());
        // weekend days have a single slot
        assert!(matches!(
            space.var(0, 0, 5, 1),
            Err(RosterError::ModelConstruction(_))
        ));
        assert!(space.var(2, 0, 0, 0).is_err());
        assert!(space.var(0, 3, 0, 0).is_err());
        assert!(space.var(0, 0, 7, 0).is_err());
        assert!(space.var(1, 2, 4, 1).is_ok());
    }

    #[test]
    fn test_occupancy_and_nurse_day() {
        let mut model = Model::new();
        let space = VariableSpace::create(&mut model, 3, 2, Calendar::default());
        assert_eq!(space.occupancy(1, 0, 1).unwrap().len(), 3);
        assert_eq!(space.nurse_day(1, 0).unwrap().len(), 6);
        assert_eq!(space.nurse_day(1, 6).unwrap().len(), 3);
        assert!(space.occupancy(1, 6, 1).is_err());
    }
}
