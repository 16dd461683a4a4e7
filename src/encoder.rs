//! Scheduling rules as linear constraints over the assignment variables.
//!
//! Each rule is its own encoder and returns how many constraints it added.
//! Rules are purely additive: the model is the conjunction of everything
//! added, in any order.

use itertools::iproduct;
use log::{debug, info};

use crate::data::FairnessBand;
use crate::error::Result;
use crate::model::{BoolVar, Comparator, Model};
use crate::variables::VariableSpace;

/// Adds every scheduling rule. Returns the total number of constraints added.
pub fn encode_all(model: &mut Model, space: &VariableSpace) -> Result<usize> {
    let encoders: [(&str, fn(&mut Model, &VariableSpace) -> Result<usize>); 7] = [
        ("exact coverage", exact_coverage),
        ("adjacent weekday slots", adjacent_weekday_slots),
        ("rest after a worked slot", rest_after_slot),
        ("rest after consecutive slots", rest_after_consecutive_slots),
        ("single department per day", single_department_per_day),
        ("one weekend day", one_weekend_day),
        ("fair workload", fair_workload),
    ];

    let mut total = 0;
    for (name, encode) in encoders {
        info!("Adding '{name}' constraints...");
        let added = encode(model, space)?;
        debug!("'{name}' added {added} constraints.");
        total += added;
    }
    Ok(total)
}

/// Every shift slot is covered by exactly one nurse.
pub fn exact_coverage(model: &mut Model, space: &VariableSpace) -> Result<usize> {
    let calendar = *space.calendar();
    let mut added = 0;
    for shift in calendar.shift_slots(space.departments()) {
        let covering = (0..space.nurses())
            .map(|nurse| space.var(shift.department, nurse, shift.day, shift.slot))
            .collect::<Result<Vec<BoolVar>>>()?;
        model.add_sum(covering, Comparator::Eq, 1);
        added += 1;
    }
    Ok(added)
}

/// Back-to-back weekday slots are permitted: per (department, nurse, weekday)
/// the pair s, s+1 is bounded by 2.
pub fn adjacent_weekday_slots(model: &mut Model, space: &VariableSpace) -> Result<usize> {
    let calendar = *space.calendar();
    let mut added = 0;
    for (department, nurse, day) in iproduct!(
        0..space.departments(),
        0..space.nurses(),
        calendar.weekdays()
    ) {
        for slot in 1..calendar.slots_for_day(day) {
            let pair = [
                space.var(department, nurse, day, slot - 1)?,
                space.var(department, nurse, day, slot)?,
            ];
            model.add_sum(pair, Comparator::Le, 2);
            added += 1;
        }
    }
    Ok(added)
}

/// A nurse who works slot (d, s) in any department works no slot on the next
/// two days. One constraint per slot pair in the rest window; each side is
/// the nurse's occupancy of that slot summed over departments.
pub fn rest_after_slot(model: &mut Model, space: &VariableSpace) -> Result<usize> {
    let calendar = *space.calendar();
    let mut added = 0;
    for (nurse, day) in iproduct!(0..space.nurses(), calendar.days()) {
        for slot in 0..calendar.slots_for_day(day) {
            let worked = space.occupancy(nurse, day, slot)?;
            for next_day in calendar.rest_window(day) {
                for next_slot in 0..calendar.slots_for_day(next_day) {
                    let mut vars = worked.clone();
                    vars.extend(space.occupancy(nurse, next_day, next_slot)?);
                    model.add_sum(vars, Comparator::Le, 1);
                    added += 1;
                }
            }
        }
    }
    Ok(added)
}

/// Working slots s and s+1 of a weekday excludes every slot in the rest
/// window: the three occupancies sum to at most 2.
pub fn rest_after_consecutive_slots(model: &mut Model, space: &VariableSpace) -> Result<usize> {
    let calendar = *space.calendar();
    let mut added = 0;
    for (nurse, day) in iproduct!(0..space.nurses(), calendar.weekdays()) {
        for slot in 1..calendar.slots_for_day(day) {
            let mut both = space.occupancy(nurse, day, slot - 1)?;
            both.extend(space.occupancy(nurse, day, slot)?);
            for next_day in calendar.rest_window(day) {
                for next_slot in 0..calendar.slots_for_day(next_day) {
                    let mut vars = both.clone();
                    vars.extend(space.occupancy(nurse, next_day, next_slot)?);
                    model.add_sum(vars, Comparator::Le, 2);
                    added += 1;
                }
            }
        }
    }
    Ok(added)
}

/// A nurse works at most one slot in one department per day.
pub fn single_department_per_day(model: &mut Model, space: &VariableSpace) -> Result<usize> {
    let calendar = *space.calendar();
    let mut added = 0;
    for (nurse, day) in iproduct!(0..space.nurses(), calendar.days()) {
        model.add_sum(space.nurse_day(nurse, day)?, Comparator::Le, 1);
        added += 1;
    }
    Ok(added)
}

/// A nurse works on at most one of the two weekend days.
pub fn one_weekend_day(model: &mut Model, space: &VariableSpace) -> Result<usize> {
    let calendar = *space.calendar();
    let mut added = 0;
    for nurse in 0..space.nurses() {
        let mut weekend = Vec::new();
        for day in calendar.days().filter(|day| calendar.is_weekend(*day)) {
            weekend.extend(space.nurse_day(nurse, day)?);
        }
        model.add_sum(weekend, Comparator::Le, 1);
        added += 1;
    }
    Ok(added)
}

/// Slot bounds per nurse that spread the week's coverage evenly.
pub fn fairness_band(space: &VariableSpace) -> FairnessBand {
    let total_shifts = space.departments() * space.calendar().slots_per_week();
    let min_per_nurse = total_shifts / space.nurses().max(1);
    let max_per_nurse = if total_shifts % space.nurses().max(1) != 0 {
        min_per_nurse + 1
    } else {
        min_per_nurse
    };
    FairnessBand {
        total_shifts,
        min_per_nurse,
        max_per_nurse,
    }
}

/// Each nurse's weekly slot count lies within the fairness band.
pub fn fair_workload(model: &mut Model, space: &VariableSpace) -> Result<usize> {
    let band = fairness_band(space);
    debug!("Fairness band: {band}");
    let calendar = *space.calendar();
    let mut added = 0;
    for nurse in 0..space.nurses() {
        let mut worked = Vec::new();
        for day in calendar.days() {
            worked.extend(space.nurse_day(nurse, day)?);
        }
        model.add_sum(worked.iter().copied(), Comparator::Ge, band.min_per_nurse as i64);
        model.add_sum(worked, Comparator::Le, band.max_per_nurse as i64);
        added += 2;
    }
    Ok(added)
}
