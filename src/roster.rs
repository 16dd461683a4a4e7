use crate::data::{ModelStats, RosterConfig, RosterOutput};
use crate::encoder::{encode_all, fairness_band};
use crate::error::Result;
use crate::extract::ScheduleCollector;
use crate::model::Model;
use crate::solver::{HighsBackend, SolveOptions, SolverBackend};
use crate::variables::VariableSpace;
use log::info;
use std::time::Instant;

/// Builds the roster model for `config` and solves it with HiGHS.
pub fn solve_roster(config: &RosterConfig) -> Result<RosterOutput> {
    solve_roster_with(config, &HighsBackend::new())
}

/// Builds the roster model for `config` and hands it to `backend`.
pub fn solve_roster_with<B: SolverBackend>(config: &RosterConfig, backend: &B) -> Result<RosterOutput> {
    let start_time = Instant::now();
    config.validate()?;

    info!(
        "Setting up roster model with {} departments and {} nurses...",
        config.departments, config.nurses
    );
    let mut model = Model::new();
    let space = VariableSpace::create(
        &mut model,
        config.departments,
        config.nurses,
        config.calendar(),
    );
    encode_all(&mut model, &space)?;
    let fairness = fairness_band(&space);
    let stats = ModelStats {
        variables: model.variable_count(),
        constraints: model.constraint_count(),
    };
    info!(
        "Model ready: {} variables, {} constraints, fairness {}.",
        stats.variables, stats.constraints, fairness
    );

    let options = SolveOptions {
        solution_limit: config.solution_limit,
        time_limit: config.time_limit()?,
    };
    let mut collector = ScheduleCollector::new(&space, config.solution_limit);
    let summary = backend.solve(&model, &options, &mut |assignment| {
        collector.on_solution(assignment)
    })?;
    let collected = collector.solution_count();
    let solutions = collector.into_rosters()?;

    let duration = start_time.elapsed();
    info!(
        "Collected {} of {} roster(s) in {:.2?}",
        collected, summary.solutions, duration
    );

    let calendar = space.calendar();
    Ok(RosterOutput {
        day_names: calendar
            .days()
            .filter_map(|day| calendar.day_name(day))
            .collect(),
        solutions,
        exhausted: summary.exhausted,
        fairness,
        model: stats,
        solve_time_ms: duration.as_millis(),
    })
}
