use crate::error::{Result, RosterError};
use crate::model::{Assignment, BoolVar, Comparator, LinearConstraint, Model};
use good_lp::variable;
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, constraint,
    default_solver,
};
use log::{debug, info, trace, warn};
use std::time::{Duration, Instant};

/// Returned by a solution callback to continue or end the enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchControl {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    /// Maximum number of distinct solutions handed to the callback.
    pub solution_limit: usize,
    /// Wall-clock bound on the whole enumeration.
    pub time_limit: Option<Duration>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            solution_limit: 1,
            time_limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveSummary {
    pub solutions: usize,
    /// The search proved no further distinct solution exists.
    pub exhausted: bool,
}

/// Boundary to a general-purpose constraint solver.
///
/// Implementations call `on_solution` once per distinct feasible assignment,
/// synchronously, and stop when it returns [`SearchControl::Stop`] or the
/// solution limit is reached. No solution is returned if none was found:
/// `Infeasible` means proven, `TimeoutOrAbort` means unknown.
pub trait SolverBackend {
    fn solve(
        &self,
        model: &Model,
        options: &SolveOptions,
        on_solution: &mut dyn FnMut(&Assignment) -> SearchControl,
    ) -> Result<SolveSummary>;
}

/// Solves the model as a 0-1 program with the HiGHS MIP solver.
///
/// Each round solves a feasibility program; every solution found is then
/// excluded by a no-good cut so the next round yields a different one.
#[derive(Debug, Clone)]
pub struct HighsBackend {
    threads: i32,
    random_seed: i32,
}

impl Default for HighsBackend {
    fn default() -> Self {
        Self {
            threads: 1,        // limit to 1 thread for reproducibility
            random_seed: 1234, // set seed for reproducibility
        }
    }
}

impl HighsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn solve_round(
        &self,
        model: &Model,
        cuts: &[LinearConstraint],
        time_limit: Option<Duration>,
    ) -> std::result::Result<Assignment, ResolutionError> {
        let mut problem = ProblemVariables::new();
        let vars: Vec<Variable> = model
            .variables()
            .map(|var| problem.add(variable().binary().name(model.label(var))))
            .collect();

        let mut lp = problem
            .minimise(Expression::from(0.0))
            .using(default_solver)
            .set_option("threads", self.threads)
            .set_option("random_seed", self.random_seed)
            .set_option("output_flag", "false");
        if let Some(limit) = time_limit {
            lp = lp.set_option("time_limit", limit.as_secs_f64());
        }

        for linear in model.constraints().iter().chain(cuts) {
            lp.add_constraint(to_good_lp(linear, &vars));
        }

        let solution = lp.solve()?;
        Ok(Assignment::new(
            vars.iter().map(|var| solution.value(*var) > 0.5).collect(),
        ))
    }
}

impl SolverBackend for HighsBackend {
    fn solve(
        &self,
        model: &Model,
        options: &SolveOptions,
        on_solution: &mut dyn FnMut(&Assignment) -> SearchControl,
    ) -> Result<SolveSummary> {
        let start_time = Instant::now();
        // a limit too far out to represent as an Instant is no deadline at all
        let deadline = options
            .time_limit
            .and_then(|limit| start_time.checked_add(limit));
        let mut cuts: Vec<LinearConstraint> = Vec::new();
        let mut found = 0;

        info!(
            "Starting HiGHS with {} variables and {} constraints (limit {} solutions)...",
            model.variable_count(),
            model.constraint_count(),
            options.solution_limit
        );

        while found < options.solution_limit {
            let remaining = match deadline {
                Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
                    Some(remaining) if !remaining.is_zero() => Some(remaining),
                    _ => return stopped_early(found),
                },
                None => None,
            };

            let assignment = match self.solve_round(model, &cuts, remaining) {
                Ok(assignment) => assignment,
                Err(e) => {
                    debug!("Round {} ended without a solution: {e}", found + 1);
                    return round_failure(e, found, past(deadline));
                }
            };

            // A round cut short by the time limit may hand back a non-solution.
            if !model.is_satisfied_by(&assignment) {
                if past(deadline) {
                    warn!("Solver stopped at the deadline with an incomplete assignment.");
                    return stopped_early(found);
                }
                let detail = match model.first_violation(&assignment) {
                    Some(violated) => format!(
                        "violates a constraint ({} terms {} {})",
                        violated.terms.len(),
                        violated.comparator,
                        violated.bound
                    ),
                    None => format!(
                        "has {} values for {} variables",
                        assignment.len(),
                        model.variable_count()
                    ),
                };
                return Err(RosterError::Solver(format!(
                    "solver returned an assignment that {detail}"
                )));
            }

            found += 1;
            info!("Solution {found} found in {:.2?}", start_time.elapsed());
            if on_solution(&assignment) == SearchControl::Stop {
                break;
            }
            cuts.push(no_good(model, &assignment));
            trace!("Added no-good cut {}.", cuts.len());
        }

        Ok(SolveSummary {
            solutions: found,
            exhausted: false,
        })
    }
}

fn past(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

/// Outcome of a round that produced no solution, after `found` earlier ones.
fn round_failure(error: ResolutionError, found: usize, timed_out: bool) -> Result<SolveSummary> {
    match error {
        ResolutionError::Infeasible if found == 0 => {
            info!("Model proven infeasible.");
            Err(RosterError::Infeasible)
        }
        ResolutionError::Infeasible => Ok(SolveSummary {
            solutions: found,
            exhausted: true,
        }),
        e if timed_out => {
            warn!("Solver stopped at the deadline: {e}");
            stopped_early(found)
        }
        e => Err(RosterError::Solver(e.to_string())),
    }
}

fn stopped_early(found: usize) -> Result<SolveSummary> {
    if found == 0 {
        Err(RosterError::TimeoutOrAbort)
    } else {
        Ok(SolveSummary {
            solutions: found,
            exhausted: false,
        })
    }
}

/// Excludes exactly `assignment`: Σ_true x - Σ_false x <= |true| - 1.
fn no_good(model: &Model, assignment: &Assignment) -> LinearConstraint {
    let terms: Vec<(BoolVar, i64)> = model
        .variables()
        .map(|var| (var, if assignment.value(var) { 1 } else { -1 }))
        .collect();
    let true_count = assignment.true_vars().count() as i64;
    LinearConstraint {
        terms,
        comparator: Comparator::Le,
        bound: true_count - 1,
    }
}

fn to_good_lp(linear: &LinearConstraint, vars: &[Variable]) -> good_lp::Constraint {
    let lhs: Expression = linear
        .terms
        .iter()
        .map(|(var, coefficient)| *coefficient as f64 * vars[var.index()])
        .sum();
    let bound = linear.bound as f64;
    match linear.comparator {
        Comparator::Eq => constraint!(lhs == bound),
        Comparator::Le => constraint!(lhs <= bound),
        Comparator::Ge => constraint!(lhs >= bound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_of_three() -> Model {
        let mut model = Model::new();
        let vars: Vec<BoolVar> = (0..3).map(|i| model.new_bool_var(format!("x{i}"))).collect();
        model.add_sum(vars, Comparator::Eq, 1);
        model
    }

    #[test]
    fn test_no_good_excludes_only_that_assignment() {
        let model = one_of_three();
        let first = Assignment::new(vec![true, false, false]);
        let cut = no_good(&model, &first);
        assert!(!cut.is_satisfied_by(&first));
        assert!(cut.is_satisfied_by(&Assignment::new(vec![false, true, false])));
        assert!(cut.is_satisfied_by(&Assignment::new(vec![true, true, false])));
    }

    #[test]
    fn test_enumerates_distinct_solutions_until_exhausted() {
        let model = one_of_three();
        let options = SolveOptions {
            solution_limit: 10,
            time_limit: None,
        };
        let mut seen = Vec::new();
        let summary = HighsBackend::new()
            .solve(&model, &options, &mut |assignment| {
                seen.push(assignment.clone());
                SearchControl::Continue
            })
            .unwrap();

        assert_eq!(summary.solutions, 3);
        assert!(summary.exhausted);
        assert!(seen.iter().all(|a| model.is_satisfied_by(a)));
        seen.dedup();
        assert_eq!(seen.len(), 3);
        assert_ne!(seen[0], seen[2]);
    }

    #[test]
    fn test_respects_solution_limit_and_stop() {
        let model = one_of_three();
        let limited = SolveOptions {
            solution_limit: 2,
            time_limit: None,
        };
        let summary = HighsBackend::new()
            .solve(&model, &limited, &mut |_| SearchControl::Continue)
            .unwrap();
        assert_eq!(summary.solutions, 2);
        assert!(!summary.exhausted);

        let mut calls = 0;
        let summary = HighsBackend::new()
            .solve(&model, &limited, &mut |_| {
                calls += 1;
                SearchControl::Stop
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(summary.solutions, 1);
    }

    #[test]
    fn test_reports_infeasible() {
        let mut model = Model::new();
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");
        model.add_sum([a, b], Comparator::Ge, 2);
        model.add_sum([a, b], Comparator::Le, 1);
        let result = HighsBackend::new().solve(&model, &SolveOptions::default(), &mut |_| {
            SearchControl::Continue
        });
        assert_eq!(result, Err(RosterError::Infeasible));
    }

    #[test]
    fn test_round_stopped_by_time_limit() {
        // HiGHS reports a time-limited round without an incumbent as "NoSolutionFound"
        assert_eq!(
            round_failure(ResolutionError::Other("NoSolutionFound"), 0, true),
            Err(RosterError::TimeoutOrAbort)
        );
        assert_eq!(
            round_failure(ResolutionError::Other("NoSolutionFound"), 2, true),
            Ok(SolveSummary {
                solutions: 2,
                exhausted: false
            })
        );
        assert!(matches!(
            round_failure(ResolutionError::Other("NoSolutionFound"), 0, false),
            Err(RosterError::Solver(_))
        ));
    }

    #[test]
    fn test_round_infeasibility_depends_on_earlier_solutions() {
        assert_eq!(
            round_failure(ResolutionError::Infeasible, 0, false),
            Err(RosterError::Infeasible)
        );
        // even at the deadline, a proof of infeasibility is not a timeout
        assert_eq!(
            round_failure(ResolutionError::Infeasible, 0, true),
            Err(RosterError::Infeasible)
        );
        assert_eq!(
            round_failure(ResolutionError::Infeasible, 3, false),
            Ok(SolveSummary {
                solutions: 3,
                exhausted: true
            })
        );
    }

    #[test]
    fn test_unrepresentable_deadline_runs_unbounded() {
        let model = one_of_three();
        let options = SolveOptions {
            solution_limit: 1,
            time_limit: Some(Duration::MAX),
        };
        let summary = HighsBackend::new()
            .solve(&model, &options, &mut |_| SearchControl::Continue)
            .unwrap();
        assert_eq!(summary.solutions, 1);
    }

    #[test]
    fn test_expired_deadline_is_timeout_not_infeasible() {
        let model = one_of_three();
        let options = SolveOptions {
            solution_limit: 1,
            time_limit: Some(Duration::ZERO),
        };
        let result = HighsBackend::new().solve(&model, &options, &mut |_| SearchControl::Continue);
        assert_eq!(result, Err(RosterError::TimeoutOrAbort));
    }
}
