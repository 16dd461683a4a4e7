//! Solver-neutral constraint model.
//!
//! Holds boolean variables and linear constraints over them. The encoder
//! only ever appends; a backend reads the finished model through `&Model`.

use std::fmt;

/// Handle to one boolean variable of a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoolVar(usize);

impl BoolVar {
    pub(crate) fn from_index(index: usize) -> Self {
        BoolVar(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Le,
    Ge,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Comparator::Eq => "==",
            Comparator::Le => "<=",
            Comparator::Ge => ">=",
        };
        f.write_str(symbol)
    }
}

/// `Σ coefficient * var  <comparator>  bound`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub terms: Vec<(BoolVar, i64)>,
    pub comparator: Comparator,
    pub bound: i64,
}

impl LinearConstraint {
    pub fn lhs(&self, assignment: &Assignment) -> i64 {
        self.terms
            .iter()
            .filter(|(var, _)| assignment.value(*var))
            .map(|(_, coefficient)| coefficient)
            .sum()
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        let lhs = self.lhs(assignment);
        match self.comparator {
            Comparator::Eq => lhs == self.bound,
            Comparator::Le => lhs <= self.bound,
            Comparator::Ge => lhs >= self.bound,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    labels: Vec<String>,
    constraints: Vec<LinearConstraint>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_bool_var(&mut self, label: impl Into<String>) -> BoolVar {
        self.labels.push(label.into());
        BoolVar(self.labels.len() - 1)
    }

    pub fn add_constraint<I>(&mut self, terms: I, comparator: Comparator, bound: i64)
    where
        I: IntoIterator<Item = (BoolVar, i64)>,
    {
        self.constraints.push(LinearConstraint {
            terms: terms.into_iter().collect(),
            comparator,
            bound,
        });
    }

    /// Unit-coefficient shorthand: `Σ vars <comparator> bound`.
    pub fn add_sum<I>(&mut self, vars: I, comparator: Comparator, bound: i64)
    where
        I: IntoIterator<Item = BoolVar>,
    {
        self.add_constraint(vars.into_iter().map(|var| (var, 1)), comparator, bound);
    }

    pub fn label(&self, var: BoolVar) -> &str {
        &self.labels[var.0]
    }

    pub fn variables(&self) -> impl Iterator<Item = BoolVar> + '_ {
        (0..self.labels.len()).map(BoolVar)
    }

    pub fn variable_count(&self) -> usize {
        self.labels.len()
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// First constraint the assignment breaks, if any.
    pub fn first_violation(&self, assignment: &Assignment) -> Option<&LinearConstraint> {
        self.constraints
            .iter()
            .find(|constraint| !constraint.is_satisfied_by(assignment))
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        assignment.len() == self.variable_count() && self.first_violation(assignment).is_none()
    }
}

/// A truth value for every variable of a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    values: Vec<bool>,
}

impl Assignment {
    pub fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// Out-of-range handles read as false.
    pub fn value(&self, var: BoolVar) -> bool {
        self.values.get(var.0).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn true_vars(&self) -> impl Iterator<Item = BoolVar> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, value)| **value)
            .map(|(index, _)| BoolVar(index))
    }
}
