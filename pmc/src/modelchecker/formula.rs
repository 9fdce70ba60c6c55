//! Formula trees for probabilistic computation tree logic
//!
//! State formulas evaluate to a set of states, path and reward formulas to
//! one value per state. All node kinds form closed enums so the evaluator
//! dispatches with a single `match`.

use std::fmt;

use pmc_core::constants::labels;

/// Comparison of a computed value against an operator's threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonType {
    Less,
    LessEqual,
    Equal,
    GreaterEqual,
    Greater,
}

impl ComparisonType {
    /// Whether `value` satisfies `value <op> bound`
    pub fn meets_bound(self, value: f64, bound: f64) -> bool {
        match self {
            ComparisonType::Less => value < bound,
            ComparisonType::LessEqual => value <= bound,
            ComparisonType::Equal => value == bound,
            ComparisonType::GreaterEqual => value >= bound,
            ComparisonType::Greater => value > bound,
        }
    }
}

impl fmt::Display for ComparisonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonType::Less => "<",
            ComparisonType::LessEqual => "<=",
            ComparisonType::Equal => "=",
            ComparisonType::GreaterEqual => ">=",
            ComparisonType::Greater => ">",
        })
    }
}

/// Formula evaluating to a set of states
#[derive(Debug, Clone, PartialEq)]
pub enum StateFormula {
    /// Atomic proposition; `true` and `false` are literals
    Ap(String),
    And(Box<StateFormula>, Box<StateFormula>),
    Or(Box<StateFormula>, Box<StateFormula>),
    Not(Box<StateFormula>),
    /// `P <op> bound [path]`
    ProbabilisticBound {
        comparison: ComparisonType,
        bound: f64,
        path: Box<PathFormula>,
    },
    /// `R <op> bound [reward]`
    RewardBound {
        comparison: ComparisonType,
        bound: f64,
        reward: Box<RewardFormula>,
    },
}

impl StateFormula {
    pub fn ap(label: impl Into<String>) -> Self {
        StateFormula::Ap(label.into())
    }

    pub fn and(left: StateFormula, right: StateFormula) -> Self {
        StateFormula::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: StateFormula, right: StateFormula) -> Self {
        StateFormula::Or(Box::new(left), Box::new(right))
    }

    pub fn not(child: StateFormula) -> Self {
        StateFormula::Not(Box::new(child))
    }

    pub fn probability_bound(comparison: ComparisonType, bound: f64, path: PathFormula) -> Self {
        StateFormula::ProbabilisticBound {
            comparison,
            bound,
            path: Box::new(path),
        }
    }

    pub fn reward_bound(comparison: ComparisonType, bound: f64, reward: RewardFormula) -> Self {
        StateFormula::RewardBound {
            comparison,
            bound,
            reward: Box::new(reward),
        }
    }
}

impl fmt::Display for StateFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateFormula::Ap(label) if label == labels::TRUE || label == labels::FALSE => {
                f.write_str(label)
            }
            StateFormula::Ap(label) => write!(f, "\"{label}\""),
            StateFormula::And(left, right) => write!(f, "({left} & {right})"),
            StateFormula::Or(left, right) => write!(f, "({left} | {right})"),
            StateFormula::Not(child) => write!(f, "!{child}"),
            StateFormula::ProbabilisticBound {
                comparison,
                bound,
                path,
            } => write!(f, "P{comparison}{bound} [{path}]"),
            StateFormula::RewardBound {
                comparison,
                bound,
                reward,
            } => write!(f, "R{comparison}{bound} [{reward}]"),
        }
    }
}

/// Formula over paths, evaluating to a probability per state
#[derive(Debug, Clone, PartialEq)]
pub enum PathFormula {
    Until {
        left: Box<StateFormula>,
        right: Box<StateFormula>,
    },
    BoundedUntil {
        left: Box<StateFormula>,
        right: Box<StateFormula>,
        steps: usize,
    },
    Eventually(Box<StateFormula>),
    BoundedEventually {
        child: Box<StateFormula>,
        steps: usize,
    },
    Globally(Box<StateFormula>),
    Next(Box<StateFormula>),
}

impl PathFormula {
    pub fn until(left: StateFormula, right: StateFormula) -> Self {
        PathFormula::Until {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn bounded_until(left: StateFormula, right: StateFormula, steps: usize) -> Self {
        PathFormula::BoundedUntil {
            left: Box::new(left),
            right: Box::new(right),
            steps,
        }
    }

    pub fn eventually(child: StateFormula) -> Self {
        PathFormula::Eventually(Box::new(child))
    }

    pub fn bounded_eventually(child: StateFormula, steps: usize) -> Self {
        PathFormula::BoundedEventually {
            child: Box::new(child),
            steps,
        }
    }

    pub fn globally(child: StateFormula) -> Self {
        PathFormula::Globally(Box::new(child))
    }

    pub fn next(child: StateFormula) -> Self {
        PathFormula::Next(Box::new(child))
    }
}

impl fmt::Display for PathFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathFormula::Until { left, right } => write!(f, "{left} U {right}"),
            PathFormula::BoundedUntil { left, right, steps } => {
                write!(f, "{left} U<={steps} {right}")
            }
            PathFormula::Eventually(child) => write!(f, "F {child}"),
            PathFormula::BoundedEventually { child, steps } => write!(f, "F<={steps} {child}"),
            PathFormula::Globally(child) => write!(f, "G {child}"),
            PathFormula::Next(child) => write!(f, "X {child}"),
        }
    }
}

/// Formula evaluating to an expected reward per state
#[derive(Debug, Clone, PartialEq)]
pub enum RewardFormula {
    /// Reward collected until reaching the target
    Reachability(Box<StateFormula>),
    /// Reward collected during the first `steps` steps
    Cumulative { steps: usize },
    /// Reward of the state occupied after exactly `steps` steps
    Instantaneous { steps: usize },
}

impl RewardFormula {
    pub fn reachability(target: StateFormula) -> Self {
        RewardFormula::Reachability(Box::new(target))
    }

    pub fn cumulative(steps: usize) -> Self {
        RewardFormula::Cumulative { steps }
    }

    pub fn instantaneous(steps: usize) -> Self {
        RewardFormula::Instantaneous { steps }
    }
}

impl fmt::Display for RewardFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewardFormula::Reachability(target) => write!(f, "F {target}"),
            RewardFormula::Cumulative { steps } => write!(f, "C<={steps}"),
            RewardFormula::Instantaneous { steps } => write!(f, "I={steps}"),
        }
    }
}

/// Quantitative query whose per-state values are reported directly
#[derive(Debug, Clone, PartialEq)]
pub enum NoBoundOperator {
    /// `P=? [path]`
    Probabilistic(PathFormula),
    /// `R=? [reward]`
    Reward(RewardFormula),
}

impl fmt::Display for NoBoundOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoBoundOperator::Probabilistic(path) => write!(f, "P=? [{path}]"),
            NoBoundOperator::Reward(reward) => write!(f, "R=? [{reward}]"),
        }
    }
}
