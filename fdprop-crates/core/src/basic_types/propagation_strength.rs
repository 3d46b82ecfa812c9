use std::fmt::Display;

/// The amount of filtering a constraint performs.
///
/// Stronger filtering removes more values which cannot be part of a solution, at a higher cost
/// per invocation. Every constraint accepts each strength; constraints without a distinct
/// algorithm for a strength fall back to the closest weaker one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PropagationStrength {
    Weak,
    Medium,
    #[default]
    Strong,
}

impl Display for PropagationStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropagationStrength::Weak => write!(f, "weak"),
            PropagationStrength::Medium => write!(f, "medium"),
            PropagationStrength::Strong => write!(f, "strong"),
        }
    }
}
