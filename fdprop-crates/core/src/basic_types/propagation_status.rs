/// The result of invoking a constraint.
///
/// `Ok` carries an [`Outcome`]; `Err` means a domain would have become empty or the constraint
/// found its variables to be inconsistent.
pub type PropagationStatus = Result<Outcome, Inconsistency>;

/// How a constraint continues after it has been invoked without failure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The constraint has to be woken up again when its variables change.
    #[default]
    Suspend,
    /// The constraint is entailed under the current domains; it is deactivated until the store
    /// pops back past the current choice point.
    Success,
}

/// A reason why propagation cannot continue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Inconsistency {
    /// A domain operation would have removed the last value of a domain.
    EmptyDomain,
    /// A constraint detected that it cannot be satisfied under the current domains.
    Conflict,
}

impl From<EmptyDomain> for Inconsistency {
    fn from(_: EmptyDomain) -> Self {
        Inconsistency::EmptyDomain
    }
}

/// A domain operation would have wiped out the domain. The domain is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EmptyDomain;
