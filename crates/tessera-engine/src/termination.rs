//! Termination conditions evaluated after every step.

/// Decides, after each step, whether the simulation is over.
///
/// Implemented for every `Fn(&M, u64, &S) -> bool`, so a closure with
/// annotated parameter types works directly:
///
/// ```
/// use tessera_engine::{BasicStatistics, MaxSteps, TerminationCondition};
///
/// let empty = |model: &Vec<u8>, _step: u64, _stats: &BasicStatistics| model.is_empty();
/// let either = empty.or(MaxSteps(10));
/// assert!(either.is_finished(&vec![], 3, &BasicStatistics::default()));
/// assert!(either.is_finished(&vec![1], 10, &BasicStatistics::default()));
/// assert!(!either.is_finished(&vec![1], 9, &BasicStatistics::default()));
/// ```
pub trait TerminationCondition<M: ?Sized, S> {
    /// Whether the simulation is finished after `step_count` steps.
    fn is_finished(&self, model: &M, step_count: u64, statistics: &S) -> bool;

    /// Finished only when both conditions are.
    fn and<O>(self, other: O) -> And<Self, O>
    where
        Self: Sized,
        O: TerminationCondition<M, S>,
    {
        And(self, other)
    }

    /// Finished when either condition is.
    fn or<O>(self, other: O) -> Or<Self, O>
    where
        Self: Sized,
        O: TerminationCondition<M, S>,
    {
        Or(self, other)
    }

    /// Finished exactly when `self` is not.
    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}

impl<M: ?Sized, S, F> TerminationCondition<M, S> for F
where
    F: Fn(&M, u64, &S) -> bool,
{
    fn is_finished(&self, model: &M, step_count: u64, statistics: &S) -> bool {
        self(model, step_count, statistics)
    }
}

/// Both conditions. Built by [`TerminationCondition::and`].
#[derive(Clone, Copy, Debug)]
pub struct And<A, B>(A, B);

impl<M: ?Sized, S, A, B> TerminationCondition<M, S> for And<A, B>
where
    A: TerminationCondition<M, S>,
    B: TerminationCondition<M, S>,
{
    fn is_finished(&self, model: &M, step_count: u64, statistics: &S) -> bool {
        self.0.is_finished(model, step_count, statistics) && self.1.is_finished(model, step_count, statistics)
    }
}

/// Either condition. Built by [`TerminationCondition::or`].
#[derive(Clone, Copy, Debug)]
pub struct Or<A, B>(A, B);

impl<M: ?Sized, S, A, B> TerminationCondition<M, S> for Or<A, B>
where
    A: TerminationCondition<M, S>,
    B: TerminationCondition<M, S>,
{
    fn is_finished(&self, model: &M, step_count: u64, statistics: &S) -> bool {
        self.0.is_finished(model, step_count, statistics) || self.1.is_finished(model, step_count, statistics)
    }
}

/// Negation. Built by [`TerminationCondition::not`].
#[derive(Clone, Copy, Debug)]
pub struct Not<A>(A);

impl<M: ?Sized, S, A> TerminationCondition<M, S> for Not<A>
where
    A: TerminationCondition<M, S>,
{
    fn is_finished(&self, model: &M, step_count: u64, statistics: &S) -> bool {
        !self.0.is_finished(model, step_count, statistics)
    }
}

/// Finished once `step_count` reaches the limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxSteps(pub u64);

impl<M: ?Sized, S> TerminationCondition<M, S> for MaxSteps {
    fn is_finished(&self, _model: &M, step_count: u64, _statistics: &S) -> bool {
        step_count >= self.0
    }
}

/// Never finished; the caller decides when to stop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Never;

impl<M: ?Sized, S> TerminationCondition<M, S> for Never {
    fn is_finished(&self, _model: &M, _step_count: u64, _statistics: &S) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinators() {
        let at_least_two = |_: &(), step: u64, _: &()| step >= 2;
        assert!(MaxSteps(3).is_finished(&(), 3, &()));
        assert!(!MaxSteps(3).is_finished(&(), 2, &()));
        assert!(!Never.is_finished(&(), u64::MAX, &()));
        assert!(MaxSteps(5).and(at_least_two).is_finished(&(), 5, &()));
        assert!(!MaxSteps(5).and(at_least_two).is_finished(&(), 4, &()));
        assert!(TerminationCondition::<(), ()>::or(Never, MaxSteps(1)).is_finished(&(), 1, &()));
        assert!(TerminationCondition::<(), ()>::not(Never).is_finished(&(), 0, &()));
    }

    #[test]
    fn closures_see_statistics() {
        let over_budget = |_: &(), _: u64, spent: &u32| *spent > 10;
        assert!(over_budget.is_finished(&(), 0, &11));
        assert!(!over_budget.is_finished(&(), 0, &10));
    }
}
