//! Continue/stop signal for early-terminating folds.
//!
//! This module provides [`FoldStep`], the value returned by the accumulator
//! function of [`PersistentTreeMap::fold_left_until`] and its relatives.
//! Each step either hands the accumulator to the next element
//! ([`FoldStep::Continue`]) or ends the traversal on the spot
//! ([`FoldStep::Stop`]). A stopped fold never visits another node.
//!
//! # Examples
//!
//! ```rust
//! use persistent_ordmap::control::FoldStep;
//! use persistent_ordmap::persistent::PersistentTreeMap;
//!
//! let map: PersistentTreeMap<i32, i32> = (1..=100).map(|key| (key, key)).collect();
//!
//! // Sum keys until the running total would exceed 20.
//! let total = map.fold_left_until(0, |total, _, value| {
//!     if total + value > 20 {
//!         FoldStep::Stop(total)
//!     } else {
//!         FoldStep::Continue(total + value)
//!     }
//! });
//! assert_eq!(total, 15); // 1 + 2 + 3 + 4 + 5
//! ```
//!
//! [`PersistentTreeMap::fold_left_until`]: crate::persistent::PersistentTreeMap::fold_left_until

use std::fmt;
use std::ops::ControlFlow;

/// The outcome of one step of an early-terminating fold.
///
/// Both variants carry the accumulator. `Continue` keeps walking,
/// `Stop` returns the carried value as the result of the whole fold.
///
/// # Type Parameters
///
/// * `B` - The accumulator type
///
/// # Examples
///
/// ```rust
/// use persistent_ordmap::control::FoldStep;
///
/// let step = FoldStep::Continue(10).map(|total| total * 2);
/// assert_eq!(step, FoldStep::Continue(20));
/// assert_eq!(step.into_inner(), 20);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FoldStep<B> {
    /// Keep folding with this accumulator.
    Continue(B),
    /// Stop folding; this accumulator is the final result.
    Stop(B),
}

impl<B> FoldStep<B> {
    /// Builds a step from a stop condition.
    ///
    /// Returns `Stop(value)` when `stop` is `true`, otherwise `Continue(value)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::control::FoldStep;
    ///
    /// assert_eq!(FoldStep::stop_if(true, 1), FoldStep::Stop(1));
    /// assert_eq!(FoldStep::stop_if(false, 1), FoldStep::Continue(1));
    /// ```
    #[inline]
    pub const fn stop_if(stop: bool, value: B) -> Self {
        if stop {
            Self::Stop(value)
        } else {
            Self::Continue(value)
        }
    }

    /// Returns `true` if this is a `Continue` step.
    #[inline]
    pub const fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    /// Returns `true` if this is a `Stop` step.
    #[inline]
    pub const fn is_stop(&self) -> bool {
        matches!(self, Self::Stop(_))
    }

    /// Extracts the accumulator regardless of the variant.
    #[inline]
    pub fn into_inner(self) -> B {
        match self {
            Self::Continue(value) | Self::Stop(value) => value,
        }
    }

    /// Returns a reference to the accumulator.
    #[inline]
    pub const fn as_inner(&self) -> &B {
        match self {
            Self::Continue(value) | Self::Stop(value) => value,
        }
    }

    /// Transforms the accumulator, keeping the variant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::control::FoldStep;
    ///
    /// let stopped = FoldStep::Stop(3).map(|value| value.to_string());
    /// assert_eq!(stopped, FoldStep::Stop("3".to_string()));
    /// ```
    #[inline]
    pub fn map<C, F>(self, function: F) -> FoldStep<C>
    where
        F: FnOnce(B) -> C,
    {
        match self {
            Self::Continue(value) => FoldStep::Continue(function(value)),
            Self::Stop(value) => FoldStep::Stop(function(value)),
        }
    }

    /// Chains another step if this one continues.
    ///
    /// A `Stop` short-circuits and `function` is never called.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::control::FoldStep;
    ///
    /// let next = FoldStep::Continue(1).and_then(|value| FoldStep::Stop(value + 1));
    /// assert_eq!(next, FoldStep::Stop(2));
    ///
    /// let halted = FoldStep::Stop(1).and_then(|value| FoldStep::Continue(value + 1));
    /// assert_eq!(halted, FoldStep::Stop(1));
    /// ```
    #[inline]
    pub fn and_then<F>(self, function: F) -> Self
    where
        F: FnOnce(B) -> Self,
    {
        match self {
            Self::Continue(value) => function(value),
            stop @ Self::Stop(_) => stop,
        }
    }
}

impl<B> From<ControlFlow<B, B>> for FoldStep<B> {
    fn from(flow: ControlFlow<B, B>) -> Self {
        match flow {
            ControlFlow::Continue(value) => Self::Continue(value),
            ControlFlow::Break(value) => Self::Stop(value),
        }
    }
}

impl<B> From<FoldStep<B>> for ControlFlow<B, B> {
    fn from(step: FoldStep<B>) -> Self {
        match step {
            FoldStep::Continue(value) => Self::Continue(value),
            FoldStep::Stop(value) => Self::Break(value),
        }
    }
}

impl<B: fmt::Debug> fmt::Debug for FoldStep<B> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue(value) => formatter.debug_tuple("Continue").field(value).finish(),
            Self::Stop(value) => formatter.debug_tuple("Stop").field(value).finish(),
        }
    }
}

impl<B: fmt::Display> fmt::Display for FoldStep<B> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue(value) => write!(formatter, "Continue({value})"),
            Self::Stop(value) => write!(formatter, "Stop({value})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true, FoldStep::Stop(7))]
    #[case(false, FoldStep::Continue(7))]
    fn test_stop_if(#[case] stop: bool, #[case] expected: FoldStep<i32>) {
        assert_eq!(FoldStep::stop_if(stop, 7), expected);
    }

    #[rstest]
    fn test_predicates() {
        assert!(FoldStep::Continue(()).is_continue());
        assert!(!FoldStep::Continue(()).is_stop());
        assert!(FoldStep::Stop(()).is_stop());
        assert!(!FoldStep::Stop(()).is_continue());
    }

    #[rstest]
    fn test_into_inner_and_as_inner() {
        assert_eq!(FoldStep::Continue(1).into_inner(), 1);
        assert_eq!(FoldStep::Stop(2).into_inner(), 2);
        assert_eq!(FoldStep::Stop("x").as_inner(), &"x");
    }

    #[rstest]
    fn test_and_then_does_not_call_function_after_stop() {
        let mut called = false;
        let step = FoldStep::Stop(0).and_then(|value| {
            called = true;
            FoldStep::Continue(value)
        });
        assert_eq!(step, FoldStep::Stop(0));
        assert!(!called);
    }

    #[rstest]
    fn test_control_flow_conversion() {
        let flow: ControlFlow<i32, i32> = FoldStep::Stop(5).into();
        assert_eq!(flow, ControlFlow::Break(5));
        assert_eq!(
            FoldStep::from(ControlFlow::<i32, i32>::Continue(4)),
            FoldStep::Continue(4)
        );
    }

    #[rstest]
    fn test_display_and_debug() {
        assert_eq!(format!("{}", FoldStep::Continue(1)), "Continue(1)");
        assert_eq!(format!("{:?}", FoldStep::Stop("a")), "Stop(\"a\")");
    }
}
