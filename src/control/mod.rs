//! Control structures shared by the persistent containers.
//!
//! - [`FoldStep`]: continue/stop signal consumed by early-terminating folds
//!
//! # Examples
//!
//! ```rust
//! use persistent_ordmap::control::FoldStep;
//! use persistent_ordmap::persistent::PersistentTreeSet;
//!
//! let set: PersistentTreeSet<i32> = (1..=10_000).collect();
//!
//! // Only the first ten elements are ever visited.
//! let sum = set.fold_left_until(0, |sum, element| {
//!     FoldStep::stop_if(*element >= 10, sum + element)
//! });
//! assert_eq!(sum, 55);
//! ```

mod fold_step;

pub use fold_step::FoldStep;
