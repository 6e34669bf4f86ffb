//! # persistent-ordmap
//!
//! Persistent (immutable) ordered containers built on a Red-Black Tree.
//!
//! ## Overview
//!
//! - [`persistent::PersistentTreeMap`]: an ordered map whose updates return
//!   new versions sharing structure with the old ones
//! - [`persistent::PersistentTreeSet`]: the matching ordered set
//! - [`control::FoldStep`]: the continue/stop signal of early-terminating
//!   folds
//!
//! ## Feature Flags
//!
//! - `arc`: share nodes through `Arc` instead of `Rc`, making the containers
//!   `Send + Sync`
//! - `serde`: `Serialize` and `Deserialize` for both containers
//!
//! ## Example
//!
//! ```rust
//! use persistent_ordmap::prelude::*;
//!
//! let scores = PersistentTreeMap::new()
//!     .insert("carol", 71)
//!     .insert("alice", 93)
//!     .insert("bob", 88);
//!
//! // Stop at the first score below 80, visiting keys in order.
//! let first_low = scores.fold_left_until(None, |found, name, score| {
//!     if *score < 80 {
//!         FoldStep::Stop(Some(*name))
//!     } else {
//!         FoldStep::Continue(found)
//!     }
//! });
//! assert_eq!(first_low, Some("carol"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use persistent_ordmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::control::*;
    pub use crate::persistent::*;
}

pub mod control;
pub mod persistent;
